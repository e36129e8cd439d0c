//! Level description as supplied by the host, and its validated form.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use ndarray::Array2;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::*;

/// One entry of the layout matrix: `0` blocked, `1` random fill, or a piece code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldCode {
    Flag(u8),
    Code(String),
}

/// Raw level description, field names matching the JSON level files.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelConfig {
    pub field: Vec<Vec<FieldCode>>,
    #[serde(deserialize_with = "spawn_flags")]
    pub spawn_line: Vec<bool>,
    pub item_list: Vec<String>,
    #[serde(default)]
    pub goals: BTreeMap<String, u32>,
    pub moves: i64,
    /// Short layout codes to type names, for single-letter codes in `field`.
    #[serde(default)]
    pub codes: BTreeMap<String, String>,
}

impl LevelConfig {
    pub fn from_json(text: &str) -> core::result::Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|err| ConfigError::Malformed(err.to_string()))
    }
}

/// Layout cell after code resolution.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutCell {
    Blocked,
    Random,
    Fixed(PieceType),
}

/// Names of the playable piece types, in configuration order. A type's position in the
/// list is its [`PieceType`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    names: Vec<String>,
}

impl Palette {
    const MAX_TYPES: usize = u8::MAX as usize + 1;

    /// Palette whose playable types are `names`, in order.
    pub fn from_names<N: AsRef<str>>(names: &[N]) -> core::result::Result<Self, ConfigError> {
        if names.is_empty() {
            return Err(ConfigError::NoPieceTypes);
        }
        let mut palette = Self {
            names: Vec::with_capacity(names.len()),
        };
        for name in names {
            let name: &str = name.as_ref();
            if palette.kind_of(name).is_some() {
                return Err(ConfigError::DuplicatePieceType(name.to_string()));
            }
            palette.push(name)?;
        }
        Ok(palette)
    }

    pub fn name(&self, kind: PieceType) -> Option<&str> {
        self.names.get(kind.index()).map(String::as_str)
    }

    pub fn kind_of(&self, name: &str) -> Option<PieceType> {
        self.names
            .iter()
            .position(|known| known == name)
            .map(|index| PieceType::new(index as u8))
    }

    /// Types random fill and spawning draw from.
    pub fn playable(&self) -> Vec<PieceType> {
        (0..self.names.len())
            .map(|index| PieceType::new(index as u8))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn push(&mut self, name: &str) -> core::result::Result<(), ConfigError> {
        if self.names.len() >= Self::MAX_TYPES {
            return Err(ConfigError::TooManyPieceTypes {
                max: Self::MAX_TYPES,
            });
        }
        self.names.push(name.to_string());
        Ok(())
    }
}

/// A validated level: everything a session needs, already typed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub layout: Array2<LayoutCell>,
    pub spawn_line: Vec<bool>,
    pub palette: Palette,
    pub goals: BTreeMap<PieceType, u32>,
    pub moves: u32,
}

impl Level {
    pub fn compile(config: &LevelConfig) -> core::result::Result<Self, ConfigError> {
        let height = config.field.len();
        let width = config.field.first().map_or(0, Vec::len);
        if height == 0 || width == 0 {
            return Err(ConfigError::EmptyLayout);
        }
        if height > Coord::MAX as usize || width > Coord::MAX as usize {
            return Err(ConfigError::LayoutTooLarge { max: Coord::MAX });
        }
        if let Some((row, cells)) = config
            .field
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != width)
        {
            return Err(ConfigError::RaggedLayout {
                row,
                expected: width,
                found: cells.len(),
            });
        }
        if config.spawn_line.len() != width {
            return Err(ConfigError::SpawnLineWidth {
                expected: width,
                found: config.spawn_line.len(),
            });
        }
        if config.moves <= 0 {
            return Err(ConfigError::InvalidMoveBudget(config.moves));
        }
        let moves =
            u32::try_from(config.moves).map_err(|_| ConfigError::InvalidMoveBudget(config.moves))?;

        let palette = Palette::from_names(&config.item_list)?;

        let mut goals = BTreeMap::new();
        for (name, &target) in &config.goals {
            let kind = palette
                .kind_of(name)
                .ok_or_else(|| ConfigError::UnknownGoalType(name.clone()))?;
            if target == 0 {
                log::warn!("Goal for `{name}` has a zero target and starts complete");
            }
            goals.insert(kind, target);
        }

        let mut cells = Vec::with_capacity(width * height);
        for row in &config.field {
            for code in row {
                cells.push(resolve_code(code, &config.codes, &palette)?);
            }
        }
        let layout = Array2::from_shape_vec((height, width), cells)
            .map_err(|err| ConfigError::Malformed(err.to_string()))?;

        for (col, _) in config
            .spawn_line
            .iter()
            .enumerate()
            .filter(|&(_, &allowed)| allowed)
        {
            if layout.column(col).iter().all(|cell| *cell == LayoutCell::Blocked) {
                log::warn!("Spawn allowed in column {col}, which has no playable cell");
            }
        }

        Ok(Self {
            layout,
            spawn_line: config.spawn_line.clone(),
            palette,
            goals,
            moves,
        })
    }

    pub fn from_json(text: &str) -> core::result::Result<Self, ConfigError> {
        Self::compile(&LevelConfig::from_json(text)?)
    }

    /// `(width, height)`
    pub fn size(&self) -> Coord2 {
        let (height, width) = self.layout.dim();
        (width as Coord, height as Coord)
    }
}

/// Code lookup goes through the level's code table first; a code missing from the table
/// names a type directly. Either way the type must be one of the playable types.
fn resolve_code(
    code: &FieldCode,
    table: &BTreeMap<String, String>,
    palette: &Palette,
) -> core::result::Result<LayoutCell, ConfigError> {
    let code = match code {
        FieldCode::Flag(0) => return Ok(LayoutCell::Blocked),
        FieldCode::Flag(1) => return Ok(LayoutCell::Random),
        FieldCode::Flag(other) => return Err(ConfigError::UnknownLayoutCode(other.to_string())),
        FieldCode::Code(code) => code.as_str(),
    };
    let name = table.get(code).map_or(code, String::as_str);
    match palette.kind_of(name) {
        Some(kind) => Ok(LayoutCell::Fixed(kind)),
        None if name == code && code.chars().count() <= 1 => {
            Err(ConfigError::UnknownLayoutCode(code.to_string()))
        }
        None => Err(ConfigError::UnknownFixedType(name.to_string())),
    }
}

/// Spawn flags are written either as booleans or as `0`/`1`.
fn spawn_flags<'de, D>(deserializer: D) -> core::result::Result<Vec<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum SpawnFlag {
        Bool(bool),
        Bit(u8),
    }

    Vec::<SpawnFlag>::deserialize(deserializer)?
        .into_iter()
        .map(|flag| match flag {
            SpawnFlag::Bool(allowed) => Ok(allowed),
            SpawnFlag::Bit(0) => Ok(false),
            SpawnFlag::Bit(1) => Ok(true),
            SpawnFlag::Bit(other) => Err(D::Error::custom(format_args!(
                "spawn flag must be 0 or 1, got {other}"
            ))),
        })
        .collect()
}
