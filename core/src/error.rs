use alloc::string::String;
use thiserror::Error;

use crate::Coord;

/// Reasons a level description is rejected before any session state exists.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Level layout has no cells")]
    EmptyLayout,
    #[error("Level layout is too large, at most {max} rows and columns are supported")]
    LayoutTooLarge { max: Coord },
    #[error("Layout row {row} has {found} cells, expected {expected}")]
    RaggedLayout {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Spawn line has {found} entries, expected one per column ({expected})")]
    SpawnLineWidth { expected: usize, found: usize },
    #[error("No playable piece types configured")]
    NoPieceTypes,
    #[error("Piece type `{0}` is listed more than once")]
    DuplicatePieceType(String),
    #[error("Too many piece types, at most {max} are supported")]
    TooManyPieceTypes { max: usize },
    #[error("Unknown layout code `{0}`")]
    UnknownLayoutCode(String),
    #[error("Fixed layout cell names `{0}`, which is not a playable piece type")]
    UnknownFixedType(String),
    #[error("Goal type `{0}` is not a playable piece type")]
    UnknownGoalType(String),
    #[error("Move budget must be positive, got {0}")]
    InvalidMoveBudget(i64),
    #[error("Board shape or playability does not match the level layout")]
    BoardMismatch,
    #[error("Malformed level description: {0}")]
    Malformed(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid level configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
    #[error("A swap is still being resolved, new swaps are rejected")]
    Resolving,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
    #[error("Nothing to resolve")]
    NotResolving,
}

pub type Result<T> = core::result::Result<T, GameError>;
