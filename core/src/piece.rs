use serde::{Deserialize, Serialize};

use crate::Coord2;

/// Index of a piece type inside the level [`Palette`](crate::Palette).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PieceType(u8);

impl PieceType {
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Stable identity of a piece for the lifetime of the session, so a presenter can
/// track one sprite per piece across moves.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PieceId(u32);

impl PieceId {
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Hands out fresh [`PieceId`]s in increasing order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PieceIds {
    next: u32,
}

impl PieceIds {
    pub const fn starting_at(next: u32) -> Self {
        Self { next }
    }

    pub fn next_id(&mut self) -> PieceId {
        let id = PieceId(self.next);
        self.next += 1;
        id
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub id: PieceId,
    pub kind: PieceType,
    pub position: Coord2,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    Blocked,
    Empty,
    Occupied(Piece),
}

impl CellState {
    pub const fn is_playable(self) -> bool {
        !matches!(self, Self::Blocked)
    }

    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    pub const fn piece(self) -> Option<Piece> {
        match self {
            Self::Occupied(piece) => Some(piece),
            _ => None,
        }
    }

    pub const fn kind(self) -> Option<PieceType> {
        match self {
            Self::Occupied(piece) => Some(piece.kind),
            _ => None,
        }
    }
}

impl Default for CellState {
    fn default() -> Self {
        Self::Empty
    }
}
