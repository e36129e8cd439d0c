use serde::{Deserialize, Serialize};

use crate::*;

/// Notifications for the presenter, queued in the order the changes happened.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    PieceRemoved { piece: Piece, routed_to_goal: bool },
    /// One row-step of a piece; `piece.position` is already `to`. The move that follows
    /// a `PieceSpawned` is the exception.
    PieceMoved { piece: Piece, from: Coord2, to: Coord2 },
    /// A fresh piece for `column`. It is followed by a single `PieceMoved` from the spawn
    /// origin `(column, -1)` to its cell, which lies several rows down when the top of
    /// the column is blocked.
    PieceSpawned { piece: Piece, column: Coord },
    GoalUpdated { kind: PieceType, current: u32 },
    MovesUpdated { moves_left: u32 },
    GameWon,
    GameLost,
}
