//! Gravity refill.
//!
//! One pass sweeps the rows from the bottom up. Within a row, every empty cell first tries
//! to pull the piece straight above it; after that, the still-empty cells of the row try
//! the upper-left piece, then the upper-right piece, then a spawn. Pieces only ever come
//! from the row above the one being filled, and that row is filled later in the same
//! sweep, so each piece moves at most one row per pass and a piece that has just landed
//! never moves again in that pass.

use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FallKind {
    Vertical,
    /// Moved down-right from the upper-left neighbour.
    FromLeft,
    /// Moved down-left from the upper-right neighbour.
    FromRight,
    /// Entered from the spawn origin above the board.
    Spawned,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceMove {
    /// The piece as it stands after the move.
    pub piece: Piece,
    pub from: Coord2,
    pub to: Coord2,
    pub kind: FallKind,
}

/// Moves applied by a single pass, in the order they were made.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassReport {
    pub moves: Vec<PieceMove>,
}

impl PassReport {
    /// A pass that moved nothing means the board is settled.
    pub fn is_settled(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn spawned(&self) -> impl Iterator<Item = &PieceMove> {
        self.moves
            .iter()
            .filter(|step| step.kind == FallKind::Spawned)
    }
}

pub struct CascadeResolver<'a, S: PieceSource> {
    board: &'a mut Board,
    policy: &'a SpawnPolicy,
    source: &'a mut S,
    ids: &'a mut PieceIds,
}

impl<'a, S: PieceSource> CascadeResolver<'a, S> {
    pub fn new(
        board: &'a mut Board,
        policy: &'a SpawnPolicy,
        source: &'a mut S,
        ids: &'a mut PieceIds,
    ) -> Self {
        Self {
            board,
            policy,
            source,
            ids,
        }
    }

    /// Runs one pass and applies its moves to the board before returning.
    pub fn advance_pass(&mut self) -> PassReport {
        let (width, height) = self.board.size();
        let mut report = PassReport::default();

        for row in (0..height).rev() {
            for col in 0..width {
                let to = (col, row);
                let above = (col, row - 1);
                if self.board.is_empty_cell(to) && self.board.piece_at(above).is_some() {
                    report.moves.push(self.fall(above, to, FallKind::Vertical));
                }
            }

            for col in 0..width {
                let to = (col, row);
                if !self.board.is_empty_cell(to) {
                    continue;
                }
                let left = (col - 1, row - 1);
                let right = (col + 1, row - 1);
                if self.board.piece_at(left).is_some() {
                    report.moves.push(self.fall(left, to, FallKind::FromLeft));
                } else if self.board.piece_at(right).is_some() {
                    report.moves.push(self.fall(right, to, FallKind::FromRight));
                } else if self.policy.allows(self.board, to) {
                    report.moves.push(self.spawn(to));
                }
            }
        }

        log::trace!("Cascade pass moved {} pieces", report.moves.len());
        report
    }

    /// Repeats passes until one moves nothing and returns every pass that did move.
    pub fn settle(&mut self) -> Vec<PassReport> {
        let mut passes = Vec::new();
        loop {
            let report = self.advance_pass();
            if report.is_settled() {
                break;
            }
            passes.push(report);
        }
        log::debug!("Board settled after {} passes", passes.len());
        passes
    }

    fn fall(&mut self, from: Coord2, to: Coord2, kind: FallKind) -> PieceMove {
        let piece = self.board.move_piece(from, to);
        PieceMove {
            piece,
            from,
            to,
            kind,
        }
    }

    fn spawn(&mut self, to: Coord2) -> PieceMove {
        let piece = Piece {
            id: self.ids.next_id(),
            kind: self.policy.draw(&mut *self.source),
            position: to,
        };
        self.board.set(to, Some(piece));
        PieceMove {
            piece,
            from: SpawnPolicy::origin(to.0),
            to,
            kind: FallKind::Spawned,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;

    struct Fixture {
        board: Board,
        policy: SpawnPolicy,
        source: SequencePieceSource,
        ids: PieceIds,
    }

    impl Fixture {
        fn new(rows: &[&str], spawn_line: Vec<bool>) -> Self {
            Self {
                board: Board::from_ascii(rows),
                policy: SpawnPolicy::new(spawn_line, vec![PieceType::new(25)]),
                source: SequencePieceSource::new(vec![PieceType::new(25)]),
                ids: PieceIds::starting_at(1000),
            }
        }

        fn resolver(&mut self) -> CascadeResolver<'_, SequencePieceSource> {
            CascadeResolver::new(
                &mut self.board,
                &self.policy,
                &mut self.source,
                &mut self.ids,
            )
        }
    }

    #[test]
    fn pieces_fall_one_row_per_pass() {
        let mut fx = Fixture::new(&["A", ".", "."], vec![false]);

        let first = fx.resolver().advance_pass();
        assert_eq!(first.moves.len(), 1);
        assert_eq!(first.moves[0].from, (0, 0));
        assert_eq!(first.moves[0].to, (0, 1));
        assert_eq!(fx.board.to_string(), ".\nA\n.");

        fx.resolver().advance_pass();
        assert_eq!(fx.board.to_string(), ".\n.\nA");
        assert!(fx.resolver().advance_pass().is_settled());
    }

    #[test]
    fn stacked_pieces_fall_together() {
        let mut fx = Fixture::new(&["A", "B", "."], vec![false]);

        let report = fx.resolver().advance_pass();

        assert_eq!(report.moves.len(), 2);
        assert_eq!(fx.board.to_string(), ".\nA\nB");
    }

    #[test]
    fn vertical_fall_wins_over_diagonal() {
        // (1, 1) would feed (0, 2) diagonally, but (1, 2) takes it straight down first.
        let mut fx = Fixture::new(&["##", "#A", ".."], vec![false, false]);

        fx.resolver().advance_pass();

        assert_eq!(fx.board.to_string(), "##\n#.\n.A");
    }

    #[test]
    fn diagonal_prefers_left_source() {
        let mut fx = Fixture::new(&["A#B", "C.D"], vec![false; 3]);

        let report = fx.resolver().advance_pass();

        assert_eq!(report.moves.len(), 1);
        assert_eq!(report.moves[0].kind, FallKind::FromLeft);
        assert_eq!(fx.board.to_string(), ".#B\nCAD");
    }

    #[test]
    fn diagonal_falls_back_to_right_source() {
        let mut fx = Fixture::new(&["##B", "C.D"], vec![false; 3]);

        let report = fx.resolver().advance_pass();

        assert_eq!(report.moves[0].kind, FallKind::FromRight);
        assert_eq!(fx.board.to_string(), "##.\nCBD");
    }

    #[test]
    fn spawns_enter_from_above_the_board() {
        let mut fx = Fixture::new(&[".", "A"], vec![true]);

        let report = fx.resolver().advance_pass();

        assert_eq!(report.moves.len(), 1);
        let spawn = report.moves[0];
        assert_eq!(spawn.kind, FallKind::Spawned);
        assert_eq!(spawn.from, (0, -1));
        assert_eq!(spawn.to, (0, 0));
        assert_eq!(spawn.piece.kind, PieceType::new(25));
        assert_eq!(spawn.piece.id.get(), 1000);
        assert_eq!(fx.board.to_string(), "Z\nA");
    }

    #[test]
    fn spawn_below_blocked_top() {
        let mut fx = Fixture::new(&["#", "#", ".", "A"], vec![true]);

        let passes = fx.resolver().settle();

        assert_eq!(passes.len(), 1);
        let spawn = passes[0].moves[0];
        assert_eq!(spawn.kind, FallKind::Spawned);
        assert_eq!((spawn.from, spawn.to), ((0, -1), (0, 2)));
        assert_eq!(fx.board.to_string(), "#\n#\nZ\nA");
    }

    #[test]
    fn settle_refills_column() {
        let mut fx = Fixture::new(&[".", ".", "."], vec![true]);

        let passes = fx.resolver().settle();

        assert_eq!(passes.len(), 3);
        assert_eq!(fx.board.to_string(), "Z\nZ\nZ");
        assert!(fx.board.pieces().all(|piece| piece.kind == PieceType::new(25)));
    }

    #[test]
    fn disabled_spawn_column_stays_empty() {
        let mut fx = Fixture::new(&["..", "AB"], vec![false, false]);

        let passes = fx.resolver().settle();

        assert!(passes.is_empty());
        assert_eq!(fx.board.to_string(), "..\nAB");
    }
}
