use alloc::vec::Vec;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::*;

/// Supplies the type of every piece created during a session: initial random fill and
/// spawns alike.
pub trait PieceSource {
    /// Picks one of `kinds`, which is never empty.
    fn next_piece(&mut self, kinds: &[PieceType]) -> PieceType;
}

impl<S: PieceSource + ?Sized> PieceSource for &mut S {
    fn next_piece(&mut self, kinds: &[PieceType]) -> PieceType {
        (**self).next_piece(kinds)
    }
}

/// Uniform draw from a seeded generator, so a session replays exactly from its seed.
#[derive(Clone, Debug)]
pub struct RandomPieceSource {
    rng: SmallRng,
}

impl RandomPieceSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl PieceSource for RandomPieceSource {
    fn next_piece(&mut self, kinds: &[PieceType]) -> PieceType {
        kinds[self.rng.random_range(0..kinds.len())]
    }
}

/// Replays a fixed sequence of types, wrapping around at the end. Types outside the
/// offered kinds are still handed out as-is, which lets scripted levels and tests pin
/// exactly what arrives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SequencePieceSource {
    sequence: Vec<PieceType>,
    cursor: usize,
}

impl SequencePieceSource {
    /// Panics on an empty sequence.
    pub fn new(sequence: Vec<PieceType>) -> Self {
        assert!(!sequence.is_empty(), "piece sequence must not be empty");
        Self {
            sequence,
            cursor: 0,
        }
    }
}

impl PieceSource for SequencePieceSource {
    fn next_piece(&mut self, _kinds: &[PieceType]) -> PieceType {
        let kind = self.sequence[self.cursor];
        self.cursor = (self.cursor + 1) % self.sequence.len();
        kind
    }
}

/// Decides whether an empty cell can be fed by a fresh piece during a fall pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpawnPolicy {
    spawn_line: Vec<bool>,
    kinds: Vec<PieceType>,
}

impl SpawnPolicy {
    pub fn new(spawn_line: Vec<bool>, kinds: Vec<PieceType>) -> Self {
        Self { spawn_line, kinds }
    }

    pub fn from_level(level: &Level) -> Self {
        Self::new(level.spawn_line.clone(), level.palette.playable())
    }

    /// Virtual cell one row above the board where spawned pieces start.
    pub const fn origin(column: Coord) -> Coord2 {
        (column, -1)
    }

    pub fn column_enabled(&self, column: Coord) -> bool {
        usize::try_from(column)
            .ok()
            .and_then(|col| self.spawn_line.get(col))
            .copied()
            .unwrap_or(false)
    }

    /// Spawning into `(col, row)` needs no playable cell above it in the column, so no
    /// existing piece could fall in instead, and the column's spawn flag set.
    pub fn allows(&self, board: &Board, (col, row): Coord2) -> bool {
        self.column_enabled(col) && (0..row).all(|above| !board.is_playable((col, above)))
    }

    pub fn draw(&self, source: &mut impl PieceSource) -> PieceType {
        source.next_piece(&self.kinds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn kinds(n: u8) -> Vec<PieceType> {
        (0..n).map(PieceType::new).collect()
    }

    #[test]
    fn spawn_only_below_unplayable_cells() {
        let board = Board::from_ascii(&["#.", "..", ".."]);
        let policy = SpawnPolicy::new(vec![true, true], kinds(3));

        assert!(policy.allows(&board, (0, 1)));
        assert!(!policy.allows(&board, (0, 2)));
        assert!(policy.allows(&board, (1, 0)));
        assert!(!policy.allows(&board, (1, 1)));
    }

    #[test]
    fn spawn_flag_gates_column() {
        let board = Board::from_ascii(&["..", ".."]);
        let policy = SpawnPolicy::new(vec![false, true], kinds(3));

        assert!(!policy.allows(&board, (0, 0)));
        assert!(policy.allows(&board, (1, 0)));
        assert!(!policy.column_enabled(-1));
        assert!(!policy.column_enabled(2));
    }

    #[test]
    fn random_source_is_reproducible_and_in_range() {
        let kinds = kinds(4);
        let mut a = RandomPieceSource::new(7);
        let mut b = RandomPieceSource::new(7);

        for _ in 0..64 {
            let kind = a.next_piece(&kinds);
            assert_eq!(kind, b.next_piece(&kinds));
            assert!(kinds.contains(&kind));
        }
    }

    #[test]
    fn sequence_source_wraps() {
        let mut source = SequencePieceSource::new(kinds(2));

        let drawn: Vec<_> = (0..3).map(|_| source.next_piece(&[])).collect();

        assert_eq!(drawn, vec![PieceType::new(0), PieceType::new(1), PieceType::new(0)]);
    }
}
