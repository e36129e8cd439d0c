use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapOutcome {
    /// The swap created at least one match and was committed.
    Succeeded,
    /// Adjacent pieces, but the exchange matched nothing and was rolled back.
    Failed,
    /// Not a legal exchange at all: not orthogonal neighbours, or a cell without a piece.
    Unswappable,
}

impl SwapOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapAttempt {
    pub first: Coord2,
    pub second: Coord2,
}

impl SwapAttempt {
    pub const fn new(first: Coord2, second: Coord2) -> Self {
        Self { first, second }
    }

    pub const fn is_adjacent(&self) -> bool {
        is_adjacent(self.first, self.second)
    }
}

/// Board-level result of evaluating a swap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SwapVerdict {
    Unswappable,
    Failed,
    /// The swap stays applied; these are the match sources on the swapped board.
    Matched(Vec<Coord2>),
}

impl SwapVerdict {
    pub const fn outcome(&self) -> SwapOutcome {
        match self {
            Self::Unswappable => SwapOutcome::Unswappable,
            Self::Failed => SwapOutcome::Failed,
            Self::Matched(_) => SwapOutcome::Succeeded,
        }
    }
}

/// Performs the swap tentatively and keeps it only if it creates a match.
///
/// An unswappable attempt never touches the board. A failed one is swapped back, which
/// restores the board exactly, piece ids and positions included.
pub fn evaluate(board: &mut Board, attempt: SwapAttempt) -> SwapVerdict {
    let SwapAttempt { first, second } = attempt;
    if !attempt.is_adjacent() || !board.swap_pieces(first, second) {
        log::debug!("Swap {first:?} <-> {second:?} is not possible");
        return SwapVerdict::Unswappable;
    }

    let matches = find_matches(board);
    if matches.is_empty() {
        board.swap_pieces(first, second);
        log::debug!("Swap {first:?} <-> {second:?} matched nothing, rolled back");
        SwapVerdict::Failed
    } else {
        log::debug!(
            "Swap {first:?} <-> {second:?} matched {} pieces",
            matches.len()
        );
        SwapVerdict::Matched(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;

    #[test]
    fn rejects_non_adjacent_and_empty_cells() {
        let mut board = Board::from_ascii(&["AB.", "CDE"]);
        let before = board.clone();

        for attempt in [
            SwapAttempt::new((0, 0), (1, 1)),
            SwapAttempt::new((0, 0), (2, 0)),
            SwapAttempt::new((0, 0), (0, 0)),
            SwapAttempt::new((1, 0), (2, 0)),
            SwapAttempt::new((2, 1), (3, 1)),
        ] {
            assert_eq!(evaluate(&mut board, attempt), SwapVerdict::Unswappable);
            assert_eq!(board, before);
        }
    }

    #[test]
    fn failed_swap_restores_board() {
        // Middle A trades with the B above it: A,B,A in the row, no run anywhere.
        let mut board = Board::from_ascii(&[".B.", "AAA"]);
        let before = board.clone();

        let verdict = evaluate(&mut board, SwapAttempt::new((1, 1), (1, 0)));

        assert_eq!(verdict, SwapVerdict::Failed);
        assert_eq!(board, before);
    }

    #[test]
    fn matching_swap_stays_applied() {
        let mut board = Board::from_ascii(&["AAB", "CDA"]);

        let verdict = evaluate(&mut board, SwapAttempt::new((2, 0), (2, 1)));

        assert_eq!(verdict, SwapVerdict::Matched(vec![(0, 0), (1, 0), (2, 0)]));
        assert_eq!(verdict.outcome(), SwapOutcome::Succeeded);
        assert_eq!(board.to_string(), "AAA\nCDB");
        assert_eq!(board.piece_at((2, 1)).unwrap().position, (2, 1));
    }
}
