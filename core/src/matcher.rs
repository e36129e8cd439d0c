//! Match detection.
//!
//! A piece is a match source when the same-type pieces reaching out from it to the left
//! and right add up to at least two, or those reaching up and down do. Every member of a
//! run of three or more qualifies on its own, and crossing runs (L, T and plus shapes)
//! are picked up cell by cell with no special casing.

use alloc::vec::Vec;

use crate::*;

/// Minimum number of same-type neighbours along one axis that makes a match.
pub const MATCH_NEIGHBOURS: usize = 2;

/// Number of consecutive same-type pieces strictly in `direction` from `from`, stopping at
/// the first different type, empty cell, blocked cell or board edge.
pub fn run_length(board: &Board, from: Coord2, direction: Direction) -> usize {
    let Some(kind) = board.kind_at(from) else {
        return 0;
    };
    let mut count = 0;
    let mut cursor = direction.step(from);
    while board.kind_at(cursor) == Some(kind) {
        count += 1;
        cursor = direction.step(cursor);
    }
    count
}

pub fn is_match_source(board: &Board, coords: Coord2) -> bool {
    let horizontal =
        run_length(board, coords, Direction::Left) + run_length(board, coords, Direction::Right);
    let vertical =
        run_length(board, coords, Direction::Up) + run_length(board, coords, Direction::Down);
    horizontal.max(vertical) >= MATCH_NEIGHBOURS
}

/// Scans the whole board and returns every match source in row-major order.
///
/// Takes the board by shared reference, so all decisions come from the same snapshot;
/// the caller removes the pieces afterwards, all at once.
pub fn find_matches(board: &Board) -> Vec<Coord2> {
    board
        .positions()
        .filter(|&coords| is_match_source(board, coords))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn counts_stop_at_different_type() {
        let board = Board::from_ascii(&["AABAA"]);

        assert_eq!(run_length(&board, (0, 0), Direction::Right), 1);
        assert_eq!(run_length(&board, (4, 0), Direction::Left), 1);
        assert_eq!(run_length(&board, (2, 0), Direction::Left), 0);
        assert!(find_matches(&board).is_empty());
    }

    #[test]
    fn flags_every_member_of_a_run() {
        let board = Board::from_ascii(&["BAAAAB"]);

        assert_eq!(find_matches(&board), vec![(1, 0), (2, 0), (3, 0), (4, 0)]);
    }

    #[test]
    fn blocked_and_empty_cells_break_runs() {
        let board = Board::from_ascii(&["AA#A", "AA.A", "B..A"]);

        assert_eq!(find_matches(&board), vec![(3, 0), (3, 1), (3, 2)]);
    }

    #[test]
    fn crossing_runs_are_flagged_together() {
        let board = Board::from_ascii(&[
            "ABC", //
            "ABC", //
            "AAA",
        ]);

        assert_eq!(
            find_matches(&board),
            vec![(0, 0), (0, 1), (0, 2), (1, 2), (2, 2)]
        );
    }

    #[test]
    fn empty_cell_is_never_a_source() {
        let board = Board::from_ascii(&["A.A"]);

        assert!(!is_match_source(&board, (1, 0)));
        assert_eq!(run_length(&board, (1, 0), Direction::Left), 0);
    }
}
