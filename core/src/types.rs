use serde::{Deserialize, Serialize};

/// Single coordinate axis used for board width, height, and positions.
///
/// Signed so that positions just outside the grid (edge neighbours, the spawn
/// origin above the top row) stay representable and simply report as off-board.
pub type Coord = i16;

/// Two-dimensional position `(col, row)`, row 0 being the top of the board.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    /// Row-major index into the backing array. Only meaningful for in-bounds positions.
    fn to_nd_index(self) -> Self::Output {
        [self.1 as usize, self.0 as usize]
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::Left, Self::Right, Self::Up, Self::Down];

    pub const fn delta(self) -> (Coord, Coord) {
        match self {
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
            Self::Up => (0, -1),
            Self::Down => (0, 1),
        }
    }

    /// Steps one cell from `coords`. Saturates instead of wrapping at the numeric edges,
    /// which are far outside any board.
    pub const fn step(self, (col, row): Coord2) -> Coord2 {
        let (dx, dy) = self.delta();
        (col.saturating_add(dx), row.saturating_add(dy))
    }
}

/// Manhattan distance between two positions.
pub const fn manhattan((ax, ay): Coord2, (bx, by): Coord2) -> u32 {
    let dx = (ax as i32 - bx as i32).unsigned_abs();
    let dy = (ay as i32 - by as i32).unsigned_abs();
    dx + dy
}

/// True when the positions share an edge: one cell apart along a single axis.
pub const fn is_adjacent(a: Coord2, b: Coord2) -> bool {
    manhattan(a, b) == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacency_is_orthogonal_only() {
        assert!(is_adjacent((1, 1), (2, 1)));
        assert!(is_adjacent((1, 1), (1, 0)));
        assert!(!is_adjacent((1, 1), (2, 2)));
        assert!(!is_adjacent((1, 1), (1, 1)));
        assert!(!is_adjacent((0, 0), (2, 0)));
    }

    #[test]
    fn steps_reach_adjacent_cells() {
        for dir in Direction::ALL {
            assert!(is_adjacent(dir.step((3, 4)), (3, 4)));
        }
    }

    #[test]
    fn nd_index_is_row_major() {
        assert_eq!((2, 5).to_nd_index(), [5, 2]);
    }
}
