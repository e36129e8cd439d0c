//! Grid storage for a session.
//!
//! Cells live in a row-major `Array2` indexed `[row, col]`. Blocked cells are fixed
//! when the board is built and no operation here can turn a blocked cell playable or
//! the other way round. Every occupied cell holds a piece whose stored position is
//! that cell's coordinate; the mutating operations keep it that way and panic if a
//! caller tries to break it.

use alloc::vec::Vec;
use core::fmt;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<CellState>,
}

impl Board {
    /// Builds the initial board from a compiled layout, drawing random-fill cells from `source`.
    pub fn from_layout(
        layout: &Array2<LayoutCell>,
        kinds: &[PieceType],
        source: &mut impl PieceSource,
        ids: &mut PieceIds,
    ) -> Self {
        let (height, width) = layout.dim();
        let mut cells = Array2::from_elem((height, width), CellState::Blocked);
        for ((row, col), cell) in layout.indexed_iter() {
            let kind = match *cell {
                LayoutCell::Blocked => continue,
                LayoutCell::Random => source.next_piece(kinds),
                LayoutCell::Fixed(kind) => kind,
            };
            cells[[row, col]] = CellState::Occupied(Piece {
                id: ids.next_id(),
                kind,
                position: (col as Coord, row as Coord),
            });
        }
        Self { cells }
    }

    /// Parses a compact text board, one string per row: `#` is blocked, `.` is empty and
    /// `A`..=`Z` are pieces of type 0..=25. Piece ids are assigned in row-major order.
    ///
    /// Meant for tests, tooling and debugging dumps; panics on ragged or unknown input.
    pub fn from_ascii(rows: &[&str]) -> Self {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.chars().count());
        let mut ids = PieceIds::default();
        let mut cells = Vec::with_capacity(width * height);
        for (row, line) in rows.iter().enumerate() {
            assert_eq!(line.chars().count(), width, "ragged board row {row}");
            for (col, ch) in line.chars().enumerate() {
                cells.push(match ch {
                    '#' => CellState::Blocked,
                    '.' => CellState::Empty,
                    'A'..='Z' => CellState::Occupied(Piece {
                        id: ids.next_id(),
                        kind: PieceType::new(ch as u8 - b'A'),
                        position: (col as Coord, row as Coord),
                    }),
                    other => panic!("unknown board character {other:?}"),
                });
            }
        }
        let cells = Array2::from_shape_vec((height, width), cells)
            .expect("row lengths were checked above");
        Self { cells }
    }

    /// `(width, height)`
    pub fn size(&self) -> Coord2 {
        (self.width(), self.height())
    }

    pub fn width(&self) -> Coord {
        self.cells.ncols() as Coord
    }

    pub fn height(&self) -> Coord {
        self.cells.nrows() as Coord
    }

    fn index(&self, (col, row): Coord2) -> Option<[usize; 2]> {
        if col < 0 || row < 0 || col >= self.width() || row >= self.height() {
            return None;
        }
        Some((col, row).to_nd_index())
    }

    /// Cell at `coords`, or `None` when the position is not on the board at all.
    pub fn get(&self, coords: Coord2) -> Option<CellState> {
        self.index(coords).map(|idx| self.cells[idx])
    }

    /// False for off-board positions and blocked cells.
    pub fn is_playable(&self, coords: Coord2) -> bool {
        self.get(coords).is_some_and(CellState::is_playable)
    }

    pub fn is_empty_cell(&self, coords: Coord2) -> bool {
        matches!(self.get(coords), Some(CellState::Empty))
    }

    pub fn piece_at(&self, coords: Coord2) -> Option<Piece> {
        self.get(coords).and_then(CellState::piece)
    }

    pub fn kind_at(&self, coords: Coord2) -> Option<PieceType> {
        self.get(coords).and_then(CellState::kind)
    }

    /// Places `piece` at `coords`, or clears the cell with `None`.
    ///
    /// Returns false, changing nothing, when `coords` is off-board or blocked.
    /// Panics if the piece's stored position disagrees with `coords`.
    pub fn set(&mut self, coords: Coord2, piece: Option<Piece>) -> bool {
        let Some(idx) = self.index(coords) else {
            return false;
        };
        if !self.cells[idx].is_playable() {
            return false;
        }
        self.cells[idx] = match piece {
            Some(piece) => {
                assert_eq!(
                    piece.position, coords,
                    "piece {:?} stored at a cell that disagrees with its position",
                    piece.id
                );
                CellState::Occupied(piece)
            }
            None => CellState::Empty,
        };
        true
    }

    /// Removes and returns the piece at `coords`, leaving the cell empty.
    pub fn take(&mut self, coords: Coord2) -> Option<Piece> {
        let piece = self.piece_at(coords)?;
        self.set(coords, None);
        Some(piece)
    }

    /// Moves the piece at `from` into the empty playable cell `to` and returns it with
    /// its updated position. Panics when the move would corrupt the board.
    pub fn move_piece(&mut self, from: Coord2, to: Coord2) -> Piece {
        assert!(self.is_empty_cell(to), "move target {to:?} is not an empty cell");
        let mut piece = self
            .take(from)
            .unwrap_or_else(|| panic!("move source {from:?} holds no piece"));
        piece.position = to;
        self.set(to, Some(piece));
        piece
    }

    /// Exchanges the pieces at two occupied cells. Returns false, changing nothing, when
    /// either cell holds no piece.
    pub fn swap_pieces(&mut self, a: Coord2, b: Coord2) -> bool {
        let (Some(mut first), Some(mut second)) = (self.piece_at(a), self.piece_at(b)) else {
            return false;
        };
        first.position = b;
        second.position = a;
        self.set(a, Some(second));
        self.set(b, Some(first));
        true
    }

    /// Every on-board position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Coord2> + use<> {
        let (width, height) = self.size();
        (0..height).flat_map(move |row| (0..width).map(move |col| (col, row)))
    }

    pub fn pieces(&self) -> impl Iterator<Item = Piece> + '_ {
        self.cells.iter().filter_map(|cell| cell.piece())
    }

    /// Number of playable cells holding no piece.
    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_empty()).count()
    }

    /// True when the board's blocked cells are exactly the layout's blocked cells.
    pub fn matches_layout(&self, layout: &Array2<LayoutCell>) -> bool {
        self.cells.dim() == layout.dim()
            && self
                .cells
                .iter()
                .zip(layout.iter())
                .all(|(cell, code)| cell.is_playable() == !matches!(code, LayoutCell::Blocked))
    }

    pub(crate) fn max_piece_id(&self) -> Option<PieceId> {
        self.pieces().map(|piece| piece.id).max()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, line) in self.cells.rows().into_iter().enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            for cell in line.iter() {
                let ch = match cell {
                    CellState::Blocked => '#',
                    CellState::Empty => '.',
                    CellState::Occupied(piece) if piece.kind.index() < 26 => {
                        (b'A' + piece.kind.index() as u8) as char
                    }
                    CellState::Occupied(_) => '?',
                };
                write!(f, "{ch}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn off_board_and_blocked_are_not_playable() {
        let board = Board::from_ascii(&["A#", ".B"]);

        assert!(board.is_playable((0, 0)));
        assert!(!board.is_playable((1, 0)));
        assert!(!board.is_playable((-1, 0)));
        assert!(!board.is_playable((0, 2)));
        assert_eq!(board.get((5, 5)), None);
        assert_eq!(board.get((0, 1)), Some(CellState::Empty));
    }

    #[test]
    fn set_refuses_blocked_cells() {
        let mut board = Board::from_ascii(&["A#"]);
        let piece = board.piece_at((0, 0)).unwrap();

        assert!(!board.set((1, 0), Some(Piece { position: (1, 0), ..piece })));
        assert_eq!(board.get((1, 0)), Some(CellState::Blocked));
    }

    #[test]
    #[should_panic]
    fn set_rejects_position_mismatch() {
        let mut board = Board::from_ascii(&["A."]);
        let piece = board.piece_at((0, 0)).unwrap();

        board.set((1, 0), Some(piece));
    }

    #[test]
    fn move_piece_updates_stored_position() {
        let mut board = Board::from_ascii(&["A", "."]);

        let moved = board.move_piece((0, 0), (0, 1));

        assert_eq!(moved.position, (0, 1));
        assert_eq!(board.piece_at((0, 1)), Some(moved));
        assert!(board.is_empty_cell((0, 0)));
    }

    #[test]
    fn swap_requires_two_pieces() {
        let mut board = Board::from_ascii(&["AB."]);

        assert!(board.swap_pieces((0, 0), (1, 0)));
        assert_eq!(board.to_string(), "BA.");
        assert!(!board.swap_pieces((1, 0), (2, 0)));
        assert_eq!(board.to_string(), "BA.");
        assert_eq!(board.piece_at((0, 0)).unwrap().position, (0, 0));
    }

    #[test]
    fn count_empty_skips_blocked_cells() {
        let board = Board::from_ascii(&["#.A", "..#"]);

        assert_eq!(board.count_empty(), 3);
    }

    #[test]
    fn display_round_trips_ascii() {
        let board = Board::from_ascii(&["#AB", "C.#"]);

        assert_eq!(board.to_string(), "#AB\nC.#");
    }
}
