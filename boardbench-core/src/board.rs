//! Rectangular board grid and the shared win scan

use serde::{Serialize, Serializer};

use crate::error::GameError;

/// Seat index of a player (0 = first mover)
pub type PlayerIndex = usize;

/// Number of distinct player marks a grid can hold
pub const MAX_PLAYERS: usize = 2;

/// Scan directions as (d_row, d_col)
/// Order matters: it fixes which window is found first.
pub const DIRECTIONS: [(isize, isize); 4] = [
    (0, 1),  // horizontal
    (1, 0),  // vertical
    (1, 1),  // diagonal, descending
    (-1, 1), // diagonal, ascending
];

// ============================================================================
// CELL
// ============================================================================

/// Contents of a single grid cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cell {
    #[default]
    Empty = 0,
    Player1 = 1,
    Player2 = 2,
}

impl Cell {
    /// Mark placed by the player in seat `player`
    pub fn for_player(player: PlayerIndex) -> Result<Self, GameError> {
        match player {
            0 => Ok(Cell::Player1),
            1 => Ok(Cell::Player2),
            other => Err(GameError::InvalidPlayer(other)),
        }
    }

    /// Seat owning this mark, if any
    pub fn owner(self) -> Option<PlayerIndex> {
        match self {
            Cell::Empty => None,
            Cell::Player1 => Some(0),
            Cell::Player2 => Some(1),
        }
    }

    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Cell {
    type Error = GameError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Cell::Empty),
            1 => Ok(Cell::Player1),
            2 => Ok(Cell::Player2),
            other => Err(GameError::InvalidCell(other)),
        }
    }
}

// ============================================================================
// BOARD
// ============================================================================

/// Fixed-size grid of cells (clone to mutate)
///
/// Row 0 is the top row. Dimensions are fixed at construction.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Create an empty board
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Cell::Empty; rows * cols],
        }
    }

    /// Build a board from nested rows of raw cell values
    pub fn from_rows(rows: Vec<Vec<u8>>) -> Result<Self, GameError> {
        let height = rows.len();
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(GameError::InvalidConfig("board must have at least one cell".into()));
        }

        let mut cells = Vec::with_capacity(height * width);
        for (r, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(GameError::RaggedBoard {
                    row: r,
                    expected: width,
                    found: row.len(),
                });
            }
            for value in row {
                cells.push(Cell::try_from(value)?);
            }
        }

        Ok(Self {
            rows: height,
            cols: width,
            cells,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    /// Cell at (row, col), or None when out of bounds
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        if self.in_bounds(row, col) {
            Some(self.cells[row * self.cols + col])
        } else {
            None
        }
    }

    /// Overwrite a cell on an owned board
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) -> Result<(), GameError> {
        if !self.in_bounds(row, col) {
            return Err(GameError::OutOfBounds { row, col });
        }
        self.cells[row * self.cols + col] = cell;
        Ok(())
    }

    /// True when no empty cell remains
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| !c.is_empty())
    }

    /// Empty cells in row-major order
    pub fn empty_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_empty())
            .map(move |(i, _)| (i / self.cols, i % self.cols))
    }

    /// Count of cells holding `cell`
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    /// Deep copy into plain nested rows
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.cols.max(1))
            .map(|row| row.iter().map(|c| c.as_u8()).collect())
            .collect()
    }

    // ========================================================================
    // WIN SCAN
    // ========================================================================

    /// Find an unbroken run of `win_length` marks
    ///
    /// Player 1's mark is scanned before player 2's; within a player, the
    /// directions are scanned in `DIRECTIONS` order. Returns the seat of the
    /// first run found. A full board without a run yields None.
    pub fn find_run(&self, win_length: usize) -> Option<PlayerIndex> {
        if win_length == 0 {
            return None;
        }

        for player in 0..MAX_PLAYERS {
            let mark = match Cell::for_player(player) {
                Ok(mark) => mark,
                Err(_) => continue,
            };
            for &(dr, dc) in &DIRECTIONS {
                for row in 0..self.rows {
                    for col in 0..self.cols {
                        if self.window_matches(row, col, dr, dc, win_length, mark) {
                            return Some(player);
                        }
                    }
                }
            }
        }

        None
    }

    /// Check the window of `len` cells starting at (row, col) along (dr, dc)
    fn window_matches(
        &self,
        row: usize,
        col: usize,
        dr: isize,
        dc: isize,
        len: usize,
        mark: Cell,
    ) -> bool {
        let span = (len - 1) as isize;
        let end_row = row as isize + dr * span;
        let end_col = col as isize + dc * span;
        if end_row < 0
            || end_col < 0
            || end_row >= self.rows as isize
            || end_col >= self.cols as isize
        {
            return false; // window does not fit
        }

        (0..len as isize).all(|step| {
            let r = (row as isize + dr * step) as usize;
            let c = (col as isize + dc * step) as usize;
            self.cells[r * self.cols + c] == mark
        })
    }
}

impl Serialize for Board {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_rows().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(rows: usize, cols: usize, marks: &[(usize, usize, Cell)]) -> Board {
        let mut board = Board::new(rows, cols);
        for &(r, c, cell) in marks {
            board.set(r, c, cell).unwrap();
        }
        board
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new(6, 7);
        assert_eq!(board.rows(), 6);
        assert_eq!(board.cols(), 7);
        assert_eq!(board.count(Cell::Empty), 42);
        assert!(!board.is_full());
    }

    #[test]
    fn test_cell_domain() {
        assert_eq!(Cell::try_from(2).unwrap(), Cell::Player2);
        assert!(matches!(Cell::try_from(3), Err(GameError::InvalidCell(3))));
        assert!(matches!(Cell::for_player(2), Err(GameError::InvalidPlayer(2))));
        assert_eq!(Cell::Player1.owner(), Some(0));
        assert_eq!(Cell::Empty.owner(), None);
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let err = Board::from_rows(vec![vec![0, 0], vec![0]]).unwrap_err();
        assert!(matches!(err, GameError::RaggedBoard { row: 1, .. }));
    }

    #[test]
    fn test_rows_round_trip() {
        let rows = vec![vec![0, 1, 2], vec![2, 1, 0]];
        let board = Board::from_rows(rows.clone()).unwrap();
        assert_eq!(board.to_rows(), rows);
        assert_eq!(serde_json::to_value(&board).unwrap(), serde_json::json!(rows));
    }

    #[test]
    fn test_horizontal_run() {
        let board = board_with(
            5,
            5,
            &[(2, 0, Cell::Player1), (2, 1, Cell::Player1), (2, 2, Cell::Player1)],
        );
        assert_eq!(board.find_run(3), Some(0));
        assert_eq!(board.find_run(4), None);
    }

    #[test]
    fn test_vertical_run() {
        let board = board_with(
            5,
            5,
            &[(0, 2, Cell::Player2), (1, 2, Cell::Player2), (2, 2, Cell::Player2)],
        );
        assert_eq!(board.find_run(3), Some(1));
    }

    #[test]
    fn test_diagonal_runs() {
        let descending = board_with(
            5,
            5,
            &[(0, 0, Cell::Player1), (1, 1, Cell::Player1), (2, 2, Cell::Player1)],
        );
        assert_eq!(descending.find_run(3), Some(0));

        let ascending = board_with(
            5,
            5,
            &[(4, 0, Cell::Player2), (3, 1, Cell::Player2), (2, 2, Cell::Player2)],
        );
        assert_eq!(ascending.find_run(3), Some(1));
    }

    #[test]
    fn test_broken_run_is_not_a_win() {
        let board = board_with(
            5,
            5,
            &[(0, 0, Cell::Player1), (0, 1, Cell::Player2), (0, 2, Cell::Player1)],
        );
        assert_eq!(board.find_run(2), None);
    }

    #[test]
    fn test_player_one_scanned_first() {
        let board = board_with(
            3,
            3,
            &[
                (0, 0, Cell::Player2),
                (0, 1, Cell::Player2),
                (2, 0, Cell::Player1),
                (2, 1, Cell::Player1),
            ],
        );
        assert_eq!(board.find_run(2), Some(0));
    }

    #[test]
    fn test_empty_cells_row_major() {
        let board = board_with(2, 2, &[(0, 1, Cell::Player1)]);
        let empties: Vec<_> = board.empty_cells().collect();
        assert_eq!(empties, vec![(0, 0), (1, 0), (1, 1)]);
    }
}
