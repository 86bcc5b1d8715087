//! Connect4 rules (gravity drop)

use serde_json::json;

use crate::board::{Board, Cell, PlayerIndex};
use crate::error::GameError;
use crate::game::{parse_index, Game};

pub const DEFAULT_ROWS: usize = 6;
pub const DEFAULT_COLS: usize = 7;
pub const DEFAULT_WIN_LENGTH: usize = 4;

const MOVE_PREFIX: &str = "column ";

/// Connect4 on a configurable grid
#[derive(Clone, Debug)]
pub struct Connect4 {
    rows: usize,
    cols: usize,
    win_length: usize,
}

impl Connect4 {
    pub fn new(rows: usize, cols: usize, win_length: usize) -> Result<Self, GameError> {
        if rows == 0 || cols == 0 || win_length == 0 {
            return Err(GameError::InvalidConfig(
                "rows, columns and win length must be positive".into(),
            ));
        }
        if win_length > rows.max(cols) {
            return Err(GameError::InvalidConfig(format!(
                "win length {win_length} does not fit a {rows}x{cols} board"
            )));
        }
        Ok(Self {
            rows,
            cols,
            win_length,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn win_length(&self) -> usize {
        self.win_length
    }

    /// Lowest empty row in `col`, if the column has room
    fn landing_row(state: &Board, col: usize) -> Option<usize> {
        (0..state.rows())
            .rev()
            .find(|&row| state.get(row, col) == Some(Cell::Empty))
    }
}

impl Default for Connect4 {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            win_length: DEFAULT_WIN_LENGTH,
        }
    }
}

impl Game for Connect4 {
    type Move = usize;

    fn name(&self) -> &str {
        "Connect4"
    }

    fn reset(&self) -> Board {
        Board::new(self.rows, self.cols)
    }

    fn legal_moves(&self, state: &Board, _player: PlayerIndex) -> Vec<usize> {
        (0..state.cols())
            .filter(|&col| state.get(0, col) == Some(Cell::Empty))
            .collect()
    }

    fn apply_move(
        &self,
        state: &Board,
        col: &usize,
        player: PlayerIndex,
    ) -> Result<Board, GameError> {
        let mark = Cell::for_player(player)?;
        let col = *col;
        if col >= state.cols() {
            return Err(GameError::ColumnOutOfRange {
                col,
                cols: state.cols(),
            });
        }

        let row = Self::landing_row(state, col).ok_or(GameError::ColumnFull(col))?;
        let mut next = state.clone();
        next.set(row, col, mark)?;
        Ok(next)
    }

    fn winner(&self, state: &Board) -> Option<PlayerIndex> {
        state.find_run(self.win_length)
    }

    fn display_state(&self, state: &Board) -> String {
        let mut out = String::from(" ");
        for col in 0..state.cols() {
            out.push_str(&format!(" {col} "));
        }
        out.push('\n');

        for row in 0..state.rows() {
            out.push('|');
            for col in 0..state.cols() {
                out.push_str(match state.get(row, col) {
                    Some(Cell::Player1) => " X ",
                    Some(Cell::Player2) => " O ",
                    _ => "   ",
                });
            }
            out.push_str("|\n");
        }

        out.push('+');
        out.push_str(&"---".repeat(state.cols()));
        out.push_str("+\n");
        out
    }

    fn move_to_string(&self, col: &usize) -> String {
        format!("Column {col}")
    }

    fn parse_move(&self, text: &str) -> Result<usize, GameError> {
        let lowered = text.to_lowercase();
        let digits = match lowered.strip_prefix(MOVE_PREFIX) {
            Some(rest) => rest,
            None => lowered.as_str(),
        };
        parse_index(digits, text, "'Column N' or N")
    }

    fn state_snapshot(&self, state: &Board) -> serde_json::Value {
        json!({
            "board": state.to_rows(),
            "dimensions": {
                "rows": self.rows,
                "cols": self.cols,
            },
            "win_length": self.win_length,
        })
    }
}
