//! Gomoku (five in a row) rules

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;

use crate::board::{Board, Cell, PlayerIndex};
use crate::error::GameError;
use crate::game::{parse_index, Game};

// ============================================================================
// CONSTANTS
// ============================================================================

pub const DEFAULT_BOARD_SIZE: usize = 15;
pub const DEFAULT_WIN_LENGTH: usize = 5;

const EMPTY_GLYPH: &str = "·";
const PLAYER1_GLYPH: &str = "○";
const PLAYER2_GLYPH: &str = "●";

// ============================================================================
// TYPES
// ============================================================================

/// Direct placement at (row, col)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

/// Square-board Gomoku
#[derive(Clone, Debug)]
pub struct Gomoku {
    board_size: usize,
    win_length: usize,
}

impl Gomoku {
    pub fn new(board_size: usize, win_length: usize) -> Result<Self, GameError> {
        if board_size == 0 || win_length == 0 {
            return Err(GameError::InvalidConfig(
                "board size and win length must be positive".into(),
            ));
        }
        if win_length > board_size {
            return Err(GameError::InvalidConfig(format!(
                "win length {win_length} exceeds board size {board_size}"
            )));
        }
        Ok(Self {
            board_size,
            win_length,
        })
    }

    pub fn board_size(&self) -> usize {
        self.board_size
    }

    pub fn win_length(&self) -> usize {
        self.win_length
    }
}

impl Default for Gomoku {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            win_length: DEFAULT_WIN_LENGTH,
        }
    }
}

impl Game for Gomoku {
    type Move = Position;

    fn name(&self) -> &str {
        "Gomoku"
    }

    fn reset(&self) -> Board {
        Board::new(self.board_size, self.board_size)
    }

    fn legal_moves(&self, state: &Board, _player: PlayerIndex) -> Vec<Position> {
        state
            .empty_cells()
            .map(|(row, col)| Position::new(row, col))
            .collect()
    }

    fn apply_move(
        &self,
        state: &Board,
        mv: &Position,
        player: PlayerIndex,
    ) -> Result<Board, GameError> {
        let mark = Cell::for_player(player)?;
        match state.get(mv.row, mv.col) {
            None => Err(GameError::OutOfBounds {
                row: mv.row,
                col: mv.col,
            }),
            Some(cell) if !cell.is_empty() => Err(GameError::Occupied {
                row: mv.row,
                col: mv.col,
            }),
            Some(_) => {
                let mut next = state.clone();
                next.set(mv.row, mv.col, mark)?;
                Ok(next)
            }
        }
    }

    fn winner(&self, state: &Board) -> Option<PlayerIndex> {
        state.find_run(self.win_length)
    }

    fn display_state(&self, state: &Board) -> String {
        let mut out = String::from("  ");
        for col in 0..state.cols() {
            out.push_str(&format!("{col:2}"));
        }
        out.push('\n');

        for row in 0..state.rows() {
            out.push_str(&format!("{row:2}"));
            for col in 0..state.cols() {
                let glyph = match state.get(row, col) {
                    Some(Cell::Player1) => PLAYER1_GLYPH,
                    Some(Cell::Player2) => PLAYER2_GLYPH,
                    _ => EMPTY_GLYPH,
                };
                out.push(' ');
                out.push_str(glyph);
            }
            out.push('\n');
        }
        out
    }

    fn move_to_string(&self, mv: &Position) -> String {
        mv.to_string()
    }

    fn parse_move(&self, text: &str) -> Result<Position, GameError> {
        let parts: Vec<&str> = text.split(',').collect();
        if parts.len() != 2 {
            return Err(GameError::MalformedMove(format!(
                "{text}. Expected 'row,col'"
            )));
        }
        let row = parse_index(parts[0], text, "integers 'row,col'")?;
        let col = parse_index(parts[1], text, "integers 'row,col'")?;
        Ok(Position::new(row, col))
    }

    fn state_snapshot(&self, state: &Board) -> serde_json::Value {
        json!({
            "board": state.to_rows(),
            "board_size": self.board_size,
            "win_length": self.win_length,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::PROBE_PLAYER;

    fn small_game() -> Gomoku {
        Gomoku::new(5, 3).unwrap()
    }

    /// 5x5 board filled with no run of three in any direction
    fn full_board_without_run() -> Board {
        Board::from_rows(vec![
            vec![1, 1, 2, 2, 1],
            vec![2, 2, 1, 1, 2],
            vec![1, 1, 2, 2, 1],
            vec![2, 2, 1, 1, 2],
            vec![1, 1, 2, 2, 1],
        ])
        .unwrap()
    }

    #[test]
    fn test_initialization() {
        let game = Gomoku::default();
        assert_eq!(game.name(), "Gomoku");
        assert_eq!(game.num_players(), 2);
        assert_eq!(game.board_size(), 15);
        assert_eq!(game.win_length(), 5);

        let state = game.reset();
        assert_eq!((state.rows(), state.cols()), (15, 15));
        assert_eq!(state.count(Cell::Empty), 225);
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(Gomoku::new(3, 5), Err(GameError::InvalidConfig(_))));
        assert!(matches!(Gomoku::new(5, 0), Err(GameError::InvalidConfig(_))));
    }

    #[test]
    fn test_legal_moves() {
        let game = small_game();
        let state = game.reset();
        assert_eq!(game.legal_moves(&state, 0).len(), 25);

        let state = game.apply_move(&state, &Position::new(2, 2), 0).unwrap();
        let moves = game.legal_moves(&state, 1);
        assert_eq!(moves.len(), 24);
        assert!(!moves.contains(&Position::new(2, 2)));
    }

    #[test]
    fn test_apply_move_marks_player() {
        let game = small_game();
        let state = game.reset();

        let after_first = game.apply_move(&state, &Position::new(2, 3), 0).unwrap();
        assert_eq!(after_first.get(2, 3), Some(Cell::Player1));

        let after_second = game.apply_move(&after_first, &Position::new(1, 1), 1).unwrap();
        assert_eq!(after_second.get(1, 1), Some(Cell::Player2));
        assert_eq!(after_second.get(2, 3), Some(Cell::Player1));

        // Input untouched
        assert_eq!(state.count(Cell::Empty), 25);
    }

    #[test]
    fn test_invalid_moves_leave_input_untouched() {
        let game = small_game();
        let state = game.apply_move(&game.reset(), &Position::new(2, 2), 0).unwrap();
        let before = state.clone();

        let err = game.apply_move(&state, &Position::new(2, 2), 1).unwrap_err();
        assert!(err.to_string().contains("already occupied"));

        let err = game.apply_move(&state, &Position::new(5, 5), 1).unwrap_err();
        assert!(err.to_string().contains("out of bounds"));

        assert_eq!(state, before);
    }

    #[test]
    fn test_win_detection() {
        let game = small_game();

        let horizontal = Board::from_rows(vec![
            vec![0, 0, 0, 0, 0],
            vec![0, 0, 0, 0, 0],
            vec![1, 1, 1, 0, 0],
            vec![0, 0, 0, 0, 0],
            vec![0, 0, 0, 0, 0],
        ])
        .unwrap();
        assert!(game.is_terminal(&horizontal));
        assert_eq!(game.winner(&horizontal), Some(0));

        let vertical = Board::from_rows(vec![
            vec![0, 0, 2, 0, 0],
            vec![0, 0, 2, 0, 0],
            vec![0, 0, 2, 0, 0],
            vec![0, 0, 0, 0, 0],
            vec![0, 0, 0, 0, 0],
        ])
        .unwrap();
        assert!(game.is_terminal(&vertical));
        assert_eq!(game.winner(&vertical), Some(1));

        let diagonal = Board::from_rows(vec![
            vec![1, 0, 0, 0, 0],
            vec![0, 1, 0, 0, 0],
            vec![0, 0, 1, 0, 0],
            vec![0, 0, 0, 0, 0],
            vec![0, 0, 0, 0, 0],
        ])
        .unwrap();
        assert!(game.is_terminal(&diagonal));
        assert_eq!(game.winner(&diagonal), Some(0));
    }

    #[test]
    fn test_draw_versus_in_progress() {
        let game = small_game();

        let empty = game.reset();
        assert!(!game.is_terminal(&empty));
        assert_eq!(game.winner(&empty), None);

        let full = full_board_without_run();
        assert!(game.legal_moves(&full, PROBE_PLAYER).is_empty());
        assert!(game.is_terminal(&full));
        assert_eq!(game.winner(&full), None);
    }

    #[test]
    fn test_game_in_progress() {
        let game = small_game();
        let mut state = game.reset();
        state = game.apply_move(&state, &Position::new(0, 0), 0).unwrap();
        state = game.apply_move(&state, &Position::new(0, 1), 1).unwrap();
        state = game.apply_move(&state, &Position::new(1, 0), 0).unwrap();

        assert!(!game.is_terminal(&state));
        assert_eq!(game.winner(&state), None);
    }

    #[test]
    fn test_move_text() {
        let game = small_game();
        assert_eq!(game.move_to_string(&Position::new(2, 3)), "2,3");
        assert_eq!(game.parse_move("2,3").unwrap(), Position::new(2, 3));
        assert_eq!(game.parse_move(" 4 , 0 ").unwrap(), Position::new(4, 0));

        assert!(matches!(game.parse_move("invalid"), Err(GameError::MalformedMove(_))));
        assert!(matches!(game.parse_move("1,2,3"), Err(GameError::MalformedMove(_))));
        assert!(matches!(game.parse_move("a,b"), Err(GameError::MalformedMove(_))));
    }

    #[test]
    fn test_move_text_round_trip() {
        let game = small_game();
        let state = game.reset();
        for mv in game.legal_moves(&state, 0) {
            assert_eq!(game.parse_move(&game.move_to_string(&mv)).unwrap(), mv);
        }
    }

    #[test]
    fn test_display_state() {
        let game = small_game();
        let state = game.reset();
        let display = game.display_state(&state);
        assert!(display.contains(EMPTY_GLYPH));
        assert!(!display.contains(PLAYER1_GLYPH));

        let state = game.apply_move(&state, &Position::new(2, 2), 0).unwrap();
        assert!(game.display_state(&state).contains(PLAYER1_GLYPH));
    }

    #[test]
    fn test_state_snapshot() {
        let game = small_game();
        let snapshot = game.state_snapshot(&game.reset());
        assert_eq!(snapshot["board_size"], 5);
        assert_eq!(snapshot["win_length"], 3);
        assert_eq!(snapshot["board"].as_array().unwrap().len(), 5);
    }
}
