//! Game rules interface

use std::fmt::Debug;

use crate::board::{Board, PlayerIndex};
use crate::error::GameError;

/// Player probed when checking whether any move remains
///
/// Legality is currently independent of the mover, so a fixed probe is
/// enough to detect a full board.
pub const PROBE_PLAYER: PlayerIndex = 0;

/// Rules engine for a grid game
///
/// Implementations hold only fixed configuration. Every transition takes the
/// current board by reference and returns a fresh one.
pub trait Game {
    /// Game-specific move (column, coordinate, ...)
    type Move: Clone + PartialEq + Debug;

    /// Display name of the game
    fn name(&self) -> &str;

    /// Number of seats the game requires
    fn num_players(&self) -> usize {
        2
    }

    /// Fresh empty board
    fn reset(&self) -> Board;

    /// All moves playable from `state`, in a deterministic order
    fn legal_moves(&self, state: &Board, player: PlayerIndex) -> Vec<Self::Move>;

    /// Apply a move, returning the new board
    fn apply_move(
        &self,
        state: &Board,
        mv: &Self::Move,
        player: PlayerIndex,
    ) -> Result<Board, GameError>;

    /// Seat holding a winning run, if any
    ///
    /// None covers both "still in progress" and "draw"; use `is_terminal`
    /// to tell them apart.
    fn winner(&self, state: &Board) -> Option<PlayerIndex>;

    /// Game over: a winner exists or no move remains
    fn is_terminal(&self, state: &Board) -> bool {
        self.winner(state).is_some() || self.legal_moves(state, PROBE_PLAYER).is_empty()
    }

    /// Human-readable board rendering
    fn display_state(&self, state: &Board) -> String;

    /// Human-readable move text
    fn move_to_string(&self, mv: &Self::Move) -> String;

    /// Parse move text produced by `move_to_string`
    fn parse_move(&self, text: &str) -> Result<Self::Move, GameError>;

    /// Structured, JSON-ready snapshot of a board
    fn state_snapshot(&self, state: &Board) -> serde_json::Value;
}

/// Parse a non-negative integer, tolerating surrounding whitespace
pub(crate) fn parse_index(part: &str, original: &str, expected: &str) -> Result<usize, GameError> {
    part.trim().parse::<usize>().map_err(|_| {
        GameError::MalformedMove(format!("{original}. Expected {expected}"))
    })
}
