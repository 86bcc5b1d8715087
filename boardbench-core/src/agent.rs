//! Agent interface - move proposers driven by a match runner

use crate::board::{Board, PlayerIndex};
use crate::error::AgentError;
use crate::game::Game;

/// Decision-maker seated in a match
///
/// `decide` should return one of `legal_moves`. Returning an error or a move
/// outside the list is tolerated by the runner, which plays a substitute move.
/// The hooks are optional and default to no-ops.
pub trait Agent<G: Game> {
    /// Stable display name
    fn name(&self) -> &str;

    /// Pick a move for `player` from `legal_moves`
    fn decide(
        &mut self,
        game: &G,
        state: &Board,
        legal_moves: &[G::Move],
        player: PlayerIndex,
    ) -> Result<G::Move, AgentError>;

    /// Called once before the first turn
    fn on_game_start(&mut self, _game: &G, _player: PlayerIndex) {}

    /// Called once after the last turn, whatever ended the match
    fn on_game_end(
        &mut self,
        _game: &G,
        _final_state: &Board,
        _winner: Option<PlayerIndex>,
        _player: PlayerIndex,
    ) {
    }

    /// Called after every decision with whether the proposal was accepted
    fn on_move_feedback(
        &mut self,
        _game: &G,
        _state: &Board,
        _proposed: Option<&G::Move>,
        _accepted: bool,
        _message: &str,
    ) {
    }
}
