//! Random baseline agents

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::agent::Agent;
use crate::board::{Board, PlayerIndex};
use crate::error::AgentError;
use crate::game::Game;

/// Default retry bound carried by `ValidatedRandomAgent`
pub const DEFAULT_MAX_RETRIES: u32 = 3;

// ============================================================================
// RANDOM AGENT
// ============================================================================

/// Picks uniformly among the legal moves
pub struct RandomAgent {
    name: String,
    rng: ChaCha8Rng,
}

impl RandomAgent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Reproducible agent: same seed, same choices
    pub fn with_seed(name: impl Into<String>, seed: u64) -> Self {
        Self {
            name: name.into(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl<G: Game> Agent<G> for RandomAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn decide(
        &mut self,
        _game: &G,
        _state: &Board,
        legal_moves: &[G::Move],
        _player: PlayerIndex,
    ) -> Result<G::Move, AgentError> {
        legal_moves
            .choose(&mut self.rng)
            .cloned()
            .ok_or(AgentError::NoLegalMoves)
    }
}

// ============================================================================
// VALIDATED RANDOM AGENT
// ============================================================================

/// Random agent that re-checks every candidate against the rules
///
/// Validation is a single exhaustive pass; `max_retries` is kept as
/// configuration for parity with other agents.
pub struct ValidatedRandomAgent {
    name: String,
    rng: ChaCha8Rng,
    pub max_retries: u32,
}

impl ValidatedRandomAgent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rng: ChaCha8Rng::from_entropy(),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    pub fn with_seed(name: impl Into<String>, seed: u64) -> Self {
        Self {
            name: name.into(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

impl<G: Game> Agent<G> for ValidatedRandomAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn decide(
        &mut self,
        game: &G,
        state: &Board,
        legal_moves: &[G::Move],
        player: PlayerIndex,
    ) -> Result<G::Move, AgentError> {
        if legal_moves.is_empty() {
            return Err(AgentError::NoLegalMoves);
        }

        // apply_move never touches `state`, so the scratch copy is the result
        let validated: Vec<&G::Move> = legal_moves
            .iter()
            .filter(|mv| game.apply_move(state, mv, player).is_ok())
            .collect();

        validated
            .choose(&mut self.rng)
            .map(|mv| (*mv).clone())
            .ok_or(AgentError::NoValidMoves)
    }

    fn on_move_feedback(
        &mut self,
        _game: &G,
        _state: &Board,
        _proposed: Option<&G::Move>,
        accepted: bool,
        message: &str,
    ) {
        if !accepted {
            tracing::warn!("[{}] Received move feedback - Invalid move: {}", self.name, message);
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
