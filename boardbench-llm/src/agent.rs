//! Agent that delegates each decision to a language model

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use boardbench_core::{Agent, AgentError, Board, Game, PlayerIndex};

use crate::client::{CompletionClient, LlmError, OpenAiClient};
use crate::config::{LlmConfig, RetryPolicy};
use crate::prompt::{build_prompt, parse_move_index};

/// LLM-backed agent
///
/// Each turn the board and the indexed legal moves go to the model, which is
/// asked to answer with `MOVE: <index>`. Transport failures are retried per
/// the configured policy; an unusable reply falls back to a random legal move.
pub struct LlmAgent<C: CompletionClient> {
    name: String,
    client: C,
    system_prompt: String,
    retry: RetryPolicy,
    rng: ChaCha8Rng,
}

impl LlmAgent<OpenAiClient> {
    /// Agent talking to an OpenAI-compatible API
    pub fn openai(name: impl Into<String>, config: &LlmConfig) -> Result<Self, LlmError> {
        let client = OpenAiClient::new(config)?;
        Ok(Self::with_client(name, client, config))
    }
}

impl<C: CompletionClient> LlmAgent<C> {
    /// Agent over any completion client
    pub fn with_client(name: impl Into<String>, client: C, config: &LlmConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            name: name.into(),
            client,
            system_prompt: config.system_prompt().to_string(),
            retry: config.retry,
            rng,
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    fn request(&self, prompt: &str) -> Result<String, LlmError> {
        self.retry.run(|attempt| {
            debug!(agent = %self.name, attempt, "Requesting move from model");
            self.client.complete(&self.system_prompt, prompt)
        })
    }
}

impl<G: Game, C: CompletionClient> Agent<G> for LlmAgent<C> {
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

        let prompt = build_prompt(game, state, legal_moves, player);
        let reply = self
            .request(&prompt)
            .map_err(|e| AgentError::Transport(e.to_string()))?;
        debug!(agent = %self.name, reply = %reply, "Model replied");

        match parse_move_index(&reply).and_then(|i| legal_moves.get(i)) {
            Some(mv) => Ok(mv.clone()),
            None => {
                warn!(
                    agent = %self.name,
                    "Failed to parse valid move from LLM response. Using fallback random choice."
                );
                legal_moves
                    .choose(&mut self.rng)
                    .cloned()
                    .ok_or(AgentError::NoLegalMoves)
            }
        }
    }

    fn on_game_start(&mut self, game: &G, player: PlayerIndex) {
        info!(agent = %self.name, game = game.name(), player, "LLM agent joined match");
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
            warn!(agent = %self.name, "Move rejected: {}", message);
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
