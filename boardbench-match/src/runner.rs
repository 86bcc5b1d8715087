//! Match runner - plays a single match between seated agents
//!
//! Level 2 - Phase-level implementation
//!
//! The runner owns the turn loop: it asks the seated agent for a move,
//! validates the proposal against the recomputed legal moves, substitutes a
//! random legal move when the proposal is unusable, and records everything
//! for the match log.

use std::path::PathBuf;
use std::time::Instant;

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, info_span, warn};

use boardbench_core::{Agent, Board, Game, GameError, PlayerIndex};

use crate::config::MatchConfig;
use crate::logger::{LogError, MatchLogger};
use crate::record::{time_stats, MatchLog, MatchResult, MoveRecord};

/// Errors that abort a match
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    #[error("{game} requires {required} players, but {provided} agents were provided")]
    PlayerCountMismatch {
        game: String,
        required: usize,
        provided: usize,
    },

    #[error("match has already been run")]
    AlreadyRun,

    #[error("game rules rejected a validated move: {0}")]
    Game(#[from] GameError),

    #[error("failed to save match log: {0}")]
    Log(#[from] LogError),
}

/// Lifecycle of a runner
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchPhase {
    NotStarted,
    Running,
    Finished,
}

/// What `run` hands back
#[derive(Clone, Debug)]
pub struct MatchReport {
    pub result: MatchResult,
    /// Where the logger stored the match log
    pub log_location: PathBuf,
}

/// Single-use orchestrator for one match
pub struct MatchRunner<'a, G: Game> {
    game: &'a G,
    agents: Vec<&'a mut dyn Agent<G>>,
    logger: &'a dyn MatchLogger,
    config: MatchConfig,
    match_id: String,
    phase: MatchPhase,
    rng: ChaCha8Rng,
    moves_history: Vec<MoveRecord>,
    state_history: Vec<Board>,
    move_times: Vec<f64>,
    turns: usize,
    rejected_moves: usize,
}

impl<'a, G: Game> MatchRunner<'a, G> {
    /// Seat `agents` (in order) for a match of `game`
    pub fn new(
        game: &'a G,
        agents: Vec<&'a mut dyn Agent<G>>,
        logger: &'a dyn MatchLogger,
        config: MatchConfig,
    ) -> Result<Self, MatchError> {
        let required = game.num_players();
        if agents.len() != required {
            return Err(MatchError::PlayerCountMismatch {
                game: game.name().to_string(),
                required,
                provided: agents.len(),
            });
        }

        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        Ok(Self {
            game,
            agents,
            logger,
            config,
            match_id: new_match_id(&mut rand::thread_rng()),
            phase: MatchPhase::NotStarted,
            rng,
            moves_history: Vec::new(),
            state_history: Vec::new(),
            move_times: Vec::new(),
            turns: 0,
            rejected_moves: 0,
        })
    }

    pub fn match_id(&self) -> &str {
        &self.match_id
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    /// Accepted moves, in order
    pub fn moves_history(&self) -> &[MoveRecord] {
        &self.moves_history
    }

    /// Every board from the initial one onwards
    pub fn state_history(&self) -> &[Board] {
        &self.state_history
    }

    /// Decision time of each accepted move, in seconds
    pub fn move_times(&self) -> &[f64] {
        &self.move_times
    }

    /// Play the match to completion (Level 2 phase)
    ///
    /// A runner plays exactly once; later calls fail with `AlreadyRun`.
    pub fn run(&mut self) -> Result<MatchReport, MatchError> {
        if self.phase != MatchPhase::NotStarted {
            return Err(MatchError::AlreadyRun);
        }
        self.phase = MatchPhase::Running;

        let span = info_span!("match", id = %self.match_id, game = self.game.name());
        let _guard = span.enter();

        let outcome = self.play();
        self.phase = MatchPhase::Finished;
        outcome
    }

    // ========================================================================
    // Level 3 - Steps
    // ========================================================================

    fn play(&mut self) -> Result<MatchReport, MatchError> {
        let game = self.game;
        let seats = self.agents.len();

        for (seat, agent) in self.agents.iter_mut().enumerate() {
            agent.on_game_start(game, seat);
        }
        info!(agents = ?self.agent_names(), "Match started");

        let mut state = game.reset();
        self.state_history.push(state.clone());

        let mut current: PlayerIndex = 0;
        let mut consecutive_passes = 0;

        while !game.is_terminal(&state) && self.turns < self.config.max_moves {
            let legal = game.legal_moves(&state, current);
            if legal.is_empty() {
                debug!(player = current, "No legal moves, passing");
                consecutive_passes += 1;
                if consecutive_passes >= seats {
                    warn!("Every seat passed in a row, ending match");
                    break;
                }
                current = (current + 1) % seats;
                continue;
            }
            consecutive_passes = 0;

            state = self.play_turn(&state, &legal, current)?;
            current = (current + 1) % seats;
        }

        if self.turns >= self.config.max_moves && !game.is_terminal(&state) {
            info!(max_moves = self.config.max_moves, "Move cap reached");
        }

        let winner = game.winner(&state);
        for (seat, agent) in self.agents.iter_mut().enumerate() {
            agent.on_game_end(game, &state, winner, seat);
        }

        let result = self.build_result(winner);
        info!(
            winner = %result.winner_label(),
            moves = result.moves,
            rejected = result.rejected_moves,
            "Match finished"
        );

        let log = MatchLog {
            result: result.clone(),
            moves_history: self.moves_history.clone(),
            state_history: self.state_history.clone(),
            final_state: game.state_snapshot(&state),
        };
        let log_location = self.logger.log_match(&log)?;

        Ok(MatchReport {
            result,
            log_location,
        })
    }

    /// One consumed turn: decide, validate, apply (Level 3 step)
    fn play_turn(
        &mut self,
        state: &Board,
        legal: &[G::Move],
        player: PlayerIndex,
    ) -> Result<Board, MatchError> {
        let game = self.game;
        let agent = &mut self.agents[player];

        let started = Instant::now();
        let decision = agent.decide(game, state, legal, player);
        let elapsed = started.elapsed().as_secs_f64();

        let rejection = match &decision {
            Ok(mv) if legal.contains(mv) => None,
            Ok(mv) => Some(format!(
                "Move {} is not in the list of legal moves",
                game.move_to_string(mv)
            )),
            Err(e) => Some(format!("Agent error: {e}")),
        };

        let next = match (decision, rejection) {
            (Ok(mv), None) => {
                agent.on_move_feedback(game, state, Some(&mv), true, "");
                let text = game.move_to_string(&mv);
                self.moves_history.push(MoveRecord {
                    player,
                    agent_name: agent.name().to_string(),
                    mv: text.clone(),
                    time_taken: elapsed,
                });
                self.move_times.push(elapsed);

                let next = game.apply_move(state, &mv, player)?;
                info!(
                    player = player + 1,
                    agent = agent.name(),
                    mv = %text,
                    time = elapsed,
                    "Move applied"
                );
                next
            }
            (decision, reason) => {
                let reason = reason.unwrap_or_default();
                warn!(player = player + 1, agent = agent.name(), "{}", reason);
                agent.on_move_feedback(game, state, decision.as_ref().ok(), false, &reason);

                let fallback = legal[self.rng.gen_range(0..legal.len())].clone();
                let next = game.apply_move(state, &fallback, player)?;
                info!(
                    player = player + 1,
                    mv = %game.move_to_string(&fallback),
                    "Fallback move applied"
                );
                self.rejected_moves += 1;
                next
            }
        };

        debug!("\n{}", game.display_state(&next));
        self.turns += 1;
        self.state_history.push(next.clone());
        Ok(next)
    }

    fn build_result(&self, winner: Option<PlayerIndex>) -> MatchResult {
        let (avg_move_time, max_move_time) = time_stats(&self.move_times);
        MatchResult {
            match_id: self.match_id.clone(),
            game: self.game.name().to_string(),
            date: chrono::Local::now().to_rfc3339(),
            agents: self.agent_names(),
            moves: self.moves_history.len(),
            winner,
            avg_move_time,
            max_move_time,
            turns: self.turns,
            rejected_moves: self.rejected_moves,
        }
    }

    fn agent_names(&self) -> Vec<String> {
        self.agents.iter().map(|a| a.name().to_string()).collect()
    }
}

// ============================================================================
// Level 4 - Utilities
// ============================================================================

/// Random version-4 UUID string
fn new_match_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut bytes = [0u8; 16];
    rng.fill_bytes(&mut bytes);
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;

    let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}

// ============================================================================
// TESTS
// ============================================================================
