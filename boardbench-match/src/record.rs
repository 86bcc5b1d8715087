//! Match records - per-move history and result summaries

use serde::{Deserialize, Serialize};

use boardbench_core::{Board, PlayerIndex};

/// One accepted move
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub player: PlayerIndex,
    pub agent_name: String,
    /// Move text as rendered by the game
    #[serde(rename = "move")]
    pub mv: String,
    /// Decision time in seconds
    pub time_taken: f64,
}

/// Summary of a finished match
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub match_id: String,
    pub game: String,
    /// RFC 3339 local timestamp
    pub date: String,
    /// Agent names in seat order
    pub agents: Vec<String>,
    /// Accepted moves
    pub moves: usize,
    pub winner: Option<PlayerIndex>,
    pub avg_move_time: f64,
    pub max_move_time: f64,
    /// Consumed turns (accepted + fallback)
    pub turns: usize,
    /// Turns where a fallback move replaced the agent's proposal
    pub rejected_moves: usize,
}

impl MatchResult {
    /// Name of the winning agent, if any
    pub fn winner_name(&self) -> Option<&str> {
        self.winner
            .and_then(|seat| self.agents.get(seat))
            .map(String::as_str)
    }

    /// "Player n (name)" or "Draw"
    pub fn winner_label(&self) -> String {
        match (self.winner, self.winner_name()) {
            (Some(seat), Some(name)) => format!("Player {} ({})", seat + 1, name),
            _ => "Draw".to_string(),
        }
    }
}

/// Everything persisted for a match
#[derive(Clone, Debug, Serialize)]
pub struct MatchLog {
    #[serde(flatten)]
    pub result: MatchResult,
    pub moves_history: Vec<MoveRecord>,
    pub state_history: Vec<Board>,
    /// Game-specific structured snapshot of the last board
    pub final_state: serde_json::Value,
}

/// Average and maximum of the time samples (both 0 when empty)
pub fn time_stats(samples: &[f64]) -> (f64, f64) {
    if samples.is_empty() {
        return (0.0, 0.0);
    }
    let total: f64 = samples.iter().sum();
    let max = samples.iter().copied().fold(0.0, f64::max);
    (total / samples.len() as f64, max)
}
