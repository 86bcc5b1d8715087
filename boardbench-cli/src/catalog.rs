//! Names and descriptions of the games and agents the CLI can build
//!
//! Level 4 - Configuration

use clap::ValueEnum;

/// Games selectable with `--game`
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum GameKind {
    Gomoku,
    Connect4,
}

impl GameKind {
    pub const ALL: [GameKind; 2] = [GameKind::Gomoku, GameKind::Connect4];

    /// Name accepted on the command line
    pub fn name(self) -> &'static str {
        match self {
            GameKind::Gomoku => "gomoku",
            GameKind::Connect4 => "connect4",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            GameKind::Gomoku => "Connect 5 stones in a row on a 15x15 grid",
            GameKind::Connect4 => "Connect 4 pieces in a row in a 6x7 grid",
        }
    }
}

/// Agent types selectable with `--agent1` / `--agent2`
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum AgentKind {
    Random,
    #[value(alias = "validated-random")]
    EnforcedRandom,
    Llm,
}

impl AgentKind {
    pub const ALL: [AgentKind; 3] = [AgentKind::Random, AgentKind::EnforcedRandom, AgentKind::Llm];

    /// Name accepted on the command line
    pub fn name(self) -> &'static str {
        match self {
            AgentKind::Random => "random",
            AgentKind::EnforcedRandom => "enforced-random",
            AgentKind::Llm => "llm",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            AgentKind::Random => "Makes random legal moves",
            AgentKind::EnforcedRandom => {
                "Makes random legal moves with extra validation to prevent invalid moves"
            }
            AgentKind::Llm => "Uses OpenAI's API to make decisions",
        }
    }

    pub fn requirements(self) -> &'static str {
        match self {
            AgentKind::Random | AgentKind::EnforcedRandom => "None",
            AgentKind::Llm => "API key",
        }
    }

    /// Display name for the agent given as `--agent{number}`
    pub fn display_name(self, number: usize) -> String {
        let label = match self {
            AgentKind::Random => "Random",
            AgentKind::EnforcedRandom => "EnforcedRandom",
            AgentKind::Llm => "LLM",
        };
        format!("{label} Player {number}")
    }
}
