//! BoardBench Match - Orchestrating games between agents
//!
//! This crate provides match infrastructure:
//! - A single-use runner that plays one match and records it
//! - JSON match logs
//! - Series of matches with seat alternation
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: the CLI `run` command (orchestration)
//! - Level 2: MatchRunner::run, play_series (phases)
//! - Level 3: play_turn, play_single (steps)
//! - Level 4: records, logging, configuration

mod config;
mod logger;
mod record;
mod runner;
mod series;

pub use config::{MatchConfig, SeriesConfig, DEFAULT_MAX_MOVES};
pub use logger::{JsonFileLogger, LogError, MatchLogger, MemoryLogger};
pub use record::{time_stats, MatchLog, MatchResult, MoveRecord};
pub use runner::{MatchError, MatchPhase, MatchReport, MatchRunner};
pub use series::{play_series, AgentFactory, SeriesResult};
