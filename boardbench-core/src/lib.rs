//! BoardBench Core - Grid games and agents
//!
//! This crate provides the rules side of BoardBench:
//! - Board grid with the shared win scan
//! - The `Game` trait with Gomoku and Connect4
//! - The `Agent` trait with random baseline agents

pub mod board;
pub mod error;
pub mod game;
pub mod gomoku;
pub mod connect4;
pub mod agent;
pub mod random;

// Re-exports for convenient access
pub use board::{Board, Cell, PlayerIndex, DIRECTIONS};
pub use error::{AgentError, GameError};
pub use game::{Game, PROBE_PLAYER};
pub use gomoku::{Gomoku, Position};
pub use connect4::Connect4;
pub use agent::Agent;
pub use random::{RandomAgent, ValidatedRandomAgent};
