//! Error types for game rules and agent decisions

/// Errors raised by game rules
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("position ({row}, {col}) is already occupied")]
    Occupied { row: usize, col: usize },

    #[error("position ({row}, {col}) is out of bounds")]
    OutOfBounds { row: usize, col: usize },

    #[error("column {0} is full")]
    ColumnFull(usize),

    #[error("column {col} is out of range (board has {cols} columns)")]
    ColumnOutOfRange { col: usize, cols: usize },

    #[error("invalid player index {0}")]
    InvalidPlayer(usize),

    #[error("invalid move format: {0}")]
    MalformedMove(String),

    #[error("invalid game configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid cell value {0}")]
    InvalidCell(u8),

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedBoard {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Errors an agent may return instead of a move
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AgentError {
    #[error("no legal moves available")]
    NoLegalMoves,

    #[error("no valid moves available after validation")]
    NoValidMoves,

    #[error("completion request failed: {0}")]
    Transport(String),

    #[error("{0}")]
    Other(String),
}
