//! BoardBench LLM - Language-model agents
//!
//! - `LlmConfig` and `RetryPolicy` for model and transport settings
//! - `CompletionClient` with a blocking OpenAI-compatible implementation
//! - Prompt rendering and `MOVE: <index>` reply parsing
//! - `LlmAgent`, which plugs into any `Game`

pub mod agent;
pub mod client;
pub mod config;
pub mod prompt;

pub use agent::LlmAgent;
pub use client::{CompletionClient, LlmError, OpenAiClient};
pub use config::{LlmConfig, RetryPolicy, API_KEY_ENV, DEFAULT_MODEL, DEFAULT_SYSTEM_PROMPT};
pub use prompt::{build_prompt, parse_move_index};
