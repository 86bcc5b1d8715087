//! Configuration for LLM-backed agents

use std::time::Duration;

/// Environment variable consulted when no API key is configured
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

pub const DEFAULT_MODEL: &str = "gpt-4";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an expert game-playing AI. \
You will be given the current state of a board game and a list of legal moves. \
Your task is to analyze the game state and choose the best move from the available options. \
Explain your reasoning briefly and then clearly state your chosen move in the required format.";

/// Bounded retry around a completion request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first (0 is treated as 1)
    pub max_attempts: u32,
    /// Fixed pause between attempts
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Run `op` until it succeeds or attempts run out
    ///
    /// Sleeps `delay` between attempts, never after the last one, and
    /// returns the last error when every attempt fails.
    pub fn run<T, E, F>(&self, mut op: F) -> Result<T, E>
    where
        E: std::fmt::Display,
        F: FnMut(u32) -> Result<T, E>,
    {
        let attempts = self.attempts();
        let mut attempt = 1;
        loop {
            match op(attempt) {
                Ok(value) => return Ok(value),
                Err(e) if attempt < attempts => {
                    tracing::warn!(
                        "API call failed: {}. Retrying in {:?} (attempt {}/{})",
                        e,
                        self.delay,
                        attempt,
                        attempts
                    );
                    if !self.delay.is_zero() {
                        std::thread::sleep(self.delay);
                    }
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}

/// LLM agent configuration
#[derive(Clone, Debug)]
pub struct LlmConfig {
    /// Model name (e.g. "gpt-4")
    pub model: String,
    /// API key; falls back to `OPENAI_API_KEY`
    pub api_key: Option<String>,
    /// Base URL of an OpenAI-compatible API
    pub base_url: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Retry policy for transport failures
    pub retry: RetryPolicy,
    /// Custom system prompt (None = default)
    pub system_prompt: Option<String>,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Seed for the fallback choice (None = random)
    pub seed: Option<u64>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: 0.7,
            retry: RetryPolicy::default(),
            system_prompt: None,
            request_timeout: Duration::from_secs(60),
            seed: None,
        }
    }
}

impl LlmConfig {
    /// Create config for a model
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_retry(mut self, max_attempts: u32, delay: Duration) -> Self {
        self.retry = RetryPolicy::new(max_attempts, delay);
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// System prompt in effect
    pub fn system_prompt(&self) -> &str {
        self.system_prompt.as_deref().unwrap_or(DEFAULT_SYSTEM_PROMPT)
    }

    /// Configured key, else the environment
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .filter(|key| !key.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_llm_config_defaults() {
        let config = LlmConfig::default();
        assert_eq!(config.model, "gpt-4");
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.delay, Duration::from_secs(1));
        assert!(config.system_prompt().contains("expert game-playing AI"));
    }

    #[test]
    fn test_custom_system_prompt() {
        let config = LlmConfig::new("gpt-4o").with_system_prompt("You are a strategic game player.");
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.system_prompt(), "You are a strategic game player.");
    }

    #[test]
    fn test_explicit_key_wins() {
        let config = LlmConfig::default().with_api_key("test-key");
        assert_eq!(config.resolve_api_key().as_deref(), Some("test-key"));
    }

    #[test]
    fn test_retry_succeeds_after_failures() {
        let calls = Cell::new(0);
        let policy = RetryPolicy::new(3, Duration::ZERO);
        let result: Result<&str, String> = policy.run(|_| {
            calls.set(calls.get() + 1);
            if calls.get() < 3 {
                Err("API error".to_string())
            } else {
                Ok("MOVE: 0")
            }
        });
        assert_eq!(result, Ok("MOVE: 0"));
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_retry_returns_last_error() {
        let policy = RetryPolicy::new(2, Duration::ZERO);
        let result: Result<(), String> = policy.run(|attempt| Err(format!("failure {attempt}")));
        assert_eq!(result, Err("failure 2".to_string()));
    }

    #[test]
    fn test_zero_attempts_still_tries_once() {
        let calls = Cell::new(0);
        let policy = RetryPolicy::new(0, Duration::ZERO);
        let _: Result<(), String> = policy.run(|_| {
            calls.set(calls.get() + 1);
            Err("nope".to_string())
        });
        assert_eq!(calls.get(), 1);
    }
}
