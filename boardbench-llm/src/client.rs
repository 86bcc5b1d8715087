//! Chat completion clients

use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use crate::config::LlmConfig;

/// Errors from a completion request
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("no API key configured (set OPENAI_API_KEY or pass one explicitly)")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed completion response: {0}")]
    Malformed(String),
}

/// Anything that turns a system + user prompt into a reply
pub trait CompletionClient {
    fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LlmError>;
}

impl<C: CompletionClient + ?Sized> CompletionClient for &C {
    fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LlmError> {
        (**self).complete(system_prompt, user_prompt)
    }
}

impl<C: CompletionClient + ?Sized> CompletionClient for Box<C> {
    fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LlmError> {
        (**self).complete(system_prompt, user_prompt)
    }
}

// ============================================================================
// WIRE TYPES
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

// ============================================================================
// OPENAI CLIENT
// ============================================================================

/// Blocking client for an OpenAI-compatible chat completions endpoint
///
/// Cloning is cheap and shares the underlying connection pool.
#[derive(Clone)]
pub struct OpenAiClient {
    http: reqwest::blocking::Client,
    api_key: String,
    endpoint: String,
    model: String,
    temperature: f32,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl OpenAiClient {
    /// Build a client from config, resolving the API key
    #[instrument(skip(config), fields(model = %config.model))]
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let api_key = config.resolve_api_key().ok_or_else(|| {
            error!("No API key available for LLM client");
            LlmError::MissingApiKey
        })?;

        let http = reqwest::blocking::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        let endpoint = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));
        debug!(endpoint = %endpoint, "Created completion client");

        Ok(Self {
            http,
            api_key,
            endpoint,
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl CompletionClient for OpenAiClient {
    #[instrument(skip(self, system_prompt, user_prompt), fields(model = %self.model))]
    fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            temperature: self.temperature,
        };

        debug!(prompt_len = user_prompt.len(), "Sending completion request");

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .map_err(|e| {
                error!(error = %e, "Completion request failed");
                LlmError::Http(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            error!(status = status.as_u16(), "Completion API returned error status");
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: ChatResponse = response.json().map_err(|e| {
            error!(error = %e, "Failed to decode completion response");
            LlmError::Malformed(e.to_string())
        })?;

        let content = extract_content(body)?;
        debug!(response_len = content.len(), "Received completion");
        Ok(content)
    }
}

fn extract_content(body: ChatResponse) -> Result<String, LlmError> {
    body.choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::Malformed("response has no choices".to_string()))?
        .message
        .content
        .ok_or_else(|| LlmError::Malformed("first choice has no content".to_string()))
}
