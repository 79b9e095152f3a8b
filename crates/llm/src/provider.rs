use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A chat message for the completion service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Fixed generation parameters sent with every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationParams {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 1024,
        }
    }
}

impl From<&docchat_core::config::LlmConfig> for GenerationParams {
    fn from(cfg: &docchat_core::config::LlmConfig) -> Self {
        Self {
            temperature: cfg.temperature,
            top_k: cfg.top_k,
            top_p: cfg.top_p,
            max_output_tokens: cfg.max_output_tokens,
        }
    }
}

/// Trait for completion-service backends.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a completion request and return the generated text.
    async fn complete(
        &self,
        messages: Vec<Message>,
        params: &GenerationParams,
    ) -> Result<String, LlmError>;
}

/// Classified completion-service failures. Surfaced verbatim to the
/// caller — no silent retry.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("invalid request: {0}")]
    BadRequest(String),
    #[error("invalid API key: {0}")]
    Unauthorized(String),
    #[error("access denied: {0}")]
    Forbidden(String),
    #[error("rate limit exceeded: {0}")]
    RateLimited(String),
    #[error("model not found: {0}")]
    NotFound(String),
    #[error("completion service server error: {0}")]
    ServerError(String),
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("no response candidates from the model")]
    NoResponse,
    #[error("model returned an empty answer")]
    EmptyGeneration,
    #[error("network failure: {0}")]
    Network(#[from] reqwest::Error),
    #[error("provider not configured: {0}")]
    NotConfigured(String),
}

impl LlmError {
    /// Classify a non-200 HTTP status.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            400 => LlmError::BadRequest(body),
            401 => LlmError::Unauthorized(body),
            403 => LlmError::Forbidden(body),
            404 => LlmError::NotFound(body),
            429 => LlmError::RateLimited(body),
            500..=599 => LlmError::ServerError(body),
            _ => LlmError::Api { status, body },
        }
    }
}
