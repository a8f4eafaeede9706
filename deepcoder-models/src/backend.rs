//! Backend trait and response types

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ModelError;

/// A single generation response
#[derive(Debug, Clone, Default)]
pub struct ModelResponse {
    /// Assistant text; empty when the provider reported an error
    pub content: String,
    /// Raw provider payload, kept for debugging
    pub raw: Value,
    /// Error the provider reported in-band, if any
    pub error: Option<String>,
}

impl ModelResponse {
    /// A successful response carrying the generated text
    pub fn ok(content: impl Into<String>, raw: Value) -> Self {
        Self {
            content: content.into(),
            raw,
            error: None,
        }
    }

    /// A response the provider flagged as erroneous
    pub fn api_error(message: impl Into<String>, raw: Value) -> Self {
        Self {
            content: String::new(),
            raw,
            error: Some(message.into()),
        }
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Descriptive information about a configured backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    pub provider: &'static str,
    pub model: String,
    pub endpoint: String,
}

/// A text-generation backend the agent can delegate to
///
/// Implementations are expected to be cheap to share behind a `Box` and to
/// keep no per-request state.
#[async_trait]
pub trait ModelBackend: Send + Sync + std::fmt::Debug {
    /// Generate a completion for the prompt
    async fn generate(&self, prompt: &str) -> Result<ModelResponse, ModelError>;

    /// Describe the configured provider, model and endpoint
    fn info(&self) -> ModelInfo;
}
