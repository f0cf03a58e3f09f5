use crate::api_types::{ChatMessage, Usage};
use async_trait::async_trait;
use thiserror::Error;

/// Generation parameters for one completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionParams {
    pub model: String,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Sampling temperature (0.0 - 2.0)
    pub temperature: f32,
}

impl Default for CompletionParams {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            max_tokens: 1000,
            temperature: 0.7,
        }
    }
}

/// Text produced by a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    pub usage: Usage,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The provider answered with a non-2xx status.
    #[error("provider returned HTTP {status}: {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },
    #[error("failed to reach provider: {0}")]
    Transport(String),
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a chat completion request.
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        params: CompletionParams,
    ) -> Result<Completion, ProviderError>;
}

// Providers available in crate::providers
