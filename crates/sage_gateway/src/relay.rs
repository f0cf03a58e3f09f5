//! Stateless relay between `POST /api/chat` and the completion provider.

use async_trait::async_trait;
use chrono::Utc;
use sage_core::config::LlmConfig;
use sage_core::GatewayError;
use sage_reasoning::api_types::{ChatReply, ChatRequest};
use sage_reasoning::{providers, CompletionParams, LlmClient, ProviderError, RemoteCompletion};
use std::sync::Arc;

/// Validates a chat request, forwards it to the provider and maps the
/// provider's failures onto [`GatewayError`]. No retries.
pub struct CompletionGateway {
    provider: Option<Arc<dyn LlmClient>>,
    defaults: CompletionParams,
}

impl CompletionGateway {
    /// `provider = None` means no credential is configured; every request
    /// then fails with `Misconfigured`.
    pub fn new(provider: Option<Arc<dyn LlmClient>>, defaults: CompletionParams) -> Self {
        Self { provider, defaults }
    }

    pub fn from_config(cfg: &LlmConfig) -> anyhow::Result<Self> {
        let provider = providers::from_config(cfg)?;
        let defaults = CompletionParams {
            model: cfg.model.clone(),
            max_tokens: cfg.max_tokens,
            temperature: cfg.temperature,
        };
        Ok(Self::new(provider, defaults))
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    pub fn defaults(&self) -> &CompletionParams {
        &self.defaults
    }

    pub async fn complete(&self, request: ChatRequest) -> Result<ChatReply, GatewayError> {
        let params = self.validate(&request)?;
        let provider = self.provider.as_ref().ok_or_else(GatewayError::missing_key)?;

        tracing::debug!(
            "Relaying {} messages to model {}",
            request.messages.len(),
            params.model
        );

        match provider.complete(request.messages, params).await {
            Ok(completion) => Ok(ChatReply {
                message: completion.text,
                usage: completion.usage,
                model: completion.model,
                timestamp: Utc::now(),
            }),
            Err(e) => {
                let mapped = map_provider_error(e);
                tracing::warn!("Completion failed: {:?}", mapped);
                Err(mapped)
            }
        }
    }

    fn validate(&self, request: &ChatRequest) -> Result<CompletionParams, GatewayError> {
        if request.messages.is_empty() {
            return Err(GatewayError::missing_messages());
        }
        let temperature = request.temperature.unwrap_or(self.defaults.temperature);
        if !(0.0..=2.0).contains(&temperature) {
            return Err(GatewayError::InvalidRequest(
                "temperature must be between 0 and 2".to_string(),
            ));
        }
        let max_tokens = request.max_tokens.unwrap_or(self.defaults.max_tokens);
        if max_tokens == 0 {
            return Err(GatewayError::InvalidRequest(
                "max_tokens must be greater than 0".to_string(),
            ));
        }
        Ok(CompletionParams {
            model: request
                .model
                .clone()
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| self.defaults.model.clone()),
            max_tokens,
            temperature,
        })
    }
}

/// Quota exhaustion arrives as HTTP 429 with code `insufficient_quota`, so
/// the code is checked before the status.
pub fn map_provider_error(err: ProviderError) -> GatewayError {
    match err {
        ProviderError::Api { code, .. } if code.as_deref() == Some("insufficient_quota") => {
            GatewayError::QuotaExceeded
        }
        ProviderError::Api { status: 401, .. } => GatewayError::AuthError,
        ProviderError::Api { status: 429, .. } => GatewayError::Throttled,
        ProviderError::Api { status: 500, .. } => GatewayError::UpstreamFault,
        ProviderError::Api { status, message, .. } => {
            GatewayError::unknown(format!("HTTP {}: {}", status, message))
        }
        other => GatewayError::unknown(other.to_string()),
    }
}

/// Lets a resolver run against an in-process gateway without HTTP.
#[async_trait]
impl RemoteCompletion for CompletionGateway {
    async fn complete(&self, request: ChatRequest) -> Result<ChatReply, GatewayError> {
        CompletionGateway::complete(self, request).await
    }
}
