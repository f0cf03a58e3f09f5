//! Client side of the completion gateway.

use crate::api_types::{ChatReply, ChatRequest};
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use sage_core::GatewayError;
use serde::Deserialize;
use std::time::Duration;

/// Anything that can answer a chat request the way `POST /api/chat` does.
#[async_trait]
pub trait RemoteCompletion: Send + Sync {
    async fn complete(&self, request: ChatRequest) -> Result<ChatReply, GatewayError>;
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<String>,
}

/// Talks to a running gateway over HTTP.
#[derive(Debug, Clone)]
pub struct HttpGatewayClient {
    client: Client,
    endpoint: String,
}

impl HttpGatewayClient {
    /// `base_url` is the gateway origin, e.g. `http://127.0.0.1:3000`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            endpoint: format!("{}/api/chat", base_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RemoteCompletion for HttpGatewayClient {
    async fn complete(&self, request: ChatRequest) -> Result<ChatReply, GatewayError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .ok()
                .and_then(|e| e.error);
            return Err(GatewayError::from_status(status.as_u16(), message));
        }

        let reply: ChatReply = response
            .json()
            .await
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;
        if reply.message.trim().is_empty() {
            return Err(GatewayError::MalformedResponse("empty message".into()));
        }
        Ok(reply)
    }
}
