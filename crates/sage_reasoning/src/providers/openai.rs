use crate::api_types::{ChatMessage, Usage};
use crate::llm::{Completion, CompletionParams, LlmClient, ProviderError};
use anyhow::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Reply text relayed when the provider returns no content.
pub const EMPTY_REPLY: &str = "No response generated";

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Usage,
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    code: Option<String>,
}

#[async_trait::async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        params: CompletionParams,
    ) -> Result<Completion, ProviderError> {
        let payload = CompletionRequest {
            model: &params.model,
            messages: &messages,
            temperature: params.temperature,
            max_tokens: params.max_tokens,
            stream: false,
        };

        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            // OpenAI wraps errors as {"error": {"message", "type", "code"}}
            let (message, code) = match serde_json::from_str::<ErrorEnvelope>(&error_text) {
                Ok(env) => (env.error.message, env.error.code),
                Err(_) => (error_text, None),
            };
            return Err(ProviderError::Api {
                status: status.as_u16(),
                code,
                message,
            });
        }

        let body: CompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        let text = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| EMPTY_REPLY.to_string());

        Ok(Completion {
            text,
            usage: body.usage,
            model: body.model.unwrap_or(params.model),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> OpenAiClient {
        OpenAiClient::new("sk-test", &format!("{}/v1/", server.uri()), Duration::from_secs(5))
            .unwrap()
    }

    #[tokio::test]
    async fn test_complete_parses_choice_and_usage() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "gpt-3.5-turbo-0125",
                "choices": [{"message": {"role": "assistant", "content": "4"}}],
                "usage": {"prompt_tokens": 9, "completion_tokens": 1, "total_tokens": 10}
            })))
            .mount(&server)
            .await;

        let out = client(&server)
            .complete(vec![ChatMessage::user("2+2?")], CompletionParams::default())
            .await
            .unwrap();
        assert_eq!(out.text, "4");
        assert_eq!(out.model, "gpt-3.5-turbo-0125");
        assert_eq!(out.usage.total_tokens, Some(10));
    }

    #[tokio::test]
    async fn test_empty_content_is_replaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": null}}]
            })))
            .mount(&server)
            .await;

        let out = client(&server)
            .complete(vec![ChatMessage::user("hi")], CompletionParams::default())
            .await
            .unwrap();
        assert_eq!(out.text, EMPTY_REPLY);
        assert_eq!(out.model, "gpt-3.5-turbo");
    }

    #[tokio::test]
    async fn test_error_envelope_keeps_status_and_code() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "error": {"message": "You exceeded your current quota", "type": "insufficient_quota", "code": "insufficient_quota"}
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .complete(vec![ChatMessage::user("hi")], CompletionParams::default())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ProviderError::Api {
                status: 429,
                code: Some("insufficient_quota".into()),
                message: "You exceeded your current quota".into(),
            }
        );
    }

    #[tokio::test]
    async fn test_non_json_success_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client(&server)
            .complete(vec![ChatMessage::user("hi")], CompletionParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Malformed(_)));
    }
}
