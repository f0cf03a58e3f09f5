//! Mock LLM Provider: deterministic responses for running without API keys.

use crate::api_types::{ChatMessage, ChatRole, Usage};
use crate::llm::{Completion, CompletionParams, LlmClient, ProviderError};

#[derive(Debug, Clone)]
pub struct MockProvider {
    model: String,
}

impl MockProvider {
    pub fn new(model: &str) -> Self {
        Self {
            model: model.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl LlmClient for MockProvider {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        _params: CompletionParams,
    ) -> Result<Completion, ProviderError> {
        let last = messages
            .iter()
            .rev()
            .find(|m| m.role == ChatRole::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default();
        let text = format!("(Mock {} Response) I received: {}", self.model, last);
        let words = text.split_whitespace().count() as u32;
        Ok(Completion {
            text,
            usage: Usage {
                prompt_tokens: Some(messages.len() as u32),
                completion_tokens: Some(words),
                total_tokens: Some(messages.len() as u32 + words),
            },
            model: self.model.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_complete() {
        let provider = MockProvider::new("test-model");
        let resp = provider
            .complete(vec![ChatMessage::user("hello")], CompletionParams::default())
            .await
            .unwrap();
        assert!(resp.text.contains("Mock"));
        assert!(resp.text.contains("test-model"));
        assert!(resp.text.ends_with("hello"));
        assert_eq!(resp.model, "test-model");
    }
}
