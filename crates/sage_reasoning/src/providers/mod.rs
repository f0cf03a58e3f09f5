pub mod mock;
pub mod openai;

pub use mock::MockProvider;
pub use openai::OpenAiClient;

use crate::llm::LlmClient;
use anyhow::{bail, Result};
use sage_core::config::LlmConfig;
use std::sync::Arc;
use std::time::Duration;

/// Build the provider named in the config.
///
/// Returns `Ok(None)` when the OpenAI provider is selected but no API key is
/// configured; the gateway reports that as a configuration error per request
/// instead of refusing to start.
pub fn from_config(cfg: &LlmConfig) -> Result<Option<Arc<dyn LlmClient>>> {
    match cfg.provider.as_str() {
        "mock" => {
            let provider: Arc<dyn LlmClient> = Arc::new(MockProvider::new(&cfg.model));
            Ok(Some(provider))
        }
        "openai" => match cfg.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => {
                let client: Arc<dyn LlmClient> = Arc::new(OpenAiClient::new(
                    key,
                    &cfg.base_url,
                    Duration::from_secs(cfg.timeout_secs),
                )?);
                Ok(Some(client))
            }
            _ => {
                tracing::warn!("OpenAI API key not configured");
                Ok(None)
            }
        },
        other => bail!("Unknown LLM provider: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_without_key_is_none() {
        let cfg = LlmConfig::default();
        assert!(from_config(&cfg).unwrap().is_none());
    }

    #[test]
    fn test_mock_and_keyed_openai_build() {
        let mut cfg = LlmConfig {
            provider: "mock".into(),
            ..Default::default()
        };
        assert!(from_config(&cfg).unwrap().is_some());

        cfg.provider = "openai".into();
        cfg.api_key = Some("sk-test".into());
        assert!(from_config(&cfg).unwrap().is_some());
    }

    #[test]
    fn test_unknown_provider_fails() {
        let cfg = LlmConfig {
            provider: "carrier-pigeon".into(),
            ..Default::default()
        };
        assert!(from_config(&cfg).is_err());
    }
}
