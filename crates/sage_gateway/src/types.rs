use chrono::{DateTime, Utc};
use sage_core::GatewayError;
use serde::{Deserialize, Serialize};

/// Body of every non-2xx gateway response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    /// Underlying cause, only filled in when error details are exposed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn method_not_allowed() -> Self {
        Self::new("Method not allowed")
    }

    pub fn from_error(err: &GatewayError, expose_details: bool) -> Self {
        let details = match err {
            GatewayError::UnknownUpstreamError { details } if expose_details => details.clone(),
            _ => None,
        };
        Self {
            error: err.to_string(),
            details,
        }
    }
}

/// `GET /api/test` diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestReport {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub environment: Environment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Environment {
    pub version: String,
    pub platform: String,
    pub has_api_key: bool,
    pub api_key_length: usize,
}

impl TestReport {
    pub fn new(api_key: Option<&str>) -> Self {
        Self {
            status: "success".to_string(),
            message: "API endpoint is working!".to_string(),
            timestamp: Utc::now(),
            environment: Environment {
                version: env!("CARGO_PKG_VERSION").to_string(),
                platform: std::env::consts::OS.to_string(),
                has_api_key: api_key.is_some_and(|k| !k.is_empty()),
                api_key_length: api_key.map(str::len).unwrap_or(0),
            },
        }
    }
}
