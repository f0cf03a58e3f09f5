use thiserror::Error;

pub const MESSAGES_REQUIRED: &str = "Messages array is required";
pub const KEY_NOT_CONFIGURED: &str = "OpenAI API key not configured";

/// Failure taxonomy of the completion gateway.
///
/// The first seven variants are produced by the gateway itself and map to a
/// fixed HTTP status. `Transport` and `MalformedResponse` only occur on the
/// client side, when the gateway cannot be reached or answers garbage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("{0}")]
    InvalidRequest(String),
    #[error("{0}")]
    Misconfigured(String),
    #[error("Invalid API key. Please check your OpenAI API key.")]
    AuthError,
    #[error("Rate limit exceeded. Please try again later.")]
    Throttled,
    #[error("OpenAI server error. Please try again later.")]
    UpstreamFault,
    #[error("Insufficient quota. Please check your OpenAI account billing.")]
    QuotaExceeded,
    #[error("An error occurred while processing your request. Please try again.")]
    UnknownUpstreamError { details: Option<String> },
    #[error("Gateway unreachable: {0}")]
    Transport(String),
    #[error("Malformed gateway response: {0}")]
    MalformedResponse(String),
}

impl GatewayError {
    pub fn missing_messages() -> Self {
        GatewayError::InvalidRequest(MESSAGES_REQUIRED.to_string())
    }

    pub fn missing_key() -> Self {
        GatewayError::Misconfigured(KEY_NOT_CONFIGURED.to_string())
    }

    pub fn unknown(details: impl Into<String>) -> Self {
        GatewayError::UnknownUpstreamError {
            details: Some(details.into()),
        }
    }

    /// HTTP status the gateway answers with for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            GatewayError::InvalidRequest(_) => 400,
            GatewayError::AuthError => 401,
            GatewayError::QuotaExceeded => 402,
            GatewayError::Throttled => 429,
            GatewayError::Misconfigured(_)
            | GatewayError::UpstreamFault
            | GatewayError::UnknownUpstreamError { .. } => 500,
            GatewayError::MalformedResponse(_) => 502,
            GatewayError::Transport(_) => 503,
        }
    }

    /// Rebuild the error from a gateway error response (`status` plus the
    /// `error` field of the body).
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        match status {
            400 => GatewayError::InvalidRequest(
                message.unwrap_or_else(|| MESSAGES_REQUIRED.to_string()),
            ),
            401 => GatewayError::AuthError,
            402 => GatewayError::QuotaExceeded,
            429 => GatewayError::Throttled,
            500 => match message {
                Some(m) if m.contains("not configured") => GatewayError::Misconfigured(m),
                Some(m) if m.contains("server error") => GatewayError::UpstreamFault,
                other => GatewayError::UnknownUpstreamError { details: other },
            },
            _ => GatewayError::UnknownUpstreamError {
                details: Some(match message {
                    Some(m) => format!("HTTP {}: {}", status, m),
                    None => format!("HTTP {}", status),
                }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(GatewayError::missing_messages().status_code(), 400);
        assert_eq!(GatewayError::missing_key().status_code(), 500);
        assert_eq!(GatewayError::AuthError.status_code(), 401);
        assert_eq!(GatewayError::Throttled.status_code(), 429);
        assert_eq!(GatewayError::UpstreamFault.status_code(), 500);
        assert_eq!(GatewayError::QuotaExceeded.status_code(), 402);
        assert_eq!(GatewayError::unknown("boom").status_code(), 500);
    }

    #[test]
    fn test_round_trip_through_status() {
        let cases = vec![
            GatewayError::missing_messages(),
            GatewayError::missing_key(),
            GatewayError::AuthError,
            GatewayError::Throttled,
            GatewayError::UpstreamFault,
            GatewayError::QuotaExceeded,
        ];
        for err in cases {
            let back = GatewayError::from_status(err.status_code(), Some(err.to_string()));
            assert_eq!(back, err);
        }
    }

    #[test]
    fn test_generic_500_decodes_as_unknown() {
        let msg = GatewayError::UnknownUpstreamError { details: None }.to_string();
        let back = GatewayError::from_status(500, Some(msg));
        assert!(matches!(back, GatewayError::UnknownUpstreamError { .. }));
    }

    #[test]
    fn test_unexpected_status_keeps_details() {
        match GatewayError::from_status(418, None) {
            GatewayError::UnknownUpstreamError { details } => {
                assert_eq!(details.as_deref(), Some("HTTP 418"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
