use crate::relay::CompletionGateway;
use crate::simple::complete_simple;
use crate::types::{ErrorBody, TestReport};
use anyhow::Context;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use sage_core::{GatewayError, SageConfig};
use sage_reasoning::api_types::ChatRequest;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

/// Shared state for the gateway routes. Read-only apart from the counter.
#[derive(Clone)]
struct AppState {
    gateway: Arc<CompletionGateway>,
    api_key: Option<Arc<str>>,
    expose_details: bool,
    /// Requests handled on `/api/chat`, for logging.
    requests: Arc<AtomicU64>,
}

/// The completion gateway HTTP server.
///
/// - `POST /api/chat`: relay a transcript to the completion provider
/// - `POST /api/chat-simple`: canned local replies, no provider
/// - `GET /api/test`: diagnostics
/// - `GET /health`: health check
pub struct GatewayServer {
    gateway: Arc<CompletionGateway>,
    api_key: Option<String>,
    expose_details: bool,
    host: String,
    port: u16,
}

impl GatewayServer {
    pub fn new(gateway: CompletionGateway, host: &str, port: u16) -> Self {
        Self {
            gateway: Arc::new(gateway),
            api_key: None,
            expose_details: false,
            host: host.to_string(),
            port,
        }
    }

    pub fn from_config(cfg: &SageConfig) -> anyhow::Result<Self> {
        let gateway = CompletionGateway::from_config(&cfg.llm)?;
        Ok(Self::new(gateway, &cfg.gateway.host, cfg.gateway.port)
            .with_api_key(cfg.llm.api_key.clone())
            .with_error_details(cfg.gateway.expose_error_details))
    }

    /// Only reported by `/api/test`; the relay already owns its client.
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    pub fn with_error_details(mut self, expose: bool) -> Self {
        self.expose_details = expose;
        self
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn router(&self) -> Router {
        let state = AppState {
            gateway: self.gateway.clone(),
            api_key: self.api_key.as_deref().map(Arc::from),
            expose_details: self.expose_details,
            requests: Arc::new(AtomicU64::new(0)),
        };

        Router::new()
            .route("/health", get(health))
            .route(
                "/api/test",
                get(api_test).options(preflight).fallback(method_not_allowed),
            )
            .route(
                "/api/chat",
                post(chat).options(preflight).fallback(method_not_allowed),
            )
            .route(
                "/api/chat-simple",
                post(chat_simple)
                    .options(preflight)
                    .fallback(method_not_allowed),
            )
            .layer(cors_layer())
            .layer(SetResponseHeaderLayer::if_not_present(
                header::ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static(ALLOWED_METHODS),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static(ALLOWED_HEADERS),
            ))
            .with_state(state)
    }

    /// Bind and serve until the process is stopped.
    pub async fn serve(self) -> anyhow::Result<()> {
        let addr = self.addr();
        let app = self.router();
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Gateway failed to bind {}", addr))?;
        tracing::info!("Gateway listening on {}", addr);
        if !self.gateway.has_provider() {
            tracing::warn!("No completion provider configured; /api/chat will answer 500");
        }
        axum::serve(listener, app)
            .await
            .context("Gateway server error")?;
        Ok(())
    }
}

const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type, Authorization";

/// Answers preflights and sets the origin. The method and header lists are
/// added to every other response by the layers in [`GatewayServer::router`].
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

fn error_response(err: &GatewayError, expose_details: bool) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorBody::from_error(err, expose_details))).into_response()
}

/// Undecodable bodies are reported like a missing `messages` array.
fn rejection_response(rejection: JsonRejection, expose_details: bool) -> Response {
    tracing::debug!("Rejected request body: {}", rejection.body_text());
    let mut body = ErrorBody::from_error(&GatewayError::missing_messages(), false);
    if expose_details {
        body.details = Some(rejection.body_text());
    }
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}

// ============================================================================
// Route handlers
// ============================================================================

async fn health() -> &'static str {
    "ok"
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn method_not_allowed() -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorBody::method_not_allowed()),
    )
}

async fn api_test(State(state): State<AppState>) -> Json<TestReport> {
    Json(TestReport::new(state.api_key.as_deref()))
}

/// POST /api/chat: relay to the completion provider.
async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let n = state.requests.fetch_add(1, Ordering::Relaxed) + 1;
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(rejection, state.expose_details),
    };
    tracing::info!("Chat request #{} with {} messages", n, request.messages.len());

    match state.gateway.complete(request).await {
        Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
        Err(e) => {
            tracing::warn!("Chat request #{} failed: {}", n, e);
            error_response(&e, state.expose_details)
        }
    }
}

/// POST /api/chat-simple: canned replies, same validation as `/api/chat`.
async fn chat_simple(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(rejection, state.expose_details),
    };
    match complete_simple(&request) {
        Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
        Err(e) => error_response(&e, state.expose_details),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sage_reasoning::CompletionParams;

    #[tokio::test]
    async fn test_health_endpoint() {
        assert_eq!(health().await, "ok");
    }

    #[test]
    fn test_from_config_defaults() {
        let server = GatewayServer::from_config(&SageConfig::default()).unwrap();
        assert_eq!(server.addr(), "127.0.0.1:3000");
        assert!(!server.expose_details);
        assert!(!server.gateway.has_provider());
    }

    #[test]
    fn test_builder_flags() {
        let server = GatewayServer::new(
            CompletionGateway::new(None, CompletionParams::default()),
            "0.0.0.0",
            8080,
        )
        .with_error_details(true)
        .with_api_key(Some("sk-test".into()));
        assert!(server.expose_details);
        assert_eq!(server.api_key.as_deref(), Some("sk-test"));
        assert_eq!(server.addr(), "0.0.0.0:8080");
    }
}
