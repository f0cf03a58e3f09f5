//! Integration tests for the Resolver fallback state machine.
//!
//! The gateway is replaced either by a scripted `RemoteCompletion` or by a
//! wiremock server speaking the `/api/chat` wire format.

use async_trait::async_trait;
use sage_core::{GatewayError, Phase, Role};
use sage_reasoning::api_types::{ChatReply, ChatRequest};
use sage_reasoning::rules::FixedSelector;
use sage_reasoning::{HttpGatewayClient, RemoteCompletion, ReplySource, Resolver, RuleEngine, SubmitError};
use serde_json::json;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Scripted remote
// ============================================================================

struct ScriptedRemote {
    failing: AtomicBool,
    delay: Duration,
    calls: AtomicUsize,
}

impl ScriptedRemote {
    fn healthy() -> Self {
        Self {
            failing: AtomicBool::new(false),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    fn slow(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::healthy()
        }
    }

    fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteCompletion for ScriptedRemote {
    async fn complete(&self, request: ChatRequest) -> Result<ChatReply, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(GatewayError::UpstreamFault);
        }
        let last = request
            .messages
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default();
        Ok(ChatReply {
            message: format!("remote: {}", last),
            usage: Default::default(),
            model: "gpt-3.5-turbo".into(),
            timestamp: chrono::Utc::now(),
        })
    }
}

fn engine() -> RuleEngine {
    RuleEngine::new().with_selector(Arc::new(FixedSelector(0)))
}

// ============================================================================
// Degradation
// ============================================================================

#[tokio::test]
async fn test_degradation_is_one_way() {
    let remote = Arc::new(ScriptedRemote::healthy());
    let resolver = Resolver::new(Some(remote.clone()), engine());

    assert_eq!(resolver.probe().await, Phase::Remote);
    let first = resolver.submit("hello").await.unwrap();
    assert_eq!(first.source, ReplySource::Remote);
    assert_eq!(first.text, "remote: hello");

    remote.set_failing(true);
    let second = resolver.submit("2+2").await.unwrap();
    assert_eq!(second.source, ReplySource::Local);
    assert!(second.text.contains("**4**"));
    assert_eq!(resolver.state().await.phase, Phase::Local);
    let calls_at_failure = remote.calls();

    // The gateway recovers, but the session must not go back to it.
    remote.set_failing(false);
    let third = resolver.submit("hello again").await.unwrap();
    assert_eq!(third.source, ReplySource::Local);
    assert_eq!(remote.calls(), calls_at_failure);
    assert_eq!(resolver.probe().await, Phase::Local);
    assert_eq!(remote.calls(), calls_at_failure);
}

#[tokio::test]
async fn test_failed_probe_goes_local_without_submission() {
    let remote = Arc::new(ScriptedRemote::healthy());
    remote.set_failing(true);
    let resolver = Resolver::new(Some(remote.clone()), engine());

    assert_eq!(resolver.probe().await, Phase::Local);
    resolver.submit("hello").await.unwrap();
    assert_eq!(remote.calls(), 1);
}

#[tokio::test]
async fn test_error_status_from_gateway_degrades_exactly_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({"error": "OpenAI server error. Please try again later."})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpGatewayClient::new(&server.uri(), Duration::from_secs(5)).unwrap();
    let resolver = Resolver::new(Some(Arc::new(client)), engine());

    let first = resolver.submit("what is gravity").await.unwrap();
    assert_eq!(first.source, ReplySource::Local);
    assert!(first.text.contains("Gravity"));

    let second = resolver.submit("thanks").await.unwrap();
    assert_eq!(second.source, ReplySource::Local);
    assert_eq!(resolver.state().await.phase, Phase::Local);
}

#[tokio::test]
async fn test_remote_timeout_counts_as_failure() {
    let remote = Arc::new(ScriptedRemote::slow(Duration::from_millis(500)));
    let resolver =
        Resolver::new(Some(remote), engine()).with_timeout(Duration::from_millis(50));

    let reply = resolver.submit("5 * 3").await.unwrap();
    assert_eq!(reply.source, ReplySource::Local);
    assert!(reply.text.contains("**15**"));
}

// ============================================================================
// Submission rules
// ============================================================================

#[tokio::test]
async fn test_overlapping_submission_is_busy() {
    let remote = Arc::new(ScriptedRemote::slow(Duration::from_millis(300)));
    let resolver = Arc::new(Resolver::new(Some(remote), engine()));

    let first = {
        let resolver = resolver.clone();
        tokio::spawn(async move { resolver.submit("first").await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(resolver.submit("second").await, Err(SubmitError::Busy));

    let reply = first.await.unwrap().unwrap();
    assert_eq!(reply.text, "remote: first");

    let transcript = resolver.transcript().await;
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript.turns()[0].role, Role::User);
    assert_eq!(transcript.turns()[1].role, Role::Assistant);
}

#[tokio::test]
async fn test_transcript_keeps_order() {
    let resolver = Resolver::new(None, engine());
    resolver.submit("hello").await.unwrap();
    resolver.submit("2+2").await.unwrap();

    let transcript = resolver.transcript().await;
    let roles: Vec<Role> = transcript.turns().iter().map(|t| t.role).collect();
    assert_eq!(
        roles,
        vec![Role::User, Role::Assistant, Role::User, Role::Assistant]
    );
    assert_eq!(transcript.turns()[2].content, "2+2");
}

// ============================================================================
// Local answers through the resolver
// ============================================================================

#[tokio::test]
async fn test_follow_up_refers_to_previous_topic() {
    let resolver = Resolver::new(None, engine());
    resolver.submit("what is water").await.unwrap();
    let reply = resolver.submit("yes").await.unwrap();
    assert!(reply.text.to_lowercase().contains("water"));
}

#[tokio::test]
async fn test_lookup_is_case_insensitive() {
    let resolver = Resolver::new(None, engine());
    let upper = resolver.submit("What Is WATER?").await.unwrap();
    let lower = resolver.submit("what is water").await.unwrap();
    assert!(upper.text.contains("Water"));
    assert_eq!(upper.text, lower.text);
}

#[tokio::test]
async fn test_substring_lookup() {
    let resolver = Resolver::new(None, engine());
    let reply = resolver.submit("explain machine learning models").await.unwrap();
    assert!(reply.text.contains("Machine Learning"));
}
