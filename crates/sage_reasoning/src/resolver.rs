//! Per-session reply orchestration.
//!
//! A session prefers the remote gateway and falls back to the local
//! [`RuleEngine`] the first time the gateway fails. The fallback is permanent
//! for the lifetime of the session.

use crate::api_types::ChatRequest;
use crate::remote::RemoteCompletion;
use crate::rules::RuleEngine;
use crate::session_store::SessionStore;
use sage_core::{GatewayError, Phase, SessionState, Transcript, Turn};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;

pub const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("message is empty")]
    Empty,
    #[error("a reply is already being generated")]
    Busy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    Remote,
    Local,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub source: ReplySource,
}

struct Session {
    state: SessionState,
    transcript: Transcript,
}

pub struct Resolver {
    remote: Option<Arc<dyn RemoteCompletion>>,
    engine: RuleEngine,
    timeout: Duration,
    store: Option<Arc<dyn SessionStore>>,
    session_id: String,
    /// Held for the whole of one submission; `try_lock` failing means busy.
    session: Mutex<Session>,
}

impl Resolver {
    /// `remote = None` starts a session that can only answer locally.
    pub fn new(remote: Option<Arc<dyn RemoteCompletion>>, engine: RuleEngine) -> Self {
        Self {
            remote,
            engine,
            timeout: DEFAULT_REMOTE_TIMEOUT,
            store: None,
            session_id: "default".to_string(),
            session: Mutex::new(Session {
                state: SessionState::new(),
                transcript: Transcript::new(),
            }),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_store(mut self, store: Arc<dyn SessionStore>, session_id: impl Into<String>) -> Self {
        self.store = Some(store);
        self.session_id = session_id.into();
        self
    }

    /// Restore the saved session mode, if any. The phase always starts over
    /// at `Probing`.
    pub async fn restore(&self) -> anyhow::Result<()> {
        let Some(store) = &self.store else {
            return Ok(());
        };
        if let Some(saved) = store.load(&self.session_id).await? {
            let mut session = self.session.lock().await;
            session.state.mode = saved.mode;
            tracing::info!(
                "Restored session '{}' in {} mode",
                self.session_id,
                saved.mode.name()
            );
        }
        Ok(())
    }

    /// Check once whether the gateway answers. Returns the resulting phase.
    pub async fn probe(&self) -> Phase {
        let mut session = self.session.lock().await;
        if session.state.phase != Phase::Probing {
            return session.state.phase;
        }
        match self.call_remote(ChatRequest::probe()).await {
            Ok(_) => {
                session.state.confirm_remote();
                tracing::info!("Gateway reachable, using remote replies");
            }
            Err(e) => {
                if session.state.degrade() {
                    tracing::warn!("Gateway probe failed ({}), switching to local replies", e);
                }
            }
        }
        session.state.phase
    }

    /// Answer one user message. Rejected while another submission is running.
    pub async fn submit(&self, text: &str) -> Result<Reply, SubmitError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SubmitError::Empty);
        }
        let mut guard = self.session.try_lock().map_err(|_| SubmitError::Busy)?;
        let session = &mut *guard;

        session.transcript.push(Turn::user(text));

        if session.state.using_remote() {
            let request = ChatRequest::from_transcript(&session.transcript);
            match self.call_remote(request).await {
                Ok(message) => {
                    session.state.confirm_remote();
                    session.transcript.push(Turn::assistant(message.clone()));
                    return Ok(Reply {
                        text: message,
                        source: ReplySource::Remote,
                    });
                }
                Err(e) => {
                    if session.state.degrade() {
                        tracing::warn!("Gateway failed ({}), switching to local replies", e);
                    }
                }
            }
        }

        let mode_before = session.state.mode;
        let reply = self.engine.respond(&mut session.state, &session.transcript);
        session.transcript.push(Turn::assistant(reply.clone()));

        if session.state.mode != mode_before {
            self.persist(&session.state).await;
        }

        Ok(Reply {
            text: reply,
            source: ReplySource::Local,
        })
    }

    pub async fn state(&self) -> SessionState {
        self.session.lock().await.state
    }

    pub async fn transcript(&self) -> Transcript {
        self.session.lock().await.transcript.clone()
    }

    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }

    async fn call_remote(&self, request: ChatRequest) -> Result<String, GatewayError> {
        let remote = self
            .remote
            .as_ref()
            .ok_or_else(|| GatewayError::Transport("no gateway configured".into()))?;
        match tokio::time::timeout(self.timeout, remote.complete(request)).await {
            Ok(Ok(reply)) => Ok(reply.message),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(GatewayError::Transport(format!(
                "timed out after {:?}",
                self.timeout
            ))),
        }
    }

    async fn persist(&self, state: &SessionState) {
        if let Some(store) = &self.store {
            if let Err(e) = store.save(&self.session_id, state).await {
                tracing::warn!("Failed to save session '{}': {}", self.session_id, e);
            }
        }
    }
}
