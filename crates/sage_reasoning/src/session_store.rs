//! Persistence for the per-session profile.
//!
//! Only the [`SessionState`] is stored. Callers decide what to restore from it.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sage_core::SessionState;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, session_id: &str) -> Result<Option<SessionState>>;
    async fn save(&self, session_id: &str, state: &SessionState) -> Result<()>;
}

/// Process-local store, lost on exit.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, SessionState>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, session_id: &str) -> Result<Option<SessionState>> {
        Ok(self.sessions.read().await.get(session_id).copied())
    }

    async fn save(&self, session_id: &str, state: &SessionState) -> Result<()> {
        self.sessions
            .write()
            .await
            .insert(session_id.to_string(), *state);
        Ok(())
    }
}

/// All sessions in one JSON object on disk, keyed by session id.
#[derive(Debug)]
pub struct JsonFileSessionStore {
    path: PathBuf,
    lock: RwLock<()>,
}

impl JsonFileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<HashMap<String, SessionState>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) if raw.trim().is_empty() => Ok(HashMap::new()),
            Ok(raw) => serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse session file {}", self.path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to read session file {}", self.path.display())),
        }
    }
}

#[async_trait]
impl SessionStore for JsonFileSessionStore {
    async fn load(&self, session_id: &str) -> Result<Option<SessionState>> {
        let _guard = self.lock.read().await;
        Ok(self.read_all().await?.get(session_id).copied())
    }

    async fn save(&self, session_id: &str, state: &SessionState) -> Result<()> {
        let _guard = self.lock.write().await;
        let mut all = self.read_all().await?;
        all.insert(session_id.to_string(), *state);

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let json = serde_json::to_string_pretty(&all)?;
        tokio::fs::write(&self.path, json)
            .await
            .with_context(|| format!("Failed to write session file {}", self.path.display()))?;
        tracing::debug!("Saved session '{}' to {}", session_id, self.path.display());
        Ok(())
    }
}
