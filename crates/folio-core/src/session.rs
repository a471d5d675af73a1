//! Per-visitor session state
//!
//! Sessions are keyed by an opaque UUID carried in a cookie and hold the
//! visitor's language. The store is handed to whoever needs it as an
//! `Arc<dyn SessionStore>`; implementations synchronise internally.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;
use uuid::Uuid;

use crate::language::LanguageCode;

pub type SessionId = Uuid;

/// Sessions expire this long after creation unless configured otherwise.
pub const DEFAULT_SESSION_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Start a new, empty session.
    async fn create(&self) -> Result<SessionId>;

    /// Whether `id` names a live (unexpired) session.
    async fn exists(&self, id: SessionId) -> Result<bool>;

    async fn language(&self, id: SessionId) -> Result<Option<LanguageCode>>;

    /// Record the visitor's language. Recreates the session if it has expired.
    async fn set_language(&self, id: SessionId, language: LanguageCode) -> Result<()>;

    /// Drop expired sessions. Returns how many were removed.
    async fn purge_expired(&self) -> Result<usize>;
}

#[derive(Debug, Clone)]
struct SessionRecord {
    language: Option<LanguageCode>,
    expires_at: Instant,
}

impl SessionRecord {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// In-process session store. Nothing survives a restart.
#[derive(Debug)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<SessionId, SessionRecord>>,
    lifetime: Duration,
}

impl MemorySessionStore {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            lifetime,
        }
    }

    /// Number of stored sessions, expired ones included until purged.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    fn fresh_record(&self, language: Option<LanguageCode>) -> SessionRecord {
        SessionRecord {
            language,
            expires_at: Instant::now() + self.lifetime,
        }
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_LIFETIME)
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self) -> Result<SessionId> {
        let id = Uuid::new_v4();
        let record = self.fresh_record(None);
        self.sessions.write().await.insert(id, record);
        tracing::debug!(session_id = %id, "Session created");
        Ok(id)
    }

    async fn exists(&self, id: SessionId) -> Result<bool> {
        let now = Instant::now();
        Ok(self
            .sessions
            .read()
            .await
            .get(&id)
            .is_some_and(|record| record.is_live(now)))
    }

    async fn language(&self, id: SessionId) -> Result<Option<LanguageCode>> {
        let now = Instant::now();
        Ok(self
            .sessions
            .read()
            .await
            .get(&id)
            .filter(|record| record.is_live(now))
            .and_then(|record| record.language))
    }

    async fn set_language(&self, id: SessionId, language: LanguageCode) -> Result<()> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(&id) {
            Some(record) if record.is_live(now) => record.language = Some(language),
            _ => {
                sessions.insert(id, self.fresh_record(Some(language)));
            }
        }
        Ok(())
    }

    async fn purge_expired(&self) -> Result<usize> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, record| record.is_live(now));
        Ok(before - sessions.len())
    }
}

/// Purge expired sessions every `interval`, forever.
pub async fn run_session_sweeper(store: Arc<dyn SessionStore>, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    // The first tick completes immediately.
    ticker.tick().await;
    loop {
        ticker.tick().await;
        match store.purge_expired().await {
            Ok(0) => {}
            Ok(purged) => tracing::debug!(purged, "Expired sessions purged"),
            Err(e) => tracing::warn!(error = %e, "Session sweep failed"),
        }
    }
}
