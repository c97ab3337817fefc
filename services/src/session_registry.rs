//! In-memory map of browser sessions to their state machines.
//!
//! Each session sits behind its own `Mutex`, so actions within one session are
//! serialized while different sessions proceed independently. Sessions idle for
//! longer than the registry's TTL are treated as gone and are dropped by
//! [`SessionRegistry::sweep_expired`].

use crate::session::{GradingPipeline, SessionController};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use uuid::Uuid;

pub type SessionHandle = Arc<Mutex<SessionController>>;

pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(2 * 60 * 60);

struct Entry {
    handle: SessionHandle,
    last_seen: Instant,
}

impl Entry {
    fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.duration_since(self.last_seen) > ttl
    }

    /// A handler still holds a clone of the handle.
    fn in_use(&self) -> bool {
        Arc::strong_count(&self.handle) > 1
    }
}

#[derive(Clone)]
pub struct SessionRegistry {
    pipeline: GradingPipeline,
    ttl: Duration,
    sessions: Arc<RwLock<HashMap<Uuid, Entry>>>,
}

impl SessionRegistry {
    pub fn new(pipeline: GradingPipeline) -> Self {
        Self::with_ttl(pipeline, DEFAULT_SESSION_TTL)
    }

    pub fn with_ttl(pipeline: GradingPipeline, ttl: Duration) -> Self {
        Self {
            pipeline,
            ttl,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the session for `id`, or a fresh one under a new server-chosen id
    /// when `id` is absent, unknown or expired. Every hit refreshes the idle clock.
    pub async fn get_or_create(&self, id: Option<Uuid>) -> (Uuid, SessionHandle) {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;

        if let Some(id) = id {
            if let Some(entry) = sessions.get_mut(&id) {
                if !entry.is_expired(now, self.ttl) {
                    entry.last_seen = now;
                    return (id, entry.handle.clone());
                }
            }
            if sessions.remove(&id).is_some() {
                tracing::debug!(session = %id, "expired session replaced");
            }
        }

        let id = Uuid::new_v4();
        let handle = Arc::new(Mutex::new(SessionController::new(self.pipeline.clone())));
        sessions.insert(
            id,
            Entry {
                handle: handle.clone(),
                last_seen: now,
            },
        );
        tracing::debug!(session = %id, "session created");
        (id, handle)
    }

    /// Looks up a live session without creating one or refreshing it.
    pub async fn get(&self, id: &Uuid) -> Option<SessionHandle> {
        let now = Instant::now();
        self.sessions
            .read()
            .await
            .get(id)
            .filter(|entry| !entry.is_expired(now, self.ttl))
            .map(|entry| entry.handle.clone())
    }

    /// Drops every idle session past the TTL that no request is currently using.
    /// Returns how many were removed.
    pub async fn sweep_expired(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.in_use() || !entry.is_expired(now, self.ttl));
        let removed = before - sessions.len();
        if removed > 0 {
            tracing::info!(removed, remaining = sessions.len(), "expired sessions swept");
        }
        removed
    }

    /// Runs [`Self::sweep_expired`] every `period` until the runtime shuts down.
    pub fn spawn_sweeper(&self, period: Duration) -> JoinHandle<()> {
        let registry = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                registry.sweep_expired().await;
            }
        })
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
