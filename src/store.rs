use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::conversation::Conversation;
use crate::error::{AppError, AppResult};
use crate::session::ChatSession;
use crate::view::{ViewAction, ViewState};

pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    last_active_ms: AtomicI64,
    view: RwLock<ViewState>,
    pub chat: ChatSession,
}

impl Session {
    pub async fn view(&self) -> ViewState {
        self.view.read().await.clone()
    }

    pub async fn apply(&self, action: ViewAction) -> AppResult<ViewState> {
        let mut view = self.view.write().await;
        let next = view.apply(action)?;
        *view = next.clone();
        Ok(next)
    }

    pub fn last_active(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.last_active_ms.load(Ordering::Relaxed))
            .unwrap_or(self.created_at)
    }

    fn touch(&self) {
        self.last_active_ms
            .store(Utc::now().timestamp_millis(), Ordering::Relaxed);
    }

    fn idle_since(&self, now_ms: i64) -> Duration {
        let idle = now_ms.saturating_sub(self.last_active_ms.load(Ordering::Relaxed));
        Duration::from_millis(u64::try_from(idle).unwrap_or(0))
    }
}

/// In-memory sessions; nothing survives a restart. Sessions untouched for
/// longer than `idle_ttl` are evicted by [`SessionStore::evict_idle`].
pub struct SessionStore {
    sessions: DashMap<Uuid, Arc<Session>>,
    reply_delay: Duration,
    idle_ttl: Duration,
}

impl SessionStore {
    pub fn new(reply_delay: Duration, idle_ttl: Duration) -> Self {
        SessionStore {
            sessions: DashMap::new(),
            reply_delay,
            idle_ttl,
        }
    }

    pub fn create(&self) -> Arc<Session> {
        let now = Utc::now();
        let session = Arc::new(Session {
            id: Uuid::new_v4(),
            created_at: now,
            last_active_ms: AtomicI64::new(now.timestamp_millis()),
            view: RwLock::new(ViewState::default()),
            chat: ChatSession::spawn(Conversation::seeded(), self.reply_delay),
        });
        self.sessions.insert(session.id, Arc::clone(&session));
        tracing::info!(session_id = %session.id, total = self.sessions.len(), "session created");
        session
    }

    /// Looks a session up and marks it active.
    pub fn get(&self, id: Uuid) -> AppResult<Arc<Session>> {
        let session = self
            .sessions
            .get(&id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(AppError::SessionNotFound(id))?;
        session.touch();
        Ok(session)
    }

    pub async fn remove(&self, id: Uuid) -> AppResult<()> {
        let (_, session) = self
            .sessions
            .remove(&id)
            .ok_or(AppError::SessionNotFound(id))?;
        session.chat.shutdown().await;
        tracing::info!(session_id = %id, "session closed");
        Ok(())
    }

    /// Shuts down every session idle for at least `idle_ttl`; returns how many went.
    pub async fn evict_idle(&self) -> usize {
        let now_ms = Utc::now().timestamp_millis();
        let expired: Vec<Uuid> = self
            .sessions
            .iter()
            .filter(|entry| entry.value().idle_since(now_ms) >= self.idle_ttl)
            .map(|entry| *entry.key())
            .collect();

        let mut evicted = 0;
        for id in expired {
            let stale = self
                .sessions
                .remove_if(&id, |_, session| session.idle_since(now_ms) >= self.idle_ttl);
            if let Some((_, session)) = stale {
                session.chat.shutdown().await;
                tracing::debug!(session_id = %id, "idle session evicted");
                evicted += 1;
            }
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn reply_delay(&self) -> Duration {
        self.reply_delay
    }

    pub fn idle_ttl(&self) -> Duration {
        self.idle_ttl
    }
}

/// Runs [`SessionStore::evict_idle`] every `every` until `cancel` fires.
pub fn spawn_sweeper(
    store: Arc<SessionStore>,
    every: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let evicted = store.evict_idle().await;
                    if evicted > 0 {
                        tracing::info!(evicted, remaining = store.len(), "idle sessions evicted");
                    }
                }
            }
        }
    })
}
