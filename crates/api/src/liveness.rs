//! In-memory registry of open dashboard sessions.
//!
//! Each tracked session owns a [`SessionMonitor`]. Browser signals arrive
//! through the session endpoints; the background sweeper applies deadlines
//! and remote validation. A session leaves the registry on its first
//! transition to `Ended`, so a second trigger for the same session finds
//! nothing and yields no transition.

use std::collections::HashMap;

use tokio::sync::RwLock;
use vrlog_core::error::CoreError;
use vrlog_core::session_liveness::{
    EndReason, Ended, LivenessConfig, RemoteSession, SessionMonitor, SessionSignal,
};
use vrlog_core::types::{DbId, Timestamp};

/// A session under liveness tracking.
#[derive(Debug, Clone)]
pub struct TrackedSession {
    pub user_id: DbId,
    pub monitor: SessionMonitor,
}

/// Thread-safe session registry; designed to be wrapped in `Arc` and shared
/// across the application.
pub struct SessionTracker {
    config: LivenessConfig,
    sessions: RwLock<HashMap<DbId, TrackedSession>>,
}

impl SessionTracker {
    pub fn new(config: LivenessConfig) -> Self {
        Self {
            config,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Begin tracking a session that logged in at `now`. Restarting an
    /// already-tracked session resets its timers.
    pub async fn start(&self, session_id: DbId, user_id: DbId, now: Timestamp) {
        let tracked = TrackedSession {
            user_id,
            monitor: SessionMonitor::new(self.config, now),
        };
        self.sessions.write().await.insert(session_id, tracked);
        tracing::debug!(%session_id, %user_id, "Session tracking started");
    }

    pub async fn contains(&self, session_id: DbId) -> bool {
        self.sessions.read().await.contains_key(&session_id)
    }

    /// Feed a browser signal to a tracked session.
    pub async fn signal(
        &self,
        session_id: DbId,
        signal: SessionSignal,
        now: Timestamp,
    ) -> Result<Option<Ended>, CoreError> {
        let mut sessions = self.sessions.write().await;
        let tracked = sessions.get_mut(&session_id).ok_or(CoreError::NotFound {
            entity: "Session",
            id: session_id,
        })?;

        let ended = tracked.monitor.signal(signal, now);
        if let Some(ended) = ended {
            sessions.remove(&session_id);
            log_ended(session_id, &ended);
        }
        Ok(ended)
    }

    /// Sessions whose remote validation interval has elapsed.
    pub async fn due_for_validation(&self, now: Timestamp) -> Vec<DbId> {
        self.sessions
            .read()
            .await
            .iter()
            .filter(|(_, t)| t.monitor.needs_validation(now))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Apply elapsed deadlines to every session, removing those that ended.
    pub async fn expire_due(&self, now: Timestamp) -> Vec<(DbId, Ended)> {
        let mut sessions = self.sessions.write().await;
        let mut expired = Vec::new();
        for (id, tracked) in sessions.iter_mut() {
            if let Some(ended) = tracked.monitor.check(now) {
                expired.push((*id, ended));
            }
        }
        for (id, ended) in &expired {
            sessions.remove(id);
            log_ended(*id, ended);
        }
        expired
    }

    /// Apply the result of re-fetching a session row. Untracked sessions
    /// yield no transition.
    pub async fn apply_remote(
        &self,
        session_id: DbId,
        remote: RemoteSession,
        now: Timestamp,
    ) -> Option<Ended> {
        let mut sessions = self.sessions.write().await;
        let ended = sessions
            .get_mut(&session_id)?
            .monitor
            .apply_remote(remote, now);
        if let Some(ended) = ended {
            sessions.remove(&session_id);
            log_ended(session_id, &ended);
        }
        ended
    }

    /// End a session explicitly. `None` when it was not tracked or had
    /// already ended.
    pub async fn end(&self, session_id: DbId, reason: EndReason, now: Timestamp) -> Option<Ended> {
        let mut tracked = self.sessions.write().await.remove(&session_id)?;
        let ended = tracked.monitor.end(reason, now);
        if let Some(ended) = &ended {
            log_ended(session_id, ended);
        }
        ended
    }

    /// Stop tracking without recording an ending.
    pub async fn remove(&self, session_id: DbId) -> bool {
        self.sessions.write().await.remove(&session_id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

fn log_ended(session_id: DbId, ended: &Ended) {
    tracing::info!(
        %session_id,
        reason = ended.reason.as_str(),
        at = %ended.at,
        "Session ended",
    );
}
