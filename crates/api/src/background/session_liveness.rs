//! Periodic liveness sweep over tracked dashboard sessions.
//!
//! Each tick expires sessions whose deadlines have passed and re-fetches
//! the rows of sessions due for remote validation. Every ending that the
//! store does not already reflect is written as `logout_time`; the write is
//! first-write-wins, so overlapping endings are harmless.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;
use vrlog_core::session_liveness::Ended;
use vrlog_core::types::{DbId, Timestamp};
use vrlog_db::models::session::remote_state;
use vrlog_db::repositories::SessionRepo;

use crate::liveness::SessionTracker;

/// Counts from one sweep.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    /// Sessions ended by an elapsed deadline.
    pub expired: usize,
    /// Sessions ended because the row was gone or already closed.
    pub invalidated: usize,
}

/// Run the sweep loop every `interval` until `cancel` is triggered.
pub async fn run(
    pool: PgPool,
    tracker: Arc<SessionTracker>,
    interval: Duration,
    cancel: CancellationToken,
) {
    tracing::info!(interval_secs = interval.as_secs(), "Session liveness sweeper started");

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Session liveness sweeper stopping");
                break;
            }
            _ = ticker.tick() => {
                let report = sweep(&pool, &tracker, Utc::now()).await;
                if report != SweepReport::default() {
                    tracing::info!(
                        expired = report.expired,
                        invalidated = report.invalidated,
                        "Session liveness: sweep ended sessions"
                    );
                }
            }
        }
    }
}

/// One sweep at `now`. Store failures are logged and skipped.
pub async fn sweep(pool: &PgPool, tracker: &SessionTracker, now: Timestamp) -> SweepReport {
    let mut report = SweepReport::default();

    for (session_id, ended) in tracker.expire_due(now).await {
        record_logout(pool, session_id, &ended).await;
        report.expired += 1;
    }

    for session_id in tracker.due_for_validation(now).await {
        let remote = match SessionRepo::find_by_id(pool, session_id).await {
            Ok(row) => remote_state(row.as_ref()),
            Err(e) => {
                tracing::warn!(%session_id, error = %e, "Session liveness: validation fetch failed");
                continue;
            }
        };

        if let Some(ended) = tracker.apply_remote(session_id, remote, now).await {
            if !ended.reason.is_remote() {
                record_logout(pool, session_id, &ended).await;
            }
            report.invalidated += 1;
        }
    }

    report
}

/// Write `logout_time` for an ended session, logging instead of failing.
pub async fn record_logout(pool: &PgPool, session_id: DbId, ended: &Ended) {
    match SessionRepo::end(pool, session_id, ended.at).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            tracing::debug!(%session_id, "Session liveness: row already gone");
        }
        Err(e) => {
            tracing::error!(
                %session_id,
                reason = ended.reason.as_str(),
                error = %e,
                "Session liveness: failed to record logout"
            );
        }
    }
}
