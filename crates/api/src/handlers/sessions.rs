//! Liveness endpoints for dashboard sessions: browser signals, the
//! page-unload beacon, and client-side remote validation.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use vrlog_core::error::CoreError;
use vrlog_core::session_liveness::{EndReason, SessionSignal};
use vrlog_core::types::{DbId, Timestamp};
use vrlog_db::models::session::remote_state;
use vrlog_db::repositories::SessionRepo;

use crate::background::session_liveness::record_logout;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SignalRequest {
    pub signal: SessionSignal,
}

/// Liveness state after a signal.
#[derive(Debug, Serialize)]
pub struct SignalResponse {
    /// `"active"` or `"ended"`.
    pub state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<EndReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<Timestamp>,
}

impl SignalResponse {
    fn active() -> Self {
        Self {
            state: "active",
            reason: None,
            ended_at: None,
        }
    }

    fn ended(reason: Option<EndReason>, at: Timestamp) -> Self {
        Self {
            state: "ended",
            reason,
            ended_at: Some(at),
        }
    }
}

/// Remote view of a session row.
#[derive(Debug, Serialize)]
pub struct SessionStatus {
    pub active: bool,
    pub logout_time: Option<Timestamp>,
}

/// Callers may only signal their own session; admins may signal any.
fn ensure_owner(user: &AuthUser, session_id: DbId) -> Result<(), CoreError> {
    if user.session_id == session_id || user.is_admin() {
        Ok(())
    } else {
        Err(CoreError::Forbidden("Not your session".into()))
    }
}

/// POST /api/v1/sessions/{id}/signal
///
/// Sessions unknown to the tracker (e.g. after a restart) are picked up
/// again from the store when their row is still open.
pub async fn signal(
    State(state): State<AppState>,
    user: AuthUser,
    Path(session_id): Path<DbId>,
    Json(input): Json<SignalRequest>,
) -> AppResult<Json<DataResponse<SignalResponse>>> {
    ensure_owner(&user, session_id)?;
    let now = Utc::now();

    if !state.tracker.contains(session_id).await {
        let row = SessionRepo::find_by_id(&state.pool, session_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Session",
                id: session_id,
            })?;
        if let Some(logout_time) = row.logout_time {
            return Ok(Json(DataResponse {
                data: SignalResponse::ended(None, logout_time),
            }));
        }
        state.tracker.start(session_id, row.user_id, now).await;
    }

    let data = match state.tracker.signal(session_id, input.signal, now).await? {
        Some(ended) => {
            record_logout(&state.pool, session_id, &ended).await;
            SignalResponse::ended(Some(ended.reason), ended.at)
        }
        None => SignalResponse::active(),
    };

    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/sessions/{id}/beacon
///
/// Fire-and-forget page-unload notice. Always answers 202; the logout write
/// runs in the background and failures are only logged.
pub async fn beacon(State(state): State<AppState>, Path(session_id): Path<DbId>) -> StatusCode {
    let now = Utc::now();
    tokio::spawn(async move {
        let ended = state
            .tracker
            .end(session_id, EndReason::PageUnload, now)
            .await;
        match ended {
            Some(ended) => record_logout(&state.pool, session_id, &ended).await,
            None => {
                if let Err(e) = SessionRepo::end(&state.pool, session_id, now).await {
                    tracing::warn!(%session_id, error = %e, "Beacon logout write failed");
                }
            }
        }
    });
    StatusCode::ACCEPTED
}

/// GET /api/v1/sessions/{id}/status
///
/// Re-fetches the row and feeds the result to the tracker, so a session
/// closed elsewhere ends locally too.
pub async fn status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(session_id): Path<DbId>,
) -> AppResult<Json<DataResponse<SessionStatus>>> {
    ensure_owner(&user, session_id)?;
    let now = Utc::now();

    let row = SessionRepo::find_by_id(&state.pool, session_id).await?;
    state
        .tracker
        .apply_remote(session_id, remote_state(row.as_ref()), now)
        .await;

    let row = row.ok_or(CoreError::NotFound {
        entity: "Session",
        id: session_id,
    })?;

    Ok(Json(DataResponse {
        data: SessionStatus {
            active: row.is_open(),
            logout_time: row.logout_time,
        },
    }))
}
