//! Login session model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vrlog_core::export::SessionExportRow;
use vrlog_core::session_liveness::RemoteSession;
use vrlog_core::types::{DbId, Timestamp};
use vrlog_core::usage_stats::SessionRecord;

/// A row from the `user_sessions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserSession {
    pub id: DbId,
    pub user_id: DbId,
    pub login_time: Timestamp,
    pub logout_time: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl UserSession {
    pub fn is_open(&self) -> bool {
        self.logout_time.is_none()
    }
}

/// What a re-fetch of the session row says about liveness.
pub fn remote_state(row: Option<&UserSession>) -> RemoteSession {
    match row {
        None => RemoteSession::Missing,
        Some(UserSession {
            logout_time: Some(logout_time),
            ..
        }) => RemoteSession::Closed {
            logout_time: *logout_time,
        },
        Some(_) => RemoteSession::Open,
    }
}

/// A session joined with its owner's username, for list views.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserSessionListItem {
    pub id: DbId,
    pub user_id: DbId,
    pub username: String,
    pub login_time: Timestamp,
    pub logout_time: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl From<&UserSessionListItem> for SessionRecord {
    fn from(s: &UserSessionListItem) -> Self {
        SessionRecord {
            login_time: s.login_time,
            logout_time: s.logout_time,
        }
    }
}

impl From<&UserSessionListItem> for SessionExportRow {
    fn from(s: &UserSessionListItem) -> Self {
        SessionExportRow {
            username: s.username.clone(),
            login_time: s.login_time,
            logout_time: s.logout_time,
            created_at: s.created_at,
        }
    }
}

/// DTO for opening a session. `login_time` defaults to `NOW()`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSession {
    pub user_id: DbId,
    pub login_time: Option<Timestamp>,
    pub logout_time: Option<Timestamp>,
}

/// DTO for editing a session from the dashboard.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSession {
    pub login_time: Option<Timestamp>,
    pub logout_time: Option<Timestamp>,
}

/// List filters for `user_sessions`.
#[derive(Debug, Clone, Default)]
pub struct SessionFilter {
    /// Exact username match.
    pub username: Option<String>,
    /// Case-insensitive substring match on the username.
    pub user_search: Option<String>,
    pub limit: i64,
}
