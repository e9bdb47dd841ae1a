//! Usage log models: device-level VR logs and user-level content logs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vrlog_core::export::LogExportRow;
use vrlog_core::types::{DbId, Timestamp};
use vrlog_core::usage_stats::UsageRecord;

// ---------------------------------------------------------------------------
// VR usage logs
// ---------------------------------------------------------------------------

/// A row from `vr_usage_logs`, joined with the optional owner's username.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VrUsageLog {
    pub id: DbId,
    pub device_id: String,
    pub user_id: Option<DbId>,
    pub username: Option<String>,
    pub content_name: String,
    pub start_time: Timestamp,
    pub end_time: Option<Timestamp>,
    pub duration_minutes: Option<i64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&VrUsageLog> for UsageRecord {
    fn from(log: &VrUsageLog) -> Self {
        UsageRecord {
            content_name: log.content_name.clone(),
            device_id: Some(log.device_id.clone()),
            username: log.username.clone(),
            start_time: log.start_time,
            duration_minutes: log.duration_minutes,
        }
    }
}

impl From<&VrUsageLog> for LogExportRow {
    fn from(log: &VrUsageLog) -> Self {
        LogExportRow {
            device_id: Some(log.device_id.clone()),
            username: log.username.clone(),
            content_name: log.content_name.clone(),
            start_time: log.start_time,
            end_time: log.end_time,
            duration_minutes: log.duration_minutes,
            created_at: log.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateVrLog {
    pub device_id: String,
    pub user_id: Option<DbId>,
    pub content_name: String,
    pub start_time: Timestamp,
    pub end_time: Option<Timestamp>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateVrLog {
    pub device_id: Option<String>,
    pub content_name: Option<String>,
    pub start_time: Option<Timestamp>,
    pub end_time: Option<Timestamp>,
}

/// List filters for `vr_usage_logs`.
#[derive(Debug, Clone, Default)]
pub struct VrLogFilter {
    /// Exact `device_id` match.
    pub device_id: Option<String>,
    /// Case-insensitive substring match on `device_id`.
    pub device_search: Option<String>,
    /// Exact username match.
    pub username: Option<String>,
    pub limit: i64,
}

// ---------------------------------------------------------------------------
// Content usage logs
// ---------------------------------------------------------------------------

/// A row from `content_usage_logs`, joined with the owner's username.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContentUsageLog {
    pub id: DbId,
    pub user_id: DbId,
    pub username: String,
    pub content_name: String,
    pub start_time: Timestamp,
    pub end_time: Option<Timestamp>,
    pub duration_minutes: Option<i64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&ContentUsageLog> for UsageRecord {
    fn from(log: &ContentUsageLog) -> Self {
        UsageRecord {
            content_name: log.content_name.clone(),
            device_id: None,
            username: Some(log.username.clone()),
            start_time: log.start_time,
            duration_minutes: log.duration_minutes,
        }
    }
}

impl From<&ContentUsageLog> for LogExportRow {
    fn from(log: &ContentUsageLog) -> Self {
        LogExportRow {
            device_id: None,
            username: Some(log.username.clone()),
            content_name: log.content_name.clone(),
            start_time: log.start_time,
            end_time: log.end_time,
            duration_minutes: log.duration_minutes,
            created_at: log.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateContentLog {
    pub user_id: DbId,
    pub content_name: String,
    pub start_time: Timestamp,
    pub end_time: Option<Timestamp>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateContentLog {
    pub content_name: Option<String>,
    pub start_time: Option<Timestamp>,
    pub end_time: Option<Timestamp>,
}

/// List filters for `content_usage_logs`.
#[derive(Debug, Clone, Default)]
pub struct ContentLogFilter {
    /// Exact username match.
    pub username: Option<String>,
    /// Case-insensitive substring match on the username.
    pub user_search: Option<String>,
    /// Half-open `[start, end)` window on `start_time`.
    pub window: Option<(Timestamp, Timestamp)>,
    pub limit: i64,
}
