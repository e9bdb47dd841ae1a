//! Shared query parameter types for API handlers.
//!
//! List endpoints and their CSV exports accept the same filters, so the
//! structs live here rather than in either handler module.

use serde::Deserialize;
use vrlog_core::query::{clamp_limit, MAX_QUERY_LIMIT};

/// Dashboard lists load up to the action API's maximum unless told otherwise.
pub const DASHBOARD_DEFAULT_LIMIT: i64 = MAX_QUERY_LIMIT;

/// `?limit=` on its own.
#[derive(Debug, Default, Deserialize)]
pub struct LimitParams {
    pub limit: Option<i64>,
}

impl LimitParams {
    pub fn resolved(&self) -> i64 {
        dashboard_limit(self.limit)
    }
}

/// Filters for `/vr-logs` and its export.
#[derive(Debug, Default, Deserialize)]
pub struct VrLogListParams {
    /// Case-insensitive substring of `device_id`.
    pub device: Option<String>,
    pub limit: Option<i64>,
}

/// Filters for `/content-logs` and its export.
#[derive(Debug, Default, Deserialize)]
pub struct ContentLogListParams {
    /// Case-insensitive substring of the username.
    pub user: Option<String>,
    /// Calendar month `YYYY-MM` in the display zone.
    pub month: Option<String>,
    pub limit: Option<i64>,
}

/// Filters for `/user-sessions` and its export.
#[derive(Debug, Default, Deserialize)]
pub struct SessionListParams {
    /// Case-insensitive substring of the username.
    pub username: Option<String>,
    pub limit: Option<i64>,
}

/// Clamp a dashboard limit to `[1, MAX_QUERY_LIMIT]`.
pub fn dashboard_limit(limit: Option<i64>) -> i64 {
    clamp_limit(limit, DASHBOARD_DEFAULT_LIMIT, MAX_QUERY_LIMIT)
}

/// Trimmed, non-empty filter value.
pub fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
