//! Duration math and display strings for logs and sessions.

use crate::types::Timestamp;

/// Rendered in place of an end time or duration for open intervals.
pub const IN_PROGRESS: &str = "in progress";

/// Rendered for a log without a usable duration.
pub const NO_DURATION: &str = "-";

/// Whole elapsed minutes between `start` and `end` (floored).
///
/// Mirrors the `duration_minutes` generated column. `None` when the interval
/// is still open.
pub fn duration_minutes(start: Timestamp, end: Option<Timestamp>) -> Option<i64> {
    end.map(|end| (end - start).num_seconds().div_euclid(60))
}

/// Display a log's `duration_minutes`: `-`, `{m}m`, or `{h}h {m}m`.
pub fn format_log_duration(minutes: Option<i64>) -> String {
    match minutes {
        None | Some(0) => NO_DURATION.to_string(),
        Some(m) if m >= 60 => format!("{}h {}m", m / 60, m % 60),
        Some(m) => format!("{m}m"),
    }
}

/// Display a login session's length; open sessions are `in progress`.
pub fn format_session_duration(login: Timestamp, logout: Option<Timestamp>) -> String {
    let Some(logout) = logout else {
        return IN_PROGRESS.to_string();
    };
    let secs = (logout - login).num_seconds().max(0);
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else if minutes > 0 {
        format!("{minutes}m")
    } else {
        format!("{secs}s")
    }
}

/// Compact KPI form used on the overview: `{h}.{tenths}h` or `{m}m`.
pub fn format_minutes_compact(minutes: f64) -> String {
    let minutes = minutes.max(0.0);
    let hours = (minutes / 60.0).floor() as i64;
    let mins = (minutes % 60.0).round() as i64;
    if hours > 0 {
        let tenths = ((mins as f64 / 60.0) * 10.0).round() as i64;
        format!("{hours}.{tenths}h")
    } else {
        format!("{mins}m")
    }
}
