//! Spreadsheet export.
//!
//! Exports are CSV so they open directly in spreadsheet software. Every
//! loaded row becomes exactly one body line; the header is always present.

use crate::duration::{format_session_duration, IN_PROGRESS, NO_DURATION};
use crate::timestamp::DisplayZone;
use crate::types::Timestamp;

/// Status labels shared by the log and session sheets.
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_ACTIVE: &str = "active";

/// A usage-log row to export.
#[derive(Debug, Clone)]
pub struct LogExportRow {
    pub device_id: Option<String>,
    pub username: Option<String>,
    pub content_name: String,
    pub start_time: Timestamp,
    pub end_time: Option<Timestamp>,
    pub duration_minutes: Option<i64>,
    pub created_at: Timestamp,
}

/// A login-session row to export.
#[derive(Debug, Clone)]
pub struct SessionExportRow {
    pub username: String,
    pub login_time: Timestamp,
    pub logout_time: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// A rectangular sheet of string cells.
#[derive(Debug, Clone)]
pub struct Sheet {
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    /// Number of data rows (header excluded).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Render as CSV, one line per row, header first.
    pub fn to_csv(&self) -> String {
        let mut lines = Vec::with_capacity(self.rows.len() + 1);
        lines.push(
            self.headers
                .iter()
                .map(|h| csv_escape(h))
                .collect::<Vec<_>>()
                .join(","),
        );
        for row in &self.rows {
            lines.push(row.iter().map(|c| csv_escape(c)).collect::<Vec<_>>().join(","));
        }
        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

/// Escape a value for CSV: wrap in quotes if it contains comma, quote, or newline.
fn csv_escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r')
    {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn end_cell(end: Option<Timestamp>, zone: DisplayZone) -> String {
    end.map(|t| zone.format(t))
        .unwrap_or_else(|| IN_PROGRESS.to_string())
}

fn duration_cell(minutes: Option<i64>) -> String {
    minutes
        .map(|m| m.to_string())
        .unwrap_or_else(|| NO_DURATION.to_string())
}

fn status_cell(ended: bool) -> String {
    if ended { STATUS_COMPLETED } else { STATUS_ACTIVE }.to_string()
}

/// Sheet for VR usage logs.
pub fn vr_log_sheet(rows: &[LogExportRow], zone: DisplayZone) -> Sheet {
    Sheet {
        headers: vec![
            "device_id",
            "username",
            "content_name",
            "start_time",
            "end_time",
            "duration_minutes",
            "status",
            "created_at",
        ],
        rows: rows
            .iter()
            .map(|r| {
                vec![
                    r.device_id.clone().unwrap_or_default(),
                    r.username.clone().unwrap_or_default(),
                    r.content_name.clone(),
                    zone.format(r.start_time),
                    end_cell(r.end_time, zone),
                    duration_cell(r.duration_minutes),
                    status_cell(r.end_time.is_some()),
                    zone.format(r.created_at),
                ]
            })
            .collect(),
    }
}

/// Sheet for content usage logs.
pub fn content_log_sheet(rows: &[LogExportRow], zone: DisplayZone) -> Sheet {
    Sheet {
        headers: vec![
            "username",
            "content_name",
            "start_time",
            "end_time",
            "duration_minutes",
            "created_at",
        ],
        rows: rows
            .iter()
            .map(|r| {
                vec![
                    r.username.clone().unwrap_or_else(|| "unknown".to_string()),
                    r.content_name.clone(),
                    zone.format(r.start_time),
                    end_cell(r.end_time, zone),
                    duration_cell(r.duration_minutes),
                    zone.format(r.created_at),
                ]
            })
            .collect(),
    }
}

/// Sheet for login sessions.
pub fn session_sheet(rows: &[SessionExportRow], zone: DisplayZone) -> Sheet {
    Sheet {
        headers: vec![
            "username",
            "login_time",
            "logout_time",
            "session_duration",
            "status",
            "created_at",
        ],
        rows: rows
            .iter()
            .map(|r| {
                vec![
                    r.username.clone(),
                    zone.format(r.login_time),
                    end_cell(r.logout_time, zone),
                    format_session_duration(r.login_time, r.logout_time),
                    status_cell(r.logout_time.is_some()),
                    zone.format(r.created_at),
                ]
            })
            .collect(),
    }
}

/// Download file name: `{kind}_{YYYY-MM-DD}.csv`, dated in the display zone.
pub fn export_file_name(kind: &str, now: Timestamp, zone: DisplayZone) -> String {
    format!("{kind}_{}.csv", zone.date_of(now).format("%Y-%m-%d"))
}
