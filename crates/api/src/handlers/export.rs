//! CSV downloads of the dashboard lists.
//!
//! Every export takes the same query parameters as its list endpoint, so a
//! download contains exactly the rows the dashboard has loaded.

use axum::extract::{Query, State};
use axum::http::header::{HeaderName, HeaderValue, CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use vrlog_core::export::{
    content_log_sheet, export_file_name, session_sheet, vr_log_sheet, LogExportRow,
    SessionExportRow, Sheet,
};
use vrlog_db::repositories::{ContentLogRepo, SessionRepo, VrLogRepo};

use super::{content_logs, user_sessions, vr_logs};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::{ContentLogListParams, SessionListParams, VrLogListParams};
use crate::state::AppState;

/// Response header carrying the number of data rows in the file.
pub const EXPORT_ROWS_HEADER: HeaderName = HeaderName::from_static("x-export-rows");

const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

fn csv_response(sheet: &Sheet, kind: &str, state: &AppState) -> AppResult<Response> {
    let file_name = export_file_name(kind, Utc::now(), state.config.display_zone);
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{file_name}\""))
        .map_err(|e| AppError::InternalError(format!("Invalid export file name: {e}")))?;

    tracing::debug!(kind, rows = sheet.row_count(), "CSV export built");

    Ok((
        [
            (CONTENT_TYPE, HeaderValue::from_static(CSV_CONTENT_TYPE)),
            (CONTENT_DISPOSITION, disposition),
            (EXPORT_ROWS_HEADER, HeaderValue::from(sheet.row_count())),
        ],
        sheet.to_csv(),
    )
        .into_response())
}

/// GET /api/v1/export/vr-logs.csv?device=&limit=
pub async fn vr_logs_csv(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<VrLogListParams>,
) -> AppResult<Response> {
    let logs = VrLogRepo::list(&state.pool, &vr_logs::filter_from(&params)).await?;
    let rows: Vec<LogExportRow> = logs.iter().map(LogExportRow::from).collect();
    csv_response(
        &vr_log_sheet(&rows, state.config.display_zone),
        "vr_logs",
        &state,
    )
}

/// GET /api/v1/export/content-logs.csv?user=&month=&limit=
pub async fn content_logs_csv(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<ContentLogListParams>,
) -> AppResult<Response> {
    let filter = content_logs::filter_from(&params, state.config.display_zone)?;
    let logs = ContentLogRepo::list(&state.pool, &filter).await?;
    let rows: Vec<LogExportRow> = logs.iter().map(LogExportRow::from).collect();
    csv_response(
        &content_log_sheet(&rows, state.config.display_zone),
        "content_logs",
        &state,
    )
}

/// GET /api/v1/export/user-sessions.csv?username=&limit=
pub async fn user_sessions_csv(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<SessionListParams>,
) -> AppResult<Response> {
    let sessions = SessionRepo::list(&state.pool, &user_sessions::filter_from(&params)).await?;
    let rows: Vec<SessionExportRow> = sessions.iter().map(SessionExportRow::from).collect();
    csv_response(
        &session_sheet(&rows, state.config.display_zone),
        "user_sessions",
        &state,
    )
}
