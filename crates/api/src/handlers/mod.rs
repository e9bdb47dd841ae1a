pub mod auth;
pub mod content_data;
pub mod content_logs;
pub mod export;
pub mod ingest;
pub mod sessions;
pub mod stats;
pub mod user_sessions;
pub mod vr_logs;

use axum::body::Bytes;
use serde::de::DeserializeOwned;
use vrlog_core::error::CoreError;

use crate::error::{AppError, AppResult};

/// Decode an optional JSON body; an empty body yields `T::default()`.
pub(crate) fn optional_json<T: DeserializeOwned + Default>(body: &Bytes) -> AppResult<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {e}")))
}

/// Trimmed, non-empty required field.
pub(crate) fn required(field: &str, value: &str) -> Result<String, CoreError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CoreError::Validation(format!("{field} required")));
    }
    Ok(value.to_string())
}
