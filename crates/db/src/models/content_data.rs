//! Content catalogue entries.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vrlog_core::types::{DbId, Timestamp};

/// A row from the `content_data` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContentData {
    pub id: DbId,
    pub content_name: String,
    pub content_filename: Option<String>,
    pub description: Option<String>,
    pub file_size: Option<i64>,
    pub file_type: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateContentData {
    pub content_name: String,
    pub content_filename: Option<String>,
    pub description: Option<String>,
    pub file_size: Option<i64>,
    pub file_type: Option<String>,
}

/// Patch DTO; only `Some` fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateContentData {
    pub content_name: Option<String>,
    pub content_filename: Option<String>,
    pub description: Option<String>,
    pub file_size: Option<i64>,
    pub file_type: Option<String>,
}
