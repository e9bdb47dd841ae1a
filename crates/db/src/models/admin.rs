//! Dashboard operator accounts.

use sqlx::FromRow;
use vrlog_core::types::{DbId, Timestamp};

/// A row from the `admins` table.
#[derive(Debug, Clone, FromRow)]
pub struct Admin {
    pub id: DbId,
    pub username: String,
    pub password_hash: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

pub struct CreateAdmin {
    pub username: String,
    pub password_hash: String,
}
