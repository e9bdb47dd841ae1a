//! Repository for the `admins` table.

use sqlx::PgPool;
use vrlog_core::types::DbId;

use crate::models::admin::{Admin, CreateAdmin};

const COLUMNS: &str = "id, username, password_hash, created_at, updated_at";

/// Provides lookups and bootstrap for dashboard operators.
pub struct AdminRepo;

impl AdminRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Admin>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM admins WHERE id = $1");
        sqlx::query_as::<_, Admin>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Admin>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM admins WHERE username = $1");
        sqlx::query_as::<_, Admin>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Insert the admin, or replace the password hash if the username is
    /// already present.
    pub async fn upsert(pool: &PgPool, input: &CreateAdmin) -> Result<Admin, sqlx::Error> {
        let query = format!(
            "INSERT INTO admins (username, password_hash)
             VALUES ($1, $2)
             ON CONFLICT ON CONSTRAINT uq_admins_username
             DO UPDATE SET password_hash = EXCLUDED.password_hash
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Admin>(&query)
            .bind(&input.username)
            .bind(&input.password_hash)
            .fetch_one(pool)
            .await
    }
}
