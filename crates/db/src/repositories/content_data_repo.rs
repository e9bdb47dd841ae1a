//! Repository for the `content_data` table.

use sqlx::PgPool;
use vrlog_core::types::DbId;

use crate::models::content_data::{ContentData, CreateContentData, UpdateContentData};

const COLUMNS: &str = "\
    id, content_name, content_filename, description, file_size, file_type, \
    created_at, updated_at";

/// Provides CRUD operations for the content catalogue.
pub struct ContentDataRepo;

impl ContentDataRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateContentData,
    ) -> Result<ContentData, sqlx::Error> {
        let query = format!(
            "INSERT INTO content_data
                (content_name, content_filename, description, file_size, file_type)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContentData>(&query)
            .bind(&input.content_name)
            .bind(input.content_filename.as_deref())
            .bind(input.description.as_deref())
            .bind(input.file_size)
            .bind(input.file_type.as_deref())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ContentData>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM content_data WHERE id = $1");
        sqlx::query_as::<_, ContentData>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List entries, most recently created first.
    pub async fn list(pool: &PgPool, limit: i64) -> Result<Vec<ContentData>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM content_data ORDER BY created_at DESC LIMIT $1"
        );
        sqlx::query_as::<_, ContentData>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Update an entry. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateContentData,
    ) -> Result<Option<ContentData>, sqlx::Error> {
        let query = format!(
            "UPDATE content_data SET
                content_name = COALESCE($2, content_name),
                content_filename = COALESCE($3, content_filename),
                description = COALESCE($4, description),
                file_size = COALESCE($5, file_size),
                file_type = COALESCE($6, file_type)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContentData>(&query)
            .bind(id)
            .bind(input.content_name.as_deref())
            .bind(input.content_filename.as_deref())
            .bind(input.description.as_deref())
            .bind(input.file_size)
            .bind(input.file_type.as_deref())
            .fetch_optional(pool)
            .await
    }

    /// Delete an entry. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM content_data WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
