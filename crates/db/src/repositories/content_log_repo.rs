//! Repository for the `content_usage_logs` table.

use sqlx::PgPool;
use vrlog_core::types::{DbId, Timestamp};

use crate::models::usage_log::{
    ContentLogFilter, ContentUsageLog, CreateContentLog, UpdateContentLog,
};

/// Columns for the username join. Expects `l` as the log row and `u` as the
/// joined user.
const COLUMNS: &str = "\
    l.id, l.user_id, u.username, l.content_name, l.start_time, l.end_time, \
    l.duration_minutes, l.created_at, l.updated_at";

const FROM_JOINED: &str = "FROM l JOIN users u ON u.id = l.user_id";

/// Provides CRUD operations for user-level content usage logs.
pub struct ContentLogRepo;

impl ContentLogRepo {
    /// Insert a log row, returning it with the owner's username.
    pub async fn create(
        pool: &PgPool,
        input: &CreateContentLog,
    ) -> Result<ContentUsageLog, sqlx::Error> {
        let query = format!(
            "WITH l AS (
                INSERT INTO content_usage_logs (user_id, content_name, start_time, end_time)
                VALUES ($1, $2, $3, $4)
                RETURNING *
             )
             SELECT {COLUMNS} {FROM_JOINED}"
        );
        sqlx::query_as::<_, ContentUsageLog>(&query)
            .bind(input.user_id)
            .bind(&input.content_name)
            .bind(input.start_time)
            .bind(input.end_time)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ContentUsageLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM content_usage_logs l
             JOIN users u ON u.id = l.user_id
             WHERE l.id = $1"
        );
        sqlx::query_as::<_, ContentUsageLog>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List logs newest first, applying every filter that is set.
    pub async fn list(
        pool: &PgPool,
        filter: &ContentLogFilter,
    ) -> Result<Vec<ContentUsageLog>, sqlx::Error> {
        let (from, until) = filter.window.unzip();
        let query = format!(
            "SELECT {COLUMNS} FROM content_usage_logs l
             JOIN users u ON u.id = l.user_id
             WHERE ($1::TEXT IS NULL OR u.username = $1)
               AND ($2::TEXT IS NULL OR u.username ILIKE '%' || $2 || '%')
               AND ($3::TIMESTAMPTZ IS NULL OR l.start_time >= $3)
               AND ($4::TIMESTAMPTZ IS NULL OR l.start_time < $4)
             ORDER BY l.start_time DESC
             LIMIT $5"
        );
        sqlx::query_as::<_, ContentUsageLog>(&query)
            .bind(filter.username.as_deref())
            .bind(filter.user_search.as_deref())
            .bind(from)
            .bind(until)
            .bind(filter.limit)
            .fetch_all(pool)
            .await
    }

    /// All logs that have a duration, for aggregation.
    pub async fn list_completed(pool: &PgPool) -> Result<Vec<ContentUsageLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM content_usage_logs l
             JOIN users u ON u.id = l.user_id
             WHERE l.duration_minutes IS NOT NULL
             ORDER BY l.start_time DESC"
        );
        sqlx::query_as::<_, ContentUsageLog>(&query)
            .fetch_all(pool)
            .await
    }

    /// Update a log. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateContentLog,
    ) -> Result<Option<ContentUsageLog>, sqlx::Error> {
        let query = format!(
            "WITH l AS (
                UPDATE content_usage_logs SET
                    content_name = COALESCE($2, content_name),
                    start_time = COALESCE($3, start_time),
                    end_time = COALESCE($4, end_time)
                WHERE id = $1
                RETURNING *
             )
             SELECT {COLUMNS} {FROM_JOINED}"
        );
        sqlx::query_as::<_, ContentUsageLog>(&query)
            .bind(id)
            .bind(input.content_name.as_deref())
            .bind(input.start_time)
            .bind(input.end_time)
            .fetch_optional(pool)
            .await
    }

    /// Close an open log. A log that already has an `end_time` keeps it.
    pub async fn end(
        pool: &PgPool,
        id: DbId,
        at: Timestamp,
    ) -> Result<Option<ContentUsageLog>, sqlx::Error> {
        let query = format!(
            "WITH l AS (
                UPDATE content_usage_logs SET end_time = COALESCE(end_time, $2)
                WHERE id = $1
                RETURNING *
             )
             SELECT {COLUMNS} {FROM_JOINED}"
        );
        sqlx::query_as::<_, ContentUsageLog>(&query)
            .bind(id)
            .bind(at)
            .fetch_optional(pool)
            .await
    }

    /// Delete a log. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM content_usage_logs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every content log. Returns the number of rows removed.
    pub async fn delete_all(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM content_usage_logs")
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
