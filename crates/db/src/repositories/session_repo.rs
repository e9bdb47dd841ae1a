//! Repository for the `user_sessions` table.

use sqlx::PgPool;
use vrlog_core::types::{DbId, Timestamp};

use crate::models::session::{
    CreateSession, SessionFilter, UpdateSession, UserSession, UserSessionListItem,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, login_time, logout_time, created_at";

/// Columns for the username join. Expects `user_sessions s JOIN users u`.
const LIST_COLUMNS: &str = "\
    s.id, s.user_id, u.username, s.login_time, s.logout_time, s.created_at";

/// Provides CRUD operations for login sessions.
pub struct SessionRepo;

impl SessionRepo {
    /// Open a session. `login_time` defaults to `NOW()`.
    pub async fn create(pool: &PgPool, input: &CreateSession) -> Result<UserSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_sessions (user_id, login_time, logout_time)
             VALUES ($1, COALESCE($2, NOW()), $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(input.user_id)
            .bind(input.login_time)
            .bind(input.logout_time)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<UserSession>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_sessions WHERE id = $1");
        sqlx::query_as::<_, UserSession>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List sessions with usernames, newest login first.
    pub async fn list(
        pool: &PgPool,
        filter: &SessionFilter,
    ) -> Result<Vec<UserSessionListItem>, sqlx::Error> {
        let query = format!(
            "SELECT {LIST_COLUMNS}
             FROM user_sessions s
             JOIN users u ON u.id = s.user_id
             WHERE ($1::TEXT IS NULL OR u.username = $1)
               AND ($2::TEXT IS NULL OR u.username ILIKE '%' || $2 || '%')
             ORDER BY s.login_time DESC
             LIMIT $3"
        );
        sqlx::query_as::<_, UserSessionListItem>(&query)
            .bind(filter.username.as_deref())
            .bind(filter.user_search.as_deref())
            .bind(filter.limit)
            .fetch_all(pool)
            .await
    }

    /// Every session's login/logout interval, for login statistics.
    pub async fn list_intervals(
        pool: &PgPool,
    ) -> Result<Vec<(Timestamp, Option<Timestamp>)>, sqlx::Error> {
        sqlx::query_as::<_, (Timestamp, Option<Timestamp>)>(
            "SELECT login_time, logout_time FROM user_sessions ORDER BY login_time DESC",
        )
        .fetch_all(pool)
        .await
    }

    /// Update a session. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSession,
    ) -> Result<Option<UserSession>, sqlx::Error> {
        let query = format!(
            "UPDATE user_sessions SET
                login_time = COALESCE($2, login_time),
                logout_time = COALESCE($3, logout_time)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(id)
            .bind(input.login_time)
            .bind(input.logout_time)
            .fetch_optional(pool)
            .await
    }

    /// Record the logout time. The first write wins: a session that already
    /// has a `logout_time` keeps it.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn end(
        pool: &PgPool,
        id: DbId,
        at: Timestamp,
    ) -> Result<Option<UserSession>, sqlx::Error> {
        let query = format!(
            "UPDATE user_sessions SET logout_time = COALESCE(logout_time, $2)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(id)
            .bind(at)
            .fetch_optional(pool)
            .await
    }

    /// Delete a session. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_sessions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
