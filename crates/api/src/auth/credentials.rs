//! Credential checks shared by the action API and dashboard login.
//!
//! SDK users may register without a password. Their stored hash is then an
//! identity hash, and login succeeds on username alone. Users registered
//! with a password get an argon2id hash that login must verify.

use sqlx::PgPool;
use vrlog_core::error::CoreError;
use vrlog_core::identity::{identity_hash, is_password_hash};
use vrlog_core::types::Timestamp;
use vrlog_db::models::admin::Admin;
use vrlog_db::models::user::User;
use vrlog_db::repositories::{AdminRepo, UserRepo};

use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};

/// Value for `users.password_hash`: argon2id when a password is given,
/// otherwise an identity hash of the username and registration time.
pub fn stored_hash_for(username: &str, password: Option<&str>, now: Timestamp) -> AppResult<String> {
    match password {
        Some(password) => hash_password(password)
            .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}"))),
        None => Ok(identity_hash(username, now)),
    }
}

/// Look up an SDK user and check the password rule.
///
/// Unknown usernames fail with [`CoreError::NotFoundBy`]; callers that must
/// not reveal account existence map it to 401 themselves.
pub async fn authenticate_user(
    pool: &PgPool,
    username: &str,
    password: Option<&str>,
) -> AppResult<User> {
    let user = UserRepo::find_by_username(pool, username)
        .await?
        .ok_or_else(|| CoreError::NotFoundBy {
            entity: "User",
            field: "username",
            value: username.to_string(),
        })?;

    if is_password_hash(&user.password_hash) {
        let password = password
            .ok_or_else(|| CoreError::Unauthorized("Password required".into()))?;
        let valid = verify_password(password, &user.password_hash)
            .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
        if !valid {
            return Err(CoreError::Unauthorized("Invalid username or password".into()).into());
        }
    }

    Ok(user)
}

/// Check admin credentials. `None` when there is no such admin or the
/// password does not match, so the caller can fall through to user login.
pub async fn authenticate_admin(
    pool: &PgPool,
    username: &str,
    password: Option<&str>,
) -> AppResult<Option<Admin>> {
    let Some(password) = password else {
        return Ok(None);
    };
    let Some(admin) = AdminRepo::find_by_username(pool, username).await? else {
        return Ok(None);
    };

    let valid = verify_password(password, &admin.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    Ok(valid.then_some(admin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn passwordless_users_get_identity_hash() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let stored = stored_hash_for("player1", None, now).unwrap();
        assert_eq!(stored, identity_hash("player1", now));
        assert!(!is_password_hash(&stored));
    }

    #[test]
    fn password_users_get_argon2_hash() {
        let stored = stored_hash_for("player1", Some("pw"), Utc::now()).unwrap();
        assert!(is_password_hash(&stored));
        assert!(verify_password("pw", &stored).unwrap());
    }
}
