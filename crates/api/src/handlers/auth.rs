//! Handlers for the `/auth` resource (dashboard login, logout, me).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use vrlog_core::error::CoreError;
use vrlog_core::roles::{ROLE_ADMIN, ROLE_USER};
use vrlog_core::session_liveness::EndReason;
use vrlog_core::types::DbId;
use vrlog_db::models::session::CreateSession;
use vrlog_db::models::user::CreateUser;
use vrlog_db::repositories::{SessionRepo, UserRepo};

use crate::auth::credentials::{authenticate_admin, authenticate_user};
use crate::auth::jwt::generate_access_token;
use crate::background::session_liveness::record_logout;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: Option<String>,
}

/// Successful dashboard login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub session_id: DbId,
    pub user: UserInfo,
}

/// Public account info embedded in [`AuthResponse`].
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: DbId,
    pub username: String,
    pub is_admin: bool,
}

/// Response for `GET /auth/me`.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user_id: DbId,
    pub role: String,
    pub session_id: DbId,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Tries admin credentials first, then falls back to SDK-user login. Either
/// way a `user_sessions` row is opened and handed to the liveness tracker.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let username = input.username.trim();
    if username.is_empty() {
        return Err(CoreError::Validation("username required".into()).into());
    }
    let password = input.password.as_deref().filter(|p| !p.is_empty());
    let now = Utc::now();

    // Session rows reference `users`, so an admin signs in through a
    // same-named user row carrying the admin's hash.
    let (account_id, session_owner, role) =
        match authenticate_admin(&state.pool, username, password).await? {
            Some(admin) => {
                let mirror = UserRepo::find_or_create(
                    &state.pool,
                    &CreateUser {
                        username: admin.username.clone(),
                        password_hash: admin.password_hash.clone(),
                    },
                )
                .await?;
                (admin.id, mirror, ROLE_ADMIN)
            }
            None => {
                let user = authenticate_user(&state.pool, username, password)
                    .await
                    .map_err(|e| match e {
                        AppError::Core(CoreError::NotFoundBy { .. }) => AppError::Core(
                            CoreError::Unauthorized("Invalid username or password".into()),
                        ),
                        other => other,
                    })?;
                (user.id, user, ROLE_USER)
            }
        };

    let session = SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id: session_owner.id,
            login_time: Some(now),
            logout_time: None,
        },
    )
    .await?;
    state
        .tracker
        .start(session.id, session_owner.id, session.login_time)
        .await;

    let jwt = &state.config.jwt;
    let access_token = generate_access_token(account_id, role, session.id, jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(
        account_id = %account_id,
        session_id = %session.id,
        role,
        "Dashboard login"
    );

    Ok(Json(AuthResponse {
        access_token,
        expires_in: jwt.access_token_expiry_mins * 60,
        session_id: session.id,
        user: UserInfo {
            id: account_id,
            username: session_owner.username,
            is_admin: role == ROLE_ADMIN,
        },
    }))
}

/// POST /api/v1/auth/logout
///
/// Ends the caller's session. Repeated calls are harmless.
pub async fn logout(State(state): State<AppState>, user: AuthUser) -> AppResult<StatusCode> {
    let now = Utc::now();
    let ended = state
        .tracker
        .end(user.session_id, EndReason::Manual, now)
        .await;

    match ended {
        Some(ended) => record_logout(&state.pool, user.session_id, &ended).await,
        None => {
            SessionRepo::end(&state.pool, user.session_id, now).await?;
        }
    }

    tracing::info!(user_id = %user.user_id, session_id = %user.session_id, "Dashboard logout");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
pub async fn me(user: AuthUser) -> Json<DataResponse<MeResponse>> {
    Json(DataResponse {
        data: MeResponse {
            user_id: user.user_id,
            role: user.role,
            session_id: user.session_id,
        },
    })
}
