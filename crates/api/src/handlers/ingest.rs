//! Handlers for the action API at `/vr-log`.
//!
//! `POST` dispatches on the `action` field; `GET` runs a typed read query.
//! Responses keep the SDK envelope `{ success, message, data }`.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use sqlx::PgPool;
use vrlog_core::action::{ApiRequest, IngestAction};
use vrlog_core::error::CoreError;
use vrlog_core::identity::identity_hash;
use vrlog_core::query::{DataQuery, DataQueryParams, QueryType};
use vrlog_core::types::Timestamp;
use vrlog_db::models::session::{CreateSession, SessionFilter, UserSession};
use vrlog_db::models::usage_log::{ContentLogFilter, CreateContentLog, CreateVrLog, VrLogFilter};
use vrlog_db::models::user::{CreateUser, User};
use vrlog_db::repositories::{ContentDataRepo, ContentLogRepo, SessionRepo, UserRepo, VrLogRepo};

use crate::auth::credentials::{authenticate_user, stored_hash_for};
use crate::error::{AppError, AppResult};
use crate::extract::{ActionJson, ActionQuery};
use crate::response::ApiResponse;
use crate::state::AppState;

/// Data returned by a successful `login` action.
#[derive(Debug, Serialize)]
pub struct LoginData {
    pub user: User,
    pub session: UserSession,
}

/// POST /api/v1/vr-log
pub async fn handle_action(
    State(state): State<AppState>,
    ActionJson(body): ActionJson<ApiRequest>,
) -> AppResult<Json<ApiResponse<Value>>> {
    let action = IngestAction::from_request(body)?;
    let now = Utc::now();
    tracing::debug!(action = action.name(), "Handling ingest action");

    let response = match action {
        IngestAction::Register { username, password } => {
            let password_hash = stored_hash_for(&username, password.as_deref(), now)?;
            let user = UserRepo::create(
                &state.pool,
                &CreateUser {
                    username,
                    password_hash,
                },
            )
            .await?;
            tracing::info!(user_id = %user.id, username = %user.username, "User registered");
            envelope("User registered", &user)?
        }

        IngestAction::Login { username, password } => {
            let user = authenticate_user(&state.pool, &username, password.as_deref()).await?;
            let session = SessionRepo::create(
                &state.pool,
                &CreateSession {
                    user_id: user.id,
                    login_time: Some(now),
                    logout_time: None,
                },
            )
            .await?;
            tracing::info!(user_id = %user.id, session_id = %session.id, "User logged in");
            envelope("Login successful", &LoginData { user, session })?
        }

        IngestAction::Logout { session_id } => {
            let session = SessionRepo::end(&state.pool, session_id, now)
                .await?
                .ok_or(CoreError::NotFound {
                    entity: "Session",
                    id: session_id,
                })?;
            state.tracker.remove(session_id).await;
            tracing::info!(%session_id, "User logged out");
            envelope("Logout successful", &session)?
        }

        IngestAction::VrLog {
            device_id,
            content_name,
            start_time,
            end_time,
            username,
        } => {
            let user_id = match username {
                Some(username) => Some(resolve_user(&state.pool, &username, now).await?.id),
                None => None,
            };
            let log = VrLogRepo::create(
                &state.pool,
                &CreateVrLog {
                    device_id,
                    user_id,
                    content_name,
                    start_time,
                    end_time,
                },
            )
            .await?;
            tracing::info!(log_id = %log.id, device_id = %log.device_id, "VR log recorded");
            envelope("VR log recorded", &log)?
        }

        IngestAction::ContentLog {
            username,
            content_name,
            start_time,
            end_time,
        } => {
            let user = resolve_user(&state.pool, &username, now).await?;
            let log = ContentLogRepo::create(
                &state.pool,
                &CreateContentLog {
                    user_id: user.id,
                    content_name,
                    start_time,
                    end_time,
                },
            )
            .await?;
            tracing::info!(log_id = %log.id, username = %log.username, "Content log recorded");
            envelope("Content log recorded", &log)?
        }
    };

    Ok(Json(response))
}

/// GET /api/v1/vr-log?type=&username=&device_id=&limit=
pub async fn query_data(
    State(state): State<AppState>,
    ActionQuery(params): ActionQuery<DataQueryParams>,
) -> AppResult<Json<ApiResponse<Value>>> {
    let query = DataQuery::from_params(params)?;
    let pool = &state.pool;

    let response = match query.query_type {
        QueryType::VrLogs => {
            let filter = VrLogFilter {
                device_id: query.device_id,
                device_search: None,
                username: query.username,
                limit: query.limit,
            };
            let rows = VrLogRepo::list(pool, &filter).await?;
            envelope(format!("Fetched {} VR logs", rows.len()), &rows)?
        }
        QueryType::ContentLogs => {
            let filter = ContentLogFilter {
                username: query.username,
                user_search: None,
                window: None,
                limit: query.limit,
            };
            let rows = ContentLogRepo::list(pool, &filter).await?;
            envelope(format!("Fetched {} content logs", rows.len()), &rows)?
        }
        QueryType::UserSessions => {
            let filter = SessionFilter {
                username: query.username,
                user_search: None,
                limit: query.limit,
            };
            let rows = SessionRepo::list(pool, &filter).await?;
            envelope(format!("Fetched {} user sessions", rows.len()), &rows)?
        }
        QueryType::ContentData => {
            let rows = ContentDataRepo::list(pool, query.limit).await?;
            envelope(format!("Fetched {} content entries", rows.len()), &rows)?
        }
    };

    Ok(Json(response))
}

/// Find a user by name, auto-creating a passwordless account when absent.
async fn resolve_user(pool: &PgPool, username: &str, now: Timestamp) -> AppResult<User> {
    let input = CreateUser {
        username: username.to_string(),
        password_hash: identity_hash(username, now),
    };
    Ok(UserRepo::find_or_create(pool, &input).await?)
}

fn envelope<T: Serialize>(message: impl Into<String>, data: &T) -> AppResult<ApiResponse<Value>> {
    let data = serde_json::to_value(data)
        .map_err(|e| AppError::InternalError(format!("Response serialization error: {e}")))?;
    Ok(ApiResponse::ok(message, data))
}
