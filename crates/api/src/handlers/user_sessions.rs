//! Handlers for the `/user-sessions` dashboard resource.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use vrlog_core::error::CoreError;
use vrlog_core::session_liveness::EndReason;
use vrlog_core::timestamp::parse_optional_timestamp;
use vrlog_core::types::DbId;
use vrlog_db::models::session::{
    CreateSession, SessionFilter, UpdateSession, UserSession, UserSessionListItem,
};
use vrlog_db::repositories::{SessionRepo, UserRepo};

use super::optional_json;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::{dashboard_limit, non_empty, SessionListParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /user-sessions`. The owner is given by `user_id`
/// or by an existing `username`.
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub user_id: Option<DbId>,
    pub username: Option<String>,
    pub login_time: Option<String>,
    pub logout_time: Option<String>,
}

/// Request body for `PUT /user-sessions/{id}`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateSessionRequest {
    pub login_time: Option<String>,
    pub logout_time: Option<String>,
}

/// Optional body for `POST /user-sessions/{id}/end`.
#[derive(Debug, Default, Deserialize)]
pub struct EndSessionRequest {
    pub logout_time: Option<String>,
}

fn not_found(id: DbId) -> CoreError {
    CoreError::NotFound {
        entity: "Session",
        id,
    }
}

/// Filters shared with the CSV export.
pub(crate) fn filter_from(params: &SessionListParams) -> SessionFilter {
    SessionFilter {
        username: None,
        user_search: non_empty(&params.username),
        limit: dashboard_limit(params.limit),
    }
}

/// GET /api/v1/user-sessions?username=&limit=
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<SessionListParams>,
) -> AppResult<Json<DataResponse<Vec<UserSessionListItem>>>> {
    let sessions = SessionRepo::list(&state.pool, &filter_from(&params)).await?;
    Ok(Json(DataResponse { data: sessions }))
}

/// POST /api/v1/user-sessions
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<CreateSessionRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserSession>>)> {
    let user = match (input.user_id, non_empty(&input.username)) {
        (Some(user_id), _) => UserRepo::find_by_id(&state.pool, user_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "User",
                id: user_id,
            })?,
        (None, Some(username)) => UserRepo::find_by_username(&state.pool, &username)
            .await?
            .ok_or(CoreError::NotFoundBy {
                entity: "User",
                field: "username",
                value: username,
            })?,
        (None, None) => {
            return Err(CoreError::Validation("user_id or username required".into()).into());
        }
    };

    let login_time = parse_optional_timestamp("login_time", input.login_time.as_deref())?;
    let logout_time = parse_optional_timestamp("logout_time", input.logout_time.as_deref())?;
    if let (Some(login), Some(logout)) = (login_time, logout_time) {
        if logout < login {
            return Err(CoreError::Validation(
                "logout_time must not be earlier than login_time".into(),
            )
            .into());
        }
    }

    let session = SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id: user.id,
            login_time,
            logout_time,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: session })))
}

/// PUT /api/v1/user-sessions/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSessionRequest>,
) -> AppResult<Json<DataResponse<UserSession>>> {
    let patch = UpdateSession {
        login_time: parse_optional_timestamp("login_time", input.login_time.as_deref())?,
        logout_time: parse_optional_timestamp("logout_time", input.logout_time.as_deref())?,
    };

    let session = SessionRepo::update(&state.pool, id, &patch)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: session }))
}

/// POST /api/v1/user-sessions/{id}/end
///
/// Force-ends a session. A tracked dashboard session stops being tracked;
/// an already-closed session keeps its original `logout_time`.
pub async fn end(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    body: Bytes,
) -> AppResult<Json<DataResponse<UserSession>>> {
    let input: EndSessionRequest = optional_json(&body)?;
    let at = parse_optional_timestamp("logout_time", input.logout_time.as_deref())?
        .unwrap_or_else(Utc::now);

    let session = SessionRepo::end(&state.pool, id, at)
        .await?
        .ok_or_else(|| not_found(id))?;
    state.tracker.end(id, EndReason::Manual, at).await;

    tracing::info!(session_id = %id, admin_id = %admin.user_id, "Session ended by admin");
    Ok(Json(DataResponse { data: session }))
}

/// DELETE /api/v1/user-sessions/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.tracker.remove(id).await;
    if SessionRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id).into())
    }
}
