//! Handlers for the `/content-logs` dashboard resource.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use vrlog_core::action::parse_interval;
use vrlog_core::error::CoreError;
use vrlog_core::identity::identity_hash;
use vrlog_core::timestamp::{month_bounds, parse_optional_timestamp, DisplayZone};
use vrlog_core::types::DbId;
use vrlog_db::models::usage_log::{
    ContentLogFilter, ContentUsageLog, CreateContentLog, UpdateContentLog,
};
use vrlog_db::models::user::CreateUser;
use vrlog_db::repositories::{ContentLogRepo, UserRepo};

use super::vr_logs::EndRequest;
use super::{optional_json, required};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::{dashboard_limit, non_empty, ContentLogListParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /content-logs`. The owner is given either by
/// `user_id` (must exist) or `username` (created when absent).
#[derive(Debug, Deserialize)]
pub struct CreateContentLogRequest {
    pub user_id: Option<DbId>,
    pub username: Option<String>,
    pub content_name: String,
    pub start_time: String,
    pub end_time: Option<String>,
}

/// Request body for `PUT /content-logs/{id}`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateContentLogRequest {
    pub content_name: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeletedCount {
    pub deleted: u64,
}

fn not_found(id: DbId) -> CoreError {
    CoreError::NotFound {
        entity: "ContentUsageLog",
        id,
    }
}

/// Filters shared with the CSV export. `month` is interpreted in `zone`.
pub(crate) fn filter_from(
    params: &ContentLogListParams,
    zone: DisplayZone,
) -> Result<ContentLogFilter, CoreError> {
    let window = match non_empty(&params.month) {
        Some(month) => Some(month_bounds(&month, zone)?),
        None => None,
    };
    Ok(ContentLogFilter {
        username: None,
        user_search: non_empty(&params.user),
        window,
        limit: dashboard_limit(params.limit),
    })
}

/// GET /api/v1/content-logs?user=&month=&limit=
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<ContentLogListParams>,
) -> AppResult<Json<DataResponse<Vec<ContentUsageLog>>>> {
    let filter = filter_from(&params, state.config.display_zone)?;
    let logs = ContentLogRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: logs }))
}

/// POST /api/v1/content-logs
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateContentLogRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<ContentUsageLog>>)> {
    let content_name = required("content_name", &input.content_name)?;
    let (start_time, end_time) = parse_interval(&input.start_time, input.end_time.as_deref())?;

    let user_id = match (input.user_id, non_empty(&input.username)) {
        (Some(user_id), _) => {
            UserRepo::find_by_id(&state.pool, user_id)
                .await?
                .ok_or(CoreError::NotFound {
                    entity: "User",
                    id: user_id,
                })?
                .id
        }
        (None, Some(username)) => {
            UserRepo::find_or_create(
                &state.pool,
                &CreateUser {
                    password_hash: identity_hash(&username, Utc::now()),
                    username,
                },
            )
            .await?
            .id
        }
        (None, None) => {
            return Err(CoreError::Validation("user_id or username required".into()).into());
        }
    };

    let log = ContentLogRepo::create(
        &state.pool,
        &CreateContentLog {
            user_id,
            content_name,
            start_time,
            end_time,
        },
    )
    .await?;

    tracing::info!(log_id = %log.id, admin_id = %admin.user_id, "Content log created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: log })))
}

/// PUT /api/v1/content-logs/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateContentLogRequest>,
) -> AppResult<Json<DataResponse<ContentUsageLog>>> {
    let patch = UpdateContentLog {
        content_name: non_empty(&input.content_name),
        start_time: parse_optional_timestamp("start_time", input.start_time.as_deref())?,
        end_time: parse_optional_timestamp("end_time", input.end_time.as_deref())?,
    };

    let log = ContentLogRepo::update(&state.pool, id, &patch)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: log }))
}

/// POST /api/v1/content-logs/{id}/end
pub async fn end(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    body: Bytes,
) -> AppResult<Json<DataResponse<ContentUsageLog>>> {
    let input: EndRequest = optional_json(&body)?;
    let at = parse_optional_timestamp("end_time", input.end_time.as_deref())?
        .unwrap_or_else(Utc::now);

    let log = ContentLogRepo::end(&state.pool, id, at)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: log }))
}

/// DELETE /api/v1/content-logs/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ContentLogRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id).into())
    }
}

/// DELETE /api/v1/content-logs
pub async fn delete_all(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> AppResult<Json<DataResponse<DeletedCount>>> {
    let deleted = ContentLogRepo::delete_all(&state.pool).await?;
    tracing::warn!(deleted, admin_id = %admin.user_id, "All content logs deleted");
    Ok(Json(DataResponse {
        data: DeletedCount { deleted },
    }))
}
