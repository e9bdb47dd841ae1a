//! Handlers for the `/vr-logs` dashboard resource.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use vrlog_core::action::parse_interval;
use vrlog_core::error::CoreError;
use vrlog_core::identity::identity_hash;
use vrlog_core::timestamp::parse_optional_timestamp;
use vrlog_core::types::DbId;
use vrlog_db::models::usage_log::{CreateVrLog, UpdateVrLog, VrLogFilter, VrUsageLog};
use vrlog_db::models::user::CreateUser;
use vrlog_db::repositories::{UserRepo, VrLogRepo};

use super::{optional_json, required};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::{dashboard_limit, non_empty, VrLogListParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /vr-logs`. Timestamps accept RFC 3339 or naive UTC.
#[derive(Debug, Deserialize)]
pub struct CreateVrLogRequest {
    pub device_id: String,
    pub content_name: String,
    pub start_time: String,
    pub end_time: Option<String>,
    pub username: Option<String>,
}

/// Request body for `PUT /vr-logs/{id}`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateVrLogRequest {
    pub device_id: Option<String>,
    pub content_name: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

/// Optional body for the `end` actions; `end_time` defaults to now.
#[derive(Debug, Default, Deserialize)]
pub struct EndRequest {
    pub end_time: Option<String>,
}

fn not_found(id: DbId) -> CoreError {
    CoreError::NotFound {
        entity: "VrUsageLog",
        id,
    }
}

/// Filters shared with the CSV export.
pub(crate) fn filter_from(params: &VrLogListParams) -> VrLogFilter {
    VrLogFilter {
        device_id: None,
        device_search: non_empty(&params.device),
        username: None,
        limit: dashboard_limit(params.limit),
    }
}

/// GET /api/v1/vr-logs?device=&limit=
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<VrLogListParams>,
) -> AppResult<Json<DataResponse<Vec<VrUsageLog>>>> {
    let logs = VrLogRepo::list(&state.pool, &filter_from(&params)).await?;
    Ok(Json(DataResponse { data: logs }))
}

/// POST /api/v1/vr-logs
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateVrLogRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<VrUsageLog>>)> {
    let device_id = required("device_id", &input.device_id)?;
    let content_name = required("content_name", &input.content_name)?;
    let (start_time, end_time) = parse_interval(&input.start_time, input.end_time.as_deref())?;

    let user_id = match non_empty(&input.username) {
        Some(username) => {
            let user = UserRepo::find_or_create(
                &state.pool,
                &CreateUser {
                    password_hash: identity_hash(&username, Utc::now()),
                    username,
                },
            )
            .await?;
            Some(user.id)
        }
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

    tracing::info!(log_id = %log.id, admin_id = %admin.user_id, "VR log created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: log })))
}

/// PUT /api/v1/vr-logs/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateVrLogRequest>,
) -> AppResult<Json<DataResponse<VrUsageLog>>> {
    let patch = UpdateVrLog {
        device_id: non_empty(&input.device_id),
        content_name: non_empty(&input.content_name),
        start_time: parse_optional_timestamp("start_time", input.start_time.as_deref())?,
        end_time: parse_optional_timestamp("end_time", input.end_time.as_deref())?,
    };

    let log = VrLogRepo::update(&state.pool, id, &patch)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: log }))
}

/// POST /api/v1/vr-logs/{id}/end
pub async fn end(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    body: Bytes,
) -> AppResult<Json<DataResponse<VrUsageLog>>> {
    let input: EndRequest = optional_json(&body)?;
    let at = parse_optional_timestamp("end_time", input.end_time.as_deref())?
        .unwrap_or_else(Utc::now);

    let log = VrLogRepo::end(&state.pool, id, at)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: log }))
}

/// DELETE /api/v1/vr-logs/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if VrLogRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id).into())
    }
}
