//! Handlers for the `/content-data` catalogue.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use vrlog_core::error::CoreError;
use vrlog_core::types::DbId;
use vrlog_db::models::content_data::{ContentData, CreateContentData, UpdateContentData};
use vrlog_db::repositories::ContentDataRepo;

use super::required;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::LimitParams;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> CoreError {
    CoreError::NotFound {
        entity: "ContentData",
        id,
    }
}

fn check_file_size(size: Option<i64>) -> Result<(), CoreError> {
    match size {
        Some(n) if n < 0 => Err(CoreError::Validation(
            "file_size must not be negative".into(),
        )),
        _ => Ok(()),
    }
}

/// GET /api/v1/content-data?limit=
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<LimitParams>,
) -> AppResult<Json<DataResponse<Vec<ContentData>>>> {
    let items = ContentDataRepo::list(&state.pool, params.resolved()).await?;
    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/content-data/{id}
pub async fn get(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ContentData>>> {
    let item = ContentDataRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: item }))
}

/// POST /api/v1/content-data
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(mut input): Json<CreateContentData>,
) -> AppResult<(StatusCode, Json<DataResponse<ContentData>>)> {
    input.content_name = required("content_name", &input.content_name)?;
    check_file_size(input.file_size)?;

    let item = ContentDataRepo::create(&state.pool, &input).await?;
    tracing::info!(content_id = %item.id, content_name = %item.content_name, "Content data created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}

/// PUT /api/v1/content-data/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateContentData>,
) -> AppResult<Json<DataResponse<ContentData>>> {
    if let Some(name) = input.content_name.as_deref() {
        input.content_name = Some(required("content_name", name)?);
    }
    check_file_size(input.file_size)?;

    let item = ContentDataRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: item }))
}

/// DELETE /api/v1/content-data/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ContentDataRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id).into())
    }
}
