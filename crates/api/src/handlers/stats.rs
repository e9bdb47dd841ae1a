//! Aggregated usage statistics for the dashboard.
//!
//! Each endpoint loads the completed rows it needs and folds them with the
//! pure aggregators in `vrlog_core::usage_stats`.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use vrlog_core::usage_stats::{
    content_usage_stats, device_usage_stats, login_session_stats, user_usage_stats,
    ContentUsageStats, DeviceUsageStats, LoginSessionStats, SessionRecord, UsageRecord,
    UserUsageStats,
};
use vrlog_db::repositories::{ContentLogRepo, SessionRepo, VrLogRepo};
use vrlog_db::DbPool;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

const OVERVIEW_CONTENT_LIMIT: usize = 8;
const OVERVIEW_TOP_CONTENT_LIMIT: usize = 3;

#[derive(Debug, Serialize)]
pub struct Overview {
    pub content: Vec<ContentUsageStats>,
    pub top_content: Vec<ContentUsageStats>,
    pub user_stats: Vec<UserUsageStats>,
    pub login_stats: LoginSessionStats,
}

async fn vr_records(pool: &DbPool) -> AppResult<Vec<UsageRecord>> {
    let logs = VrLogRepo::list_completed(pool).await?;
    Ok(logs.iter().map(UsageRecord::from).collect())
}

async fn content_records(pool: &DbPool) -> AppResult<Vec<UsageRecord>> {
    let logs = ContentLogRepo::list_completed(pool).await?;
    Ok(logs.iter().map(UsageRecord::from).collect())
}

async fn login_stats(state: &AppState) -> AppResult<LoginSessionStats> {
    let sessions: Vec<SessionRecord> = SessionRepo::list_intervals(&state.pool)
        .await?
        .into_iter()
        .map(|(login_time, logout_time)| SessionRecord {
            login_time,
            logout_time,
        })
        .collect();
    Ok(login_session_stats(
        &sessions,
        Utc::now(),
        state.config.display_zone,
    ))
}

/// GET /api/v1/stats/vr-content
pub async fn vr_content(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<ContentUsageStats>>>> {
    let records = vr_records(&state.pool).await?;
    Ok(Json(DataResponse {
        data: content_usage_stats(&records),
    }))
}

/// GET /api/v1/stats/vr-devices
pub async fn vr_devices(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<DeviceUsageStats>>>> {
    let records = vr_records(&state.pool).await?;
    Ok(Json(DataResponse {
        data: device_usage_stats(&records),
    }))
}

/// GET /api/v1/stats/content
pub async fn content(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<ContentUsageStats>>>> {
    let records = content_records(&state.pool).await?;
    Ok(Json(DataResponse {
        data: content_usage_stats(&records),
    }))
}

/// GET /api/v1/stats/users
pub async fn users(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<UserUsageStats>>>> {
    let records = content_records(&state.pool).await?;
    Ok(Json(DataResponse {
        data: user_usage_stats(&records),
    }))
}

/// GET /api/v1/stats/logins
pub async fn logins(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<DataResponse<LoginSessionStats>>> {
    Ok(Json(DataResponse {
        data: login_stats(&state).await?,
    }))
}

/// GET /api/v1/stats/overview
pub async fn overview(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<DataResponse<Overview>>> {
    let records = content_records(&state.pool).await?;
    let mut content = content_usage_stats(&records);
    content.truncate(OVERVIEW_CONTENT_LIMIT);
    let top_content = content
        .iter()
        .take(OVERVIEW_TOP_CONTENT_LIMIT)
        .cloned()
        .collect();

    Ok(Json(DataResponse {
        data: Overview {
            content,
            top_content,
            user_stats: user_usage_stats(&records),
            login_stats: login_stats(&state).await?,
        },
    }))
}
