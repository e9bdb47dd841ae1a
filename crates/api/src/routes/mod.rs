pub mod auth;
pub mod content_data;
pub mod content_logs;
pub mod export;
pub mod health;
pub mod ingest;
pub mod sessions;
pub mod stats;
pub mod user_sessions;
pub mod vr_logs;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /vr-log                         action API: GET typed query, POST action
///
/// /auth/login                     login (public)
/// /auth/logout                    logout (requires auth)
/// /auth/me                        current identity (requires auth)
///
/// /sessions/{id}/signal           liveness signal
/// /sessions/{id}/beacon           page-unload beacon (public)
/// /sessions/{id}/status           remote validation
///
/// /vr-logs                        list, create
/// /vr-logs/{id}                   update, delete
/// /vr-logs/{id}/end               end
///
/// /content-logs                   list, create, delete all
/// /content-logs/{id}              update, delete
/// /content-logs/{id}/end          end
///
/// /user-sessions                  list, create
/// /user-sessions/{id}             update, delete
/// /user-sessions/{id}/end         end
///
/// /content-data                   list, create
/// /content-data/{id}              get, update, delete
///
/// /stats/{vr-content,vr-devices,content,users,logins,overview}
///
/// /export/{vr-logs,content-logs,user-sessions}.csv
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/vr-log", ingest::router())
        .nest("/auth", auth::router())
        .nest("/sessions", sessions::router())
        .nest("/vr-logs", vr_logs::router())
        .nest("/content-logs", content_logs::router())
        .nest("/user-sessions", user_sessions::router())
        .nest("/content-data", content_data::router())
        .nest("/stats", stats::router())
        .nest("/export", export::router())
}
