//! Route definitions for dashboard session liveness.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::sessions;
use crate::state::AppState;

/// Routes mounted at `/sessions`.
///
/// ```text
/// POST /{id}/signal   -> signal (owner or admin)
/// POST /{id}/beacon   -> beacon (unauthenticated, always 202)
/// GET  /{id}/status   -> status (owner or admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/signal", post(sessions::signal))
        .route("/{id}/beacon", post(sessions::beacon))
        .route("/{id}/status", get(sessions::status))
}
