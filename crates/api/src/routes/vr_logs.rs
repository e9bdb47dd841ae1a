//! Route definitions for the `/vr-logs` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::vr_logs;
use crate::state::AppState;

/// Routes mounted at `/vr-logs`.
///
/// ```text
/// GET    /            -> list
/// POST   /            -> create (admin only)
/// PUT    /{id}        -> update (admin only)
/// DELETE /{id}        -> delete (admin only)
/// POST   /{id}/end    -> end (admin only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(vr_logs::list).post(vr_logs::create))
        .route("/{id}", put(vr_logs::update).delete(vr_logs::delete))
        .route("/{id}/end", post(vr_logs::end))
}
