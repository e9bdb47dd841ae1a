//! Route definitions for the `/user-sessions` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::user_sessions;
use crate::state::AppState;

/// Routes mounted at `/user-sessions`.
///
/// ```text
/// GET    /            -> list (?username=&limit=)
/// POST   /            -> create (admin only)
/// PUT    /{id}        -> update (admin only)
/// DELETE /{id}        -> delete (admin only)
/// POST   /{id}/end    -> end (admin only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(user_sessions::list).post(user_sessions::create))
        .route(
            "/{id}",
            put(user_sessions::update).delete(user_sessions::delete),
        )
        .route("/{id}/end", post(user_sessions::end))
}
