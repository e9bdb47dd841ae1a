//! Route definitions for the `/content-logs` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::content_logs;
use crate::state::AppState;

/// Routes mounted at `/content-logs`.
///
/// ```text
/// GET    /            -> list (?user=&month=&limit=)
/// POST   /            -> create (admin only)
/// DELETE /            -> delete_all (admin only)
/// PUT    /{id}        -> update (admin only)
/// DELETE /{id}        -> delete (admin only)
/// POST   /{id}/end    -> end (admin only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(content_logs::list)
                .post(content_logs::create)
                .delete(content_logs::delete_all),
        )
        .route(
            "/{id}",
            put(content_logs::update).delete(content_logs::delete),
        )
        .route("/{id}/end", post(content_logs::end))
}
