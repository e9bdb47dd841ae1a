//! Route definitions for the `/content-data` catalogue.

use axum::routing::get;
use axum::Router;

use crate::handlers::content_data;
use crate::state::AppState;

/// Routes mounted at `/content-data`.
///
/// ```text
/// GET    /        -> list
/// POST   /        -> create (admin only)
/// GET    /{id}    -> get
/// PUT    /{id}    -> update (admin only)
/// DELETE /{id}    -> delete (admin only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(content_data::list).post(content_data::create))
        .route(
            "/{id}",
            get(content_data::get)
                .put(content_data::update)
                .delete(content_data::delete),
        )
}
