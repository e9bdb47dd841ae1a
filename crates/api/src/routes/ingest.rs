//! Route definitions for the action API used by headsets and kiosks.

use axum::routing::get;
use axum::Router;

use crate::handlers::ingest;
use crate::state::AppState;

/// Routes mounted at `/vr-log`.
///
/// ```text
/// GET  /   -> query_data (typed query by ?type=)
/// POST /   -> handle_action (dispatch on body.action)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(ingest::query_data).post(ingest::handle_action))
}
