use axum::routing::get;
use axum::Router;

use crate::handlers::stats;
use crate::state::AppState;

/// Routes mounted at `/stats`. All require auth.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/vr-content", get(stats::vr_content))
        .route("/vr-devices", get(stats::vr_devices))
        .route("/content", get(stats::content))
        .route("/users", get(stats::users))
        .route("/logins", get(stats::logins))
        .route("/overview", get(stats::overview))
}
