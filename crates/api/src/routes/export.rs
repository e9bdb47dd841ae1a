use axum::routing::get;
use axum::Router;

use crate::handlers::export;
use crate::state::AppState;

/// Routes mounted at `/export`. Each takes its list endpoint's filters.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/vr-logs.csv", get(export::vr_logs_csv))
        .route("/content-logs.csv", get(export::content_logs_csv))
        .route("/user-sessions.csv", get(export::user_sessions_csv))
}
