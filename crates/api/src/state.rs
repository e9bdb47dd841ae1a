use std::sync::Arc;

use crate::config::ServerConfig;
use crate::liveness::SessionTracker;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: vrlog_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// In-memory liveness state for open dashboard sessions.
    pub tracker: Arc<SessionTracker>,
}
