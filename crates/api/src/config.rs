use chrono::Duration;
use vrlog_core::session_liveness::LivenessConfig;
use vrlog_core::timestamp::{DisplayZone, DEFAULT_DISPLAY_OFFSET_HOURS};

use crate::auth::jwt::JwtConfig;

/// Default interval between liveness sweeps.
const DEFAULT_LIVENESS_SWEEP_SECS: u64 = 5;
/// Default dashboard inactivity timeout.
const DEFAULT_INACTIVITY_TIMEOUT_MINS: i64 = 30;

/// Admin account created or refreshed at startup.
#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub username: String,
    pub password: String,
}

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Fixed offset used to render and bucket timestamps for operators.
    pub display_zone: DisplayZone,
    /// Thresholds for dashboard session liveness.
    pub liveness: LivenessConfig,
    /// Seconds between liveness sweeps (default: `5`).
    pub liveness_sweep_secs: u64,
    /// Optional admin account to ensure at startup.
    pub admin_bootstrap: Option<AdminBootstrap>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                    |
    /// |----------------------------|----------------------------|
    /// | `HOST`                     | `0.0.0.0`                  |
    /// | `PORT`                     | `3000`                     |
    /// | `CORS_ORIGINS`             | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                       |
    /// | `DISPLAY_UTC_OFFSET_HOURS` | `9`                        |
    /// | `LIVENESS_SWEEP_SECS`      | `5`                        |
    /// | `INACTIVITY_TIMEOUT_MINS`  | `30`                       |
    /// | `ADMIN_USERNAME`           | unset                      |
    /// | `ADMIN_PASSWORD`           | unset                      |
    ///
    /// JWT settings are documented on [`JwtConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let offset_hours: i32 = std::env::var("DISPLAY_UTC_OFFSET_HOURS")
            .unwrap_or_else(|_| DEFAULT_DISPLAY_OFFSET_HOURS.to_string())
            .parse()
            .expect("DISPLAY_UTC_OFFSET_HOURS must be a valid i32");

        let liveness_sweep_secs: u64 = std::env::var("LIVENESS_SWEEP_SECS")
            .unwrap_or_else(|_| DEFAULT_LIVENESS_SWEEP_SECS.to_string())
            .parse()
            .expect("LIVENESS_SWEEP_SECS must be a valid u64");

        let inactivity_mins: i64 = std::env::var("INACTIVITY_TIMEOUT_MINS")
            .unwrap_or_else(|_| DEFAULT_INACTIVITY_TIMEOUT_MINS.to_string())
            .parse()
            .expect("INACTIVITY_TIMEOUT_MINS must be a valid i64");

        let admin_bootstrap = match (
            std::env::var("ADMIN_USERNAME").ok().filter(|s| !s.is_empty()),
            std::env::var("ADMIN_PASSWORD").ok().filter(|s| !s.is_empty()),
        ) {
            (Some(username), Some(password)) => Some(AdminBootstrap { username, password }),
            _ => None,
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            display_zone: DisplayZone::from_hours(offset_hours),
            liveness: LivenessConfig {
                inactivity_timeout: Duration::minutes(inactivity_mins),
                ..LivenessConfig::default()
            },
            liveness_sweep_secs: liveness_sweep_secs.max(1),
            admin_bootstrap,
        }
    }
}
