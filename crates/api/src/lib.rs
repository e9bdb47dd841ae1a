//! VR usage analytics API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes,
//! session tracker, background tasks) so integration tests and the binary
//! entrypoint can both access them.

pub mod auth;
pub mod background;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod liveness;
pub mod middleware;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
