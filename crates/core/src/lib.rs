//! Domain logic for the VR usage analytics service.
//!
//! Everything in this crate is pure: no database, no HTTP. The `db` and
//! `api` crates build on these types.

pub mod action;
pub mod duration;
pub mod error;
pub mod export;
pub mod identity;
pub mod query;
pub mod roles;
pub mod session_liveness;
pub mod timestamp;
pub mod types;
pub mod usage_stats;
