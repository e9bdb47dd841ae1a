//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct matching
//! the database row, plus the `Deserialize` DTOs used for inserts and patches.

pub mod admin;
pub mod content_data;
pub mod session;
pub mod usage_log;
pub mod user;
