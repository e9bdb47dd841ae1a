//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod admin_repo;
pub mod content_data_repo;
pub mod content_log_repo;
pub mod session_repo;
pub mod user_repo;
pub mod vr_log_repo;

pub use admin_repo::AdminRepo;
pub use content_data_repo::ContentDataRepo;
pub use content_log_repo::ContentLogRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
pub use vr_log_repo::VrLogRepo;
