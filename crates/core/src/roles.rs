//! Role names carried in access tokens.

/// Dashboard operator: full read/write access.
pub const ROLE_ADMIN: &str = "admin";
/// SDK user signed in to the dashboard: read-only access.
pub const ROLE_USER: &str = "user";
