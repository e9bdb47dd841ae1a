//! Identity hashes for users created without a password.
//!
//! SDK registrations and auto-created users (first `vr_log` / `content_log`
//! for an unknown username) have no credential. Their `password_hash` column
//! holds a SHA-256 digest of the username and creation instant so the
//! column is never empty and never guessable.

use sha2::{Digest, Sha256};

use crate::types::Timestamp;

/// Hex-encoded SHA-256 of `username` concatenated with `at` (RFC 3339).
pub fn identity_hash(username: &str, at: Timestamp) -> String {
    let mut hasher = Sha256::new();
    hasher.update(username.as_bytes());
    hasher.update(at.to_rfc3339().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Whether a stored hash is an Argon2 PHC string (i.e. a real credential).
pub fn is_password_hash(stored: &str) -> bool {
    stored.starts_with("$argon2")
}
