//! Authentication: JWT access tokens, argon2 password hashing, and the
//! credential check shared by the action API and dashboard login.

pub mod credentials;
pub mod jwt;
pub mod password;
