//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- signed access-token issue and verification.

pub mod jwt;
pub mod password;
