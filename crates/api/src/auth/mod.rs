//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- JWT access-token generation and validation.
//! - [`accounts`] -- per-request account and organization re-validation.

pub mod accounts;
pub mod jwt;
pub mod password;
