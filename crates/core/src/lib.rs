//! Domain core for the patrol monitoring backend.
//!
//! Pure types and rules with no I/O: the timeliness classifier, role and
//! status vocabularies, the authenticated principal, pagination helpers, and
//! the shared [`error::CoreError`] taxonomy.

pub mod error;
pub mod geo;
pub mod pagination;
pub mod principal;
pub mod roles;
pub mod timeliness;
pub mod types;
