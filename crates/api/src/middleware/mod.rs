//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated principal from a JWT Bearer token.
//! - [`rbac::RequireSuperadmin`] -- Requires `SUPERADMIN`.
//! - [`rbac::RequireAdmin`] -- Requires `ADMIN` or `SUPERADMIN`.
//! - [`rbac::RequireStaff`] -- Requires `ADMIN`, `OPERATOR` or `SUPERADMIN`.
//! - [`rbac::RequireAuth`] -- Requires any authenticated user.

pub mod auth;
pub mod rbac;
