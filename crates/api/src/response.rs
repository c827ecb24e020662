//! Shared response envelope types for API handlers.
//!
//! Unpaginated lists use a `{ "data": ... }` envelope; paginated lists use
//! [`patrol_core::pagination::Page`], which carries its own `data` field.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
