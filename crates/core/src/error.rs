/// Domain error taxonomy shared by every layer.
///
/// Transports map variants to their own conventions (HTTP status codes,
/// WebSocket ack codes); callers never inspect the message text.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("Cross-tenant access: {0}")]
    CrossTenant(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a `NotFound` keyed by a numeric id.
    pub fn not_found(entity: &'static str, id: crate::types::DbId) -> Self {
        CoreError::NotFound {
            entity,
            key: format!("with id {id}"),
        }
    }

    /// Stable machine-readable code, shared by the HTTP and WebSocket surfaces.
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::NotFound { .. } => "NOT_FOUND",
            CoreError::InvalidRole(_) => "INVALID_ROLE",
            CoreError::CrossTenant(_) => "CROSS_TENANT",
            CoreError::Validation(_) => "VALIDATION_ERROR",
            CoreError::Conflict(_) => "CONFLICT",
            CoreError::Unauthorized(_) => "UNAUTHORIZED",
            CoreError::Forbidden(_) => "FORBIDDEN",
            CoreError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_formats_id() {
        let err = CoreError::not_found("Checkpoint", 7);
        assert_eq!(err.to_string(), "Entity not found: Checkpoint with id 7");
        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[test]
    fn codes_are_distinct_per_kind() {
        assert_eq!(CoreError::InvalidRole("x".into()).code(), "INVALID_ROLE");
        assert_eq!(CoreError::CrossTenant("x".into()).code(), "CROSS_TENANT");
        assert_eq!(CoreError::Conflict("x".into()).code(), "CONFLICT");
        assert_eq!(CoreError::Validation("x".into()).code(), "VALIDATION_ERROR");
    }
}
