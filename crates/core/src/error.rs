use crate::types::DbId;

/// Domain errors shared by every layer above `core`.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// The entity exists but lacks data required to compute a result
    /// (e.g. a session without a usable video duration).
    #[error("Cannot resolve {entity} {id}: {reason}")]
    Unresolvable {
        entity: &'static str,
        id: DbId,
        reason: String,
    },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
