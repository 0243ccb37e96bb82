//! Domain-level error types.

use scribe_shared::ValidationError;
use thiserror::Error;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Missing or rejected credential.
    #[error("{0}")]
    Unauthorized(String),

    /// Disallowed by policy regardless of who is asking.
    #[error("{0}")]
    Forbidden(String),

    /// Absent, or owned by someone else. The two are never distinguished.
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    #[error("{0}")]
    Conflict(String),

    /// Upstream fault. `message` is client-safe, `detail` stays server-side.
    #[error("{message}: {detail}")]
    Internal { message: &'static str, detail: String },
}

impl DomainError {
    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }

    pub fn internal(message: &'static str, detail: impl Into<String>) -> Self {
        Self::Internal {
            message,
            detail: detail.into(),
        }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Constraint(detail) => {
                tracing::warn!(%detail, "Constraint violation");
                DomainError::Conflict("Resource already exists".to_string())
            }
            other => DomainError::internal("Internal server error", other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_detail_stays_server_side() {
        let err = DomainError::from(RepoError::Constraint(
            "duplicate key value violates unique constraint \"blogs_pkey\"".to_string(),
        ));
        assert!(matches!(err, DomainError::Conflict(ref m) if m == "Resource already exists"));
    }

    #[test]
    fn test_query_failure_is_internal() {
        let err = DomainError::from(RepoError::Query("syntax error".to_string()));
        assert!(matches!(
            err,
            DomainError::Internal {
                message: "Internal server error",
                ..
            }
        ));
    }
}
