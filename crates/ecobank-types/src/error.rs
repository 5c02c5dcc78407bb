//! Error types for EcoBank
//!
//! Three kinds only: the caller sent something malformed, a required row is
//! absent, or a collaborator (transaction source, budget source, factor
//! store) failed. Dependency failures are surfaced unchanged, never replaced
//! by zero-valued results.

use thiserror::Error;

/// Result type for EcoBank operations
pub type Result<T> = std::result::Result<T, CarbonError>;

/// EcoBank error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CarbonError {
    /// Malformed input, identified by the offending field
    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: String, reason: String },

    /// A row that the operation requires does not exist
    #[error("{entity} not found: {key}")]
    NotFound { entity: String, key: String },

    /// An external collaborator is unreachable or returned an error
    #[error("Dependency failure in {dependency}: {message}")]
    DependencyFailure { dependency: String, message: String },
}

impl CarbonError {
    /// Create an invalid input error
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            key: key.into(),
        }
    }

    /// Create a dependency failure error
    pub fn dependency(dependency: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DependencyFailure {
            dependency: dependency.into(),
            message: message.into(),
        }
    }

    /// The field named by an invalid input error
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::InvalidInput { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Check if this is a retriable error.
    ///
    /// Retry policy belongs to the caller; the engine only classifies.
    pub fn is_retriable(&self) -> bool {
        matches!(self, Self::DependencyFailure { .. })
    }

    /// Get an error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "INVALID_INPUT",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::DependencyFailure { .. } => "DEPENDENCY_FAILURE",
        }
    }
}
