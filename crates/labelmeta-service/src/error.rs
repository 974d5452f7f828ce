//! Service-layer error types
//!
//! Recoverable document problems never reach this type; the metadata store
//! absorbs them and reports through the notifier. What remains are
//! precondition failures and storage failures while persisting.

use labelmeta_core::MetadataError;
use labelmeta_storage::StorageError;
use thiserror::Error;

/// Result type alias for service operations
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Service-layer error types
#[derive(Error, Debug)]
pub enum ServiceError {
    /// A required argument was empty or missing
    #[error("Precondition violated: {0}")]
    PreconditionViolation(String),

    /// Storage backend failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Document failed validation
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// Serialization failure while persisting
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal service error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Check if this error was caused by bad input
    pub fn is_precondition(&self) -> bool {
        matches!(self, ServiceError::PreconditionViolation(_))
    }
}

impl From<MetadataError> for ServiceError {
    fn from(err: MetadataError) -> Self {
        match err {
            MetadataError::PreconditionViolation(msg) => ServiceError::PreconditionViolation(msg),
            MetadataError::SerializationError(msg) => ServiceError::Serialization(msg),
            other => ServiceError::ValidationFailed(other.to_string()),
        }
    }
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidPath(msg) => ServiceError::PreconditionViolation(msg),
            other => ServiceError::Storage(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::Serialization(err.to_string())
    }
}
