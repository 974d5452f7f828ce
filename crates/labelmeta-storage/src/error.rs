//! Storage-specific error types

use thiserror::Error;

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage-specific errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Named blob does not exist
    #[error("File not found: {0}")]
    NotFound(String),

    /// Path escapes the storage root or is otherwise unusable
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// URI scheme the backend cannot read
    #[error("Unsupported location: {0}")]
    Unsupported(String),

    /// Underlying I/O failure
    #[error("IO error on {path}: {message}")]
    Io { path: String, message: String },
}

impl StorageError {
    /// Check if this error is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }

    /// Map an I/O error on `path`, keeping not-found distinguishable
    pub fn from_io(path: impl Into<String>, err: std::io::Error) -> Self {
        let path = path.into();
        if err.kind() == std::io::ErrorKind::NotFound {
            StorageError::NotFound(path)
        } else {
            StorageError::Io {
                path,
                message: err.to_string(),
            }
        }
    }
}
