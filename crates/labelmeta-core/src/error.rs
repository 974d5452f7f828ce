//! Error types for label metadata handling

use thiserror::Error;

/// Result type alias for metadata operations
pub type Result<T> = std::result::Result<T, MetadataError>;

/// Main error type for metadata operations
///
/// Only [`MetadataError::PreconditionViolation`] and storage failures abort a
/// call. The document kinds are recoverable: the store absorbs them, reports
/// them through the notifier and falls back to empty or absent data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetadataError {
    /// A required argument was empty or missing
    #[error("Precondition violated: {0}")]
    PreconditionViolation(String),

    /// Label document is missing required fields or has the wrong shape
    #[error("Invalid label document structure: {0}")]
    InvalidStructure(String),

    /// Label document is well formed but has no labels
    #[error("Label document has no labels: {0}")]
    EmptyLabelFile(String),

    /// Two labels share the same tag name
    #[error("Duplicate label '{0}' in label document")]
    DuplicateLabel(String),

    /// A label spans more than one page
    #[error("Label '{label}' spans more than one page (expected page {expected}, found {found})")]
    CrossPageLabel {
        label: String,
        expected: u32,
        found: u32,
    },

    /// Two entries claim the same bounding box on the same page
    #[error("Duplicate bounding box on page {page} (label '{label}')")]
    DuplicateBox { label: String, page: u32 },

    /// Document could not be parsed as JSON
    #[error("Unreadable document {path}: {reason}")]
    UnreadableDocument { path: String, reason: String },

    /// Generator document lacks `generators` or `generatorSettings`
    #[error("Invalid generator document: {0}")]
    InvalidGeneratorDocument(String),

    /// Serialization/Deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl MetadataError {
    /// Check if this error is one of the label validation kinds that fall
    /// back to an empty label document
    pub fn is_label_violation(&self) -> bool {
        matches!(
            self,
            MetadataError::InvalidStructure(_)
                | MetadataError::EmptyLabelFile(_)
                | MetadataError::DuplicateLabel(_)
                | MetadataError::CrossPageLabel { .. }
                | MetadataError::DuplicateBox { .. }
        )
    }

    /// Check if this error should be reported as information rather than
    /// as a failure
    pub fn is_informational(&self) -> bool {
        matches!(self, MetadataError::EmptyLabelFile(_))
    }
}

impl From<serde_json::Error> for MetadataError {
    fn from(err: serde_json::Error) -> Self {
        MetadataError::SerializationError(err.to_string())
    }
}
