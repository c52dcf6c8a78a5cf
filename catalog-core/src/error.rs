//! Error types for the catalog store

use thiserror::Error;

/// Result type alias using catalog's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Failures that prevent an operation from producing an outcome.
///
/// Validation problems are not errors; they are reported as
/// [`Warning`](crate::outcome::Warning) values inside the outcome.
#[derive(Debug, Error)]
pub enum Error {
    // ============ Storage Errors ============
    /// The backing file could not be read or written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file is not a valid JSON array of products,
    /// or the record set could not be serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ============ Generic Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether the error came from the contents of the backing file
    /// rather than from the filesystem
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Json(_))
    }
}
