//! # Blob Store Errors

use thiserror::Error;

/// Result type for blob operations
pub type BlobResult<T> = Result<T, BlobError>;

/// Blob store errors
#[derive(Debug, Clone, Error)]
pub enum BlobError {
    #[error("Blob not found: {0}")]
    NotFound(String),

    #[error("Invalid namespace: {0}")]
    InvalidNamespace(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("I/O error: {0}")]
    IoError(String),
}

impl BlobError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            BlobError::NotFound(_) => 404,
            BlobError::InvalidNamespace(_) => 400,
            BlobError::InvalidKey(_) => 400,
            BlobError::IoError(_) => 500,
        }
    }
}
