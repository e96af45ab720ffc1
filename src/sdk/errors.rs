//! # SDK Errors

use thiserror::Error;

/// Result type for capability operations
pub type SdkResult<T> = Result<T, SdkError>;

/// Capability errors surfaced to function code
#[derive(Debug, Clone, Error)]
pub enum SdkError {
    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("Token generation failed")]
    TokenGenerationFailed,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Malformed token")]
    MalformedToken,
}

impl SdkError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            SdkError::InvalidMethod(_) => 400,
            SdkError::Fetch(_) => 502,
            SdkError::TokenGenerationFailed => 500,
            SdkError::TokenExpired => 401,
            SdkError::InvalidSignature => 401,
            SdkError::MalformedToken => 401,
        }
    }
}
