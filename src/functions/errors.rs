//! # Function Errors

use thiserror::Error;

use crate::store::StoreError;

/// Result type for function operations
pub type FunctionResult<T> = Result<T, FunctionError>;

/// Function errors
#[derive(Debug, Clone, Error)]
pub enum FunctionError {
    #[error("failed to get function: {0}")]
    NotFound(String),

    #[error("Compile error: {0}")]
    Compile(String),

    #[error("Execution failed: {0}")]
    Execution(String),

    #[error("Execution timed out after {0}ms")]
    Timeout(u64),

    #[error("Call depth limit exceeded at depth {0}")]
    RecursionLimitExceeded(u32),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl FunctionError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            FunctionError::NotFound(_) => 404,
            FunctionError::Compile(_) => 400,
            FunctionError::Execution(_) => 500,
            FunctionError::Timeout(_) => 504,
            FunctionError::RecursionLimitExceeded(_) => 508,
            FunctionError::Store(_) => 500,
            FunctionError::Internal(_) => 500,
        }
    }
}

impl From<StoreError> for FunctionError {
    fn from(e: StoreError) -> Self {
        FunctionError::Store(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(FunctionError::NotFound("greet".into()).status_code(), 404);
        assert_eq!(FunctionError::Timeout(1000).status_code(), 504);
        assert_eq!(FunctionError::RecursionLimitExceeded(32).status_code(), 508);
    }

    #[test]
    fn test_not_found_message() {
        let err = FunctionError::NotFound("greet".into());
        assert_eq!(err.to_string(), "failed to get function: greet");
    }
}
