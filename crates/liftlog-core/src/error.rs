//! Error types for LiftLog core operations.
//!
//! Errors are descriptive at the core level; the CLI layer maps them to
//! exit codes and user-facing messages.

use thiserror::Error;

/// Result type alias for LiftLog operations.
pub type Result<T> = std::result::Result<T, LiftLogError>;

/// Core error type for LiftLog operations.
#[derive(Debug, Error)]
pub enum LiftLogError {
    /// Data validation error (bad set values, password rules)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Invalid user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Storage backend error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing or rejected credentials
    #[error("Authentication required: {0}")]
    Auth(String),

    /// Remote service failure (nutrition analysis endpoint)
    #[error("Remote error: {0}")]
    Remote(String),

    /// Spreadsheet export failure
    #[error("Export error: {0}")]
    Export(String),

    /// Generic error (fallback)
    #[error("{0}")]
    Other(String),
}

impl From<rusqlite::Error> for LiftLogError {
    fn from(err: rusqlite::Error) -> Self {
        LiftLogError::Storage(err.to_string())
    }
}

impl From<std::io::Error> for LiftLogError {
    fn from(err: std::io::Error) -> Self {
        LiftLogError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for LiftLogError {
    fn from(err: serde_json::Error) -> Self {
        LiftLogError::Validation(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for LiftLogError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        LiftLogError::Export(err.to_string())
    }
}
