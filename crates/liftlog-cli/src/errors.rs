//! CLI error types for structured error handling.
//!
//! This module provides typed errors that map to specific exit codes,
//! enabling consistent error handling across the CLI. Core errors that reach
//! `main` untyped are mapped by variant.

use std::fmt;

use liftlog_core::LiftLogError;

use crate::constants::exit_codes;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Resource not found (config, store, log)
    NotFound { message: String, hint: String },

    /// Authentication failed (no account selected, wrong password)
    AuthFailed {
        message: String,
        hint: Option<String>,
    },

    /// Invalid user input
    InvalidInput(String),

    /// Store integrity check failed
    IntegrityFailed(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotFound { message, hint } => {
                write!(f, "{}\n{}", message, hint)
            }
            CliError::AuthFailed { message, hint } => {
                if let Some(h) = hint {
                    write!(f, "{}\n{}", message, h)
                } else {
                    write!(f, "{}", message)
                }
            }
            CliError::InvalidInput(message) => write!(f, "{}", message),
            CliError::IntegrityFailed(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Create a NotFound error with message and hint.
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::NotFound {
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// Create an AuthFailed error with message and optional hint.
    pub fn auth_failed(message: impl Into<String>) -> Self {
        CliError::AuthFailed {
            message: message.into(),
            hint: None,
        }
    }

    /// Create an AuthFailed error with message and hint.
    pub fn auth_failed_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::AuthFailed {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput(message.into())
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::AuthFailed { .. } => exit_codes::AUTH_FAILED,
            CliError::InvalidInput(_) => exit_codes::INVALID_INPUT,
            CliError::IntegrityFailed(_) => exit_codes::INTEGRITY_FAILED,
        }
    }
}

/// Exit code for any error that reaches `main`.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        return cli_err.exit_code();
    }
    match err.downcast_ref::<LiftLogError>() {
        Some(LiftLogError::NotFound(_)) => exit_codes::NOT_FOUND,
        Some(LiftLogError::Validation(_)) | Some(LiftLogError::InvalidInput(_)) => {
            exit_codes::INVALID_INPUT
        }
        Some(LiftLogError::Auth(_)) => exit_codes::AUTH_FAILED,
        _ => exit_codes::FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_error_exit_codes() {
        assert_eq!(CliError::not_found("a", "b").exit_code(), exit_codes::NOT_FOUND);
        assert_eq!(CliError::auth_failed("a").exit_code(), exit_codes::AUTH_FAILED);
        assert_eq!(CliError::invalid_input("a").exit_code(), exit_codes::INVALID_INPUT);
        assert_eq!(
            CliError::IntegrityFailed("a".into()).exit_code(),
            exit_codes::INTEGRITY_FAILED
        );
    }

    #[test]
    fn test_core_errors_map_to_exit_codes() {
        let err = anyhow::Error::from(LiftLogError::Validation("no sets".into()));
        assert_eq!(exit_code_for(&err), exit_codes::INVALID_INPUT);

        let err = anyhow::Error::from(LiftLogError::Auth("bad".into()));
        assert_eq!(exit_code_for(&err), exit_codes::AUTH_FAILED);

        let err = anyhow::Error::from(LiftLogError::Storage("disk".into()));
        assert_eq!(exit_code_for(&err), exit_codes::FAILURE);

        let err = anyhow::anyhow!("plain");
        assert_eq!(exit_code_for(&err), exit_codes::FAILURE);
    }

    #[test]
    fn test_display_includes_hint() {
        let err = CliError::auth_failed_with_hint("No account", "Hint: run liftlog signup");
        assert_eq!(err.to_string(), "No account\nHint: run liftlog signup");
    }
}
