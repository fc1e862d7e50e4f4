//! Constants used throughout the CLI.

/// Directory name under the XDG config and data homes.
pub const APP_DIR: &str = "liftlog";

/// Config file name.
pub const CONFIG_FILE: &str = "config.toml";

/// Default store file name.
pub const STORE_FILE: &str = "liftlog.db";

/// Environment variables read by the CLI.
pub mod env {
    /// Config file override.
    pub const CONFIG: &str = "LIFTLOG_CONFIG";

    /// Account password (non-interactive sign-in and sign-up).
    pub const PASSWORD: &str = "LIFTLOG_PASSWORD";

    /// Replacement password for non-interactive `passwd`.
    pub const NEW_PASSWORD: &str = "LIFTLOG_NEW_PASSWORD";
}

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// General failure.
    pub const FAILURE: i32 = 1;

    /// Resource not found (config, store, log).
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;

    /// Authentication failed (no account, wrong password).
    pub const AUTH_FAILED: i32 = 5;

    /// Integrity check failed.
    pub const INTEGRITY_FAILED: i32 = 6;
}

/// Maximum password attempts at an interactive prompt.
pub const MAX_PASSWORD_ATTEMPTS: usize = 3;
