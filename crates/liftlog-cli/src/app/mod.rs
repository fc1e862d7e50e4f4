//! Application-level utilities for the LiftLog CLI.
//!
//! This module provides:
//! - Path resolution for config and store files
//! - The per-invocation application context
//! - Password handling with retry logic, and `--for` account resolution

mod auth;
mod context;
mod resolver;

pub use auth::{acting_user, read_new_password, sign_in_with_retry};
pub use context::AppContext;
pub use resolver::{missing_store_message, resolve_config_path, resolve_store_path};
