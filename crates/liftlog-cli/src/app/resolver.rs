//! Path resolution for config and store files.

use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::config::{default_config_path, default_store_path, LiftLogConfig};
use crate::constants::env;

/// Resolve the config file path, checking LIFTLOG_CONFIG first.
pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var(env::CONFIG) {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

/// Resolve the store path: `--db`/`LIFTLOG_DB`, then config, then the default.
pub fn resolve_store_path(cli: &Cli, config: Option<&LiftLogConfig>) -> anyhow::Result<PathBuf> {
    if let Some(path) = cli.db.as_deref().filter(|p| !p.trim().is_empty()) {
        return Ok(PathBuf::from(path));
    }
    if let Some(config) = config {
        return Ok(PathBuf::from(&config.store.path));
    }
    default_store_path()
}

/// Error message when the store file is missing.
pub fn missing_store_message(path: &Path) -> String {
    format!("No store found at {}", path.display())
}
