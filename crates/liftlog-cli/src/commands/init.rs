use std::path::PathBuf;

use liftlog_core::{LogStore, SqliteStore};

use crate::app::{resolve_config_path, AppContext};
use crate::cli::InitArgs;
use crate::config::{default_store_path, read_config, write_config, LiftLogConfig};
use crate::errors::CliError;
use crate::ui::{hint, print, receipt};

fn parse_timezone(value: &str) -> anyhow::Result<Option<String>> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("auto") {
        return Ok(None);
    }

    let tz = trimmed
        .parse::<chrono_tz::Tz>()
        .map_err(|_| CliError::invalid_input(format!("Invalid timezone: {}", trimmed)))?;
    Ok(Some(tz.to_string()))
}

pub fn handle_init(ctx: &AppContext, args: &InitArgs) -> anyhow::Result<()> {
    let ui = ctx.ui_context(false);
    let config_path = resolve_config_path()?;
    if config_path.exists() && !args.force {
        return Err(CliError::invalid_input(format!(
            "Config already exists at {}. Use --force to overwrite it.",
            config_path.display()
        ))
        .into());
    }

    let store_path = match args.path.as_deref().or(ctx.cli().db.as_deref()) {
        Some(path) => PathBuf::from(path),
        None => default_store_path()?,
    };
    let timezone = match args.timezone.as_deref() {
        Some(value) => parse_timezone(value)?,
        None => None,
    };

    let created = if store_path.exists() {
        // Validates the format version.
        SqliteStore::open(&store_path)?;
        log::info!("Reusing existing store at {}", store_path.display());
        false
    } else {
        SqliteStore::create(&store_path)?;
        true
    };

    let mut config = LiftLogConfig::new(store_path.clone(), timezone);
    if config_path.exists() {
        // --force keeps the account and nutrition settings.
        match read_config(&config_path) {
            Ok(previous) => {
                config.user = previous.user;
                config.nutrition = previous.nutrition;
            }
            Err(e) => log::warn!("Replacing unreadable config: {}", e),
        }
    }
    write_config(&config_path, &config)?;

    if !ctx.quiet() {
        let store_display = store_path.display().to_string();
        let config_display = config_path.display().to_string();
        let title = if created {
            "Store created"
        } else {
            "Store already exists"
        };
        print(
            &ui,
            &receipt(
                &ui,
                title,
                &[("Store", &store_display), ("Config", &config_display)],
            ),
        );
        print(
            &ui,
            &hint(&ui, "liftlog signup --email EMAIL --last-name NAME --first-name NAME"),
        );
    }
    Ok(())
}
