//! Application context for the LiftLog CLI.
//!
//! Bundles CLI arguments with the lazily-loaded config file so handlers
//! don't thread both around.

use std::path::PathBuf;

use chrono::{Local, NaiveDate, Utc};
use once_cell::unsync::OnceCell;

use liftlog_core::nutrition::{self, HttpNutritionClient, API_KEY_ENV};
use liftlog_core::{LogStore, SqliteStore, UserContext};

use crate::cli::Cli;
use crate::config::{read_config, LiftLogConfig};
use crate::errors::CliError;
use crate::helpers::parse_date;
use crate::ui::UiContext;

use super::auth::sign_in_with_retry;
use super::resolver::{missing_store_message, resolve_config_path, resolve_store_path};

pub struct AppContext<'a> {
    cli: &'a Cli,
    config: OnceCell<Option<LiftLogConfig>>,
}

impl<'a> AppContext<'a> {
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config: OnceCell::new(),
        }
    }

    pub fn cli(&self) -> &Cli {
        self.cli
    }

    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// The config file, if one exists. Loaded on first use.
    pub fn config(&self) -> anyhow::Result<Option<&LiftLogConfig>> {
        let config = self
            .config
            .get_or_try_init(|| -> anyhow::Result<Option<LiftLogConfig>> {
                let path = resolve_config_path()?;
                if !path.exists() {
                    log::debug!("No config at {}", path.display());
                    return Ok(None);
                }
                log::debug!("Loading config from {}", path.display());
                read_config(&path).map(Some)
            })?;
        Ok(config.as_ref())
    }

    pub fn store_path(&self) -> anyhow::Result<PathBuf> {
        resolve_store_path(self.cli, self.config()?)
    }

    pub fn open_store(&self) -> anyhow::Result<SqliteStore> {
        let path = self.store_path()?;
        if !path.exists() {
            return Err(CliError::not_found(
                missing_store_message(&path),
                "Hint: Run `liftlog init` to create one.",
            )
            .into());
        }
        Ok(SqliteStore::open(&path)?)
    }

    /// Today's date: `--today`, else the configured timezone, else local time.
    pub fn today(&self) -> anyhow::Result<NaiveDate> {
        if let Some(value) = self.cli.today.as_deref() {
            return parse_date(value, Local::now().date_naive());
        }
        let timezone = self
            .config()?
            .and_then(|c| c.ui.timezone.as_deref())
            .filter(|tz| !tz.trim().is_empty());
        match timezone {
            Some(name) => {
                let tz: chrono_tz::Tz = name
                    .parse()
                    .map_err(|e| anyhow::anyhow!("Invalid timezone {} in config: {}", name, e))?;
                Ok(Utc::now().with_timezone(&tz).date_naive())
            }
            None => Ok(Local::now().date_naive()),
        }
    }

    pub fn ui_context(&self, json: bool) -> UiContext {
        UiContext::from_env(json, self.cli.no_color, self.cli.ascii)
    }

    /// Account email: `--user`/`LIFTLOG_USER`, else `[user] email`.
    pub fn user_email(&self) -> anyhow::Result<String> {
        if let Some(email) = self.cli.user.as_deref().filter(|e| !e.trim().is_empty()) {
            return Ok(email.trim().to_string());
        }
        if let Some(email) = self
            .config()?
            .and_then(|c| c.user.email.as_deref())
            .filter(|e| !e.trim().is_empty())
        {
            return Ok(email.trim().to_string());
        }
        Err(CliError::auth_failed_with_hint(
            "No account selected.",
            "Hint: Pass --user EMAIL or run `liftlog signup`.",
        )
        .into())
    }

    /// Open the store and sign in.
    pub fn session(&self) -> anyhow::Result<(SqliteStore, UserContext)> {
        let store = self.open_store()?;
        let email = self.user_email()?;
        let interactive = self.ui_context(false).is_interactive();
        let user = sign_in_with_retry(&store, &email, interactive)?;
        log::info!("Signed in as {}", email);
        Ok((store, user))
    }

    /// HTTP nutrition client from `[nutrition]` and `OPENAI_API_KEY`.
    pub fn nutrition_client(&self) -> anyhow::Result<HttpNutritionClient> {
        let section = self.config()?.map(|c| &c.nutrition);
        let configured_key = section.and_then(|s| s.api_key.as_deref());
        let api_key = nutrition::resolve_api_key(configured_key).ok_or_else(|| {
            CliError::not_found(
                "No API key for nutrition analysis.",
                format!(
                    "Hint: Set {} or add api_key under [nutrition] in the config.",
                    API_KEY_ENV
                ),
            )
        })?;

        let mut client = HttpNutritionClient::new(api_key);
        if let Some(base_url) = section.and_then(|s| s.base_url.as_deref()) {
            client = client.with_base_url(base_url);
        }
        if let Some(model) = section.and_then(|s| s.model.as_deref()) {
            client = client.with_model(model);
        }
        Ok(client)
    }
}
