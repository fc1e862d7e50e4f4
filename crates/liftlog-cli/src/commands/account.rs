use liftlog_core::accounts::{self, SignUp};
use liftlog_core::storage::Role;
use liftlog_core::LogStore;

use crate::app::{read_new_password, resolve_config_path, AppContext};
use crate::cli::{PasswdArgs, SignupArgs, UsersArgs};
use crate::config::{read_config, write_config};
use crate::constants::env;
use crate::errors::CliError;
use crate::ui::{print, receipt, simple_table, Column};

pub fn handle_signup(ctx: &AppContext, args: &SignupArgs) -> anyhow::Result<()> {
    let ui = ctx.ui_context(false);
    let mut store = ctx.open_store()?;

    let interactive = ui.is_interactive() && !args.no_input;
    let (password, password_confirmation) = read_new_password(env::PASSWORD, interactive)?;
    let form = SignUp {
        email: args.email.clone(),
        last_name: args.last_name.clone(),
        first_name: args.first_name.clone(),
        display_name: args.display_name.clone(),
        password,
        password_confirmation,
    };
    let user = accounts::sign_up(&mut store, &form)?;
    log::info!("Created account {}", user.user_id);

    // First account becomes the default.
    let config_path = resolve_config_path()?;
    let mut made_default = false;
    if config_path.exists() {
        let mut config = read_config(&config_path)?;
        if config.user.email.is_none() {
            config.user.email = Some(form.email.trim().to_lowercase());
            write_config(&config_path, &config)?;
            made_default = true;
        }
    }

    if !ctx.quiet() {
        let email = form.email.trim().to_lowercase();
        let name = format!("{} {}", form.last_name.trim(), form.first_name.trim());
        let default = if made_default { "yes" } else { "no" };
        print(
            &ui,
            &receipt(
                &ui,
                "Account created",
                &[("Email", &email), ("Name", &name), ("Default", default)],
            ),
        );
    }
    Ok(())
}

/// Change the signed-in account's password.
pub fn handle_passwd(ctx: &AppContext, args: &PasswdArgs) -> anyhow::Result<()> {
    let (mut store, user) = ctx.session()?;
    let ui = ctx.ui_context(false);
    let interactive = ui.is_interactive() && !args.no_input;
    let (password, confirmation) = read_new_password(env::NEW_PASSWORD, interactive)?;
    accounts::change_password(&mut store, &user, &password, &confirmation)?;

    if !ctx.quiet() {
        let email = ctx.user_email()?;
        print(&ui, &receipt(&ui, "Password changed", &[("Email", &email)]));
    }
    Ok(())
}

/// List accounts. Admin only.
pub fn handle_users(ctx: &AppContext, args: &UsersArgs) -> anyhow::Result<()> {
    let (store, user) = ctx.session()?;
    let is_admin = store
        .get_profile(&user.user_id)?
        .is_some_and(|profile| profile.role == Role::Admin);
    if !is_admin {
        return Err(CliError::auth_failed("Only an admin can list accounts.").into());
    }
    let profiles = store.list_profiles()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&profiles)?);
        return Ok(());
    }

    let ui = ctx.ui_context(false);
    let columns = [
        Column::new("EMAIL"),
        Column::new("NAME"),
        Column::new("ROLE"),
    ];
    let rows: Vec<Vec<String>> = profiles
        .iter()
        .map(|profile| {
            vec![
                profile.email.clone(),
                profile.full_name(),
                profile.role.as_str().to_string(),
            ]
        })
        .collect();
    print(&ui, &simple_table(&ui, &columns, &rows));
    Ok(())
}
