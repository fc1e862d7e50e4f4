//! Password handling and sign-in with retry logic.

use dialoguer::Password;

use liftlog_core::accounts::{self, MIN_PASSWORD_LEN};
use liftlog_core::{LiftLogError, LogStore, UserContext};

use crate::constants::{env, MAX_PASSWORD_ATTEMPTS};
use crate::errors::CliError;

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Sign in as `email`.
///
/// `LIFTLOG_PASSWORD` is tried once. Otherwise, when interactive, the user is
/// prompted up to `MAX_PASSWORD_ATTEMPTS` times.
pub fn sign_in_with_retry<S: LogStore + ?Sized>(
    store: &S,
    email: &str,
    interactive: bool,
) -> anyhow::Result<UserContext> {
    if store.get_profile_by_email(email)?.is_none() {
        return Err(CliError::auth_failed_with_hint(
            format!("No account for {}", email),
            format!("Hint: Run `liftlog signup --email {}` first.", email),
        )
        .into());
    }

    if let Some(password) = env_value(env::PASSWORD) {
        return Ok(accounts::sign_in(store, email, &password)?);
    }

    if !interactive {
        return Err(CliError::auth_failed_with_hint(
            "No password provided.",
            format!("Hint: Set {} or run interactively.", env::PASSWORD),
        )
        .into());
    }

    let mut attempts = 0;
    loop {
        attempts += 1;
        let password = Password::new()
            .with_prompt(format!("Password for {}", email))
            .interact()?;
        match accounts::sign_in(store, email, &password) {
            Ok(user) => return Ok(user),
            Err(LiftLogError::Auth(message)) => {
                let remaining = MAX_PASSWORD_ATTEMPTS.saturating_sub(attempts);
                if remaining == 0 {
                    return Err(CliError::auth_failed("Too many failed password attempts.").into());
                }
                eprintln!(
                    "{}. {} attempt{} remaining.",
                    message,
                    remaining,
                    if remaining == 1 { "" } else { "s" }
                );
            }
            Err(err) => return Err(err.into()),
        }
    }
}

/// Read a new account password, confirming it at an interactive prompt.
///
/// `env_var` supplies the password non-interactively. Returns
/// `(password, confirmation)` so the account layer performs the match and
/// length checks.
pub fn read_new_password(env_var: &str, interactive: bool) -> anyhow::Result<(String, String)> {
    if let Some(password) = env_value(env_var) {
        return Ok((password.clone(), password));
    }
    if !interactive {
        return Err(CliError::invalid_input(format!(
            "No password provided. Set {} or run interactively.",
            env_var
        ))
        .into());
    }
    let password = Password::new()
        .with_prompt(format!("New password (min {} characters)", MIN_PASSWORD_LEN))
        .interact()?;
    let confirmation = Password::new()
        .with_prompt("Confirm password")
        .allow_empty_password(true)
        .interact()?;
    Ok((password, confirmation))
}

/// The account a command reads: the signed-in user, or `--for EMAIL`.
pub fn acting_user<S: LogStore + ?Sized>(
    store: &S,
    user: &UserContext,
    for_email: Option<&str>,
) -> anyhow::Result<UserContext> {
    let Some(email) = for_email.map(str::trim).filter(|e| !e.is_empty()) else {
        return Ok(*user);
    };
    match accounts::act_for(store, user, email) {
        Ok(target) => Ok(target),
        Err(LiftLogError::Auth(message)) => Err(CliError::auth_failed_with_hint(
            message,
            "Hint: Sign in with an admin account (--user EMAIL) or drop --for.",
        )
        .into()),
        Err(LiftLogError::NotFound(_)) => Err(CliError::not_found(
            format!("No account for {}", email),
            "Hint: Run `liftlog users` to list accounts.",
        )
        .into()),
        Err(err) => Err(err.into()),
    }
}
