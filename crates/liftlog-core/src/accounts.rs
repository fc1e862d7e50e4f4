//! Account sign-up, sign-in and password changes.
//!
//! Passwords are stored as Argon2id PHC strings. Sign-in yields the
//! `UserContext` that every user-owned store call takes. The first account
//! created in a store is its admin; admins may act on other accounts.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::error::{LiftLogError, Result};
use crate::storage::{LogStore, NewProfile, Role, UserContext};

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Sign-up form input.
#[derive(Debug, Clone)]
pub struct SignUp {
    pub email: String,
    pub last_name: String,
    pub first_name: String,
    pub display_name: Option<String>,
    pub password: String,
    pub password_confirmation: String,
}

/// Check the sign-up form.
///
/// # Errors
///
/// Returns `LiftLogError::Validation` if a required field is blank, the
/// passwords differ, or the password is shorter than `MIN_PASSWORD_LEN`.
pub fn validate_signup(form: &SignUp) -> Result<()> {
    let email = form.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(LiftLogError::Validation(format!(
            "Invalid email address: {}",
            form.email
        )));
    }
    if form.last_name.trim().is_empty() || form.first_name.trim().is_empty() {
        return Err(LiftLogError::Validation(
            "Last name and first name are required".to_string(),
        ));
    }
    validate_new_password(&form.password, &form.password_confirmation)
}

/// Confirmation must match and the password must be at least
/// `MIN_PASSWORD_LEN` characters.
pub fn validate_new_password(password: &str, confirmation: &str) -> Result<()> {
    if password != confirmation {
        return Err(LiftLogError::Validation(
            "Passwords do not match".to_string(),
        ));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(LiftLogError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

/// Hash a password for storage.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| LiftLogError::Other(format!("Password hashing failed: {}", e)))?;
    Ok(hash.to_string())
}

/// Check a password against a stored hash. Unparsable hashes never verify.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            log::error!("Failed to parse stored password hash: {}", e);
            false
        }
    }
}

/// Validate the form, then create the profile.
pub fn sign_up<S: LogStore + ?Sized>(store: &mut S, form: &SignUp) -> Result<UserContext> {
    validate_signup(form)?;

    let mut profile = NewProfile::new(
        form.email.trim(),
        form.last_name.trim(),
        form.first_name.trim(),
        hash_password(&form.password)?,
    );
    if let Some(display_name) = form
        .display_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
    {
        profile = profile.with_display_name(display_name);
    }

    if store.list_profiles()?.is_empty() {
        profile = profile.with_role(Role::Admin);
    }

    let id = store.create_profile(&profile)?;
    Ok(UserContext::new(id))
}

/// Set a new password for a signed-in user.
///
/// # Errors
///
/// Returns `LiftLogError::Validation` under the same rules as sign-up.
/// Nothing is written in that case.
pub fn change_password<S: LogStore + ?Sized>(
    store: &mut S,
    user: &UserContext,
    password: &str,
    confirmation: &str,
) -> Result<()> {
    validate_new_password(password, confirmation)?;
    store.update_password_hash(&user.user_id, &hash_password(password)?)
}

/// Resolve the account a signed-in user acts on.
///
/// Acting on one's own account is always allowed. Any other account
/// requires the admin role.
///
/// # Errors
///
/// Returns `LiftLogError::Auth` when a non-admin names another account and
/// `LiftLogError::NotFound` when the email is unknown.
pub fn act_for<S: LogStore + ?Sized>(
    store: &S,
    actor: &UserContext,
    email: &str,
) -> Result<UserContext> {
    let actor_profile = store
        .get_profile(&actor.user_id)?
        .ok_or_else(|| LiftLogError::Auth("Signed-in account no longer exists".to_string()))?;
    if actor_profile.email == email.trim().to_lowercase() {
        return Ok(*actor);
    }
    if actor_profile.role != Role::Admin {
        return Err(LiftLogError::Auth(
            "Only an admin can act on another account".to_string(),
        ));
    }
    let target = store
        .get_profile_by_email(email)?
        .ok_or_else(|| LiftLogError::NotFound(format!("Account {}", email.trim())))?;
    log::info!("Admin {} acting for {}", actor_profile.email, target.email);
    Ok(UserContext::new(target.id))
}

/// Resolve credentials to a user.
///
/// # Errors
///
/// Returns `LiftLogError::Auth` for an unknown email or a wrong password.
/// Both cases produce the same message.
pub fn sign_in<S: LogStore + ?Sized>(
    store: &S,
    email: &str,
    password: &str,
) -> Result<UserContext> {
    let rejected = || LiftLogError::Auth("Invalid email or password".to_string());

    let profile = store.get_profile_by_email(email)?.ok_or_else(rejected)?;
    if !verify_password(password, &profile.password_hash) {
        log::warn!("Sign-in failed for {}", profile.email);
        return Err(rejected());
    }
    Ok(UserContext::new(profile.id))
}
