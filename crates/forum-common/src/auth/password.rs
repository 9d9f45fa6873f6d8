//! Credential hashing and input rules for local accounts
//!
//! Passwords are hashed with Argon2id. Login against an unknown username still
//! spends one Argon2 computation so both failure paths cost the
//! same.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use forum_core::{DomainError, ANONYMOUS_DISPLAY_NAME, GUEST_DISPLAY_NAME};

use crate::error::AppError;

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_PASSWORD_LEN: usize = 128;
pub const MIN_USERNAME_LEN: usize = 3;
pub const MAX_USERNAME_LEN: usize = 32;

/// Hash a password using Argon2id
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {e}")))
}

/// Verify a password against a stored PHC hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid password hash format: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Verify `password` against `stored`, or spend one hash when there is
/// nothing to compare against. Returns `InvalidCredentials` on any mismatch.
pub fn check_credentials(password: &str, stored: Option<&str>) -> Result<(), AppError> {
    match stored {
        Some(hash) if verify_password(password, hash)? => Ok(()),
        Some(_) => Err(AppError::InvalidCredentials),
        None => {
            let _ = hash_password(password)?;
            Err(AppError::InvalidCredentials)
        }
    }
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LEN {
        return Err(DomainError::WeakPassword(format!(
            "must be at least {MIN_PASSWORD_LEN} characters long"
        ))
        .into());
    }
    if len > MAX_PASSWORD_LEN {
        return Err(DomainError::WeakPassword(format!(
            "must be at most {MAX_PASSWORD_LEN} characters long"
        ))
        .into());
    }
    Ok(())
}

/// Local usernames: ASCII letters, digits, `_`, `-` and `.`.
///
/// `:` is excluded because federated accounts live under `provider:login`,
/// and the guest display names are reserved.
pub fn validate_username(username: &str) -> Result<(), AppError> {
    let len = username.chars().count();
    if !(MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&len) {
        return Err(DomainError::InvalidUsername(format!(
            "must be between {MIN_USERNAME_LEN} and {MAX_USERNAME_LEN} characters"
        ))
        .into());
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        return Err(DomainError::InvalidUsername(
            "may only contain letters, digits, '_', '-' and '.'".to_string(),
        )
        .into());
    }
    if username.eq_ignore_ascii_case(GUEST_DISPLAY_NAME)
        || username.eq_ignore_ascii_case(ANONYMOUS_DISPLAY_NAME)
    {
        return Err(DomainError::InvalidUsername(format!("{username} is reserved")).into());
    }
    Ok(())
}
