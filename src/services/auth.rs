//! Account service: email/password registration and login.
//!
//! Passwords are stored as argon2 PHC strings. Hashing runs on the blocking
//! pool so a burst of logins cannot stall the async workers.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use serde::Deserialize;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::share::generate_share_code;

pub const MIN_PASSWORD_LEN: usize = 8;
const SHARE_CODE_ATTEMPTS: usize = 5;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid email")]
    InvalidEmail,
    #[error("password must be at least 8 characters")]
    PasswordTooShort,
    #[error("passwords do not match")]
    PasswordMismatch,
    #[error("an account with this email already exists")]
    EmailTaken,
    #[error("Failed to authenticate.")]
    InvalidCredentials,
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error("could not allocate a unique share code")]
    ShareCodeExhausted,
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// Sign-up form body.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    #[serde(alias = "passwordConfirm")]
    pub password_confirm: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Registration input after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub email: String,
    pub name: String,
}

#[must_use]
pub fn normalize_email(email: &str) -> Option<String> {
    let normalized = email.trim().to_ascii_lowercase();
    let (local, domain) = normalized.split_once('@')?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return None;
    }
    Some(normalized)
}

fn name_from_email(email: &str) -> String {
    email
        .split('@')
        .next()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or("user")
        .to_owned()
}

/// Check a sign-up form without touching the database.
///
/// # Errors
///
/// `InvalidEmail`, `PasswordTooShort` or `PasswordMismatch`.
pub fn validate_registration(input: &RegisterInput) -> Result<NewAccount, AuthError> {
    let email = normalize_email(&input.email).ok_or(AuthError::InvalidEmail)?;
    if input.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::PasswordTooShort);
    }
    if input.password != input.password_confirm {
        return Err(AuthError::PasswordMismatch);
    }
    let name = input
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map_or_else(|| name_from_email(&email), str::to_owned);
    Ok(NewAccount { email, name })
}

/// Hash a password into a PHC string with a fresh salt.
///
/// # Errors
///
/// Returns `Hash` if argon2 rejects the input.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hash(e.to_string()))
}

#[must_use]
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    PasswordHash::new(stored_hash)
        .is_ok_and(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
}

async fn hash_password_blocking(password: String) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AuthError::Hash(e.to_string()))?
}

/// Create an account. Returns the new user's id.
///
/// # Errors
///
/// Validation errors, `EmailTaken`, or a database error.
pub async fn register(pool: &PgPool, input: &RegisterInput) -> Result<Uuid, AuthError> {
    let account = validate_registration(input)?;
    let password_hash = hash_password_blocking(input.password.clone()).await?;

    // Share codes are random; retry the rare collision with a fresh one.
    for _ in 0..SHARE_CODE_ATTEMPTS {
        let result = sqlx::query(
            "INSERT INTO users (email, name, password_hash, share_code)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(&account.email)
        .bind(&account.name)
        .bind(&password_hash)
        .bind(generate_share_code())
        .fetch_one(pool)
        .await;

        match result {
            Ok(row) => {
                let id: Uuid = row.get("id");
                tracing::info!(user_id = %id, "account registered");
                return Ok(id);
            }
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                if db.constraint() == Some("users_email_key") {
                    return Err(AuthError::EmailTaken);
                }
                tracing::warn!(constraint = ?db.constraint(), "share code collision; retrying");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(AuthError::ShareCodeExhausted)
}

/// Verify credentials. Returns the user's id.
///
/// # Errors
///
/// `InvalidCredentials` for an unknown email or wrong password.
pub async fn login(pool: &PgPool, email: &str, password: &str) -> Result<Uuid, AuthError> {
    let email = normalize_email(email).ok_or(AuthError::InvalidCredentials)?;

    let row = sqlx::query("SELECT id, password_hash FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(pool)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    let user_id: Uuid = row.get("id");
    let stored_hash: String = row.get("password_hash");
    let password = password.to_owned();
    let valid = tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
        .await
        .map_err(|e| AuthError::Hash(e.to_string()))?;

    if !valid {
        tracing::info!(%user_id, "login rejected");
        return Err(AuthError::InvalidCredentials);
    }
    Ok(user_id)
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
