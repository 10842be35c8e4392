//! Admin account management commands.
//!
//! # Usage
//!
//! ```bash
//! ropero-cli admin create -e admin@example.com -n "Admin Name" -p "a strong password"
//! ```
//!
//! If the email is already registered, the existing account is promoted to
//! admin instead of creating a duplicate.

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};

use ropero_core::Email;

use super::{CommandError, connect};

const MIN_PASSWORD_LENGTH: usize = 8;

/// Create a new admin account, or promote an existing one.
///
/// # Errors
///
/// Returns an error for an invalid email, a short password, or a database
/// failure.
pub async fn create(
    email: &str,
    name: &str,
    password: &str,
    phone: Option<&str>,
) -> Result<i32, CommandError> {
    let email = Email::parse(email).map_err(|e| CommandError::InvalidInput(e.to_string()))?;

    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(CommandError::InvalidInput(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    let pool = connect().await?;

    // Promote instead of duplicating when the email is taken
    let existing: Option<(i32,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(email.as_str())
        .fetch_optional(&pool)
        .await?;

    if let Some((id,)) = existing {
        sqlx::query("UPDATE users SET is_admin = TRUE, updated_at = now() WHERE id = $1")
            .bind(id)
            .execute(&pool)
            .await?;

        tracing::info!("Existing account {} promoted to admin (id {})", email, id);
        return Ok(id);
    }

    let password_hash = hash_password(password)?;

    let (id,): (i32,) = sqlx::query_as(
        r"
        INSERT INTO users (name, email, password_hash, phone, is_admin, is_authenticated)
        VALUES ($1, $2, $3, $4, TRUE, FALSE)
        RETURNING id
        ",
    )
    .bind(name)
    .bind(email.as_str())
    .bind(&password_hash)
    .bind(phone)
    .fetch_one(&pool)
    .await?;

    tracing::info!("Admin account created! ID: {}, Email: {}", id, email);
    Ok(id)
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, CommandError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CommandError::InvalidInput(format!("password hashing failed: {e}")))
}
