//! Authentication service.
//!
//! Provides password authentication with Argon2id hashes and stateless
//! bearer tokens (HS256 JWTs).

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use ropero_core::{Email, UserId};

use crate::db::RepositoryError;
use crate::db::users::{UserChanges, UserRepository};
use crate::models::user::{RegisterUser, UpdateUser, User};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Token lifetime in seconds (24 hours).
const TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

/// The claims carried by a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: i32,
    /// Email at issuance time.
    pub email: String,
    /// Admin flag at issuance time.
    pub is_admin: bool,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

impl Claims {
    /// The user this token was issued to.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        UserId::new(self.sub)
    }
}

/// Authentication service.
///
/// Handles registration, login, token issuance and account updates.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    jwt_secret: &'a SecretString,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, jwt_secret: &'a SecretString) -> Self {
        Self {
            users: UserRepository::new(pool),
            jwt_secret,
        }
    }

    /// Register a new user.
    ///
    /// The account starts logged out; registration never issues a token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingName` if the name is blank.
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn register(&self, input: &RegisterUser) -> Result<User, AuthError> {
        validate_name(&input.name)?;
        let email = Email::parse(&input.email)?;
        validate_password(&input.password)?;
        let password_hash = hash_password(&input.password)?;

        let user = self
            .users
            .create(
                &input.name,
                &email,
                &password_hash,
                input.phone.as_deref(),
                input.is_admin,
            )
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Login with email and password.
    ///
    /// On success marks the account authenticated and issues a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let (mut user, password_hash) = self
            .users
            .get_with_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        self.users.set_authenticated(user.id, true).await?;
        user.is_authenticated = true;

        let token = self.issue_token(&user)?;
        Ok((user, token))
    }

    /// Mark the account as logged out.
    ///
    /// Issued tokens stay valid until they expire; the flag only records the
    /// session state.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the user doesn't exist.
    pub async fn logout(&self, user_id: UserId) -> Result<(), AuthError> {
        self.users
            .set_authenticated(user_id, false)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AuthError::UserNotFound,
                other => AuthError::Repository(other),
            })
    }

    /// Apply partial account changes, re-validating email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingName`, `AuthError::InvalidEmail`,
    /// `AuthError::WeakPassword`, `AuthError::UserAlreadyExists` or
    /// `AuthError::UserNotFound`.
    pub async fn update_user(&self, id: UserId, input: &UpdateUser) -> Result<User, AuthError> {
        if let Some(name) = input.name.as_deref() {
            validate_name(name)?;
        }

        let email = match input.email.as_deref() {
            Some(raw) => Some(Email::parse(raw)?),
            None => None,
        };

        let password_hash = match input.password.as_deref() {
            Some(password) => {
                validate_password(password)?;
                Some(hash_password(password)?)
            }
            None => None,
        };

        let changes = UserChanges {
            name: input.name.clone(),
            email,
            password_hash,
            phone: input.phone.clone(),
            is_admin: input.is_admin,
            is_authenticated: input.is_authenticated,
        };

        self.users.update(id, &changes).await.map_err(|e| match e {
            RepositoryError::NotFound => AuthError::UserNotFound,
            RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
            other => AuthError::Repository(other),
        })
    }

    /// Issue a signed bearer token for the user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if signing fails.
    pub fn issue_token(&self, user: &User) -> Result<String, AuthError> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: user.id.as_i32(),
            email: user.email.clone(),
            is_admin: user.is_admin,
            iat: now,
            exp: now + TOKEN_TTL_SECS,
        };

        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.expose_secret().as_bytes()),
        )
        .map_err(|_| AuthError::InvalidToken)
    }

    /// Decode and verify a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` for malformed, expired or
    /// wrongly-signed tokens.
    pub fn decode_token(&self, token: &str) -> Result<Claims, AuthError> {
        decode_token(token, self.jwt_secret)
    }
}

/// Decode and verify a bearer token against the signing secret.
///
/// # Errors
///
/// Returns `AuthError::InvalidToken` for malformed, expired or wrongly-signed
/// tokens.
pub fn decode_token(token: &str, jwt_secret: &SecretString) -> Result<Claims, AuthError> {
    let data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.expose_secret().as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|_| AuthError::InvalidToken)?;

    Ok(data.claims)
}

/// Validate the display name is not blank.
fn validate_name(name: &str) -> Result<(), AuthError> {
    if name.trim().is_empty() {
        return Err(AuthError::MissingName);
    }

    Ok(())
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn secret() -> SecretString {
        SecretString::from("a-test-signing-secret-that-is-long-enough")
    }

    fn sign(claims: &Claims, jwt_secret: &SecretString) -> String {
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(jwt_secret.expose_secret().as_bytes()),
        )
        .unwrap()
    }

    fn claims_expiring_in(secs: i64) -> Claims {
        let now = chrono::Utc::now().timestamp();
        Claims {
            sub: 7,
            email: "ana@example.com".to_owned(),
            is_admin: false,
            iat: now,
            exp: now + secs,
        }
    }

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("hunter2hunter2").unwrap();
        assert!(verify_password("hunter2hunter2", &hash).is_ok());
    }

    #[test]
    fn test_verify_rejects_wrong_password() {
        let hash = hash_password("hunter2hunter2").unwrap();
        assert!(matches!(
            verify_password("not-the-password", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(matches!(
            verify_password("whatever", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_token_roundtrip() {
        let secret = secret();
        let token = sign(&claims_expiring_in(3600), &secret);

        let claims = decode_token(&token, &secret).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.email, "ana@example.com");
        assert!(!claims.is_admin);
        assert_eq!(claims.user_id(), ropero_core::UserId::new(7));
    }

    #[test]
    fn test_token_rejects_wrong_secret() {
        let token = sign(&claims_expiring_in(3600), &secret());

        let other = SecretString::from("a-different-secret-entirely-here!!");
        assert!(matches!(
            decode_token(&token, &other),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_token_rejects_expired() {
        let secret = secret();
        // Well past the default decode leeway.
        let token = sign(&claims_expiring_in(-3600), &secret);

        assert!(matches!(
            decode_token(&token, &secret),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_token_rejects_tampering() {
        let secret = secret();
        let mut token = sign(&claims_expiring_in(3600), &secret);
        token.pop();
        token.push('A');

        assert!(decode_token(&token, &secret).is_err());
    }

    #[test]
    fn test_blank_name_rejected() {
        assert!(matches!(validate_name(""), Err(AuthError::MissingName)));
        assert!(matches!(validate_name("   "), Err(AuthError::MissingName)));
        assert!(validate_name("Ana").is_ok());
    }

    #[test]
    fn test_password_length_enforced() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("exactly8").is_ok());
    }
}
