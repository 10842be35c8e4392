//! User repository.
//!
//! Password hashes stay in this module: queries that need the hash return it
//! alongside the [`User`] instead of embedding it in the model.

use sqlx::PgPool;

use ropero_core::{Email, UserId};

use super::RepositoryError;
use crate::models::user::User;

const SELECT_USER: &str = r"
    SELECT id, name, email, phone, is_admin, is_authenticated,
           created_at, updated_at
    FROM users
";

/// Column-level changes to apply to a user row. The password arrives here
/// already hashed.
#[derive(Debug, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<Email>,
    pub password_hash: Option<String>,
    pub phone: Option<String>,
    pub is_admin: Option<bool>,
    pub is_authenticated: Option<bool>,
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all users.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let users = sqlx::query_as::<_, User>(&format!("{SELECT_USER} ORDER BY id ASC"))
            .fetch_all(self.pool)
            .await?;

        Ok(users)
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!("{SELECT_USER} WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(user)
    }

    /// Create a user with an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already registered.
    pub async fn create(
        &self,
        name: &str,
        email: &Email,
        password_hash: &str,
        phone: Option<&str>,
        is_admin: bool,
    ) -> Result<User, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r"
            INSERT INTO users (name, email, password_hash, phone, is_admin, is_authenticated)
            VALUES ($1, $2, $3, $4, $5, FALSE)
            RETURNING id, name, email, phone, is_admin, is_authenticated,
                      created_at, updated_at
            ",
        )
        .bind(name)
        .bind(email.as_str())
        .bind(password_hash)
        .bind(phone)
        .bind(is_admin)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already registered".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(user)
    }

    /// Fetch a user and their password hash by email, for credential checks.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct UserWithHash {
            #[sqlx(flatten)]
            user: User,
            password_hash: String,
        }

        let row = sqlx::query_as::<_, UserWithHash>(
            r"
            SELECT id, name, email, phone, is_admin, is_authenticated,
                   created_at, updated_at, password_hash
            FROM users
            WHERE email = $1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| (r.user, r.password_hash)))
    }

    /// Apply partial changes to a user. Unset fields keep their prior value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Conflict` if the new email is already taken.
    pub async fn update(&self, id: UserId, changes: &UserChanges) -> Result<User, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r"
            UPDATE users
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                password_hash = COALESCE($4, password_hash),
                phone = COALESCE($5, phone),
                is_admin = COALESCE($6, is_admin),
                is_authenticated = COALESCE($7, is_authenticated),
                updated_at = now()
            WHERE id = $1
            RETURNING id, name, email, phone, is_admin, is_authenticated,
                      created_at, updated_at
            ",
        )
        .bind(id)
        .bind(changes.name.as_deref())
        .bind(changes.email.as_ref().map(Email::as_str))
        .bind(changes.password_hash.as_deref())
        .bind(changes.phone.as_deref())
        .bind(changes.is_admin)
        .bind(changes.is_authenticated)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already registered".to_owned());
            }
            RepositoryError::Database(e)
        })?
        .ok_or(RepositoryError::NotFound)?;

        Ok(user)
    }

    /// Flip the `is_authenticated` session flag.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    pub async fn set_authenticated(
        &self,
        id: UserId,
        authenticated: bool,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE users SET is_authenticated = $2, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(authenticated)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete a user.
    ///
    /// Deletion is blocked while the user owns a cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Conflict` if the user still owns a cart.
    pub async fn delete(&self, id: UserId) -> Result<(), RepositoryError> {
        let (cart_count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM carts WHERE user_id = $1")
                .bind(id)
                .fetch_one(self.pool)
                .await?;

        if cart_count > 0 {
            return Err(RepositoryError::Conflict(
                "user has an associated cart; delete the cart first".to_owned(),
            ));
        }

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
