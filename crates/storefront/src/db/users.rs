//! User repository for database operations.
//!
//! Credential hashes stay inside this module's return values and are only
//! handed to the auth service for verification, never to callers above it.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use waggy_core::{Email, UserId};

use super::RepositoryError;
use crate::models::User;

/// Row shape shared by the user queries.
type UserRow = (i64, String, String, i64, DateTime<Utc>);

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a user by their email address. The lookup is case-sensitive,
    /// matching how addresses are stored.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored email is invalid.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, name, email, active, created_at
            FROM user
            WHERE email = ?1
            ",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        row.map(row_to_user).transpose()
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored email is invalid.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, name, email, active, created_at
            FROM user
            WHERE id = ?1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(row_to_user).transpose()
    }

    /// Create a new user with a display name, email, and credential hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        name: &str,
        email: &Email,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let created_at = Utc::now();

        let (id,) = sqlx::query_as::<_, (i64,)>(
            r"
            INSERT INTO user (name, email, password_hash, active, created_at)
            VALUES (?1, ?2, ?3, 1, ?4)
            RETURNING id
            ",
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(created_at)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(User {
            id: UserId::new(id),
            name: name.to_owned(),
            email: email.clone(),
            active: true,
            created_at,
        })
    }

    /// Get a user and their credential hash by email.
    ///
    /// Returns `None` if no user exists with that address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored email is invalid.
    pub async fn get_with_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, (i64, String, String, i64, DateTime<Utc>, String)>(
            r"
            SELECT id, name, email, active, created_at, password_hash
            FROM user
            WHERE email = ?1
            ",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        let Some((id, name, email, active, created_at, password_hash)) = row else {
            return Ok(None);
        };

        let user = row_to_user((id, name, email, active, created_at))?;
        Ok(Some((user, password_hash)))
    }

    /// Set the active flag, the only mutable field on a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_active(&self, id: UserId, active: bool) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE user
            SET active = ?1
            WHERE id = ?2
            ",
        )
        .bind(i64::from(active))
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

fn row_to_user((id, name, email, active, created_at): UserRow) -> Result<User, RepositoryError> {
    let email = Email::parse(&email).map_err(|e| {
        RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
    })?;

    Ok(User {
        id: UserId::new(id),
        name,
        email,
        active: active != 0,
        created_at,
    })
}
