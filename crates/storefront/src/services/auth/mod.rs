//! Authentication service.
//!
//! Registration and password login. Passwords are hashed with Argon2id
//! and only the hash is stored; verification compares against the hash,
//! nothing is ever decrypted.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::SqlitePool;

use waggy_core::Email;

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::User;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::AlreadyRegistered` if the email is already taken;
    /// no duplicate row is created.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;

        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(name, &email, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::AlreadyRegistered,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Authenticate with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for an unknown email, a wrong
    /// password, or an inactive account - one failure, no enumeration.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email)?;

        let (user, password_hash) = self
            .users
            .get_with_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        if !user.active {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user)
    }
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
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
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
    use crate::db::test_support::memory_pool;

    #[tokio::test]
    async fn test_register_and_authenticate() {
        let pool = memory_pool().await;
        let auth = AuthService::new(&pool);

        let user = auth.register("Ada", "a@x.com", "secret-1").await.unwrap();
        assert_eq!(user.email.as_str(), "a@x.com");

        let logged_in = auth.authenticate("a@x.com", "secret-1").await.unwrap();
        assert_eq!(logged_in.id, user.id);
    }

    #[tokio::test]
    async fn test_duplicate_registration_fails() {
        let pool = memory_pool().await;
        let auth = AuthService::new(&pool);

        auth.register("Ada", "a@x.com", "secret-1").await.unwrap();
        let err = auth.register("Eve", "a@x.com", "secret-2").await.unwrap_err();
        assert!(matches!(err, AuthError::AlreadyRegistered));
    }

    #[tokio::test]
    async fn test_wrong_password_is_invalid_credentials() {
        let pool = memory_pool().await;
        let auth = AuthService::new(&pool);

        auth.register("Ada", "a@x.com", "secret-1").await.unwrap();
        let err = auth.authenticate("a@x.com", "secret-2").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_unknown_email_is_same_failure_as_wrong_password() {
        let pool = memory_pool().await;
        let auth = AuthService::new(&pool);

        auth.register("Ada", "a@x.com", "secret-1").await.unwrap();

        let unknown = auth.authenticate("b@x.com", "secret-1").await.unwrap_err();
        let wrong = auth.authenticate("a@x.com", "nope-nope").await.unwrap_err();
        assert!(matches!(unknown, AuthError::InvalidCredentials));
        assert!(matches!(wrong, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_inactive_account_cannot_log_in() {
        let pool = memory_pool().await;
        let auth = AuthService::new(&pool);

        let user = auth.register("Ada", "a@x.com", "secret-1").await.unwrap();
        UserRepository::new(&pool)
            .set_active(user.id, false)
            .await
            .unwrap();

        let err = auth.authenticate("a@x.com", "secret-1").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_short_password_rejected() {
        let pool = memory_pool().await;
        let auth = AuthService::new(&pool);

        let err = auth.register("Ada", "a@x.com", "short").await.unwrap_err();
        assert!(matches!(err, AuthError::WeakPassword(_)));
    }
}
