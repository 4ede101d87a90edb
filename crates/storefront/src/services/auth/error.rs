//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] waggy_core::EmailError),

    /// Invalid credentials. Covers unknown email, wrong password, and
    /// inactive accounts alike so the response never reveals which
    /// part was wrong.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The email is already registered.
    #[error("already registered")]
    AlreadyRegistered,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
