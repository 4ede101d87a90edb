//! Database operations for the storefront SQLite store.
//!
//! # Tables
//!
//! - `user` - registration/login identities
//! - `food_item`, `apparel_item` - the two catalog kinds
//! - `cart_entry` - per-user cart ledger rows
//! - `session` - tower-sessions storage (created by the session store)
//!
//! # Migrations
//!
//! Migrations are embedded from `crates/storefront/migrations/` and run at
//! startup via [`MIGRATOR`].

pub mod cart;
pub mod catalog;
pub mod users;

use std::str::FromStr;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

pub use cart::CartRepository;
pub use catalog::CatalogRepository;
pub use users::UserRepository;

/// Embedded migrations.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a SQLite connection pool, creating the database file if needed.
///
/// # Arguments
///
/// * `database_url` - SQLite connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the connection cannot be
/// established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url.expose_secret())?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::{MIGRATOR, SqlitePool, SqlitePoolOptions};

    /// Fresh in-memory database with migrations applied.
    ///
    /// A single connection, since each SQLite `:memory:` connection is its
    /// own database.
    #[allow(clippy::unwrap_used)]
    pub async fn memory_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        MIGRATOR.run(&pool).await.unwrap();
        pool
    }
}
