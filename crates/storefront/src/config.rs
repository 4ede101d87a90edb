//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STRIPE_SECRET_KEY` - Stripe API secret key (`sk_...`)
//!
//! ## Optional
//! - `WAGGY_DATABASE_URL` - `SQLite` connection string (default: `sqlite://waggy.db`,
//!   falls back to generic `DATABASE_URL` first)
//! - `WAGGY_HOST` - Bind address (default: 127.0.0.1)
//! - `WAGGY_PORT` - Listen port (default: 5000)
//! - `WAGGY_BASE_URL` - Public URL used in Stripe redirect links
//!   (default: `http://localhost:5000`)
//! - `MAIL_API_URL` / `MAIL_API_KEY` - Newsletter mail API; signup is a
//!   logged no-op when unset
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct WaggyConfig {
    /// `SQLite` database connection URL
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL, used to build Stripe success/cancel links
    pub base_url: String,
    /// Stripe API secret key
    pub stripe_secret_key: SecretString,
    /// Newsletter mail API, if configured
    pub mail: Option<MailConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Newsletter mail API configuration.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub api_url: String,
    pub api_key: SecretString,
}

impl WaggyConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url();
        let host = get_env_or_default("WAGGY_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("WAGGY_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("WAGGY_PORT", "5000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("WAGGY_PORT".to_string(), e.to_string()))?;
        let base_url = get_env_or_default("WAGGY_BASE_URL", "http://localhost:5000")
            .trim_end_matches('/')
            .to_string();

        let stripe_secret_key = get_required_secret("STRIPE_SECRET_KEY")?;
        validate_stripe_key(&stripe_secret_key)?;

        let mail = match (get_optional_env("MAIL_API_URL"), get_optional_env("MAIL_API_KEY")) {
            (Some(api_url), Some(api_key)) => Some(MailConfig {
                api_url,
                api_key: SecretString::from(api_key),
            }),
            _ => None,
        };

        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            stripe_secret_key,
            mail,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get the database URL with fallback to generic `DATABASE_URL`.
fn get_database_url() -> SecretString {
    if let Ok(value) = std::env::var("WAGGY_DATABASE_URL") {
        return SecretString::from(value);
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return SecretString::from(value);
    }
    SecretString::from("sqlite://waggy.db")
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Reject keys that are obviously not Stripe secret keys, such as
/// publishable (`pk_`) keys pasted into the wrong variable.
fn validate_stripe_key(key: &SecretString) -> Result<(), ConfigError> {
    if key.expose_secret().starts_with("sk_") {
        Ok(())
    } else {
        Err(ConfigError::InvalidEnvVar(
            "STRIPE_SECRET_KEY".to_string(),
            "expected a secret key starting with 'sk_'".to_string(),
        ))
    }
}
