//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::WaggyConfig;
use crate::services::{MailClient, StripeClient};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: WaggyConfig,
    pool: SqlitePool,
    stripe: StripeClient,
    mailer: Option<MailClient>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: WaggyConfig, pool: SqlitePool) -> Self {
        let stripe = StripeClient::new(config.stripe_secret_key.clone());
        let mailer = config
            .mail
            .as_ref()
            .map(|mail| MailClient::new(mail.api_url.clone(), mail.api_key.clone()));

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                stripe,
                mailer,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &WaggyConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    /// Get a reference to the Stripe client.
    #[must_use]
    pub fn stripe(&self) -> &StripeClient {
        &self.inner.stripe
    }

    /// Get the newsletter mail client, if one is configured.
    #[must_use]
    pub fn mailer(&self) -> Option<&MailClient> {
        self.inner.mailer.as_ref()
    }
}
