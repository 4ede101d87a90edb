//! Newsletter signup client.
//!
//! Optional. When no mail API is configured the signup form still
//! renders and subscription requests are logged and dropped.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use thiserror::Error;
use tracing::info;

use waggy_core::Email;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from the mail API.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("mail api error (status {0})")]
    Api(u16),
}

/// Client for the newsletter mail API.
#[derive(Debug, Clone)]
pub struct MailClient {
    client: reqwest::Client,
    api_url: String,
    api_key: SecretString,
}

impl MailClient {
    /// Create a new client.
    ///
    /// # Panics
    ///
    /// Panics if the TLS backend cannot be initialized.
    #[must_use]
    pub fn new(api_url: String, api_key: SecretString) -> Self {
        #[allow(clippy::expect_used)]
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build http client");

        Self {
            client,
            api_url,
            api_key,
        }
    }

    /// Subscribe an address to the newsletter list.
    ///
    /// # Errors
    ///
    /// Returns `MailError::Api` when the API answers with a non-success
    /// status.
    pub async fn subscribe(&self, email: &Email) -> Result<(), MailError> {
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&json!({ "email": email.as_str() }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MailError::Api(status.as_u16()));
        }

        info!(email = %email, "subscribed to newsletter");
        Ok(())
    }
}
