//! Stripe Checkout client.
//!
//! Talks to the hosted Checkout API over HTTPS. Two calls are used:
//! creating a session (form-encoded POST, as Stripe's v1 API expects)
//! and retrieving one by id. Amounts are sent in minor units.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use waggy_core::Money;

const API_BASE: &str = "https://api.stripe.com/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const RETRY_DELAY: Duration = Duration::from_millis(250);

/// A single line of a checkout session, already repriced from the live
/// catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub name: String,
    pub unit_amount: Money,
    pub quantity: i64,
}

/// A checkout session as returned by Stripe.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    /// Hosted payment page the customer is redirected to. Absent once
    /// the session has completed or expired.
    pub url: Option<String>,
    /// `open`, `complete` or `expired`.
    pub status: String,
    pub customer_details: Option<CustomerDetails>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CustomerDetails {
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
}

/// Errors from the Stripe API.
#[derive(Debug, Error)]
pub enum StripeError {
    /// HTTP transport error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned an error response.
    #[error("stripe api error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// No session exists under the given id.
    #[error("checkout session not found")]
    SessionNotFound,

    /// The API answered with a body we could not interpret.
    #[error("unexpected stripe response: {0}")]
    Parse(String),
}

/// Client for the Stripe Checkout API.
#[derive(Debug, Clone)]
pub struct StripeClient {
    client: reqwest::Client,
    secret_key: SecretString,
    base_url: String,
}

impl StripeClient {
    /// Create a new client.
    ///
    /// # Panics
    ///
    /// Panics if the TLS backend cannot be initialized.
    #[must_use]
    pub fn new(secret_key: SecretString) -> Self {
        Self::with_base_url(secret_key, API_BASE.to_owned())
    }

    #[must_use]
    pub fn with_base_url(secret_key: SecretString, base_url: String) -> Self {
        #[allow(clippy::expect_used)]
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build http client");

        Self {
            client,
            secret_key,
            base_url,
        }
    }

    /// Create a hosted checkout session for the given line items.
    ///
    /// `success_url` and `cancel_url` are where Stripe sends the customer
    /// afterwards; `success_url` should carry the `{CHECKOUT_SESSION_ID}`
    /// placeholder so the landing page can look the session up again.
    ///
    /// # Errors
    ///
    /// Returns `StripeError::Api` when Stripe rejects the request and
    /// `StripeError::Http` when the request itself fails after one retry.
    pub async fn create_session(
        &self,
        line_items: &[LineItem],
        success_url: &str,
        cancel_url: &str,
    ) -> Result<CheckoutSession, StripeError> {
        let form = session_form(line_items, success_url, cancel_url);
        let url = format!("{}/checkout/sessions", self.base_url);

        let response = self
            .send_with_retry(|| {
                self.client
                    .post(&url)
                    .basic_auth(self.secret_key.expose_secret(), None::<&str>)
                    .form(&form)
            })
            .await?;

        Self::parse_session(response).await
    }

    /// Retrieve an existing checkout session by id.
    ///
    /// # Errors
    ///
    /// Returns `StripeError::SessionNotFound` when no session exists under
    /// the id.
    pub async fn retrieve_session(&self, session_id: &str) -> Result<CheckoutSession, StripeError> {
        let url = format!("{}/checkout/sessions/{session_id}", self.base_url);

        let response = self
            .send_with_retry(|| {
                self.client
                    .get(&url)
                    .basic_auth(self.secret_key.expose_secret(), None::<&str>)
            })
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(StripeError::SessionNotFound);
        }

        Self::parse_session(response).await
    }

    /// Send a request, retrying once after a short delay when the failure
    /// is transport-level (connect or timeout). API-level errors are not
    /// retried.
    async fn send_with_retry<F>(&self, build: F) -> Result<reqwest::Response, StripeError>
    where
        F: Fn() -> reqwest::RequestBuilder,
    {
        match build().send().await {
            Ok(response) => Ok(response),
            Err(e) if e.is_connect() || e.is_timeout() => {
                warn!(error = %e, "stripe request failed, retrying once");
                tokio::time::sleep(RETRY_DELAY).await;
                Ok(build().send().await?)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn parse_session(response: reqwest::Response) -> Result<CheckoutSession, StripeError> {
        let status = response.status();
        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body).map_err(|e| StripeError::Parse(e.to_string()))
        } else {
            let message = match response.json::<ApiErrorBody>().await {
                Ok(body) => body.error.message,
                Err(_) => String::from("unreadable error body"),
            };
            Err(StripeError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

/// Encode line items and redirect URLs into the flat bracketed form
/// fields Stripe's v1 API takes.
fn session_form(
    line_items: &[LineItem],
    success_url: &str,
    cancel_url: &str,
) -> Vec<(String, String)> {
    let mut form = vec![
        ("mode".to_owned(), "payment".to_owned()),
        ("success_url".to_owned(), success_url.to_owned()),
        ("cancel_url".to_owned(), cancel_url.to_owned()),
    ];

    for (i, item) in line_items.iter().enumerate() {
        form.push((
            format!("line_items[{i}][price_data][currency]"),
            "usd".to_owned(),
        ));
        form.push((
            format!("line_items[{i}][price_data][product_data][name]"),
            item.name.clone(),
        ));
        form.push((
            format!("line_items[{i}][price_data][unit_amount]"),
            item.unit_amount.as_cents().to_string(),
        ));
        form.push((format!("line_items[{i}][quantity]"), item.quantity.to_string()));
    }

    form
}
