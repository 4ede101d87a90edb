//! Newsletter subscription route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::IntoResponse};
use serde::Deserialize;
use tracing::instrument;

use waggy_core::Email;

use crate::state::AppState;

/// Newsletter subscription form data.
#[derive(Debug, Deserialize)]
pub struct SubscribeForm {
    pub email: String,
}

/// Success fragment template (replaces the form).
#[derive(Template, WebTemplate)]
#[template(path = "newsletter/subscribe_success.html")]
pub struct SubscribeSuccessTemplate {
    pub email: String,
}

/// Error fragment template (replaces the form).
#[derive(Template, WebTemplate)]
#[template(path = "newsletter/subscribe_error.html")]
pub struct SubscribeErrorTemplate {
    pub message: String,
    pub email: String,
}

/// Subscribe to the newsletter.
///
/// When no mail API is configured the address is logged and the visitor
/// still sees the success fragment.
#[instrument(skip(state), fields(email = %form.email))]
pub async fn subscribe(
    State(state): State<AppState>,
    Form(form): Form<SubscribeForm>,
) -> impl IntoResponse {
    let raw = form.email.trim().to_lowercase();

    let Ok(email) = Email::parse(&raw) else {
        return SubscribeErrorTemplate {
            message: "Please enter a valid email address.".to_string(),
            email: raw,
        }
        .into_response();
    };

    let Some(mailer) = state.mailer() else {
        tracing::info!(email = %email, "No mail API configured, dropping newsletter signup");
        return SubscribeSuccessTemplate { email: raw }.into_response();
    };

    match mailer.subscribe(&email).await {
        Ok(()) => SubscribeSuccessTemplate { email: raw }.into_response(),
        Err(e) => {
            tracing::warn!(email = %email, error = %e, "Newsletter subscription failed");
            SubscribeErrorTemplate {
                message: "Something went wrong. Please try again.".to_string(),
                email: raw,
            }
            .into_response()
        }
    }
}
