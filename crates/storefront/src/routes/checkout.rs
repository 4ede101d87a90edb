//! Checkout route handlers.
//!
//! `POST /checkout` sends the customer to Stripe's hosted payment page.
//! Stripe then sends them back to `/success.html` or `/cancel.html`; the
//! success page settles the cart and polls `/session-status` for the
//! final state.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json,
    extract::{Query, State},
    response::Redirect,
};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::models::CurrentUser;
use crate::services::checkout::{CheckoutService, SessionStatus};
use crate::state::AppState;

/// Query parameters carrying the Stripe session id.
#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    pub session_id: Option<String>,
}

/// Success page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/success.html")]
pub struct SuccessTemplate {
    pub user: Option<CurrentUser>,
    pub paid: bool,
    pub customer_email: Option<String>,
}

/// Cancel page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/cancel.html")]
pub struct CancelTemplate {
    pub user: Option<CurrentUser>,
}

/// Start a checkout and redirect to the hosted payment page.
#[instrument(skip(state), fields(user_id = %user.id))]
pub async fn checkout(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Redirect> {
    let service = CheckoutService::new(state.pool(), state.stripe(), &state.config().base_url);
    let payment_url = service.begin(user.id).await?;

    Ok(Redirect::to(&payment_url))
}

/// Report a session's status as JSON for the success page poll.
#[instrument(skip(state))]
pub async fn session_status(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(query): Query<SessionQuery>,
) -> Result<Json<SessionStatus>> {
    let session_id = query
        .session_id
        .ok_or_else(|| AppError::BadRequest("missing session_id".to_string()))?;

    let service = CheckoutService::new(state.pool(), state.stripe(), &state.config().base_url);
    let status = service.status(&session_id).await?;

    Ok(Json(status))
}

/// Post-payment landing page.
///
/// Looks the session up again and clears the cart when it reports
/// `complete`. Landing here twice with the same id is harmless.
#[instrument(skip(state), fields(user_id = %user.id))]
pub async fn success(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<SessionQuery>,
) -> Result<SuccessTemplate> {
    let session_id = query
        .session_id
        .ok_or_else(|| AppError::BadRequest("missing session_id".to_string()))?;

    let service = CheckoutService::new(state.pool(), state.stripe(), &state.config().base_url);
    let status = service.finalize(user.id, &session_id).await?;

    Ok(SuccessTemplate {
        user: Some(user),
        paid: status.status == "complete",
        customer_email: status.customer_email,
    })
}

/// Cancelled-payment landing page. The cart is left as it was.
pub async fn cancel(OptionalAuth(user): OptionalAuth) -> CancelTemplate {
    CancelTemplate { user }
}
