//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                  - Home page
//! GET  /health            - Liveness check
//! GET  /health/ready      - Readiness check (pings the database)
//!
//! # Catalog
//! GET  /food              - Food listing
//! GET  /apparel           - Apparel listing
//!
//! # Auth
//! GET  /auth/register     - Register page
//! POST /auth/register     - Register action
//! GET  /auth/login        - Login page
//! POST /auth/login        - Login action
//! POST /auth/logout       - Logout action
//!
//! # Cart (requires auth)
//! GET  /cart              - Cart page
//! POST /cart/add          - Add an item
//! POST /cart/remove       - Remove one entry
//!
//! # Checkout (requires auth)
//! POST /checkout          - Create a Stripe session, redirect to it
//! GET  /session-status    - Session status JSON for the success page
//! GET  /success.html      - Post-payment landing page (clears the cart)
//! GET  /cancel.html       - Cancelled-payment landing page
//!
//! # Newsletter
//! POST /newsletter        - Subscribe an email address
//! ```

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod health;
pub mod home;
pub mod newsletter;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/food", get(catalog::food))
        .route("/apparel", get(catalog::apparel))
        .nest("/auth", auth_routes())
        .nest("/cart", cart_routes())
        .route("/checkout", post(checkout::checkout))
        .route("/session-status", get(checkout::session_status))
        .route("/success.html", get(checkout::success))
        .route("/cancel.html", get(checkout::cancel))
        .route("/newsletter", post(newsletter::subscribe))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::ready))
}
