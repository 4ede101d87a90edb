//! Authentication route handlers.
//!
//! Registration, login and logout against the local user table.
//! Failures come back as a redirect with an `error` query parameter the
//! page template turns into a banner.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

/// Query parameters for error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub error: Option<String>,
}

/// Display the login page.
pub async fn login_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    LoginTemplate {
        error: query.error,
        success: query.success,
    }
}

/// Handle login form submission.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let auth = AuthService::new(state.pool());

    match auth.authenticate(&form.email, &form.password).await {
        Ok(user) => {
            let current = CurrentUser {
                id: user.id,
                name: user.name,
                email: user.email,
            };

            if let Err(e) = set_current_user(&session, &current).await {
                tracing::error!("Failed to set session: {}", e);
                return Redirect::to("/auth/login?error=session").into_response();
            }

            set_sentry_user(&current.id, Some(current.email.as_str()));
            Redirect::to("/").into_response()
        }
        Err(AuthError::InvalidCredentials | AuthError::InvalidEmail(_)) => {
            tracing::warn!("Login failed");
            Redirect::to("/auth/login?error=credentials").into_response()
        }
        Err(e) => {
            tracing::error!("Login error: {}", e);
            Redirect::to("/auth/login?error=failed").into_response()
        }
    }
}

/// Display the registration page.
pub async fn register_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    RegisterTemplate { error: query.error }
}

/// Handle registration form submission.
///
/// On success the new user is logged in right away.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Response {
    if form.password != form.password_confirm {
        return Redirect::to("/auth/register?error=password_mismatch").into_response();
    }

    let auth = AuthService::new(state.pool());

    match auth.register(&form.name, &form.email, &form.password).await {
        Ok(user) => {
            let current = CurrentUser {
                id: user.id,
                name: user.name,
                email: user.email,
            };

            if let Err(e) = set_current_user(&session, &current).await {
                tracing::error!("Failed to set session after registration: {}", e);
                return Redirect::to("/auth/login?error=session").into_response();
            }

            set_sentry_user(&current.id, Some(current.email.as_str()));
            Redirect::to("/").into_response()
        }
        Err(AuthError::AlreadyRegistered) => {
            Redirect::to("/auth/register?error=email_taken").into_response()
        }
        Err(AuthError::WeakPassword(_)) => {
            Redirect::to("/auth/register?error=password_too_short").into_response()
        }
        Err(AuthError::InvalidEmail(_)) => {
            Redirect::to("/auth/register?error=invalid_email").into_response()
        }
        Err(e) => {
            tracing::error!("Registration error: {}", e);
            Redirect::to("/auth/register?error=failed").into_response()
        }
    }
}

/// Handle logout.
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session: {}", e);
    }

    // Also destroy the entire session
    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {}", e);
    }

    clear_sentry_user();
    Redirect::to("/").into_response()
}
