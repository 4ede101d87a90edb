//! Catalog listing route handlers.
//!
//! One page per item kind; both render the same template.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use crate::db::catalog::CatalogRepository;
use crate::error::Result;
use crate::middleware::OptionalAuth;
use crate::models::{CatalogItem, CurrentUser, ItemKind};
use crate::state::AppState;

/// Catalog listing template, shared by both kinds.
#[derive(Template, WebTemplate)]
#[template(path = "catalog/list.html")]
pub struct ListTemplate {
    pub user: Option<CurrentUser>,
    pub kind: ItemKind,
    pub title: &'static str,
    pub items: Vec<CatalogItem>,
}

/// Display the food listing.
#[instrument(skip(state))]
pub async fn food(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
) -> Result<ListTemplate> {
    list(state, user, ItemKind::Food, "Dog Food & Treats").await
}

/// Display the apparel listing.
#[instrument(skip(state))]
pub async fn apparel(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
) -> Result<ListTemplate> {
    list(state, user, ItemKind::Apparel, "Dog Apparel").await
}

async fn list(
    state: AppState,
    user: Option<CurrentUser>,
    kind: ItemKind,
    title: &'static str,
) -> Result<ListTemplate> {
    let items = CatalogRepository::new(state.pool()).list(kind).await?;

    Ok(ListTemplate {
        user,
        kind,
        title,
        items,
    })
}
