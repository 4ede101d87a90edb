//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use chrono::{Datelike, Utc};
use tracing::instrument;

use crate::error::Result;
use crate::db::catalog::CatalogRepository;
use crate::middleware::OptionalAuth;
use crate::models::{CatalogItem, CurrentUser, ItemKind};
use crate::state::AppState;

/// How many items of each kind the home page features.
const FEATURED_PER_KIND: usize = 3;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub user: Option<CurrentUser>,
    pub featured_food: Vec<CatalogItem>,
    pub featured_apparel: Vec<CatalogItem>,
    pub year: i32,
}

/// Display the home page.
#[instrument(skip(state))]
pub async fn home(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
) -> Result<HomeTemplate> {
    let catalog = CatalogRepository::new(state.pool());

    let mut featured_food = catalog.list(ItemKind::Food).await?;
    featured_food.truncate(FEATURED_PER_KIND);
    let mut featured_apparel = catalog.list(ItemKind::Apparel).await?;
    featured_apparel.truncate(FEATURED_PER_KIND);

    Ok(HomeTemplate {
        user,
        featured_food,
        featured_apparel,
        year: Utc::now().year(),
    })
}
