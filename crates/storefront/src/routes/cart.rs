//! Cart route handlers.
//!
//! All three handlers require a logged-in user. Add and remove redirect
//! back to the cart page on success.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::Redirect,
};
use serde::Deserialize;
use tracing::instrument;

use waggy_core::{CartEntryId, Money, ProductId};

use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{CartEntry, CurrentUser, ItemKind, ItemRef};
use crate::services::cart::CartService;
use crate::state::AppState;

/// Add-to-cart form data.
///
/// `quantity` arrives as raw text so a blank or mangled value can fall
/// back instead of failing form deserialization.
#[derive(Debug, Deserialize)]
pub struct AddForm {
    pub kind: String,
    pub item_id: i64,
    pub quantity: Option<String>,
}

/// Remove-from-cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveForm {
    pub entry_id: i64,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartTemplate {
    pub user: Option<CurrentUser>,
    pub entries: Vec<CartEntry>,
    pub subtotal: Money,
}

/// Display the cart page.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<CartTemplate> {
    let view = CartService::new(state.pool()).view(user.id).await?;

    Ok(CartTemplate {
        user: Some(user),
        entries: view.entries,
        subtotal: view.subtotal,
    })
}

/// Add an item to the cart.
#[instrument(skip(state), fields(user_id = %user.id))]
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Form(form): Form<AddForm>,
) -> Result<Redirect> {
    let kind = ItemKind::parse(&form.kind)
        .ok_or_else(|| AppError::BadRequest(format!("unknown item kind: {}", form.kind)))?;
    let item = ItemRef::new(kind, ProductId::new(form.item_id));
    let quantity = parse_quantity(form.quantity.as_deref());

    CartService::new(state.pool()).add(user.id, item, quantity).await?;

    Ok(Redirect::to("/cart"))
}

/// Remove one entry from the cart.
#[instrument(skip(state), fields(user_id = %user.id))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Form(form): Form<RemoveForm>,
) -> Result<Redirect> {
    CartService::new(state.pool())
        .remove(user.id, CartEntryId::new(form.entry_id))
        .await?;

    Ok(Redirect::to("/cart"))
}

/// Interpret a raw quantity field. Missing, blank or unparsable input
/// falls back to 1; an explicit non-positive number is kept so the
/// service can reject it.
fn parse_quantity(raw: Option<&str>) -> i64 {
    match raw {
        None => 1,
        Some(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                1
            } else {
                trimmed.parse().unwrap_or(1)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quantity_defaults_to_one() {
        assert_eq!(parse_quantity(None), 1);
        assert_eq!(parse_quantity(Some("")), 1);
        assert_eq!(parse_quantity(Some("   ")), 1);
        assert_eq!(parse_quantity(Some("abc")), 1);
        assert_eq!(parse_quantity(Some("2.5")), 1);
    }

    #[test]
    fn test_parse_quantity_keeps_numbers() {
        assert_eq!(parse_quantity(Some("3")), 3);
        assert_eq!(parse_quantity(Some(" 7 ")), 7);
        // Explicit zero and negatives pass through for the service to reject.
        assert_eq!(parse_quantity(Some("0")), 0);
        assert_eq!(parse_quantity(Some("-2")), -2);
    }
}
