//! Checkout orchestration.
//!
//! Builds a hosted Stripe session from the cart and settles the cart
//! once that session reports payment complete. Line amounts are read
//! from the live catalog at checkout time, not from the cart snapshot,
//! so a price change between add and checkout charges the current price
//! while the cart page keeps showing the snapshot.

use sqlx::SqlitePool;
use thiserror::Error;

use waggy_core::UserId;

use crate::db::RepositoryError;
use crate::db::cart::CartRepository;
use crate::db::catalog::CatalogRepository;
use crate::services::stripe::{LineItem, StripeClient, StripeError};

/// Errors from checkout operations.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Checkout was started with nothing in the cart.
    #[error("cart is empty")]
    EmptyCart,

    /// A cart entry references a catalog item that no longer exists.
    #[error("cart references a catalog item that no longer exists")]
    NotFound,

    /// No checkout session under the given id.
    #[error("checkout session not found")]
    SessionNotFound,

    /// Stripe call failed.
    #[error(transparent)]
    Stripe(StripeError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<StripeError> for CheckoutError {
    fn from(e: StripeError) -> Self {
        match e {
            StripeError::SessionNotFound => Self::SessionNotFound,
            other => Self::Stripe(other),
        }
    }
}

/// Status of a checkout session, as shown to the success page.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SessionStatus {
    pub status: String,
    pub customer_email: Option<String>,
}

/// Checkout service.
pub struct CheckoutService<'a> {
    pool: &'a SqlitePool,
    stripe: &'a StripeClient,
    base_url: &'a str,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool, stripe: &'a StripeClient, base_url: &'a str) -> Self {
        Self {
            pool,
            stripe,
            base_url,
        }
    }

    /// Start a checkout: reprice the cart and create a hosted session.
    /// Returns the URL of the payment page to redirect the customer to.
    ///
    /// The cart is left untouched here; it is only cleared in
    /// [`Self::finalize`] once the session reports `complete`.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` before any external call when
    /// the cart has no entries.
    pub async fn begin(&self, user_id: UserId) -> Result<String, CheckoutError> {
        let line_items = self.line_items_for(user_id).await?;

        let success_url = format!(
            "{}/success.html?session_id={{CHECKOUT_SESSION_ID}}",
            self.base_url
        );
        let cancel_url = format!("{}/cancel.html", self.base_url);

        let session = self
            .stripe
            .create_session(&line_items, &success_url, &cancel_url)
            .await?;

        session.url.ok_or_else(|| {
            CheckoutError::Stripe(StripeError::Parse(String::from(
                "checkout session has no redirect url",
            )))
        })
    }

    /// Reprice the user's cart against the live catalog.
    ///
    /// Quantities come from the cart; names and unit amounts come from
    /// the catalog as it is now.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` for an empty cart and
    /// `CheckoutError::NotFound` when an entry's catalog item has been
    /// removed since it was added.
    pub async fn line_items_for(&self, user_id: UserId) -> Result<Vec<LineItem>, CheckoutError> {
        let entries = CartRepository::new(self.pool).list_for(user_id).await?;
        if entries.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let catalog = CatalogRepository::new(self.pool);
        let mut line_items = Vec::with_capacity(entries.len());
        for entry in entries {
            let item = catalog
                .lookup_ref(entry.item)
                .await?
                .ok_or(CheckoutError::NotFound)?;
            line_items.push(LineItem {
                name: item.name,
                unit_amount: item.price,
                quantity: entry.quantity,
            });
        }

        Ok(line_items)
    }

    /// Look up the status of a session for the success page poll.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::SessionNotFound` for an unknown id.
    pub async fn status(&self, session_id: &str) -> Result<SessionStatus, CheckoutError> {
        let session = self.stripe.retrieve_session(session_id).await?;

        Ok(SessionStatus {
            status: session.status,
            customer_email: session.customer_details.and_then(|d| d.email),
        })
    }

    /// Settle a finished checkout: if the session reports `complete`,
    /// clear the user's cart. Any other status leaves the cart alone.
    /// Calling this twice for the same session is harmless.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::SessionNotFound` for an unknown id.
    pub async fn finalize(
        &self,
        user_id: UserId,
        session_id: &str,
    ) -> Result<SessionStatus, CheckoutError> {
        let status = self.status(session_id).await?;

        if status.status == "complete" {
            CartRepository::new(self.pool).clear(user_id).await?;
        }

        Ok(status)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::catalog::tests::{insert_item, set_price};
    use crate::db::test_support::memory_pool;
    use crate::db::users::UserRepository;
    use crate::models::{ItemKind, ItemRef};
    use secrecy::SecretString;
    use waggy_core::{Email, Money};

    fn offline_stripe() -> StripeClient {
        StripeClient::new(SecretString::from("sk_test_offline"))
    }

    async fn test_user(pool: &SqlitePool) -> UserId {
        UserRepository::new(pool)
            .create("Ada", &Email::parse("ada@x.com").unwrap(), "hash")
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_empty_cart_fails_before_any_external_call() {
        let pool = memory_pool().await;
        let stripe = offline_stripe();
        let checkout = CheckoutService::new(&pool, &stripe, "http://localhost:5000");
        let user = test_user(&pool).await;

        let err = checkout.begin(user).await.unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyCart));
    }

    #[tokio::test]
    async fn test_line_items_use_live_catalog_prices() {
        let pool = memory_pool().await;
        let stripe = offline_stripe();
        let checkout = CheckoutService::new(&pool, &stripe, "http://localhost:5000");
        let user = test_user(&pool).await;

        let food = insert_item(&pool, ItemKind::Food, "Salmon Bites", Money::from_cents(999)).await;
        let coat =
            insert_item(&pool, ItemKind::Apparel, "Rain Coat", Money::from_cents(1599)).await;

        let cart = CartRepository::new(&pool);
        cart.add(user, ItemRef::Food(food), 2).await.unwrap();
        cart.add(user, ItemRef::Apparel(coat), 1).await.unwrap();

        // Price change after add: checkout charges the new price even
        // though the cart snapshot keeps the old one.
        set_price(&pool, ItemRef::Food(food), Money::from_cents(1299)).await;

        let items = checkout.line_items_for(user).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Salmon Bites");
        assert_eq!(items[0].unit_amount, Money::from_cents(1299));
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[1].unit_amount, Money::from_cents(1599));

        let snapshot = cart.list_for(user).await.unwrap();
        assert_eq!(snapshot[0].unit_price, Money::from_cents(999));
    }

    #[tokio::test]
    async fn test_register_shop_and_reprice_scenario() {
        let pool = memory_pool().await;
        let stripe = offline_stripe();
        let checkout = CheckoutService::new(&pool, &stripe, "http://localhost:5000");

        let user = crate::services::auth::AuthService::new(&pool)
            .register("Ada", "ada@x.com", "secret-1")
            .await
            .unwrap();

        let bites =
            insert_item(&pool, ItemKind::Food, "Salmon Bites", Money::from_cents(999)).await;
        let coat =
            insert_item(&pool, ItemKind::Apparel, "Rain Coat", Money::from_cents(1599)).await;

        let cart = CartRepository::new(&pool);
        cart.add(user.id, ItemRef::Food(bites), 2).await.unwrap();
        cart.add(user.id, ItemRef::Apparel(coat), 1).await.unwrap();

        // 2 * 9.99 + 1 * 15.99
        assert_eq!(cart.subtotal(user.id).await.unwrap(), Money::from_cents(3597));

        let items = checkout.line_items_for(user.id).await.unwrap();
        assert_eq!(items.len(), 2);
        let total: Money = items.iter().map(|i| i.unit_amount.times(i.quantity)).sum();
        assert_eq!(total, Money::from_cents(3597));
    }

    #[tokio::test]
    async fn test_line_items_fail_when_catalog_item_removed() {
        let pool = memory_pool().await;
        let stripe = offline_stripe();
        let checkout = CheckoutService::new(&pool, &stripe, "http://localhost:5000");
        let user = test_user(&pool).await;

        let food = insert_item(&pool, ItemKind::Food, "Salmon Bites", Money::from_cents(999)).await;
        CartRepository::new(&pool)
            .add(user, ItemRef::Food(food), 1)
            .await
            .unwrap();

        sqlx::query("DELETE FROM food_item WHERE id = ?1")
            .bind(food)
            .execute(&pool)
            .await
            .unwrap();

        let err = checkout.line_items_for(user).await.unwrap_err();
        assert!(matches!(err, CheckoutError::NotFound));
    }
}
