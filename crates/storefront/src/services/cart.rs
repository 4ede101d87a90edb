//! Cart service.
//!
//! Thin layer over the cart repository that enforces quantity rules and
//! shapes the view the cart page renders.

use sqlx::SqlitePool;
use thiserror::Error;

use waggy_core::{CartEntryId, Money, UserId};

use crate::db::RepositoryError;
use crate::db::cart::CartRepository;
use crate::models::{CartEntry, ItemRef};

/// Errors from cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The referenced catalog item does not exist.
    #[error("no such catalog item")]
    NotFound,

    /// Quantity must be at least one.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// A user's cart as rendered on the cart page.
#[derive(Debug)]
pub struct CartView {
    pub entries: Vec<CartEntry>,
    pub subtotal: Money,
}

/// Cart service.
pub struct CartService<'a> {
    repo: CartRepository<'a>,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            repo: CartRepository::new(pool),
        }
    }

    /// Add a catalog item to the user's cart, snapshotting its current
    /// name and price. Adding the same item again appends a second entry.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` when `quantity < 1` and
    /// `CartError::NotFound` when the catalog item does not exist.
    pub async fn add(
        &self,
        user_id: UserId,
        item: ItemRef,
        quantity: i64,
    ) -> Result<CartEntry, CartError> {
        if quantity < 1 {
            return Err(CartError::InvalidQuantity(quantity));
        }

        self.repo
            .add(user_id, item, quantity)
            .await?
            .ok_or(CartError::NotFound)
    }

    /// The user's entries plus their subtotal, both read fresh.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if a query fails.
    pub async fn view(&self, user_id: UserId) -> Result<CartView, CartError> {
        let entries = self.repo.list_for(user_id).await?;
        let subtotal = self.repo.subtotal(user_id).await?;

        Ok(CartView { entries, subtotal })
    }

    /// Remove one entry from the user's cart. Removing an entry that is
    /// already gone, or that belongs to someone else, is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the query fails.
    pub async fn remove(&self, user_id: UserId, entry_id: CartEntryId) -> Result<(), CartError> {
        self.repo.delete(user_id, entry_id).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::catalog::tests::insert_item;
    use crate::db::test_support::memory_pool;
    use crate::db::users::UserRepository;
    use crate::models::ItemKind;
    use waggy_core::Email;

    async fn test_user(pool: &SqlitePool) -> UserId {
        UserRepository::new(pool)
            .create("Ada", &Email::parse("ada@x.com").unwrap(), "hash")
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_add_rejects_zero_and_negative_quantity() {
        let pool = memory_pool().await;
        let cart = CartService::new(&pool);
        let user = test_user(&pool).await;

        let food = insert_item(&pool, ItemKind::Food, "Salmon Bites", Money::from_cents(999)).await;

        let zero = cart.add(user, ItemRef::Food(food), 0).await.unwrap_err();
        assert!(matches!(zero, CartError::InvalidQuantity(0)));
        let neg = cart.add(user, ItemRef::Food(food), -3).await.unwrap_err();
        assert!(matches!(neg, CartError::InvalidQuantity(-3)));

        assert!(cart.view(user).await.unwrap().entries.is_empty());
    }

    #[tokio::test]
    async fn test_add_unknown_item_is_not_found() {
        let pool = memory_pool().await;
        let cart = CartService::new(&pool);
        let user = test_user(&pool).await;

        let err = cart
            .add(user, ItemRef::Food(waggy_core::ProductId::new(999_999)), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, CartError::NotFound));
    }

    #[tokio::test]
    async fn test_view_reports_entries_and_subtotal() {
        let pool = memory_pool().await;
        let cart = CartService::new(&pool);
        let user = test_user(&pool).await;

        let food = insert_item(&pool, ItemKind::Food, "Salmon Bites", Money::from_cents(999)).await;
        cart.add(user, ItemRef::Food(food), 2).await.unwrap();

        let view = cart.view(user).await.unwrap();
        assert_eq!(view.entries.len(), 1);
        assert_eq!(view.subtotal, Money::from_cents(1998));
    }

    #[tokio::test]
    async fn test_remove_is_quiet_for_missing_entries() {
        let pool = memory_pool().await;
        let cart = CartService::new(&pool);
        let user = test_user(&pool).await;

        cart.remove(user, CartEntryId::new(12345)).await.unwrap();
    }
}
