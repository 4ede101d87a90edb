//! Cart ledger repository.
//!
//! Every row snapshots the catalog item's name and price as they were at
//! add time. The subtotal is computed in SQL on every read; nothing here
//! caches.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use waggy_core::{CartEntryId, Money, ProductId, UserId};

use super::RepositoryError;
use crate::models::{CartEntry, ItemKind, ItemRef};

type CartRow = (i64, i64, String, i64, String, i64, i64, DateTime<Utc>);

/// Repository for cart ledger operations.
pub struct CartRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Resolve a catalog item and append a snapshot entry, in one
    /// transaction so the snapshot cannot see a half-applied catalog
    /// update and concurrent mutations for the user serialize.
    ///
    /// Returns `None` when the referenced catalog item does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn add(
        &self,
        user_id: UserId,
        item: ItemRef,
        quantity: i64,
    ) -> Result<Option<CartEntry>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let sql = match item.kind() {
            ItemKind::Food => "SELECT name, price_cents FROM food_item WHERE id = ?1",
            ItemKind::Apparel => "SELECT name, price_cents FROM apparel_item WHERE id = ?1",
        };
        let row = sqlx::query_as::<_, (String, i64)>(sql)
            .bind(item.id())
            .fetch_optional(&mut *tx)
            .await?;

        let Some((name, price_cents)) = row else {
            return Ok(None);
        };

        let added_at = Utc::now();
        let (id,) = sqlx::query_as::<_, (i64,)>(
            r"
            INSERT INTO cart_entry
                (user_id, item_kind, item_id, name, price_cents, quantity, added_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            RETURNING id
            ",
        )
        .bind(user_id)
        .bind(item.kind().as_str())
        .bind(item.id())
        .bind(&name)
        .bind(price_cents)
        .bind(quantity)
        .bind(added_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(CartEntry {
            id: CartEntryId::new(id),
            user_id,
            item,
            name,
            unit_price: Money::from_cents(price_cents),
            quantity,
            added_at,
        }))
    }

    /// All entries for a user in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored kind tag is
    /// unknown.
    pub async fn list_for(&self, user_id: UserId) -> Result<Vec<CartEntry>, RepositoryError> {
        let rows = sqlx::query_as::<_, CartRow>(
            r"
            SELECT id, user_id, item_kind, item_id, name, price_cents, quantity, added_at
            FROM cart_entry
            WHERE user_id = ?1
            ORDER BY id ASC
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(row_to_entry).collect()
    }

    /// Sum of `price * quantity` over the user's entries, recomputed on
    /// every call.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn subtotal(&self, user_id: UserId) -> Result<Money, RepositoryError> {
        let (cents,) = sqlx::query_as::<_, (i64,)>(
            r"
            SELECT COALESCE(SUM(price_cents * quantity), 0)
            FROM cart_entry
            WHERE user_id = ?1
            ",
        )
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;

        Ok(Money::from_cents(cents))
    }

    /// Delete one entry, scoped to its owner.
    ///
    /// # Returns
    ///
    /// `true` if a row was deleted, `false` if no such entry existed for
    /// this user (removal is idempotent, not an error).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(
        &self,
        user_id: UserId,
        entry_id: CartEntryId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM cart_entry
            WHERE id = ?1 AND user_id = ?2
            ",
        )
        .bind(entry_id)
        .bind(user_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete all entries for a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn clear(&self, user_id: UserId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_entry WHERE user_id = ?1")
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

fn row_to_entry(
    (id, user_id, item_kind, item_id, name, price_cents, quantity, added_at): CartRow,
) -> Result<CartEntry, RepositoryError> {
    let kind = ItemKind::parse(&item_kind).ok_or_else(|| {
        RepositoryError::DataCorruption(format!("unknown item kind in cart_entry: {item_kind}"))
    })?;

    Ok(CartEntry {
        id: CartEntryId::new(id),
        user_id: UserId::new(user_id),
        item: ItemRef::new(kind, ProductId::new(item_id)),
        name,
        unit_price: Money::from_cents(price_cents),
        quantity,
        added_at,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::catalog::tests::{insert_item, set_price};
    use crate::db::test_support::memory_pool;
    use crate::db::users::UserRepository;
    use waggy_core::Email;

    async fn test_user(pool: &SqlitePool) -> UserId {
        UserRepository::new(pool)
            .create("Ada", &Email::parse("ada@x.com").unwrap(), "hash")
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_add_snapshots_name_and_price() {
        let pool = memory_pool().await;
        let cart = CartRepository::new(&pool);
        let user = test_user(&pool).await;

        let food = insert_item(&pool, ItemKind::Food, "Salmon Bites", Money::from_cents(999)).await;
        let entry = cart
            .add(user, ItemRef::Food(food), 2)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(entry.name, "Salmon Bites");
        assert_eq!(entry.unit_price, Money::from_cents(999));
        assert_eq!(entry.quantity, 2);

        // A later catalog price change does not touch the stored entry.
        set_price(&pool, ItemRef::Food(food), Money::from_cents(1299)).await;
        let entries = cart.list_for(user).await.unwrap();
        assert_eq!(entries.len(), 1);
        let stored = entries.first().unwrap();
        assert_eq!(stored.unit_price, Money::from_cents(999));
        assert_eq!(stored.name, "Salmon Bites");
    }

    #[tokio::test]
    async fn test_add_missing_item_is_none() {
        let pool = memory_pool().await;
        let cart = CartRepository::new(&pool);
        let user = test_user(&pool).await;

        let missing = ItemRef::Apparel(ProductId::new(424_242));
        assert!(cart.add(user, missing, 1).await.unwrap().is_none());
        assert!(cart.list_for(user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_readd_appends_instead_of_merging() {
        let pool = memory_pool().await;
        let cart = CartRepository::new(&pool);
        let user = test_user(&pool).await;

        let food = insert_item(&pool, ItemKind::Food, "Salmon Bites", Money::from_cents(999)).await;
        cart.add(user, ItemRef::Food(food), 1).await.unwrap();
        cart.add(user, ItemRef::Food(food), 1).await.unwrap();

        let entries = cart.list_for(user).await.unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[tokio::test]
    async fn test_subtotal_sums_price_times_quantity() {
        let pool = memory_pool().await;
        let cart = CartRepository::new(&pool);
        let user = test_user(&pool).await;

        let food = insert_item(&pool, ItemKind::Food, "Salmon Bites", Money::from_cents(999)).await;
        let coat =
            insert_item(&pool, ItemKind::Apparel, "Rain Coat", Money::from_cents(1599)).await;

        cart.add(user, ItemRef::Food(food), 2).await.unwrap();
        cart.add(user, ItemRef::Apparel(coat), 1).await.unwrap();

        // 2 * 9.99 + 1 * 15.99 = 35.97
        assert_eq!(cart.subtotal(user).await.unwrap(), Money::from_cents(3597));
        // Reading again yields the same result; the read has no side effects.
        assert_eq!(cart.subtotal(user).await.unwrap(), Money::from_cents(3597));
    }

    #[tokio::test]
    async fn test_subtotal_empty_cart_is_zero() {
        let pool = memory_pool().await;
        let cart = CartRepository::new(&pool);
        let user = test_user(&pool).await;

        assert_eq!(cart.subtotal(user).await.unwrap(), Money::ZERO);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let pool = memory_pool().await;
        let cart = CartRepository::new(&pool);
        let user = test_user(&pool).await;

        let food = insert_item(&pool, ItemKind::Food, "Salmon Bites", Money::from_cents(999)).await;
        let entry = cart
            .add(user, ItemRef::Food(food), 1)
            .await
            .unwrap()
            .unwrap();

        assert!(cart.delete(user, entry.id).await.unwrap());
        // Second delete of the same id is a no-op, not an error.
        assert!(!cart.delete(user, entry.id).await.unwrap());
        assert!(cart.list_for(user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_is_owner_scoped() {
        let pool = memory_pool().await;
        let cart = CartRepository::new(&pool);
        let owner = test_user(&pool).await;
        let other = UserRepository::new(&pool)
            .create("Eve", &Email::parse("eve@x.com").unwrap(), "hash")
            .await
            .unwrap()
            .id;

        let food = insert_item(&pool, ItemKind::Food, "Salmon Bites", Money::from_cents(999)).await;
        let entry = cart
            .add(owner, ItemRef::Food(food), 1)
            .await
            .unwrap()
            .unwrap();

        // Another user cannot remove the owner's entry.
        assert!(!cart.delete(other, entry.id).await.unwrap());
        assert_eq!(cart.list_for(owner).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_clear() {
        let pool = memory_pool().await;
        let cart = CartRepository::new(&pool);
        let user = test_user(&pool).await;

        let food = insert_item(&pool, ItemKind::Food, "Salmon Bites", Money::from_cents(999)).await;
        cart.add(user, ItemRef::Food(food), 1).await.unwrap();
        cart.add(user, ItemRef::Food(food), 3).await.unwrap();

        assert_eq!(cart.clear(user).await.unwrap(), 2);
        assert!(cart.list_for(user).await.unwrap().is_empty());
        assert_eq!(cart.clear(user).await.unwrap(), 0);
    }
}
