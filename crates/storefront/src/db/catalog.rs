//! Catalog repository.
//!
//! Read-only access to the two catalog tables. Stock counts are reported
//! but never mutated here; nothing in this system decrements them.

use sqlx::SqlitePool;

use waggy_core::{Money, ProductId};

use super::RepositoryError;
use crate::models::{CatalogItem, ItemKind, ItemRef};

/// Food rows carry no rating column.
type FoodRow = (i64, String, String, i64, i64, Option<String>);
type ApparelRow = (i64, String, String, i64, i64, Option<String>, Option<i64>);

/// Repository for catalog lookups.
pub struct CatalogRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all items of one kind in insertion (id) order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, kind: ItemKind) -> Result<Vec<CatalogItem>, RepositoryError> {
        match kind {
            ItemKind::Food => {
                let rows = sqlx::query_as::<_, FoodRow>(
                    r"
                    SELECT id, name, description, price_cents, stock, image_file
                    FROM food_item
                    ORDER BY id ASC
                    ",
                )
                .fetch_all(self.pool)
                .await?;

                Ok(rows.into_iter().map(food_row_to_item).collect())
            }
            ItemKind::Apparel => {
                let rows = sqlx::query_as::<_, ApparelRow>(
                    r"
                    SELECT id, name, description, price_cents, stock, image_file, rating
                    FROM apparel_item
                    ORDER BY id ASC
                    ",
                )
                .fetch_all(self.pool)
                .await?;

                Ok(rows.into_iter().map(apparel_row_to_item).collect())
            }
        }
    }

    /// Look up an item by bare id, trying food first, then apparel.
    ///
    /// Ids are not unique across the two tables, so a bare-id lookup has a
    /// fixed kind order and a food item shadows an apparel item with the
    /// same id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn lookup(&self, id: ProductId) -> Result<Option<CatalogItem>, RepositoryError> {
        if let Some(item) = self.lookup_ref(ItemRef::Food(id)).await? {
            return Ok(Some(item));
        }
        self.lookup_ref(ItemRef::Apparel(id)).await
    }

    /// Resolve a kind-tagged reference.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lookup_ref(&self, item: ItemRef) -> Result<Option<CatalogItem>, RepositoryError> {
        match item {
            ItemRef::Food(id) => {
                let row = sqlx::query_as::<_, FoodRow>(
                    r"
                    SELECT id, name, description, price_cents, stock, image_file
                    FROM food_item
                    WHERE id = ?1
                    ",
                )
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

                Ok(row.map(food_row_to_item))
            }
            ItemRef::Apparel(id) => {
                let row = sqlx::query_as::<_, ApparelRow>(
                    r"
                    SELECT id, name, description, price_cents, stock, image_file, rating
                    FROM apparel_item
                    WHERE id = ?1
                    ",
                )
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

                Ok(row.map(apparel_row_to_item))
            }
        }
    }
}

fn food_row_to_item(
    (id, name, description, price_cents, stock, image_file): FoodRow,
) -> CatalogItem {
    CatalogItem {
        id: ProductId::new(id),
        kind: ItemKind::Food,
        name,
        description,
        price: Money::from_cents(price_cents),
        stock,
        image_file,
        rating: None,
    }
}

fn apparel_row_to_item(
    (id, name, description, price_cents, stock, image_file, rating): ApparelRow,
) -> CatalogItem {
    CatalogItem {
        id: ProductId::new(id),
        kind: ItemKind::Apparel,
        name,
        description,
        price: Money::from_cents(price_cents),
        stock,
        image_file,
        rating,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use crate::db::test_support::memory_pool;

    /// Insert a catalog row directly; the repository itself is read-only.
    pub(crate) async fn insert_item(
        pool: &SqlitePool,
        kind: ItemKind,
        name: &str,
        price: Money,
    ) -> ProductId {
        let table = match kind {
            ItemKind::Food => "food_item",
            ItemKind::Apparel => "apparel_item",
        };
        let sql = format!(
            "INSERT INTO {table} (name, description, price_cents, stock) \
             VALUES (?1, ?2, ?3, 10) RETURNING id"
        );
        let (id,) = sqlx::query_as::<_, (i64,)>(&sql)
            .bind(name)
            .bind(format!("{name} description"))
            .bind(price.as_cents())
            .fetch_one(pool)
            .await
            .unwrap();
        ProductId::new(id)
    }

    pub(crate) async fn set_price(pool: &SqlitePool, item: ItemRef, price: Money) {
        let table = match item.kind() {
            ItemKind::Food => "food_item",
            ItemKind::Apparel => "apparel_item",
        };
        let sql = format!("UPDATE {table} SET price_cents = ?1 WHERE id = ?2");
        sqlx::query(&sql)
            .bind(price.as_cents())
            .bind(item.id())
            .execute(pool)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_lookup_ref_resolves_kind() {
        let pool = memory_pool().await;
        let repo = CatalogRepository::new(&pool);

        let food = insert_item(&pool, ItemKind::Food, "Salmon Bites", Money::from_cents(999)).await;
        let apparel =
            insert_item(&pool, ItemKind::Apparel, "Rain Coat", Money::from_cents(1599)).await;

        let item = repo.lookup_ref(ItemRef::Food(food)).await.unwrap().unwrap();
        assert_eq!(item.kind, ItemKind::Food);
        assert_eq!(item.price, Money::from_cents(999));
        assert_eq!(item.rating, None);

        let item = repo
            .lookup_ref(ItemRef::Apparel(apparel))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(item.kind, ItemKind::Apparel);
        assert_eq!(item.name, "Rain Coat");
    }

    #[tokio::test]
    async fn test_lookup_tries_food_before_apparel() {
        let pool = memory_pool().await;
        let repo = CatalogRepository::new(&pool);

        // Force the same id into both tables.
        sqlx::query(
            "INSERT INTO food_item (id, name, description, price_cents, stock) \
             VALUES (500, 'Food 500', 'd', 100, 1)",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO apparel_item (id, name, description, price_cents, stock) \
             VALUES (500, 'Apparel 500', 'd', 200, 1)",
        )
        .execute(&pool)
        .await
        .unwrap();

        let item = repo.lookup(ProductId::new(500)).await.unwrap().unwrap();
        assert_eq!(item.kind, ItemKind::Food);
        assert_eq!(item.name, "Food 500");
    }

    #[tokio::test]
    async fn test_lookup_missing_is_none() {
        let pool = memory_pool().await;
        let repo = CatalogRepository::new(&pool);
        assert!(repo.lookup(ProductId::new(99999)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_is_in_insertion_order() {
        let pool = memory_pool().await;
        let repo = CatalogRepository::new(&pool);

        let first = insert_item(&pool, ItemKind::Food, "First", Money::from_cents(100)).await;
        let second = insert_item(&pool, ItemKind::Food, "Second", Money::from_cents(200)).await;

        let items = repo.list(ItemKind::Food).await.unwrap();
        let ids: Vec<ProductId> = items.iter().map(|i| i.id).collect();
        let pos_first = ids.iter().position(|&id| id == first).unwrap();
        let pos_second = ids.iter().position(|&id| id == second).unwrap();
        assert!(pos_first < pos_second);
    }
}
