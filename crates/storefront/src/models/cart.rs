//! Cart domain types.

use chrono::{DateTime, Utc};

use waggy_core::{CartEntryId, Money, UserId};

use super::catalog::ItemRef;

/// One line in a user's cart.
///
/// `name` and `unit_price` are copied from the catalog at add time and do
/// not change when the catalog does. Entries are never updated in place;
/// re-adding the same item appends a second entry.
#[derive(Debug, Clone)]
pub struct CartEntry {
    pub id: CartEntryId,
    pub user_id: UserId,
    /// Kind-tagged catalog reference.
    pub item: ItemRef,
    /// Display name snapshot from add time.
    pub name: String,
    /// Price snapshot from add time.
    pub unit_price: Money,
    /// Always >= 1.
    pub quantity: i64,
    pub added_at: DateTime<Utc>,
}

impl CartEntry {
    /// Snapshot price times quantity.
    #[must_use]
    pub const fn line_total(&self) -> Money {
        self.unit_price.times(self.quantity)
    }
}
