//! Catalog domain types.
//!
//! The catalog has two item kinds, food and apparel, stored in separate
//! tables whose ids are not unique across kinds. Every reference into the
//! catalog therefore carries its kind tag ([`ItemRef`]).

use core::fmt;

use serde::{Deserialize, Serialize};

use waggy_core::{Money, ProductId};

/// The two sellable item kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Food,
    Apparel,
}

impl ItemKind {
    /// Stable string form, used as the kind column in the cart table
    /// and as the kind segment in forms and URLs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Apparel => "apparel",
        }
    }

    /// Parse from the stable string form.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "food" => Some(Self::Food),
            "apparel" => Some(Self::Apparel),
            _ => None,
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A kind-tagged reference to a catalog item.
///
/// Exactly one kind and one id - the invalid states of the two-nullable-
/// foreign-key encoding (both set, both null) cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemRef {
    Food(ProductId),
    Apparel(ProductId),
}

impl ItemRef {
    /// Build a reference from its kind tag and id.
    #[must_use]
    pub const fn new(kind: ItemKind, id: ProductId) -> Self {
        match kind {
            ItemKind::Food => Self::Food(id),
            ItemKind::Apparel => Self::Apparel(id),
        }
    }

    /// The kind tag.
    #[must_use]
    pub const fn kind(self) -> ItemKind {
        match self {
            Self::Food(_) => ItemKind::Food,
            Self::Apparel(_) => ItemKind::Apparel,
        }
    }

    /// The id within the kind's table.
    #[must_use]
    pub const fn id(self) -> ProductId {
        match self {
            Self::Food(id) | Self::Apparel(id) => id,
        }
    }
}

/// A sellable catalog item.
///
/// Read-only from the cart/checkout perspective; stock is informational
/// and never decremented by this system.
#[derive(Debug, Clone)]
pub struct CatalogItem {
    pub id: ProductId,
    pub kind: ItemKind,
    pub name: String,
    pub description: String,
    pub price: Money,
    pub stock: i64,
    pub image_file: Option<String>,
    /// Customer rating, apparel only.
    pub rating: Option<i64>,
}

impl CatalogItem {
    /// Kind-tagged reference to this item.
    #[must_use]
    pub const fn item_ref(&self) -> ItemRef {
        ItemRef::new(self.kind, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse_roundtrip() {
        assert_eq!(ItemKind::parse("food"), Some(ItemKind::Food));
        assert_eq!(ItemKind::parse("apparel"), Some(ItemKind::Apparel));
        assert_eq!(ItemKind::parse("toys"), None);
        assert_eq!(ItemKind::parse(ItemKind::Food.as_str()), Some(ItemKind::Food));
    }

    #[test]
    fn test_item_ref_accessors() {
        let item = ItemRef::new(ItemKind::Apparel, ProductId::new(4));
        assert_eq!(item.kind(), ItemKind::Apparel);
        assert_eq!(item.id(), ProductId::new(4));
        assert_eq!(item, ItemRef::Apparel(ProductId::new(4)));
    }
}
