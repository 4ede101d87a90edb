//! Domain models for the storefront.

pub mod cart;
pub mod catalog;
pub mod session;
pub mod user;

pub use cart::CartEntry;
pub use catalog::{CatalogItem, ItemKind, ItemRef};
pub use session::{CurrentUser, keys as session_keys};
pub use user::User;
