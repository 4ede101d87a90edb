//! User domain types.
//!
//! These types represent validated domain objects separate from database
//! row shapes. The credential hash never leaves the repository layer.

use chrono::{DateTime, Utc};

use waggy_core::{Email, UserId};

/// A registered storefront user.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address, unique, stored exactly as registered.
    pub email: Email,
    /// Whether the account is active. Inactive accounts cannot log in.
    pub active: bool,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
}
