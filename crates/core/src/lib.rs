//! Waggy Core - Shared types library.
//!
//! This crate provides the common domain types used by the storefront:
//! type-safe IDs, validated email addresses, and integer minor-unit money.
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. Database binding support for SQLite is available
//! behind the `sqlite` feature.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
