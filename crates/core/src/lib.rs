//! Swiftthrift Core - Shared types library.
//!
//! This crate provides common types used across all Swiftthrift client components:
//! - `storefront` - Customer workflows (cart, checkout, wishlist, orders)
//! - `admin` - Admin console (catalog creation, paid-order listing)
//! - `cli` - Command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps it
//! lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money, emails, and statuses
//! - [`models`] - Domain entities as seen by the client (cart, order, product, ...)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod models;
pub mod types;

pub use models::*;
pub use types::*;
