//! Swiftthrift Admin library.
//!
//! The admin console: sign in with admin credentials, add products and
//! categories, and list orders that have been paid.
//!
//! # Modules
//!
//! - [`client`] - Admin endpoints (login, multipart product upload, categories)
//! - [`catalog`] - Product and category form validation
//! - [`orders`] - Paid-order aggregation across orders and payments
//! - [`console`] - The signed-in console tying these together

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod client;
pub mod config;
pub mod console;
pub mod error;
pub mod orders;

pub use config::AdminCredentials;
pub use console::AdminConsole;
pub use error::AdminError;
