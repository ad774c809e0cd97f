//! Swiftthrift Storefront library.
//!
//! Customer workflows against the Swiftthrift REST backend:
//!
//! - [`auth`] - Login, signup and logout
//! - [`catalog`] - Cached product and category listings
//! - [`cart`] - Cart resolution (find or create) and cart items
//! - [`selection`] - Which cart lines are marked for checkout
//! - [`checkout`] - Payment session creation and the hosted checkout hand-off
//! - [`wishlist`] - Saved products
//! - [`orders`] - Order history with the post-payment banner
//! - [`routes`] - Local listener for the hosted checkout's redirect back
//!
//! All business logic (authentication, inventory, totals, payments) lives in
//! the backend; this crate orchestrates calls and keeps the session.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod events;
pub mod orders;
pub mod routes;
pub mod selection;
pub mod session;
pub mod state;
pub mod wishlist;

pub use api::BackendClient;
pub use config::ClientConfig;
pub use error::{ClientError, ErrorKind};
pub use events::{EventBus, StoreEvent};
pub use session::{SessionContext, SessionStore};
pub use state::Storefront;
