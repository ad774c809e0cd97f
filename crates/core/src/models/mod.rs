//! Domain entities as the client sees them.
//!
//! These are the clean shapes the workflows operate on; the backend's raw JSON
//! shapes live in the storefront crate's `api::types` and are converted into
//! these.

pub mod cart;
pub mod catalog;
pub mod order;
pub mod payment;
pub mod user;
pub mod wishlist;

pub use cart::{Cart, CartContents, CartItem};
pub use catalog::{Category, Product};
pub use order::{Order, OrderItem};
pub use payment::{PaidOrder, Payment, PaymentSessionRef, ReturnSessionId};
pub use user::User;
pub use wishlist::{Wishlist, WishlistItem};
