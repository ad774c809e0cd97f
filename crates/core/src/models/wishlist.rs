//! Wishlist entities.

use serde::{Deserialize, Serialize};

use crate::types::{ProductId, UserId, WishlistId, WishlistItemId};

/// A user's wishlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wishlist {
    pub wishlist_id: WishlistId,
    pub user_id: UserId,
}

/// A product saved to a wishlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistItem {
    pub wishlist_item_id: WishlistItemId,
    pub wishlist_id: WishlistId,
    pub product_id: ProductId,
    pub product_name: Option<String>,
}
