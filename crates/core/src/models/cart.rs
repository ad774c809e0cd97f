//! Cart entities.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CartId, CartItemId, ProductId, UserId};

/// A user's cart. The backend keeps at most one per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub cart_id: CartId,
    pub user_id: UserId,
    pub total_price: Decimal,
}

/// A line in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub cart_item_id: CartItemId,
    pub cart_id: CartId,
    pub product_id: ProductId,
    /// Price captured when the item was added. Never re-read from the product.
    pub price: Decimal,
    pub product_name: Option<String>,
}

/// A cart together with its lines, as shown in the cart view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartContents {
    pub cart: Cart,
    pub items: Vec<CartItem>,
}

impl CartContents {
    /// Whether there is nothing to check out.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
