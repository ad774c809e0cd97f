//! Order entities (read-only from the client).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{OrderId, OrderItemId, OrderStatus, ProductId, UserId};

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub user_id: Option<UserId>,
    pub created_at: Option<DateTime<Utc>>,
    pub status: OrderStatus,
    pub total_price: Decimal,
    pub items: Vec<OrderItem>,
}

/// A line of a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub order_item_id: OrderItemId,
    pub product_id: Option<ProductId>,
    pub product_name: Option<String>,
    pub subtotal: Decimal,
}
