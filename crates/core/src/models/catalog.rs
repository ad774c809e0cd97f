//! Catalog reference entities.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CategoryId, ProductId};

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub category_id: CategoryId,
    pub name: String,
}

/// A listed product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: ProductId,
    pub name: String,
    pub description: String,
    /// Current list price in the currency's standard unit.
    pub price: Decimal,
    /// Seller-assigned condition grade.
    pub condition: Option<i32>,
    pub is_sold: bool,
    pub category: Option<Category>,
    /// Absolute image URLs (relative backend paths are resolved on conversion).
    pub image_urls: Vec<String>,
}
