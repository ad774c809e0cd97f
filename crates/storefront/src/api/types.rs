//! Raw request and response shapes of the Swiftthrift REST backend.
//!
//! These mirror the backend's JSON exactly (camelCase, nested `{ user: {
//! userId } }` references, prices as JSON numbers). Almost every response
//! field is optional because the backend omits or nulls fields freely; the
//! `conversions` module decides what is usable.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use swiftthrift_core::{
    CartId, CartItemId, CategoryId, CurrencyCode, MinorUnits, OrderId, OrderItemId, OrderStatus,
    PaymentId, PaymentStatus, ProductId, UserId, UserRole, WishlistId, WishlistItemId,
};

// =============================================================================
// References
// =============================================================================

/// `{ "userId": 1 }`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    #[serde(default)]
    pub user_id: Option<UserId>,
}

/// `{ "cartId": 1 }`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartRef {
    pub cart_id: CartId,
}

/// `{ "productId": 1 }`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRef {
    pub product_id: ProductId,
}

/// `{ "wishlistId": 1 }`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistRef {
    pub wishlist_id: WishlistId,
}

/// `{ "categoryId": 1 }`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRef {
    pub category_id: CategoryId,
}

/// `{ "orderId": 1 }`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRef {
    #[serde(default)]
    pub order_id: Option<OrderId>,
}

// =============================================================================
// Auth
// =============================================================================

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<WireUser>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireUser {
    pub user_id: UserId,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub role: Option<UserRole>,
}

/// Signup body. The backend keeps first and last name separately.
#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub email: String,
    pub fname: String,
    pub lname: String,
    pub username: String,
    pub password: String,
    pub phone: String,
}

#[derive(Debug, Serialize)]
pub struct AdminLoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

// =============================================================================
// Catalog
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCategory {
    pub category_id: CategoryId,
    #[serde(default)]
    pub category_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireProduct {
    pub product_id: ProductId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub condition: Option<i32>,
    #[serde(default)]
    pub is_sold: Option<bool>,
    #[serde(default)]
    pub category: Option<WireCategory>,
    #[serde(default)]
    pub image_urls: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    pub category_name: String,
}

/// JSON part of the multipart product creation request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub condition: i32,
    pub is_sold: bool,
    pub category: CategoryRef,
}

// =============================================================================
// Cart
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCart {
    #[serde(default)]
    pub cart_id: Option<CartId>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub total_price: Option<Decimal>,
    #[serde(default)]
    pub user: Option<UserRef>,
    #[serde(default)]
    pub cart_items: Option<Vec<WireCartItem>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCartItem {
    pub cart_item_id: CartItemId,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub product: Option<WireProduct>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCartRequest {
    pub user: UserRef,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateCartItemRequest {
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub cart: CartRef,
    pub product: ProductRef,
}

// =============================================================================
// Wishlist
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireWishlist {
    #[serde(default, alias = "id")]
    pub wishlist_id: Option<WishlistId>,
    #[serde(default)]
    pub user: Option<UserRef>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireWishlistItem {
    #[serde(default, alias = "wishlistid", alias = "id")]
    pub wishlist_item_id: Option<WishlistItemId>,
    #[serde(default)]
    pub product: Option<WireProduct>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateWishlistRequest {
    pub user: UserRef,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateWishlistItemRequest {
    pub wishlist: WishlistRef,
    pub product: ProductRef,
}

// =============================================================================
// Orders & Payments
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireOrder {
    pub order_id: OrderId,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub total_price: Option<Decimal>,
    #[serde(default)]
    pub order_items: Option<Vec<WireOrderItem>>,
    #[serde(default)]
    pub user: Option<UserRef>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireOrderItem {
    #[serde(alias = "orderItemid")]
    pub order_item_id: OrderItemId,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub subtotal: Option<Decimal>,
    #[serde(default)]
    pub product: Option<WireProduct>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePayment {
    #[serde(default)]
    pub payment_id: Option<PaymentId>,
    #[serde(default)]
    pub status: Option<PaymentStatus>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub order: Option<OrderRef>,
}

/// Body of `POST /payments/create-intent`. The backend wants the user id as
/// a string.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentSessionRequest {
    pub user_id: String,
    pub amount: MinorUnits,
    pub currency: CurrencyCode,
}

/// Response of `POST /payments/create-intent`.
///
/// `clientSecret` actually carries the hosted checkout session reference.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentSessionResponse {
    #[serde(default)]
    pub client_secret: Option<String>,
}
