//! Conversions from backend wire shapes into `swiftthrift_core` models.

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use tracing::warn;
use url::Url;

use swiftthrift_core::{
    Cart, CartContents, CartItem, Category, Order, OrderItem, Payment, Product, User,
    UserId, Wishlist, WishlistId, WishlistItem,
};

use super::types::{
    WireCart, WireCategory, WireOrder, WireOrderItem, WirePayment, WireProduct, WireUser,
    WireWishlist, WireWishlistItem,
};

pub fn convert_user(user: WireUser) -> User {
    User {
        user_id: user.user_id,
        email: user.email.unwrap_or_default(),
        username: user.username.unwrap_or_default(),
        role: user.role.unwrap_or_default(),
    }
}

pub fn convert_category(category: WireCategory) -> Category {
    Category {
        category_id: category.category_id,
        name: category.category_name.unwrap_or_default(),
    }
}

pub fn convert_product(product: WireProduct, base_url: &Url) -> Product {
    Product {
        product_id: product.product_id,
        name: product.name.unwrap_or_default(),
        description: product.description.unwrap_or_default(),
        price: product.price.unwrap_or(Decimal::ZERO),
        condition: product.condition,
        is_sold: product.is_sold.unwrap_or(false),
        category: product.category.map(convert_category),
        image_urls: product
            .image_urls
            .unwrap_or_default()
            .iter()
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| resolve_image_url(base_url, raw))
            .collect(),
    }
}

/// Make a backend image path absolute.
///
/// Absolute URLs pass through; relative paths are served from the backend's
/// origin, not from under the `/api` prefix.
pub fn resolve_image_url(base_url: &Url, raw: &str) -> String {
    let raw = raw.trim();
    if raw.starts_with("http://") || raw.starts_with("https://") {
        return raw.to_string();
    }
    let origin = base_url.origin().ascii_serialization();
    if raw.starts_with('/') {
        format!("{origin}{raw}")
    } else {
        format!("{origin}/{raw}")
    }
}

/// Convert a cart, returning `None` when it has no usable id.
///
/// `owner` fills in the user id when the backend leaves `user` out.
pub fn convert_cart(cart: WireCart, owner: UserId) -> Option<CartContents> {
    let cart_id = cart.cart_id?;
    let user_id = cart
        .user
        .and_then(|user| user.user_id)
        .unwrap_or(owner);
    let items = cart
        .cart_items
        .unwrap_or_default()
        .into_iter()
        .filter_map(|item| {
            let Some(product) = item.product else {
                warn!(cart_item_id = %item.cart_item_id, "Cart item without product, skipping");
                return None;
            };
            Some(CartItem {
                cart_item_id: item.cart_item_id,
                cart_id,
                product_id: product.product_id,
                price: item.price.unwrap_or(Decimal::ZERO),
                product_name: product.name,
            })
        })
        .collect();

    Some(CartContents {
        cart: Cart {
            cart_id,
            user_id,
            total_price: cart.total_price.unwrap_or(Decimal::ZERO),
        },
        items,
    })
}

/// Owner of a listed cart, if the backend included it.
pub fn cart_owner(cart: &WireCart) -> Option<UserId> {
    cart.user.as_ref().and_then(|user| user.user_id)
}

pub fn convert_wishlist(wishlist: WireWishlist, owner: UserId) -> Option<Wishlist> {
    Some(Wishlist {
        wishlist_id: wishlist.wishlist_id?,
        user_id: wishlist
            .user
            .and_then(|user| user.user_id)
            .unwrap_or(owner),
    })
}

pub fn convert_wishlist_items(
    items: Vec<WireWishlistItem>,
    wishlist_id: WishlistId,
) -> Vec<WishlistItem> {
    items
        .into_iter()
        .filter_map(|item| {
            let (Some(wishlist_item_id), Some(product)) = (item.wishlist_item_id, item.product)
            else {
                warn!(%wishlist_id, "Wishlist item without id or product, skipping");
                return None;
            };
            Some(WishlistItem {
                wishlist_item_id,
                wishlist_id,
                product_id: product.product_id,
                product_name: product.name,
            })
        })
        .collect()
}

pub fn convert_order(order: WireOrder) -> Order {
    Order {
        order_id: order.order_id,
        user_id: order.user.and_then(|user| user.user_id),
        created_at: order.created_at.as_deref().and_then(parse_created_at),
        status: order.status.unwrap_or_default(),
        total_price: order.total_price.unwrap_or(Decimal::ZERO),
        items: order
            .order_items
            .unwrap_or_default()
            .into_iter()
            .map(convert_order_item)
            .collect(),
    }
}

fn convert_order_item(item: WireOrderItem) -> OrderItem {
    let (product_id, product_name) = item
        .product
        .map_or((None, None), |product| (Some(product.product_id), product.name));
    OrderItem {
        order_item_id: item.order_item_id,
        product_id,
        product_name,
        subtotal: item.subtotal.unwrap_or(Decimal::ZERO),
    }
}

pub fn convert_payment(payment: WirePayment) -> Payment {
    Payment {
        payment_id: payment.payment_id,
        order_id: payment.order.and_then(|order| order.order_id),
        status: payment.status.unwrap_or_default(),
        amount: payment.amount,
    }
}

/// Parse an order timestamp.
///
/// The backend sends either RFC 3339 or a zone-less `LocalDateTime`, which
/// is taken as UTC.
pub fn parse_created_at(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
