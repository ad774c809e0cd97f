//! Catalog, cart, wishlist and order commands.

use rust_decimal::Decimal;
use swiftthrift_core::{
    CartItemId, CategoryId, CurrencyCode, Price, ProductId, ReturnSessionId, WishlistItemId,
};
use swiftthrift_storefront::Storefront;

use super::{CliError, out};

fn money(state: &Storefront, amount: Decimal) -> String {
    Price::new(amount, state.config().payment.currency).to_string()
}

pub async fn products(state: &Storefront, category: Option<CategoryId>) -> Result<(), CliError> {
    let products = state.catalog().available(category).await?;
    if products.is_empty() {
        return out("No products available.");
    }
    for product in products {
        let category = product
            .category
            .as_ref()
            .map_or("Uncategorized", |c| c.name.as_str());
        out(format_args!(
            "#{:<5} {:<40} {:>12}  {}",
            product.product_id,
            product.name,
            money(state, product.price),
            category
        ))?;
    }
    Ok(())
}

pub async fn categories(state: &Storefront) -> Result<(), CliError> {
    for category in state.catalog().categories().await? {
        out(format_args!("#{:<5} {}", category.category_id, category.name))?;
    }
    Ok(())
}

pub async fn cart_show(state: &Storefront) -> Result<(), CliError> {
    let session = state.session()?;
    let Some(contents) = state.cart(&session).load(session.user().user_id).await? else {
        return out("Your cart is empty.");
    };
    if contents.is_empty() {
        return out("Your cart is empty.");
    }
    for item in &contents.items {
        out(format_args!(
            "line #{:<5} product #{:<5} {:<40} {:>12}",
            item.cart_item_id,
            item.product_id,
            item.product_name.as_deref().unwrap_or("-"),
            money(state, item.price)
        ))?;
    }
    out(format_args!(
        "Cart #{} total: {}",
        contents.cart.cart_id,
        money(state, contents.cart.total_price)
    ))
}

pub async fn cart_add(state: &Storefront, product_id: ProductId) -> Result<(), CliError> {
    let session = state.session()?;
    let product = state.catalog().product(product_id).await?;
    let added = state.cart(&session).add_to_cart(session.user(), &product).await?;
    out(format_args!(
        "Added {} to cart #{} at {}",
        product.name,
        added.cart_id,
        money(state, added.price)
    ))
}

pub async fn cart_remove(state: &Storefront, cart_item_id: CartItemId) -> Result<(), CliError> {
    let session = state.session()?;
    let cart = state.cart(&session);
    let Some(contents) = cart.load(session.user().user_id).await? else {
        return out("Your cart is empty.");
    };
    cart.remove_item(contents.cart.cart_id, cart_item_id).await?;
    out(format_args!("Removed line #{cart_item_id}"))
}

pub async fn wishlist_show(state: &Storefront) -> Result<(), CliError> {
    let session = state.session()?;
    let items = state.wishlist(&session).items(session.user()).await?;
    if items.is_empty() {
        return out("Your wishlist is empty.");
    }
    for item in items {
        out(format_args!(
            "item #{:<5} product #{:<5} {}",
            item.wishlist_item_id,
            item.product_id,
            item.product_name.as_deref().unwrap_or("-")
        ))?;
    }
    Ok(())
}

pub async fn wishlist_toggle(state: &Storefront, product_id: ProductId) -> Result<(), CliError> {
    let session = state.session()?;
    let toggled = state
        .wishlist(&session)
        .toggle(session.user(), product_id)
        .await?;
    let verb = if toggled.added { "Saved" } else { "Removed" };
    out(format_args!(
        "{verb} product #{product_id}; {} item(s) on your wishlist",
        toggled.items.len()
    ))
}

pub async fn wishlist_remove(
    state: &Storefront,
    wishlist_item_id: WishlistItemId,
) -> Result<(), CliError> {
    let session = state.session()?;
    let items = state
        .wishlist(&session)
        .remove(session.user(), wishlist_item_id)
        .await?;
    out(format_args!(
        "Removed item #{wishlist_item_id}; {} item(s) left",
        items.len()
    ))
}

pub async fn orders(state: &Storefront, session_id: Option<String>) -> Result<(), CliError> {
    let session = state.session()?;
    let session_id = session_id
        .filter(|id| !id.trim().is_empty())
        .map(ReturnSessionId::new);
    let view = state
        .orders(&session)
        .view(session.user().user_id, session_id)
        .await?;
    print_orders(view, state.config().payment.currency)
}

pub(crate) fn print_orders(
    view: swiftthrift_storefront::orders::OrderView,
    currency: CurrencyCode,
) -> Result<(), CliError> {
    if let Some(banner) = &view.banner {
        out(banner.title)?;
        out(banner.message)?;
        out(format_args!("Session ID: {}", banner.session_id))?;
        out("")?;
    }
    if view.orders.is_empty() {
        return out("You have no orders yet.");
    }
    for order in view.orders {
        let placed = order
            .created_at
            .map_or_else(|| "N/A".to_string(), |at| at.format("%Y-%m-%d %H:%M").to_string());
        out(format_args!(
            "Order #{} ({}) placed {} total {}",
            order.order_id,
            order.status.label(),
            placed,
            Price::new(order.total_price, currency)
        ))?;
        for item in order.items {
            out(format_args!(
                "    {:<40} {:>12}",
                item.product_name.as_deref().unwrap_or("-"),
                Price::new(item.subtotal, currency).to_string()
            ))?;
        }
    }
    Ok(())
}
