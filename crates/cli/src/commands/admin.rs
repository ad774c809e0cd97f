//! Admin console commands.
//!
//! # Usage
//!
//! ```bash
//! swiftthrift admin orders
//! swiftthrift admin add-category "Outerwear"
//! swiftthrift admin add-product -n "Denim jacket" -d "Barely worn" -p 150 -c 2 -i front.jpg
//! ```
//!
//! # Environment Variables
//!
//! - `SWIFTTHRIFT_ADMIN_USERNAME` - Admin username
//! - `SWIFTTHRIFT_ADMIN_PASSWORD` - Admin password

use std::path::PathBuf;

use swiftthrift_admin::catalog::{ItemCondition, ProductForm};
use swiftthrift_admin::client::ImageUpload;
use swiftthrift_admin::{AdminConsole, AdminCredentials};
use swiftthrift_core::{CategoryId, Price};
use swiftthrift_storefront::{ClientError, Storefront};

use super::{CliError, out};

pub struct ProductArgs {
    pub name: String,
    pub description: String,
    pub price: String,
    pub condition: String,
    pub category: CategoryId,
    pub images: Vec<PathBuf>,
}

async fn sign_in(state: &Storefront) -> Result<AdminConsole, CliError> {
    let credentials = AdminCredentials::from_env()?;
    let console =
        AdminConsole::sign_in(state.client().clone(), state.events().clone(), &credentials)
            .await?;
    tracing::info!(username = console.username(), "Admin console ready");
    Ok(console)
}

pub async fn paid_orders(state: &Storefront) -> Result<(), CliError> {
    let mut console = sign_in(state).await?;
    let board = console.refresh_paid_orders().await?;
    let currency = state.config().payment.currency;

    if board.orders().is_empty() {
        return out("No paid orders.");
    }
    for paid in board.orders() {
        let order = &paid.order;
        let user = order
            .user_id
            .map_or_else(|| "-".to_string(), |id| id.to_string());
        let placed = order
            .created_at
            .map_or_else(|| "N/A".to_string(), |at| at.format("%Y-%m-%d %H:%M").to_string());
        out(format_args!(
            "Order #{} user {} placed {} total {} ({})",
            order.order_id,
            user,
            placed,
            Price::new(order.total_price, currency),
            order.status.label()
        ))?;
    }
    Ok(())
}

pub async fn categories(state: &Storefront) -> Result<(), CliError> {
    let console = sign_in(state).await?;
    for category in console.categories().await? {
        out(format_args!("#{} {}", category.category_id, category.name))?;
    }
    Ok(())
}

pub async fn add_product(state: &Storefront, args: ProductArgs) -> Result<(), CliError> {
    let condition: ItemCondition = args
        .condition
        .parse()
        .map_err(|e: String| ClientError::Validation(format!("Invalid condition: {e}.")))?;
    let form = ProductForm {
        name: args.name,
        description: args.description,
        price: args.price,
        condition,
        category_id: Some(args.category),
    };
    // Check the form before signing in or reading any file.
    form.validate()?;

    let mut images = Vec::with_capacity(args.images.len());
    for path in &args.images {
        images.push(ImageUpload::from_path(path).await?);
    }

    let console = sign_in(state).await?;
    console.add_product(&form, images).await?;
    out("Product added successfully!")
}

pub async fn add_category(state: &Storefront, name: &str) -> Result<(), CliError> {
    let console = sign_in(state).await?;
    let categories = console.add_category(name).await?;
    out("Category added successfully!")?;
    for category in categories {
        out(format_args!("#{} {}", category.category_id, category.name))?;
    }
    Ok(())
}
