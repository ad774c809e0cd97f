//! Swiftthrift CLI - the marketplace client from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Log in (password is read from stdin)
//! swiftthrift login -e ana@mail.ph
//!
//! # Browse and fill the cart
//! swiftthrift products
//! swiftthrift cart add 3
//!
//! # Pay for selected cart lines, then handle the return
//! swiftthrift checkout --item 21 --item 22
//! swiftthrift listen
//!
//! # Admin console (credentials from SWIFTTHRIFT_ADMIN_*)
//! swiftthrift admin orders
//! ```
//!
//! # Commands
//!
//! - `login`, `signup`, `logout`, `whoami` - Account
//! - `products`, `categories` - Catalog
//! - `cart`, `wishlist`, `orders` - Shopping
//! - `checkout`, `return`, `listen` - Payment
//! - `admin` - Admin console

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use swiftthrift_core::{CartItemId, CategoryId, ProductId, WishlistItemId};
use swiftthrift_storefront::{ClientConfig, Storefront};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "swiftthrift")]
#[command(author, version, about = "Swiftthrift marketplace client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in; the password is read from stdin
    Login {
        #[arg(short, long)]
        email: String,
    },
    /// Create an account; password and confirmation are read from stdin
    Signup {
        #[arg(short, long)]
        email: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(short, long)]
        username: String,
        /// 11-digit phone number
        #[arg(short, long)]
        phone: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// List products that are still for sale
    Products {
        /// Only this category
        #[arg(short, long)]
        category: Option<CategoryId>,
    },
    /// List categories
    Categories,
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Show order history
    Orders {
        /// Session id from a completed checkout
        #[arg(long)]
        session_id: Option<String>,
    },
    /// Pay for selected cart lines through the hosted checkout
    Checkout {
        /// Cart item to pay for (repeatable)
        #[arg(short, long = "item")]
        items: Vec<CartItemId>,
        /// Pay for every line in the cart
        #[arg(short, long, conflicts_with = "items")]
        all: bool,
    },
    /// Handle the URL the hosted checkout sent the browser back to
    Return { url: url::Url },
    /// Run the local payment return listener
    Listen,
    /// Admin console
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart lines
    Show,
    /// Add a product at its current price
    Add { product_id: ProductId },
    /// Remove a cart line
    Remove { cart_item_id: CartItemId },
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Show saved products
    Show,
    /// Save a product, or remove it if already saved
    Toggle { product_id: ProductId },
    /// Remove a wishlist item
    Remove { wishlist_item_id: WishlistItemId },
}

#[derive(Subcommand)]
enum AdminAction {
    /// List paid orders
    Orders,
    /// List categories
    Categories,
    /// Add a product
    AddProduct {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        description: String,
        #[arg(short, long)]
        price: String,
        /// `new` or `used`
        #[arg(long, default_value = "new")]
        condition: String,
        #[arg(short, long)]
        category: CategoryId,
        /// Image file to upload (repeatable)
        #[arg(short, long = "image")]
        images: Vec<std::path::PathBuf>,
    },
    /// Add a category
    AddCategory { name: String },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => fail(&format!("Configuration error: {e}")),
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "swiftthrift=info,warn".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let state = Storefront::new(config);

    if let Err(e) = run(cli, &state).await {
        let message = e.report();
        fail(&message);
    }
}

fn fail(message: &str) -> ! {
    let _ = writeln!(std::io::stderr(), "{message}");
    std::process::exit(1);
}

async fn run(cli: Cli, state: &Storefront) -> Result<(), CliError> {
    match cli.command {
        Commands::Login { email } => commands::account::login(state, &email).await,
        Commands::Signup {
            email,
            first_name,
            last_name,
            username,
            phone,
        } => {
            commands::account::signup(
                state,
                commands::account::SignupArgs {
                    email,
                    first_name,
                    last_name,
                    username,
                    phone,
                },
            )
            .await
        }
        Commands::Logout => commands::account::logout(state),
        Commands::Whoami => commands::account::whoami(state),
        Commands::Products { category } => commands::shop::products(state, category).await,
        Commands::Categories => commands::shop::categories(state).await,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::shop::cart_show(state).await,
            CartAction::Add { product_id } => commands::shop::cart_add(state, product_id).await,
            CartAction::Remove { cart_item_id } => {
                commands::shop::cart_remove(state, cart_item_id).await
            }
        },
        Commands::Wishlist { action } => match action {
            WishlistAction::Show => commands::shop::wishlist_show(state).await,
            WishlistAction::Toggle { product_id } => {
                commands::shop::wishlist_toggle(state, product_id).await
            }
            WishlistAction::Remove { wishlist_item_id } => {
                commands::shop::wishlist_remove(state, wishlist_item_id).await
            }
        },
        Commands::Orders { session_id } => commands::shop::orders(state, session_id).await,
        Commands::Checkout { items, all } => commands::pay::checkout(state, &items, all).await,
        Commands::Return { url } => commands::pay::handle_return(state, &url).await,
        Commands::Listen => commands::pay::listen(state).await,
        Commands::Admin { action } => match action {
            AdminAction::Orders => commands::admin::paid_orders(state).await,
            AdminAction::Categories => commands::admin::categories(state).await,
            AdminAction::AddProduct {
                name,
                description,
                price,
                condition,
                category,
                images,
            } => {
                commands::admin::add_product(
                    state,
                    commands::admin::ProductArgs {
                        name,
                        description,
                        price,
                        condition,
                        category,
                        images,
                    },
                )
                .await
            }
            AdminAction::AddCategory { name } => commands::admin::add_category(state, &name).await,
        },
    }
}
