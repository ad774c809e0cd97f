//! Cart workflows: viewing, adding and removing items, and the selection
//! view that follows cart changes.

mod resolver;
mod view;

pub use resolver::CartResolver;
pub use view::CartView;

use rust_decimal::Decimal;
use swiftthrift_core::{CartContents, CartId, CartItemId, Product, ProductId, User, UserId};
use tracing::{info, instrument};

use crate::api::BackendClient;
use crate::error::{ClientError, add_breadcrumb};
use crate::events::{EventBus, StoreEvent};

/// What was written by [`CartService::add_to_cart`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddedToCart {
    pub cart_id: CartId,
    pub product_id: ProductId,
    /// The product's price at the moment it was added.
    pub price: Decimal,
}

/// Cart operations for a signed-in user.
#[derive(Debug, Clone)]
pub struct CartService {
    client: BackendClient,
    resolver: CartResolver,
    events: EventBus,
}

impl CartService {
    #[must_use]
    pub fn new(client: BackendClient, events: EventBus) -> Self {
        Self {
            resolver: CartResolver::new(client.clone()),
            client,
            events,
        }
    }

    /// The resolver used by [`Self::add_to_cart`].
    #[must_use]
    pub const fn resolver(&self) -> &CartResolver {
        &self.resolver
    }

    /// A view of the user's cart that reloads on `CartChanged`.
    ///
    /// Subscribes now, so changes published before the first
    /// [`CartView::refresh`] are not missed.
    #[must_use]
    pub fn view(&self, user_id: UserId) -> CartView {
        CartView::new(self.clone(), user_id, self.events.subscribe())
    }

    /// The user's cart and its lines; `None` when they have no cart yet.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Remote` if the backend cannot be reached.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn load(&self, user_id: UserId) -> Result<Option<CartContents>, ClientError> {
        Ok(self.client.cart_by_user(user_id).await?)
    }

    /// Put a product into the user's cart, creating the cart if needed.
    ///
    /// The line is written with the product's current price; later price
    /// changes do not touch it. `CartChanged` is published only after the
    /// backend acknowledges the write.
    ///
    /// # Errors
    ///
    /// - `Validation` if the product is already sold
    /// - `CartUnavailable` if no cart can be resolved
    /// - `RemoteWrite` if the item cannot be created
    #[instrument(skip(self, user, product), fields(user_id = %user.user_id, product_id = %product.product_id))]
    pub async fn add_to_cart(
        &self,
        user: &User,
        product: &Product,
    ) -> Result<AddedToCart, ClientError> {
        if product.is_sold {
            return Err(ClientError::Validation(format!(
                "{} has already been sold.",
                product.name
            )));
        }

        let cart = self.resolver.resolve(user.user_id).await?;
        let price = product.price;

        self.client
            .create_cart_item(cart.cart_id, product.product_id, price)
            .await
            .map_err(ClientError::RemoteWrite)?;

        self.events.publish(StoreEvent::CartChanged {
            cart_id: cart.cart_id,
        });
        add_breadcrumb(
            "cart",
            "Added item to cart",
            &[
                ("cart_id", cart.cart_id.to_string()),
                ("product_id", product.product_id.to_string()),
            ],
        );
        info!(cart_id = %cart.cart_id, %price, "Added item to cart");

        Ok(AddedToCart {
            cart_id: cart.cart_id,
            product_id: product.product_id,
            price,
        })
    }

    /// Remove one line from a cart.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::RemoteWrite` if the backend refuses.
    #[instrument(skip(self), fields(cart_id = %cart_id, cart_item_id = %cart_item_id))]
    pub async fn remove_item(
        &self,
        cart_id: CartId,
        cart_item_id: CartItemId,
    ) -> Result<(), ClientError> {
        self.client
            .delete_cart_item(cart_item_id)
            .await
            .map_err(ClientError::RemoteWrite)?;
        self.events.publish(StoreEvent::CartChanged { cart_id });
        Ok(())
    }
}
