//! Locate or create the single cart a user owns.

use swiftthrift_core::{Cart, UserId};
use tracing::{debug, error, info, instrument, warn};

use crate::api::BackendClient;
use crate::error::CartResolutionError;

/// Finds a user's cart, creating it on first use.
///
/// The backend is supposed to keep one cart per user but its direct lookup
/// is unreliable, so resolution runs three steps and stops at the first hit:
///
/// 1. `GET cart/byUser/{id}`; absence, failure or a cart without an id all
///    fall through.
/// 2. `GET cart/all`, searched for a cart owned by the user.
/// 3. `POST cart/create` with a zero total.
///
/// A create is only ever sent when both lookups came up empty. If the
/// backend then answers that the user already has a cart, the state is
/// inconsistent and resolution fails with
/// [`CartResolutionError::CartExistsButUnreachable`]. That error is terminal
/// and is never retried.
#[derive(Debug, Clone)]
pub struct CartResolver {
    client: BackendClient,
}

impl CartResolver {
    #[must_use]
    pub const fn new(client: BackendClient) -> Self {
        Self { client }
    }

    /// Resolve the user's cart.
    ///
    /// # Errors
    ///
    /// - `Lookup` if the all-carts fallback request fails
    /// - `Create` if creation fails for any reason but a duplicate
    /// - `CartExistsButUnreachable` if the backend refuses creation because a
    ///   cart exists that neither lookup found
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn resolve(&self, user_id: UserId) -> Result<Cart, CartResolutionError> {
        match self.client.cart_by_user(user_id).await {
            Ok(Some(contents)) => {
                debug!(cart_id = %contents.cart.cart_id, "Cart found by direct lookup");
                return Ok(contents.cart);
            }
            Ok(None) => debug!("No usable cart from direct lookup"),
            Err(e) => warn!(error = %e, "Direct cart lookup failed"),
        }

        warn!("Falling back to searching all carts");
        if let Some(contents) = self
            .client
            .find_cart_in_all(user_id)
            .await
            .map_err(CartResolutionError::Lookup)?
        {
            debug!(cart_id = %contents.cart.cart_id, "Cart found in all-carts listing");
            return Ok(contents.cart);
        }

        match self.client.create_cart(user_id).await {
            Ok(cart) => {
                info!(cart_id = %cart.cart_id, "Created cart");
                Ok(cart)
            }
            Err(e) if e.is_cart_already_exists() => {
                error!("Backend reports an existing cart that cannot be located");
                Err(CartResolutionError::CartExistsButUnreachable { user_id })
            }
            Err(e) => Err(CartResolutionError::Create(e)),
        }
    }
}
