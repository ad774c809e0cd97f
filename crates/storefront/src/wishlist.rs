//! Saved products.

use swiftthrift_core::{ProductId, User, UserId, Wishlist, WishlistItem, WishlistItemId};
use tracing::{debug, info, instrument};

use crate::api::BackendClient;
use crate::error::ClientError;
use crate::events::{EventBus, StoreEvent};

/// Result of [`WishlistService::toggle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WishlistToggle {
    /// Whether the product is now saved.
    pub added: bool,
    /// The wishlist as the backend reports it after the change.
    pub items: Vec<WishlistItem>,
}

/// Wishlist operations for a signed-in user.
///
/// Every acknowledged write publishes `WishlistChanged` and is followed by a
/// full refetch of the item list; local membership is never updated
/// optimistically.
#[derive(Debug, Clone)]
pub struct WishlistService {
    client: BackendClient,
    events: EventBus,
}

impl WishlistService {
    #[must_use]
    pub const fn new(client: BackendClient, events: EventBus) -> Self {
        Self { client, events }
    }

    /// The user's wishlist, if one exists. The first one wins when the
    /// backend returns several.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Remote` if the lookup fails.
    pub async fn find(&self, user_id: UserId) -> Result<Option<Wishlist>, ClientError> {
        let wishlists = self.client.wishlists_by_user(user_id).await?;
        Ok(wishlists.into_iter().next())
    }

    /// Find the user's wishlist, creating it on first use.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Remote` if the lookup fails and
    /// `ClientError::RemoteWrite` if creation is refused.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn resolve(&self, user_id: UserId) -> Result<Wishlist, ClientError> {
        if let Some(wishlist) = self.find(user_id).await? {
            debug!(wishlist_id = %wishlist.wishlist_id, "Wishlist found");
            return Ok(wishlist);
        }
        let wishlist = self
            .client
            .create_wishlist(user_id)
            .await
            .map_err(ClientError::RemoteWrite)?;
        info!(wishlist_id = %wishlist.wishlist_id, "Created wishlist");
        Ok(wishlist)
    }

    /// Items on the user's wishlist; empty when they have none yet.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Remote` if the backend cannot be reached.
    #[instrument(skip(self, user), fields(user_id = %user.user_id))]
    pub async fn items(&self, user: &User) -> Result<Vec<WishlistItem>, ClientError> {
        match self.find(user.user_id).await? {
            Some(wishlist) => Ok(self.client.wishlist_items(wishlist.wishlist_id).await?),
            None => Ok(Vec::new()),
        }
    }

    /// Save the product if it is not on the wishlist, remove it otherwise.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Remote` for failed reads and
    /// `ClientError::RemoteWrite` for refused writes.
    #[instrument(skip(self, user), fields(user_id = %user.user_id, product_id = %product_id))]
    pub async fn toggle(
        &self,
        user: &User,
        product_id: ProductId,
    ) -> Result<WishlistToggle, ClientError> {
        let wishlist = self.resolve(user.user_id).await?;
        let current = self.client.wishlist_items(wishlist.wishlist_id).await?;

        let added = match current.iter().find(|item| item.product_id == product_id) {
            Some(existing) => {
                self.client
                    .delete_wishlist_item(existing.wishlist_item_id)
                    .await
                    .map_err(ClientError::RemoteWrite)?;
                false
            }
            None => {
                self.client
                    .create_wishlist_item(wishlist.wishlist_id, product_id)
                    .await
                    .map_err(ClientError::RemoteWrite)?;
                true
            }
        };
        self.events.publish(StoreEvent::WishlistChanged {
            wishlist_id: wishlist.wishlist_id,
        });
        info!(added, "Wishlist toggled");

        let items = self.client.wishlist_items(wishlist.wishlist_id).await?;
        Ok(WishlistToggle { added, items })
    }

    /// Remove one item by id and return the refetched list.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::RemoteWrite` if the delete is refused.
    #[instrument(skip(self, user), fields(user_id = %user.user_id, wishlist_item_id = %wishlist_item_id))]
    pub async fn remove(
        &self,
        user: &User,
        wishlist_item_id: WishlistItemId,
    ) -> Result<Vec<WishlistItem>, ClientError> {
        let wishlist = self.find(user.user_id).await?;
        self.client
            .delete_wishlist_item(wishlist_item_id)
            .await
            .map_err(ClientError::RemoteWrite)?;

        let Some(wishlist) = wishlist else {
            return Ok(Vec::new());
        };
        self.events.publish(StoreEvent::WishlistChanged {
            wishlist_id: wishlist.wishlist_id,
        });
        Ok(self.client.wishlist_items(wishlist.wishlist_id).await?)
    }
}
