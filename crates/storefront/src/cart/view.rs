//! A user's cart lines plus their checkout selection, kept current by
//! `CartChanged` events.

use swiftthrift_core::{CartId, UserId};
use tokio::sync::broadcast::Receiver;
use tokio::sync::broadcast::error::TryRecvError;
use tracing::{debug, instrument};

use super::CartService;
use crate::error::ClientError;
use crate::events::StoreEvent;
use crate::selection::SelectionLedger;

/// Loaded cart lines with a [`SelectionLedger`] over them.
///
/// The view subscribes to the event bus when it is created. A
/// `CartChanged` for this cart (or any cart, before one is known) marks it
/// stale, and the next [`CartView::refresh`] reloads the lines. Selections
/// of lines that are gone after a reload are dropped.
#[derive(Debug)]
pub struct CartView {
    cart: CartService,
    user_id: UserId,
    events: Receiver<StoreEvent>,
    cart_id: Option<CartId>,
    selection: SelectionLedger,
    stale: bool,
}

impl CartView {
    pub(super) fn new(cart: CartService, user_id: UserId, events: Receiver<StoreEvent>) -> Self {
        Self {
            cart,
            user_id,
            events,
            cart_id: None,
            selection: SelectionLedger::default(),
            stale: true,
        }
    }

    /// Reload the cart if it changed since the last refresh.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Remote` if the reload fails. The previous lines
    /// and selection are kept and the next refresh tries again.
    #[instrument(skip(self), fields(user_id = %self.user_id))]
    pub async fn refresh(&mut self) -> Result<&SelectionLedger, ClientError> {
        self.drain_events();
        if !self.stale {
            return Ok(&self.selection);
        }

        let contents = self.cart.load(self.user_id).await?;
        self.cart_id = contents.as_ref().map(|c| c.cart.cart_id);
        self.selection
            .replace_items(contents.map(|c| c.items).unwrap_or_default());
        self.stale = false;
        debug!(lines = self.selection.items().len(), "Cart view reloaded");
        Ok(&self.selection)
    }

    fn drain_events(&mut self) {
        loop {
            match self.events.try_recv() {
                Ok(StoreEvent::CartChanged { cart_id }) => {
                    if self.cart_id.is_none_or(|known| known == cart_id) {
                        self.stale = true;
                    }
                }
                Ok(_) => {}
                Err(TryRecvError::Lagged(skipped)) => {
                    debug!(skipped, "Cart view lagged, reloading");
                    self.stale = true;
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
    }

    /// The cart the lines belong to, once loaded.
    #[must_use]
    pub const fn cart_id(&self) -> Option<CartId> {
        self.cart_id
    }

    #[must_use]
    pub const fn selection(&self) -> &SelectionLedger {
        &self.selection
    }

    pub const fn selection_mut(&mut self) -> &mut SelectionLedger {
        &mut self.selection
    }
}
