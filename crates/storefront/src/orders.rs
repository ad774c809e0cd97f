//! A customer's order history.

use serde::Serialize;
use swiftthrift_core::{Order, ReturnSessionId, UserId};
use tracing::{instrument, warn};

use crate::api::BackendClient;
use crate::error::ClientError;

/// Shown instead of orders when the listing cannot be loaded.
pub const ORDERS_UNAVAILABLE_MESSAGE: &str = "Failed to load orders. Please try again later.";

/// Banner shown after returning from the hosted checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuccessBanner {
    pub title: &'static str,
    pub message: &'static str,
    pub session_id: ReturnSessionId,
}

impl SuccessBanner {
    #[must_use]
    pub const fn new(session_id: ReturnSessionId) -> Self {
        Self {
            title: "Payment Successful!",
            message: "Your order has been placed successfully. Thank you for your purchase!",
            session_id,
        }
    }
}

/// What the order page shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderView {
    pub orders: Vec<Order>,
    pub banner: Option<SuccessBanner>,
}

/// Loads order history for display.
#[derive(Debug, Clone)]
pub struct OrderHistory {
    client: BackendClient,
}

impl OrderHistory {
    #[must_use]
    pub const fn new(client: BackendClient) -> Self {
        Self { client }
    }

    /// Orders for `user_id`, plus a success banner when the page was
    /// reached with a checkout session id.
    ///
    /// The session id is only a correlation token; it is not checked
    /// against the orders.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Remote` if the orders cannot be loaded.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn view(
        &self,
        user_id: UserId,
        session_id: Option<ReturnSessionId>,
    ) -> Result<OrderView, ClientError> {
        let orders = self.client.orders_by_user(user_id).await.inspect_err(|e| {
            warn!(error = %e, "Failed to load orders");
        })?;
        Ok(OrderView {
            orders,
            banner: session_id.map(SuccessBanner::new),
        })
    }
}
