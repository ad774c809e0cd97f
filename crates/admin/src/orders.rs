//! Paid-order listing.
//!
//! The backend has no "paid orders" endpoint. The listing is assembled from
//! `GET orders/all` plus one `GET payments/user/{id}` per order, fanned out
//! concurrently. An order is kept only if its owner's payments include a
//! `PAID` payment for that order. A failed payment lookup drops that one
//! order; it never fails the listing.

use futures::future::join_all;
use swiftthrift_core::{Order, PaidOrder, Payment};
use tracing::{info, instrument, warn};

use crate::client::AdminClient;
use crate::error::AdminError;

/// Shown when the order listing itself cannot be loaded.
pub const PAID_ORDERS_UNAVAILABLE_MESSAGE: &str = "Failed to load orders. Please try again.";

/// Load every order that has a matching paid payment, in backend order.
///
/// # Errors
///
/// Returns an error only if `orders/all` fails.
#[instrument(skip(client))]
pub async fn paid_orders(client: &AdminClient) -> Result<Vec<PaidOrder>, AdminError> {
    let orders = client.all_orders().await?;
    let total = orders.len();

    let lookups = orders.into_iter().map(|order| async move {
        let payment = paid_payment_for(client, &order).await;
        payment.map(|payment| PaidOrder { order, payment })
    });
    let paid: Vec<PaidOrder> = join_all(lookups).await.into_iter().flatten().collect();

    info!(total, paid = paid.len(), "Paid orders loaded");
    Ok(paid)
}

async fn paid_payment_for(client: &AdminClient, order: &Order) -> Option<Payment> {
    let Some(user_id) = order.user_id else {
        warn!(order_id = %order.order_id, "Order has no user, skipping payment lookup");
        return None;
    };

    match client.payments_by_user(user_id).await {
        Ok(payments) => payments
            .into_iter()
            .find(|payment| payment.order_id == Some(order.order_id))
            .filter(|payment| payment.status.is_paid()),
        Err(e) => {
            warn!(order_id = %order.order_id, error = %e, "Payment lookup failed, skipping order");
            None
        }
    }
}

/// The admin's paid-order view, refreshed on demand.
#[derive(Debug, Default)]
pub struct PaidOrderBoard {
    orders: Vec<PaidOrder>,
    error: Option<String>,
}

impl PaidOrderBoard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reload the listing. On failure the previous orders are kept and the
    /// error message is recorded.
    ///
    /// # Errors
    ///
    /// Returns the listing error after reporting it.
    pub async fn refresh(&mut self, client: &AdminClient) -> Result<&[PaidOrder], AdminError> {
        match paid_orders(client).await {
            Ok(orders) => {
                self.orders = orders;
                self.error = None;
                Ok(&self.orders)
            }
            Err(e) => {
                e.report();
                self.error = Some(PAID_ORDERS_UNAVAILABLE_MESSAGE.to_string());
                Err(e)
            }
        }
    }

    #[must_use]
    pub fn orders(&self) -> &[PaidOrder] {
        &self.orders
    }

    /// Message from the last failed refresh, cleared by a successful one.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;
    use swiftthrift_core::OrderId;
    use swiftthrift_storefront::BackendClient;
    use swiftthrift_storefront::config::ApiConfig;
    use url::Url;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> AdminClient {
        AdminClient::new(BackendClient::new(&ApiConfig {
            base_url: Url::parse(&format!("{}/api", server.uri())).unwrap(),
            catalog_ttl: Duration::from_secs(300),
        }))
    }

    async fn mount_orders(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/api/orders/all"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "orderId": 1, "status": "PENDING", "totalPrice": 150.0, "user": { "userId": 10 } },
                { "orderId": 2, "status": "PENDING", "totalPrice": 20.0, "user": { "userId": 20 } },
                { "orderId": 3, "status": "PENDING", "totalPrice": 35.5, "user": { "userId": 30 } }
            ])))
            .mount(server)
            .await;
    }

    fn paid(order_id: i64) -> serde_json::Value {
        serde_json::json!([
            { "paymentId": order_id * 100, "status": "PAID", "amount": 1.0, "order": { "orderId": order_id } }
        ])
    }

    #[tokio::test]
    async fn test_failed_lookup_excludes_only_that_order() {
        let server = MockServer::start().await;
        mount_orders(&server).await;
        Mock::given(method("GET"))
            .and(path("/api/payments/user/10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(paid(1)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/payments/user/20"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/payments/user/30"))
            .respond_with(ResponseTemplate::new(200).set_body_json(paid(3)))
            .mount(&server)
            .await;

        let orders = paid_orders(&client(&server)).await.unwrap();
        let ids: Vec<OrderId> = orders.iter().map(|p| p.order.order_id).collect();
        assert_eq!(ids, vec![OrderId::new(1), OrderId::new(3)]);
        assert!(orders.iter().all(|p| p.payment.status.is_paid()));
    }

    #[tokio::test]
    async fn test_unpaid_and_unmatched_payments_excluded() {
        let server = MockServer::start().await;
        mount_orders(&server).await;
        Mock::given(method("GET"))
            .and(path("/api/payments/user/10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "paymentId": 1, "status": "PENDING", "order": { "orderId": 1 } }
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/payments/user/20"))
            .respond_with(ResponseTemplate::new(200).set_body_json(paid(99)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/payments/user/30"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let orders = paid_orders(&client(&server)).await.unwrap();
        assert!(orders.is_empty());
    }

    #[tokio::test]
    async fn test_board_keeps_previous_orders_on_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/orders/all"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "orderId": 1, "user": { "userId": 10 } }
            ])))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/orders/all"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/payments/user/10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(paid(1)))
            .mount(&server)
            .await;

        let client = client(&server);
        let mut board = PaidOrderBoard::new();
        assert_eq!(board.refresh(&client).await.unwrap().len(), 1);

        assert!(board.refresh(&client).await.is_err());
        assert_eq!(board.orders().len(), 1);
        assert_eq!(board.error(), Some(PAID_ORDERS_UNAVAILABLE_MESSAGE));
    }
}
