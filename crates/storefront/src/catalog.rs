//! Product and category browsing.

use swiftthrift_core::{Category, CategoryId, Product, ProductId};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::api::BackendClient;
use crate::error::ClientError;
use crate::events::{EventBus, StoreEvent};

/// Read access to the catalog, served from the client's cache.
#[derive(Debug, Clone)]
pub struct Catalog {
    client: BackendClient,
}

impl Catalog {
    #[must_use]
    pub const fn new(client: BackendClient) -> Self {
        Self { client }
    }

    /// All listed products.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Remote` if the backend cannot be reached.
    pub async fn products(&self) -> Result<Vec<Product>, ClientError> {
        Ok(self.client.products().await?)
    }

    /// Products that are still for sale, optionally limited to one category.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Remote` if the backend cannot be reached.
    pub async fn available(
        &self,
        category: Option<CategoryId>,
    ) -> Result<Vec<Product>, ClientError> {
        let products = self.products().await?;
        Ok(products
            .into_iter()
            .filter(|product| !product.is_sold)
            .filter(|product| {
                category.is_none_or(|wanted| {
                    product
                        .category
                        .as_ref()
                        .is_some_and(|c| c.category_id == wanted)
                })
            })
            .collect())
    }

    /// Look up one product by id.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Validation` if no such product is listed.
    pub async fn product(&self, product_id: ProductId) -> Result<Product, ClientError> {
        self.products()
            .await?
            .into_iter()
            .find(|product| product.product_id == product_id)
            .ok_or_else(|| ClientError::Validation(format!("Product {product_id} not found.")))
    }

    /// All categories.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Remote` if the backend cannot be reached.
    pub async fn categories(&self) -> Result<Vec<Category>, ClientError> {
        Ok(self.client.categories().await?)
    }

    /// Invalidate the cache whenever `ProductsChanged` is published.
    ///
    /// The task ends when every sender of the bus is dropped.
    #[must_use]
    pub fn watch(&self, events: &EventBus) -> JoinHandle<()> {
        let client = self.client.clone();
        let mut rx = events.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(StoreEvent::ProductsChanged) => client.invalidate_catalog().await,
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        // A missed ProductsChanged would leave stale data.
                        warn!(skipped, "Catalog watcher lagged, invalidating");
                        client.invalidate_catalog().await;
                    }
                    Err(RecvError::Closed) => {
                        debug!("Event bus closed, catalog watcher stopping");
                        break;
                    }
                }
            }
        })
    }
}
