//! The signed-in admin console.

use swiftthrift_core::Category;
use swiftthrift_storefront::catalog::Catalog;
use swiftthrift_storefront::error::add_breadcrumb;
use swiftthrift_storefront::{BackendClient, ClientError, EventBus, StoreEvent};
use tracing::{info, instrument};

use crate::catalog::{ProductForm, validate_category_name};
use crate::client::{AdminClient, ImageUpload};
use crate::config::AdminCredentials;
use crate::error::AdminError;
use crate::orders::PaidOrderBoard;

/// Admin operations. Only obtainable through [`AdminConsole::sign_in`].
#[derive(Debug)]
pub struct AdminConsole {
    client: AdminClient,
    catalog: Catalog,
    events: EventBus,
    username: String,
    paid_orders: PaidOrderBoard,
}

impl AdminConsole {
    /// Sign in with admin credentials.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::SignInFailed` if the backend rejects them and
    /// `ClientError::Validation` if either is blank.
    #[instrument(skip(client, events, credentials), fields(username = %credentials.username))]
    pub async fn sign_in(
        client: BackendClient,
        events: EventBus,
        credentials: &AdminCredentials,
    ) -> Result<Self, AdminError> {
        let username = credentials.username.trim();
        if username.is_empty() {
            return Err(ClientError::Validation("Username is required.".to_string()).into());
        }

        let client = AdminClient::new(client);
        client
            .login(username, &credentials.password)
            .await
            .map_err(AdminError::SignInFailed)?;
        info!("Admin signed in");
        sentry::configure_scope(|scope| scope.set_tag("admin_user", username));

        Ok(Self {
            catalog: Catalog::new(client.backend().clone()),
            client,
            events,
            username: username.to_string(),
            paid_orders: PaidOrderBoard::new(),
        })
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Validate and create a product, then publish `ProductsChanged`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Validation` for an incomplete form and
    /// `ClientError::RemoteWrite` if the backend rejects it.
    #[instrument(skip(self, form, images))]
    pub async fn add_product(
        &self,
        form: &ProductForm,
        images: Vec<ImageUpload>,
    ) -> Result<(), AdminError> {
        let payload = form.validate()?;
        self.client
            .create_product(&payload, images)
            .await
            .map_err(ClientError::RemoteWrite)?;

        self.events.publish(StoreEvent::ProductsChanged);
        add_breadcrumb("admin", "Product created", &[("name", payload.name.clone())]);
        info!(name = %payload.name, "Product created");
        Ok(())
    }

    /// Create a category, publish `ProductsChanged` and return the category
    /// list as the backend now reports it.
    ///
    /// Cached listings are left to the catalog watcher.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Validation` for a blank name,
    /// `ClientError::RemoteWrite` if the backend rejects it and
    /// `ClientError::Remote` if the list cannot be reloaded.
    #[instrument(skip(self))]
    pub async fn add_category(&self, name: &str) -> Result<Vec<Category>, AdminError> {
        let name = validate_category_name(name)?;
        self.client
            .create_category(name)
            .await
            .map_err(ClientError::RemoteWrite)?;
        info!(name, "Category created");

        self.events.publish(StoreEvent::ProductsChanged);
        let categories = self
            .client
            .backend()
            .fetch_categories()
            .await
            .map_err(ClientError::Remote)?;
        Ok(categories)
    }

    /// Categories to choose from when adding a product.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Remote` if the list cannot be loaded.
    pub async fn categories(&self) -> Result<Vec<Category>, AdminError> {
        Ok(self.catalog.categories().await?)
    }

    /// Reload the paid-order listing.
    ///
    /// # Errors
    ///
    /// Returns an error if `orders/all` fails; the previous listing is kept.
    pub async fn refresh_paid_orders(&mut self) -> Result<&PaidOrderBoard, AdminError> {
        self.paid_orders.refresh(&self.client).await?;
        Ok(&self.paid_orders)
    }

    #[must_use]
    pub const fn paid_orders(&self) -> &PaidOrderBoard {
        &self.paid_orders
    }
}
