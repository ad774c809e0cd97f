//! Shared client state and the per-session service constructors.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::api::BackendClient;
use crate::auth::AuthService;
use crate::cart::CartService;
use crate::catalog::Catalog;
use crate::checkout::{CheckoutCoordinator, HostedCheckoutRedirector};
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::events::EventBus;
use crate::orders::OrderHistory;
use crate::session::{FileSessionStore, SessionContext, SessionStore, require_session};
use crate::wishlist::WishlistService;

/// Everything the workflows share: configuration, the anonymous backend
/// client, the event bus and the session store.
///
/// Cheaply cloneable via `Arc`; also used as the router state of the
/// payment return listener.
#[derive(Clone)]
pub struct Storefront {
    inner: Arc<StorefrontInner>,
}

struct StorefrontInner {
    config: ClientConfig,
    client: BackendClient,
    events: EventBus,
    store: Arc<dyn SessionStore>,
    catalog_watcher: Option<JoinHandle<()>>,
}

impl Drop for StorefrontInner {
    fn drop(&mut self) {
        if let Some(watcher) = self.catalog_watcher.take() {
            watcher.abort();
        }
    }
}

impl std::fmt::Debug for Storefront {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storefront")
            .field("base_url", &self.inner.client.base_url().as_str())
            .finish_non_exhaustive()
    }
}

impl Storefront {
    /// State backed by the session file named in `config`.
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        let store = Arc::new(FileSessionStore::new(config.session_file.clone()));
        Self::with_store(config, store)
    }

    /// State backed by an explicit session store.
    ///
    /// When called inside a Tokio runtime this also starts the catalog
    /// watcher, so a `ProductsChanged` published on [`Self::events`] drops
    /// the cached listings. Outside a runtime the cache only expires by TTL.
    #[must_use]
    pub fn with_store(config: ClientConfig, store: Arc<dyn SessionStore>) -> Self {
        let client = BackendClient::new(&config.api);
        let events = EventBus::new();
        let catalog_watcher = if Handle::try_current().is_ok() {
            Some(Catalog::new(client.clone()).watch(&events))
        } else {
            debug!("No runtime, catalog watcher not started");
            None
        };
        Self {
            inner: Arc::new(StorefrontInner {
                config,
                client,
                events,
                store,
                catalog_watcher,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// The client without credentials, for public endpoints.
    #[must_use]
    pub fn client(&self) -> &BackendClient {
        &self.inner.client
    }

    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.inner.events
    }

    #[must_use]
    pub fn store(&self) -> Arc<dyn SessionStore> {
        Arc::clone(&self.inner.store)
    }

    /// The stored session, or `Unauthenticated`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Unauthenticated` when nobody is logged in.
    pub fn session(&self) -> Result<SessionContext, ClientError> {
        require_session(self.inner.store.as_ref())
    }

    /// A client that sends the session's bearer token.
    #[must_use]
    pub fn client_for(&self, session: &SessionContext) -> BackendClient {
        self.inner.client.with_bearer(SecretString::from(
            session.token().expose_secret().to_owned(),
        ))
    }

    #[must_use]
    pub fn auth(&self) -> AuthService {
        AuthService::new(self.inner.client.clone(), self.store())
    }

    #[must_use]
    pub fn catalog(&self) -> Catalog {
        Catalog::new(self.inner.client.clone())
    }

    #[must_use]
    pub fn cart(&self, session: &SessionContext) -> CartService {
        CartService::new(self.client_for(session), self.inner.events.clone())
    }

    #[must_use]
    pub fn wishlist(&self, session: &SessionContext) -> WishlistService {
        WishlistService::new(self.client_for(session), self.inner.events.clone())
    }

    #[must_use]
    pub fn orders(&self, session: &SessionContext) -> OrderHistory {
        OrderHistory::new(self.client_for(session))
    }

    #[must_use]
    pub fn checkout(
        &self,
        session: &SessionContext,
    ) -> CheckoutCoordinator<HostedCheckoutRedirector> {
        CheckoutCoordinator::new(
            self.client_for(session),
            HostedCheckoutRedirector::from_config(&self.inner.config.payment),
            self.inner.config.payment.currency,
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use std::time::Duration;

    use super::*;
    use crate::events::StoreEvent;
    use crate::session::MemorySessionStore;
    use swiftthrift_core::{User, UserId, UserRole};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(api_url: &str) -> ClientConfig {
        let vars: HashMap<&str, &str> = HashMap::from([("SWIFTTHRIFT_API_URL", api_url)]);
        ClientConfig::from_lookup(|key| vars.get(key).map(|v| (*v).to_string())).unwrap()
    }

    fn config() -> ClientConfig {
        config_for("http://127.0.0.1:9/api")
    }

    #[test]
    fn test_session_required() {
        let state = Storefront::with_store(config(), Arc::new(MemorySessionStore::new()));
        assert!(matches!(state.session(), Err(ClientError::Unauthenticated)));
    }

    #[test]
    fn test_session_loaded_from_store() {
        let session = SessionContext::new(
            SecretString::from("tok-1".to_string()),
            User {
                user_id: UserId::new(5),
                email: "ana@mail.ph".to_string(),
                username: "ana".to_string(),
                role: UserRole::Customer,
            },
        );
        let store = Arc::new(MemorySessionStore::with_session(&session));
        let state = Storefront::with_store(config(), store);
        assert_eq!(state.session().unwrap().user().user_id, UserId::new(5));
    }

    #[tokio::test]
    async fn test_products_changed_refreshes_catalog() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products/all"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "productId": 1, "name": "Jacket", "price": 150.0 }
            ])))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/products/all"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "productId": 1, "name": "Jacket", "price": 150.0 },
                { "productId": 2, "name": "Scarf", "price": 80.0 }
            ])))
            .mount(&server)
            .await;

        let state = Storefront::with_store(
            config_for(&format!("{}/api", server.uri())),
            Arc::new(MemorySessionStore::new()),
        );
        let catalog = state.catalog();
        assert_eq!(catalog.products().await.unwrap().len(), 1);
        assert_eq!(catalog.products().await.unwrap().len(), 1);

        state.events().publish(StoreEvent::ProductsChanged);
        tokio::time::timeout(Duration::from_secs(2), async {
            while catalog.products().await.unwrap().len() != 2 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();
    }
}
