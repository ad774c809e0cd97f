//! End-to-end scenarios for the Swiftthrift client.
//!
//! Every scenario runs the real storefront and admin workflows against a
//! [`wiremock`] server standing in for the marketplace backend, so no live
//! services are needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p swiftthrift-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `checkout_flow` - cart, selection, hosted checkout and return
//! - `cart_resolution` - the find-or-create cart contract
//! - `wishlist_toggle` - wishlist add and remove round trip
//! - `admin_paid_orders` - admin sign-in and paid order aggregation

#![allow(clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use swiftthrift_core::{User, UserId, UserRole};
use swiftthrift_storefront::session::MemorySessionStore;
use swiftthrift_storefront::{ClientConfig, SessionContext, Storefront};
use wiremock::MockServer;

/// Bearer token handed out by the mocked login.
pub const TOKEN: &str = "tok-e2e";

/// Publishable key configured for the hosted checkout.
pub const PUBLIC_KEY: &str = "pk_test_e2e";

/// A mocked backend plus a storefront pointed at it.
pub struct TestContext {
    pub server: MockServer,
    pub storefront: Storefront,
}

impl TestContext {
    /// Start a backend and a storefront with `customer()` already logged in.
    pub async fn signed_in() -> Self {
        let server = MockServer::start().await;
        let session = SessionContext::new(SecretString::from(TOKEN.to_string()), customer());
        let storefront = Storefront::with_store(
            config(&server),
            Arc::new(MemorySessionStore::with_session(&session)),
        );
        Self { server, storefront }
    }

    /// Start a backend and a storefront nobody is logged in to.
    pub async fn signed_out() -> Self {
        let server = MockServer::start().await;
        let storefront =
            Storefront::with_store(config(&server), Arc::new(MemorySessionStore::new()));
        Self { server, storefront }
    }

    /// The session of the logged-in customer.
    pub fn session(&self) -> SessionContext {
        self.storefront
            .session()
            .expect("scenario expects a logged-in customer")
    }
}

/// Client configuration for a backend served at `{server}/api`.
pub fn config(server: &MockServer) -> ClientConfig {
    let vars: HashMap<&str, String> = HashMap::from([
        ("SWIFTTHRIFT_API_URL", format!("{}/api", server.uri())),
        ("SWIFTTHRIFT_CURRENCY", "php".to_string()),
        ("SWIFTTHRIFT_PAYMENT_PUBLIC_KEY", PUBLIC_KEY.to_string()),
    ]);
    ClientConfig::from_lookup(|key| vars.get(key).cloned()).expect("valid test configuration")
}

/// The shopper every scenario logs in as.
pub fn customer() -> User {
    User {
        user_id: UserId::new(5),
        email: "ana@mail.ph".to_string(),
        username: "ana".to_string(),
        role: UserRole::Customer,
    }
}

/// Poll `check` until it holds, for changes applied by background tasks
/// such as the catalog watcher. Panics after two seconds.
pub async fn eventually<F, Fut>(mut check: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    tokio::time::timeout(Duration::from_secs(2), async {
        while !check().await {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("condition never held");
}
