//! [`BackendClient`]: one method per backend endpoint.

use std::sync::Arc;

use moka::future::Cache;
use reqwest::{Method, RequestBuilder, StatusCode};
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, instrument};
use url::Url;

use swiftthrift_core::{
    Cart, CartContents, CartId, CartItemId, Category, CurrencyCode, Email, MinorUnits, Order,
    Payment, PaymentSessionRef, Product, ProductId, User, UserId, Wishlist, WishlistId,
    WishlistItem, WishlistItemId,
};

use super::cache::{CacheKey, CacheValue};
use super::conversions::{
    cart_owner, convert_cart, convert_category, convert_order, convert_payment, convert_product,
    convert_user, convert_wishlist, convert_wishlist_items,
};
use super::types::{
    CartRef, CreateCartItemRequest, CreateCartRequest, CreatePaymentSessionRequest,
    CreatePaymentSessionResponse, CreateWishlistItemRequest, CreateWishlistRequest, LoginRequest,
    LoginResponse, ProductRef, SignupRequest, UserRef, WireCart, WireCategory, WireOrder,
    WirePayment, WireProduct, WireWishlist, WireWishlistItem, WishlistRef,
};
use super::{ApiError, extract_error_message};
use crate::config::ApiConfig;

/// Client for the Swiftthrift REST backend.
///
/// Cheap to clone; clones share the HTTP connection pool and the catalog
/// cache.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: Url,
    bearer: Option<SecretString>,
    cache: Cache<CacheKey, CacheValue>,
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("authenticated", &self.inner.bearer.is_some())
            .finish_non_exhaustive()
    }
}

impl BackendClient {
    /// Create an unauthenticated client.
    #[must_use]
    pub fn new(config: &ApiConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(16)
            .time_to_live(config.catalog_ttl)
            .build();

        Self {
            inner: Arc::new(BackendClientInner {
                client: reqwest::Client::new(),
                base_url: with_trailing_slash(config.base_url.clone()),
                bearer: None,
                cache,
            }),
        }
    }

    /// A client that sends `token` as a bearer credential.
    ///
    /// Shares the connection pool and catalog cache with `self`.
    #[must_use]
    pub fn with_bearer(&self, token: SecretString) -> Self {
        Self {
            inner: Arc::new(BackendClientInner {
                client: self.inner.client.clone(),
                base_url: self.inner.base_url.clone(),
                bearer: Some(token),
                cache: self.inner.cache.clone(),
            }),
        }
    }

    /// Backend base URL (always ends with `/`).
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    // =========================================================================
    // Transport
    // =========================================================================

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.inner.base_url.join(path.trim_start_matches('/'))?;
        let builder = self.inner.client.request(method, url);
        Ok(match &self.inner.bearer {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        })
    }

    async fn send(request: RequestBuilder) -> Result<(StatusCode, String), ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        Ok((status, body))
    }

    /// Send a request and return the body of a successful response.
    async fn execute(request: RequestBuilder) -> Result<String, ApiError> {
        let (status, body) = Self::send(request).await?;
        ensure_success(status, body)
    }

    /// `GET` a JSON resource.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or a body
    /// that does not parse as `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let body = Self::execute(self.request(Method::GET, path)?).await?;
        parse_body(&body)
    }

    /// `GET` a JSON resource that may not exist.
    ///
    /// A 404, an empty body or a literal `null` all read as `None`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, any other non-success status,
    /// or an unparseable body.
    pub async fn get_optional_json<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<T>, ApiError> {
        let (status, body) = Self::send(self.request(Method::GET, path)?).await?;
        if status == StatusCode::NOT_FOUND {
            debug!(path, "Resource not found");
            return Ok(None);
        }
        let body = ensure_success(status, body)?;
        let trimmed = body.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Ok(None);
        }
        parse_body(trimmed).map(Some)
    }

    /// `POST` a JSON body and parse the JSON response.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or an
    /// unparseable response.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = Self::execute(self.request(Method::POST, path)?.json(body)).await?;
        parse_body(&response)
    }

    /// `POST` a JSON body, ignoring whatever the backend answers.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    pub async fn post_json_discard<B>(&self, path: &str, body: &B) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        Self::execute(self.request(Method::POST, path)?.json(body)).await?;
        Ok(())
    }

    /// `POST` a multipart form, returning the raw response body.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    pub async fn post_multipart(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<String, ApiError> {
        Self::execute(self.request(Method::POST, path)?.multipart(form)).await
    }

    /// `DELETE` a resource.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        Self::execute(self.request(Method::DELETE, path)?).await?;
        Ok(())
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Log in with email and password, returning the issued token and user.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the credentials or the
    /// response lacks a token or user.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<(SecretString, User), ApiError> {
        let body = LoginRequest {
            email: email.as_str(),
            password: password.expose_secret(),
        };
        let response: LoginResponse = self.post_json("users/login", &body).await?;
        let token = response
            .token
            .filter(|token| !token.is_empty())
            .ok_or(ApiError::MissingField("token"))?;
        let user = response.user.ok_or(ApiError::MissingField("user"))?;
        Ok((SecretString::from(token), convert_user(user)))
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the signup.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn signup(&self, request: &SignupRequest) -> Result<(), ApiError> {
        self.post_json_discard("users/create", request).await
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// List all products. Cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Vec<Product>, ApiError> {
        if let Some(CacheValue::Products(products)) =
            self.inner.cache.get(&CacheKey::Products).await
        {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let wire: Vec<WireProduct> = self.get_json("products/all").await?;
        let products: Vec<Product> = wire
            .into_iter()
            .map(|product| convert_product(product, &self.inner.base_url))
            .collect();

        self.inner
            .cache
            .insert(CacheKey::Products, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// List all categories. Cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        if let Some(CacheValue::Categories(categories)) =
            self.inner.cache.get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let categories = self.fetch_categories().await?;
        self.inner
            .cache
            .insert(
                CacheKey::Categories,
                CacheValue::Categories(categories.clone()),
            )
            .await;

        Ok(categories)
    }

    /// List all categories straight from the backend, leaving the cache as is.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn fetch_categories(&self) -> Result<Vec<Category>, ApiError> {
        let wire: Vec<WireCategory> = self.get_json("categories/all").await?;
        Ok(wire.into_iter().map(convert_category).collect())
    }

    /// Drop cached catalog listings.
    pub async fn invalidate_catalog(&self) {
        self.inner.cache.invalidate(&CacheKey::Products).await;
        self.inner.cache.invalidate(&CacheKey::Categories).await;
        debug!("Catalog cache invalidated");
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Fetch the user's cart directly.
    ///
    /// `Ok(None)` when the backend has no cart for the user or returns one
    /// without a usable id.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn cart_by_user(&self, user_id: UserId) -> Result<Option<CartContents>, ApiError> {
        let cart: Option<WireCart> = self
            .get_optional_json(&format!("cart/byUser/{user_id}"))
            .await?;
        Ok(cart.and_then(|cart| convert_cart(cart, user_id)))
    }

    /// Search the full cart listing for one owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn find_cart_in_all(
        &self,
        user_id: UserId,
    ) -> Result<Option<CartContents>, ApiError> {
        let carts: Vec<WireCart> = self.get_json("cart/all").await?;
        Ok(carts
            .into_iter()
            .filter(|cart| cart_owner(cart) == Some(user_id))
            .find_map(|cart| convert_cart(cart, user_id)))
    }

    /// Create an empty cart for the user.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend refuses (see
    /// [`ApiError::is_cart_already_exists`]) or answers without a cart id.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn create_cart(&self, user_id: UserId) -> Result<Cart, ApiError> {
        let body = CreateCartRequest {
            user: UserRef {
                user_id: Some(user_id),
            },
            total_price: Decimal::ZERO,
        };
        let cart: WireCart = self.post_json("cart/create", &body).await?;
        convert_cart(cart, user_id)
            .map(|contents| contents.cart)
            .ok_or(ApiError::MissingField("cartId"))
    }

    /// Add a product to a cart at the given price.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    #[instrument(skip(self), fields(cart_id = %cart_id, product_id = %product_id))]
    pub async fn create_cart_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        price: Decimal,
    ) -> Result<(), ApiError> {
        let body = CreateCartItemRequest {
            price,
            cart: CartRef { cart_id },
            product: ProductRef { product_id },
        };
        self.post_json_discard("cartItem/create", &body).await
    }

    /// Remove a cart line.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(cart_item_id = %cart_item_id))]
    pub async fn delete_cart_item(&self, cart_item_id: CartItemId) -> Result<(), ApiError> {
        self.delete(&format!("cartItem/delete/{cart_item_id}")).await
    }

    // =========================================================================
    // Wishlist
    // =========================================================================

    /// List the user's wishlists (the backend keeps at most one in practice).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn wishlists_by_user(&self, user_id: UserId) -> Result<Vec<Wishlist>, ApiError> {
        let wishlists: Option<Vec<WireWishlist>> = self
            .get_optional_json(&format!("wishlist/byUser/{user_id}"))
            .await?;
        Ok(wishlists
            .unwrap_or_default()
            .into_iter()
            .filter_map(|wishlist| convert_wishlist(wishlist, user_id))
            .collect())
    }

    /// Create a wishlist for the user.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the response has no id.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn create_wishlist(&self, user_id: UserId) -> Result<Wishlist, ApiError> {
        let body = CreateWishlistRequest {
            user: UserRef {
                user_id: Some(user_id),
            },
        };
        let wishlist: WireWishlist = self.post_json("wishlist/create", &body).await?;
        convert_wishlist(wishlist, user_id).ok_or(ApiError::MissingField("wishlistId"))
    }

    /// List the items of a wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(wishlist_id = %wishlist_id))]
    pub async fn wishlist_items(
        &self,
        wishlist_id: WishlistId,
    ) -> Result<Vec<WishlistItem>, ApiError> {
        let items: Option<Vec<WireWishlistItem>> = self
            .get_optional_json(&format!("wishlistItems/wishlist/{wishlist_id}"))
            .await?;
        Ok(convert_wishlist_items(
            items.unwrap_or_default(),
            wishlist_id,
        ))
    }

    /// Save a product to a wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    #[instrument(skip(self), fields(wishlist_id = %wishlist_id, product_id = %product_id))]
    pub async fn create_wishlist_item(
        &self,
        wishlist_id: WishlistId,
        product_id: ProductId,
    ) -> Result<(), ApiError> {
        let body = CreateWishlistItemRequest {
            wishlist: WishlistRef { wishlist_id },
            product: ProductRef { product_id },
        };
        self.post_json_discard("wishlistItems/create", &body).await
    }

    /// Remove a wishlist item.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(wishlist_item_id = %wishlist_item_id))]
    pub async fn delete_wishlist_item(
        &self,
        wishlist_item_id: WishlistItemId,
    ) -> Result<(), ApiError> {
        self.delete(&format!("wishlistItems/{wishlist_item_id}"))
            .await
    }

    // =========================================================================
    // Orders & Payments
    // =========================================================================

    /// List a user's orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn orders_by_user(&self, user_id: UserId) -> Result<Vec<Order>, ApiError> {
        let orders: Option<Vec<WireOrder>> = self
            .get_optional_json(&format!("orders/byUser/{user_id}"))
            .await?;
        Ok(orders
            .unwrap_or_default()
            .into_iter()
            .map(convert_order)
            .collect())
    }

    /// List every order in the marketplace.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn all_orders(&self) -> Result<Vec<Order>, ApiError> {
        let orders: Vec<WireOrder> = self.get_json("orders/all").await?;
        Ok(orders.into_iter().map(convert_order).collect())
    }

    /// List a user's payments.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn payments_by_user(&self, user_id: UserId) -> Result<Vec<Payment>, ApiError> {
        let payments: Option<Vec<WirePayment>> = self
            .get_optional_json(&format!("payments/user/{user_id}"))
            .await?;
        Ok(payments
            .unwrap_or_default()
            .into_iter()
            .map(convert_payment)
            .collect())
    }

    /// Create a hosted payment session for `amount` minor units.
    ///
    /// The backend returns the session reference in `clientSecret`; it is
    /// passed through untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or no reference comes back.
    #[instrument(skip(self), fields(user_id = %user_id, amount = %amount, currency = %currency))]
    pub async fn create_payment_session(
        &self,
        user_id: UserId,
        amount: MinorUnits,
        currency: CurrencyCode,
    ) -> Result<PaymentSessionRef, ApiError> {
        let body = CreatePaymentSessionRequest {
            user_id: user_id.to_string(),
            amount,
            currency,
        };
        let response: CreatePaymentSessionResponse =
            self.post_json("payments/create-intent", &body).await?;
        response
            .client_secret
            .filter(|reference| !reference.trim().is_empty())
            .map(PaymentSessionRef::new)
            .ok_or(ApiError::MissingField("clientSecret"))
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn ensure_success(status: StatusCode, body: String) -> Result<String, ApiError> {
    if status.is_success() {
        return Ok(body);
    }

    error!(
        status = %status,
        body = %body.chars().take(500).collect::<String>(),
        "Backend returned non-success status"
    );
    Err(ApiError::Status {
        status: status.as_u16(),
        message: extract_error_message(&body, status.canonical_reason().unwrap_or("Request failed")),
    })
}

fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| {
        error!(
            error = %e,
            body = %body.chars().take(500).collect::<String>(),
            "Failed to parse backend response"
        );
        ApiError::Parse(e)
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> BackendClient {
        BackendClient::new(&ApiConfig {
            base_url: Url::parse(&format!("{}/api", server.uri())).unwrap(),
            catalog_ttl: Duration::from_secs(300),
        })
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let url = with_trailing_slash(Url::parse("https://host.example/api").unwrap());
        assert_eq!(url.as_str(), "https://host.example/api/");
        assert_eq!(
            url.join("cart/all").unwrap().as_str(),
            "https://host.example/api/cart/all"
        );
    }

    #[tokio::test]
    async fn test_cart_by_user_not_found_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/cart/byUser/5"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let cart = client_for(&server).cart_by_user(UserId::new(5)).await.unwrap();
        assert!(cart.is_none());
    }

    #[tokio::test]
    async fn test_cart_by_user_empty_body_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/cart/byUser/5"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let cart = client_for(&server).cart_by_user(UserId::new(5)).await.unwrap();
        assert!(cart.is_none());
    }

    #[tokio::test]
    async fn test_find_cart_in_all_matches_owner() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/cart/all"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "cartId": 1, "user": { "userId": 2 } },
                { "user": { "userId": 5 } },
                { "cartId": 3, "user": { "userId": 5 } }
            ])))
            .mount(&server)
            .await;

        let cart = client_for(&server)
            .find_cart_in_all(UserId::new(5))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cart.cart.cart_id, CartId::new(3));
    }

    #[tokio::test]
    async fn test_error_message_surfaces_backend_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/cart/create"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(serde_json::json!({ "message": "User already has a cart." })),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .create_cart(UserId::new(5))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert!(err.is_cart_already_exists());
    }

    #[tokio::test]
    async fn test_products_are_cached_until_invalidated() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products/all"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "productId": 1, "name": "Jacket", "price": 150.0, "imageUrls": ["/img/1.png"] }
            ])))
            .expect(2)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let first = client.products().await.unwrap();
        let second = client.products().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(
            first[0].image_urls,
            vec![format!("{}/img/1.png", server.uri())]
        );

        client.invalidate_catalog().await;
        client.products().await.unwrap();
    }

    #[tokio::test]
    async fn test_payment_session_reads_client_secret() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/payments/create-intent"))
            .and(body_json(serde_json::json!({
                "userId": "5",
                "amount": 19999,
                "currency": "php"
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "clientSecret": "cs_test_123" })),
            )
            .mount(&server)
            .await;

        let session = client_for(&server)
            .create_payment_session(UserId::new(5), MinorUnits::new(19_999), CurrencyCode::PHP)
            .await
            .unwrap();
        assert_eq!(session.as_str(), "cs_test_123");
    }

    #[tokio::test]
    async fn test_payment_session_without_reference_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/payments/create-intent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .create_payment_session(UserId::new(5), MinorUnits::new(100), CurrencyCode::PHP)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::MissingField("clientSecret")));
    }

    #[tokio::test]
    async fn test_bearer_token_is_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/orders/byUser/5"))
            .and(header("authorization", "Bearer tok-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).with_bearer(SecretString::from("tok-123".to_string()));
        let orders = client.orders_by_user(UserId::new(5)).await.unwrap();
        assert!(orders.is_empty());
    }

    #[tokio::test]
    async fn test_login_requires_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/users/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "user": { "userId": 5, "email": "ana@mail.ph" }
            })))
            .mount(&server)
            .await;

        let email = Email::parse("ana@mail.ph").unwrap();
        let err = client_for(&server)
            .login(&email, &SecretString::from("pw".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::MissingField("token")));
    }
}
