//! The one-cart-per-user contract as seen from the add-to-cart workflow.
//!
//! Run with: cargo test -p swiftthrift-integration-tests --test `cart_resolution`

#![allow(clippy::unwrap_used)]

use swiftthrift_core::{CartId, ProductId};
use swiftthrift_integration_tests::TestContext;
use swiftthrift_storefront::{ClientError, ErrorKind};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_jacket(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/products/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "productId": 3, "name": "Denim jacket", "price": 150.0 }
        ])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_cart_found_in_listing_is_reused() {
    let ctx = TestContext::signed_in().await;
    mount_jacket(&ctx.server).await;
    Mock::given(method("GET"))
        .and(path("/api/cart/byUser/5"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&ctx.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/cart/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "cartId": 7, "user": { "userId": 4 } },
            { "cartId": 8, "user": { "userId": 5 } }
        ])))
        .expect(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/cart/create"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&ctx.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/cartItem/create"))
        .and(body_partial_json(serde_json::json!({ "cart": { "cartId": 8 } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let session = ctx.session();
    let product = ctx.storefront.catalog().product(ProductId::new(3)).await.unwrap();
    let added = ctx
        .storefront
        .cart(&session)
        .add_to_cart(session.user(), &product)
        .await
        .unwrap();
    assert_eq!(added.cart_id, CartId::new(8));
}

#[tokio::test]
async fn test_unreachable_existing_cart_stops_the_add() {
    let ctx = TestContext::signed_in().await;
    mount_jacket(&ctx.server).await;
    Mock::given(method("GET"))
        .and(path("/api/cart/byUser/5"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&ctx.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/cart/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&ctx.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/cart/create"))
        .respond_with(ResponseTemplate::new(400).set_body_string("User already has a cart."))
        .expect(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/cartItem/create"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&ctx.server)
        .await;

    let session = ctx.session();
    let mut events = ctx.storefront.events().subscribe();
    let product = ctx.storefront.catalog().product(ProductId::new(3)).await.unwrap();
    let err = ctx
        .storefront
        .cart(&session)
        .add_to_cart(session.user(), &product)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::CartUnavailable(_)));
    assert_eq!(err.kind(), ErrorKind::DataInconsistency);
    assert!(events.try_recv().is_err());
}
