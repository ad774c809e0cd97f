//! A shopper with no cart buys one product through the hosted checkout.
//!
//! Run with: cargo test -p swiftthrift-integration-tests --test `checkout_flow`

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use secrecy::SecretString;
use swiftthrift_core::{CartId, MinorUnits, OrderId, ProductId, ReturnSessionId, UserId};
use swiftthrift_integration_tests::{PUBLIC_KEY, TOKEN, TestContext};
use swiftthrift_storefront::checkout::{CheckoutReturn, CheckoutState};
use swiftthrift_storefront::selection::SelectionLedger;
use swiftthrift_storefront::{ClientError, StoreEvent};
use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_catalog(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/products/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "productId": 3, "name": "Denim jacket", "price": 150.0, "isSold": false },
            { "productId": 4, "name": "Wool scarf", "price": 80.0, "isSold": true }
        ])))
        .mount(server)
        .await;
}

/// First lookup finds nothing; afterwards the created cart holds the jacket.
async fn mount_new_user_cart(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/cart/byUser/5"))
        .respond_with(ResponseTemplate::new(404))
        .up_to_n_times(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/cart/byUser/5"))
        .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "cartId": 11,
            "totalPrice": 150.0,
            "user": { "userId": 5 },
            "cartItems": [
                { "cartItemId": 21, "price": 150.0, "product": { "productId": 3, "name": "Denim jacket" } }
            ]
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/cart/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/cart/create"))
        .and(body_partial_json(serde_json::json!({ "user": { "userId": 5 } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "cartId": 11,
            "totalPrice": 0.0,
            "user": { "userId": 5 }
        })))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/cartItem/create"))
        .and(body_json(serde_json::json!({
            "price": 150.0,
            "cart": { "cartId": 11 },
            "product": { "productId": 3 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_payment_session(server: &MockServer, amount: i64) {
    Mock::given(method("POST"))
        .and(path("/api/payments/create-intent"))
        .and(body_json(serde_json::json!({
            "userId": "5",
            "amount": amount,
            "currency": "php"
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "clientSecret": "cs_test_e2e" })),
        )
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_new_user_buys_one_product() {
    let ctx = TestContext::signed_in().await;
    mount_catalog(&ctx.server).await;
    mount_new_user_cart(&ctx.server).await;
    mount_payment_session(&ctx.server, 15_000).await;

    let session = ctx.session();
    let mut events = ctx.storefront.events().subscribe();

    let product = ctx.storefront.catalog().product(ProductId::new(3)).await.unwrap();
    let added = ctx
        .storefront
        .cart(&session)
        .add_to_cart(session.user(), &product)
        .await
        .unwrap();
    assert_eq!(added.cart_id, CartId::new(11));
    assert_eq!(added.price, Decimal::new(150, 0));
    assert_eq!(
        events.try_recv().unwrap(),
        StoreEvent::CartChanged {
            cart_id: CartId::new(11)
        }
    );

    let contents = ctx
        .storefront
        .cart(&session)
        .load(UserId::new(5))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(contents.items.len(), 1);

    let mut ledger = SelectionLedger::new(contents.items);
    ledger.select_all();
    assert_eq!(ledger.total(), Decimal::new(15_000, 2));

    let mut checkout = ctx.storefront.checkout(&session);
    let redirect = checkout.checkout(session.user(), &ledger).await.unwrap();
    assert_eq!(redirect.amount, MinorUnits::new(15_000));
    assert!(redirect.url.as_str().ends_with("/cs_test_e2e"));
    assert!(!redirect.url.as_str().contains(PUBLIC_KEY));
    assert!(matches!(checkout.state(), CheckoutState::Redirecting { .. }));
}

#[tokio::test]
async fn test_return_shows_banner_with_orders() {
    let ctx = TestContext::signed_in().await;
    Mock::given(method("GET"))
        .and(path("/api/orders/byUser/5"))
        .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {
                "orderId": 1001,
                "status": "PENDING",
                "totalPrice": 150.0,
                "user": { "userId": 5 },
                "orderItems": [
                    { "orderItemId": 1, "subtotal": 150.0, "product": { "productId": 3, "name": "Denim jacket" } }
                ]
            }
        ])))
        .mount(&ctx.server)
        .await;

    let session = ctx.session();
    let url = url::Url::parse("http://127.0.0.1:3000/payment-success?session_id=cs_test_e2e")
        .unwrap();

    let mut checkout = ctx.storefront.checkout(&session);
    let state = checkout
        .observe_return(CheckoutReturn::from_url(&url))
        .unwrap()
        .clone();
    let CheckoutState::ReturnedWithSessionId { session_id } = state else {
        panic!("expected a completed return, got {state:?}");
    };

    let view = ctx
        .storefront
        .orders(&session)
        .view(UserId::new(5), Some(session_id))
        .await
        .unwrap();
    let banner = view.banner.unwrap();
    assert_eq!(banner.title, "Payment Successful!");
    assert_eq!(banner.session_id, ReturnSessionId::new("cs_test_e2e".to_string()));
    assert_eq!(view.orders.len(), 1);
    assert_eq!(view.orders[0].order_id, OrderId::new(1001));
    assert_eq!(view.orders[0].items.len(), 1);
}

#[tokio::test]
async fn test_sold_product_never_reaches_cart() {
    let ctx = TestContext::signed_in().await;
    mount_catalog(&ctx.server).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&ctx.server)
        .await;

    let session = ctx.session();
    let product = ctx.storefront.catalog().product(ProductId::new(4)).await.unwrap();
    let err = ctx
        .storefront
        .cart(&session)
        .add_to_cart(session.user(), &product)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
}

#[tokio::test]
async fn test_login_then_checkout_requires_selection() {
    let ctx = TestContext::signed_out().await;
    Mock::given(method("POST"))
        .and(path("/api/users/login"))
        .and(body_json(serde_json::json!({
            "email": "ana@mail.ph",
            "password": "hunter22"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token": TOKEN,
            "user": { "userId": 5, "email": "ana@mail.ph", "username": "ana", "role": "CUSTOMER" }
        })))
        .expect(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/payments/create-intent"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&ctx.server)
        .await;

    assert!(matches!(
        ctx.storefront.session(),
        Err(ClientError::Unauthenticated)
    ));
    let session = ctx
        .storefront
        .auth()
        .login("ana@mail.ph", &SecretString::from("hunter22".to_string()))
        .await
        .unwrap();
    assert_eq!(ctx.storefront.session().unwrap().user().user_id, UserId::new(5));

    let mut checkout = ctx.storefront.checkout(&session);
    let err = checkout
        .checkout(session.user(), &SelectionLedger::new(Vec::new()))
        .await
        .unwrap_err();
    assert_eq!(
        err.user_message(),
        "Please select at least one item to checkout."
    );
}
