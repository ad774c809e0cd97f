//! Landing pages for the hosted checkout's redirect back.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use crate::checkout::CheckoutReturn;
use crate::error::{ClientError, ErrorKind};
use crate::orders::{ORDERS_UNAVAILABLE_MESSAGE, OrderView};
use crate::state::Storefront;

/// `?session_id=` as appended by the hosted checkout.
#[derive(Debug, Default, Deserialize)]
pub struct ReturnQuery {
    pub session_id: Option<String>,
}

impl ReturnQuery {
    fn outcome(self) -> CheckoutReturn {
        CheckoutReturn::from_session_param(self.session_id)
    }
}

/// Where the payment-success page sends the browser.
#[must_use]
pub fn orders_location(outcome: &CheckoutReturn) -> String {
    match outcome {
        CheckoutReturn::Completed(session_id) => {
            let encoded: String =
                url::form_urlencoded::byte_serialize(session_id.as_str().as_bytes()).collect();
            format!("/orders?session_id={encoded}")
        }
        CheckoutReturn::Cancelled => "/orders".to_string(),
    }
}

/// Forward to the order view, carrying the session id when there is one.
#[instrument(skip(query))]
pub async fn payment_success(Query(query): Query<ReturnQuery>) -> Redirect {
    let outcome = query.outcome();
    if let CheckoutReturn::Completed(session_id) = &outcome {
        tracing::info!(%session_id, "Payment return received");
    }
    Redirect::to(&orders_location(&outcome))
}

/// Orders of the logged-in user, with a success banner after checkout.
#[instrument(skip(state, query))]
pub async fn orders(
    State(state): State<Storefront>,
    Query(query): Query<ReturnQuery>,
) -> Result<Json<OrderView>, Response> {
    let session = state.session().map_err(IntoResponse::into_response)?;
    let session_id = match query.outcome() {
        CheckoutReturn::Completed(session_id) => Some(session_id),
        CheckoutReturn::Cancelled => None,
    };

    state
        .orders(&session)
        .view(session.user().user_id, session_id)
        .await
        .map(Json)
        .map_err(orders_error)
}

fn orders_error(err: ClientError) -> Response {
    if err.kind() == ErrorKind::Remote {
        err.report();
        return (StatusCode::BAD_GATEWAY, ORDERS_UNAVAILABLE_MESSAGE).into_response();
    }
    err.into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use super::*;
    use crate::config::ClientConfig;
    use crate::routes::app;
    use crate::session::{MemorySessionStore, SessionContext};
    use axum::body::Body;
    use axum::http::{Request, header};
    use secrecy::SecretString;
    use swiftthrift_core::{ReturnSessionId, User, UserId, UserRole};
    use tower::ServiceExt;
    use wiremock::matchers::{header as header_matcher, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(api_url: &str) -> ClientConfig {
        let vars: HashMap<&str, String> =
            HashMap::from([("SWIFTTHRIFT_API_URL", api_url.to_string())]);
        ClientConfig::from_lookup(|key| vars.get(key).cloned()).unwrap()
    }

    fn logged_in(api_url: &str) -> Storefront {
        let session = SessionContext::new(
            SecretString::from("tok-1".to_string()),
            User {
                user_id: UserId::new(5),
                email: "ana@mail.ph".to_string(),
                username: "ana".to_string(),
                role: UserRole::Customer,
            },
        );
        Storefront::with_store(
            config(api_url),
            Arc::new(MemorySessionStore::with_session(&session)),
        )
    }

    async fn get(state: Storefront, uri: &str) -> Response {
        app(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[test]
    fn test_orders_location_encodes_session_id() {
        let outcome = CheckoutReturn::Completed(ReturnSessionId::new("cs test&1".to_string()));
        assert_eq!(orders_location(&outcome), "/orders?session_id=cs+test%261");
        assert_eq!(orders_location(&CheckoutReturn::Cancelled), "/orders");
    }

    #[tokio::test]
    async fn test_payment_success_redirects_with_session_id() {
        let state = logged_in("http://127.0.0.1:9/api");
        let response = get(state, "/payment-success?session_id=cs_test_42").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/orders?session_id=cs_test_42"
        );
    }

    #[tokio::test]
    async fn test_payment_success_without_session_id() {
        let state = logged_in("http://127.0.0.1:9/api");
        let response = get(state, "/payment-success").await;
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/orders");
    }

    #[tokio::test]
    async fn test_orders_requires_session() {
        let state = Storefront::with_store(
            config("http://127.0.0.1:9/api"),
            Arc::new(MemorySessionStore::new()),
        );
        let response = get(state, "/orders").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_orders_with_banner() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/orders/byUser/5"))
            .and(header_matcher("authorization", "Bearer tok-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "orderId": 1001, "status": "PENDING", "totalPrice": 150.0 }
            ])))
            .mount(&server)
            .await;

        let state = logged_in(&format!("{}/api", server.uri()));
        let response = get(state, "/orders?session_id=cs_test_42").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["banner"]["session_id"], "cs_test_42");
        assert_eq!(json["orders"][0]["order_id"], 1001);
    }

    #[tokio::test]
    async fn test_orders_backend_failure_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/orders/byUser/5"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let state = logged_in(&format!("{}/api", server.uri()));
        let response = get(state, "/orders").await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], ORDERS_UNAVAILABLE_MESSAGE.as_bytes());
    }

    #[tokio::test]
    async fn test_health() {
        let state = logged_in("http://127.0.0.1:9/api");
        let response = get(state, "/health").await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
