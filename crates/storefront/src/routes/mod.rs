//! Payment return listener.
//!
//! The hosted checkout sends the browser back to this local listener.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//! GET  /payment-success        - Redirect to /orders, keeping ?session_id
//! GET  /orders                 - Order view (JSON) for the stored session
//! ```

pub mod payment;

use std::net::SocketAddr;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::state::Storefront;

/// All listener routes.
pub fn routes() -> Router<Storefront> {
    Router::new()
        .route("/health", get(health))
        .route("/payment-success", get(payment::payment_success))
        .route("/orders", get(payment::orders))
}

/// The router with state and request tracing attached.
pub fn app(state: Storefront) -> Router {
    routes().with_state(state).layer(TraceLayer::new_for_http())
}

/// Serve the listener on `addr` until Ctrl+C or SIGTERM.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(state: Storefront, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("payment return listener on {}", addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

/// Liveness check.
async fn health() -> &'static str {
    "ok"
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, stopping listener");
}
