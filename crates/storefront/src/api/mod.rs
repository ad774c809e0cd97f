//! Swiftthrift backend REST client.
//!
//! # Architecture
//!
//! - Plain JSON over `reqwest`; every endpoint lives on [`BackendClient`]
//! - The backend is the source of truth - no local sync, direct API calls
//! - Products and categories are cached in memory via `moka` (TTL from config)
//! - Raw response shapes live in [`types`] and are converted into
//!   `swiftthrift_core` models by `conversions`
//!
//! # Example
//!
//! ```rust,ignore
//! use swiftthrift_storefront::api::BackendClient;
//!
//! let client = BackendClient::new(&config.api);
//!
//! let products = client.products().await?;
//! let cart = client.cart_by_user(user.user_id).await?;
//! ```

mod cache;
mod client;
mod conversions;
pub mod types;

pub use client::BackendClient;

use thiserror::Error;

/// Message the backend returns when a second cart is created for a user.
pub const CART_ALREADY_EXISTS_MESSAGE: &str = "User already has a cart.";

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (connection refused, TLS, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field the client depends on was missing from a response.
    #[error("response is missing `{0}`")]
    MissingField(&'static str),

    /// A request URL could not be built.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ApiError {
    /// HTTP status, when the backend answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the backend refused a cart creation because one already exists.
    #[must_use]
    pub fn is_cart_already_exists(&self) -> bool {
        match self {
            Self::Status { message, .. } => message
                .trim()
                .eq_ignore_ascii_case(CART_ALREADY_EXISTS_MESSAGE),
            _ => false,
        }
    }
}

/// Pull a human-readable message out of an error body.
///
/// The backend answers either `{"message": "..."}`, `{"error": "..."}` or a
/// bare text body.
pub(crate) fn extract_error_message(body: &str, fallback: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return fallback.to_string();
    }

    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(trimmed)
    {
        for key in ["message", "error"] {
            if let Some(serde_json::Value::String(message)) = map.get(key)
                && !message.is_empty()
            {
                return message.clone();
            }
        }
    }

    trimmed.chars().take(200).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_message_from_json() {
        let body = r#"{"message":"User already has a cart.","status":400}"#;
        assert_eq!(
            extract_error_message(body, "Bad Request"),
            "User already has a cart."
        );
    }

    #[test]
    fn test_extract_message_from_error_field() {
        assert_eq!(
            extract_error_message(r#"{"error":"Not Found"}"#, "x"),
            "Not Found"
        );
    }

    #[test]
    fn test_extract_message_plain_text() {
        assert_eq!(
            extract_error_message("Invalid credentials", "Unauthorized"),
            "Invalid credentials"
        );
    }

    #[test]
    fn test_extract_message_empty_body_uses_fallback() {
        assert_eq!(extract_error_message("  ", "Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn test_cart_already_exists_detection() {
        let err = ApiError::Status {
            status: 400,
            message: "User already has a cart.".to_string(),
        };
        assert!(err.is_cart_already_exists());

        let err = ApiError::Status {
            status: 400,
            message: "Invalid user".to_string(),
        };
        assert!(!err.is_cart_already_exists());
        assert!(!ApiError::MissingField("cartId").is_cart_already_exists());
    }

    #[test]
    fn test_status_accessor() {
        let err = ApiError::Status {
            status: 502,
            message: "Bad Gateway".to_string(),
        };
        assert_eq!(err.status(), Some(502));
        assert_eq!(ApiError::MissingField("token").status(), None);
    }
}
