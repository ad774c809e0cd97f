//! Unified error handling with Sentry integration.
//!
//! Every workflow returns [`ClientError`]. Callers turn it into something a
//! person can read with [`ClientError::report`], which logs the error,
//! captures the serious classes to Sentry and returns the short message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use swiftthrift_core::{PaymentSessionRef, UserId};
use thiserror::Error;

use crate::api::ApiError;
use crate::session::SessionError;

/// Shown when the backend claims a cart exists that no lookup can find.
pub const CART_INCONSISTENCY_MESSAGE: &str =
    "System error: Your cart exists but cannot be accessed. Please contact support.";

/// Coarse classes of failure, deciding how an error is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected locally, before any network call.
    Validation,
    /// No session; the user has to log in.
    Unauthenticated,
    /// The backend failed or could not be reached. Not retried.
    Remote,
    /// The payment integration could not load or redirect. Not retried.
    Integration,
    /// Backend state contradicts itself. Terminal; the user contacts support.
    DataInconsistency,
}

/// Failure to produce a usable cart for a user.
#[derive(Debug, Error)]
pub enum CartResolutionError {
    /// The all-carts fallback lookup failed.
    #[error("cart lookup failed: {0}")]
    Lookup(#[source] ApiError),

    /// Creating a cart failed for a reason other than a duplicate.
    #[error("cart creation failed: {0}")]
    Create(#[source] ApiError),

    /// The backend refused to create a cart because one exists, yet neither
    /// lookup could find it.
    #[error("user {user_id} already has a cart that cannot be located")]
    CartExistsButUnreachable { user_id: UserId },
}

/// The payment integration could not hand off to the hosted checkout.
///
/// The backend session was already created; it is carried along so callers
/// can show or log it.
#[derive(Debug, Error)]
pub enum IntegrationError {
    /// No publishable key is configured.
    #[error("payment integration is not configured")]
    NotConfigured { session: PaymentSessionRef },

    /// The checkout URL could not be built from the session reference.
    #[error("invalid checkout redirect: {reason}")]
    InvalidRedirect {
        session: PaymentSessionRef,
        reason: String,
    },
}

impl IntegrationError {
    /// The payment session that was created before the integration failed.
    #[must_use]
    pub const fn session(&self) -> &PaymentSessionRef {
        match self {
            Self::NotConfigured { session } | Self::InvalidRedirect { session, .. } => session,
        }
    }
}

/// Error type for every client workflow.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Input rejected locally.
    #[error("Validation error: {0}")]
    Validation(String),

    /// No stored session.
    #[error("Not logged in")]
    Unauthenticated,

    /// A backend read (or a call whose effect is irrelevant) failed.
    #[error("Remote error: {0}")]
    Remote(#[from] ApiError),

    /// A backend write was not acknowledged.
    #[error("Remote write failed: {0}")]
    RemoteWrite(#[source] ApiError),

    /// No cart could be resolved for the user.
    #[error("Cart unavailable: {0}")]
    CartUnavailable(#[from] CartResolutionError),

    /// The payment integration failed.
    #[error("Payment integration error: {0}")]
    Integration(#[from] IntegrationError),

    /// A checkout step was attempted out of order.
    #[error("Invalid checkout state: {0}")]
    InvalidState(String),

    /// The session store could not be read or written.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

impl ClientError {
    /// Which class of failure this is.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::InvalidState(_) => ErrorKind::Validation,
            Self::Unauthenticated | Self::Session(_) => ErrorKind::Unauthenticated,
            Self::Remote(_)
            | Self::RemoteWrite(_)
            | Self::CartUnavailable(
                CartResolutionError::Lookup(_) | CartResolutionError::Create(_),
            ) => ErrorKind::Remote,
            Self::CartUnavailable(CartResolutionError::CartExistsButUnreachable { .. }) => {
                ErrorKind::DataInconsistency
            }
            Self::Integration(_) => ErrorKind::Integration,
        }
    }

    /// Short human-readable message for this error.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(message) | Self::InvalidState(message) => message.clone(),
            Self::Unauthenticated => "Please log in to continue.".to_string(),
            Self::Session(_) => "Your session could not be read. Please log in again.".to_string(),
            Self::Remote(ApiError::Status { message, .. }) => message.clone(),
            Self::Remote(_) => "Could not reach Swiftthrift. Please try again.".to_string(),
            Self::RemoteWrite(_) => "Your change could not be saved. Please try again.".to_string(),
            Self::CartUnavailable(CartResolutionError::CartExistsButUnreachable { .. }) => {
                CART_INCONSISTENCY_MESSAGE.to_string()
            }
            Self::CartUnavailable(_) => "Could not create or access your cart.".to_string(),
            Self::Integration(err) => format!("Payment error: {err}"),
        }
    }

    /// Log the error, capture it to Sentry when it is worth a look, and
    /// return the message to show.
    pub fn report(&self) -> String {
        match self.kind() {
            ErrorKind::Validation | ErrorKind::Unauthenticated => {
                tracing::info!(error = %self, "Request rejected");
            }
            ErrorKind::Remote | ErrorKind::Integration | ErrorKind::DataInconsistency => {
                let event_id = sentry::capture_error(self);
                tracing::error!(
                    error = %self,
                    kind = ?self.kind(),
                    sentry_event_id = %event_id,
                    "Workflow error"
                );
            }
        }
        self.user_message()
    }
}

impl IntoResponse for ClientError {
    fn into_response(self) -> Response {
        let status = match self.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
            ErrorKind::Remote | ErrorKind::Integration => StatusCode::BAD_GATEWAY,
            ErrorKind::DataInconsistency => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let message = self.report();
        (status, message).into_response()
    }
}

/// Set the Sentry user context.
///
/// Call this after login to associate errors with users.
pub fn set_sentry_user(user_id: UserId, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for a workflow step.
///
/// Breadcrumbs appear in Sentry reports as the trail of steps leading up to
/// an error.
pub fn add_breadcrumb(category: &str, message: &str, data: &[(&str, String)]) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    for (key, value) in data {
        breadcrumb
            .data
            .insert((*key).to_string(), serde_json::Value::String(value.clone()));
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_error(message: &str) -> ApiError {
        ApiError::Status {
            status: 400,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_kinds() {
        assert_eq!(
            ClientError::Validation("x".to_string()).kind(),
            ErrorKind::Validation
        );
        assert_eq!(ClientError::Unauthenticated.kind(), ErrorKind::Unauthenticated);
        assert_eq!(
            ClientError::RemoteWrite(status_error("boom")).kind(),
            ErrorKind::Remote
        );
        assert_eq!(
            ClientError::CartUnavailable(CartResolutionError::Create(status_error("x"))).kind(),
            ErrorKind::Remote
        );
        assert_eq!(
            ClientError::CartUnavailable(CartResolutionError::CartExistsButUnreachable {
                user_id: UserId::new(1)
            })
            .kind(),
            ErrorKind::DataInconsistency
        );
        assert_eq!(
            ClientError::Integration(IntegrationError::NotConfigured {
                session: PaymentSessionRef::new("cs_1".to_string())
            })
            .kind(),
            ErrorKind::Integration
        );
    }

    #[test]
    fn test_inconsistency_message_directs_to_support() {
        let err = ClientError::CartUnavailable(CartResolutionError::CartExistsButUnreachable {
            user_id: UserId::new(1),
        });
        assert_eq!(err.user_message(), CART_INCONSISTENCY_MESSAGE);
    }

    #[test]
    fn test_remote_status_message_is_backend_text() {
        let err = ClientError::Remote(status_error("Email already registered"));
        assert_eq!(err.user_message(), "Email already registered");
    }

    #[test]
    fn test_integration_error_keeps_session() {
        let err = IntegrationError::InvalidRedirect {
            session: PaymentSessionRef::new("cs_2".to_string()),
            reason: "bad".to_string(),
        };
        assert_eq!(err.session().as_str(), "cs_2");
    }

    #[test]
    fn test_into_response_status() {
        fn status(err: ClientError) -> StatusCode {
            err.into_response().status()
        }
        assert_eq!(status(ClientError::Unauthenticated), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status(ClientError::Validation("x".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(ClientError::Remote(status_error("x"))),
            StatusCode::BAD_GATEWAY
        );
    }
}
