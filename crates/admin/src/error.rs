//! Unified error handling for the admin console.

use swiftthrift_storefront::api::ApiError;
use swiftthrift_storefront::{ClientError, ErrorKind};
use thiserror::Error;

/// Error type for admin console operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// The backend rejected the admin credentials.
    #[error("Login failed. Please check your credentials.")]
    SignInFailed(#[source] ApiError),

    /// Any workflow error shared with the storefront.
    #[error(transparent)]
    Client(#[from] ClientError),
}

impl From<ApiError> for AdminError {
    fn from(err: ApiError) -> Self {
        Self::Client(ClientError::Remote(err))
    }
}

impl AdminError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::SignInFailed(_) => ErrorKind::Unauthenticated,
            Self::Client(err) => err.kind(),
        }
    }

    /// Short human-readable message for this error.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::SignInFailed(_) => self.to_string(),
            Self::Client(err) => err.user_message(),
        }
    }

    /// Log the error, capture serious ones to Sentry, and return the message
    /// to show.
    pub fn report(&self) -> String {
        match self {
            Self::SignInFailed(err) => {
                tracing::warn!(error = %err, "Admin sign-in rejected");
                self.user_message()
            }
            Self::Client(err) => err.report(),
        }
    }
}
