//! Turning a selection into a hosted payment session and back.
//!
//! ```text
//! Idle -> SessionRequested -> Redirecting -> (hosted checkout) -> ReturnedWithSessionId
//!                                                              \-> ReturnedCancelled
//! ```
//!
//! The client never learns whether the payment succeeded. A return carrying
//! a `session_id` is only a correlation token handed to the order view; the
//! backend decides what was paid.

use swiftthrift_core::{
    CurrencyCode, MinorUnits, PaymentSessionRef, Price, ReturnSessionId, User,
};
use tracing::{info, instrument, warn};
use url::Url;

use crate::api::BackendClient;
use crate::config::PaymentConfig;
use crate::error::{ClientError, IntegrationError, add_breadcrumb};
use crate::selection::SelectionLedger;

/// Where a checkout attempt stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CheckoutState {
    #[default]
    Idle,
    /// Waiting for the backend to create a payment session.
    SessionRequested { amount: MinorUnits },
    /// A session exists and control goes to the hosted checkout.
    Redirecting { session: PaymentSessionRef },
    /// The hosted checkout sent the user back with a session id.
    ReturnedWithSessionId { session_id: ReturnSessionId },
    /// The user came back without a session id.
    ReturnedCancelled,
}

impl CheckoutState {
    /// Short name for logs and messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::SessionRequested { .. } => "session requested",
            Self::Redirecting { .. } => "redirecting",
            Self::ReturnedWithSessionId { .. } => "returned",
            Self::ReturnedCancelled => "cancelled",
        }
    }

    /// Whether a new checkout may start. Only an in-flight session request
    /// blocks one.
    #[must_use]
    pub const fn can_start(&self) -> bool {
        !matches!(self, Self::SessionRequested { .. })
    }

    /// Whether a return from the hosted checkout is expected.
    ///
    /// `Idle` is accepted too: the return usually lands in a fresh process
    /// that never saw the redirect.
    #[must_use]
    pub const fn can_observe_return(&self) -> bool {
        matches!(self, Self::Idle | Self::Redirecting { .. })
    }

    /// The id to show in the order view's success banner.
    #[must_use]
    pub const fn correlation_id(&self) -> Option<&ReturnSessionId> {
        match self {
            Self::ReturnedWithSessionId { session_id } => Some(session_id),
            _ => None,
        }
    }
}

/// Outcome carried by the hosted checkout's redirect back to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutReturn {
    Completed(ReturnSessionId),
    Cancelled,
}

impl CheckoutReturn {
    /// Read a return URL. A non-empty `session_id` query parameter means
    /// the checkout completed; anything else is a cancellation.
    #[must_use]
    pub fn from_url(url: &Url) -> Self {
        Self::from_session_param(
            url.query_pairs()
                .find(|(key, _)| key == "session_id")
                .map(|(_, value)| value.into_owned()),
        )
    }

    /// Interpret an optional `session_id` value.
    #[must_use]
    pub fn from_session_param(session_id: Option<String>) -> Self {
        match session_id {
            Some(id) if !id.trim().is_empty() => {
                Self::Completed(ReturnSessionId::new(id.trim().to_string()))
            }
            _ => Self::Cancelled,
        }
    }
}

/// Hands a payment session to the external payment page.
pub trait PaymentRedirector {
    /// The URL that opens the hosted checkout for `session`.
    ///
    /// # Errors
    ///
    /// Returns an `IntegrationError` (carrying `session`) when the
    /// integration cannot be used.
    fn redirect_url(&self, session: &PaymentSessionRef) -> Result<Url, IntegrationError>;
}

/// Redirects to a hosted checkout page at `{checkout_url}{session}`.
#[derive(Debug, Clone)]
pub struct HostedCheckoutRedirector {
    checkout_url: Url,
    public_key: Option<String>,
}

impl HostedCheckoutRedirector {
    #[must_use]
    pub fn new(checkout_url: Url, public_key: Option<String>) -> Self {
        let mut checkout_url = checkout_url;
        if !checkout_url.path().ends_with('/') {
            let path = format!("{}/", checkout_url.path());
            checkout_url.set_path(&path);
        }
        Self {
            checkout_url,
            public_key: public_key.filter(|key| !key.trim().is_empty()),
        }
    }

    #[must_use]
    pub fn from_config(config: &PaymentConfig) -> Self {
        Self::new(config.checkout_url.clone(), config.public_key.clone())
    }
}

impl PaymentRedirector for HostedCheckoutRedirector {
    fn redirect_url(&self, session: &PaymentSessionRef) -> Result<Url, IntegrationError> {
        if self.public_key.is_none() {
            return Err(IntegrationError::NotConfigured {
                session: session.clone(),
            });
        }

        let reference = session.as_str();
        if reference.is_empty()
            || reference
                .chars()
                .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#'))
        {
            return Err(IntegrationError::InvalidRedirect {
                session: session.clone(),
                reason: "session reference is not a single path segment".to_string(),
            });
        }

        self.checkout_url
            .join(reference)
            .map_err(|e| IntegrationError::InvalidRedirect {
                session: session.clone(),
                reason: e.to_string(),
            })
    }
}

/// A created payment session ready for hand-off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRedirect {
    pub session: PaymentSessionRef,
    pub amount: MinorUnits,
    pub url: Url,
}

/// Drives one user's checkout through [`CheckoutState`].
#[derive(Debug)]
pub struct CheckoutCoordinator<R> {
    client: BackendClient,
    redirector: R,
    currency: CurrencyCode,
    state: CheckoutState,
}

impl<R: PaymentRedirector> CheckoutCoordinator<R> {
    #[must_use]
    pub const fn new(client: BackendClient, redirector: R, currency: CurrencyCode) -> Self {
        Self {
            client,
            redirector,
            currency,
            state: CheckoutState::Idle,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &CheckoutState {
        &self.state
    }

    /// Create a payment session for the selected lines and build the
    /// hosted checkout URL.
    ///
    /// An empty selection is rejected before any request is made. On a
    /// backend failure the state falls back to `Idle`; on an integration
    /// failure it stays `Redirecting` so the created session stays visible.
    ///
    /// # Errors
    ///
    /// - `InvalidState` while another session request is in flight
    /// - `Validation` for an empty selection or an unpayable amount
    /// - `Remote` if the backend does not create a session
    /// - `Integration` if the redirect cannot be produced
    #[instrument(skip(self, user, selection), fields(user_id = %user.user_id, items = selection.len()))]
    pub async fn checkout(
        &mut self,
        user: &User,
        selection: &SelectionLedger,
    ) -> Result<CheckoutRedirect, ClientError> {
        if !self.state.can_start() {
            return Err(ClientError::InvalidState(format!(
                "Cannot start a checkout while {}.",
                self.state.name()
            )));
        }
        if selection.is_empty() {
            return Err(ClientError::Validation(
                "Please select at least one item to checkout.".to_string(),
            ));
        }

        let amount = Price::new(selection.total(), self.currency)
            .to_minor_units()
            .map_err(|e| ClientError::Validation(format!("Cannot charge this amount: {e}.")))?;

        self.state = CheckoutState::SessionRequested { amount };
        let session = match self
            .client
            .create_payment_session(user.user_id, amount, self.currency)
            .await
        {
            Ok(session) => session,
            Err(e) => {
                self.state = CheckoutState::Idle;
                return Err(e.into());
            }
        };
        info!(%amount, "Payment session created");
        add_breadcrumb("checkout", "Payment session created", &[("amount", amount.to_string())]);

        self.state = CheckoutState::Redirecting {
            session: session.clone(),
        };
        let url = self.redirector.redirect_url(&session).inspect_err(|e| {
            warn!(error = %e, "Payment integration failed");
        })?;

        Ok(CheckoutRedirect {
            session,
            amount,
            url,
        })
    }

    /// Record the user's return from the hosted checkout.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` unless the coordinator is `Idle` or
    /// `Redirecting`.
    pub fn observe_return(
        &mut self,
        outcome: CheckoutReturn,
    ) -> Result<&CheckoutState, ClientError> {
        if !self.state.can_observe_return() {
            return Err(ClientError::InvalidState(format!(
                "Unexpected payment return while {}.",
                self.state.name()
            )));
        }
        self.state = match outcome {
            CheckoutReturn::Completed(session_id) => {
                info!(%session_id, "Returned from hosted checkout");
                CheckoutState::ReturnedWithSessionId { session_id }
            }
            CheckoutReturn::Cancelled => {
                info!("Hosted checkout cancelled");
                CheckoutState::ReturnedCancelled
            }
        };
        Ok(&self.state)
    }

    /// Forget the current attempt.
    pub fn reset(&mut self) {
        self.state = CheckoutState::Idle;
    }
}
