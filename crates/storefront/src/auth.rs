//! Login, signup and logout.
//!
//! Token issuance is the backend's business; this module validates input,
//! forwards it, and keeps the resulting session in the [`SessionStore`].

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use swiftthrift_core::Email;
use tracing::{info, instrument};

use crate::api::BackendClient;
use crate::api::types::SignupRequest;
use crate::error::{ClientError, clear_sentry_user, set_sentry_user};
use crate::session::{SessionContext, SessionStore};

const PHONE_DIGITS: usize = 11;

/// Signup form as entered by the user.
pub struct SignupForm {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
    pub phone: String,
}

impl std::fmt::Debug for SignupForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupForm")
            .field("email", &self.email)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl SignupForm {
    /// Check the form locally and build the backend request.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Validation` naming the first problem found.
    pub fn validate(&self) -> Result<SignupRequest, ClientError> {
        let required = [
            ("Email", self.email.trim()),
            ("First name", self.first_name.trim()),
            ("Last name", self.last_name.trim()),
            ("Username", self.username.trim()),
            ("Password", self.password.expose_secret()),
            ("Phone number", self.phone.trim()),
        ];
        if let Some((label, _)) = required.iter().find(|(_, value)| value.is_empty()) {
            return Err(ClientError::Validation(format!("{label} is required.")));
        }

        let email = Email::parse(&self.email)
            .map_err(|e| ClientError::Validation(format!("Invalid email: {e}.")))?;

        if self.password.expose_secret() != self.confirm_password.expose_secret() {
            return Err(ClientError::Validation("Passwords do not match.".to_string()));
        }

        let phone = self.phone.trim();
        if phone.len() != PHONE_DIGITS || !phone.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ClientError::Validation(
                "Phone number must be exactly 11 digits.".to_string(),
            ));
        }

        Ok(SignupRequest {
            email: email.into_inner(),
            fname: self.first_name.trim().to_string(),
            lname: self.last_name.trim().to_string(),
            username: self.username.trim().to_string(),
            password: self.password.expose_secret().to_string(),
            phone: phone.to_string(),
        })
    }
}

/// Account workflows bound to one session store.
#[derive(Clone)]
pub struct AuthService {
    client: BackendClient,
    store: Arc<dyn SessionStore>,
}

impl AuthService {
    #[must_use]
    pub fn new(client: BackendClient, store: Arc<dyn SessionStore>) -> Self {
        Self { client, store }
    }

    /// Log in and persist the session.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Validation` for blank or malformed input and
    /// `ClientError::Remote` (carrying the backend's text) when rejected.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<SessionContext, ClientError> {
        if email.trim().is_empty() || password.expose_secret().is_empty() {
            return Err(ClientError::Validation(
                "Email and password are required.".to_string(),
            ));
        }
        let email = Email::parse(email)
            .map_err(|e| ClientError::Validation(format!("Invalid email: {e}.")))?;

        let (token, user) = self.client.login(&email, password).await?;
        let session = SessionContext::new(token, user);
        self.store.save(&session)?;

        set_sentry_user(session.user().user_id, Some(&session.user().email));
        info!(user_id = %session.user().user_id, "Logged in");
        Ok(session)
    }

    /// Register a new account. Does not log in.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Validation` when the form is incomplete and
    /// `ClientError::Remote` (carrying the backend's text) when rejected.
    #[instrument(skip(self, form))]
    pub async fn signup(&self, form: &SignupForm) -> Result<(), ClientError> {
        let request = form.validate()?;
        self.client.signup(&request).await?;
        info!(username = %request.username, "Account created");
        Ok(())
    }

    /// Forget the session. Logging out twice is fine.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Session` if the store cannot be cleared.
    pub fn logout(&self) -> Result<(), ClientError> {
        self.store.clear()?;
        clear_sentry_user();
        info!("Logged out");
        Ok(())
    }

    /// The current session, if any.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Session` if the store cannot be read.
    pub fn current(&self) -> Result<Option<SessionContext>, ClientError> {
        Ok(self.store.load()?)
    }
}
