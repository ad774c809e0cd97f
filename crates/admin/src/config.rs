//! Admin credentials loaded from environment variables.
//!
//! # Environment Variables
//!
//! - `SWIFTTHRIFT_ADMIN_USERNAME` - Admin console username
//! - `SWIFTTHRIFT_ADMIN_PASSWORD` - Admin console password
//!
//! Both are required only by commands that sign in to the admin console.

use secrecy::SecretString;
use swiftthrift_storefront::config::ConfigError;

/// Credentials for `POST /admins/login`.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct AdminCredentials {
    pub username: String,
    pub password: SecretString,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl AdminCredentials {
    /// Load credentials from the environment (after `.env`).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if either variable is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load credentials from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if either variable is unset or
    /// blank.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
        };

        Ok(Self {
            username: get("SWIFTTHRIFT_ADMIN_USERNAME")?.trim().to_string(),
            password: SecretString::from(get("SWIFTTHRIFT_ADMIN_PASSWORD")?),
        })
    }
}
