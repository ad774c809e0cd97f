//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SWIFTTHRIFT_API_URL` - Backend base URL including the `/api` prefix
//!
//! ## Optional
//! - `SWIFTTHRIFT_CURRENCY` - Currency for payment sessions (default: php)
//! - `SWIFTTHRIFT_CHECKOUT_URL` - Hosted checkout base URL
//!   (default: `https://checkout.stripe.com/c/pay/`)
//! - `SWIFTTHRIFT_PAYMENT_PUBLIC_KEY` - Publishable key of the payment integration
//! - `SWIFTTHRIFT_SESSION_FILE` - Session file (default: .swiftthrift/session.json)
//! - `SWIFTTHRIFT_CATALOG_TTL_SECS` - Catalog cache TTL in seconds (default: 300)
//! - `SWIFTTHRIFT_RETURN_HOST` - Payment return listener bind address (default: 127.0.0.1)
//! - `SWIFTTHRIFT_RETURN_PORT` - Payment return listener port (default: 3000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use swiftthrift_core::CurrencyCode;
use thiserror::Error;
use url::Url;

const DEFAULT_CHECKOUT_URL: &str = "https://checkout.stripe.com/c/pay/";
const DEFAULT_SESSION_FILE: &str = ".swiftthrift/session.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend API configuration
    pub api: ApiConfig,
    /// Payment session and hosted checkout configuration
    pub payment: PaymentConfig,
    /// Where the session (`token` + `user`) is persisted
    pub session_file: PathBuf,
    /// IP address the payment return listener binds to
    pub return_host: IpAddr,
    /// Port the payment return listener listens on
    pub return_port: u16,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Backend API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the REST backend, e.g. `https://host/api`
    pub base_url: Url,
    /// How long product and category listings stay cached
    pub catalog_ttl: Duration,
}

/// Payment configuration.
#[derive(Debug, Clone)]
pub struct PaymentConfig {
    /// Currency sent with every payment session
    pub currency: CurrencyCode,
    /// Hosted checkout base URL; the session reference is appended
    pub checkout_url: Url,
    /// Publishable key of the payment integration (not a secret)
    pub public_key: Option<String>,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let base_url = env.http_url(&env.required("SWIFTTHRIFT_API_URL")?, "SWIFTTHRIFT_API_URL")?;
        let catalog_ttl = Duration::from_secs(env.parsed("SWIFTTHRIFT_CATALOG_TTL_SECS", 300)?);

        let currency = env.parsed("SWIFTTHRIFT_CURRENCY", CurrencyCode::PHP)?;
        let checkout_url = env.http_url(
            &env.or_default("SWIFTTHRIFT_CHECKOUT_URL", DEFAULT_CHECKOUT_URL),
            "SWIFTTHRIFT_CHECKOUT_URL",
        )?;
        let public_key = env.optional("SWIFTTHRIFT_PAYMENT_PUBLIC_KEY");

        Ok(Self {
            api: ApiConfig {
                base_url,
                catalog_ttl,
            },
            payment: PaymentConfig {
                currency,
                checkout_url,
                public_key,
            },
            session_file: PathBuf::from(
                env.or_default("SWIFTTHRIFT_SESSION_FILE", DEFAULT_SESSION_FILE),
            ),
            return_host: env.parsed("SWIFTTHRIFT_RETURN_HOST", IpAddr::from([127, 0, 0, 1]))?,
            return_port: env.parsed("SWIFTTHRIFT_RETURN_PORT", 3000)?,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for the payment return listener.
    #[must_use]
    pub const fn return_addr(&self) -> SocketAddr {
        SocketAddr::new(self.return_host, self.return_port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get an optional variable; blank values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    fn parsed<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(key).map_or(Ok(default), |value| {
            value
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }

    /// Parse an absolute http(s) URL.
    fn http_url(&self, value: &str, key: &str) -> Result<Url, ConfigError> {
        let url = Url::parse(value)
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                format!("unsupported scheme `{}`", url.scheme()),
            ));
        }
        Ok(url)
    }
}
