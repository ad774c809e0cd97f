//! CLI command implementations.

pub mod account;
pub mod admin;
pub mod pay;
pub mod shop;

use std::io::{self, BufRead, Write};

use secrecy::SecretString;
use swiftthrift_admin::AdminError;
use swiftthrift_storefront::ClientError;
use swiftthrift_storefront::config::ConfigError;
use thiserror::Error;

/// Errors that can end a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Admin(#[from] AdminError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Log the error and return the message for the terminal.
    pub fn report(&self) -> String {
        match self {
            Self::Client(err) => err.report(),
            Self::Admin(err) => err.report(),
            Self::Config(_) | Self::Io(_) => {
                tracing::error!(error = %self, "Command failed");
                self.to_string()
            }
        }
    }
}

/// Read one line from stdin as a secret, prompting on stderr.
pub(crate) fn read_secret(prompt: &str) -> Result<SecretString, CliError> {
    write!(io::stderr(), "{prompt}: ")?;
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(SecretString::from(
        line.trim_end_matches(['\r', '\n']).to_string(),
    ))
}

/// Write one line of command output to stdout.
pub(crate) fn out(line: impl std::fmt::Display) -> Result<(), CliError> {
    writeln!(io::stdout().lock(), "{line}")?;
    Ok(())
}
