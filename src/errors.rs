//! Error types and handling for the vault secrets SDK
//!
//! This module defines the error types that can be returned by SDK operations.
//! Errors carry enough context to diagnose a failed lookup (the lookup name,
//! the namespace, the offending URL) but never the secret value itself.
//!
//! # Error Categories
//!
//! - **Configuration**: invalid builder options or malformed vault URLs,
//!   surfaced from [`ClientBuilder::build`](crate::ClientBuilder::build)
//! - **Unknown namespace**: the namespace has no configured vault URL
//! - **Missing secret**: the backend was reached but holds no value for the key
//! - **Transport**: failures raised by the injected vault client, passed
//!   through untouched as the error [`source`](std::error::Error::source)
//!
//! # Example
//!
//! ```no_run
//! # use vault_secrets_sdk::{Client, Error, GetOpts};
//! # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
//! match client.get_secret("billing", "API_KEY", GetOpts::default()).await {
//!     Ok(_secret) => println!("Got secret"),
//!     Err(Error::MissingSecret { name, .. }) => println!("{} is not set", name),
//!     Err(Error::UnknownNamespace { namespace }) => println!("No vault for {}", namespace),
//!     Err(e) => return Err(e.into()),
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use thiserror::Error;

/// Result type alias for the SDK
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error type returned by injected vault clients
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for the SDK
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("config: {0}")]
    Config(String),

    /// A configured vault URL is not a valid absolute URL
    #[error("The url {url} is not valid.")]
    InvalidUrl {
        /// The URL exactly as it was configured
        url: String,
        /// Parser failure
        #[source]
        source: url::ParseError,
    },

    /// The namespace has no vault URL configured
    #[error("The namespace {namespace} is not defined on the client.")]
    UnknownNamespace {
        /// Requested namespace
        namespace: String,
    },

    /// The backend holds no value for the requested key
    #[error("{name} {detail}")]
    MissingSecret {
        /// Backend-specific lookup name (env var name or vault secret name)
        name: String,
        /// Backend-specific explanation, naming where the lookup happened
        detail: String,
    },

    /// The vault client failed to fetch the secret
    #[error("vault: {0}")]
    Vault(#[source] BoxError),

    /// The vault client could not be constructed
    #[error("vault client: {0}")]
    ClientInit(#[source] Arc<dyn std::error::Error + Send + Sync + 'static>),
}

/// Error categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or missing construction options
    Config,
    /// Namespace not present in the configured mapping
    UnknownNamespace,
    /// Secret absent from the selected backend
    MissingSecret,
    /// Failure inside the injected vault client
    Transport,
}

impl Error {
    /// Get the error kind for categorization
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(_) | Error::InvalidUrl { .. } => ErrorKind::Config,
            Error::UnknownNamespace { .. } => ErrorKind::UnknownNamespace,
            Error::MissingSecret { .. } => ErrorKind::MissingSecret,
            Error::Vault(_) | Error::ClientInit(_) => ErrorKind::Transport,
        }
    }

    /// Check if the error is a "secret not found" condition
    pub fn is_missing(&self) -> bool {
        self.kind() == ErrorKind::MissingSecret
    }

    pub(crate) fn missing_env(var_name: &str) -> Self {
        Error::MissingSecret {
            name: var_name.to_string(),
            detail: "is not defined. Please provide it on your .env file".to_string(),
        }
    }

    pub(crate) fn missing_vault(secret_name: &str, vault_url: &str) -> Self {
        Error::MissingSecret {
            name: secret_name.to_string(),
            detail: format!("does not exist in keyvault with url {}", vault_url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_kind() {
        assert_eq!(Error::Config("x".to_string()).kind(), ErrorKind::Config);
        assert_eq!(
            Error::UnknownNamespace {
                namespace: "NS9".to_string()
            }
            .kind(),
            ErrorKind::UnknownNamespace
        );
        assert!(Error::missing_env("NS1_KEY").is_missing());
        assert_eq!(
            Error::Vault("boom".into()).kind(),
            ErrorKind::Transport
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            Error::missing_env("NS1_TEST").to_string(),
            "NS1_TEST is not defined. Please provide it on your .env file"
        );
        assert_eq!(
            Error::missing_vault("KEY-ONE", "http://www.ns1-vault.com").to_string(),
            "KEY-ONE does not exist in keyvault with url http://www.ns1-vault.com"
        );
        assert_eq!(
            Error::UnknownNamespace {
                namespace: "NS9".to_string()
            }
            .to_string(),
            "The namespace NS9 is not defined on the client."
        );
    }

    #[test]
    fn test_vault_error_keeps_source() {
        let inner = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = Error::Vault(Box::new(inner));
        let source = err.source().expect("source should be preserved");
        assert_eq!(source.to_string(), "refused");
    }
}
