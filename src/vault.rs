//! Vault backend
//!
//! The SDK never speaks a vault's wire protocol or handles its credentials.
//! Instead it calls an injected [`VaultClient`], which is produced once per
//! [`Client`](crate::Client) by a user-supplied factory.
//!
//! # Implementing a client
//!
//! ```
//! use async_trait::async_trait;
//! use vault_secrets_sdk::{BoxError, SecretBundle, VaultClient};
//!
//! #[derive(Debug)]
//! struct FixedVault;
//!
//! #[async_trait]
//! impl VaultClient for FixedVault {
//!     async fn get_secret(
//!         &self,
//!         vault_base_url: &str,
//!         secret_name: &str,
//!         _secret_version: &str,
//!     ) -> Result<SecretBundle, BoxError> {
//!         Ok(SecretBundle::new(format!("{}/{}", vault_base_url, secret_name)))
//!     }
//! }
//! ```

use crate::errors::{BoxError, Error, Result};
use crate::models::SecretBundle;
use crate::util::vault_secret_name;
use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use secrecy::SecretString;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Version string that selects the current version of a secret
pub const LATEST_VERSION: &str = "";

/// Asynchronous access to a remote secret vault
///
/// Implementations own authentication and transport. Errors are returned
/// to the caller of [`Client::get_secret`](crate::Client::get_secret)
/// unchanged, wrapped in [`Error::Vault`].
#[async_trait]
pub trait VaultClient: Send + Sync {
    /// Fetch a secret by name from the vault at `vault_base_url`
    ///
    /// An empty `secret_version` means the latest version.
    async fn get_secret(
        &self,
        vault_base_url: &str,
        secret_name: &str,
        secret_version: &str,
    ) -> std::result::Result<SecretBundle, BoxError>;
}

#[async_trait]
impl<T: VaultClient + ?Sized> VaultClient for Arc<T> {
    async fn get_secret(
        &self,
        vault_base_url: &str,
        secret_name: &str,
        secret_version: &str,
    ) -> std::result::Result<SecretBundle, BoxError> {
        (**self)
            .get_secret(vault_base_url, secret_name, secret_version)
            .await
    }
}

type SharedError = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// Future producing a vault client, as returned by a client factory
pub type ClientFuture = BoxFuture<'static, std::result::Result<Arc<dyn VaultClient>, BoxError>>;

/// One-shot factory producing the vault client
pub(crate) type ClientFactory = Box<dyn FnOnce() -> ClientFuture + Send>;

type SharedClient = Shared<BoxFuture<'static, std::result::Result<Arc<dyn VaultClient>, SharedError>>>;

/// Resolves secrets from a vault through the injected client
#[derive(Clone)]
pub(crate) struct VaultBackend {
    urls: Arc<HashMap<String, String>>,
    client: SharedClient,
}

impl VaultBackend {
    /// Invoke the factory and memoize the resulting future
    ///
    /// The factory runs exactly once, here. The future it returns is not
    /// polled until the first lookup, and every lookup awaits the same
    /// shared outcome, so concurrent first calls construct one client.
    pub fn new(urls: HashMap<String, String>, factory: ClientFactory) -> Self {
        let client = factory()
            .map(|result| {
                result.map_err(|e| {
                    warn!(error = %e, "Failed to construct vault client");
                    SharedError::from(e)
                })
            })
            .boxed()
            .shared();

        Self {
            urls: Arc::new(urls),
            client,
        }
    }

    /// Base URL for a namespace
    pub fn url_for(&self, namespace: &str) -> Result<&str> {
        self.urls
            .get(namespace)
            .map(String::as_str)
            .ok_or_else(|| Error::UnknownNamespace {
                namespace: namespace.to_string(),
            })
    }

    /// Fetch the latest version of `key` from the vault at `vault_url`
    ///
    /// `vault_url` comes from [`url_for`](Self::url_for).
    pub async fn resolve(&self, vault_url: &str, key: &str) -> Result<SecretString> {
        let secret_name = vault_secret_name(key);

        let client = self.client.clone().await.map_err(Error::ClientInit)?;

        debug!(vault = %vault_url, secret = %secret_name, "Resolving secret from vault");
        let bundle = client
            .get_secret(vault_url, &secret_name, LATEST_VERSION)
            .await
            .map_err(Error::Vault)?;

        match bundle.value {
            Some(value) if !value.is_empty() => Ok(SecretString::new(value)),
            _ => Err(Error::missing_vault(&secret_name, vault_url)),
        }
    }
}

impl std::fmt::Debug for VaultBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut namespaces: Vec<&String> = self.urls.keys().collect();
        namespaces.sort();
        f.debug_struct("VaultBackend")
            .field("namespaces", &namespaces)
            .field("client_ready", &self.client.peek().is_some())
            .finish()
    }
}
