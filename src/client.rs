//! Secret retrieval client
//!
//! This module contains the [`Client`] returned by
//! [`ClientBuilder::build`](crate::ClientBuilder::build).
//!
//! # Architecture
//!
//! - **Backend**: exactly one of the environment or vault backends, chosen
//!   when the client is built and never switched afterwards
//! - **Caching Layer**: an unbounded `moka` cache of the last resolved value
//!   per (namespace, key), consulted only when the call asks for it
//! - **Telemetry**: optional OpenTelemetry counters behind the `metrics`
//!   feature
//!
//! Concurrent lookups of the same cold key are not coalesced: each one
//! reaches the backend.
//!
//! # Examples
//!
//! ```no_run
//! use secrecy::ExposeSecret;
//! use vault_secrets_sdk::{ClientBuilder, GetOpts};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ClientBuilder::new()
//!     .url("billing", "https://billing.vault.azure.net")
//!     .use_vault(false)
//!     .use_cache(true)
//!     .build()?;
//!
//! // Reads BILLING_API_KEY
//! let secret = client.get_secret("billing", "API_KEY", GetOpts::default()).await?;
//! println!("{} chars", secret.expose_secret().len());
//! # Ok(())
//! # }
//! ```

use crate::{
    cache::{CacheStats, SecretCache},
    config::ClientConfig,
    env::EnvBackend,
    errors::{Error, Result},
    models::{BackendKind, GetOpts},
    telemetry::Metrics,
    vault::VaultBackend,
};
use secrecy::SecretString;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Backend selected at build time
#[derive(Debug, Clone)]
pub(crate) enum Backend {
    Env(EnvBackend),
    Vault(VaultBackend),
}

impl Backend {
    pub fn kind(&self) -> BackendKind {
        match self {
            Backend::Env(_) => BackendKind::Env,
            Backend::Vault(_) => BackendKind::Vault,
        }
    }

    /// Pick where a lookup goes, rejecting namespaces the backend can never serve
    fn target(&self, namespace: &str) -> Result<Target<'_>> {
        match self {
            Backend::Env(env) => Ok(Target::Env(env)),
            Backend::Vault(vault) => Ok(Target::Vault(vault, vault.url_for(namespace)?)),
        }
    }
}

/// A backend with the namespace already resolved
enum Target<'a> {
    Env(&'a EnvBackend),
    Vault(&'a VaultBackend, &'a str),
}

impl Target<'_> {
    async fn resolve(&self, namespace: &str, key: &str) -> Result<SecretString> {
        match self {
            Target::Env(env) => env.resolve(namespace, key).await,
            Target::Vault(vault, vault_url) => vault.resolve(vault_url, key).await,
        }
    }
}

/// Secret retrieval client
///
/// Cheap to clone; clones share the backend, the vault client and the
/// cache.
#[derive(Clone)]
pub struct Client {
    config: Arc<ClientConfig>,
    backend: Backend,
    cache: SecretCache,
    metrics: Option<Arc<Metrics>>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("backend", &self.backend)
            .field("use_cache", &self.config.use_cache)
            .field("cache", &self.cache)
            .finish()
    }
}

impl Client {
    pub(crate) fn new(config: ClientConfig, backend: Backend) -> Self {
        let metrics = config
            .telemetry_config
            .enabled
            .then(|| Arc::new(Metrics::new(&config.telemetry_config)));

        Self {
            config: Arc::new(config),
            backend,
            cache: SecretCache::new(),
            metrics,
        }
    }

    /// The validated configuration this client was built with
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Backend this client resolves secrets from
    pub fn backend(&self) -> BackendKind {
        self.backend.kind()
    }

    /// Get cache statistics
    ///
    /// Only lookups that consult the cache count as hits or misses.
    pub fn cache_stats(&self) -> &CacheStats {
        self.cache.stats()
    }

    /// Get a secret
    ///
    /// Resolves `key` in `namespace` from the configured backend. When the
    /// effective cache setting is on (`opts.use_cache`, falling back to the
    /// client default) and a value was resolved before, that value is
    /// returned without contacting the backend. Every successful resolution
    /// is stored in the cache, including ones that bypassed it.
    ///
    /// # Errors
    ///
    /// * `Error::UnknownNamespace` if the vault backend has no URL for `namespace`
    /// * `Error::MissingSecret` if the backend has no value for `key`
    /// * `Error::Vault` / `Error::ClientInit` for failures of the vault client
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use vault_secrets_sdk::{Client, GetOpts};
    /// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
    /// // Follow the client's cache setting
    /// let secret = client.get_secret("billing", "API_KEY", GetOpts::default()).await?;
    ///
    /// // Always read the current value
    /// let fresh = client.get_secret("billing", "API_KEY", GetOpts::bypass_cache()).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_secret(&self, namespace: &str, key: &str, opts: GetOpts) -> Result<SecretString> {
        let target = self.backend.target(namespace)?;

        let use_cache = opts.use_cache.unwrap_or(self.config.use_cache);
        if use_cache {
            if let Some(secret) = self.cache.get(namespace, key).await {
                debug!(namespace, key, "Serving secret from cache");
                if let Some(metrics) = &self.metrics {
                    metrics.record_cache_hit(namespace);
                }
                return Ok(secret);
            }
            if let Some(metrics) = &self.metrics {
                metrics.record_cache_miss(namespace);
            }
        }

        let start_time = Instant::now();
        let result = target.resolve(namespace, key).await;

        if let Some(metrics) = &self.metrics {
            metrics.record_resolution(
                self.backend.kind().as_str(),
                result.as_ref().err().map(Error::kind),
                start_time.elapsed().as_secs_f64(),
            );
        }

        let secret = result?;
        self.cache.insert(namespace, key, secret.clone()).await;
        debug!(namespace, key, backend = %self.backend.kind(), "Resolved secret");

        Ok(secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{env::MemoryEnv, BoxError, ClientBuilder, SecretBundle, VaultClient};
    use async_trait::async_trait;
    use secrecy::ExposeSecret;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn env_client(env: &MemoryEnv, use_cache: bool) -> Client {
        ClientBuilder::new()
            .url("NS1", "http://www.vault.com")
            .use_vault(false)
            .use_cache(use_cache)
            .env_source(env.clone())
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_uncached_client_sees_changes() {
        let env = MemoryEnv::from_iter([("NS1_TEST", "V1")]);
        let client = env_client(&env, false);

        let secret = client.get_secret("NS1", "TEST", GetOpts::default()).await.unwrap();
        assert_eq!(secret.expose_secret(), "V1");

        env.set("NS1_TEST", "V2");
        let secret = client.get_secret("NS1", "TEST", GetOpts::default()).await.unwrap();
        assert_eq!(secret.expose_secret(), "V2");

        // The cache was never consulted
        assert_eq!(client.cache_stats().hits(), 0);
        assert_eq!(client.cache_stats().misses(), 0);
    }

    #[tokio::test]
    async fn test_cached_client_keeps_first_value() {
        let env = MemoryEnv::from_iter([("NS1_TEST", "V1")]);
        let client = env_client(&env, true);

        let secret = client.get_secret("NS1", "TEST", GetOpts::default()).await.unwrap();
        assert_eq!(secret.expose_secret(), "V1");

        env.set("NS1_TEST", "V2");
        let secret = client.get_secret("NS1", "TEST", GetOpts::default()).await.unwrap();
        assert_eq!(secret.expose_secret(), "V1");

        assert_eq!(client.cache_stats().hits(), 1);
        assert_eq!(client.cache_stats().misses(), 1);
    }

    #[tokio::test]
    async fn test_failed_lookup_is_not_cached() {
        let env = MemoryEnv::new();
        let client = env_client(&env, true);

        assert!(client.get_secret("NS1", "LATE", GetOpts::default()).await.is_err());
        assert_eq!(client.cache_stats().insertions(), 0);

        env.set("NS1_LATE", "now-set");
        let secret = client.get_secret("NS1", "LATE", GetOpts::default()).await.unwrap();
        assert_eq!(secret.expose_secret(), "now-set");
    }

    struct CountingVault {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl VaultClient for CountingVault {
        async fn get_secret(
            &self,
            _vault_base_url: &str,
            _secret_name: &str,
            _secret_version: &str,
        ) -> std::result::Result<SecretBundle, BoxError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(SecretBundle::new(format!("value-{}", n)))
        }
    }

    #[tokio::test]
    async fn test_unknown_namespace_checked_before_cache() {
        let vault = Arc::new(CountingVault {
            calls: AtomicUsize::new(0),
        });
        let client = ClientBuilder::new()
            .url("NS1", "http://www.ns1-vault.com")
            .use_vault(true)
            .use_cache(true)
            .vault_client(vault.clone())
            .build()
            .unwrap();

        let err = client.get_secret("NS2", "KEY", GetOpts::default()).await.unwrap_err();
        assert!(matches!(err, Error::UnknownNamespace { .. }));
        assert_eq!(client.cache_stats().misses(), 0);
        assert_eq!(vault.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_clones_share_cache() {
        let vault = Arc::new(CountingVault {
            calls: AtomicUsize::new(0),
        });
        let client = ClientBuilder::new()
            .url("NS1", "http://www.ns1-vault.com")
            .use_vault(true)
            .use_cache(true)
            .vault_client(vault.clone())
            .build()
            .unwrap();
        let other = client.clone();

        let first = client.get_secret("NS1", "KEY", GetOpts::default()).await.unwrap();
        let second = other.get_secret("NS1", "KEY", GetOpts::default()).await.unwrap();
        assert_eq!(first.expose_secret(), "value-1");
        assert_eq!(second.expose_secret(), "value-1");
        assert_eq!(vault.calls.load(Ordering::SeqCst), 1);
    }
}
