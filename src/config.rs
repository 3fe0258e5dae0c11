use crate::{
    env::{EnvBackend, EnvSource, ProcessEnv},
    errors::{BoxError, Result},
    models::BackendKind,
    telemetry::TelemetryConfig,
    util::validate_vault_url,
    vault::{ClientFactory, VaultBackend, VaultClient},
    Error,
};
use futures::future::FutureExt;
use serde::Deserialize;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

/// Client configuration, as validated by [`ClientBuilder::build`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Normalized vault base URL per namespace
    pub urls: HashMap<String, String>,
    /// Whether lookups use the cache unless overridden per call
    pub use_cache: bool,
    /// Backend the client resolves secrets from
    pub backend: BackendKind,
    /// Telemetry configuration
    pub telemetry_config: TelemetryConfig,
}

/// Serializable client options
///
/// Mirrors the builder for configuration loaded from a file or a JSON
/// document. Field names are snake_case; camelCase aliases are accepted.
///
/// # Example
///
/// ```
/// use vault_secrets_sdk::{ClientBuilder, ClientOptions};
///
/// let options = ClientOptions::from_value(serde_json::json!({
///     "urls": { "billing": "https://billing.vault.azure.net/" },
///     "useVault": false,
///     "useCache": true
/// }))?;
/// let client = ClientBuilder::from_options(options).build()?;
/// assert!(client.config().use_cache);
/// # Ok::<(), vault_secrets_sdk::Error>(())
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientOptions {
    /// Vault base URL per namespace, in document order
    #[serde(default)]
    pub urls: IndexMap<String, String>,
    /// Default cache setting
    #[serde(default, alias = "useCache")]
    pub use_cache: Option<bool>,
    /// Use the vault backend instead of the environment
    #[serde(default, alias = "useVault")]
    pub use_vault: Option<bool>,
}

impl ClientOptions {
    /// Parse options from a JSON value
    ///
    /// The value must be an object. A `client` entry is rejected: the vault
    /// client factory is code and can only be supplied through
    /// [`ClientBuilder::client`].
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let Some(object) = value.as_object() else {
            return Err(Error::Config(
                "You must pass an options object to the constructor.".to_string(),
            ));
        };

        if object.contains_key("client") {
            return Err(Error::Config(
                "The client option must be a function that returns the vault client".to_string(),
            ));
        }

        serde_json::from_value(value)
            .map_err(|e| Error::Config(format!("Invalid client options: {}", e)))
    }
}

/// Builder for creating a configured Client
pub struct ClientBuilder {
    urls: Vec<(String, String)>,
    use_cache: Option<bool>,
    use_vault: Option<bool>,
    client_factory: Option<ClientFactory>,
    env_source: Option<Arc<dyn EnvSource>>,
    telemetry_config: TelemetryConfig,
}

impl std::fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("urls", &self.urls)
            .field("use_cache", &self.use_cache)
            .field("use_vault", &self.use_vault)
            .field("client_factory", &self.client_factory.is_some())
            .field("env_source", &self.env_source)
            .finish()
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientBuilder {
    /// Create a new client builder with no namespaces configured
    pub fn new() -> Self {
        Self {
            urls: Vec::new(),
            use_cache: None,
            use_vault: None,
            client_factory: None,
            env_source: None,
            telemetry_config: TelemetryConfig::default(),
        }
    }

    /// Create a builder pre-filled from deserialized options
    pub fn from_options(options: ClientOptions) -> Self {
        let mut builder = Self::new().urls(options.urls);
        builder.use_cache = options.use_cache;
        builder.use_vault = options.use_vault;
        builder
    }

    /// Map a namespace to its vault base URL
    ///
    /// # Arguments
    ///
    /// * `namespace` - Namespace identifier used in lookups
    /// * `url` - Absolute vault URL (e.g., `"https://billing.vault.azure.net"`)
    pub fn url(mut self, namespace: impl Into<String>, url: impl Into<String>) -> Self {
        self.urls.push((namespace.into(), url.into()));
        self
    }

    /// Map several namespaces at once
    pub fn urls<I, K, V>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.urls
            .extend(urls.into_iter().map(|(ns, url)| (ns.into(), url.into())));
        self
    }

    /// Enable or disable caching by default (disabled unless set)
    pub fn use_cache(mut self, enabled: bool) -> Self {
        self.use_cache = Some(enabled);
        self
    }

    /// Select the vault backend (`true`) or the environment backend (`false`)
    ///
    /// When unset, the vault backend is used if the platform marker
    /// variable [`PLATFORM_MARKER_ENV`](crate::PLATFORM_MARKER_ENV) is set.
    pub fn use_vault(mut self, enabled: bool) -> Self {
        self.use_vault = Some(enabled);
        self
    }

    /// Set the factory that constructs the vault client
    ///
    /// The factory is called once, when the client is built with the vault
    /// backend. The future it returns is awaited on the first lookup and its
    /// outcome shared by all later lookups.
    pub fn client<F, Fut>(mut self, factory: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = std::result::Result<Arc<dyn VaultClient>, BoxError>> + Send + 'static,
    {
        self.client_factory = Some(Box::new(move || factory().boxed()));
        self
    }

    /// Use an already constructed vault client
    pub fn vault_client(self, client: impl VaultClient + 'static) -> Self {
        let client: Arc<dyn VaultClient> = Arc::new(client);
        self.client(move || async move { Ok::<_, BoxError>(client) })
    }

    /// Read environment variables through a custom source
    ///
    /// Affects both the environment backend and the platform marker check.
    pub fn env_source(mut self, source: impl EnvSource + 'static) -> Self {
        self.env_source = Some(Arc::new(source));
        self
    }

    /// Configure telemetry/metrics
    #[cfg(feature = "metrics")]
    pub fn with_telemetry(mut self, config: TelemetryConfig) -> Self {
        self.telemetry_config = config;
        self
    }

    /// Enable telemetry with default settings
    #[cfg(feature = "metrics")]
    pub fn enable_telemetry(mut self) -> Self {
        self.telemetry_config.enabled = true;
        self
    }

    /// Build the client with the configured options
    ///
    /// # Errors
    ///
    /// * `Error::Config` if no namespace is configured, or if the vault
    ///   backend is selected without a client factory
    /// * `Error::InvalidUrl` for the first URL that is not absolute
    pub fn build(self) -> Result<crate::Client> {
        if self.urls.is_empty() {
            return Err(Error::Config(
                "urls parameter must be defined and have at least one entry".to_string(),
            ));
        }

        let mut urls = HashMap::with_capacity(self.urls.len());
        for (namespace, url) in &self.urls {
            let _ = urls.insert(namespace.clone(), validate_vault_url(url)?);
        }

        let env_source = self.env_source.unwrap_or_else(|| Arc::new(ProcessEnv));
        let use_vault = self
            .use_vault
            .unwrap_or_else(|| platform_marker_present(env_source.as_ref()));

        let backend = if use_vault {
            let factory = self.client_factory.ok_or_else(|| {
                Error::Config(
                    "A vault client is required for the vault backend. Use .client() to set a factory"
                        .to_string(),
                )
            })?;
            crate::client::Backend::Vault(VaultBackend::new(urls.clone(), factory))
        } else {
            crate::client::Backend::Env(EnvBackend::new(env_source))
        };

        let config = ClientConfig {
            urls,
            use_cache: self.use_cache.unwrap_or(false),
            backend: backend.kind(),
            telemetry_config: self.telemetry_config,
        };

        Ok(crate::client::Client::new(config, backend))
    }
}

fn platform_marker_present(env: &dyn EnvSource) -> bool {
    env.var(crate::PLATFORM_MARKER_ENV)
        .map_or(false, |value| !value.is_empty())
}
