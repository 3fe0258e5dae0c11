//! Environment variable backend
//!
//! Secrets are read from variables named `<NAMESPACE>_<key>`, with the
//! namespace upper-cased and the key used verbatim. Variable access goes
//! through [`EnvSource`] so the backend can be exercised without touching
//! the real process environment.
//!
//! # Example
//!
//! ```
//! use vault_secrets_sdk::{EnvSource, MemoryEnv};
//!
//! let env = MemoryEnv::new();
//! env.set("BILLING_API_KEY", "sk-123");
//! assert_eq!(env.var("BILLING_API_KEY").as_deref(), Some("sk-123"));
//! ```

use crate::errors::{Error, Result};
use crate::util::env_var_name;
use secrecy::SecretString;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// Read access to a set of environment variables
pub trait EnvSource: Send + Sync + std::fmt::Debug {
    /// Get the value of a variable, or `None` if it is not set
    fn var(&self, name: &str) -> Option<String>;
}

/// The real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// In-memory environment shared between clones
///
/// Useful in tests and when secrets are loaded from somewhere other than
/// the process environment. Updates through any clone are visible to all.
#[derive(Debug, Clone, Default)]
pub struct MemoryEnv {
    vars: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryEnv {
    /// Create an empty environment
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable
    pub fn set(&self, name: impl Into<String>, value: impl Into<String>) {
        let mut vars = self.vars.write().unwrap_or_else(PoisonError::into_inner);
        let _ = vars.insert(name.into(), value.into());
    }

    /// Remove a variable
    pub fn remove(&self, name: &str) {
        let mut vars = self.vars.write().unwrap_or_else(PoisonError::into_inner);
        let _ = vars.remove(name);
    }
}

impl<K, V> FromIterator<(K, V)> for MemoryEnv
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let vars = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            vars: Arc::new(RwLock::new(vars)),
        }
    }
}

impl EnvSource for MemoryEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.vars
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }
}

/// Resolves secrets from environment variables
#[derive(Debug, Clone)]
pub(crate) struct EnvBackend {
    source: Arc<dyn EnvSource>,
}

impl EnvBackend {
    pub fn new(source: Arc<dyn EnvSource>) -> Self {
        Self { source }
    }

    /// Look up `<NAMESPACE>_<key>`
    ///
    /// Unset and empty variables are both reported as missing, unlike a
    /// plain `std::env::var` read where `""` is a valid value.
    pub async fn resolve(&self, namespace: &str, key: &str) -> Result<SecretString> {
        let var_name = env_var_name(namespace, key);
        debug!(var = %var_name, "Resolving secret from environment");

        match self.source.var(&var_name) {
            Some(value) if !value.is_empty() => Ok(SecretString::new(value)),
            _ => Err(Error::missing_env(&var_name)),
        }
    }
}
