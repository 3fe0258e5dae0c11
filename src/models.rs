//! Data models for the vault secrets SDK
//!
//! * [`GetOpts`] - per-call options for [`Client::get_secret`](crate::Client::get_secret)
//! * [`SecretBundle`] - what a [`VaultClient`](crate::VaultClient) returns
//! * [`BackendKind`] - which backend a client was built with

use serde::{Deserialize, Serialize};

/// Options for getting a secret
///
/// # Example
///
/// ```
/// use vault_secrets_sdk::GetOpts;
///
/// // Follow the client's cache setting
/// let opts = GetOpts::default();
///
/// // Force a fresh lookup for this call only
/// let opts = GetOpts::bypass_cache();
/// assert_eq!(opts.use_cache, Some(false));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetOpts {
    /// Per-call cache override; `None` uses the client's default
    pub use_cache: Option<bool>,
}

impl GetOpts {
    /// Serve from cache when possible, regardless of the client default
    pub fn cached() -> Self {
        Self {
            use_cache: Some(true),
        }
    }

    /// Always hit the backend for this call
    pub fn bypass_cache() -> Self {
        Self {
            use_cache: Some(false),
        }
    }
}

/// A secret as returned by a vault client
///
/// `value` is `None` when the vault answered but has nothing stored under
/// the requested name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SecretBundle {
    /// Secret value
    pub value: Option<String>,
    /// Secret identifier, if the vault reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl SecretBundle {
    /// Bundle carrying a value
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            id: None,
        }
    }

    /// Bundle with no value
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Backend a client resolves secrets from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Process environment variables
    Env,
    /// Remote secret vault
    Vault,
}

impl BackendKind {
    /// Short name used in logs and metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Env => "env",
            BackendKind::Vault => "vault",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_opts_default() {
        assert_eq!(GetOpts::default().use_cache, None);
        assert_eq!(GetOpts::cached().use_cache, Some(true));
    }

    #[test]
    fn test_secret_bundle_deserialize() {
        let bundle: SecretBundle = serde_json::from_value(serde_json::json!({
            "value": "s3cr3t",
            "id": "https://ns1.vault.azure.net/secrets/KEY-ONE/abc"
        }))
        .unwrap();
        assert_eq!(bundle.value.as_deref(), Some("s3cr3t"));

        let bundle: SecretBundle = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(bundle, SecretBundle::empty());
    }
}
