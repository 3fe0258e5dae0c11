//! Utility functions

use crate::errors::{Error, Result};

/// Validate a vault base URL and normalize it
///
/// The URL must be absolute. The canonical form is returned with a single
/// trailing slash removed, since vault clients build request paths by plain
/// concatenation and choke on `//`.
pub fn validate_vault_url(url: &str) -> Result<String> {
    let parsed = url::Url::parse(url).map_err(|source| Error::InvalidUrl {
        url: url.to_string(),
        source,
    })?;

    let canonical = parsed.as_str();
    Ok(canonical
        .strip_suffix('/')
        .unwrap_or(canonical)
        .to_string())
}

/// Environment variable name for a namespaced key: `<NAMESPACE>_<key>`
pub fn env_var_name(namespace: &str, key: &str) -> String {
    format!("{}_{}", namespace.to_uppercase(), key)
}

/// Vault secret name for a key
///
/// Vault secret names allow only alphanumerics and dashes, so underscores
/// become hyphens. This lets one key work for both backends.
pub fn vault_secret_name(key: &str) -> String {
    key.replace('_', "-")
}
