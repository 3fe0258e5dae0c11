//! Vault Secrets SDK for Rust
//!
//! A small facade for reading secrets by namespace and key, from either the
//! process environment or a remote secret vault. The backend is chosen once,
//! when the client is built, so the same lookup code runs unchanged in local
//! development (environment variables) and in production (vault).
//!
//! # Features
//!
//! - Environment backend reading `<NAMESPACE>_<key>` variables
//! - Vault backend over an injected, lazily constructed [`VaultClient`]
//! - Optional in-memory cache with per-call bypass
//! - Namespace and URL validation up front
//! - Secure value handling with [`SecretString`]
//!
//! # Example
//!
//! ```no_run
//! use secrecy::ExposeSecret;
//! use vault_secrets_sdk::{ClientBuilder, GetOpts};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ClientBuilder::new()
//!         .url("billing", "https://billing.vault.azure.net/")
//!         .url("search", "https://search.vault.azure.net/")
//!         .use_cache(true)
//!         .build()?;
//!
//!     let secret = client.get_secret("billing", "API_KEY", GetOpts::default()).await?;
//!     println!("API key has {} chars", secret.expose_secret().len());
//!
//!     Ok(())
//! }
//! ```

#![deny(
    missing_docs,
    missing_debug_implementations,
    unsafe_code,
    unused_results
)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod cache;
mod client;
mod config;
mod env;
mod errors;
mod models;
/// Telemetry and observability support
#[cfg(feature = "metrics")]
pub mod telemetry;

#[cfg(not(feature = "metrics"))]
mod telemetry;
mod util;
mod vault;

pub use cache::CacheStats;
pub use client::Client;
pub use config::{ClientBuilder, ClientConfig, ClientOptions};
pub use env::{EnvSource, MemoryEnv, ProcessEnv};
pub use errors::{BoxError, Error, ErrorKind, Result};
pub use models::*;
pub use util::{env_var_name, validate_vault_url, vault_secret_name};
pub use vault::{ClientFuture, VaultClient, LATEST_VERSION};

// Re-export commonly used types
pub use secrecy::SecretString;

/// SDK version, matches Cargo.toml version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable whose presence selects the vault backend by default
///
/// Set by the hosting platform on deployed instances.
pub const PLATFORM_MARKER_ENV: &str = "APPSETTING_WEBSITE_SITE_NAME";
