//! Cache usage example for the vault secrets SDK
//!
//! Uses an in-memory vault so it runs without any infrastructure.

use anyhow::Result;
use async_trait::async_trait;
use secrecy::ExposeSecret;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use vault_secrets_sdk::{BoxError, Client, ClientBuilder, GetOpts, SecretBundle, VaultClient};

/// Vault stand-in with simulated network latency
#[derive(Default)]
struct DemoVault {
    secrets: Mutex<HashMap<String, String>>,
}

impl DemoVault {
    fn set(&self, name: &str, value: &str) {
        let _ = self
            .secrets
            .lock()
            .unwrap()
            .insert(name.to_string(), value.to_string());
    }
}

#[async_trait]
impl VaultClient for DemoVault {
    async fn get_secret(
        &self,
        _vault_base_url: &str,
        secret_name: &str,
        _secret_version: &str,
    ) -> Result<SecretBundle, BoxError> {
        tokio::time::sleep(Duration::from_millis(25)).await;
        let value = self.secrets.lock().unwrap().get(secret_name).cloned();
        Ok(SecretBundle { value, id: None })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let vault = Arc::new(DemoVault::default());
    vault.set("FEATURE-FLAGS", "checkout=on");

    let client = ClientBuilder::new()
        .url("cache-example", "https://cache-example.vault.example.com/")
        .use_vault(true)
        .use_cache(true)
        .vault_client(vault.clone())
        .build()?;

    // Example 1: Basic cache behavior
    println!("=== Example 1: Basic cache behavior ===");
    basic_cache_example(&client).await?;

    // Example 2: Bypassing the cache after a rotation
    println!("\n=== Example 2: Cache bypass ===");
    vault.set("FEATURE-FLAGS", "checkout=off");
    bypass_example(&client).await?;

    // Example 3: Statistics
    println!("\n=== Example 3: Cache statistics ===");
    let stats = client.cache_stats();
    println!("  Hits: {}, misses: {}", stats.hits(), stats.misses());
    println!("  Hit rate: {:.2}%", stats.hit_rate());

    Ok(())
}

async fn basic_cache_example(client: &Client) -> Result<()> {
    // First request - cache miss
    println!("First request (cache miss):");
    let start = Instant::now();
    let secret1 = client
        .get_secret("cache-example", "FEATURE_FLAGS", GetOpts::default())
        .await?;
    println!("  Value: {}", secret1.expose_secret());
    println!("  Time: {:?}", start.elapsed());

    // Second request - cache hit
    println!("\nSecond request (cache hit):");
    let start = Instant::now();
    let secret2 = client
        .get_secret("cache-example", "FEATURE_FLAGS", GetOpts::default())
        .await?;
    println!("  Value: {}", secret2.expose_secret());
    println!("  Time: {:?}", start.elapsed());

    Ok(())
}

async fn bypass_example(client: &Client) -> Result<()> {
    let cached = client
        .get_secret("cache-example", "FEATURE_FLAGS", GetOpts::default())
        .await?;
    println!("Cached value:  {}", cached.expose_secret());

    let fresh = client
        .get_secret("cache-example", "FEATURE_FLAGS", GetOpts::bypass_cache())
        .await?;
    println!("Fresh value:   {}", fresh.expose_secret());

    let after = client
        .get_secret("cache-example", "FEATURE_FLAGS", GetOpts::default())
        .await?;
    println!("Cached now:    {}", after.expose_secret());

    Ok(())
}
