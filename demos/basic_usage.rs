//! Basic usage example for the vault secrets SDK
//!
//! Run with `NS1_DATABASE_URL=postgres://localhost/db cargo run --example basic_usage`.

use secrecy::ExposeSecret;
use vault_secrets_sdk::{Client, ClientBuilder, ClientOptions, Error, GetOpts};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Initialize the client
    let client = create_client()?;
    println!("Resolving secrets from the {} backend", client.backend());

    // Example 1: Get a secret
    println!("=== Example 1: Get a secret ===");
    get_secret_example(&client).await?;

    // Example 2: Handle a missing secret
    println!("\n=== Example 2: Missing secret ===");
    missing_secret_example(&client).await;

    // Example 3: Options from a config document
    println!("\n=== Example 3: Client from options ===");
    options_example()?;

    Ok(())
}

fn create_client() -> Result<Client, Box<dyn std::error::Error>> {
    let vault_url = std::env::var("NS1_VAULT_URL")
        .unwrap_or_else(|_| "https://ns1.vault.example.com/".to_string());

    // No platform marker locally, so this picks the environment backend
    let client = ClientBuilder::new().url("NS1", vault_url).build()?;

    Ok(client)
}

async fn get_secret_example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
    match client
        .get_secret("NS1", "DATABASE_URL", GetOpts::default())
        .await
    {
        Ok(secret) => println!("DATABASE_URL has {} chars", secret.expose_secret().len()),
        Err(e) if e.is_missing() => println!("Set NS1_DATABASE_URL to run this example"),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

async fn missing_secret_example(client: &Client) {
    match client
        .get_secret("NS1", "DOES_NOT_EXIST", GetOpts::default())
        .await
    {
        Ok(_) => println!("Unexpectedly found a value"),
        Err(Error::MissingSecret { name, .. }) => println!("{} is not set", name),
        Err(e) => println!("Lookup failed: {}", e),
    }
}

fn options_example() -> Result<(), Box<dyn std::error::Error>> {
    let options = ClientOptions::from_value(serde_json::json!({
        "urls": {
            "NS1": "https://ns1.vault.example.com/",
            "NS2": "https://ns2.vault.example.com"
        },
        "use_vault": false,
        "use_cache": true
    }))?;

    let client = ClientBuilder::from_options(options).build()?;
    let mut namespaces: Vec<_> = client.config().urls.iter().collect();
    namespaces.sort();
    for (namespace, url) in namespaces {
        println!("  {} -> {}", namespace, url);
    }

    Ok(())
}
