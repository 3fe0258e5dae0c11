use async_trait::async_trait;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::Duration;
use tokio::runtime::Runtime;
use vault_secrets_sdk::{
    BoxError, Client, ClientBuilder, GetOpts, MemoryEnv, SecretBundle, VaultClient,
};

/// Vault stand-in with a fixed response latency
struct SlowVault {
    latency: Duration,
}

#[async_trait]
impl VaultClient for SlowVault {
    async fn get_secret(
        &self,
        _vault_base_url: &str,
        secret_name: &str,
        _secret_version: &str,
    ) -> Result<SecretBundle, BoxError> {
        tokio::time::sleep(self.latency).await;
        Ok(SecretBundle::new(format!("value-of-{}", secret_name)))
    }
}

fn vault_client(use_cache: bool) -> Client {
    ClientBuilder::new()
        .url("benchmark", "https://benchmark.vault.example.com")
        .use_vault(true)
        .use_cache(use_cache)
        .vault_client(SlowVault {
            latency: Duration::from_millis(1),
        })
        .build()
        .expect("Failed to build client")
}

fn bench_env_lookup(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let env = MemoryEnv::from_iter([("BENCHMARK_TEST_KEY", "test-value")]);
    let client = ClientBuilder::new()
        .url("benchmark", "https://benchmark.vault.example.com")
        .use_vault(false)
        .env_source(env)
        .build()
        .expect("Failed to build client");

    let client = &client;
    c.bench_function("env_get_secret", |b| {
        b.to_async(&rt).iter(|| async move {
            let secret = client
                .get_secret("benchmark", "TEST_KEY", GetOpts::default())
                .await
                .expect("Failed to get secret");
            black_box(secret);
        });
    });
}

fn bench_vault_cache(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("vault_get_secret");

    for use_cache in [false, true] {
        let client = &vault_client(use_cache);
        group.bench_with_input(
            BenchmarkId::new("use_cache", use_cache),
            &use_cache,
            |b, _| {
                b.to_async(&rt).iter(|| async move {
                    let secret = client
                        .get_secret("benchmark", "test_key", GetOpts::default())
                        .await
                        .expect("Failed to get secret");
                    black_box(secret);
                });
            },
        );
    }

    group.finish();
}

fn bench_concurrent_requests(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let client = vault_client(true);

    let mut group = c.benchmark_group("concurrent_requests");

    for concurrency in [1, 5, 10, 20].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(concurrency),
            concurrency,
            |b, &concurrency| {
                b.iter(|| {
                    rt.block_on(async {
                        let mut tasks = Vec::new();

                        for i in 0..concurrency {
                            let client = client.clone();
                            let task = tokio::spawn(async move {
                                client
                                    .get_secret(
                                        "benchmark",
                                        &format!("key_{}", i),
                                        GetOpts::default(),
                                    )
                                    .await
                                    .expect("Failed to get secret")
                            });
                            tasks.push(task);
                        }

                        // Wait for all tasks to complete
                        for task in tasks {
                            let _ = task.await.expect("Task panicked");
                        }
                    });
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_env_lookup,
    bench_vault_cache,
    bench_concurrent_requests
);
criterion_main!(benches);
