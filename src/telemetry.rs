//! Telemetry and observability utilities

#[cfg(feature = "metrics")]
use opentelemetry::{
    metrics::{Counter, Histogram},
    KeyValue,
};

/// Telemetry configuration
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Whether telemetry is enabled
    pub enabled: bool,
    /// Service name for metrics
    pub service_name: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            service_name: "vault-secrets-sdk".to_string(),
        }
    }
}

/// SDK metrics collector
#[derive(Clone)]
pub struct Metrics {
    #[cfg(feature = "metrics")]
    pub(crate) resolutions_total: Counter<u64>,

    #[cfg(feature = "metrics")]
    pub(crate) resolution_duration: Histogram<f64>,

    #[cfg(feature = "metrics")]
    pub(crate) errors_total: Counter<u64>,

    #[cfg(feature = "metrics")]
    pub(crate) cache_hits: Counter<u64>,

    #[cfg(feature = "metrics")]
    pub(crate) cache_misses: Counter<u64>,
}

impl Metrics {
    /// Create new metrics instance
    #[cfg(feature = "metrics")]
    pub fn new(config: &TelemetryConfig) -> Self {
        use opentelemetry::global;

        let meter = global::meter(config.service_name.clone());

        let resolutions_total = meter
            .u64_counter("vault_secrets_sdk.resolutions_total")
            .with_description("Total number of backend resolutions")
            .init();

        let resolution_duration = meter
            .f64_histogram("vault_secrets_sdk.resolution_duration_seconds")
            .with_description("Backend resolution duration in seconds")
            .init();

        let errors_total = meter
            .u64_counter("vault_secrets_sdk.errors_total")
            .with_description("Total number of failed resolutions")
            .init();

        let cache_hits = meter
            .u64_counter("vault_secrets_sdk.cache_hits_total")
            .with_description("Total number of cache hits")
            .init();

        let cache_misses = meter
            .u64_counter("vault_secrets_sdk.cache_misses_total")
            .with_description("Total number of cache misses")
            .init();

        Self {
            resolutions_total,
            resolution_duration,
            errors_total,
            cache_hits,
            cache_misses,
        }
    }

    /// Create a no-op metrics instance when feature is disabled
    #[cfg(not(feature = "metrics"))]
    pub fn new(_config: &TelemetryConfig) -> Self {
        Self {}
    }

    /// Record a backend resolution
    #[cfg(feature = "metrics")]
    pub fn record_resolution(&self, backend: &str, kind: Option<crate::ErrorKind>, duration_secs: f64) {
        let outcome = match kind {
            None => "ok",
            Some(crate::ErrorKind::Config) => "config",
            Some(crate::ErrorKind::UnknownNamespace) => "unknown_namespace",
            Some(crate::ErrorKind::MissingSecret) => "missing",
            Some(crate::ErrorKind::Transport) => "transport",
        };
        let labels = &[
            KeyValue::new("backend", backend.to_string()),
            KeyValue::new("outcome", outcome),
        ];

        self.resolutions_total.add(1, labels);
        self.resolution_duration.record(duration_secs, labels);

        if kind.is_some() {
            self.errors_total.add(
                1,
                &[
                    KeyValue::new("backend", backend.to_string()),
                    KeyValue::new("outcome", outcome),
                ],
            );
        }
    }

    /// Record a backend resolution (no-op when metrics disabled)
    #[cfg(not(feature = "metrics"))]
    pub fn record_resolution(&self, _backend: &str, _kind: Option<crate::ErrorKind>, _duration_secs: f64) {}

    /// Record a cache hit
    #[cfg(feature = "metrics")]
    pub fn record_cache_hit(&self, namespace: &str) {
        self.cache_hits
            .add(1, &[KeyValue::new("namespace", namespace.to_string())]);
    }

    /// Record a cache hit (no-op)
    #[cfg(not(feature = "metrics"))]
    pub fn record_cache_hit(&self, _namespace: &str) {}

    /// Record a cache miss
    #[cfg(feature = "metrics")]
    pub fn record_cache_miss(&self, namespace: &str) {
        self.cache_misses
            .add(1, &[KeyValue::new("namespace", namespace.to_string())]);
    }

    /// Record a cache miss (no-op)
    #[cfg(not(feature = "metrics"))]
    pub fn record_cache_miss(&self, _namespace: &str) {}
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics")
            .field("enabled", &cfg!(feature = "metrics"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_telemetry_config_default() {
        let config = TelemetryConfig::default();
        assert!(!config.enabled);
        assert_eq!(config.service_name, "vault-secrets-sdk");
    }

    #[test]
    fn test_metrics_recording() {
        let metrics = Metrics::new(&TelemetryConfig {
            enabled: true,
            ..Default::default()
        });

        // Without an installed meter provider these are no-ops
        metrics.record_cache_hit("NS1");
        metrics.record_cache_miss("NS1");
        metrics.record_resolution("env", None, 0.001);
        metrics.record_resolution("vault", Some(crate::ErrorKind::MissingSecret), 0.01);
    }
}
