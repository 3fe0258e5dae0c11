use moka::future::Cache;
use secrecy::SecretString;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::trace;

/// Cache statistics
#[derive(Debug, Clone)]
pub struct CacheStats {
    inner: Arc<CacheStatsInner>,
}

#[derive(Debug, Default)]
struct CacheStatsInner {
    hits: AtomicU64,
    misses: AtomicU64,
    insertions: AtomicU64,
}

impl CacheStats {
    /// Create new cache statistics
    pub(crate) fn new() -> Self {
        Self {
            inner: Arc::new(CacheStatsInner::default()),
        }
    }

    /// Get the number of cache hits
    pub fn hits(&self) -> u64 {
        self.inner.hits.load(Ordering::Relaxed)
    }

    /// Get the number of cache misses
    pub fn misses(&self) -> u64 {
        self.inner.misses.load(Ordering::Relaxed)
    }

    /// Get the number of cache insertions
    pub fn insertions(&self) -> u64 {
        self.inner.insertions.load(Ordering::Relaxed)
    }

    /// Get the hit rate as a percentage (0.0-100.0)
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits();
        let total = hits + self.misses();
        if total == 0 {
            0.0
        } else {
            (hits as f64 / total as f64) * 100.0
        }
    }

    /// Reset all statistics to zero
    pub fn reset(&self) {
        self.inner.hits.store(0, Ordering::Relaxed);
        self.inner.misses.store(0, Ordering::Relaxed);
        self.inner.insertions.store(0, Ordering::Relaxed);
    }

    pub(crate) fn record_hit(&self) {
        let _ = self.inner.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        let _ = self.inner.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_insertion(&self) {
        let _ = self.inner.insertions.fetch_add(1, Ordering::Relaxed);
    }
}

/// Cache key for a (namespace, key) pair
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct CacheKey {
    namespace: String,
    key: String,
}

impl CacheKey {
    pub fn new(namespace: &str, key: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            key: key.to_string(),
        }
    }
}

/// Last-resolved secret per (namespace, key)
///
/// Unbounded and never expires: an entry is replaced only by a newer
/// successful resolution of the same pair.
#[derive(Clone)]
pub(crate) struct SecretCache {
    entries: Cache<CacheKey, SecretString>,
    stats: CacheStats,
}

impl SecretCache {
    pub fn new() -> Self {
        Self {
            entries: Cache::builder().build(),
            stats: CacheStats::new(),
        }
    }

    pub async fn get(&self, namespace: &str, key: &str) -> Option<SecretString> {
        match self.entries.get(&CacheKey::new(namespace, key)).await {
            Some(value) => {
                trace!(namespace, key, "Cache hit");
                self.stats.record_hit();
                Some(value)
            }
            None => {
                trace!(namespace, key, "Cache miss");
                self.stats.record_miss();
                None
            }
        }
    }

    pub async fn insert(&self, namespace: &str, key: &str, value: SecretString) {
        self.entries
            .insert(CacheKey::new(namespace, key), value)
            .await;
        self.stats.record_insertion();
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
}

impl std::fmt::Debug for SecretCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretCache")
            .field("entries", &self.entries.entry_count())
            .field("stats", &self.stats)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_cache_stats() {
        let stats = CacheStats::new();

        // Initial state
        assert_eq!(stats.hits(), 0);
        assert_eq!(stats.misses(), 0);
        assert_eq!(stats.hit_rate(), 0.0);

        stats.record_hit();
        stats.record_hit();
        stats.record_miss();

        assert_eq!(stats.hits(), 2);
        assert_eq!(stats.misses(), 1);
        assert!((stats.hit_rate() - 200.0 / 3.0).abs() < 1e-9);

        stats.reset();
        assert_eq!(stats.hits(), 0);
        assert_eq!(stats.misses(), 0);
    }

    #[tokio::test]
    async fn test_get_returns_last_insert() {
        let cache = SecretCache::new();
        assert!(cache.get("ns1", "KEY").await.is_none());

        cache
            .insert("ns1", "KEY", SecretString::new("first".to_string()))
            .await;
        cache
            .insert("ns1", "KEY", SecretString::new("second".to_string()))
            .await;

        let value = cache.get("ns1", "KEY").await.unwrap();
        assert_eq!(value.expose_secret(), "second");
        assert_eq!(cache.stats().insertions(), 2);
        assert_eq!(cache.stats().hits(), 1);
        assert_eq!(cache.stats().misses(), 1);
    }

    #[tokio::test]
    async fn test_keys_do_not_collide() {
        let cache = SecretCache::new();
        cache
            .insert("a_b", "c", SecretString::new("one".to_string()))
            .await;

        // Same concatenation, different pair
        assert!(cache.get("a", "b_c").await.is_none());
        assert!(cache.get("A_B", "c").await.is_none());
    }
}
