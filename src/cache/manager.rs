// Result cache - memoizes extracted model output by composite key
// Author: kelexine (https://github.com/kelexine)

use crate::cache::models::{CacheKey, CacheStats};
use crate::metrics;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory result cache owned by one orchestrator.
///
/// Entries live as long as the instance: no eviction, no size bound and no
/// persistence. Writes are first-writer-wins, so a key never changes value
/// once stored.
#[derive(Clone)]
pub struct ResultCache {
    /// Label used in logs and metrics (`conversion`, `explanation`).
    name: &'static str,
    entries: Arc<RwLock<HashMap<CacheKey, String>>>,
    stats: Arc<RwLock<CacheStats>>,
}

impl ResultCache {
    /// Create a new, empty cache
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: Arc::new(RwLock::new(HashMap::new())),
            stats: Arc::new(RwLock::new(CacheStats::default())),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Look up a key, counting the hit or miss
    pub async fn get(&self, key: &CacheKey) -> Option<String> {
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(value) => {
                debug!("{} cache hit: {}", self.name, key);
                self.stats.write().await.hits += 1;
                metrics::record_cache_hit(self.name);
                Some(value.clone())
            }
            None => {
                debug!("{} cache miss: {}", self.name, key);
                self.stats.write().await.misses += 1;
                metrics::record_cache_miss(self.name);
                None
            }
        }
    }

    /// Look up a key without touching the statistics
    pub async fn peek(&self, key: &CacheKey) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }

    /// Store a value. Returns the value now held for the key, which is the
    /// earlier one if the key was already present.
    pub async fn insert(&self, key: CacheKey, value: String) -> String {
        let mut entries = self.entries.write().await;
        if let Some(existing) = entries.get(&key) {
            debug!("{} cache already holds {}, keeping first value", self.name, key);
            return existing.clone();
        }

        debug!("{} cache store: {}", self.name, key);
        entries.insert(key, value.clone());
        let len = entries.len();
        drop(entries);

        self.stats.write().await.stores += 1;
        metrics::record_cache_store(self.name);
        metrics::update_cache_entries(self.name, len);
        value
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Get cache statistics
    pub async fn get_stats(&self) -> CacheStats {
        self.stats.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_generation() {
        let key1 = CacheKey::conversion("JavaScript", "Python", "console.log(1)");
        let key2 = CacheKey::conversion("JavaScript", "Python", "console.log(1)");

        // Same inputs should produce same key
        assert_eq!(key1, key2);
        assert_eq!(key1.digest(), key2.digest());

        // Trailing whitespace and casing are significant
        assert_ne!(key1, CacheKey::conversion("JavaScript", "Python", "console.log(1) "));
        assert_ne!(key1, CacheKey::conversion("javascript", "Python", "console.log(1)"));

        // Direction matters
        assert_ne!(key1, CacheKey::conversion("Python", "JavaScript", "console.log(1)"));
    }

    #[test]
    fn test_explanation_key_is_its_own_space() {
        let key = CacheKey::explanation("Go", "fmt.Println(1)");
        assert_ne!(key, CacheKey::conversion("Go", "explanation", "fmt.Println(1)"));
    }

    #[test]
    fn test_digest_hides_source() {
        let key = CacheKey::conversion("Rust", "Go", "let secret = 42;");
        let digest = key.digest();
        assert_eq!(digest.len(), 16);
        assert!(!digest.contains("secret"));
        assert_eq!(format!("{}", key), digest);
    }

    #[tokio::test]
    async fn test_get_counts_hits_and_misses() {
        let cache = ResultCache::new("conversion");
        let key = CacheKey::conversion("Java", "Go", "class A {}");

        assert_eq!(cache.get(&key).await, None);
        cache.insert(key.clone(), "type A struct{}".to_string()).await;
        assert_eq!(cache.get(&key).await.as_deref(), Some("type A struct{}"));

        let stats = cache.get_stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.stores, 1);
    }

    #[tokio::test]
    async fn test_insert_keeps_first_value() {
        let cache = ResultCache::new("conversion");
        let key = CacheKey::conversion("Ruby", "PHP", "puts 1");

        let first = cache.insert(key.clone(), "echo 1;".to_string()).await;
        let second = cache.insert(key.clone(), "print 1;".to_string()).await;

        assert_eq!(first, "echo 1;");
        assert_eq!(second, "echo 1;");
        assert_eq!(cache.peek(&key).await.as_deref(), Some("echo 1;"));
        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.get_stats().await.stores, 1);
    }
}
