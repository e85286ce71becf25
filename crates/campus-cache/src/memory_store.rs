//! In-memory cache store for tests and cache-disabled deployments.

use super::CacheStore;
use async_trait::async_trait;
use metrics::counter;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::debug;

struct Entry {
    value: String,
    expires_at: Instant,
}

impl Entry {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// In-memory cache store with per-entry TTL expiration.
///
/// Single-process only; used as a test double and as the backing store when
/// a deployment runs without Redis but still wants request-local caching.
/// Pattern deletion supports the same trailing-wildcard shapes the services
/// mint (`prefix:*`).
#[derive(Default)]
pub struct MemoryCacheStore {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryCacheStore {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (unexpired) entries. Test helper.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().values().filter(|e| !e.is_expired()).count()
    }

    /// Whether the store holds no live entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn matches(pattern: &str, key: &str) -> bool {
        match pattern.strip_suffix('*') {
            Some(prefix) => key.starts_with(prefix),
            None => key == pattern,
        }
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn get_raw(&self, key: &str) -> Option<String> {
        {
            let entries = self.entries.read();
            if let Some(entry) = entries.get(key) {
                if !entry.is_expired() {
                    debug!("Cache hit for key '{}'", key);
                    counter!("campus_cache_hits_total").increment(1);
                    return Some(entry.value.clone());
                }
            } else {
                counter!("campus_cache_misses_total").increment(1);
                return None;
            }
        }

        // Expired entry: evict lazily.
        self.entries.write().remove(key);
        counter!("campus_cache_misses_total").increment(1);
        None
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> bool {
        let entry = Entry {
            value: value.to_string(),
            expires_at: Instant::now() + ttl,
        };
        self.entries.write().insert(key.to_string(), entry);
        true
    }

    async fn delete(&self, key: &str) -> bool {
        self.entries.write().remove(key).is_some()
    }

    async fn delete_pattern(&self, pattern: &str) -> u64 {
        let mut entries = self.entries.write();
        let matching: Vec<String> = entries
            .keys()
            .filter(|k| Self::matches(pattern, k))
            .cloned()
            .collect();

        for key in &matching {
            entries.remove(key);
        }

        debug!("Deleted {} keys matching pattern '{}'", matching.len(), pattern);
        matching.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_round_trip() {
        let store = MemoryCacheStore::new();
        assert!(store.set_raw("course:1", "\"rust\"", Duration::from_secs(60)).await);
        assert_eq!(store.get_raw("course:1").await.as_deref(), Some("\"rust\""));
    }

    #[tokio::test]
    async fn test_entry_expires() {
        let store = MemoryCacheStore::new();
        store.set_raw("course:1", "\"rust\"", Duration::from_millis(10)).await;
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(store.get_raw("course:1").await.is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_delete_pattern_scopes_to_prefix() {
        let store = MemoryCacheStore::new();
        let ttl = Duration::from_secs(60);
        store.set_raw("courses:/courses", "[]", ttl).await;
        store.set_raw("courses:/courses?page=2", "[]", ttl).await;
        store.set_raw("course:abc", "{}", ttl).await;
        store.set_raw("package:xyz", "{}", ttl).await;

        // The collection sweep must remove every matching key and nothing else.
        assert_eq!(store.delete_pattern("courses:*").await, 2);
        assert!(store.get_raw("course:abc").await.is_some());
        assert!(store.get_raw("package:xyz").await.is_some());
    }

    #[tokio::test]
    async fn test_exact_pattern_without_wildcard() {
        let store = MemoryCacheStore::new();
        let ttl = Duration::from_secs(60);
        store.set_raw("session:1", "{}", ttl).await;
        store.set_raw("session:12", "{}", ttl).await;

        assert_eq!(store.delete_pattern("session:1").await, 1);
        assert!(store.get_raw("session:12").await.is_some());
    }
}
