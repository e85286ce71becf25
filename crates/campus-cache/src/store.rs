//! Cache store trait for abstracted, fail-open caching operations.

use async_trait::async_trait;
use campus_core::CampusResult;
use shaku::Interface;
use std::time::Duration;
use tracing::warn;

/// Cache store abstraction shared by the Redis and in-memory backends.
///
/// Every operation is best-effort and fail-open: implementations log backend
/// failures and report them as a miss (`None`), a no-op (`false`), or zero
/// deletions. Nothing in this trait can fail the calling request.
///
/// Uses JSON strings for type-erased storage to maintain dyn-compatibility.
#[async_trait]
pub trait CacheStore: Interface {
    /// Get a raw JSON value from the cache.
    ///
    /// Returns `None` if the key doesn't exist, has expired, or the backend
    /// is unavailable.
    async fn get_raw(&self, key: &str) -> Option<String>;

    /// Set a raw JSON value in the cache with a TTL.
    ///
    /// Returns `false` (after logging) when the write could not be applied;
    /// the caller must proceed as if the value were not cached.
    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> bool;

    /// Delete a value from the cache.
    ///
    /// Returns `true` if the key existed and was deleted.
    async fn delete(&self, key: &str) -> bool;

    /// Delete every key matching a trailing-wildcard pattern (`prefix:*`).
    ///
    /// Returns the number of keys deleted. Keys outside the pattern are
    /// never touched.
    async fn delete_pattern(&self, pattern: &str) -> u64;

    /// Check if caching is enabled.
    fn is_enabled(&self) -> bool;
}

/// Extension trait with typed methods for convenience.
#[async_trait]
pub trait CacheStoreExt: CacheStore {
    /// Get a typed value from the cache.
    ///
    /// A payload that fails to parse is logged and treated identically to a
    /// miss, never an error.
    async fn get<T: serde::de::DeserializeOwned + Send>(&self, key: &str) -> Option<T> {
        let raw = self.get_raw(key).await?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Discarding unparseable cache entry '{}': {}", key, e);
                None
            }
        }
    }

    /// Set a typed value in the cache. Best effort.
    async fn set<T: serde::Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> bool {
        match serde_json::to_string(value) {
            Ok(json) => self.set_raw(key, &json, ttl).await,
            Err(e) => {
                warn!("Failed to serialize value for cache key '{}': {}", key, e);
                false
            }
        }
    }

    /// Get a value or load and cache it if not present.
    ///
    /// The loader result is returned regardless of whether the subsequent
    /// `set` succeeded. Loader errors propagate; cache failures never do.
    ///
    /// Concurrent callers that miss on the same key each invoke the loader
    /// independently. There is no single-flight de-duplication; consistency
    /// is eventual, bounded by TTL and explicit invalidation.
    async fn get_or_set<T, F, Fut>(&self, key: &str, ttl: Duration, loader: F) -> CampusResult<T>
    where
        T: serde::Serialize + serde::de::DeserializeOwned + Send + Sync,
        F: FnOnce() -> Fut + Send,
        Fut: std::future::Future<Output = CampusResult<T>> + Send,
    {
        if let Some(cached) = self.get::<T>(key).await {
            return Ok(cached);
        }

        let value = loader().await?;

        // Best effort; the value is valid whether or not the write lands.
        let _ = self.set(key, &value, ttl).await;

        Ok(value)
    }
}

// Blanket implementation for all CacheStore implementations
impl<T: CacheStore + ?Sized> CacheStoreExt for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryCacheStore;
    use campus_core::CampusError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_get_or_set_loads_once_within_ttl() {
        let store = MemoryCacheStore::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let value: String = store
                .get_or_set("course:1", Duration::from_secs(60), || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok("intro-to-rust".to_string())
                })
                .await
                .unwrap();
            assert_eq!(value, "intro-to-rust");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_get_or_set_reloads_after_delete() {
        let store = MemoryCacheStore::new();
        let calls = AtomicUsize::new(0);
        let load = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(42u32)
        };

        let _: u32 = store
            .get_or_set("course:2", Duration::from_secs(60), load)
            .await
            .unwrap();
        assert!(store.delete("course:2").await);
        let _: u32 = store
            .get_or_set("course:2", Duration::from_secs(60), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(42u32)
            })
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_get_or_set_propagates_loader_error() {
        let store = MemoryCacheStore::new();

        let result: CampusResult<u32> = store
            .get_or_set("course:3", Duration::from_secs(60), || async {
                Err(CampusError::not_found("Course", 3))
            })
            .await;

        assert!(result.is_err());
        // A failed load must not leave anything behind.
        assert!(store.get_raw("course:3").await.is_none());
    }

    #[tokio::test]
    async fn test_unparseable_entry_is_a_miss() {
        let store = MemoryCacheStore::new();
        assert!(store.set_raw("course:4", "not-json{", Duration::from_secs(60)).await);

        let value: Option<u32> = store.get("course:4").await;
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_cold_misses_both_succeed() {
        let store = std::sync::Arc::new(MemoryCacheStore::new());
        let calls = std::sync::Arc::new(AtomicUsize::new(0));

        let a = {
            let store = store.clone();
            let calls = calls.clone();
            tokio::spawn(async move {
                store
                    .get_or_set("courses:/courses", Duration::from_secs(60), || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Ok(vec!["rust-101".to_string()])
                    })
                    .await
            })
        };
        let b = {
            let store = store.clone();
            let calls = calls.clone();
            tokio::spawn(async move {
                store
                    .get_or_set("courses:/courses", Duration::from_secs(60), || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Ok(vec!["rust-101".to_string()])
                    })
                    .await
            })
        };

        let (a, b) = (a.await.unwrap().unwrap(), b.await.unwrap().unwrap());
        assert_eq!(a, b);
        // Double-loading on a cold cache is accepted behavior (no single-flight).
        assert!(calls.load(Ordering::SeqCst) >= 1);
    }
}
