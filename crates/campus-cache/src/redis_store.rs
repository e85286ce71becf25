//! Redis-based cache store.

use super::CacheStore;
use async_trait::async_trait;
use campus_core::{CampusError, CampusResult};
use deadpool_redis::{redis::AsyncCommands, Pool};
use metrics::counter;
use shaku::Component;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Default TTL for cached items (5 minutes).
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Redis-based cache store.
///
/// All operations are fail-open: a refused connection, timeout, or command
/// error is logged as a warning and reported as a miss or no-op, never
/// propagated to the request path.
#[derive(Component)]
#[shaku(interface = CacheStore)]
pub struct RedisCacheStore {
    /// Redis connection pool. `None` means caching is disabled.
    pool: Option<Arc<Pool>>,
    /// Default TTL for cached items.
    #[shaku(default = DEFAULT_TTL)]
    #[allow(dead_code)]
    default_ttl: Duration,
}

impl RedisCacheStore {
    /// Create a new Redis cache store.
    #[must_use]
    pub fn new(pool: Arc<Pool>) -> Self {
        Self {
            pool: Some(pool),
            default_ttl: DEFAULT_TTL,
        }
    }

    /// Create a no-op cache store (for when Redis is disabled).
    ///
    /// Behaves exactly like an unreachable backend: every read misses,
    /// every write is dropped.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            pool: None,
            default_ttl: DEFAULT_TTL,
        }
    }

    /// Get a connection from the pool.
    async fn get_conn(&self) -> CampusResult<deadpool_redis::Connection> {
        match &self.pool {
            Some(pool) => pool
                .get()
                .await
                .map_err(|e| CampusError::cache(format!("Failed to get Redis connection: {}", e))),
            None => Err(CampusError::cache("Cache is disabled")),
        }
    }

    async fn try_get(&self, key: &str) -> CampusResult<Option<String>> {
        let mut conn = self.get_conn().await?;
        let value: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| CampusError::cache(format!("Failed to get key '{}': {}", key, e)))?;
        Ok(value)
    }

    async fn try_set(&self, key: &str, value: &str, ttl: Duration) -> CampusResult<()> {
        let mut conn = self.get_conn().await?;
        let ttl_secs = ttl.as_secs().max(1);

        conn.set_ex::<_, _, ()>(key, value, ttl_secs)
            .await
            .map_err(|e| CampusError::cache(format!("Failed to set key '{}': {}", key, e)))?;

        debug!("Cached key '{}' with TTL {}s", key, ttl_secs);
        Ok(())
    }

    async fn try_delete(&self, key: &str) -> CampusResult<bool> {
        let mut conn = self.get_conn().await?;
        let deleted: i64 = conn
            .del(key)
            .await
            .map_err(|e| CampusError::cache(format!("Failed to delete key '{}': {}", key, e)))?;
        Ok(deleted > 0)
    }

    async fn try_delete_pattern(&self, pattern: &str) -> CampusResult<u64> {
        let mut conn = self.get_conn().await?;

        // KEYS is a full-keyspace scan; acceptable at current key volumes.
        // TODO: switch to cursor-based SCAN once catalog key counts grow past
        // a few hundred thousand.
        let keys: Vec<String> = deadpool_redis::redis::cmd("KEYS")
            .arg(pattern)
            .query_async(&mut conn)
            .await
            .map_err(|e| CampusError::cache(format!("Failed to scan keys: {}", e)))?;

        if keys.is_empty() {
            return Ok(0);
        }

        let deleted: i64 = conn
            .del(&keys)
            .await
            .map_err(|e| CampusError::cache(format!("Failed to delete keys: {}", e)))?;

        debug!("Deleted {} keys matching pattern '{}'", deleted, pattern);
        Ok(deleted as u64)
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    fn is_enabled(&self) -> bool {
        self.pool.is_some()
    }

    async fn get_raw(&self, key: &str) -> Option<String> {
        if !self.is_enabled() {
            return None;
        }

        match self.try_get(key).await {
            Ok(Some(value)) => {
                debug!("Cache hit for key '{}'", key);
                counter!("campus_cache_hits_total").increment(1);
                Some(value)
            }
            Ok(None) => {
                debug!("Cache miss for key '{}'", key);
                counter!("campus_cache_misses_total").increment(1);
                None
            }
            Err(e) => {
                warn!("Cache read degraded to miss: {}", e);
                counter!("campus_cache_errors_total").increment(1);
                None
            }
        }
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> bool {
        if !self.is_enabled() {
            return false;
        }

        match self.try_set(key, value, ttl).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Cache write dropped: {}", e);
                counter!("campus_cache_errors_total").increment(1);
                false
            }
        }
    }

    async fn delete(&self, key: &str) -> bool {
        if !self.is_enabled() {
            return false;
        }

        match self.try_delete(key).await {
            Ok(deleted) => {
                debug!("Deleted key '{}': {}", key, deleted);
                deleted
            }
            Err(e) => {
                warn!("Cache delete dropped: {}", e);
                counter!("campus_cache_errors_total").increment(1);
                false
            }
        }
    }

    async fn delete_pattern(&self, pattern: &str) -> u64 {
        if !self.is_enabled() {
            return 0;
        }

        match self.try_delete_pattern(pattern).await {
            Ok(deleted) => deleted,
            Err(e) => {
                warn!("Cache pattern delete dropped: {}", e);
                counter!("campus_cache_errors_total").increment(1);
                0
            }
        }
    }
}
