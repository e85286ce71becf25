//! Dependency injection module using Shaku.
//!
//! The cache store is the one component with real wiring variance (Redis
//! pool vs disabled), so it lives in the module; everything downstream of it
//! is constructed from resolved `Arc<dyn CacheStore>` handles.

use campus_cache::{CacheStore, RedisCacheStore, RedisCacheStoreParameters};
use campus_config::{CacheConfig, RedisConfig};
use campus_core::{module, CampusError, CampusResult, HasComponent};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

module! {
    pub AppModule {
        components = [RedisCacheStore],
        providers = [],
    }
}

/// Builds the application module.
///
/// When Redis is disabled the store is built without a pool and behaves as
/// an always-missing cache; every consumer degrades to pass-through.
pub fn build_app_module(
    redis_config: &RedisConfig,
    cache_config: &CacheConfig,
) -> CampusResult<Arc<AppModule>> {
    let pool = if redis_config.enabled {
        let redis_cfg = deadpool_redis::Config::from_url(&redis_config.url);
        let pool = redis_cfg
            .create_pool(Some(deadpool_redis::Runtime::Tokio1))
            .map_err(|e| CampusError::cache(format!("Failed to create Redis pool: {}", e)))?;
        info!("Redis cache enabled at {}", redis_config.url);
        Some(Arc::new(pool))
    } else {
        info!("Redis cache disabled, running with caching off");
        None
    };

    let module = AppModule::builder()
        .with_component_parameters::<RedisCacheStore>(RedisCacheStoreParameters {
            pool,
            default_ttl: Duration::from_secs(cache_config.default_ttl_secs),
        })
        .build();

    Ok(Arc::new(module))
}

/// Trait for resolving the cache store from the module.
pub trait CacheResolver {
    /// Resolves the shared cache store.
    fn cache_store(&self) -> Arc<dyn CacheStore>;
}

impl CacheResolver for AppModule {
    fn cache_store(&self) -> Arc<dyn CacheStore> {
        self.resolve()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_redis_builds_disabled_store() {
        let redis = RedisConfig {
            enabled: false,
            ..RedisConfig::default()
        };
        let module = build_app_module(&redis, &CacheConfig::default()).unwrap();
        assert!(!module.cache_store().is_enabled());
    }

    #[test]
    fn test_enabled_redis_builds_enabled_store() {
        // Pool creation is lazy; no live Redis is needed to build the module.
        let module = build_app_module(&RedisConfig::default(), &CacheConfig::default()).unwrap();
        assert!(module.cache_store().is_enabled());
    }
}
