//! Decoded-token cache.
//!
//! Caches the `{id, role}` pair extracted from a verified JWT, keyed by the
//! raw token, so repeated requests skip signature verification. Entries are
//! advisory: the revocation store is always consulted first, and the
//! effective TTL is capped so an entry can never outlive its token.

use crate::{AuthContext, Claims};
use campus_cache::{point_key, CachePrefix, CacheStore, CacheStoreExt};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Cache of decoded token claims, keyed `jwt:{raw token}`.
#[derive(Clone)]
pub struct TokenCache {
    store: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl TokenCache {
    /// Creates a token cache over the shared store.
    #[must_use]
    pub fn new(store: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    fn key(token: &str) -> String {
        point_key(CachePrefix::Jwt, token)
    }

    /// Looks up the cached identity for a raw token.
    pub async fn get(&self, token: &str) -> Option<AuthContext> {
        self.store.get(&Self::key(token)).await
    }

    /// Caches the identity decoded from verified claims. Best effort.
    ///
    /// The entry TTL is the configured TTL capped at the token's remaining
    /// validity; a token past its expiry is never cached.
    pub async fn put(&self, token: &str, claims: &Claims) -> bool {
        let Some(ctx) = AuthContext::from_claims(claims) else {
            return false;
        };

        let Some(ttl) = Self::effective_ttl(self.ttl, claims) else {
            debug!("Skipping token cache write: token already expired");
            return false;
        };

        self.store.set(&Self::key(token), &ctx, ttl).await
    }

    /// Evicts the cached identity for a raw token (logout path).
    pub async fn remove(&self, token: &str) -> bool {
        self.store.delete(&Self::key(token)).await
    }

    fn effective_ttl(configured: Duration, claims: &Claims) -> Option<Duration> {
        let remaining = claims.remaining_validity_secs();
        if remaining == 0 {
            return None;
        }
        Some(configured.min(Duration::from_secs(remaining)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_cache::MemoryCacheStore;
    use campus_core::{UserId, UserRole};
    use chrono::Utc;

    fn claims_expiring_in(secs: i64) -> Claims {
        Claims::new(
            UserId::new(),
            UserRole::Student,
            "issuer".to_string(),
            "audience".to_string(),
            Utc::now() + chrono::Duration::seconds(secs),
        )
    }

    #[test]
    fn test_effective_ttl_is_capped_by_token_validity() {
        let claims = claims_expiring_in(30);
        let ttl = TokenCache::effective_ttl(Duration::from_secs(600), &claims).unwrap();
        // The cached entry must never outlive the token it represents.
        assert!(ttl <= Duration::from_secs(30));
    }

    #[test]
    fn test_effective_ttl_uses_configured_value_when_shorter() {
        let claims = claims_expiring_in(3600);
        let ttl = TokenCache::effective_ttl(Duration::from_secs(600), &claims).unwrap();
        assert_eq!(ttl, Duration::from_secs(600));
    }

    #[test]
    fn test_expired_token_yields_no_ttl() {
        let claims = claims_expiring_in(-10);
        assert!(TokenCache::effective_ttl(Duration::from_secs(600), &claims).is_none());
    }

    #[tokio::test]
    async fn test_put_get_remove_round_trip() {
        let store = Arc::new(MemoryCacheStore::new());
        let cache = TokenCache::new(store.clone(), Duration::from_secs(600));
        let claims = claims_expiring_in(3600);

        assert!(cache.put("raw-token", &claims).await);
        let ctx = cache.get("raw-token").await.unwrap();
        assert_eq!(ctx.user_id, claims.user_id().unwrap());

        assert!(cache.remove("raw-token").await);
        assert!(cache.get("raw-token").await.is_none());
    }

    #[tokio::test]
    async fn test_expired_token_is_not_cached() {
        let store = Arc::new(MemoryCacheStore::new());
        let cache = TokenCache::new(store.clone(), Duration::from_secs(600));
        let claims = claims_expiring_in(-10);

        assert!(!cache.put("stale-token", &claims).await);
        assert!(cache.get("stale-token").await.is_none());
    }

    #[tokio::test]
    async fn test_entries_live_under_jwt_prefix() {
        let store = Arc::new(MemoryCacheStore::new());
        let cache = TokenCache::new(store.clone(), Duration::from_secs(600));
        cache.put("raw-token", &claims_expiring_in(3600)).await;

        assert!(store.get_raw("jwt:raw-token").await.is_some());
    }
}
