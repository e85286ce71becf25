//! Token revocation store (logout blacklist).
//!
//! A revocation entry marks a raw token as invalid from the moment of logout
//! until the token's natural expiry, after which the backend TTL reaps it.
//! Once an entry exists, every authorization decision for that token must
//! fail, regardless of what the token cache currently holds.

use crate::Claims;
use campus_cache::{point_key, CachePrefix, CacheStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Blacklist of revoked tokens, keyed `revoked:{raw token}`.
#[derive(Clone)]
pub struct RevocationStore {
    store: Arc<dyn CacheStore>,
}

impl RevocationStore {
    /// Creates a revocation store over the shared cache backend.
    #[must_use]
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    fn key(token: &str) -> String {
        point_key(CachePrefix::Revoked, token)
    }

    /// Records a token as revoked until its natural expiry.
    ///
    /// Returns `false` when the entry could not be written. Callers on the
    /// logout path should surface that as a warning; requests in flight will
    /// still fail verification once the token expires.
    pub async fn add(&self, token: &str, claims: &Claims) -> bool {
        // Keep the entry alive exactly as long as the token itself; at least
        // one second so a revocation landing in the token's final moments is
        // still recorded.
        let ttl = Duration::from_secs(claims.remaining_validity_secs().max(1));

        let written = self
            .store
            .set_raw(&Self::key(token), "1", ttl)
            .await;

        if written {
            info!("Token revoked (jti {})", claims.jti);
        } else {
            warn!("Failed to record token revocation (jti {})", claims.jti);
        }
        written
    }

    /// Checks whether a token has been revoked.
    ///
    /// Fail-open on backend outage: an unreachable store reports "not
    /// revoked". The token cache is equally unavailable then, so the request
    /// still undergoes full signature and expiry verification.
    pub async fn contains(&self, token: &str) -> bool {
        self.store.get_raw(&Self::key(token)).await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_cache::MemoryCacheStore;
    use campus_core::{UserId, UserRole};
    use chrono::Utc;

    fn valid_claims() -> Claims {
        Claims::new(
            UserId::new(),
            UserRole::Student,
            "issuer".to_string(),
            "audience".to_string(),
            Utc::now() + chrono::Duration::hours(1),
        )
    }

    #[tokio::test]
    async fn test_add_then_contains() {
        let store = Arc::new(MemoryCacheStore::new());
        let revocation = RevocationStore::new(store);
        let claims = valid_claims();

        assert!(!revocation.contains("raw-token").await);
        assert!(revocation.add("raw-token", &claims).await);
        assert!(revocation.contains("raw-token").await);
    }

    #[tokio::test]
    async fn test_revocation_is_per_token() {
        let store = Arc::new(MemoryCacheStore::new());
        let revocation = RevocationStore::new(store);

        revocation.add("token-a", &valid_claims()).await;
        assert!(!revocation.contains("token-b").await);
    }

    #[tokio::test]
    async fn test_entries_live_under_revoked_prefix() {
        let store = Arc::new(MemoryCacheStore::new());
        let revocation = RevocationStore::new(store.clone());
        revocation.add("raw-token", &valid_claims()).await;

        assert!(store.get_raw("revoked:raw-token").await.is_some());
        // A jwt-prefix sweep must not be able to clear revocations.
        assert_eq!(store.delete_pattern("jwt:*").await, 0);
        assert!(revocation.contains("raw-token").await);
    }
}
