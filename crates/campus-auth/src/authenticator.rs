//! Per-request authentication state machine.

use crate::{AuthContext, RevocationStore, TokenCache, TokenProvider};
use campus_core::{CampusError, CampusResult};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Authenticates bearer tokens, combining verification, the decoded-token
/// cache, and the revocation blacklist.
///
/// Decision order per token, fixed:
/// 1. revoked → reject, regardless of any cached positive decision;
/// 2. cache hit → trust the cached `{id, role}`;
/// 3. miss → full signature/expiry verification, then populate the cache.
#[derive(Clone)]
pub struct Authenticator {
    token_provider: Arc<TokenProvider>,
    token_cache: TokenCache,
    revocation: RevocationStore,
}

impl Authenticator {
    /// Creates an authenticator over the shared cache store.
    #[must_use]
    pub fn new(
        token_provider: Arc<TokenProvider>,
        store: Arc<dyn campus_cache::CacheStore>,
        token_cache_ttl: Duration,
    ) -> Self {
        Self {
            token_provider,
            token_cache: TokenCache::new(store.clone(), token_cache_ttl),
            revocation: RevocationStore::new(store),
        }
    }

    /// Authenticates a raw bearer token.
    ///
    /// All verification failures surface as 401-mapped errors whose client
    /// message is the same generic "invalid or expired token"; the specific
    /// cause is only logged.
    pub async fn authenticate(&self, token: &str) -> CampusResult<AuthContext> {
        if self.revocation.contains(token).await {
            debug!("Rejecting revoked token");
            return Err(CampusError::TokenRevoked);
        }

        if let Some(ctx) = self.token_cache.get(token).await {
            debug!("Authenticated user {} from token cache", ctx.user_id);
            return Ok(ctx);
        }

        let claims = self.token_provider.validate_token(token)?;
        let ctx = AuthContext::from_claims(&claims)
            .ok_or_else(|| CampusError::InvalidToken("Token missing user ID".to_string()))?;

        // Best effort; a failed write just means the next request verifies again.
        let _ = self.token_cache.put(token, &claims).await;

        debug!("Authenticated user {} via full verification", ctx.user_id);
        Ok(ctx)
    }

    /// Revokes a token at logout.
    ///
    /// Records the revocation until the token's natural expiry and eagerly
    /// evicts the decoded-token cache entry, closing the window where a
    /// revoked token could still be served from cache.
    pub async fn logout(&self, token: &str) -> CampusResult<()> {
        let claims = self.token_provider.validate_token(token)?;

        self.revocation.add(token, &claims).await;
        self.token_cache.remove(token).await;

        Ok(())
    }
}
