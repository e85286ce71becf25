//! Cache invalidation middleware for write routes.
//!
//! After a successful POST/PUT/PATCH/DELETE, deletes the point key for the
//! written resource (when the route carries an id parameter) and sweeps each
//! configured collection pattern. Deletions run in the background and their
//! failures are logged only; the write response is never affected.
//!
//! A read racing a write can still cache the pre-write value for one TTL
//! window. That staleness is bounded and accepted.

use crate::responses::body_is_success;
use axum::{
    body::{to_bytes, Body},
    extract::{Path, Request, State},
    http::Method,
    middleware::Next,
    response::{IntoResponse, Response},
};
use campus_cache::{point_key, CachePrefix, CacheStore};
use std::sync::Arc;
use tracing::{debug, warn};

/// Per-route-group state for the invalidation middleware.
#[derive(Clone)]
pub struct InvalidationState {
    store: Arc<dyn CacheStore>,
    point_prefix: Option<CachePrefix>,
    collection_prefixes: Vec<CachePrefix>,
}

impl InvalidationState {
    /// Creates invalidation state for a route group.
    #[must_use]
    pub fn new(
        store: Arc<dyn CacheStore>,
        point_prefix: Option<CachePrefix>,
        collection_prefixes: Vec<CachePrefix>,
    ) -> Self {
        Self {
            store,
            point_prefix,
            collection_prefixes,
        }
    }
}

/// Invalidation middleware for write routes.
pub async fn invalidation_middleware(
    State(state): State<InvalidationState>,
    id: Option<Path<String>>,
    request: Request,
    next: Next,
) -> Response {
    let is_write = matches!(
        *request.method(),
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    );
    if !is_write || !state.store.is_enabled() {
        return next.run(request).await;
    }

    let response = next.run(request).await;

    if !response.status().is_success() {
        return response;
    }

    let (parts, body) = response.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Failed to buffer write response body: {}", e);
            return crate::AppError(campus_core::CampusError::internal(
                "Failed to read response body",
            ))
            .into_response();
        }
    };

    if body_is_success(&bytes) {
        let store = state.store.clone();
        let point = match (state.point_prefix, &id) {
            (Some(prefix), Some(Path(id))) => Some(point_key(prefix, id)),
            _ => None,
        };
        let patterns: Vec<String> = state
            .collection_prefixes
            .iter()
            .map(CachePrefix::pattern)
            .collect();

        // Fire and forget; the write response never waits on invalidation.
        tokio::spawn(async move {
            if let Some(key) = point {
                if store.delete(&key).await {
                    debug!("Invalidated '{}'", key);
                }
            }
            for pattern in patterns {
                let removed = store.delete_pattern(&pattern).await;
                debug!("Invalidated {} keys under '{}'", removed, pattern);
            }
        });
    }

    Response::from_parts(parts, Body::from(bytes))
}
