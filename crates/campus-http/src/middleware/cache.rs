//! Response cache middleware.
//!
//! Sits in front of GET routes and serves previously-seen response bodies
//! straight from the cache store. On a miss the downstream handler runs
//! normally; its body is buffered, handed back to the client untouched, and
//! written to the cache in the background when, and only when, the response
//! is a 200 carrying a `status: "success"` envelope.
//!
//! A broken cache backend degrades every request to a plain pass-through.

use crate::responses::body_is_success;
use axum::{
    body::{to_bytes, Body},
    extract::{Path, Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use campus_cache::{collection_key, point_key, CachePrefix, CacheStore};
use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// How the cache key is derived for a route group.
#[derive(Debug, Clone, Copy)]
pub enum KeyStrategy {
    /// `prefix:{id}` from the route's single path parameter.
    Point(CachePrefix),
    /// `prefix:{path}?{canonical query}` from the full request target.
    Collection(CachePrefix),
}

/// Per-route-group state for the response cache middleware.
#[derive(Clone)]
pub struct ResponseCacheState {
    store: Arc<dyn CacheStore>,
    strategy: KeyStrategy,
    ttl: Duration,
}

impl ResponseCacheState {
    /// Creates cache state for a route group.
    #[must_use]
    pub fn new(store: Arc<dyn CacheStore>, strategy: KeyStrategy, ttl: Duration) -> Self {
        Self {
            store,
            strategy,
            ttl,
        }
    }
}

/// Response cache middleware for GET routes.
///
/// Non-GET requests and point routes without a resolvable id parameter pass
/// through untouched. Responses are annotated with an `x-cache: hit|miss`
/// header.
pub async fn response_cache_middleware(
    State(state): State<ResponseCacheState>,
    id: Option<Path<String>>,
    request: Request,
    next: Next,
) -> Response {
    if request.method() != Method::GET || !state.store.is_enabled() {
        return next.run(request).await;
    }

    let key = match (state.strategy, &id) {
        (KeyStrategy::Point(prefix), Some(Path(id))) => point_key(prefix, id),
        (KeyStrategy::Point(_), None) => return next.run(request).await,
        (KeyStrategy::Collection(prefix), _) => {
            let uri = request.uri();
            collection_key(prefix, uri.path(), uri.query())
        }
    };

    if let Some(cached) = state.store.get_raw(&key).await {
        debug!("Response cache hit for '{}'", key);
        counter!("campus_http_cache_hits_total").increment(1);

        let mut response = (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            cached,
        )
            .into_response();
        response
            .headers_mut()
            .insert("x-cache", HeaderValue::from_static("hit"));
        return response;
    }

    counter!("campus_http_cache_misses_total").increment(1);
    let response = next.run(request).await;

    if response.status() != StatusCode::OK {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Failed to buffer response body for '{}': {}", key, e);
            return crate::AppError(campus_core::CampusError::internal(
                "Failed to read response body",
            ))
            .into_response();
        }
    };

    if body_is_success(&bytes) {
        if let Ok(payload) = String::from_utf8(bytes.to_vec()) {
            let store = state.store.clone();
            let ttl = state.ttl;
            // Fire and forget; the client never waits on the cache write.
            tokio::spawn(async move {
                if store.set_raw(&key, &payload, ttl).await {
                    debug!("Cached response under '{}'", key);
                }
            });
        }
    }

    parts
        .headers
        .insert("x-cache", HeaderValue::from_static("miss"));
    Response::from_parts(parts, Body::from(bytes))
}
