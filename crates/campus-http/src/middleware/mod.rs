//! Middleware stack: authentication, response caching, invalidation, logging.

pub mod auth;
pub mod cache;
pub mod invalidate;
pub mod logging;

pub use auth::{auth_middleware, require_auth, require_role, AuthMiddlewareState};
pub use cache::{response_cache_middleware, KeyStrategy, ResponseCacheState};
pub use invalidate::{invalidation_middleware, InvalidationState};
pub use logging::logging_middleware;
