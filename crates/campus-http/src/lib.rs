//! # Campus HTTP
//!
//! HTTP layer for the Campus platform: the response envelope, the response
//! cache and invalidation middleware, and the authentication middleware.
//!
//! The cache middleware never fails a request. Every cache interaction here
//! degrades to pass-through when the backend misbehaves.

pub mod middleware;
pub mod responses;

pub use responses::*;
