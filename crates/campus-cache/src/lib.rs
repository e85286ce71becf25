//! # Campus Cache
//!
//! Cache-aside layer shared by every Campus service: a fail-open store
//! abstraction over Redis (with an in-memory variant), deterministic key
//! construction, a read-through `get_or_set` primitive, and the per-resource
//! TTL policy table.
//!
//! The load-bearing design rule of this crate is **fail open**: every cache
//! operation is advisory. Callers must behave identically (just slower,
//! hitting the source of truth) whether the backend is healthy, degraded,
//! or absent. No store operation ever surfaces an error to the caller.

mod keys;
mod memory_store;
mod redis_store;
mod store;
mod ttl;

pub use keys::*;
pub use memory_store::*;
pub use redis_store::*;
pub use store::*;
pub use ttl::*;
