//! # Campus Auth
//!
//! Authentication for the Campus platform: JWT verification with a
//! decoded-token cache, logout revocation, and RBAC helpers.
//!
//! The per-request decision order is fixed: revocation is always consulted
//! before a cached or freshly-verified claim is trusted.

pub mod authenticator;
pub mod jwt;
pub mod rbac;
pub mod revocation;
pub mod token_cache;

pub use authenticator::*;
pub use jwt::*;
pub use rbac::*;
pub use revocation::*;
pub use token_cache::*;
