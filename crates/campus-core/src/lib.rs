//! # Campus Core
//!
//! Core types, traits, and error definitions for the Campus platform.
//! This crate provides the foundational abstractions shared by the cache,
//! auth, and HTTP layers.

pub mod error;
pub mod id;
pub mod result;
pub mod role;

pub use error::*;
pub use id::*;
pub use result::*;
pub use role::*;

// Re-export shaku for dependency injection
pub use shaku::{module, HasComponent, Interface};
