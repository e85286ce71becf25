//! # Campus Config
//!
//! Configuration management for the Campus platform.
//! Supports layered configuration from files and environment variables,
//! plus runtime refresh.

mod app_config;
mod loader;

pub use app_config::*;
pub use loader::*;
