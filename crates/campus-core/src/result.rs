//! Result type aliases for the Campus platform.

use crate::CampusError;

/// A specialized `Result` type for Campus operations.
pub type CampusResult<T> = Result<T, CampusError>;
