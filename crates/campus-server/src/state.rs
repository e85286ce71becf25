//! Application state for Axum handlers.

use crate::routes::Course;
use campus_auth::{Authenticator, TokenProvider};
use campus_core::CourseId;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// In-memory course catalog backing the demo routes.
    pub courses: Arc<RwLock<HashMap<CourseId, Course>>>,
    pub authenticator: Arc<Authenticator>,
    pub token_provider: Arc<TokenProvider>,
}

impl AppState {
    /// Creates a new application state.
    #[must_use]
    pub fn new(authenticator: Arc<Authenticator>, token_provider: Arc<TokenProvider>) -> Self {
        Self {
            courses: Arc::new(RwLock::new(HashMap::new())),
            authenticator,
            token_provider,
        }
    }
}
