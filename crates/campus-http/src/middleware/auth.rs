//! Authentication middleware.

use crate::AppError;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use campus_auth::{AuthContext, AuthContextExt, Authenticator};
use campus_core::{CampusError, UserRole};
use std::sync::Arc;
use tracing::debug;

/// Authentication middleware state.
#[derive(Clone)]
pub struct AuthMiddlewareState {
    pub authenticator: Arc<Authenticator>,
}

impl AuthMiddlewareState {
    /// Creates the middleware state.
    #[must_use]
    pub fn new(authenticator: Arc<Authenticator>) -> Self {
        Self { authenticator }
    }
}

/// Authentication middleware.
///
/// Requests without an `Authorization` header pass through anonymously; the
/// route decides via [`require_auth`] whether that is acceptable. A bearer
/// token that is present but fails authentication (bad signature, expired,
/// revoked) rejects the request here with a 401 envelope.
pub async fn auth_middleware(
    State(state): State<AuthMiddlewareState>,
    mut request: Request,
    next: Next,
) -> Response {
    let bearer = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    if let Some(token) = bearer {
        match state.authenticator.authenticate(token).await {
            Ok(ctx) => {
                debug!("Authenticated user {}", ctx.user_id);
                request.extensions_mut().insert(ctx);
            }
            Err(e) => {
                debug!("Authentication failed: {}", e);
                return AppError(e).into_response();
            }
        }
    }

    next.run(request).await
}

/// Middleware that requires an authenticated identity on the request.
pub async fn require_auth(request: Request, next: Next) -> Response {
    if request.extensions().get::<AuthContext>().is_none() {
        return AppError(CampusError::unauthorized("Authentication required")).into_response();
    }

    next.run(request).await
}

/// Middleware that requires at least the given role.
pub async fn require_role(
    State(required): State<UserRole>,
    request: Request,
    next: Next,
) -> Response {
    let Some(ctx) = request.extensions().get::<AuthContext>() else {
        return AppError(CampusError::unauthorized("Authentication required")).into_response();
    };

    if let Err(e) = ctx.require_role(required) {
        return AppError(e).into_response();
    }

    next.run(request).await
}
