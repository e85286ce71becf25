//! Demo routes exercising the cache and auth subsystems.
//!
//! The course handlers are deliberately thin in-memory CRUD. They exist so
//! the response cache, invalidation, and auth middleware have real traffic
//! to run against; the actual course domain lives in other services.

use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    middleware,
    routing::{get, post, put},
    Extension, Json, Router,
};
use campus_auth::AuthContext;
use campus_cache::{CachePrefix, CacheStore, TtlPolicy};
use campus_config::ServerConfig;
use campus_core::{CampusError, CourseId, UserId, UserRole};
use campus_http::middleware::{
    auth_middleware, invalidation_middleware, logging_middleware, require_role,
    response_cache_middleware, AuthMiddlewareState, InvalidationState, KeyStrategy,
    ResponseCacheState,
};
use campus_http::{created, ok, ApiResponse, ApiResult, AppError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// A course, as served by the demo catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub description: String,
    pub instructor_id: UserId,
}

#[derive(Debug, Deserialize)]
pub struct CourseRequest {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub role: UserRole,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user_id: UserId,
}

/// Builds the full application router.
pub fn build_router(
    state: AppState,
    store: Arc<dyn CacheStore>,
    ttl: &TtlPolicy,
    server_config: &ServerConfig,
) -> Router {
    let auth_state = AuthMiddlewareState::new(state.authenticator.clone());

    let list_routes = Router::new()
        .route("/courses", get(list_courses))
        .layer(middleware::from_fn_with_state(
            ResponseCacheState::new(
                store.clone(),
                KeyStrategy::Collection(CachePrefix::Courses),
                ttl.for_prefix(CachePrefix::Courses),
            ),
            response_cache_middleware,
        ));

    let detail_routes = Router::new()
        .route("/courses/:id", get(get_course))
        .layer(middleware::from_fn_with_state(
            ResponseCacheState::new(
                store.clone(),
                KeyStrategy::Point(CachePrefix::Course),
                ttl.for_prefix(CachePrefix::Course),
            ),
            response_cache_middleware,
        ));

    let write_routes = Router::new()
        .route("/courses", post(create_course))
        .route("/courses/:id", put(update_course).delete(delete_course))
        .layer(middleware::from_fn_with_state(
            InvalidationState::new(
                store.clone(),
                Some(CachePrefix::Course),
                vec![CachePrefix::Courses],
            ),
            invalidation_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            UserRole::Instructor,
            require_role,
        ));

    let auth_routes = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout));

    let api = Router::new()
        .merge(list_routes)
        .merge(detail_routes)
        .merge(write_routes)
        .merge(auth_routes)
        .layer(middleware::from_fn_with_state(auth_state, auth_middleware))
        .with_state(state);

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api)
        .layer(CompressionLayer::new())
        .layer(create_cors_layer(server_config))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(logging_middleware))
}

fn create_cors_layer(server_config: &ServerConfig) -> CorsLayer {
    if server_config.cors_enabled {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    }
}

async fn health() -> ApiResult<&'static str> {
    ok("healthy")
}

async fn list_courses(State(state): State<AppState>) -> ApiResult<Vec<Course>> {
    let mut courses: Vec<Course> = state.courses.read().values().cloned().collect();
    courses.sort_by_key(|c| c.id.into_inner());
    ok(courses)
}

async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Course> {
    let id = parse_course_id(&id)?;
    let course = state
        .courses
        .read()
        .get(&id)
        .cloned()
        .ok_or_else(|| CampusError::not_found("Course", id))?;
    ok(course)
}

async fn create_course(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(request): Json<CourseRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Course>>), AppError> {
    if request.title.trim().is_empty() {
        return Err(CampusError::validation("Course title must not be empty").into());
    }

    let course = Course {
        id: CourseId::new(),
        title: request.title,
        description: request.description,
        instructor_id: ctx.user_id,
    };
    state.courses.write().insert(course.id, course.clone());
    Ok(created(course))
}

async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<CourseRequest>,
) -> ApiResult<Course> {
    let id = parse_course_id(&id)?;

    let mut courses = state.courses.write();
    let course = courses
        .get_mut(&id)
        .ok_or_else(|| CampusError::not_found("Course", id))?;
    course.title = request.title;
    course.description = request.description;
    let updated = course.clone();
    drop(courses);

    ok(updated)
}

async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<CourseId> {
    let id = parse_course_id(&id)?;

    if state.courses.write().remove(&id).is_none() {
        return Err(CampusError::not_found("Course", id).into());
    }
    ok(id)
}

/// Demo login: issues a token for a fresh user with the requested role.
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let user_id = UserId::new();
    let token = state.token_provider.generate_token(user_id, request.role)?;
    ok(LoginResponse { token, user_id })
}

/// Revokes the presented token until its natural expiry.
async fn logout(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<()> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| CampusError::unauthorized("Missing bearer token"))?;

    state.authenticator.logout(token).await?;
    Ok(Json(ApiResponse::success_with_message("Logged out", ())))
}

fn parse_course_id(raw: &str) -> Result<CourseId, AppError> {
    CourseId::parse(raw)
        .map_err(|_| CampusError::validation(format!("Invalid course id: {}", raw)).into())
}
