//! # Campus Server
//!
//! Main entry point for the Campus platform server: configuration, telemetry,
//! the Redis-backed cache store, and the demo routes that exercise the cache
//! and auth middleware.

use campus_auth::{Authenticator, TokenProvider};
use campus_cache::TtlPolicy;
use campus_config::{AppConfig, ConfigLoader};
use campus_core::{CampusError, CampusResult};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

mod di;
mod routes;
mod state;

use di::{build_app_module, CacheResolver};
use state::AppState;

#[tokio::main]
async fn main() {
    // Logging first; config problems should be visible.
    init_logging();

    info!("Starting Campus Server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run().await {
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> CampusResult<()> {
    let config_loader = ConfigLoader::from_default_location()?;
    let config = config_loader.get().await;

    info!("Environment: {}", config.app.environment);

    let module = build_app_module(&config.redis, &config.cache)?;
    let store = module.cache_store();

    let security = Arc::new(config.security.clone());
    let token_provider = Arc::new(TokenProvider::new(security.clone()));
    let authenticator = Arc::new(Authenticator::new(
        token_provider.clone(),
        store.clone(),
        security.token_cache_ttl(),
    ));

    let ttl = ttl_policy(&config);
    let state = AppState::new(authenticator, token_provider);
    let router = routes::build_router(state, store, &ttl, &config.server);

    let addr = config.server.addr();
    info!("Starting HTTP server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| CampusError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| CampusError::internal(format!("Server error: {}", e)))?;

    info!("Server shutdown complete");
    Ok(())
}

fn ttl_policy(config: &AppConfig) -> TtlPolicy {
    TtlPolicy::from_secs(
        config.cache.course_detail_ttl_secs,
        config.cache.course_list_ttl_secs,
        config.cache.package_list_ttl_secs,
        config.cache.assignment_list_ttl_secs,
        config.cache.default_ttl_secs,
    )
}

fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,campus=debug,tower_http=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}
