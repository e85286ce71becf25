//! Configuration loader with layered sources.

use crate::AppConfig;
use campus_core::CampusError;
use config::{Config, ConfigError, Environment, File};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Configuration loader with runtime refresh support.
#[derive(Clone)]
pub struct ConfigLoader {
    config: Arc<RwLock<AppConfig>>,
    config_dir: String,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `config/default.toml` - Default values
    /// 2. `config/{environment}.toml` - Environment-specific overrides
    /// 3. `config/local.toml` - Local overrides (not committed)
    /// 4. Environment variables with `CAMPUS_` prefix
    pub fn new(config_dir: impl Into<String>) -> Result<Self, CampusError> {
        let config_dir = config_dir.into();
        let config = Self::load_config(&config_dir)?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_dir,
        })
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> Result<Self, CampusError> {
        Self::new("./config")
    }

    /// Returns the current configuration.
    pub async fn get(&self) -> AppConfig {
        self.config.read().await.clone()
    }

    /// Reloads the configuration from disk.
    pub async fn reload(&self) -> Result<(), CampusError> {
        let new_config = Self::load_config(&self.config_dir)?;
        let mut config = self.config.write().await;
        *config = new_config;
        info!("Configuration reloaded successfully");
        Ok(())
    }

    /// Loads configuration from the specified directory.
    fn load_config(config_dir: &str) -> Result<AppConfig, CampusError> {
        // Load .env file if present
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let environment =
            std::env::var("CAMPUS_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        info!("Loading configuration for environment: {}", environment);

        let mut builder = Config::builder();

        // 1. Load default configuration
        let default_path = format!("{}/default.toml", config_dir);
        if Path::new(&default_path).exists() {
            debug!("Loading default config from: {}", default_path);
            builder = builder.add_source(File::with_name(&default_path).required(false));
        }

        // 2. Load environment-specific configuration
        let env_path = format!("{}/{}.toml", config_dir, environment);
        if Path::new(&env_path).exists() {
            debug!("Loading environment config from: {}", env_path);
            builder = builder.add_source(File::with_name(&env_path).required(false));
        }

        // 3. Load local overrides (not committed to version control)
        let local_path = format!("{}/local.toml", config_dir);
        if Path::new(&local_path).exists() {
            debug!("Loading local config from: {}", local_path);
            builder = builder.add_source(File::with_name(&local_path).required(false));
        }

        // 4. Override with environment variables (CAMPUS_ prefix)
        builder = builder.add_source(
            Environment::with_prefix("CAMPUS")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_error_to_campus_error)?;

        let app_config: AppConfig = config
            .try_deserialize()
            .map_err(config_error_to_campus_error)?;

        Self::validate_config(&app_config)?;

        Ok(app_config)
    }

    /// Validates the configuration.
    fn validate_config(config: &AppConfig) -> Result<(), CampusError> {
        // Warn about default JWT secret in production
        if config.app.environment == "production"
            && config.security.jwt_secret == "change-me-in-production"
        {
            warn!("Using default JWT secret in production! This is a security risk.");
        }

        if config.redis.enabled && config.redis.url.is_empty() {
            return Err(CampusError::Configuration(
                "Redis URL is required when Redis is enabled".to_string(),
            ));
        }

        if config.cache.default_ttl_secs == 0 {
            return Err(CampusError::Configuration(
                "Default cache TTL must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

fn config_error_to_campus_error(err: ConfigError) -> CampusError {
    CampusError::Configuration(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_config_validates() {
        let config = AppConfig::default();
        assert!(ConfigLoader::validate_config(&config).is_ok());
    }

    #[tokio::test]
    async fn test_zero_default_ttl_rejected() {
        let mut config = AppConfig::default();
        config.cache.default_ttl_secs = 0;
        assert!(ConfigLoader::validate_config(&config).is_err());
    }

    #[tokio::test]
    async fn test_reload_picks_up_edited_file() {
        let dir = std::env::temp_dir().join(format!("campus-config-reload-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("default.toml");
        std::fs::write(&path, "[server]\nport = 18080\n").unwrap();

        let loader = ConfigLoader::new(dir.to_string_lossy().into_owned()).unwrap();
        assert_eq!(loader.get().await.server.port, 18080);

        std::fs::write(&path, "[server]\nport = 18081\n").unwrap();
        loader.reload().await.unwrap();
        assert_eq!(loader.get().await.server.port, 18081);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_missing_redis_url_rejected() {
        let mut config = AppConfig::default();
        config.redis.url = String::new();
        assert!(ConfigLoader::validate_config(&config).is_err());
    }
}
