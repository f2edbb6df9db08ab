//! Configuration management for the catalog server

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// Store connection string. `memory://` selects the in-process store.
    pub url: Option<String>,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which store backs the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres(String),
    Memory,
}

impl DatabaseConfig {
    /// Resolve the configured connection string to a backend
    pub fn backend(&self) -> Result<StoreBackend, ConfigError> {
        match self.url.as_deref().map(str::trim) {
            None | Some("") => Err(ConfigError::Message(
                "database.url is required (set DATABASE_URL)".to_string(),
            )),
            Some(url) if url.starts_with("memory://") => Ok(StoreBackend::Memory),
            Some(url) => Ok(StoreBackend::Postgres(url.to_string())),
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default"))
            // Layer on the environment-specific file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add environment variables (CATALOG_SERVER__PORT, ...)
            .add_source(environment())
            // Override database URL from DATABASE_URL env var if present
            .set_override_option("database.url", env::var("DATABASE_URL").ok())?
            // Override listen port from PORT env var if present
            .set_override_option(
                "server.port",
                env::var("PORT").ok().and_then(|p| p.parse::<i64>().ok()),
            )?
            .build()?;

        let config: AppConfig = config.try_deserialize()?;
        config.database.backend()?;
        Ok(config)
    }
}

/// `CATALOG_` variables, with `__` between section and key
fn environment() -> Environment {
    Environment::with_prefix("CATALOG")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            min_connections: 2,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
