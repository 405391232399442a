//! # Configuration Management for ClickHaus
//!
//! This crate provides centralized configuration structures for ClickHaus
//! components: the ClickHouse connection settings handed to the external
//! client, and the compiler settings used when rendering SQL.
//!
//! ## Quick Start
//!
//! ### Programmatic Configuration
//! ```rust
//! use config::{DatabaseConfig, QueryConfig};
//!
//! let db_config = DatabaseConfig::new(
//!     "localhost".to_string(), 8123, "analytics".to_string(),
//!     "default".to_string(), "".to_string(),
//!     false, 30, 10,
//! );
//! assert_eq!(db_config.http_url(), "http://localhost:8123");
//!
//! let query_config = QueryConfig::default();
//! assert!(query_config.escape_strings);
//! ```
//!
//! ### TOML File Configuration
//! ```toml
//! [database]
//! host = "localhost"
//! port = 8123
//! database = "analytics"
//! username = "default"
//! password = ""
//! secure = false
//! connection_timeout_seconds = 30
//! max_connections = 10
//!
//! [query]
//! escape_strings = true
//! log_queries = false
//! ```
//!
//! Load configuration:
//! ```rust,no_run
//! use config::AppConfig;
//!
//! // Load from clickhaus.toml
//! let config = AppConfig::load()?;
//!
//! // Or load from custom path
//! let config = AppConfig::from_file("config/production.toml")?;
//! # Ok::<(), config::ConfigError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::{env, path::Path};
use thiserror::Error;

const DEFAULT_CONFIG_PATH: &str = "./clickhaus.toml";
const CONFIG_PATH_VAR: &str = "CLICKHAUS_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Environment variable error: {0}")]
    Env(#[from] env::VarError),
    #[error("Dotenvy error: {0}")]
    Dotenvy(#[from] dotenvy::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub query: QueryConfig,
}

/// ClickHouse connection settings, consumed by the external client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub secure: bool,
    pub connection_timeout_seconds: u64,
    pub max_connections: u32,
}

/// SQL compiler settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Escape `\` and `'` inside string literals. Disabling reproduces raw
    /// single-quoting, which is unsafe for untrusted input.
    pub escape_strings: bool,
    /// Log every executed statement at info level instead of debug
    pub log_queries: bool,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            escape_strings: true,
            log_queries: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the TOML file named in .env or the default path
    pub fn load() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(e.into());
            }
        }

        // Path from CLICKHAUS_CONFIG, set directly or through .env
        match env::var(CONFIG_PATH_VAR) {
            Ok(config_path) => Self::from_file(&config_path),
            Err(env::VarError::NotPresent) => Self::from_default_path(),
            Err(e) => Err(e.into()),
        }
    }

    /// Fall back to DEFAULT_CONFIG_PATH
    fn from_default_path() -> Result<Self, ConfigError> {
        if Path::new(DEFAULT_CONFIG_PATH).exists() {
            Self::from_file(DEFAULT_CONFIG_PATH)
        } else {
            Err(ConfigError::Invalid(format!(
                "Config path must be specified as {} or in {} file",
                CONFIG_PATH_VAR, DEFAULT_CONFIG_PATH
            )))
        }
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.host.is_empty() {
            return Err(ConfigError::Invalid(
                "Database host cannot be empty".to_string(),
            ));
        }
        if self.database.port == 0 {
            return Err(ConfigError::Invalid(
                "Database port cannot be zero".to_string(),
            ));
        }
        if self.database.database.is_empty() {
            return Err(ConfigError::Invalid(
                "Database name cannot be empty".to_string(),
            ));
        }
        if self.database.username.is_empty() {
            return Err(ConfigError::Invalid(
                "Database username cannot be empty".to_string(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "Database max_connections must be greater than 0".to_string(),
            ));
        }
        if self.database.connection_timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "Database connection_timeout_seconds must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl DatabaseConfig {
    /// Create a new database configuration
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        host: String,
        port: u16,
        database: String,
        username: String,
        password: String,
        secure: bool,
        connection_timeout_seconds: u64,
        max_connections: u32,
    ) -> Self {
        Self {
            host,
            port,
            database,
            username,
            password,
            secure,
            connection_timeout_seconds,
            max_connections,
        }
    }

    /// HTTP interface endpoint
    pub fn http_url(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        format!("{}://{}:{}", scheme, self.host, self.port)
    }
}
