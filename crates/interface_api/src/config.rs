//! API configuration
//!
//! Values come from an optional `config/lost_found.toml` and are then
//! overridden by `API_`-prefixed environment variables, e.g.
//! `API_PORT=9000` or `API_STORAGE_BACKEND=file`. Anything unset falls back
//! to [`ApiConfig::default`].

use serde::{Deserialize, Serialize};
use std::fmt;

use domain_claims::ClaimMode;

/// Where items and claims are stored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process memory; everything is lost on restart
    #[default]
    Memory,
    /// A single JSON document at `data_file`
    File,
    /// PostgreSQL at `database_url`
    Postgres,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Memory => f.write_str("memory"),
            StorageBackend::File => f.write_str("file"),
            StorageBackend::Postgres => f.write_str("postgres"),
        }
    }
}

/// API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// JWT secret for authentication
    pub jwt_secret: String,
    /// JWT expiration in seconds
    pub jwt_expiration_secs: u64,
    pub storage_backend: StorageBackend,
    /// Used by the `postgres` backend
    pub database_url: String,
    /// Used by the `file` backend
    pub data_file: String,
    /// Whether claims wait for review or are decided by their answers
    pub claim_mode: ClaimMode,
    /// Enables `/auth/login` against the built-in demo users
    pub allow_demo_login: bool,
    /// Log level
    pub log_level: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expiration_secs: 3600,
            storage_backend: StorageBackend::Memory,
            database_url: "postgres://localhost/lost_found".to_string(),
            data_file: "data/lost_found.json".to_string(),
            claim_mode: ClaimMode::Review,
            allow_demo_login: true,
            log_level: "info".to_string(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `config/lost_found.toml` (if present) and
    /// the environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config/lost_found")
    }

    /// Loads configuration from the named file (extension optional) and
    /// the environment
    pub fn load_from(file: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name(file).required(false))
            .add_source(config::Environment::with_prefix("API").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
