// Centralized configuration management for the permissions service
// Load ALL env vars ONCE at startup

use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    /// None selects the in-memory permission store
    pub database: Option<DatabaseConfig>,
    pub cors_allowed_origins: Vec<String>,
    pub features: FeatureConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub environment: Environment,
    pub rust_log: String,
}

/// Environment type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Environment {
    Development,
    Test,
    Staging,
    Production,
}

impl From<String> for Environment {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: u64,
    pub idle_timeout: u64,
    pub max_lifetime: u64,
}

/// Feature flags
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureConfig {
    pub enable_openapi: bool,
    pub disable_embedded_migrations: bool,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Helper function to get optional env var with default
        let get_or_default =
            |key: &str, default: &str| -> String { lookup(key).unwrap_or_else(|| default.to_string()) };

        // Helper function to parse env var with default
        let parse_or_default = |key: &str, default: &str| -> Result<u32, ConfigError> {
            get_or_default(key, default).parse().map_err(|_| {
                ConfigError::InvalidValue(key.to_string(), "not a valid u32".to_string())
            })
        };

        let parse_u64_or_default = |key: &str, default: &str| -> Result<u64, ConfigError> {
            get_or_default(key, default).parse().map_err(|_| {
                ConfigError::InvalidValue(key.to_string(), "not a valid u64".to_string())
            })
        };

        let parse_bool_or_default = |key: &str, default: &str| -> bool {
            get_or_default(key, default).to_lowercase() == "true"
        };

        // Parse bind address to extract port
        let bind_address = get_or_default("BIND_ADDRESS", "0.0.0.0:8080");
        let port = bind_address
            .rsplit(':')
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(|| {
                ConfigError::InvalidValue(
                    "BIND_ADDRESS".to_string(),
                    format!("'{}' has no valid port", bind_address),
                )
            })?;

        let environment = Environment::from(get_or_default("ENVIRONMENT", "development"));
        let rust_log = get_or_default("RUST_LOG", "storefront_permissions=info,tower_http=info");

        let database = match lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()) {
            Some(url) => {
                let parsed = url::Url::parse(&url).map_err(|e| {
                    ConfigError::InvalidValue("DATABASE_URL".to_string(), e.to_string())
                })?;
                if !matches!(parsed.scheme(), "postgres" | "postgresql") {
                    return Err(ConfigError::InvalidValue(
                        "DATABASE_URL".to_string(),
                        format!("unsupported scheme '{}'", parsed.scheme()),
                    ));
                }

                Some(DatabaseConfig {
                    url,
                    max_connections: parse_or_default("DATABASE_MAX_CONNECTIONS", "20")?,
                    min_connections: parse_or_default("DATABASE_MIN_CONNECTIONS", "2")?,
                    connect_timeout: parse_u64_or_default("DATABASE_CONNECT_TIMEOUT", "30")?,
                    idle_timeout: parse_u64_or_default("DATABASE_IDLE_TIMEOUT", "600")?,
                    max_lifetime: parse_u64_or_default("DATABASE_MAX_LIFETIME", "1800")?,
                })
            },
            None => None,
        };

        // Production must run against a real database
        if environment == Environment::Production && database.is_none() {
            return Err(ConfigError::MissingVar("DATABASE_URL".to_string()));
        }

        let cors_allowed_origins: Vec<String> = get_or_default("CORS_ALLOWED_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let features = FeatureConfig {
            enable_openapi: parse_bool_or_default("ENABLE_OPENAPI", "true"),
            disable_embedded_migrations: parse_bool_or_default(
                "DISABLE_EMBEDDED_MIGRATIONS",
                "false",
            ),
        };

        Ok(Self {
            server: ServerConfig {
                bind_address,
                port,
                environment,
                rust_log,
            },
            database,
            cors_allowed_origins,
            features,
        })
    }

    pub fn environment(&self) -> &Environment {
        &self.server.environment
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.server.environment == Environment::Production
    }
}
