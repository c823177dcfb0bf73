//! Configuration module for the order engine.
//!
//! Configuration is read from an optional YAML file and then overridden by
//! environment variables, so deployments can ship a checked-in baseline and
//! inject secrets at runtime.
//!
//! # Environment overrides
//!
//! - `HTTP_PORT`: HTTP server port
//! - `BIND_ADDRESS`: bind address
//! - `DATABASE_URL`: Postgres connection string
//! - `DATABASE_MAX_CONNECTIONS`: pool size
//! - `JWT_SECRET_KEY`: bearer-token signing secret
//! - `DEFAULT_SHIPPING_FEE`: fee applied when an order omits one

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Authentication configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Ordering business defaults.
    #[serde(default)]
    pub ordering: OrderingConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server port for the REST endpoints.
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// Bind address.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: default_http_port(),
            bind_address: default_bind_address(),
        }
    }
}

const fn default_http_port() -> u16 {
    8080
}
fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

/// Database configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Postgres connection string; usually injected via `DATABASE_URL`.
    #[serde(default)]
    pub url: String,
    /// Connection pool size.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
        }
    }
}

const fn default_max_connections() -> u32 {
    5
}

/// Authentication configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret; usually injected via `JWT_SECRET_KEY`.
    #[serde(default)]
    pub jwt_secret: String,
}

/// Ordering business defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderingConfig {
    /// Shipping fee applied when a request does not carry one.
    #[serde(default = "default_shipping_fee")]
    pub default_shipping_fee: Decimal,
}

impl Default for OrderingConfig {
    fn default() -> Self {
        Self {
            default_shipping_fee: default_shipping_fee(),
        }
    }
}

fn default_shipping_fee() -> Decimal {
    Decimal::from(30000)
}

impl Config {
    /// Apply environment overrides via the given lookup.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ValidationError`] when a variable is present but
    /// unparseable.
    pub fn apply_env(
        &mut self,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(port) = var("HTTP_PORT") {
            self.server.http_port = port.parse().map_err(|_| {
                ConfigError::ValidationError(format!("HTTP_PORT is not a port: {port}"))
            })?;
        }
        if let Some(addr) = var("BIND_ADDRESS") {
            self.server.bind_address = addr;
        }
        if let Some(url) = var("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(size) = var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = size.parse().map_err(|_| {
                ConfigError::ValidationError(format!(
                    "DATABASE_MAX_CONNECTIONS is not a number: {size}"
                ))
            })?;
        }
        if let Some(secret) = var("JWT_SECRET_KEY") {
            self.auth.jwt_secret = secret;
        }
        if let Some(fee) = var("DEFAULT_SHIPPING_FEE") {
            self.ordering.default_shipping_fee = fee.parse().map_err(|_| {
                ConfigError::ValidationError(format!(
                    "DEFAULT_SHIPPING_FEE is not a decimal: {fee}"
                ))
            })?;
        }
        Ok(())
    }

    /// Check the configuration is runnable.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ValidationError`] naming the missing or invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.url.is_empty() {
            return Err(ConfigError::ValidationError(
                "database.url is required (set DATABASE_URL)".to_string(),
            ));
        }
        if self.auth.jwt_secret.is_empty() {
            return Err(ConfigError::ValidationError(
                "auth.jwt_secret is required (set JWT_SECRET_KEY)".to_string(),
            ));
        }
        if self.ordering.default_shipping_fee < Decimal::ZERO {
            return Err(ConfigError::ValidationError(
                "ordering.default_shipping_fee must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load configuration: optional YAML file, then environment overrides.
///
/// With no path and no `config.yaml` in the working directory, starts from
/// defaults.
///
/// # Errors
///
/// Read, parse or validation failures; see [`ConfigError`].
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(path) => parse_file(path)?,
        None => {
            if std::path::Path::new("config.yaml").exists() {
                parse_file("config.yaml")?
            } else {
                Config::default()
            }
        }
    };

    config.apply_env(|key| std::env::var(key).ok())?;
    config.validate()?;
    Ok(config)
}

fn parse_file(path: &str) -> Result<Config, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
        path: path.to_string(),
        source,
    })?;
    Ok(serde_yaml_bw::from_str(&raw)?)
}
