//! Application configuration module
//!
//! Provides the server configuration and its layered loading:
//! built-in defaults, then an optional TOML file, then environment
//! variables. The binary loads `.env` before calling [`ServerConfig::load`].
//!
//! # Environment Variables
//!
//! | Variable | Field |
//! |---|---|
//! | `HOST`, `PORT` | bind address |
//! | `DATABASE_URL` | PostgreSQL connection (in-memory store when unset) |
//! | `JWT_SECRET`, `TOKEN_TTL_HOURS` | session tokens |
//! | `API_PREFIX` | route prefix, e.g. `/api` |
//! | `STATIC_DIR` | built single-page client |
//! | `CORS_ORIGIN` | allowed browser origin |
//! | `BCRYPT_COST` | password hashing cost |
//! | `ALLOW_ADMIN_REGISTRATION` | honour `isAdmin` on registration |
//! | `RUST_LOG` | tracing filter |

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Config file read when `TASKBOARD_CONFIG` is not set
pub const DEFAULT_CONFIG_FILE: &str = "taskboard.toml";

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: Option<String>,
    pub jwt_secret: Option<String>,
    pub token_ttl_hours: u64,
    pub api_prefix: String,
    pub static_dir: Option<PathBuf>,
    pub cors_origin: Option<String>,
    pub bcrypt_cost: u32,
    pub allow_admin_registration: bool,
    pub log_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            database_url: None,
            jwt_secret: None,
            // 30 days
            token_ttl_hours: 30 * 24,
            api_prefix: String::new(),
            static_dir: None,
            cors_origin: None,
            bcrypt_cost: 12,
            allow_admin_registration: false,
            log_filter: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Create a new ServerConfigBuilder
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Load defaults, the config file and the process environment
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("TASKBOARD_CONFIG").ok().map(PathBuf::from);
        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML config file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&text)?)
    }

    /// Override fields from environment-style lookups
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.port = parse_value("PORT", &port)?;
        }
        if let Some(url) = lookup("DATABASE_URL").filter(|v| !v.is_empty()) {
            self.database_url = Some(url);
        }
        if let Some(secret) = lookup("JWT_SECRET").filter(|v| !v.is_empty()) {
            self.jwt_secret = Some(secret);
        }
        if let Some(ttl) = lookup("TOKEN_TTL_HOURS") {
            self.token_ttl_hours = parse_value("TOKEN_TTL_HOURS", &ttl)?;
        }
        if let Some(prefix) = lookup("API_PREFIX") {
            self.api_prefix = prefix;
        }
        if let Some(dir) = lookup("STATIC_DIR").filter(|v| !v.is_empty()) {
            self.static_dir = Some(PathBuf::from(dir));
        }
        if let Some(origin) = lookup("CORS_ORIGIN").filter(|v| !v.is_empty()) {
            self.cors_origin = Some(origin);
        }
        if let Some(cost) = lookup("BCRYPT_COST") {
            self.bcrypt_cost = parse_value("BCRYPT_COST", &cost)?;
        }
        if let Some(flag) = lookup("ALLOW_ADMIN_REGISTRATION") {
            self.allow_admin_registration = parse_value("ALLOW_ADMIN_REGISTRATION", &flag)?;
        }
        if let Some(filter) = lookup("RUST_LOG") {
            self.log_filter = filter;
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bind_address()?;
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(ConfigError::InvalidValue {
                key: "bcrypt_cost",
                value: self.bcrypt_cost.to_string(),
            });
        }
        if !self.api_prefix.is_empty()
            && (!self.api_prefix.starts_with('/') || self.api_prefix.ends_with('/'))
        {
            return Err(ConfigError::InvalidValue {
                key: "api_prefix",
                value: self.api_prefix.clone(),
            });
        }
        if self.token_ttl_hours == 0 {
            return Err(ConfigError::InvalidValue {
                key: "token_ttl_hours",
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    /// Socket address the server listens on
    pub fn bind_address(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::InvalidAddress(format!("{}:{}", self.host, self.port)))
    }
}

fn parse_value<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

/// Builder for ServerConfig
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    config: ServerConfig,
}

impl ServerConfigBuilder {
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.config.database_url = Some(url.into());
        self
    }

    pub fn jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.config.jwt_secret = Some(secret.into());
        self
    }

    pub fn token_ttl_hours(mut self, hours: u64) -> Self {
        self.config.token_ttl_hours = hours;
        self
    }

    pub fn api_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.api_prefix = prefix.into();
        self
    }

    pub fn static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.static_dir = Some(dir.into());
        self
    }

    pub fn cors_origin(mut self, origin: impl Into<String>) -> Self {
        self.config.cors_origin = Some(origin.into());
        self
    }

    pub fn bcrypt_cost(mut self, cost: u32) -> Self {
        self.config.bcrypt_cost = cost;
        self
    }

    pub fn allow_admin_registration(mut self, allow: bool) -> Self {
        self.config.allow_admin_registration = allow;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<ServerConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
    #[error("invalid bind address: {0}")]
    InvalidAddress(String),
}
