//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Geofence policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeofenceConfig {
    /// Accepted check-in radius around a branch, in meters
    #[serde(default = "default_max_distance")]
    pub max_distance_meters: f64,

    /// How long the client should wait for a position fix, in seconds
    #[serde(default = "default_position_timeout")]
    pub position_timeout_seconds: u64,
}

fn default_max_distance() -> f64 {
    crate::geo::DEFAULT_GEOFENCE_RADIUS_METERS
}

fn default_position_timeout() -> u64 {
    15
}

impl Default for GeofenceConfig {
    fn default() -> Self {
        Self {
            max_distance_meters: default_max_distance(),
            position_timeout_seconds: default_position_timeout(),
        }
    }
}

/// Short-link resolver configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Bound on one resolution round trip, in seconds
    #[serde(default = "default_resolver_timeout")]
    pub timeout_seconds: u64,

    /// User agent string sent with resolution requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_resolver_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("presence-agent/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_resolver_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub geofence: GeofenceConfig,

    #[serde(default)]
    pub resolver: ResolverConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            geofence: GeofenceConfig::default(),
            resolver: ResolverConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.geofence.max_distance_meters.is_finite()
            || self.geofence.max_distance_meters <= 0.0
        {
            return Err(ConfigError::ValidationError(
                "Geofence radius must be a positive number of meters".to_string(),
            ));
        }

        if self.resolver.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "Resolver timeout must be greater than 0".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        if self.server.cors_origin.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "cors_origin must be \"*\" or an origin URL".to_string(),
            ));
        }

        Ok(())
    }
}
