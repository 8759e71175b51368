//! Configuration module for Disk Uploadr
//!
//! Handles loading and parsing of YAML configuration files with support for
//! environment variable expansion and validation. Every field has a default,
//! so the server also runs without any configuration file.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

mod loader;

pub use loader::ConfigLoader;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl Config {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        ConfigLoader::load(path)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.socket_addr()?;

        if self.storage.upload_dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "storage.upload_dir cannot be empty".into(),
            ));
        }

        if self.storage.public_dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "storage.public_dir cannot be empty".into(),
            ));
        }

        if self.metrics.enabled {
            self.metrics.address.parse::<SocketAddr>().map_err(|e| {
                ConfigError::ValidationError(format!(
                    "Invalid metrics address '{}': {}",
                    self.metrics.address, e
                ))
            })?;
        }

        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_address")]
    pub address: String,
}

impl ServerConfig {
    /// Parse the listen address
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.address.parse().map_err(|e| {
            ConfigError::ValidationError(format!(
                "Invalid server address '{}': {}",
                self.address, e
            ))
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
        }
    }
}

fn default_address() -> String {
    "0.0.0.0:4500".to_string()
}

/// Where uploads land and which directory is served publicly
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
            public_dir: default_public_dir(),
        }
    }
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("./uploaded")
}

fn default_public_dir() -> PathBuf {
    PathBuf::from("./public")
}

/// Metrics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_metrics_address")]
    pub address: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            address: default_metrics_address(),
        }
    }
}

fn default_metrics_address() -> String {
    "127.0.0.1:9090".to_string()
}
