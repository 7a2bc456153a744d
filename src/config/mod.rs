//! Configuration module for Nalu Link.
//!
//! Settings are layered from built-in defaults, an optional file (TOML, YAML,
//! JSON) and environment variables, then validated before use.

use std::path::{Path, PathBuf};

use crate::error::config::ConfigError;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

pub mod service;
pub mod structures;

pub use service::ServiceConfig;
pub use structures::StructuresConfig;

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Default configuration location
pub const DEFAULT_CONFIG_PATH: &str = "config/nalu.toml";

/// Default environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "NALU";

/// A trait for types that can be validated.
pub trait Validate {
    /// Validates that the configuration is correct.
    fn validate(&self) -> ConfigResult<()>;
}

/// Main configuration for Nalu Link.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct NaluConfig {
    /// Data structure sizes and limits
    pub structures: StructuresConfig,

    /// Service configuration
    pub service: ServiceConfig,

    /// Log configuration
    pub log: LogConfig,
}

impl Validate for NaluConfig {
    fn validate(&self) -> ConfigResult<()> {
        self.structures.validate()?;
        self.service.validate()?;
        self.log.validate()?;
        Ok(())
    }
}

impl NaluConfig {
    /// Renders the configuration as TOML.
    pub fn to_toml(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Whether to log in JSON format
    pub json: bool,

    /// Whether to include source code locations in logs
    pub source_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            source_location: true,
        }
    }
}

impl Validate for LogConfig {
    fn validate(&self) -> ConfigResult<()> {
        match self.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            _ => Err(ConfigError::ValidationError(format!(
                "Invalid log level: {}",
                self.level
            ))),
        }
    }
}

/// Configuration loader for Nalu Link.
#[derive(Debug)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    env_prefix: String,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// # Arguments
    ///
    /// * `config_path` - Optional path to the configuration file
    /// * `env_prefix` - Prefix for environment variables that override configuration values
    pub fn new<P: AsRef<Path>>(config_path: Option<P>, env_prefix: &str) -> Self {
        Self {
            config_path: config_path.map(|p| p.as_ref().to_path_buf()),
            env_prefix: env_prefix.to_string(),
        }
    }

    /// Loads the configuration from a file and environment variables.
    ///
    /// A configured file that does not exist is an error.
    pub fn load(&self) -> ConfigResult<NaluConfig> {
        let mut builder = Config::builder().add_source(
            Config::try_from(&NaluConfig::default())
                .map_err(|e| ConfigError::ParseError(e.to_string()))?,
        );

        if let Some(path) = &self.config_path {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.clone()));
            }

            let format = match path.extension().and_then(|ext| ext.to_str()) {
                Some("toml") => FileFormat::Toml,
                Some("json") => FileFormat::Json,
                Some("yaml" | "yml") => FileFormat::Yaml,
                _ => return Err(ConfigError::UnsupportedFormat(path.clone())),
            };
            builder = builder.add_source(File::from(path.as_path()).format(format));
        }

        builder = builder.add_source(
            Environment::with_prefix(&self.env_prefix)
                .separator("__")
                .try_parsing(true),
        );

        let nalu_config: NaluConfig = builder
            .build()
            .and_then(|config| config.try_deserialize())
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        nalu_config.validate()?;

        Ok(nalu_config)
    }

    /// Like [`ConfigLoader::load`], but a missing file falls back to the
    /// defaults (still overridden by the environment).
    pub fn load_or_default(&self) -> ConfigResult<NaluConfig> {
        match self.load() {
            Err(ConfigError::FileNotFound(path)) => {
                tracing::warn!("Configuration file not found at {}, using defaults", path.display());
                ConfigLoader::new(None::<PathBuf>, &self.env_prefix).load()
            }
            other => other,
        }
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new(Some(DEFAULT_CONFIG_PATH), ENV_PREFIX)
    }
}
