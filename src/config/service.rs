//! Service configuration module.
//!
//! Settings for the link service itself: the public base URL short links are
//! rendered against, and where the in-memory store keeps its snapshot.

use super::ConfigResult;
use super::Validate;
use crate::error::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

/// Service configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL prepended to short codes, without a trailing slash
    pub base_url: String,

    /// JSON snapshot loaded at startup and written back after changes
    pub snapshot_path: Option<PathBuf>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            snapshot_path: None,
        }
    }
}

impl ServiceConfig {
    /// Renders the public short URL for `code`.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{code}", self.base_url.trim_end_matches('/'))
    }
}

impl Validate for ServiceConfig {
    fn validate(&self) -> ConfigResult<()> {
        let parsed = Url::parse(&self.base_url).map_err(|e| {
            ConfigError::ValidationError(format!("Invalid base_url '{}': {e}", self.base_url))
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::ValidationError(format!(
                "base_url must use http or https, got '{}'",
                parsed.scheme()
            )));
        }

        if let Some(path) = &self.snapshot_path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::ValidationError(
                    "snapshot_path cannot be empty".to_string(),
                ));
            }
        }

        Ok(())
    }
}
