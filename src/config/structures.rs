//! Data structure configuration module.
//!
//! Sizes and limits for the in-memory structures behind the shortener.

use super::ConfigResult;
use super::Validate;
use crate::data_structures::collision_resolver::ResolutionStrategy;
use crate::error::config::ConfigError;
use serde::{Deserialize, Serialize};

/// Upper bound accepted for `max_url_length`.
pub const MAX_URL_LENGTH_LIMIT: usize = 65_536;

/// Data structure configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StructuresConfig {
    /// Initial bucket count of the short code table
    pub hash_table_capacity: usize,

    /// Number of URL → code entries kept in the recency cache
    pub lru_capacity: usize,

    /// Number of most clicked links tracked in memory
    pub top_k: usize,

    /// Candidates tried before a collision is reported as unresolvable
    pub max_collision_attempts: u32,

    /// Strategy used when a request does not name one
    pub default_strategy: ResolutionStrategy,

    /// Results returned by a prefix search when the caller does not ask for a count
    pub max_search_results: usize,

    /// Longest URL accepted for shortening; also bounds the trie depth
    pub max_url_length: usize,
}

impl Default for StructuresConfig {
    fn default() -> Self {
        Self {
            hash_table_capacity: 1000,
            lru_capacity: 100,
            top_k: 10,
            max_collision_attempts: 10,
            default_strategy: ResolutionStrategy::Linear,
            max_search_results: 5,
            max_url_length: 2048,
        }
    }
}

impl Validate for StructuresConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.hash_table_capacity == 0 {
            return Err(ConfigError::ValidationError(
                "hash_table_capacity must be greater than 0".to_string(),
            ));
        }

        if self.lru_capacity == 0 {
            return Err(ConfigError::ValidationError(
                "lru_capacity must be greater than 0".to_string(),
            ));
        }

        if self.top_k == 0 {
            return Err(ConfigError::ValidationError(
                "top_k must be greater than 0".to_string(),
            ));
        }

        if self.max_collision_attempts == 0 {
            return Err(ConfigError::ValidationError(
                "max_collision_attempts must be greater than 0".to_string(),
            ));
        }

        if self.max_search_results == 0 {
            return Err(ConfigError::ValidationError(
                "max_search_results must be greater than 0".to_string(),
            ));
        }

        if self.max_url_length == 0 || self.max_url_length > MAX_URL_LENGTH_LIMIT {
            return Err(ConfigError::out_of_range(
                "structures.max_url_length",
                format!("must be between 1 and {MAX_URL_LENGTH_LIMIT}"),
            ));
        }

        Ok(())
    }
}
