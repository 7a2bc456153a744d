// Copyright (c) 2025 Nalu Link Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Configuration options for the Puka hash table.

/// Default number of buckets for a fresh table.
pub const DEFAULT_INITIAL_CAPACITY: usize = 16;

/// Load factor the table never exceeds after an insert completes.
pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.75;

/// Configuration for the Puka hash table.
#[derive(Debug, Clone)]
pub struct PukaHashTableConfig {
    /// Number of buckets allocated up front. Doubles on every resize.
    pub initial_capacity: usize,

    /// Maximum ratio of live entries to buckets.
    /// An insert that would push the table past this value resizes first.
    pub max_load_factor: f64,
}

impl PukaHashTableConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial bucket count.
    ///
    /// # Arguments
    ///
    /// * `initial_capacity` - Number of buckets; zero is raised to one.
    ///
    /// # Returns
    ///
    /// Self with the updated configuration.
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity.max(1);
        self
    }

    /// Sets the maximum load factor.
    ///
    /// # Arguments
    ///
    /// * `max_load_factor` - The maximum load factor (clamped to 0.1..=0.95).
    ///
    /// # Returns
    ///
    /// Self with the updated configuration.
    pub fn with_max_load_factor(mut self, max_load_factor: f64) -> Self {
        self.max_load_factor = max_load_factor.clamp(0.1, 0.95);
        self
    }
}

impl Default for PukaHashTableConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
        }
    }
}
