// Copyright (c) 2025 Nalu Link Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Short-code collision detection and resolution.
//!
//! A code "collides" when it is already present in a [`CodeRegistry`],
//! normally the code → URL [`PukaHashTable`]. The [`CollisionResolver`] walks
//! candidates produced by a [`ResolutionStrategy`] until one is free or the
//! attempt budget runs out, and counts how often each strategy succeeded.
//!
//! # Example
//!
//! ```
//! use nalu_link_lib::data_structures::collision_resolver::{CollisionResolver, ResolutionStrategy};
//! use nalu_link_lib::data_structures::puka_hash_table::PukaHashTable;
//!
//! let mut codes: PukaHashTable<String, String> = PukaHashTable::new();
//! codes.put("abc".to_string(), "https://example.com".to_string());
//!
//! let mut resolver = CollisionResolver::new();
//! assert!(resolver.detect(&codes, "abc"));
//!
//! let resolution = resolver.resolve(&codes, "abc", ResolutionStrategy::Append, 10).unwrap();
//! assert_eq!(resolution.code, "abc1");
//! assert_eq!(resolution.attempts, 1);
//! ```

pub mod error;
mod strategy;

pub use error::{CollisionError, Result as CollisionResult};
pub use strategy::{
    append_counter, increment_code, linear_probe, regenerate_code, regenerate_code_at,
    ResolutionStrategy,
};

use serde::Serialize;

use crate::data_structures::puka_hash_table::PukaHashTable;

/// Anything that can tell whether a short code is already assigned.
pub trait CodeRegistry {
    /// Returns whether `code` is taken.
    fn is_taken(&self, code: &str) -> bool;
}

impl<V> CodeRegistry for PukaHashTable<String, V> {
    fn is_taken(&self, code: &str) -> bool {
        self.contains(code)
    }
}

/// A successfully resolved collision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The free code that was found.
    pub code: String,
    /// Number of candidates tried, including the successful one.
    pub attempts: u32,
    /// Strategy that produced the code.
    pub strategy: ResolutionStrategy,
}

/// Snapshot of resolver counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollisionStats {
    pub total_collisions: u64,
    pub linear_probing_used: u64,
    pub regeneration_used: u64,
    pub append_counter_used: u64,
    pub linear_probing_percentage: f64,
    pub regeneration_percentage: f64,
    pub append_counter_percentage: f64,
    pub max_attempts: u32,
}

/// Resolves short-code collisions and tracks strategy usage.
#[derive(Debug, Clone, Default)]
pub struct CollisionResolver {
    total_collisions: u64,
    linear_probing_used: u64,
    regeneration_used: u64,
    append_counter_used: u64,
    max_attempts: u32,
}

impl CollisionResolver {
    /// Creates a resolver with zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether `code` is already taken in `registry`.
    pub fn detect<R: CodeRegistry + ?Sized>(&self, registry: &R, code: &str) -> bool {
        registry.is_taken(code)
    }

    /// Tries up to `max_attempts` candidates for the colliding `code`.
    ///
    /// Counters only move when a free code is found; an exhausted budget
    /// leaves them untouched.
    pub fn resolve<R: CodeRegistry + ?Sized>(
        &mut self,
        registry: &R,
        code: &str,
        strategy: ResolutionStrategy,
        max_attempts: u32,
    ) -> CollisionResult<Resolution> {
        for attempt in 1..=max_attempts {
            let candidate = strategy.candidate(code, attempt)?;
            if !self.detect(registry, &candidate) {
                self.record(strategy, attempt);
                tracing::debug!(
                    code,
                    candidate = %candidate,
                    attempt,
                    strategy = strategy.resolved_name(),
                    "Resolved short code collision"
                );
                return Ok(Resolution {
                    code: candidate,
                    attempts: attempt,
                    strategy,
                });
            }
            tracing::trace!(code, candidate = %candidate, attempt, "Candidate already taken");
        }

        Err(CollisionError::Exhausted {
            code: code.to_string(),
            attempts: max_attempts,
        })
    }

    /// Parses `strategy` and resolves with it.
    pub fn resolve_named<R: CodeRegistry + ?Sized>(
        &mut self,
        registry: &R,
        code: &str,
        strategy: &str,
        max_attempts: u32,
    ) -> CollisionResult<Resolution> {
        let strategy = strategy.parse::<ResolutionStrategy>()?;
        self.resolve(registry, code, strategy, max_attempts)
    }

    /// Returns the current counters with per-strategy percentages.
    pub fn stats(&self) -> CollisionStats {
        let percentage = |used: u64| {
            if self.total_collisions == 0 {
                0.0
            } else {
                (used as f64 / self.total_collisions as f64 * 10_000.0).round() / 100.0
            }
        };

        CollisionStats {
            total_collisions: self.total_collisions,
            linear_probing_used: self.linear_probing_used,
            regeneration_used: self.regeneration_used,
            append_counter_used: self.append_counter_used,
            linear_probing_percentage: percentage(self.linear_probing_used),
            regeneration_percentage: percentage(self.regeneration_used),
            append_counter_percentage: percentage(self.append_counter_used),
            max_attempts: self.max_attempts,
        }
    }

    /// Zeroes every counter.
    pub fn reset_stats(&mut self) {
        *self = Self::default();
    }

    fn record(&mut self, strategy: ResolutionStrategy, attempts: u32) {
        self.total_collisions += 1;
        match strategy {
            ResolutionStrategy::Linear => self.linear_probing_used += 1,
            ResolutionStrategy::Regenerate => self.regeneration_used += 1,
            ResolutionStrategy::Append => self.append_counter_used += 1,
        }
        self.max_attempts = self.max_attempts.max(attempts);
    }
}
