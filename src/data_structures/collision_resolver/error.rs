// Copyright (c) 2025 Nalu Link Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Error types for short-code collision resolution.

use crate::data_structures::base62::Base62Error;

/// Errors that can occur while resolving a short-code collision.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum CollisionError {
    /// The strategy name is not one of `linear`, `regenerate` or `append`
    #[error("Unknown collision resolution strategy: {0}. Must be: linear, regenerate, or append")]
    UnknownStrategy(String),

    /// Every candidate within the attempt budget was already taken
    #[error("Unable to resolve collision for '{code}' after {attempts} attempts")]
    Exhausted {
        /// The code that collided.
        code: String,
        /// Attempts spent.
        attempts: u32,
    },

    /// The colliding code contains characters that cannot be probed
    #[error("Short code '{code}' cannot be probed: {source}")]
    InvalidCode {
        /// The code that collided.
        code: String,
        /// Why it could not be read as base-62 digits.
        #[source]
        source: Base62Error,
    },
}

/// Result type for collision resolution
pub type Result<T> = std::result::Result<T, CollisionError>;
