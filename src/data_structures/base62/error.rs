// Copyright (c) 2025 Nalu Link Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Error types for the base-62 codec.

/// Errors that can occur while encoding or decoding short codes.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum Base62Error {
    /// Negative numbers have no base-62 representation
    #[error("Cannot encode negative number {0}")]
    NegativeNumber(i64),

    /// Decoding requires at least one character
    #[error("Cannot decode empty string")]
    EmptyInput,

    /// A character outside `0-9a-zA-Z` was found
    #[error("Invalid character '{character}' at position {position} in base62 string")]
    InvalidCharacter {
        /// The offending character.
        character: char,
        /// Character index within the input.
        position: usize,
    },

    /// The decoded value does not fit in 64 bits
    #[error("Base62 string '{0}' exceeds the 64-bit range")]
    Overflow(String),
}

/// Result type for base-62 operations
pub type Result<T> = std::result::Result<T, Base62Error>;
