//! Error types for Niihau URL Trie.
//!
//! This module defines the error types that can occur during Niihau Trie operations.

/// Errors that can occur in Niihau Trie operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum NiihauTrieError {
    /// Error when an empty key is provided.
    #[error("Empty key not allowed")]
    EmptyKey,

    /// Error when a key exceeds the maximum depth allowed.
    #[error("Key '{key}' exceeds maximum trie depth of {max_depth}")]
    KeyTooLong {
        /// The key that was too long.
        key: String,
        /// The maximum allowed depth.
        max_depth: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NiihauTrieError::EmptyKey;
        assert_eq!(err.to_string(), "Empty key not allowed");

        let err = NiihauTrieError::KeyTooLong {
            key: "test".to_string(),
            max_depth: 10,
        };
        assert_eq!(err.to_string(), "Key 'test' exceeds maximum trie depth of 10");
    }
}
