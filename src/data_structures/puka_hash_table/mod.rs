// Copyright (c) 2025 Nalu Link Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Puka Hash Table implementation for short-code lookups.
//!
//! A separate-chaining hash table that backs short code → URL lookups and
//! collision checks in Nalu Link. It is built without any of the standard
//! library's associative containers so that its hashing, chaining and
//! resizing behavior is fully specified and observable through [`HashTableStats`].
//!
//! # Features
//!
//! - Polynomial rolling hash (multiplier 31) over the key's string form
//! - Chains stored as index-linked lists in a flat arena
//! - Automatic doubling with a full rehash before the load factor exceeds 0.75
//! - Collision and chain-length statistics
//!
//! # Example
//!
//! ```
//! use nalu_link_lib::data_structures::puka_hash_table::PukaHashTable;
//!
//! let mut table = PukaHashTable::<String, String>::new();
//!
//! // A new key
//! assert!(table.put("g8".to_string(), "https://example.com".to_string()));
//!
//! // Updating an existing key returns false
//! assert!(!table.put("g8".to_string(), "https://example.org".to_string()));
//! assert_eq!(table.get("g8").map(String::as_str), Some("https://example.org"));
//!
//! assert!(table.delete("g8"));
//! assert!(!table.contains("g8"));
//! ```
//!
//! # Concurrency
//!
//! The table has no internal synchronization. Shared use goes through a
//! lock owned by the caller, see [`crate::service::LinkState`].

// Module declarations
mod config;
mod hash;
mod table;

// Re-exports
pub use config::{PukaHashTableConfig, DEFAULT_INITIAL_CAPACITY, DEFAULT_MAX_LOAD_FACTOR};
pub use hash::{bucket_index, HASH_MULTIPLIER};
pub use table::{HashTableStats, PukaHashTable};
