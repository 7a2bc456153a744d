// Copyright (c) 2025 Nalu Link Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Node implementation for the Kona LRU cache.
//!
//! Nodes live in the cache's arena and refer to their neighbours by arena
//! handle, so the doubly-linked recency list needs neither raw pointers nor
//! shared ownership.

/// Arena handle of the most-recently-used sentinel.
pub(crate) const HEAD: usize = 0;

/// Arena handle of the least-recently-used sentinel.
pub(crate) const TAIL: usize = 1;

/// A node in the Kona recency list.
///
/// # Type Parameters
///
/// * `K` - Key type.
/// * `V` - Value type.
#[derive(Debug, Clone)]
pub(crate) struct Node<K, V> {
    /// Key and value; `None` for sentinels and recycled slots
    pub(crate) entry: Option<(K, V)>,

    /// Handle of the neighbour closer to the MRU end
    pub(crate) prev: usize,

    /// Handle of the neighbour closer to the LRU end
    pub(crate) next: usize,
}

impl<K, V> Node<K, V> {
    /// Creates a detached node holding `key` and `value`.
    pub(crate) fn new(key: K, value: V) -> Self {
        Self {
            entry: Some((key, value)),
            prev: HEAD,
            next: TAIL,
        }
    }

    /// Creates a sentinel node with no entry.
    ///
    /// The two sentinels bound the list so linking and unlinking never have
    /// to special-case the ends.
    pub(crate) fn sentinel() -> Self {
        Self {
            entry: None,
            prev: HEAD,
            next: TAIL,
        }
    }

    /// Returns the stored value, if any.
    pub(crate) fn value(&self) -> Option<&V> {
        self.entry.as_ref().map(|(_, value)| value)
    }
}
