// Copyright (c) 2025 Nalu Link Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Kona LRU Cache Implementation
//!
//! A fixed-capacity least-recently-used cache mapping original URLs to their
//! short codes. Lookups go through a [`PukaHashTable`] from key to arena
//! handle; recency is tracked by a doubly-linked list of arena nodes bounded
//! by two sentinels.
//!
//! # Key Features
//!
//! * O(1) average `get`, `put`, `contains` and `delete`
//! * Exactly one eviction per insert that overflows the capacity
//! * Hit, miss and eviction counters
//!
//! # Example
//!
//! ```
//! use nalu_link_lib::data_structures::kona_lru_cache::KonaLruCache;
//!
//! let mut cache = KonaLruCache::new(2);
//! cache.put("a".to_string(), 1);
//! cache.put("b".to_string(), 2);
//! assert_eq!(cache.get("a"), Some(&1));
//!
//! // "b" is now the least recently used entry
//! cache.put("c".to_string(), 3);
//! assert!(!cache.contains("b"));
//! ```

use std::borrow::Borrow;
use std::fmt::Display;

use serde::Serialize;

use crate::data_structures::puka_hash_table::PukaHashTable;

mod node;

use node::{Node, HEAD, TAIL};

/// Point-in-time statistics for a [`KonaLruCache`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LruCacheStats {
    /// Number of cached entries
    pub size: usize,
    /// Maximum number of entries
    pub capacity: usize,
    /// Successful lookups
    pub hits: u64,
    /// Failed lookups
    pub misses: u64,
    /// `hits / (hits + misses)` as a percentage, two decimals
    pub hit_rate: f64,
    /// Entries dropped to make room
    pub evictions: u64,
    /// `size / capacity` as a percentage, two decimals
    pub utilization: f64,
}

/// A bounded LRU cache.
///
/// # Type Parameters
///
/// * `K` - Key type. Stored in both the lookup table and the list node.
/// * `V` - Value type.
#[derive(Debug, Clone)]
pub struct KonaLruCache<K, V> {
    /// Node arena; handles `HEAD` and `TAIL` are the sentinels
    nodes: Vec<Node<K, V>>,

    /// Recycled node handles
    free: Vec<usize>,

    /// Key to node handle
    index: PukaHashTable<K, usize>,

    capacity: usize,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl<K, V> KonaLruCache<K, V>
where
    K: Eq + Display + Clone,
{
    /// Creates an empty cache holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.saturating_add(2).min(4096));
        nodes.push(Node::sentinel());
        nodes.push(Node::sentinel());
        nodes[HEAD].next = TAIL;
        nodes[TAIL].prev = HEAD;

        Self {
            nodes,
            free: Vec::new(),
            index: PukaHashTable::new(),
            capacity: capacity.max(1),
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    /// Returns the number of cached entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns the configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Looks up `key`, marking it most recently used on a hit.
    ///
    /// A miss leaves the recency order untouched.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + Display + ?Sized,
    {
        let Some(&handle) = self.index.get(key) else {
            self.misses += 1;
            return None;
        };

        self.detach(handle);
        self.attach_front(handle);
        self.hits += 1;
        self.nodes[handle].value()
    }

    /// Inserts or updates `key`, marking it most recently used.
    ///
    /// # Returns
    ///
    /// The evicted `(key, value)` pair when the insert overflowed the capacity.
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(&handle) = self.index.get(&key) {
            if let Some(entry) = self.nodes[handle].entry.as_mut() {
                entry.1 = value;
            }
            self.detach(handle);
            self.attach_front(handle);
            return None;
        }

        let handle = self.allocate(Node::new(key.clone(), value));
        self.index.put(key, handle);
        self.attach_front(handle);

        if self.index.len() > self.capacity {
            return self.evict_lru();
        }
        None
    }

    /// Checks membership without touching the recency order.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Display + ?Sized,
    {
        self.index.contains(key)
    }

    /// Removes `key`, returning `true` if it was cached.
    pub fn delete<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Display + ?Sized,
    {
        let Some(handle) = self.index.remove(key) else {
            return false;
        };

        self.detach(handle);
        self.release(handle);
        true
    }

    /// Returns the cached keys from most to least recently used.
    pub fn keys_by_recency(&self) -> Vec<&K> {
        let mut keys = Vec::with_capacity(self.len());
        let mut cursor = self.nodes[HEAD].next;
        while cursor != TAIL {
            if let Some((key, _)) = self.nodes[cursor].entry.as_ref() {
                keys.push(key);
            }
            cursor = self.nodes[cursor].next;
        }
        keys
    }

    /// Drops every entry. Counters are kept.
    pub fn clear(&mut self) {
        self.nodes.truncate(2);
        self.nodes[HEAD].next = TAIL;
        self.nodes[TAIL].prev = HEAD;
        self.free.clear();
        self.index.clear();
    }

    /// Collects cache statistics.
    pub fn stats(&self) -> LruCacheStats {
        let requests = self.hits + self.misses;
        let hit_rate = if requests > 0 {
            round2(self.hits as f64 / requests as f64 * 100.0)
        } else {
            0.0
        };

        LruCacheStats {
            size: self.len(),
            capacity: self.capacity,
            hits: self.hits,
            misses: self.misses,
            hit_rate,
            evictions: self.evictions,
            utilization: round2(self.len() as f64 / self.capacity as f64 * 100.0),
        }
    }

    /// Unlinks the node next to the LRU sentinel.
    fn evict_lru(&mut self) -> Option<(K, V)> {
        let victim = self.nodes[TAIL].prev;
        if victim == HEAD {
            return None;
        }

        self.detach(victim);
        let (key, value) = self.nodes[victim].entry.take()?;
        self.free.push(victim);
        self.index.delete(&key);
        self.evictions += 1;
        Some((key, value))
    }

    fn allocate(&mut self, node: Node<K, V>) -> usize {
        match self.free.pop() {
            Some(handle) => {
                self.nodes[handle] = node;
                handle
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    fn release(&mut self, handle: usize) {
        self.nodes[handle].entry = None;
        self.free.push(handle);
    }

    fn detach(&mut self, handle: usize) {
        let (prev, next) = (self.nodes[handle].prev, self.nodes[handle].next);
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
    }

    fn attach_front(&mut self, handle: usize) {
        let first = self.nodes[HEAD].next;
        self.nodes[handle].prev = HEAD;
        self.nodes[handle].next = first;
        self.nodes[first].prev = handle;
        self.nodes[HEAD].next = handle;
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evicts_least_recently_touched() {
        let mut cache = KonaLruCache::new(2);
        cache.put("a".to_string(), 1);
        cache.put("b".to_string(), 2);
        assert_eq!(cache.get("a"), Some(&1));

        let evicted = cache.put("c".to_string(), 3);

        assert_eq!(evicted, Some(("b".to_string(), 2)));
        assert!(cache.contains("a"));
        assert!(cache.contains("c"));
        assert!(!cache.contains("b"));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_overflow_by_one_evicts_oldest() {
        let capacity = 5;
        let mut cache = KonaLruCache::new(capacity);
        for i in 0..=capacity {
            cache.put(format!("k{i}"), i);
            assert!(cache.len() <= capacity);
        }

        assert!(!cache.contains("k0"));
        for i in 1..=capacity {
            assert!(cache.contains(format!("k{i}").as_str()));
        }
    }

    #[test]
    fn test_get_does_not_change_size() {
        let mut cache = KonaLruCache::new(3);
        cache.put("a".to_string(), 1);
        cache.put("b".to_string(), 2);

        cache.get("a");
        cache.get("missing");

        assert_eq!(cache.len(), 2);
        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hit_rate, 50.0);
    }

    #[test]
    fn test_miss_keeps_order_and_contains_is_passive() {
        let mut cache = KonaLruCache::new(3);
        cache.put("a".to_string(), 1);
        cache.put("b".to_string(), 2);

        cache.get("zzz");
        assert!(cache.contains("a"));

        let order: Vec<&String> = cache.keys_by_recency();
        assert_eq!(order, vec!["b", "a"]);
    }

    #[test]
    fn test_update_promotes() {
        let mut cache = KonaLruCache::new(2);
        cache.put("a".to_string(), 1);
        cache.put("b".to_string(), 2);
        assert_eq!(cache.put("a".to_string(), 10), None);

        cache.put("c".to_string(), 3);

        assert_eq!(cache.get("a"), Some(&10));
        assert!(!cache.contains("b"));
    }

    #[test]
    fn test_delete_and_reuse() {
        let mut cache = KonaLruCache::new(2);
        cache.put("a".to_string(), 1);
        cache.put("b".to_string(), 2);

        assert!(cache.delete("a"));
        assert!(!cache.delete("a"));
        assert_eq!(cache.len(), 1);

        cache.put("c".to_string(), 3);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats().evictions, 0);
        assert_eq!(cache.keys_by_recency(), vec!["c", "b"]);
    }

    #[test]
    fn test_stats_and_clear() {
        let mut cache: KonaLruCache<String, String> = KonaLruCache::new(4);
        cache.put("u".to_string(), "c".to_string());

        let stats = cache.stats();
        assert_eq!(stats.utilization, 25.0);
        assert_eq!(stats.hit_rate, 0.0);

        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.keys_by_recency().is_empty());
        cache.put("v".to_string(), "d".to_string());
        assert_eq!(cache.keys_by_recency(), vec!["v"]);
    }
}
