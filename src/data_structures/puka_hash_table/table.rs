// Copyright (c) 2025 Nalu Link Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Implementation of the Puka separate-chaining hash table.
//!
//! Entries live in a flat arena (`slots`) and are addressed by stable integer
//! handles. Each bucket stores the handle of its chain head and every entry
//! stores the handle of the next entry in the same bucket, so a chain is an
//! index-linked list owned entirely by the table. Freed slots are recycled
//! through a free list.

use std::borrow::Borrow;
use std::fmt::Display;

use serde::Serialize;

use crate::data_structures::puka_hash_table::config::PukaHashTableConfig;
use crate::data_structures::puka_hash_table::hash::bucket_index;

/// A single key-value entry in a bucket chain.
#[derive(Debug, Clone)]
struct Entry<K, V> {
    key: K,
    value: V,
    next: Option<usize>,
}

/// Point-in-time statistics for a [`PukaHashTable`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HashTableStats {
    /// Number of live entries
    pub size: usize,
    /// Number of buckets
    pub capacity: usize,
    /// `size / capacity`
    pub load_factor: f64,
    /// Inserts that landed in an already occupied bucket
    pub collision_count: u64,
    /// Mean chain length over non-empty buckets, rounded to two decimals
    pub avg_chain_length: f64,
    /// Longest chain
    pub max_chain_length: usize,
    /// Buckets holding at least one entry
    pub non_empty_buckets: usize,
}

/// A hash table with separate chaining and a polynomial rolling hash.
///
/// # Type Parameters
///
/// * `K` - The key type. Hashed through its `Display` output.
/// * `V` - The value type.
#[derive(Debug, Clone)]
pub struct PukaHashTable<K, V> {
    /// Chain head handle per bucket
    buckets: Vec<Option<usize>>,

    /// Entry arena; `None` marks a recycled slot
    slots: Vec<Option<Entry<K, V>>>,

    /// Recycled slot handles
    free: Vec<usize>,

    /// Number of live entries
    size: usize,

    /// Cumulative count of inserts into non-empty buckets
    collision_count: u64,

    config: PukaHashTableConfig,
}

impl<K, V> PukaHashTable<K, V>
where
    K: Eq + Display,
{
    /// Creates a new empty hash table with default configuration.
    pub fn new() -> Self {
        Self::with_config(PukaHashTableConfig::default())
    }

    /// Creates a new empty hash table with `capacity` initial buckets.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(PukaHashTableConfig::default().with_initial_capacity(capacity))
    }

    /// Creates a new empty hash table with the specified configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Configuration for the hash table.
    ///
    /// # Returns
    ///
    /// A new `PukaHashTable` instance.
    pub fn with_config(config: PukaHashTableConfig) -> Self {
        let capacity = config.initial_capacity.max(1);
        Self {
            buckets: vec![None; capacity],
            slots: Vec::new(),
            free: Vec::new(),
            size: 0,
            collision_count: 0,
            config,
        }
    }

    /// Returns the number of live entries.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns whether the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the current number of buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Calculates the current load factor of the hash table.
    pub fn load_factor(&self) -> f64 {
        self.size as f64 / self.capacity() as f64
    }

    /// Inserts or updates a key-value pair.
    ///
    /// An existing key is updated in place. A new key goes to the head of an
    /// empty bucket or to the end of an occupied bucket's chain, the latter
    /// counting as a collision. If the insert would push the load factor past
    /// the configured maximum, the table doubles and rehashes first.
    ///
    /// # Arguments
    ///
    /// * `key` - The key to insert.
    /// * `value` - The value to associate with the key.
    ///
    /// # Returns
    ///
    /// `true` if the key was new, `false` if an existing entry was updated.
    pub fn put(&mut self, key: K, value: V) -> bool {
        if let Some(slot) = self.find_slot(&key) {
            if let Some(entry) = self.slots[slot].as_mut() {
                entry.value = value;
            }
            return false;
        }

        let mut new_capacity = self.capacity();
        while (self.size + 1) as f64 / new_capacity as f64 > self.config.max_load_factor {
            new_capacity *= 2;
        }
        if new_capacity != self.capacity() {
            self.resize(new_capacity);
        }

        let bucket = bucket_index(&key, self.capacity());
        if self.link(bucket, key, value) {
            self.collision_count += 1;
        }
        self.size += 1;
        true
    }

    /// Gets a reference to the value associated with the key.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + Display + ?Sized,
    {
        let slot = self.find_slot(key)?;
        self.slots[slot].as_ref().map(|entry| &entry.value)
    }

    /// Gets a mutable reference to the value associated with the key.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Eq + Display + ?Sized,
    {
        let slot = self.find_slot(key)?;
        self.slots[slot].as_mut().map(|entry| &mut entry.value)
    }

    /// Checks if the key exists in the hash table.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Display + ?Sized,
    {
        self.find_slot(key).is_some()
    }

    /// Removes a key, returning `true` if it was present.
    pub fn delete<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Display + ?Sized,
    {
        self.remove(key).is_some()
    }

    /// Removes a key and returns its value, unlinking the entry from its chain.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + Display + ?Sized,
    {
        let bucket = bucket_index(key, self.capacity());
        let mut previous: Option<usize> = None;
        let mut cursor = self.buckets[bucket];

        while let Some(slot) = cursor {
            let entry = self.slots[slot].as_ref()?;
            let next = entry.next;

            if entry.key.borrow() == key {
                match previous {
                    None => self.buckets[bucket] = next,
                    Some(prev) => {
                        if let Some(prev_entry) = self.slots[prev].as_mut() {
                            prev_entry.next = next;
                        }
                    }
                }

                let removed = self.slots[slot].take()?;
                self.free.push(slot);
                self.size -= 1;
                return Some(removed.value);
            }

            previous = cursor;
            cursor = next;
        }

        None
    }

    /// Iterates over all live entries in arena order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.slots
            .iter()
            .filter_map(|slot| slot.as_ref().map(|entry| (&entry.key, &entry.value)))
    }

    /// Removes every entry and resets the collision counter. Capacity is kept.
    pub fn clear(&mut self) {
        self.buckets = vec![None; self.capacity()];
        self.slots.clear();
        self.free.clear();
        self.size = 0;
        self.collision_count = 0;
    }

    /// Collects statistics about the table and its chains.
    pub fn stats(&self) -> HashTableStats {
        let chain_lengths: Vec<usize> = (0..self.capacity())
            .map(|bucket| self.chain_length(bucket))
            .filter(|&length| length > 0)
            .collect();

        let avg_chain_length = if chain_lengths.is_empty() {
            0.0
        } else {
            let total: usize = chain_lengths.iter().sum();
            round2(total as f64 / chain_lengths.len() as f64)
        };

        HashTableStats {
            size: self.size,
            capacity: self.capacity(),
            load_factor: self.load_factor(),
            collision_count: self.collision_count,
            avg_chain_length,
            max_chain_length: chain_lengths.iter().copied().max().unwrap_or(0),
            non_empty_buckets: chain_lengths.len(),
        }
    }

    /// Finds the arena handle holding `key`.
    fn find_slot<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Eq + Display + ?Sized,
    {
        let mut cursor = self.buckets[bucket_index(key, self.capacity())];
        while let Some(slot) = cursor {
            let entry = self.slots[slot].as_ref()?;
            if entry.key.borrow() == key {
                return Some(slot);
            }
            cursor = entry.next;
        }
        None
    }

    /// Links a new entry into `bucket`. Returns `true` if the bucket was occupied.
    fn link(&mut self, bucket: usize, key: K, value: V) -> bool {
        let entry = Entry {
            key,
            value,
            next: None,
        };
        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(entry);
                slot
            }
            None => {
                self.slots.push(Some(entry));
                self.slots.len() - 1
            }
        };

        let Some(head) = self.buckets[bucket] else {
            self.buckets[bucket] = Some(slot);
            return false;
        };

        let mut tail = head;
        while let Some(next) = self.slots[tail].as_ref().and_then(|entry| entry.next) {
            tail = next;
        }
        if let Some(tail_entry) = self.slots[tail].as_mut() {
            tail_entry.next = Some(slot);
        }
        true
    }

    /// Rebuilds every chain for `new_capacity` buckets.
    ///
    /// Bucket indices depend on the capacity, so each live entry is hashed
    /// again. Rehash placements are not counted as collisions.
    fn resize(&mut self, new_capacity: usize) {
        tracing::debug!(
            from = self.capacity(),
            to = new_capacity,
            size = self.size,
            "Resizing hash table"
        );

        let old_slots = std::mem::take(&mut self.slots);
        self.free.clear();
        self.buckets = vec![None; new_capacity];

        for entry in old_slots.into_iter().flatten() {
            let bucket = bucket_index(&entry.key, new_capacity);
            self.link(bucket, entry.key, entry.value);
        }
    }

    fn chain_length(&self, bucket: usize) -> usize {
        let mut length = 0;
        let mut cursor = self.buckets[bucket];
        while let Some(slot) = cursor {
            length += 1;
            cursor = self.slots[slot].as_ref().and_then(|entry| entry.next);
        }
        length
    }
}

impl<K, V> Default for PukaHashTable<K, V>
where
    K: Eq + Display,
{
    fn default() -> Self {
        Self::new()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_and_get() {
        let mut table = PukaHashTable::new();

        assert!(table.put("key1".to_string(), 1));
        assert!(table.put("key2".to_string(), 2));

        assert_eq!(table.get("key1"), Some(&1));
        assert_eq!(table.get("key2"), Some(&2));
        assert_eq!(table.get("key3"), None);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_update_in_place() {
        let mut table = PukaHashTable::new();

        assert!(table.put("key1".to_string(), 1));
        assert!(!table.put("key1".to_string(), 2));

        assert_eq!(table.get("key1"), Some(&2));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_collisions_are_chained() {
        let config = PukaHashTableConfig::new()
            .with_initial_capacity(4)
            .with_max_load_factor(0.95);
        let mut table = PukaHashTable::with_config(config);

        // "a" (97) and "e" (101) both land in bucket 1 of 4.
        table.put("a".to_string(), 1);
        table.put("e".to_string(), 2);

        let stats = table.stats();
        assert_eq!(stats.collision_count, 1);
        assert_eq!(stats.max_chain_length, 2);
        assert_eq!(stats.non_empty_buckets, 1);
        assert_eq!(table.get("a"), Some(&1));
        assert_eq!(table.get("e"), Some(&2));
    }

    #[test]
    fn test_remove_from_middle_of_chain() {
        let config = PukaHashTableConfig::new()
            .with_initial_capacity(4)
            .with_max_load_factor(0.95);
        let mut table = PukaHashTable::with_config(config);

        // 'a', 'e' and 'i' share bucket 1 of 4.
        table.put("a".to_string(), 1);
        table.put("e".to_string(), 2);
        table.put("i".to_string(), 3);

        assert_eq!(table.remove("e"), Some(2));
        assert_eq!(table.get("a"), Some(&1));
        assert_eq!(table.get("i"), Some(&3));
        assert!(!table.delete("e"));

        // The freed slot is reused.
        table.put("m".to_string(), 4);
        assert_eq!(table.get("m"), Some(&4));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_resize_keeps_entries() {
        let mut table = PukaHashTable::with_capacity(4);

        for i in 0..20 {
            table.put(format!("grow_key_{i}"), i);
            assert!(table.load_factor() <= 0.75);
        }

        assert!(table.capacity() >= 32);
        for i in 0..20 {
            assert_eq!(table.get(format!("grow_key_{i}").as_str()), Some(&i));
        }
    }

    #[test]
    fn test_update_never_resizes() {
        let mut table = PukaHashTable::with_capacity(4);
        table.put("a".to_string(), 1);
        table.put("b".to_string(), 2);
        table.put("c".to_string(), 3);
        assert_eq!(table.capacity(), 4);

        table.put("c".to_string(), 30);
        assert_eq!(table.capacity(), 4);
    }

    #[test]
    fn test_stats_on_empty_table() {
        let table: PukaHashTable<String, String> = PukaHashTable::with_capacity(1000);
        let stats = table.stats();

        assert_eq!(stats.size, 0);
        assert_eq!(stats.capacity, 1000);
        assert_eq!(stats.load_factor, 0.0);
        assert_eq!(stats.avg_chain_length, 0.0);
        assert_eq!(stats.max_chain_length, 0);
    }

    #[test]
    fn test_clear() {
        let mut table = PukaHashTable::new();
        table.put("x".to_string(), 1);
        table.clear();

        assert!(table.is_empty());
        assert!(!table.contains("x"));
        assert_eq!(table.stats().collision_count, 0);
    }
}
