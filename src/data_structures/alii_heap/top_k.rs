// Copyright (c) 2025 Nalu Link Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Bounded tracker of the K highest-scored entries.

use crate::data_structures::alii_heap::heap::AliiHeap;
use crate::data_structures::puka_hash_table::PukaHashTable;

/// Payloads tracked by a [`TopKTracker`] carry their own identity.
///
/// When the tracker evicts its minimum it only has the payload in hand, so
/// it reads the identity back out of it to drop the matching side-map entry.
pub trait TrackedPayload: Clone {
    /// Identity under which the payload was added, if the payload carries one.
    fn identity(&self) -> Option<&str>;
}

impl TrackedPayload for String {
    fn identity(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

/// Keeps the K entries with the highest scores seen so far.
///
/// A capacity-K [`AliiHeap`] holds the entries with the smallest retained
/// score at its root; a side map keyed by identity mirrors heap membership.
#[derive(Debug, Clone)]
pub struct TopKTracker<P> {
    k: usize,
    heap: AliiHeap<P>,
    tracked: PukaHashTable<String, (u64, P)>,
}

impl<P: TrackedPayload> TopKTracker<P> {
    /// Creates a tracker retaining at most `k` entries.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            heap: AliiHeap::with_capacity(k),
            tracked: PukaHashTable::new(),
        }
    }

    /// Maximum number of retained entries.
    pub fn capacity(&self) -> usize {
        self.k
    }

    /// Number of entries currently in the heap.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns whether nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Returns whether `id` is in the side map.
    pub fn contains(&self, id: &str) -> bool {
        self.tracked.contains(id)
    }

    /// Adds a new entry or refreshes the score of a tracked one.
    ///
    /// A tracked `id` is dropped from the side map and the heap is rebuilt
    /// from the remaining entries before the new score is considered. The
    /// array heap has no position index, so a rebuild is how an arbitrary
    /// entry leaves it.
    ///
    /// When the heap is full the entry only gets in with a score strictly
    /// greater than the current minimum, which it then replaces.
    pub fn add_or_update(&mut self, id: &str, score: u64, payload: P) {
        if self.tracked.delete(id) {
            self.rebuild_heap();
        }

        if self.heap.len() < self.k {
            self.heap.insert(score, payload.clone());
            self.tracked.put(id.to_string(), (score, payload));
            return;
        }

        let Some(&(min_score, _)) = self.heap.peek_min() else {
            // k == 0 retains nothing.
            return;
        };
        if score <= min_score {
            return;
        }

        if let Some((_, evicted)) = self.heap.extract_min() {
            match evicted.identity() {
                Some(evicted_id) => {
                    self.tracked.delete(evicted_id);
                }
                None => tracing::warn!(
                    "Evicted top-k payload carries no identity; side map left out of sync"
                ),
            }
        }

        self.heap.insert(score, payload.clone());
        self.tracked.put(id.to_string(), (score, payload));
    }

    /// Stops tracking `id`.
    ///
    /// # Returns
    ///
    /// `true` if `id` was tracked.
    pub fn remove(&mut self, id: &str) -> bool {
        if !self.tracked.delete(id) {
            return false;
        }
        self.rebuild_heap();
        true
    }

    /// Returns the tracked entries, highest score first.
    pub fn top_k(&self) -> Vec<(u64, P)> {
        let mut sorted = self.heap.drain_sorted();
        sorted.reverse();
        sorted.truncate(self.k);
        sorted
    }

    /// Forgets every tracked entry.
    pub fn clear(&mut self) {
        self.heap.clear();
        self.tracked.clear();
    }

    fn rebuild_heap(&mut self) {
        self.heap.clear();
        for (_, (score, payload)) in self.tracked.iter() {
            self.heap.insert(*score, payload.clone());
        }
    }
}
