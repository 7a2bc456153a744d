// Copyright (c) 2025 Nalu Link Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Array-backed binary min-heap keyed by a numeric score.

/// A binary min-heap of `(score, payload)` pairs.
///
/// The element at index `i` has children at `2i + 1` and `2i + 2`; every
/// parent's score is less than or equal to its children's. Order among equal
/// scores is unspecified.
#[derive(Debug, Clone)]
pub struct AliiHeap<P> {
    entries: Vec<(u64, P)>,
}

impl<P> AliiHeap<P> {
    /// Creates an empty heap.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Creates an empty heap with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the heap is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends an entry and sifts it toward the root.
    pub fn insert(&mut self, score: u64, payload: P) {
        self.entries.push((score, payload));
        self.sift_up(self.entries.len() - 1);
    }

    /// Removes and returns the entry with the smallest score.
    pub fn extract_min(&mut self) -> Option<(u64, P)> {
        if self.entries.is_empty() {
            return None;
        }

        let last = self.entries.len() - 1;
        self.entries.swap(0, last);
        let min = self.entries.pop();
        self.sift_down(0);
        min
    }

    /// Returns the entry with the smallest score without removing it.
    pub fn peek_min(&self) -> Option<&(u64, P)> {
        self.entries.first()
    }

    /// Iterates over the entries in heap (not sorted) order.
    pub fn iter(&self) -> impl Iterator<Item = &(u64, P)> + '_ {
        self.entries.iter()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.entries[index].0 < self.entries[parent].0 {
                self.entries.swap(index, parent);
                index = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.entries.len();
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut smallest = index;

            if left < len && self.entries[left].0 < self.entries[smallest].0 {
                smallest = left;
            }
            if right < len && self.entries[right].0 < self.entries[smallest].0 {
                smallest = right;
            }
            if smallest == index {
                break;
            }

            self.entries.swap(index, smallest);
            index = smallest;
        }
    }
}

impl<P: Clone> AliiHeap<P> {
    /// Returns every entry in ascending score order, leaving the heap intact.
    ///
    /// Works by draining a copy, so it costs O(n log n).
    pub fn drain_sorted(&self) -> Vec<(u64, P)> {
        let mut copy = self.clone();
        let mut sorted = Vec::with_capacity(copy.len());
        while let Some(entry) = copy.extract_min() {
            sorted.push(entry);
        }
        sorted
    }
}

impl<P> Default for AliiHeap<P> {
    fn default() -> Self {
        Self::new()
    }
}
