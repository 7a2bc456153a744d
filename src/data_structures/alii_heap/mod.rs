// Copyright (c) 2025 Nalu Link Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Alii Heap: min-heap ranking for the most clicked links.
//!
//! [`AliiHeap`] is a plain array-backed binary min-heap ordered by a `u64`
//! score. [`TopKTracker`] wraps a capacity-K heap and a side map so that only
//! the K highest-scored entries are retained: the heap root is always the
//! weakest retained entry and the first to go.
//!
//! # Example
//!
//! ```
//! use nalu_link_lib::data_structures::alii_heap::TopKTracker;
//!
//! let mut tracker = TopKTracker::new(2);
//! tracker.add_or_update("x", 5, "x".to_string());
//! tracker.add_or_update("y", 3, "y".to_string());
//! tracker.add_or_update("z", 10, "z".to_string());
//!
//! let top: Vec<(u64, String)> = tracker.top_k();
//! assert_eq!(top, vec![(10, "z".to_string()), (5, "x".to_string())]);
//! ```

mod heap;
mod top_k;

pub use heap::AliiHeap;
pub use top_k::{TopKTracker, TrackedPayload};
