// Copyright (c) 2025 Nalu Link Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Polynomial rolling hash for the Puka hash table.
//!
//! Keys are hashed through their canonical string form (their `Display`
//! output). Every character code is folded into the running value with a
//! multiplier of 31 and the result is reduced modulo the bucket count after
//! each step, so the same key lands in a different bucket whenever the
//! capacity changes.

use std::fmt::{self, Display, Write};

/// Multiplier applied to the running hash before each character is added.
pub const HASH_MULTIPLIER: u64 = 31;

/// Streams a key's `Display` output through the rolling hash without
/// allocating an intermediate string.
#[derive(Debug)]
struct PolynomialHasher {
    modulus: u128,
    state: u128,
}

impl PolynomialHasher {
    fn new(modulus: usize) -> Self {
        Self {
            modulus: modulus.max(1) as u128,
            state: 0,
        }
    }
}

impl Write for PolynomialHasher {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            self.state = (self.state * HASH_MULTIPLIER as u128 + c as u128) % self.modulus;
        }
        Ok(())
    }
}

/// Computes the bucket index of `key` for a table with `capacity` buckets.
///
/// # Arguments
///
/// * `key` - The key to hash, via its canonical string form.
/// * `capacity` - Current number of buckets.
///
/// # Returns
///
/// An index in `0..capacity`.
pub fn bucket_index<K: Display + ?Sized>(key: &K, capacity: usize) -> usize {
    let mut hasher = PolynomialHasher::new(capacity);
    // The hasher itself never fails; a Display impl that errors just stops early.
    let _ = write!(hasher, "{key}");
    hasher.state as usize
}
