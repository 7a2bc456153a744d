// Copyright (c) 2025 Nalu Link Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Base-62 codec for short codes.
//!
//! Store identifiers are turned into short codes by writing them as positional
//! base-62 numbers, most significant digit first, over the alphabet
//! `0-9`, `a-z`, `A-Z` (in that order). The alphabet is part of the public
//! contract: codes are case-sensitive and bit-exact across releases.
//!
//! # Example
//!
//! ```
//! use nalu_link_lib::data_structures::base62;
//!
//! assert_eq!(base62::encode(0), "0");
//! assert_eq!(base62::encode(1000), "g8");
//! assert_eq!(base62::decode("g8"), Ok(1000));
//! assert!(base62::decode("").is_err());
//! ```

mod error;

pub use error::{Base62Error, Result};

/// The 62 digits, in positional order.
pub const ALPHABET: &[u8; 62] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Numeric base of the codec.
pub const BASE: u64 = 62;

/// Returns the digit value of `c`, or `None` if it is not part of the alphabet.
pub fn digit_value(c: char) -> Option<u64> {
    match c {
        '0'..='9' => Some(c as u64 - '0' as u64),
        'a'..='z' => Some(c as u64 - 'a' as u64 + 10),
        'A'..='Z' => Some(c as u64 - 'A' as u64 + 36),
        _ => None,
    }
}

/// Returns the alphabet character for a digit value in `0..62`.
pub fn digit_char(value: u64) -> char {
    ALPHABET[(value % BASE) as usize] as char
}

/// Encodes a non-negative number.
pub fn encode(mut number: u64) -> String {
    if number == 0 {
        return digit_char(0).to_string();
    }

    let mut digits = Vec::with_capacity(11);
    while number > 0 {
        digits.push(digit_char(number % BASE));
        number /= BASE;
    }

    digits.iter().rev().collect()
}

/// Encodes a signed number, rejecting negative input.
///
/// Store identifiers are signed 64-bit integers, so this is the entry point
/// used when turning a freshly inserted record id into a short code.
pub fn encode_signed(number: i64) -> Result<String> {
    if number < 0 {
        return Err(Base62Error::NegativeNumber(number));
    }
    Ok(encode(number as u64))
}

/// Decodes a base-62 string back to its numeric value.
///
/// # Errors
///
/// * [`Base62Error::EmptyInput`] for an empty string.
/// * [`Base62Error::InvalidCharacter`] for anything outside the alphabet.
/// * [`Base62Error::Overflow`] when the value does not fit in a `u64`.
pub fn decode(encoded: &str) -> Result<u64> {
    if encoded.is_empty() {
        return Err(Base62Error::EmptyInput);
    }

    let mut result: u64 = 0;
    for (position, character) in encoded.chars().enumerate() {
        let digit = digit_value(character).ok_or(Base62Error::InvalidCharacter {
            character,
            position,
        })?;

        result = result
            .checked_mul(BASE)
            .and_then(|shifted| shifted.checked_add(digit))
            .ok_or_else(|| Base62Error::Overflow(encoded.to_string()))?;
    }

    Ok(result)
}

/// Returns `true` if `encoded` is non-empty and made only of alphabet characters.
pub fn is_valid(encoded: &str) -> bool {
    !encoded.is_empty() && encoded.chars().all(|c| digit_value(c).is_some())
}
