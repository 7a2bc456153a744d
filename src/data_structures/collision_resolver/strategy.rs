// Copyright (c) 2025 Nalu Link Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Candidate generation for the three collision resolution strategies.

use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::data_structures::base62::{self, Base62Error, BASE};
use crate::data_structures::collision_resolver::error::{CollisionError, Result};

/// How a colliding short code is turned into new candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionStrategy {
    /// Treat the code as a base-62 number and step forward by the attempt number
    #[default]
    Linear,
    /// Derive a fresh code from the clock plus a random digit
    Regenerate,
    /// Suffix the original code with the attempt number
    Append,
}

impl ResolutionStrategy {
    /// All strategies, in declaration order.
    pub const ALL: [ResolutionStrategy; 3] = [Self::Linear, Self::Regenerate, Self::Append];

    /// Name accepted by [`FromStr`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Regenerate => "regenerate",
            Self::Append => "append",
        }
    }

    /// Name reported once a collision has been resolved with this strategy.
    pub fn resolved_name(&self) -> &'static str {
        match self {
            Self::Linear => "linear_probing",
            Self::Regenerate => "regeneration",
            Self::Append => "append_counter",
        }
    }

    /// Produces the candidate for `attempt` (starting at 1).
    pub fn candidate(&self, code: &str, attempt: u32) -> Result<String> {
        match self {
            Self::Linear => linear_probe(code, attempt),
            Self::Regenerate => Ok(regenerate_code()),
            Self::Append => Ok(append_counter(code, attempt)),
        }
    }
}

impl fmt::Display for ResolutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResolutionStrategy {
    type Err = CollisionError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "linear" => Ok(Self::Linear),
            "regenerate" => Ok(Self::Regenerate),
            "append" => Ok(Self::Append),
            other => Err(CollisionError::UnknownStrategy(other.to_string())),
        }
    }
}

/// Steps `code` forward by `attempt` in base 62.
///
/// Codes that do not decode to a `u64`, or whose sum would overflow one, are
/// incremented digit by digit instead.
pub fn linear_probe(code: &str, attempt: u32) -> Result<String> {
    match base62::decode(code) {
        Ok(number) => match number.checked_add(u64::from(attempt)) {
            Some(next) => Ok(base62::encode(next)),
            None => increment_code(code, attempt),
        },
        Err(_) => increment_code(code, attempt),
    }
}

/// Adds `amount` to `code` using its own characters as base-62 digits.
///
/// Carries ripple from the last character toward the first; a carry out of
/// the most significant digit grows the code with new leading digits.
pub fn increment_code(code: &str, amount: u32) -> Result<String> {
    let mut digits = code
        .chars()
        .enumerate()
        .map(|(position, character)| {
            base62::digit_value(character).ok_or(Base62Error::InvalidCharacter {
                character,
                position,
            })
        })
        .collect::<std::result::Result<Vec<u64>, _>>()
        .map_err(|source| CollisionError::InvalidCode {
            code: code.to_string(),
            source,
        })?;

    let mut carry = u64::from(amount);
    for digit in digits.iter_mut().rev() {
        if carry == 0 {
            break;
        }
        let total = *digit + carry;
        *digit = total % BASE;
        carry = total / BASE;
    }

    let mut leading = Vec::new();
    while carry > 0 {
        leading.push(carry % BASE);
        carry /= BASE;
    }

    Ok(leading
        .into_iter()
        .rev()
        .chain(digits)
        .map(base62::digit_char)
        .collect())
}

/// Builds a fresh code from the current time in microseconds.
pub fn regenerate_code() -> String {
    let micros = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_micros() as u64)
        .unwrap_or_default();
    regenerate_code_at(micros, &mut rand::thread_rng())
}

/// Keeps the trailing 4 to 6 characters of `micros` in base 62 and appends
/// one random alphabet character.
pub fn regenerate_code_at<R: Rng + ?Sized>(micros: u64, rng: &mut R) -> String {
    let encoded = base62::encode(micros);
    let length = rng.gen_range(4..=6usize);
    let start = encoded.len().saturating_sub(length);

    let mut code = encoded[start..].to_string();
    code.push(base62::digit_char(rng.gen_range(0..BASE)));
    code
}

/// Suffixes `code` with the decimal attempt number.
pub fn append_counter(code: &str, attempt: u32) -> String {
    format!("{code}{attempt}")
}
