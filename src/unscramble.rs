// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/unscramble.rs - Brute-force search for byte transforms.
 *  Copyright (C) 2026  Forest Crossman <cyrozap@gmail.com>
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  You should have received a copy of the GNU General Public License
 *  along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

/*!
 * # `unscramble` Module
 *
 * Tries a fixed list of byte transforms on a buffer and keeps the first one
 * whose output has a Shannon entropy below a threshold. Low entropy is only a
 * rough stand-in for "looks like text", so a match is a guess, not a proof.
 *
 * Candidates are tried in this order, and the first match wins:
 *
 * 1. Additive shifts by 0 through 255 (shift 0 is the identity).
 * 2. Single-byte XOR with `0x00`, `0xFF`, `0x55` and `0xAA`.
 * 3. If a key length was given, XOR with a repeating key taken from the
 *    start of the input.
 *
 * If nothing matches, the input is returned unchanged.
 *
 * ## Usage Example
 *
 * ```
 * use pcbscrub::unscramble::{search, Transform};
 *
 * let scrambled = Transform::Xor(0xFF).apply(b"U1 LM358\n");
 * let result = search(&scrambled, None).unwrap();
 * assert_eq!(result.len(), scrambled.len());
 * ```
 */

use std::fmt;
use std::num::NonZeroUsize;

use tracing::debug;

use crate::Result;
use crate::entropy::shannon_entropy;

/// Entropy, in bits per byte, below which a candidate counts as readable.
pub const READABLE_ENTROPY_THRESHOLD: f64 = 7.0;

/// Single-byte XOR keys tried after the shifts, in order.
pub const FIXED_XOR_KEYS: [u8; 4] = [0x00, 0xFF, 0x55, 0xAA];

/// A reversible, position-independent byte transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transform {
    /// Adds the amount to every byte, wrapping at 256.
    Shift(u8),
    /// XORs every byte with the key.
    Xor(u8),
    /// XORs byte `i` with `key[i % key.len()]`.
    RepeatingXor(Vec<u8>),
}

impl Transform {
    /// Applies the transform, returning a new buffer of the same length.
    pub fn apply(&self, data: &[u8]) -> Vec<u8> {
        match self {
            Transform::Shift(amount) => data.iter().map(|b| b.wrapping_add(*amount)).collect(),
            Transform::Xor(key) => data.iter().map(|b| b ^ key).collect(),
            Transform::RepeatingXor(key) if key.is_empty() => data.to_vec(),
            Transform::RepeatingXor(key) => data
                .iter()
                .zip(key.iter().cycle())
                .map(|(b, k)| b ^ k)
                .collect(),
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transform::Shift(amount) => write!(f, "shift +{}", amount),
            Transform::Xor(key) => write!(f, "xor {:#04x}", key),
            Transform::RepeatingXor(key) => write!(f, "repeating xor ({} byte key)", key.len()),
        }
    }
}

/// Tuning knobs for [Unscrambler].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOptions {
    /// Candidates with entropy strictly below this are accepted.
    pub threshold: f64,
    /// Enables the repeating-key XOR phase with a key of this many bytes.
    ///
    /// A length longer than the input uses the whole input as the key.
    pub key_length: Option<NonZeroUsize>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            threshold: READABLE_ENTROPY_THRESHOLD,
            key_length: None,
        }
    }
}

/// The outcome of a search.
#[derive(Debug, Clone, PartialEq)]
pub struct Unscrambled {
    /// The accepted candidate, or a copy of the input if none was accepted.
    pub data: Vec<u8>,
    /// The transform that produced `data`, if any.
    pub transform: Option<Transform>,
}

/// Runs the transform search with a fixed set of [SearchOptions].
#[derive(Debug, Clone, Default)]
pub struct Unscrambler {
    options: SearchOptions,
}

impl Unscrambler {
    pub fn new(options: SearchOptions) -> Self {
        Self { options }
    }

    /// Searches for the first candidate transform of `data` whose entropy is
    /// below the threshold.
    ///
    /// # Errors
    ///
    /// Returns [crate::Error::InvalidInput] if `data` is empty.
    pub fn search(&self, data: &[u8]) -> Result<Unscrambled> {
        for transform in candidates(data, self.options.key_length) {
            let candidate = transform.apply(data);
            let entropy = shannon_entropy(&candidate)?;
            if entropy < self.options.threshold {
                debug!(%transform, entropy, "accepted candidate");
                return Ok(Unscrambled {
                    data: candidate,
                    transform: Some(transform),
                });
            }
        }

        debug!(
            threshold = self.options.threshold,
            "no candidate below threshold, keeping input"
        );
        Ok(Unscrambled {
            data: data.to_vec(),
            transform: None,
        })
    }
}

/// Searches `data` with the default threshold and returns the chosen buffer.
///
/// See [Unscrambler::search] for details.
pub fn search(data: &[u8], key_length: Option<NonZeroUsize>) -> Result<Vec<u8>> {
    let unscrambler = Unscrambler::new(SearchOptions {
        key_length,
        ..SearchOptions::default()
    });
    Ok(unscrambler.search(data)?.data)
}

/// Lists every candidate in search order.
fn candidates(
    data: &[u8],
    key_length: Option<NonZeroUsize>,
) -> impl Iterator<Item = Transform> {
    let shifts = (0..=u8::MAX).map(Transform::Shift);
    let xors = FIXED_XOR_KEYS.into_iter().map(Transform::Xor);
    // Key comes from the untransformed input
    let repeating = key_length
        .map(|n| Transform::RepeatingXor(data[..n.get().min(data.len())].to_vec()));

    shifts.chain(xors).chain(repeating)
}
