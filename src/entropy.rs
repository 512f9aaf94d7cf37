// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/entropy.rs - Shannon entropy of byte buffers.
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

use crate::{Error, Result};

/// Computes the Shannon entropy of a byte slice, in bits per byte.
///
/// The result is in the range [0.0, 8.0]: 0.0 when every byte has the same
/// value, 8.0 when all 256 values occur equally often. Only the byte
/// frequencies matter, so any reordering of `data` gives the same result.
///
/// # Errors
///
/// Returns [Error::InvalidInput] if `data` is empty.
pub fn shannon_entropy(data: &[u8]) -> Result<f64> {
    if data.is_empty() {
        return Err(Error::InvalidInput("cannot compute entropy of an empty buffer"));
    }

    let mut counts = [0usize; 256];
    for &byte in data {
        counts[byte as usize] += 1;
    }

    let len = data.len() as f64;
    let mut entropy = 0.0;
    for &count in counts.iter().filter(|&&c| c > 0) {
        let p = count as f64 / len;
        entropy -= p * p.log2();
    }

    Ok(entropy)
}
