// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/lib.rs - Readable text recovery library for boardview files.
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
 * # `pcbscrub` Crate
 *
 * A library for pulling the text fields out of ASUS FZ and ASRock CAE
 * boardview files and running an entropy-guided brute-force search for a
 * byte transform that makes them readable.
 *
 * The pipeline is:
 *
 * 1. [decoder]: Handles decryption and decompression of the file.
 * 2. [parser]: Converts the decoded bytes into symbol, pin and component
 *    records.
 * 3. [extract]: Concatenates references, values and net names into a buffer.
 * 4. [unscramble]: Searches shift and XOR transforms, scored by [entropy].
 * 5. [report]: Filters printable characters and writes them to CSV.
 *
 * [scrub] runs all of the above in one call.
 *
 * ## Usage Example
 *
 * ```no_run
 * use pcbscrub::decoder::DecodedBoardFile;
 * use pcbscrub::parser::ParsedBoardFile;
 * use pcbscrub::{entropy, extract, report, unscramble};
 *
 * fn main() -> Result<(), pcbscrub::Error> {
 *     let decoded = DecodedBoardFile::from_path("example.fz")?;
 *     let parsed = ParsedBoardFile::from_decoded(&decoded)?;
 *
 *     let text = extract::board_text(&parsed);
 *     let unscrambled = unscramble::search(text.as_bytes(), None)?;
 *     println!("Entropy: {}", entropy::shannon_entropy(&unscrambled)?);
 *
 *     let rows = report::printable_chars(&unscrambled);
 *     report::write_csv_file("output.csv", &rows)?;
 *
 *     Ok(())
 * }
 * ```
 */

use thiserror::Error;

mod crypto;
pub mod decoder;
pub mod entropy;
pub mod extract;
pub mod parser;
pub mod report;
pub mod scrub;
pub mod unscramble;

/// Errors produced anywhere in the pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// An empty buffer was handed to the entropy estimator.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    /// The file container could not be decrypted or decompressed.
    #[error("decode error: {0}")]
    Decode(String),
    /// A record was missing a field or had an unexpected shape.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
