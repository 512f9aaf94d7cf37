// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/scrub.rs - End-to-end text recovery for boardview files.
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
 * # `scrub` Module
 *
 * Chains the pipeline stages: decode, parse, collect text, search for a
 * transform, measure entropy, and pick out printable characters.
 *
 * ## Usage Example
 *
 * ```no_run
 * use pcbscrub::scrub::scrub;
 * use pcbscrub::unscramble::SearchOptions;
 *
 * fn main() -> Result<(), pcbscrub::Error> {
 *     let scrubbed = scrub("example.fz", "output.csv", SearchOptions::default())?;
 *     println!("Entropy: {}", scrubbed.entropy);
 *     Ok(())
 * }
 * ```
 */

use std::path::Path;

use tracing::info;

use crate::decoder::DecodedBoardFile;
use crate::entropy::shannon_entropy;
use crate::extract::board_text;
use crate::parser::ParsedBoardFile;
use crate::report::{PrintableChar, printable_chars, write_csv_file};
use crate::unscramble::{SearchOptions, Unscrambled, Unscrambler};
use crate::{Error, Result};

/// Everything the pipeline produced for one board.
#[derive(Debug)]
pub struct Scrubbed {
    pub unscrambled: Unscrambled,
    /// Entropy of `unscrambled.data`, in bits per byte.
    pub entropy: f64,
    pub rows: Vec<PrintableChar>,
}

/// Runs the pipeline on an already decoded board.
///
/// # Errors
///
/// Returns [Error::InvalidInput] if the board has no references, values or
/// net names, before any search is attempted.
pub fn scrub_decoded(decoded: &DecodedBoardFile, options: SearchOptions) -> Result<Scrubbed> {
    let parsed = ParsedBoardFile::from_decoded(decoded)?;

    let text = board_text(&parsed);
    if text.is_empty() {
        return Err(Error::InvalidInput(
            "board has no references, values or net names",
        ));
    }

    let unscrambled = Unscrambler::new(options).search(text.as_bytes())?;
    match &unscrambled.transform {
        Some(transform) => info!(%transform, "unscrambled board text"),
        None => info!("no transform accepted, using board text as-is"),
    }

    let entropy = shannon_entropy(&unscrambled.data)?;
    let rows = printable_chars(&unscrambled.data);

    Ok(Scrubbed {
        unscrambled,
        entropy,
        rows,
    })
}

/// Runs the pipeline on the raw bytes of a board file.
pub fn scrub_bytes(data: &[u8], options: SearchOptions) -> Result<Scrubbed> {
    let decoded = DecodedBoardFile::from_bytes(data)?;
    scrub_decoded(&decoded, options)
}

/// Reads `input`, runs the pipeline, and writes the printable characters to
/// `output` as CSV.
pub fn scrub<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    options: SearchOptions,
) -> Result<Scrubbed> {
    let decoded = DecodedBoardFile::from_path(input)?;
    let scrubbed = scrub_decoded(&decoded, options)?;
    write_csv_file(output, &scrubbed.rows)?;
    Ok(scrubbed)
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use super::*;
    use crate::decoder::tests::container;
    use crate::parser::tests::{CONTENT, DESCRIPTION};
    use crate::report::write_csv;
    use crate::unscramble::{Transform, search};

    const BOARD_TEXT: &str = "C1 100nF 16V X7R\nU1 LM358 OPAMP\n+3V3\nGND\nGND\n";

    #[test]
    fn test_empty_board_is_invalid() {
        let data = container(b"A!UNIT!mils\r\n", DESCRIPTION);
        let result = scrub_bytes(&data, SearchOptions::default());
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_rows_follow_search_output() {
        let data = container(CONTENT, DESCRIPTION);
        let scrubbed = scrub_bytes(&data, SearchOptions::default()).unwrap();

        let expected = search(BOARD_TEXT.as_bytes(), None).unwrap();
        assert_eq!(scrubbed.unscrambled.data, expected);
        assert_eq!(scrubbed.unscrambled.transform, Some(Transform::Shift(0)));
        assert_eq!(scrubbed.rows, printable_chars(&expected));
        assert_eq!(scrubbed.entropy, shannon_entropy(&expected).unwrap());
    }

    #[test]
    fn test_options_reach_the_search() {
        let data = container(CONTENT, DESCRIPTION);

        let strict = SearchOptions {
            threshold: 0.5,
            key_length: None,
        };
        let scrubbed = scrub_bytes(&data, strict).unwrap();
        assert_eq!(scrubbed.unscrambled.transform, None);
        assert_eq!(scrubbed.unscrambled.data, BOARD_TEXT.as_bytes());

        // A key as long as the text cancels it out completely
        let keyed = SearchOptions {
            threshold: 0.5,
            key_length: NonZeroUsize::new(1000),
        };
        let scrubbed = scrub_bytes(&data, keyed).unwrap();
        assert_eq!(
            scrubbed.unscrambled.transform,
            Some(Transform::RepeatingXor(BOARD_TEXT.as_bytes().to_vec()))
        );
        assert_eq!(scrubbed.unscrambled.data, vec![0u8; BOARD_TEXT.len()]);
        assert_eq!(scrubbed.entropy, 0.0);
        assert!(scrubbed.rows.is_empty());
    }

    #[test]
    fn test_unreadable_description_still_scrubs() {
        let data = container(CONTENT, b"");
        let scrubbed = scrub_bytes(&data, SearchOptions::default()).unwrap();
        assert_eq!(
            scrubbed.unscrambled.data,
            b"C1 C0402\nU1 SOIC8\n+3V3\nGND\nGND\n"
        );
    }

    #[test]
    fn test_scrub_writes_csv() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("board.fz");
        let output = dir.path().join("output.csv");
        std::fs::write(&input, container(CONTENT, DESCRIPTION)).unwrap();

        let scrubbed = scrub(&input, &output, SearchOptions::default()).unwrap();

        let mut expected = Vec::new();
        write_csv(&mut expected, &printable_chars(&scrubbed.unscrambled.data)).unwrap();
        assert_eq!(std::fs::read(&output).unwrap(), expected);
    }

    #[test]
    fn test_scrub_does_not_write_on_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("empty.fz");
        let output = dir.path().join("output.csv");
        std::fs::write(&input, container(b"A!UNIT!mils\r\n", DESCRIPTION)).unwrap();

        let result = scrub(&input, &output, SearchOptions::default());
        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert!(!output.exists());
    }
}
