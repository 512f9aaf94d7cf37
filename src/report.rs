// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/report.rs - CSV output of recovered characters.
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
 * # `report` Module
 *
 * Picks the printable characters out of a processed buffer and writes them
 * to CSV, one row per character, keyed by the character's index in the
 * buffer.
 *
 * ```text
 * Index,Character
 * 0,U
 * 1,1
 * ```
 */

use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::Result;

/// Returns true for ASCII letters, digits, punctuation, and the whitespace
/// characters space, tab, LF, CR, VT and FF.
pub fn is_printable(byte: u8) -> bool {
    byte.is_ascii_graphic() || matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

/// One recovered character and where it sits in the processed buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintableChar {
    pub index: usize,
    pub character: char,
}

pub fn printable_chars(data: &[u8]) -> Vec<PrintableChar> {
    data.iter()
        .enumerate()
        .filter(|&(_, &b)| is_printable(b))
        .map(|(index, &b)| PrintableChar {
            index,
            character: char::from(b),
        })
        .collect()
}

/// Writes the header row and one row per character.
pub fn write_csv<W: Write>(writer: W, rows: &[PrintableChar]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(["Index", "Character"])?;

    let mut buf = [0u8; 4];
    for row in rows {
        let index = row.index.to_string();
        let character: &str = row.character.encode_utf8(&mut buf);
        writer.write_record([index.as_str(), character])?;
    }

    writer.flush()?;
    Ok(())
}

pub fn write_csv_file<P: AsRef<Path>>(path: P, rows: &[PrintableChar]) -> Result<()> {
    let file = std::fs::File::create(path.as_ref())?;
    write_csv(std::io::BufWriter::new(file), rows)?;
    info!(path = %path.as_ref().display(), rows = rows.len(), "wrote CSV");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_printable() {
        for b in [b'A', b'z', b'0', b'~', b'!', b' ', b'\t', b'\n', b'\r', 0x0b, 0x0c] {
            assert!(is_printable(b), "{:#04x}", b);
        }
        for b in [0x00, 0x07, 0x1b, 0x7f, 0x80, 0xe9, 0xff] {
            assert!(!is_printable(b), "{:#04x}", b);
        }
    }

    #[test]
    fn test_printable_chars_keeps_buffer_index() {
        let rows = printable_chars(&[0x00, b'U', 0xff, b'1', b'\n']);
        assert_eq!(
            rows,
            [
                PrintableChar {
                    index: 1,
                    character: 'U',
                },
                PrintableChar {
                    index: 3,
                    character: '1',
                },
                PrintableChar {
                    index: 4,
                    character: '\n',
                },
            ]
        );
    }

    #[test]
    fn test_write_csv() {
        let rows = printable_chars(b"R1,\n");
        let mut out = Vec::new();
        write_csv(&mut out, &rows).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Index,Character\n0,R\n1,1\n2,\",\"\n3,\"\n\"\n"
        );
    }

    #[test]
    fn test_write_csv_empty() {
        let mut out = Vec::new();
        write_csv(&mut out, &[]).unwrap();
        assert_eq!(out, b"Index,Character\n");
    }
}
