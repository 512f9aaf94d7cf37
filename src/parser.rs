// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/parser.rs - Record parser for ASUS FZ and ASRock CAE files.
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
 * # `parser` Module
 *
 * Pulls the text-bearing records out of a decoded board file: symbols and
 * pins from the content stream, and the bill of materials from the
 * description stream. Geometry is skipped.
 *
 * ## Usage Example
 *
 * ```no_run
 * use pcbscrub::decoder::DecodedBoardFile;
 * use pcbscrub::parser::ParsedBoardFile;
 *
 * fn main() -> Result<(), pcbscrub::Error> {
 *     let decoded = DecodedBoardFile::from_path("example.fz")?;
 *     let parsed = ParsedBoardFile::from_decoded(&decoded)?;
 *
 *     for pin in &parsed.content.pins {
 *         println!("{} {}: {}", pin.refdes, pin.pin_number, pin.net_name);
 *     }
 *
 *     Ok(())
 * }
 * ```
 */

use csv::ByteRecord;
use tracing::warn;

use crate::decoder::DecodedBoardFile;
use crate::{Error, Result};

enum Section {
    Unknown,
    Symbol,
    Pin,
}

/// A placed component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// The reference designator, e.g. "U1".
    pub refdes: String,
    /// The footprint/symbol name.
    pub sym_name: String,
}

/// A component pin and the net it connects to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pin {
    pub net_name: String,
    pub refdes: String,
    pub pin_number: String,
    pub pin_name: String,
}

/// Records from the content stream, in file order.
#[derive(Debug, Default)]
pub struct Content {
    pub symbols: Vec<Symbol>,
    pub pins: Vec<Pin>,
}

fn field(record: &ByteRecord, index: usize) -> Result<String> {
    record
        .get(index)
        .map(|f| String::from_utf8_lossy(f).into_owned())
        .ok_or_else(|| {
            let line = record.position().map_or(0, |p| p.line());
            Error::Parse(format!("line {}: missing field {}", line, index))
        })
}

impl Content {
    pub fn from_bytes(content: &[u8]) -> Result<Self> {
        let mut parsed = Self::default();

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'!')
            .flexible(true)
            .has_headers(false)
            .from_reader(content);

        let mut section = Section::Unknown;

        for result in reader.byte_records() {
            let record = result?;
            match record.get(0) {
                Some(b"A") => {
                    section = match record.get(1) {
                        Some(b"REFDES") => Section::Symbol,
                        Some(b"NET_NAME") => Section::Pin,
                        // Attributes inside a section
                        Some(b"UNIT" | b"LOGOInfo" | b"UnDrawSym") => continue,
                        _ => Section::Unknown,
                    };
                }
                Some(b"S") => match section {
                    Section::Symbol => parsed.symbols.push(Symbol {
                        refdes: field(&record, 1)?,
                        sym_name: field(&record, 3)?,
                    }),
                    Section::Pin => parsed.pins.push(Pin {
                        net_name: field(&record, 1)?,
                        refdes: field(&record, 2)?,
                        pin_number: field(&record, 3)?,
                        pin_name: field(&record, 4)?,
                    }),
                    Section::Unknown => (),
                },
                _ => (),
            }
        }

        Ok(parsed)
    }
}

/// A bill-of-materials row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub part_number: String,
    /// The human-readable value, e.g. "100nF 16V X7R".
    pub description: String,
    /// Kept as written; some files leave it blank.
    pub quantity: String,
    /// Reference designators this part is placed at.
    pub location: Vec<String>,
    pub part_number2: String,
}

/// Board identification and bill of materials.
#[derive(Debug, Default)]
pub struct Description {
    pub board_model: String,
    pub revision: String,
    pub extended_board_model: String,
    pub extended_revision: String,
    pub part_number: String,
    pub components: Vec<Component>,
}

impl Description {
    pub fn from_bytes(description: &[u8]) -> Result<Self> {
        let text = String::from_utf8_lossy(description);
        let header_line = text.split("\r\n").next().unwrap_or_default();
        let header: Vec<&str> = header_line.split('|').collect();
        let [board_model, revision, extended_board_model, extended_revision, part_number, ..] =
            header.as_slice()
        else {
            return Err(Error::Parse("invalid description header".into()));
        };

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .flexible(true)
            .has_headers(false)
            .from_reader(description);

        let mut components = Vec::new();
        // Header line, then column titles
        for result in reader.byte_records().skip(2) {
            let record = result?;
            if record.len() < 5 {
                continue;
            }

            components.push(Component {
                part_number: field(&record, 0)?,
                description: field(&record, 1)?,
                quantity: field(&record, 2)?.trim().to_string(),
                location: field(&record, 3)?
                    .split_whitespace()
                    .map(String::from)
                    .collect(),
                part_number2: field(&record, 4)?,
            });
        }

        Ok(Self {
            board_model: board_model.to_string(),
            revision: revision.to_string(),
            extended_board_model: extended_board_model.to_string(),
            extended_revision: extended_revision.to_string(),
            part_number: part_number.to_string(),
            components,
        })
    }

    /// Finds the component placed at `refdes`.
    pub fn component_at(&self, refdes: &str) -> Option<&Component> {
        self.components
            .iter()
            .find(|c| c.location.iter().any(|l| l == refdes))
    }
}

#[derive(Debug)]
pub struct ParsedBoardFile {
    pub content: Content,
    pub description: Description,
}

impl ParsedBoardFile {
    /// Parses both streams.
    ///
    /// Only the content stream is required. A description stream that cannot
    /// be parsed is logged and replaced by an empty one, so symbols fall back
    /// to their symbol names for values.
    pub fn from_decoded(decoded: &DecodedBoardFile) -> Result<Self> {
        let content = Content::from_bytes(&decoded.content)?;
        let description = Description::from_bytes(&decoded.description).unwrap_or_else(|error| {
            warn!(%error, "ignoring unreadable description stream");
            Description::default()
        });

        Ok(Self {
            content,
            description,
        })
    }
}
