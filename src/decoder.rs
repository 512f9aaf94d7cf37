// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/decoder.rs - Decoder library for ASUS FZ and ASRock CAE files.
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
 * # `decoder` Module
 *
 * Decrypts and decompresses ASUS FZ and ASRock CAE containers into their two
 * embedded streams: the `!`-delimited board content and the component
 * description table.
 *
 * Once decrypted, a container looks like this (all integers little-endian
 * `u32`):
 *
 * ```text
 * [content_len][zlib content] ... [pointer] ... [description_len][zlib description][offset]
 * ```
 *
 * `offset` counts back from the trailer to `pointer`, and `pointer` is the
 * absolute position of `description_len`.
 */

use std::fs::File;
use std::io::BufReader;
use std::io::prelude::*;
use std::path::Path;

use flate2::read::ZlibDecoder;
use tracing::debug;

use crate::crypto::{CAE_EXPANDED_KEY, ExpandedKey, FZ_EXPANDED_KEY, decrypt};
use crate::{Error, Result};

const ZLIB_CMF: u8 = 0x78;

fn read_u32_le(data: &[u8], offset: usize) -> Result<usize> {
    let bytes = offset
        .checked_add(4)
        .and_then(|end| data.get(offset..end))
        .ok_or_else(|| Error::Decode(format!("u32 at {:#x} is out of range", offset)))?;
    let value = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    usize::try_from(value).map_err(|_| Error::Decode(format!("{:#x} does not fit in usize", value)))
}

fn decompress(expected_len: usize, data: &[u8]) -> Result<Vec<u8>> {
    let limit = u64::try_from(expected_len).map_or(u64::MAX, |n| n.saturating_add(1));
    let mut buffer = Vec::new();
    let s = ZlibDecoder::new(data).take(limit).read_to_end(&mut buffer)?;
    if s != expected_len {
        return Err(Error::Decode(format!(
            "decompressed size mismatch: expected {}, got {}",
            expected_len, s
        )));
    }
    Ok(buffer)
}

fn unpack(data: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
    if data.get(4) != Some(&ZLIB_CMF) {
        return Err(Error::Decode("invalid zlib header".into()));
    }

    let content_len = read_u32_le(data, 0)?;
    let content = decompress(content_len, &data[4..])?;

    let out_of_range = || Error::Decode("description pointer is out of range".into());

    let trailer = data.len().checked_sub(4).ok_or_else(out_of_range)?;
    let pointer_offset = read_u32_le(data, trailer)?;
    let pointer_at = trailer.checked_sub(pointer_offset).ok_or_else(out_of_range)?;
    let pointer = read_u32_le(data, pointer_at)?;

    let description_len = read_u32_le(data, pointer)?;
    let description = data
        .get(pointer + 4..trailer)
        .ok_or_else(out_of_range)?;
    let description = decompress(description_len, description)?;

    Ok((content, description))
}

/// The two decompressed streams of a board file.
#[derive(Debug)]
pub struct DecodedBoardFile {
    pub content: Vec<u8>,
    pub description: Vec<u8>,
}

impl DecodedBoardFile {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer)?;
        Self::from_bytes(&buffer)
    }

    /// Decodes a raw file, trying no encryption first, then the FZ key, then
    /// the CAE key. The error from the last attempt is returned if all fail.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        fn try_process(
            data: &[u8],
            scheme: &str,
            key: Option<&ExpandedKey>,
        ) -> Result<(Vec<u8>, Vec<u8>)> {
            let result = match key {
                Some(k) => unpack(&decrypt(data, k)),
                None => unpack(data),
            };
            match &result {
                Ok((content, description)) => debug!(
                    scheme,
                    content_len = content.len(),
                    description_len = description.len(),
                    "decoded board file"
                ),
                Err(error) => debug!(scheme, %error, "decode attempt failed"),
            }
            result
        }

        let (content, description) = try_process(data, "plain", None)
            .or_else(|_| try_process(data, "FZ", Some(&FZ_EXPANDED_KEY)))
            .or_else(|_| try_process(data, "CAE", Some(&CAE_EXPANDED_KEY)))?;

        Ok(Self {
            content,
            description,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io::{Cursor, Write};

    use flate2::Compression;
    use flate2::write::ZlibEncoder;

    use super::*;
    use crate::crypto::encrypt;

    fn zlib(data: &[u8]) -> Vec<u8> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    /// Builds an unencrypted container around the two streams.
    pub(crate) fn container(content: &[u8], description: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend((content.len() as u32).to_le_bytes());
        out.extend(zlib(content));

        let pointer_at = out.len();
        out.extend(((pointer_at + 4) as u32).to_le_bytes());
        out.extend((description.len() as u32).to_le_bytes());
        out.extend(zlib(description));

        let offset = out.len() - pointer_at;
        out.extend((offset as u32).to_le_bytes());
        out
    }

    const CONTENT: &[u8] = b"A!UNIT!mils\r\nA!REFDES!COMP_INSERTION_CODE!SYM_NAME!SYM_MIRROR!SYM_ROTATE!\r\nS!U1!1!SOIC8!NO!0!\r\n";
    const DESCRIPTION: &[u8] = b"X570|1.0|X570 AORUS|1.01|90MB0000\r\nPN\tDESC\tQTY\tLOC\tPN2\r\n";

    #[test]
    fn test_plain() {
        let decoded = DecodedBoardFile::from_bytes(&container(CONTENT, DESCRIPTION)).unwrap();
        assert_eq!(decoded.content, CONTENT);
        assert_eq!(decoded.description, DESCRIPTION);
    }

    #[test]
    fn test_encrypted() {
        let plain = container(CONTENT, DESCRIPTION);
        for key in [&FZ_EXPANDED_KEY, &CAE_EXPANDED_KEY] {
            let decoded = DecodedBoardFile::from_bytes(&encrypt(&plain, key)).unwrap();
            assert_eq!(decoded.content, CONTENT);
            assert_eq!(decoded.description, DESCRIPTION);
        }
    }

    #[test]
    fn test_from_reader() {
        let reader = Cursor::new(container(CONTENT, DESCRIPTION));
        let decoded = DecodedBoardFile::from_reader(reader).unwrap();
        assert_eq!(decoded.content, CONTENT);
    }

    #[test]
    fn test_truncated_does_not_panic() {
        let full = container(CONTENT, DESCRIPTION);
        for len in [0, 2, 5, 8, full.len() / 2, full.len() - 1] {
            assert!(DecodedBoardFile::from_bytes(&full[..len]).is_err(), "len {}", len);
        }
    }

    #[test]
    fn test_size_mismatch() {
        let mut data = container(CONTENT, DESCRIPTION);
        data[..4].copy_from_slice(&((CONTENT.len() - 1) as u32).to_le_bytes());
        assert!(matches!(unpack(&data), Err(Error::Decode(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = DecodedBoardFile::from_path("/nonexistent/board.fz");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
