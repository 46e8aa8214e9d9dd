//! Byte Order Mark (BOM) utilities.
//!
//! Provides detection, peeking, and writing helpers for the Unicode byte order
//! marks that select how a delimited text stream is decoded.

use crate::common::Result;
use serde::{Deserialize, Serialize};
use std::io::{Read, Seek, SeekFrom, Write};

/// Supported BOM encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BomKind {
    Utf8,
    Utf16Le,
    Utf16Be,
    Utf32Le,
    Utf32Be,
}

impl BomKind {
    /// Returns the byte representation of the BOM.
    #[inline]
    pub const fn as_bytes(&self) -> &'static [u8] {
        match self {
            BomKind::Utf8 => &UTF8_BOM,
            BomKind::Utf16Le => &UTF16_LE_BOM,
            BomKind::Utf16Be => &UTF16_BE_BOM,
            BomKind::Utf32Le => &UTF32_LE_BOM,
            BomKind::Utf32Be => &UTF32_BE_BOM,
        }
    }

    /// Returns the length in bytes of the BOM.
    #[inline]
    #[allow(clippy::len_without_is_empty)] // No need to check for empty BOMs
    pub const fn len(&self) -> usize {
        self.as_bytes().len()
    }
}

/// UTF-8 BOM bytes.
pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];
/// UTF-16 little-endian BOM bytes.
pub const UTF16_LE_BOM: [u8; 2] = [0xFF, 0xFE];
/// UTF-16 big-endian BOM bytes.
pub const UTF16_BE_BOM: [u8; 2] = [0xFE, 0xFF];
/// UTF-32 little-endian BOM bytes.
pub const UTF32_LE_BOM: [u8; 4] = [0xFF, 0xFE, 0x00, 0x00];
/// UTF-32 big-endian BOM bytes.
pub const UTF32_BE_BOM: [u8; 4] = [0x00, 0x00, 0xFE, 0xFF];

/// Marks in match order. UTF-32LE shares its first two bytes with UTF-16LE,
/// so it has to be tried first.
const MARKS: [BomKind; 5] = [
    BomKind::Utf8,
    BomKind::Utf32Le,
    BomKind::Utf16Le,
    BomKind::Utf16Be,
    BomKind::Utf32Be,
];

/// Detects a BOM at the start of `prefix`.
///
/// Only the bytes actually present are considered, so a two byte `FF FE`
/// prefix is UTF-16LE rather than a truncated UTF-32LE mark.
pub fn detect_bom(prefix: &[u8]) -> Option<BomKind> {
    MARKS
        .into_iter()
        .find(|kind| prefix.starts_with(kind.as_bytes()))
}

/// Reads up to four bytes at the current position and reports the BOM they
/// start with, if any.
///
/// The reader is always rewound to where it started.
pub fn peek_bom<R: Read + Seek>(reader: &mut R) -> Result<Option<BomKind>> {
    let start = reader.stream_position()?;
    let mut buf = [0u8; 4];
    let mut read = 0usize;

    while read < buf.len() {
        match reader.read(&mut buf[read..])? {
            0 => break,
            n => read += n,
        }
    }

    reader.seek(SeekFrom::Start(start))?;
    Ok(detect_bom(&buf[..read]))
}

/// Writes the requested BOM to the writer.
pub fn write_bom<W: Write>(writer: &mut W, kind: BomKind) -> Result<()> {
    writer.write_all(kind.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_detect_bom_prefers_longer_marks() {
        assert_eq!(detect_bom(&[0xFF, 0xFE, 0x00, 0x00]), Some(BomKind::Utf32Le));
        assert_eq!(detect_bom(&[0xFF, 0xFE, 0x41, 0x00]), Some(BomKind::Utf16Le));
        assert_eq!(detect_bom(&[0x00, 0x00, 0xFE, 0xFF]), Some(BomKind::Utf32Be));
        assert_eq!(detect_bom(&[0xEF, 0xBB, 0xBF, b'a']), Some(BomKind::Utf8));
    }

    #[test]
    fn test_detect_bom_short_input() {
        assert_eq!(detect_bom(&[]), None);
        assert_eq!(detect_bom(&[0xEF, 0xBB]), None);
        assert_eq!(detect_bom(&[0xFF, 0xFE]), Some(BomKind::Utf16Le));
        assert_eq!(detect_bom(&[0xFE, 0xFF]), Some(BomKind::Utf16Be));
    }

    #[test]
    fn test_peek_bom_rewinds() {
        let mut cursor = Cursor::new(vec![0xEF, 0xBB, 0xBF, b'a', b'b']);
        cursor.set_position(1);

        // Peeking from the middle of the mark finds nothing.
        assert_eq!(peek_bom(&mut cursor).unwrap(), None);
        assert_eq!(cursor.position(), 1);

        cursor.set_position(0);
        assert_eq!(peek_bom(&mut cursor).unwrap(), Some(BomKind::Utf8));
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_write_bom() {
        let mut output = Vec::new();
        write_bom(&mut output, BomKind::Utf16Be).unwrap();
        assert_eq!(output, UTF16_BE_BOM);
    }
}
