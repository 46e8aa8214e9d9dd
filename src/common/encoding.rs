//! Character encoding utilities for delimited text streams.
//!
//! Streams are decoded one character at a time so that callers can account
//! for the exact number of bytes each character occupied. UTF-8 and UTF-16
//! units are decoded through `encoding_rs`; UTF-32 is not part of the
//! encoding standard `encoding_rs` implements, so its 4-byte units are
//! converted directly.

use crate::common::bom::{BomKind, detect_bom};
use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};
use std::io::{self, ErrorKind, Read};

/// Text encodings a delimited stream can be read or written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextEncoding {
    /// UTF-8 without a byte order mark
    #[default]
    Utf8,
    /// UTF-8 preceded by `EF BB BF`
    Utf8Bom,
    Utf16Le,
    Utf16Be,
    Utf32Le,
    Utf32Be,
}

impl TextEncoding {
    /// The byte order mark written in front of text in this encoding.
    #[inline]
    pub const fn bom(&self) -> Option<BomKind> {
        match self {
            TextEncoding::Utf8 => None,
            TextEncoding::Utf8Bom => Some(BomKind::Utf8),
            TextEncoding::Utf16Le => Some(BomKind::Utf16Le),
            TextEncoding::Utf16Be => Some(BomKind::Utf16Be),
            TextEncoding::Utf32Le => Some(BomKind::Utf32Le),
            TextEncoding::Utf32Be => Some(BomKind::Utf32Be),
        }
    }

    /// Returns the `encoding_rs` decoder for this encoding, if it has one.
    #[inline]
    pub fn decoder(&self) -> Option<&'static encoding_rs::Encoding> {
        match self {
            TextEncoding::Utf8 | TextEncoding::Utf8Bom => Some(encoding_rs::UTF_8),
            TextEncoding::Utf16Le => Some(encoding_rs::UTF_16LE),
            TextEncoding::Utf16Be => Some(encoding_rs::UTF_16BE),
            TextEncoding::Utf32Le | TextEncoding::Utf32Be => None,
        }
    }

    /// Human readable label, used in log output.
    pub fn name(&self) -> &'static str {
        match self {
            TextEncoding::Utf8Bom => "UTF-8 (BOM)",
            TextEncoding::Utf32Le => "UTF-32LE",
            TextEncoding::Utf32Be => "UTF-32BE",
            other => other.decoder().map_or("UTF-8", |encoding| encoding.name()),
        }
    }

    /// Appends `text` encoded in this encoding to `out`. No BOM is written.
    pub fn encode_str(&self, text: &str, out: &mut Vec<u8>) {
        match self {
            TextEncoding::Utf8 | TextEncoding::Utf8Bom => out.extend_from_slice(text.as_bytes()),
            TextEncoding::Utf16Le => {
                for unit in text.encode_utf16() {
                    out.extend_from_slice(&unit.to_le_bytes());
                }
            },
            TextEncoding::Utf16Be => {
                for unit in text.encode_utf16() {
                    out.extend_from_slice(&unit.to_be_bytes());
                }
            },
            TextEncoding::Utf32Le => {
                for c in text.chars() {
                    out.extend_from_slice(&u32::from(c).to_le_bytes());
                }
            },
            TextEncoding::Utf32Be => {
                for c in text.chars() {
                    out.extend_from_slice(&u32::from(c).to_be_bytes());
                }
            },
        }
    }
}

impl From<Option<BomKind>> for TextEncoding {
    fn from(bom: Option<BomKind>) -> Self {
        match bom {
            None => TextEncoding::Utf8,
            Some(BomKind::Utf8) => TextEncoding::Utf8Bom,
            Some(BomKind::Utf16Le) => TextEncoding::Utf16Le,
            Some(BomKind::Utf16Be) => TextEncoding::Utf16Be,
            Some(BomKind::Utf32Le) => TextEncoding::Utf32Le,
            Some(BomKind::Utf32Be) => TextEncoding::Utf32Be,
        }
    }
}

/// Determines a stream's encoding from its first (up to four) bytes.
///
/// Falls back to UTF-8 without BOM when no byte order mark matches.
///
/// # Examples
/// ```
/// use delimited_text::common::encoding::{TextEncoding, detect_encoding};
///
/// assert_eq!(detect_encoding(&[0xFF, 0xFE, 0x00, 0x00]), TextEncoding::Utf32Le);
/// assert_eq!(detect_encoding(b"name"), TextEncoding::Utf8);
/// ```
#[inline]
pub fn detect_encoding(prefix: &[u8]) -> TextEncoding {
    detect_bom(prefix).into()
}

/// Decodes a byte stream one character at a time.
///
/// Every decoded character is reported together with the number of bytes it
/// was read from. Malformed units decode to U+FFFD and consume only their own
/// bytes, so byte counts always add up to what was taken from the reader.
pub struct CharDecoder<R: Read> {
    reader: R,
    encoding: TextEncoding,
    // Bytes read ahead and given back; popped from the end.
    pushback: SmallVec<[u8; 4]>,
}

impl<R: Read> CharDecoder<R> {
    /// Create a decoder reading from the reader's current position.
    ///
    /// Any BOM must already have been skipped.
    pub fn new(reader: R, encoding: TextEncoding) -> Self {
        CharDecoder {
            reader,
            encoding,
            pushback: SmallVec::new(),
        }
    }

    /// The encoding this decoder reads.
    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// Decode the next character and its width in bytes.
    ///
    /// Returns `Ok(None)` at end of stream.
    pub fn next_char(&mut self) -> io::Result<Option<(char, usize)>> {
        match self.encoding {
            TextEncoding::Utf8 | TextEncoding::Utf8Bom => self.next_utf8(),
            TextEncoding::Utf16Le => self.next_utf16(u16::from_le_bytes),
            TextEncoding::Utf16Be => self.next_utf16(u16::from_be_bytes),
            TextEncoding::Utf32Le => self.next_utf32(u32::from_le_bytes),
            TextEncoding::Utf32Be => self.next_utf32(u32::from_be_bytes),
        }
    }

    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        if let Some(byte) = self.pushback.pop() {
            return Ok(Some(byte));
        }

        let mut buf = [0u8; 1];
        loop {
            match self.reader.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    /// Reads bytes into `buf` until it is full or the stream ends.
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        for (read, slot) in buf.iter_mut().enumerate() {
            match self.next_byte()? {
                Some(byte) => *slot = byte,
                None => return Ok(read),
            }
        }
        Ok(buf.len())
    }

    fn decode(&self, bytes: &[u8]) -> char {
        let Some(encoding) = self.encoding.decoder() else {
            return char::REPLACEMENT_CHARACTER;
        };
        let (text, _) = encoding.decode_without_bom_handling(bytes);
        text.chars().next().unwrap_or(char::REPLACEMENT_CHARACTER)
    }

    fn next_utf8(&mut self) -> io::Result<Option<(char, usize)>> {
        let Some(lead) = self.next_byte()? else {
            return Ok(None);
        };

        let width = match lead {
            0x00..=0x7F => return Ok(Some((char::from(lead), 1))),
            0xC2..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF4 => 4,
            _ => return Ok(Some((char::REPLACEMENT_CHARACTER, 1))),
        };

        let mut unit: SmallVec<[u8; 4]> = smallvec![lead];
        while unit.len() < width {
            match self.next_byte()? {
                Some(byte @ 0x80..=0xBF) => unit.push(byte),
                Some(byte) => {
                    // Start of the next character
                    self.pushback.push(byte);
                    break;
                },
                None => break,
            }
        }

        Ok(Some((self.decode(&unit), unit.len())))
    }

    fn next_utf16(&mut self, to_unit: fn([u8; 2]) -> u16) -> io::Result<Option<(char, usize)>> {
        let mut unit = [0u8; 4];
        match self.fill(&mut unit[..2])? {
            0 => return Ok(None),
            1 => return Ok(Some((char::REPLACEMENT_CHARACTER, 1))),
            _ => {},
        }

        if !(0xD800..=0xDBFF).contains(&to_unit([unit[0], unit[1]])) {
            return Ok(Some((self.decode(&unit[..2]), 2)));
        }

        // High surrogate: only pair it with a following low surrogate.
        let mut low = [0u8; 2];
        let read = self.fill(&mut low)?;
        if read == 2 && (0xDC00..=0xDFFF).contains(&to_unit(low)) {
            unit[2..].copy_from_slice(&low);
            return Ok(Some((self.decode(&unit), 4)));
        }
        for &byte in low[..read].iter().rev() {
            self.pushback.push(byte);
        }
        Ok(Some((char::REPLACEMENT_CHARACTER, 2)))
    }

    fn next_utf32(&mut self, to_scalar: fn([u8; 4]) -> u32) -> io::Result<Option<(char, usize)>> {
        let mut unit = [0u8; 4];
        match self.fill(&mut unit)? {
            0 => Ok(None),
            4 => {
                let c = char::from_u32(to_scalar(unit)).unwrap_or(char::REPLACEMENT_CHARACTER);
                Ok(Some((c, 4)))
            },
            partial => Ok(Some((char::REPLACEMENT_CHARACTER, partial))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(bytes: &[u8], encoding: TextEncoding) -> Vec<(char, usize)> {
        let mut decoder = CharDecoder::new(bytes, encoding);
        let mut chars = Vec::new();
        while let Some(decoded) = decoder.next_char().unwrap() {
            chars.push(decoded);
        }
        chars
    }

    #[test]
    fn test_detect_encoding_from_bom() {
        let cases: [(&[u8], TextEncoding); 6] = [
            (&[0xEF, 0xBB, 0xBF], TextEncoding::Utf8Bom),
            (&[0xFF, 0xFE, 0x00, 0x00], TextEncoding::Utf32Le),
            (&[0xFF, 0xFE], TextEncoding::Utf16Le),
            (&[0xFE, 0xFF], TextEncoding::Utf16Be),
            (&[0x00, 0x00, 0xFE, 0xFF], TextEncoding::Utf32Be),
            (&[0x00, 0x00, 0x00, 0x00], TextEncoding::Utf8),
        ];

        for (prefix, expected) in cases {
            assert_eq!(detect_encoding(prefix), expected, "prefix {:02X?}", prefix);
        }
    }

    #[test]
    fn test_utf8_widths() {
        let decoded = decode_all("a\u{e9}\u{20ac}\u{1F600}".as_bytes(), TextEncoding::Utf8);
        assert_eq!(
            decoded,
            vec![('a', 1), ('\u{e9}', 2), ('\u{20ac}', 3), ('\u{1F600}', 4)]
        );
    }

    #[test]
    fn test_utf8_malformed_keeps_following_char() {
        // Truncated two byte sequence followed by ASCII
        let decoded = decode_all(&[0xC3, b'x', 0xFF], TextEncoding::Utf8);
        assert_eq!(
            decoded,
            vec![
                (char::REPLACEMENT_CHARACTER, 1),
                ('x', 1),
                (char::REPLACEMENT_CHARACTER, 1)
            ]
        );
    }

    #[test]
    fn test_utf16_surrogate_pairs() {
        let mut bytes = Vec::new();
        TextEncoding::Utf16Be.encode_str("a\u{1F600}", &mut bytes);
        assert_eq!(
            decode_all(&bytes, TextEncoding::Utf16Be),
            vec![('a', 2), ('\u{1F600}', 4)]
        );

        // Lone high surrogate followed by 'b'
        let lone = [0x3D, 0xD8, b'b', 0x00];
        assert_eq!(
            decode_all(&lone, TextEncoding::Utf16Le),
            vec![(char::REPLACEMENT_CHARACTER, 2), ('b', 2)]
        );
    }

    #[test]
    fn test_utf32_round_trip_and_truncation() {
        let mut bytes = Vec::new();
        TextEncoding::Utf32Le.encode_str("x\u{20ac}", &mut bytes);
        bytes.push(0x41);
        assert_eq!(
            decode_all(&bytes, TextEncoding::Utf32Le),
            vec![('x', 4), ('\u{20ac}', 4), (char::REPLACEMENT_CHARACTER, 1)]
        );
    }

    #[test]
    fn test_encoding_names() {
        assert_eq!(TextEncoding::Utf8.name(), "UTF-8");
        assert_eq!(TextEncoding::Utf16Le.name(), "UTF-16LE");
        assert_eq!(TextEncoding::Utf32Be.name(), "UTF-32BE");
    }
}
