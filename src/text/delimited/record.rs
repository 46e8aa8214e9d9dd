//! Result of reading one record.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One record read from a stream, with the byte positions needed to resume
/// reading after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadRecordResult {
    /// Tokens of the record, in source order. Never empty.
    pub tokens: Vec<String>,
    /// Offset in the stream where the record began
    pub start_position: u64,
    /// Bytes consumed by the record, including its record delimiter and, for
    /// the first record, the byte order mark
    pub length: u64,
    /// Whether more records may follow
    pub has_more: bool,
}

impl ReadRecordResult {
    /// Offset just past this record; the start of the next one.
    #[inline]
    pub fn end_position(&self) -> u64 {
        self.start_position + self.length
    }
}

impl Default for ReadRecordResult {
    fn default() -> Self {
        Self {
            tokens: Vec::new(),
            start_position: 0,
            length: 0,
            has_more: true,
        }
    }
}

impl fmt::Display for ReadRecordResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tokens.join(","))
    }
}
