//! Iterator over the records of a stream

use super::provider::DelimitedTextProvider;
use super::record::ReadRecordResult;
use crate::common::Result;
use std::io::{Read, Seek};
use std::iter::FusedIterator;

/// Reads one record per call to `next`, chaining each read from the previous
/// record's end position.
///
/// Iteration stops after the record that reports `has_more == false`, or
/// after the first error.
pub struct RecordIterator<'a, R: Read + Seek> {
    provider: &'a DelimitedTextProvider,
    stream: &'a mut R,
    position: u64,
    done: bool,
}

impl<'a, R: Read + Seek> RecordIterator<'a, R> {
    /// Create a new record iterator starting at `position`
    pub fn new(provider: &'a DelimitedTextProvider, stream: &'a mut R, position: u64) -> Self {
        RecordIterator {
            provider,
            stream,
            position,
            done: false,
        }
    }

    /// Offset the next record will be read from. Persist it to resume later
    /// with [`DelimitedTextProvider::records_from`].
    pub fn position(&self) -> u64 {
        self.position
    }
}

impl<R: Read + Seek> Iterator for RecordIterator<'_, R> {
    type Item = Result<ReadRecordResult>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.provider.read_next_record(self.stream, self.position) {
            Ok(record) => {
                self.position = record.end_position();
                self.done = !record.has_more;
                Some(Ok(record))
            },
            Err(e) => {
                self.done = true;
                Some(Err(e))
            },
        }
    }
}

impl<R: Read + Seek> FusedIterator for RecordIterator<'_, R> {}
