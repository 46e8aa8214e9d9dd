//! Record level reading and writing of delimited text.

use super::config::{DelimitedConfig, TokenDelimiter};
use super::iterators::RecordIterator;
use super::parser::{RecordParser, Step};
use super::record::ReadRecordResult;
use crate::common::bom::{peek_bom, write_bom};
use crate::common::encoding::{CharDecoder, TextEncoding};
use crate::common::Result;
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};

/// Reads and writes records of delimited text on caller owned streams.
///
/// The provider holds only its configuration, so one instance can serve any
/// number of independent streams. Streams are never closed; reads reposition
/// the cursor and leave it at an unspecified offset, use
/// [`ReadRecordResult::end_position`] to continue.
#[derive(Debug, Clone, Default)]
pub struct DelimitedTextProvider {
    config: DelimitedConfig,
}

impl DelimitedTextProvider {
    /// Create a provider, rejecting configurations that cannot round-trip.
    pub fn new(config: DelimitedConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create a provider for a preset token delimiter with `"` quotes and CRLF records.
    pub fn from_preset(delimiter: TokenDelimiter) -> Self {
        Self {
            config: delimiter.into(),
        }
    }

    pub fn config(&self) -> &DelimitedConfig {
        &self.config
    }

    /// Read every record from the start of the stream.
    ///
    /// Always returns at least one record; an empty stream yields a single
    /// record holding one empty token.
    pub fn read_all_records<R: Read + Seek>(&self, stream: &mut R) -> Result<Vec<ReadRecordResult>> {
        log::info!("Reading all records from stream");
        let records = self.records(stream).collect::<Result<Vec<_>>>()?;
        log::info!("Finished reading {} records from stream", records.len());
        Ok(records)
    }

    /// Lazily read records from the start of the stream.
    pub fn records<'a, R: Read + Seek>(&'a self, stream: &'a mut R) -> RecordIterator<'a, R> {
        RecordIterator::new(self, stream, 0)
    }

    /// Lazily read records starting at a previously returned end position.
    pub fn records_from<'a, R: Read + Seek>(
        &'a self,
        stream: &'a mut R,
        start_position: u64,
    ) -> RecordIterator<'a, R> {
        RecordIterator::new(self, stream, start_position)
    }

    /// Read the record beginning at `start_position`.
    ///
    /// The encoding is detected from the byte order mark at the very start of
    /// the stream, whatever the start position. Reading from offset 0 skips
    /// that mark and counts it in the record's length.
    pub fn read_next_record<R: Read + Seek>(
        &self,
        stream: &mut R,
        start_position: u64,
    ) -> Result<ReadRecordResult> {
        let stream_len = stream.seek(SeekFrom::End(0))?;
        stream.seek(SeekFrom::Start(0))?;
        let bom = peek_bom(stream)?;
        let encoding = TextEncoding::from(bom);
        log::trace!("Stream of {} bytes decoded as {}", stream_len, encoding.name());

        let mut length = 0u64;
        if start_position == 0 {
            length = bom.map_or(0, |kind| kind.len() as u64);
        }
        stream.seek(SeekFrom::Start(start_position + length))?;

        let mut decoder = CharDecoder::new(BufReader::new(&mut *stream), encoding);
        let mut parser = RecordParser::new(&self.config);
        while let Some((c, width)) = decoder.next_char()? {
            length += width as u64;
            if parser.push(c) == Step::RecordEnd {
                break;
            }
        }

        let mut record = ReadRecordResult {
            tokens: parser.finish(),
            start_position,
            length,
            has_more: true,
        };
        if record.end_position() >= stream_len {
            record.has_more = false;
        }

        log::debug!(
            "Read record at {} ({} bytes, {} tokens)",
            record.start_position,
            record.length,
            record.tokens.len()
        );
        Ok(record)
    }

    /// Write one record followed by the record delimiter.
    pub fn write_record<W, I, S>(&self, tokens: I, stream: &mut W) -> Result<()>
    where
        W: Write + Seek,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        log::debug!("Writing record to stream");
        let mut writer = TextWriter::new(stream, self.config.encoding)?;
        let mut text = String::new();
        self.append_record(tokens, &mut text);
        text.push_str(&self.config.record_delimiter);
        writer.write_str(&text)?;
        writer.flush()
    }

    /// Write records separated by the record delimiter, without a trailing one.
    pub fn write_all_records<W, I, T, S>(&self, records: I, stream: &mut W) -> Result<()>
    where
        W: Write + Seek,
        I: IntoIterator<Item = T>,
        T: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        log::info!("Writing all records to stream");
        let mut writer = TextWriter::new(stream, self.config.encoding)?;
        let mut text = String::new();
        let mut count = 0usize;
        for record in records {
            text.clear();
            if count > 0 {
                text.push_str(&self.config.record_delimiter);
            }
            self.append_record(record, &mut text);
            writer.write_str(&text)?;
            count += 1;
        }
        writer.flush()?;
        log::info!("Finished writing {} records to stream", count);
        Ok(())
    }

    fn append_record<I, S>(&self, tokens: I, out: &mut String)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for (i, token) in tokens.into_iter().enumerate() {
            if i > 0 {
                out.push(self.config.token_delimiter);
            }
            self.append_token(token.as_ref(), out);
        }
    }

    fn append_token(&self, token: &str, out: &mut String) {
        let quote = self.config.quote;
        let mut escaped = String::with_capacity(token.len());
        for c in token.chars() {
            if c == quote {
                escaped.push(quote);
            }
            escaped.push(c);
        }

        if self.needs_quotes(&escaped) {
            out.push(quote);
            out.push_str(&escaped);
            out.push(quote);
        } else {
            out.push_str(&escaped);
        }
    }

    fn needs_quotes(&self, escaped: &str) -> bool {
        let record_delimiter = self.config.record_delimiter.as_str();
        if escaped.contains(self.config.token_delimiter) || escaped.contains(record_delimiter) {
            return true;
        }
        if escaped.is_empty() || record_delimiter.chars().nth(1).is_none() {
            return false;
        }
        // The token's tail and the delimiter written after it must not form an earlier delimiter
        let joined = format!("{escaped}{record_delimiter}");
        joined
            .find(record_delimiter)
            .is_some_and(|index| index < escaped.len())
    }
}

/// Buffered writer that encodes text and emits the encoding's byte order
/// mark when writing starts at offset 0.
struct TextWriter<'w, W: Write> {
    out: BufWriter<&'w mut W>,
    encoding: TextEncoding,
    bytes: Vec<u8>,
}

impl<'w, W: Write + Seek> TextWriter<'w, W> {
    fn new(stream: &'w mut W, encoding: TextEncoding) -> Result<Self> {
        if let Some(bom) = encoding.bom()
            && stream.stream_position()? == 0
        {
            write_bom(stream, bom)?;
        }
        Ok(TextWriter {
            out: BufWriter::new(stream),
            encoding,
            bytes: Vec::new(),
        })
    }
}

impl<W: Write> TextWriter<'_, W> {
    fn write_str(&mut self, text: &str) -> Result<()> {
        self.bytes.clear();
        self.encoding.encode_str(text, &mut self.bytes);
        self.out.write_all(&self.bytes)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}
