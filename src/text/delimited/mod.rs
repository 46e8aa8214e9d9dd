//! Delimited text (CSV/TSV/PSV) records with resumable reads.
//!
//! A [`DelimitedTextProvider`] owns three syntactic primitives: the token
//! delimiter, the quote character, and the (possibly multi-character) record
//! delimiter. Reads decode one record at a time and report the byte offsets
//! needed to continue from where they stopped; writes quote and escape tokens
//! so that reading them back yields the original values.
//!
//! # Example
//!
//! ```rust
//! use delimited_text::text::delimited::{DelimitedTextProvider, TokenDelimiter};
//! use std::io::Cursor;
//!
//! let provider = DelimitedTextProvider::from_preset(TokenDelimiter::Comma);
//! let mut stream = Cursor::new(Vec::new());
//! provider.write_all_records([["id", "note"], ["1", "says \"hi\", twice"]], &mut stream)?;
//!
//! let records = provider.read_all_records(&mut stream)?;
//! assert_eq!(records[1].tokens, ["1", "says \"hi\", twice"]);
//!
//! // Resume from a persisted offset
//! let second = provider.read_next_record(&mut stream, records[0].end_position())?;
//! assert_eq!(second, records[1]);
//! assert!(!second.has_more);
//! # Ok::<(), delimited_text::common::Error>(())
//! ```

pub mod config;
pub mod iterators;
pub(crate) mod matcher;
pub(crate) mod parser;
pub mod provider;
pub mod record;

pub use config::{CRLF, DelimitedConfig, TokenDelimiter};
pub use iterators::RecordIterator;
pub use provider::DelimitedTextProvider;
pub use record::ReadRecordResult;
