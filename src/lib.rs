//! Delimited text records - a small library for reading and writing CSV-like
//! text one record at a time.
//!
//! # Features
//!
//! - **Quoted tokens**: tokens may contain the token delimiter, the quote, or
//!   the record delimiter; quotes are escaped by doubling
//! - **Multi-character record delimiters**: CRLF by default, any string allowed
//! - **BOM detection**: UTF-8, UTF-16 and UTF-32 streams are decoded by their
//!   byte order mark, UTF-8 otherwise
//! - **Resumable reads**: every record reports where it ends, so reading can
//!   continue from a persisted offset without rescanning the stream
//!
//! # Example
//!
//! ```no_run
//! use delimited_text::{DelimitedTextProvider, TokenDelimiter};
//! use std::fs::File;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = DelimitedTextProvider::from_preset(TokenDelimiter::Semicolon);
//! let mut file = File::open("export.csv")?;
//!
//! for record in provider.records(&mut file) {
//!     let record = record?;
//!     println!("{} @ {}", record, record.start_position);
//! }
//! # Ok(())
//! # }
//! ```

/// Shared error, encoding and byte order mark support
pub mod common;

/// Text formats
pub mod text;

// Re-export commonly used types for convenience
pub use common::{Error, Result, TextEncoding};
pub use text::delimited::{
    DelimitedConfig, DelimitedTextProvider, ReadRecordResult, RecordIterator, TokenDelimiter,
};
