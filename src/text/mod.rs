//! Text formats.

pub mod delimited;

pub use delimited::{DelimitedConfig, DelimitedTextProvider, ReadRecordResult, TokenDelimiter};
