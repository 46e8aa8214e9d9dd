//! Unified error type for delimited text operations.
use thiserror::Error;

/// Main error type for record reading and writing.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error from the underlying stream
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Delimiter configuration that the reader cannot parse unambiguously
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration document could not be deserialized
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for delimited text operations.
pub type Result<T> = std::result::Result<T, Error>;
