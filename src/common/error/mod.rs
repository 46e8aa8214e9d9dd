//! Unified error types for the crate.
//!
//! Stream failures pass through untouched as [`Error::Io`]; everything else is
//! a configuration problem detected before any bytes are read or written.

// Submodule declarations
pub mod types;
pub mod conversions;

// Re-exports
pub use types::{Error, Result};
