//! Common types and utilities shared across text formats.

// Submodule declarations
pub mod bom;
pub mod encoding;
pub mod error;

// Re-exports for convenience
pub use bom::BomKind;
pub use encoding::{TextEncoding, detect_encoding};
pub use error::{Error, Result};
