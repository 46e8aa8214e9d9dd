//! Error conversion implementations.
//!
//! This module contains From trait implementations to convert errors raised by
//! dependencies into the unified Error type.

use super::types::Error;

impl From<serde_saphyr::Error> for Error {
    fn from(err: serde_saphyr::Error) -> Self {
        Error::Config(err.to_string())
    }
}
