//! Delimiter configuration for delimited text providers.

use crate::common::encoding::TextEncoding;
use crate::common::{Error, Result};
use serde::{Deserialize, Serialize};

/// Record delimiter used by all presets.
pub const CRLF: &str = "\r\n";

/// Token delimiter presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenDelimiter {
    #[default]
    Comma,
    Semicolon,
    Pipe,
    Tab,
}

impl TokenDelimiter {
    /// The delimiter character for this preset.
    #[inline]
    pub const fn as_char(&self) -> char {
        match self {
            TokenDelimiter::Comma => ',',
            TokenDelimiter::Semicolon => ';',
            TokenDelimiter::Pipe => '|',
            TokenDelimiter::Tab => '\t',
        }
    }
}

/// Configuration for reading and writing delimited records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelimitedConfig {
    /// Separates tokens within a record
    pub token_delimiter: char,
    /// Wraps tokens that contain delimiters; doubled to escape itself
    pub quote: char,
    /// Separates records, may be several characters long
    pub record_delimiter: String,
    /// Encoding used when writing. Reads always detect the encoding from the stream.
    pub encoding: TextEncoding,
}

impl Default for DelimitedConfig {
    fn default() -> Self {
        Self::from(TokenDelimiter::Comma)
    }
}

impl From<TokenDelimiter> for DelimitedConfig {
    fn from(delimiter: TokenDelimiter) -> Self {
        Self {
            token_delimiter: delimiter.as_char(),
            quote: '"',
            record_delimiter: CRLF.to_string(),
            encoding: TextEncoding::Utf8,
        }
    }
}

impl DelimitedConfig {
    /// Create a configuration from explicit delimiters, writing UTF-8.
    pub fn new(token_delimiter: char, quote: char, record_delimiter: impl Into<String>) -> Self {
        Self {
            token_delimiter,
            quote,
            record_delimiter: record_delimiter.into(),
            encoding: TextEncoding::Utf8,
        }
    }

    pub fn csv() -> Self {
        Self::from(TokenDelimiter::Comma)
    }

    pub fn semicolon() -> Self {
        Self::from(TokenDelimiter::Semicolon)
    }

    pub fn pipe() -> Self {
        Self::from(TokenDelimiter::Pipe)
    }

    pub fn tsv() -> Self {
        Self::from(TokenDelimiter::Tab)
    }

    /// Set the encoding used by the writers
    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Parse a configuration from YAML and validate it.
    ///
    /// Missing fields keep their comma preset values.
    ///
    /// ```
    /// use delimited_text::text::delimited::DelimitedConfig;
    ///
    /// let config = DelimitedConfig::from_yaml_str("token_delimiter: '|'\nencoding: utf16-le\n")?;
    /// assert_eq!(config.token_delimiter, '|');
    /// assert_eq!(config.record_delimiter, "\r\n");
    /// # Ok::<(), delimited_text::common::Error>(())
    /// ```
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_saphyr::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that records written with this configuration can be read back
    /// unambiguously.
    pub fn validate(&self) -> Result<()> {
        if self.record_delimiter.is_empty() {
            return Err(Error::InvalidConfig("record delimiter must not be empty".to_string()));
        }
        if self.token_delimiter == self.quote {
            return Err(Error::InvalidConfig(format!(
                "token delimiter and quote are both {:?}",
                self.quote
            )));
        }
        if let Some(c) = self
            .record_delimiter
            .chars()
            .find(|&c| c == self.token_delimiter || c == self.quote)
        {
            return Err(Error::InvalidConfig(format!(
                "record delimiter {:?} contains {:?}",
                self.record_delimiter, c
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let cases = [
            (TokenDelimiter::Semicolon, ';'),
            (TokenDelimiter::Pipe, '|'),
            (TokenDelimiter::Tab, '\t'),
            (TokenDelimiter::Comma, ','),
        ];

        for (preset, expected) in cases {
            let config = DelimitedConfig::from(preset);
            assert_eq!(config.token_delimiter, expected);
            assert_eq!(config.quote, '"');
            assert_eq!(config.record_delimiter, "\r\n");
            assert!(config.validate().is_ok());
        }
        assert_eq!(DelimitedConfig::tsv(), DelimitedConfig::from(TokenDelimiter::Tab));
    }

    #[test]
    fn test_validate_rejects_ambiguous_delimiters() {
        let empty = DelimitedConfig::new(',', '"', "");
        assert!(matches!(empty.validate(), Err(Error::InvalidConfig(_))));

        let same = DelimitedConfig::new('"', '"', "\n");
        assert!(matches!(same.validate(), Err(Error::InvalidConfig(_))));

        let overlapping = DelimitedConfig::new(',', '"', ",\n");
        assert!(matches!(overlapping.validate(), Err(Error::InvalidConfig(_))));

        assert!(DelimitedConfig::new(';', '\'', "\n").validate().is_ok());
    }

    #[test]
    fn test_from_yaml() {
        let config = DelimitedConfig::from_yaml_str(
            "token_delimiter: ';'\nquote: \"'\"\nrecord_delimiter: \"\\n\"\nencoding: utf8-bom\n",
        )
        .unwrap();
        assert_eq!(config.token_delimiter, ';');
        assert_eq!(config.quote, '\'');
        assert_eq!(config.record_delimiter, "\n");
        assert_eq!(config.encoding, TextEncoding::Utf8Bom);

        let invalid = DelimitedConfig::from_yaml_str("record_delimiter: ''\n");
        assert!(matches!(invalid, Err(Error::InvalidConfig(_))));

        let malformed = DelimitedConfig::from_yaml_str("token_delimiter: [1, 2]\n");
        assert!(matches!(malformed, Err(Error::Config(_))));
    }
}
