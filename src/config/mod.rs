//! Configuration for splitting behavior.
//!
//! - [`SplitConfig`] - Delimiter, record shaping and reader chunk size
//!
//! # Example
//!
//! ```
//! use recsplit::SplitConfig;
//!
//! // CRLF-terminated records, keep the delimiter in the output
//! let config = SplitConfig::new(&b"\r\n"[..])?.with_strip_delimiter(false);
//! assert_eq!(config.delimiter(), b"\r\n");
//!
//! # Ok::<(), recsplit::SplitError>(())
//! ```

use bytes::Bytes;

use crate::error::SplitError;

/// Default record delimiter.
pub const DEFAULT_DELIMITER: &[u8] = b"\n";

/// Default number of bytes the reader adapters feed per chunk (64 KiB).
pub const DEFAULT_READ_SIZE: usize = 64 * 1024;

/// Configuration for delimiter-based splitting.
///
/// The delimiter must be non-empty, and `read_size` must be at least as
/// long as the delimiter. Reader adapters feed chunks of `read_size` bytes,
/// which keeps every leftover window resolvable by the next chunk.
///
/// # Example
///
/// ```
/// use recsplit::SplitConfig;
///
/// let config = SplitConfig::default()
///     .with_skip_empty(true)
///     .with_read_size(4096);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SplitConfig {
    /// Byte sequence that terminates each piece.
    delimiter: Bytes,

    /// Whether finished records drop their trailing delimiter.
    strip_delimiter: bool,

    /// Whether finished records with no payload are discarded.
    skip_empty: bool,

    /// Bytes per chunk for the reader adapters.
    read_size: usize,
}

impl SplitConfig {
    /// Creates a configuration for the given delimiter.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::InvalidConfig`] if the delimiter is empty.
    pub fn new(delimiter: impl Into<Bytes>) -> Result<Self, SplitError> {
        let config = Self {
            delimiter: delimiter.into(),
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Sets the delimiter.
    pub fn with_delimiter(mut self, delimiter: impl Into<Bytes>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Sets whether the trailing delimiter is removed from finished records.
    pub fn with_strip_delimiter(mut self, strip: bool) -> Self {
        self.strip_delimiter = strip;
        self
    }

    /// Sets whether empty records are dropped.
    pub fn with_skip_empty(mut self, skip: bool) -> Self {
        self.skip_empty = skip;
        self
    }

    /// Sets the reader chunk size.
    pub fn with_read_size(mut self, size: usize) -> Self {
        self.read_size = size;
        self
    }

    /// Returns the delimiter.
    pub fn delimiter(&self) -> &[u8] {
        &self.delimiter
    }

    /// Returns whether delimiters are stripped.
    pub fn strip_delimiter(&self) -> bool {
        self.strip_delimiter
    }

    /// Returns whether empty records are dropped.
    pub fn skip_empty(&self) -> bool {
        self.skip_empty
    }

    /// Returns the reader chunk size.
    pub fn read_size(&self) -> usize {
        self.read_size
    }

    /// Validates the current configuration.
    pub fn validate(&self) -> Result<(), SplitError> {
        if self.delimiter.is_empty() {
            return Err(SplitError::InvalidConfig {
                message: "delimiter must be non-empty",
            });
        }

        if self.read_size < self.delimiter.len() {
            return Err(SplitError::InvalidConfig {
                message: "read_size cannot be smaller than the delimiter",
            });
        }

        Ok(())
    }
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            delimiter: Bytes::from_static(DEFAULT_DELIMITER),
            strip_delimiter: true,
            skip_empty: false,
            read_size: DEFAULT_READ_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_config_default() {
        let config = SplitConfig::default();
        assert_eq!(config.delimiter(), b"\n");
        assert!(config.strip_delimiter());
        assert!(!config.skip_empty());
        assert_eq!(config.read_size(), 64 * 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_split_config_builder() {
        let config = SplitConfig::default()
            .with_delimiter(&b"\r\n"[..])
            .with_strip_delimiter(false)
            .with_skip_empty(true)
            .with_read_size(16);
        assert_eq!(config.delimiter(), b"\r\n");
        assert!(!config.strip_delimiter());
        assert!(config.skip_empty());
        assert_eq!(config.read_size(), 16);
    }

    #[test]
    fn test_split_config_invalid_empty_delimiter() {
        assert!(matches!(
            SplitConfig::new(Bytes::new()),
            Err(SplitError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_split_config_invalid_read_size() {
        let config = SplitConfig::new(&b"<<END>>"[..]).unwrap().with_read_size(4);
        assert!(config.validate().is_err());
    }
}
