//! The Record type - one logical record cut from the stream.

use bytes::Bytes;
use std::fmt;

/// A finished record produced by the built-in assemblers.
///
/// # Example
///
/// ```
/// use recsplit::Record;
/// use bytes::Bytes;
///
/// let record = Record {
///     data: Bytes::from_static(b"hello world"),
///     offset: 0,
///     pieces: 1,
/// };
///
/// assert_eq!(record.data.len(), 11);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// The record payload.
    pub data: Bytes,

    /// Offset of the record's first byte in the original stream.
    pub offset: u64,

    /// Number of delimiter-bounded pieces grouped into this record.
    pub pieces: usize,
}

impl Record {
    /// Creates a single-piece record at offset zero.
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            offset: 0,
            pieces: 1,
        }
    }

    /// Creates a single-piece record at the given offset.
    pub fn with_offset(data: impl Into<Bytes>, offset: u64) -> Self {
        Self {
            data: data.into(),
            offset,
            pieces: 1,
        }
    }

    /// Returns the length of the record data.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the record has no data.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns a reference to the record data.
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Returns the start offset.
    pub fn start(&self) -> u64 {
        self.offset
    }

    /// Returns the end offset of the payload (exclusive).
    ///
    /// When delimiters are stripped this stops short of the stream position
    /// of the next record.
    pub fn end(&self) -> u64 {
        self.offset + self.data.len() as u64
    }

    /// Returns the payload as a stream range.
    pub fn range(&self) -> std::ops::Range<u64> {
        self.start()..self.end()
    }

    /// Consumes the record and returns the underlying data.
    pub fn into_data(self) -> Bytes {
        self.data
    }
}

impl From<Bytes> for Record {
    fn from(data: Bytes) -> Self {
        Self::new(data)
    }
}

impl From<Vec<u8>> for Record {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Record({} bytes @ {}", self.len(), self.offset)?;
        if self.pieces > 1 {
            write!(f, ", {} pieces", self.pieces)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let record = Record::new(&b"hello"[..]);
        assert_eq!(record.len(), 5);
        assert_eq!(record.pieces, 1);
        assert!(!record.is_empty());
    }

    #[test]
    fn test_range() {
        let record = Record::with_offset(&b"hello"[..], 100);
        assert_eq!(record.start(), 100);
        assert_eq!(record.end(), 105);
        assert_eq!(record.range(), 100..105);
    }

    #[test]
    fn test_display() {
        let mut record = Record::with_offset(&b"hello"[..], 100);
        assert_eq!(format!("{}", record), "Record(5 bytes @ 100)");

        record.pieces = 3;
        assert!(format!("{}", record).contains("3 pieces"));
    }

    #[test]
    fn test_from_bytes() {
        let record: Record = Bytes::from_static(b"test").into();
        assert_eq!(record.into_data(), Bytes::from_static(b"test"));
    }
}
