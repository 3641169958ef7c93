//! The ScanWindow type - a byte buffer with an anchor and a cursor.

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::SplitError;

/// An exclusively owned byte buffer with two offsets.
///
/// - `cursor` is the scan position. Bytes before it have been examined.
/// - `anchor` is where the next not-yet-emitted piece starts.
///
/// Normally `anchor <= cursor <= len`. The scanner may rewind the cursor
/// while restarting a match attempt, so `cursor < anchor` is representable,
/// but every query that depends on the span between the two reports
/// [`SplitError::InvalidCursorPosition`] instead of tolerating it.
///
/// The window knows nothing about delimiters.
///
/// # Example
///
/// ```
/// use recsplit::ScanWindow;
///
/// let mut window = ScanWindow::new(&b"abc|def"[..]);
/// window.tick(4)?;
/// assert_eq!(&window.chunk()?[..], b"abc|");
///
/// window.reset_anchor();
/// assert_eq!(window.remaining(), 3);
/// assert_eq!(&window.tail()[..], b"def");
/// # Ok::<(), recsplit::SplitError>(())
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ScanWindow {
    buffer: Bytes,
    anchor: usize,
    cursor: usize,
}

impl ScanWindow {
    /// Wraps a chunk of input. Both offsets start at zero.
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            buffer: data.into(),
            anchor: 0,
            cursor: 0,
        }
    }

    /// Returns the length of the underlying storage.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns true if the window holds no bytes at all.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Returns the anchor offset.
    pub fn anchor(&self) -> usize {
        self.anchor
    }

    /// Returns the cursor offset.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Moves the cursor by `delta` bytes. Negative values rewind.
    ///
    /// # Errors
    ///
    /// [`SplitError::CursorOutOfBounds`] if the cursor would leave `0..=len`.
    /// The cursor is left untouched in that case.
    pub fn tick(&mut self, delta: isize) -> Result<(), SplitError> {
        let target = self.cursor as isize + delta;
        if target < 0 || target as usize > self.buffer.len() {
            return Err(SplitError::CursorOutOfBounds {
                cursor: target,
                len: self.buffer.len(),
            });
        }
        self.cursor = target as usize;
        Ok(())
    }

    /// Bytes not yet reached by the cursor.
    pub fn unprocessed(&self) -> usize {
        self.buffer.len() - self.cursor
    }

    /// Bytes from the anchor to the end, scanned or not.
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.anchor
    }

    /// Returns true once the cursor has reached the end of the buffer.
    pub fn is_processed(&self) -> bool {
        self.cursor >= self.buffer.len()
    }

    /// Length of the scanned-but-unemitted span `[anchor, cursor)`.
    pub fn chunk_len(&self) -> Result<usize, SplitError> {
        if self.cursor < self.anchor {
            return Err(SplitError::InvalidCursorPosition {
                cursor: self.cursor,
                anchor: self.anchor,
            });
        }
        Ok(self.cursor - self.anchor)
    }

    /// Returns `[anchor, cursor)` without touching either offset.
    pub fn chunk(&self) -> Result<Bytes, SplitError> {
        let len = self.chunk_len()?;
        Ok(self.buffer.slice(self.anchor..self.anchor + len))
    }

    /// Returns `[anchor, len)`: everything not yet emitted.
    pub fn tail(&self) -> Bytes {
        self.buffer.slice(self.anchor..)
    }

    /// Marks everything before the cursor as emitted.
    pub fn reset_anchor(&mut self) {
        self.anchor = self.cursor;
    }

    /// Returns the byte under the cursor.
    pub fn value_at_cursor(&self) -> Result<u8, SplitError> {
        self.buffer
            .get(self.cursor)
            .copied()
            .ok_or(SplitError::CursorOutOfBounds {
                cursor: self.cursor as isize,
                len: self.buffer.len(),
            })
    }

    /// Copies `n` bytes starting at the anchor onto the end of `out`.
    ///
    /// `out` is the merge buffer being filled; its length acts as the
    /// receiving cursor. This window is not modified.
    pub fn append_to(&self, out: &mut BytesMut, n: usize) -> Result<(), SplitError> {
        let end = self.anchor + n;
        if end > self.buffer.len() {
            return Err(SplitError::CursorOutOfBounds {
                cursor: end as isize,
                len: self.buffer.len(),
            });
        }
        out.put_slice(&self.buffer[self.anchor..end]);
        Ok(())
    }

    /// Copies the current `[anchor, cursor)` span onto the end of `out`.
    pub fn append_chunk_to(&self, out: &mut BytesMut) -> Result<(), SplitError> {
        let n = self.chunk_len()?;
        self.append_to(out, n)
    }

    /// Places the unflushed tail of `other` in front of this window's bytes.
    ///
    /// The cursor shifts forward by the inserted length so it keeps pointing
    /// at the same byte.
    ///
    /// # Errors
    ///
    /// [`SplitError::CannotPrepend`] if this window has already emitted bytes
    /// (anchor > 0): inserting in front of them would reorder the stream.
    pub fn prepend(&mut self, other: &ScanWindow) -> Result<(), SplitError> {
        if self.anchor > 0 {
            return Err(SplitError::CannotPrepend {
                anchor: self.anchor,
            });
        }
        let head = other.tail();
        if head.is_empty() {
            return Ok(());
        }

        let mut merged = BytesMut::with_capacity(head.len() + self.buffer.len());
        merged.put_slice(&head);
        merged.put_slice(&self.buffer);
        self.buffer = merged.freeze();
        self.cursor += head.len();
        Ok(())
    }

    /// Releases the storage. The window cannot be used afterwards.
    pub fn destroy(self) {}
}

impl From<Bytes> for ScanWindow {
    fn from(data: Bytes) -> Self {
        Self::new(data)
    }
}

impl From<Vec<u8>> for ScanWindow {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl fmt::Debug for ScanWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanWindow")
            .field("len", &self.buffer.len())
            .field("anchor", &self.anchor)
            .field("cursor", &self.cursor)
            .finish()
    }
}
