//! Reader adapter - SplitIter over any [`std::io::Read`] source.

use std::collections::VecDeque;
use std::io::{ErrorKind, Read};

use bytes::{Bytes, BytesMut};

use super::RecordSplitter;
use crate::assembler::RecordAssembler;
use crate::error::SplitError;

/// An iterator that yields records from a reader.
///
/// `SplitIter` reads `read_size` bytes at a time, retrying short reads until
/// the chunk is full or the reader hits EOF, so every chunk but the last is
/// long enough to resolve the previous one. At EOF the splitter is
/// finalized and the flushed records are yielded too.
///
/// The first error ends the iteration.
///
/// # Example
///
/// ```
/// use recsplit::{PieceAssembler, RecordSplitter};
/// use std::io::Cursor;
///
/// let splitter = RecordSplitter::new(PieceAssembler::default())?;
/// let records = splitter
///     .split(Cursor::new(&b"one\ntwo\nthree"[..]), 4)?
///     .collect::<Result<Vec<_>, _>>()?;
///
/// assert_eq!(records.len(), 3);
/// assert_eq!(&records[2].data[..], b"three");
/// # Ok::<(), recsplit::SplitError>(())
/// ```
pub struct SplitIter<R, A: RecordAssembler> {
    reader: R,
    splitter: RecordSplitter<A>,
    read_size: usize,
    ready: VecDeque<A::Output>,
    finished: bool,
}

impl<R: Read, A: RecordAssembler> SplitIter<R, A> {
    /// Creates a new record iterator.
    ///
    /// # Arguments
    ///
    /// * `reader` - The source of data to split
    /// * `splitter` - A splitter, usually fresh, that receives the chunks
    /// * `read_size` - Bytes per chunk; at least the delimiter length
    pub fn new(reader: R, splitter: RecordSplitter<A>, read_size: usize) -> Result<Self, SplitError> {
        if read_size < splitter.delimiter().len() {
            return Err(SplitError::InvalidConfig {
                message: "read_size cannot be smaller than the delimiter",
            });
        }

        Ok(Self {
            reader,
            splitter,
            read_size,
            ready: VecDeque::new(),
            finished: false,
        })
    }

    /// Returns the splitter, e.g. to inspect buffered state.
    pub fn splitter(&self) -> &RecordSplitter<A> {
        &self.splitter
    }

    /// Reads until `read_size` bytes are gathered or the reader is drained.
    /// An empty result means EOF.
    fn fill(&mut self) -> std::io::Result<Bytes> {
        let mut buf = BytesMut::zeroed(self.read_size);
        let mut filled = 0;

        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        buf.truncate(filled);
        Ok(buf.freeze())
    }
}

impl<R: Read, A: RecordAssembler> Iterator for SplitIter<R, A> {
    type Item = Result<A::Output, SplitError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(record) = self.ready.pop_front() {
                return Some(Ok(record));
            }
            if self.finished {
                return None;
            }

            let chunk = match self.fill() {
                Ok(chunk) => chunk,
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e.into()));
                }
            };

            let result = if chunk.is_empty() {
                // End of stream - flush pending record and tail
                self.finished = true;
                self.splitter.finalize().map(|flushed| self.ready.extend(flushed))
            } else {
                self.splitter
                    .process(chunk)
                    .map(|records| self.ready.extend(records))
            };

            if let Err(e) = result {
                self.finished = true;
                return Some(Err(e));
            }
        }
    }
}
