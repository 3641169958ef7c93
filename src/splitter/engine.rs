//! Core splitting engine - RecordSplitter with streaming API.
//!
//! This module implements the cross-chunk delimiter scanner. It provides a
//! pure streaming interface:
//!
//! - [`RecordSplitter`] - Stateful splitter that processes streaming bytes
//! - `process()` - Feed chunks of any size, get finished records back
//! - `finalize()` - Flush the pending record and the unterminated tail
//!
//! # Example
//!
//! ```
//! use recsplit::{PieceAssembler, RecordSplitter};
//!
//! let mut splitter = RecordSplitter::new(PieceAssembler::default())?;
//!
//! // The delimiter of the first record only completes in the second chunk
//! let mut records = splitter.process(&b"first\nsec"[..])?;
//! records.extend(splitter.process(&b"ond\nthird"[..])?);
//! records.extend(splitter.finalize()?);
//!
//! let lines: Vec<_> = records.iter().map(|r| &r.data[..]).collect();
//! assert_eq!(lines, vec![&b"first"[..], b"second", b"third"]);
//! # Ok::<(), recsplit::SplitError>(())
//! ```

use std::fmt;
use std::io::Read;

use bytes::{Bytes, BytesMut};
use tracing::{debug, trace, warn};

use super::{Finalized, SplitIter};
use crate::assembler::RecordAssembler;
use crate::error::SplitError;
use crate::window::ScanWindow;

/// The record currently being accumulated, if any.
enum Pending<B> {
    Empty,
    InProgress(B),
}

impl<B> Pending<B> {
    fn take(&mut self) -> Option<B> {
        match std::mem::replace(self, Pending::Empty) {
            Pending::Empty => None,
            Pending::InProgress(builder) => Some(builder),
        }
    }

    fn is_in_progress(&self) -> bool {
        matches!(self, Pending::InProgress(_))
    }
}

/// Splits a stream of byte chunks into records separated by a delimiter.
///
/// Each call to [`process`](Self::process) wraps the chunk in a new
/// [`ScanWindow`]. The window from the previous call is kept around for one
/// more call, because its trailing bytes may be the start of a delimiter
/// that only completes in the new chunk. Pieces that span both windows are
/// copied into a fresh buffer; pieces inside one window are zero-copy slices
/// of the chunk that was passed in.
///
/// Pieces are handed to a [`RecordAssembler`], which decides where records
/// begin and what a finished record looks like. A record is only emitted
/// once the piece starting the *next* record has been seen, or at
/// [`finalize`](Self::finalize).
///
/// # Chunk sizes
///
/// A leftover window must be fully scanned by the end of the following
/// call. Chunks shorter than the delimiter can break that: if a leftover
/// survives two calls, `process` fails with
/// [`SplitError::PreviousStillPending`]. Feeding chunks at least as long as
/// the delimiter (the final chunk excepted) always avoids it.
///
/// # Complexity
///
/// Matching is a plain restart-on-mismatch scan with no skip table. A failed
/// attempt resumes at the byte after the one it started on, so the worst
/// case is O(bytes × delimiter length). For the short delimiters this is
/// meant for (line endings, record separators) that is a non-issue.
///
/// # Example
///
/// ```
/// use recsplit::{PieceAssembler, RecordSplitter, SplitConfig};
///
/// let config = SplitConfig::new(&b"|"[..])?;
/// let mut splitter = RecordSplitter::new(PieceAssembler::new(config))?;
///
/// let records = splitter.process(&b"AAA|BBB|CC"[..])?;
/// assert_eq!(records.len(), 1); // "BBB" is pending until the next record starts
///
/// let rest: Vec<_> = splitter.finalize()?.into_iter().collect();
/// assert_eq!(&rest[0].data[..], b"BBB");
/// assert_eq!(&rest[1].data[..], b"CC");
/// # Ok::<(), recsplit::SplitError>(())
/// ```
pub struct RecordSplitter<A: RecordAssembler> {
    assembler: A,
    delimiter: Bytes,
    current: Option<ScanWindow>,
    previous: Option<ScanWindow>,
    pending: Pending<A::Builder>,
    destroyed: bool,
}

impl<A: RecordAssembler> RecordSplitter<A> {
    /// Creates a splitter driving the given assembler.
    ///
    /// The assembler's delimiter is captured here and used for the whole
    /// lifetime of the splitter.
    ///
    /// # Errors
    ///
    /// [`SplitError::InvalidConfig`] if the delimiter is empty.
    pub fn new(assembler: A) -> Result<Self, SplitError> {
        let delimiter = Bytes::copy_from_slice(assembler.record_delimiter());
        if delimiter.is_empty() {
            return Err(SplitError::InvalidConfig {
                message: "delimiter must be non-empty",
            });
        }

        Ok(Self {
            assembler,
            delimiter,
            current: None,
            previous: None,
            pending: Pending::Empty,
            destroyed: false,
        })
    }

    /// Feeds one chunk and returns the records it completed.
    ///
    /// # Processing Flow
    ///
    /// 1. Drop the window from two calls ago. Bytes of it that were scanned
    ///    but never emitted are moved in front of the last call's window.
    /// 2. The last call's window becomes `previous`, the chunk `current`.
    /// 3. Scan for delimiters across `previous` then `current`, handing
    ///    every delimited piece to the assembler.
    /// 4. Stop once fewer unscanned bytes than the delimiter remain; they
    ///    wait for the next chunk.
    ///
    /// # Errors
    ///
    /// - [`SplitError::PreviousStillPending`] if the window from the last
    ///   call was never fully scanned (see [chunk sizes](Self#chunk-sizes)).
    /// - [`SplitError::MissingPendingBuilder`] if a continuation piece
    ///   arrives before any record was started.
    /// - [`SplitError::Destroyed`] after [`destroy`](Self::destroy).
    pub fn process(&mut self, chunk: impl Into<Bytes>) -> Result<Vec<A::Output>, SplitError> {
        self.ensure_live()?;
        let mut records = Vec::new();

        if let Some(previous) = &self.previous {
            let unprocessed = previous.unprocessed();
            if unprocessed < 1 {
                self.purge_previous()?;
            } else {
                warn!(unprocessed, "leftover window survived two calls");
                return Err(SplitError::PreviousStillPending { unprocessed });
            }
        }

        self.previous = self.current.take();
        self.current = Some(ScanWindow::new(chunk));

        while self.current_mut()?.unprocessed() > 0 {
            match self.at_delimiter()? {
                None => return Ok(records),
                Some(true) => {
                    let piece = self.take_piece()?;
                    self.assemble(piece, &mut records)?;
                }
                Some(false) => {}
            }
        }

        Ok(records)
    }

    /// Flushes end-of-stream state.
    ///
    /// The pending record is finished first. Then whatever follows the last
    /// delimiter (spanning both windows if needed) becomes a record of its
    /// own. Either may be absent.
    ///
    /// Afterwards the splitter is empty and can be fed a new stream.
    pub fn finalize(&mut self) -> Result<Finalized<A::Output>, SplitError> {
        self.ensure_live()?;

        let pending = self
            .pending
            .take()
            .and_then(|builder| self.assembler.finish(builder));

        let tail = self.take_tail();
        let tail = if tail.is_empty() {
            None
        } else {
            let builder = self.assembler.create_builder(tail);
            self.assembler.finish(builder)
        };

        let flushed = Finalized::from_parts(pending, tail);
        debug!(records = flushed.len(), "stream finalized");
        Ok(flushed)
    }

    /// Drops all buffered bytes and the pending record without emitting
    /// anything, so the splitter can start a new stream.
    pub fn reset(&mut self) {
        self.previous = None;
        self.current = None;
        self.pending = Pending::Empty;
        debug!("splitter reset");
    }

    /// Releases all retained storage.
    ///
    /// Every later call that reads or feeds the splitter fails with
    /// [`SplitError::Destroyed`]. Destroying twice is harmless.
    pub fn destroy(&mut self) {
        if let Some(previous) = self.previous.take() {
            previous.destroy();
        }
        if let Some(current) = self.current.take() {
            current.destroy();
        }
        self.pending = Pending::Empty;
        self.destroyed = true;
    }

    /// Returns an iterator over the records read from `reader`.
    ///
    /// The reader is consumed in chunks of `read_size` bytes and the stream
    /// is finalized at EOF.
    ///
    /// # Errors
    ///
    /// [`SplitError::InvalidConfig`] if `read_size` is shorter than the
    /// delimiter.
    pub fn split<R: Read>(self, reader: R, read_size: usize) -> Result<SplitIter<R, A>, SplitError> {
        SplitIter::new(reader, self, read_size)
    }

    /// Returns the delimiter.
    pub fn delimiter(&self) -> &[u8] {
        &self.delimiter
    }

    /// Returns the assembler.
    pub fn assembler(&self) -> &A {
        &self.assembler
    }

    /// Returns true if a record is being accumulated.
    pub fn has_pending(&self) -> Result<bool, SplitError> {
        self.ensure_live()?;
        Ok(self.pending.is_in_progress())
    }

    /// Number of bytes held back waiting for more input.
    ///
    /// These bytes follow the last emitted piece. They will be part of the
    /// next piece, or of the tail flushed by `finalize()`.
    pub fn buffered_len(&self) -> Result<usize, SplitError> {
        self.ensure_live()?;
        let previous = self.previous.as_ref().map_or(0, ScanWindow::remaining);
        let current = self.current.as_ref().map_or(0, ScanWindow::remaining);
        Ok(previous + current)
    }

    fn ensure_live(&self) -> Result<(), SplitError> {
        if self.destroyed {
            return Err(SplitError::Destroyed);
        }
        Ok(())
    }

    fn current_mut(&mut self) -> Result<&mut ScanWindow, SplitError> {
        self.current.as_mut().ok_or(SplitError::Destroyed)
    }

    /// The window the scanner reads from: `previous` while it has unscanned
    /// bytes, `current` afterwards.
    fn active_window(&mut self) -> Result<&mut ScanWindow, SplitError> {
        let in_previous = self
            .previous
            .as_ref()
            .is_some_and(|previous| previous.unprocessed() > 0);
        if in_previous {
            self.previous.as_mut().ok_or(SplitError::CannotPurgePrevious)
        } else {
            self.current_mut()
        }
    }

    fn purge_previous(&mut self) -> Result<(), SplitError> {
        let remaining = match &self.previous {
            Some(previous) => previous.remaining(),
            None => return Err(SplitError::CannotPurgePrevious),
        };
        if remaining > 0 && self.current.is_none() {
            return Err(SplitError::CannotMergeLeftover { remaining });
        }

        let previous = self.previous.take().ok_or(SplitError::CannotPurgePrevious)?;
        if remaining > 0 {
            self.current_mut()?.prepend(&previous)?;
            debug!(remaining, "carried leftover bytes into the next window");
        }
        previous.destroy();
        Ok(())
    }

    /// Tries to match the delimiter at the scan point.
    ///
    /// - `None`: fewer unscanned bytes than the delimiter are left across
    ///   both windows, so the answer depends on the next chunk.
    /// - `Some(true)`: the delimiter ends right before the cursor.
    /// - `Some(false)`: no match here, the scan point moved on.
    fn at_delimiter(&mut self) -> Result<Option<bool>, SplitError> {
        let delimiter_len = self.delimiter.len();
        let unprocessed = self.previous.as_ref().map_or(0, ScanWindow::unprocessed)
            + self.current_mut()?.unprocessed();

        if delimiter_len > unprocessed {
            if unprocessed > 0 {
                return Ok(None);
            }
            // `process` never scans an exhausted window.
            debug_assert!(unprocessed > 0, "scanner entered with nothing to scan");
            return Ok(Some(true));
        }

        for i in 0..delimiter_len {
            let expected = self.delimiter[i];
            let window = self.active_window()?;
            if window.value_at_cursor()? != expected {
                if i == 0 {
                    window.tick(1)?;
                } else {
                    self.rewind(i - 1)?;
                }
                return Ok(Some(false));
            }
            window.tick(1)?;
        }

        Ok(Some(true))
    }

    /// Moves the scan point back by `n` bytes of the combined stream.
    ///
    /// A partial match may have started in `previous` and run into
    /// `current`; the bytes taken from `current` are given back first.
    fn rewind(&mut self, n: usize) -> Result<(), SplitError> {
        let current = self.current_mut()?;
        let from_current = n.min(current.cursor().saturating_sub(current.anchor()));
        current.tick(-(from_current as isize))?;

        let from_previous = n - from_current;
        if from_previous > 0 {
            match self.previous.as_mut() {
                Some(previous) => previous.tick(-(from_previous as isize))?,
                None => {
                    return Err(SplitError::CursorOutOfBounds {
                        cursor: -(from_previous as isize),
                        len: 0,
                    });
                }
            }
        }
        Ok(())
    }

    /// Cuts the piece ending at the cursor.
    ///
    /// If the previous window still holds unemitted bytes the piece starts
    /// there, and both parts are merged into one buffer.
    fn take_piece(&mut self) -> Result<Bytes, SplitError> {
        let leftover = self.previous.as_ref().map_or(0, ScanWindow::remaining);
        let current = self.current.as_mut().ok_or(SplitError::Destroyed)?;

        let piece = match self.previous.take() {
            Some(previous) if leftover > 0 => {
                let mut merged = BytesMut::with_capacity(leftover + current.chunk_len()?);
                previous.append_to(&mut merged, leftover)?;
                current.append_chunk_to(&mut merged)?;
                previous.destroy();
                merged.freeze()
            }
            previous => {
                self.previous = previous;
                current.chunk()?
            }
        };
        current.reset_anchor();

        trace!(len = piece.len(), "piece delimited");
        Ok(piece)
    }

    fn assemble(&mut self, piece: Bytes, records: &mut Vec<A::Output>) -> Result<(), SplitError> {
        if self.assembler.is_new_record(&piece) {
            if let Some(builder) = self.pending.take() {
                if let Some(record) = self.assembler.finish(builder) {
                    records.push(record);
                }
            }
            self.pending = Pending::InProgress(self.assembler.create_builder(piece));
        } else {
            match &mut self.pending {
                Pending::InProgress(builder) => self.assembler.augment_builder(builder, piece),
                Pending::Empty => return Err(SplitError::MissingPendingBuilder),
            }
        }
        Ok(())
    }

    /// Takes the bytes after the last delimiter out of both windows.
    fn take_tail(&mut self) -> Bytes {
        let previous = self.previous.take();
        let current = self.current.take();

        match (&previous, &current) {
            (Some(previous), Some(current)) => {
                crate::util::combine_bytes(&previous.tail(), &current.tail())
            }
            (Some(only), None) | (None, Some(only)) => only.tail(),
            (None, None) => Bytes::new(),
        }
    }
}

impl<A: RecordAssembler + fmt::Debug> fmt::Debug for RecordSplitter<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordSplitter")
            .field("assembler", &self.assembler)
            .field("delimiter", &self.delimiter)
            .field("current", &self.current)
            .field("previous", &self.previous)
            .field("pending", &self.pending.is_in_progress())
            .field("destroyed", &self.destroyed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::{GroupingAssembler, PieceAssembler};
    use crate::config::SplitConfig;
    use crate::record::Record;

    fn splitter(delimiter: &'static [u8]) -> RecordSplitter<PieceAssembler> {
        let config = SplitConfig::new(delimiter).unwrap();
        RecordSplitter::new(PieceAssembler::new(config)).unwrap()
    }

    fn data(records: &[Record]) -> Vec<&[u8]> {
        records.iter().map(|r| &r.data[..]).collect()
    }

    #[test]
    fn test_crlf_split_across_chunks() {
        let mut splitter = splitter(b"\r\n");

        assert!(splitter.process(&b"rec1\r"[..]).unwrap().is_empty());
        assert_eq!(splitter.buffered_len().unwrap(), 5);

        let records = splitter.process(&b"\nrec2\r\n"[..]).unwrap();
        assert_eq!(data(&records), vec![&b"rec1"[..]]);

        let last = splitter.finalize().unwrap();
        assert!(matches!(&last, Finalized::Single(r) if &r.data[..] == b"rec2"));
    }

    #[test]
    fn test_leftover_is_prepended_to_next_generation() {
        let mut splitter = splitter(b"\n");

        // No delimiter at all in the first two chunks
        assert!(splitter.process(&b"abc"[..]).unwrap().is_empty());
        assert!(splitter.process(&b"def"[..]).unwrap().is_empty());
        // "abc" is fully scanned but unemitted; it moves in front of "def"
        let records = splitter.process(&b"g\nh"[..]).unwrap();
        assert!(records.is_empty());
        assert!(splitter.has_pending().unwrap());

        let rest = splitter.finalize().unwrap().into_vec();
        assert_eq!(data(&rest), vec![&b"abcdefg"[..], b"h"]);
    }

    #[test]
    fn test_restart_inside_previous_window() {
        // "aab" with a delimiter of "ab": the first attempt fails on the
        // second 'a' and must restart right there, not after it.
        let mut splitter = splitter(b"ab");
        assert!(splitter.process(&b"xa"[..]).unwrap().is_empty());
        assert!(splitter.process(&b"ab-"[..]).unwrap().is_empty());

        let rest = splitter.finalize().unwrap().into_vec();
        assert_eq!(data(&rest), vec![&b"xa"[..], b"-"]);
    }

    #[test]
    fn test_restart_rewinds_across_window_boundary() {
        // Attempt starts at "aa" in the first chunk, matches 'a','a' there,
        // then fails on 'x' in the second chunk. The restart point is the
        // second 'a', which lives in the previous window.
        let mut splitter = splitter(b"aab");
        assert!(splitter.process(&b"zaa"[..]).unwrap().is_empty());
        splitter.process(&b"abq"[..]).unwrap();

        let rest = splitter.finalize().unwrap().into_vec();
        // z a [a a b] q  ->  "zaaab" is the first piece
        assert_eq!(data(&rest), vec![&b"za"[..], b"q"]);
    }

    #[test]
    fn test_previous_still_pending_from_short_chunks() {
        let mut splitter = splitter(b"abc");
        assert!(splitter.process(&b"xx"[..]).unwrap().is_empty());
        assert!(splitter.process(&b"y"[..]).unwrap().is_empty());

        assert!(matches!(
            splitter.process(&b"zzzz"[..]),
            Err(SplitError::PreviousStillPending { unprocessed: 1 })
        ));
    }

    #[test]
    fn test_previous_still_pending_engineered_window() {
        let mut splitter = splitter(b"\n");
        splitter.current = Some(ScanWindow::new(&b"never scanned"[..]));

        // An empty chunk rotates the window into `previous` without scanning
        splitter.process(&b""[..]).unwrap();

        assert!(matches!(
            splitter.process(&b"x\n"[..]),
            Err(SplitError::PreviousStillPending { unprocessed: 13 })
        ));
    }

    #[test]
    fn test_missing_pending_builder() {
        let assembler =
            GroupingAssembler::new(SplitConfig::default(), |piece: &[u8]| piece.starts_with(b"#"));
        let mut splitter = RecordSplitter::new(assembler).unwrap();

        assert!(matches!(
            splitter.process(&b"orphan\n"[..]),
            Err(SplitError::MissingPendingBuilder)
        ));
    }

    #[test]
    fn test_purge_without_previous() {
        let mut splitter = splitter(b"\n");
        assert!(matches!(
            splitter.purge_previous(),
            Err(SplitError::CannotPurgePrevious)
        ));
    }

    #[test]
    fn test_merge_leftover_without_current() {
        let mut splitter = splitter(b"\n");
        splitter.previous = Some(ScanWindow::new(&b"left"[..]));
        assert!(matches!(
            splitter.purge_previous(),
            Err(SplitError::CannotMergeLeftover { remaining: 4 })
        ));
    }

    #[test]
    fn test_destroy_then_use() {
        let mut splitter = splitter(b"\n");
        splitter.process(&b"partial"[..]).unwrap();
        splitter.destroy();
        splitter.destroy();

        assert!(matches!(splitter.process(&b"x"[..]), Err(SplitError::Destroyed)));
        assert!(matches!(splitter.finalize(), Err(SplitError::Destroyed)));
        assert!(matches!(splitter.buffered_len(), Err(SplitError::Destroyed)));
        assert!(matches!(splitter.has_pending(), Err(SplitError::Destroyed)));
    }

    #[test]
    fn test_reset_discards_state() {
        let mut splitter = splitter(b"\n");
        splitter.process(&b"one\ntwo"[..]).unwrap();
        splitter.reset();

        assert_eq!(splitter.buffered_len().unwrap(), 0);
        assert!(!splitter.has_pending().unwrap());
        assert!(splitter.finalize().unwrap().is_empty());
    }

    #[test]
    fn test_finalize_twice() {
        let mut splitter = splitter(b"\n");
        splitter.process(&b"a\nb"[..]).unwrap();
        assert_eq!(splitter.finalize().unwrap().len(), 2);
        assert!(splitter.finalize().unwrap().is_empty());
    }

    #[test]
    fn test_empty_delimiter_rejected() {
        struct Broken;
        impl RecordAssembler for Broken {
            type Builder = ();
            type Output = ();
            fn record_delimiter(&self) -> &[u8] {
                b""
            }
            fn is_new_record(&self, _piece: &[u8]) -> bool {
                true
            }
            fn create_builder(&mut self, _piece: Bytes) -> Self::Builder {}
            fn augment_builder(&mut self, _builder: &mut (), _piece: Bytes) {}
            fn finish(&mut self, _builder: ()) -> Option<()> {
                None
            }
        }

        assert!(matches!(
            RecordSplitter::new(Broken),
            Err(SplitError::InvalidConfig { .. })
        ));
    }
}
