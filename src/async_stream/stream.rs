//! Async stream adapter for splitting.
//!
//! This module provides asynchronous splitting using the `futures-io::AsyncRead`
//! trait, making it runtime-agnostic and compatible with tokio, async-std,
//! smol, and other async runtimes.
//!
//! # Example
//!
//! ```ignore
//! use futures_util::StreamExt;
//! use recsplit::{split_async, PieceAssembler, RecordSplitter};
//! use futures_io::AsyncRead;
//!
//! async fn demo<R: AsyncRead + Unpin>(reader: R) -> Result<(), recsplit::SplitError> {
//!     let splitter = RecordSplitter::new(PieceAssembler::default())?;
//!     let mut stream = split_async(reader, splitter, 64 * 1024)?;
//!
//!     while let Some(record) = stream.next().await {
//!         let record = record?;
//!         println!("Record: {} bytes", record.len());
//!     }
//!     Ok(())
//! }
//! ```

use std::collections::VecDeque;
use std::io::ErrorKind;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::BytesMut;
use futures_core::Stream;
use futures_io::AsyncRead;
use pin_project_lite::pin_project;

use crate::assembler::RecordAssembler;
use crate::error::SplitError;
use crate::splitter::RecordSplitter;

pin_project! {
    /// A stream that yields records from an async reader.
    ///
    /// This uses `futures_io::AsyncRead` which is runtime-agnostic.
    /// Works with tokio, async-std, smol, or any futures-compatible runtime.
    ///
    /// Chunks of `read_size` bytes are gathered before each call to
    /// [`RecordSplitter::process`], the same way [`SplitIter`](crate::SplitIter)
    /// does it, and the splitter is finalized at EOF.
    pub struct RecordStream<R, A>
    where
        A: RecordAssembler,
    {
        #[pin]
        reader: R,
        splitter: RecordSplitter<A>,
        read_size: usize,
        buffer: BytesMut,
        ready: VecDeque<A::Output>,
        finished: bool,
    }
}

impl<R, A: RecordAssembler> RecordStream<R, A> {
    /// Creates a new record stream from an async reader.
    ///
    /// # Arguments
    ///
    /// * `reader` - An async reader implementing `AsyncRead`
    /// * `splitter` - The splitter receiving the chunks
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
            buffer: BytesMut::with_capacity(read_size),
            ready: VecDeque::new(),
            finished: false,
        })
    }
}

impl<R: AsyncRead, A: RecordAssembler> Stream for RecordStream<R, A> {
    type Item = Result<A::Output, SplitError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            if let Some(record) = this.ready.pop_front() {
                return Poll::Ready(Some(Ok(record)));
            }
            if *this.finished {
                return Poll::Ready(None);
            }

            // Fill the chunk buffer up to read_size
            let filled = this.buffer.len();
            this.buffer.resize(*this.read_size, 0);
            let eof = match this.reader.as_mut().poll_read(cx, &mut this.buffer[filled..]) {
                Poll::Pending => {
                    this.buffer.truncate(filled);
                    return Poll::Pending;
                }
                Poll::Ready(Err(e)) if e.kind() == ErrorKind::Interrupted => {
                    this.buffer.truncate(filled);
                    continue;
                }
                Poll::Ready(Err(e)) => {
                    this.buffer.truncate(filled);
                    *this.finished = true;
                    return Poll::Ready(Some(Err(SplitError::Io(e))));
                }
                Poll::Ready(Ok(n)) => {
                    this.buffer.truncate(filled + n);
                    n == 0
                }
            };

            if !eof && this.buffer.len() < *this.read_size {
                continue;
            }

            let result = if this.buffer.is_empty() {
                *this.finished = true;
                this.splitter
                    .finalize()
                    .map(|flushed| this.ready.extend(flushed))
            } else {
                let chunk = this.buffer.split().freeze();
                this.splitter
                    .process(chunk)
                    .map(|records| this.ready.extend(records))
            };

            if let Err(e) = result {
                *this.finished = true;
                return Poll::Ready(Some(Err(e)));
            }
        }
    }
}

/// Creates a record stream from an async reader.
///
/// Uses `futures_io::AsyncRead` for runtime-agnostic async I/O.
/// This works with any async runtime (tokio, async-std, smol, etc.).
///
/// # Runtime Compatibility
///
/// For tokio users, you can use `tokio_util::compat` to convert
/// `tokio::io::AsyncRead` to `futures_io::AsyncRead`:
///
/// ```ignore
/// use tokio_util::compat::TokioAsyncReadCompatExt;
/// use recsplit::{split_async, PieceAssembler, RecordSplitter};
///
/// let tokio_reader = tokio::fs::File::open("file").await?;
/// let splitter = RecordSplitter::new(PieceAssembler::default())?;
/// let stream = split_async(tokio_reader.compat(), splitter, 64 * 1024)?;
/// ```
///
/// # Errors
///
/// [`SplitError::InvalidConfig`] if `read_size` is shorter than the
/// delimiter.
pub fn split_async<R: AsyncRead, A: RecordAssembler>(
    reader: R,
    splitter: RecordSplitter<A>,
    read_size: usize,
) -> Result<RecordStream<R, A>, SplitError> {
    RecordStream::new(reader, splitter, read_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::PieceAssembler;
    use crate::config::SplitConfig;
    use crate::record::Record;

    fn splitter() -> RecordSplitter<PieceAssembler> {
        let config = SplitConfig::new(&b"\r\n"[..]).unwrap();
        RecordSplitter::new(PieceAssembler::new(config)).unwrap()
    }

    #[tokio::test]
    async fn test_record_stream_empty() {
        let reader: &[u8] = &[];
        let stream = RecordStream::new(reader, splitter(), 16).unwrap();
        let records: Vec<_> = futures_util::StreamExt::collect(stream).await;
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_record_stream_small_chunks() {
        let data = b"one\r\ntwo\r\nthree";
        let reader: &[u8] = data;
        let stream = RecordStream::new(reader, splitter(), 3).unwrap();

        let records: Vec<_> = futures_util::StreamExt::collect(stream).await;
        let records: Vec<Record> = records.into_iter().collect::<Result<_, _>>().unwrap();

        let lines: Vec<_> = records.iter().map(|r| &r.data[..]).collect();
        assert_eq!(lines, vec![&b"one"[..], b"two", b"three"]);
        assert_eq!(records[2].offset, 10);
    }

    #[tokio::test]
    async fn test_record_stream_short_reads() {
        use tokio_util::compat::TokioAsyncReadCompatExt;

        let reader = tokio_test::io::Builder::new()
            .read(b"al")
            .read(b"pha\r")
            .read(b"\nbeta")
            .build()
            .compat();
        let stream = split_async(reader, splitter(), 4).unwrap();

        let records: Vec<_> = futures_util::StreamExt::collect(stream).await;
        let records: Vec<Record> = records.into_iter().collect::<Result<_, _>>().unwrap();
        let lines: Vec<_> = records.iter().map(|r| &r.data[..]).collect();
        assert_eq!(lines, vec![&b"alpha"[..], b"beta"]);
    }

    #[tokio::test]
    async fn test_record_stream_io_error() {
        use futures_util::StreamExt;
        use tokio_util::compat::TokioAsyncReadCompatExt;

        let reader = tokio_test::io::Builder::new()
            .read(b"x\r\n")
            .read_error(std::io::Error::other("connection reset"))
            .build()
            .compat();
        let mut stream = split_async(reader, splitter(), 8).unwrap();

        assert!(matches!(stream.next().await, Some(Err(SplitError::Io(_)))));
        assert!(stream.next().await.is_none());
    }

    #[test]
    fn test_record_stream_read_size_too_small() {
        let reader: &[u8] = &[];
        assert!(split_async(reader, splitter(), 1).is_err());
    }
}
