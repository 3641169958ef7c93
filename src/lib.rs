//! recsplit
//!
//! Incremental delimiter-based record splitting for Rust.
//!
//! `recsplit` turns a stream of byte chunks into records separated by a
//! fixed delimiter. Chunks may have any size, and a delimiter may straddle
//! two of them: the splitter keeps exactly the unresolved tail between
//! calls, so no byte is dropped, duplicated or reordered. It is meant as a
//! small framing primitive for:
//!
//! - line- or CRLF-framed network protocols
//! - log and journal files
//! - record-separated exports
//! - multi-line entries grouped by a custom predicate
//!
//! The crate intentionally:
//! - does NOT open files or sockets
//! - does NOT manage concurrency
//! - does NOT interpret record contents
//!
//! It only does one thing: **Bytes in → records out**
//!
//! # Sync
//!
//! ```no_run
//! use std::fs::File;
//! use recsplit::{split_reader, SplitConfig, SplitError};
//!
//! fn main() -> Result<(), SplitError> {
//!     let file = File::open("access.log")?;
//!
//!     for record in split_reader(file, SplitConfig::default())? {
//!         let record = record?;
//!         println!("record {} bytes @ {}", record.len(), record.offset);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Push-based
//!
//! ```
//! use recsplit::{PieceAssembler, RecordSplitter, SplitConfig};
//!
//! let config = SplitConfig::new(&b"\r\n"[..])?;
//! let mut splitter = RecordSplitter::new(PieceAssembler::new(config))?;
//!
//! let mut records = Vec::new();
//! for chunk in [&b"GET / HTTP/1.1\r"[..], b"\nHost: a\r\n", b"\r\n"] {
//!     records.extend(splitter.process(chunk)?);
//! }
//! records.extend(splitter.finalize()?);
//!
//! assert_eq!(records.len(), 3);
//! assert_eq!(&records[1].data[..], b"Host: a");
//! assert!(records[2].is_empty());
//! # Ok::<(), recsplit::SplitError>(())
//! ```
//!
//! # Async (feature = "async-io")
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
//!         println!("record {}", record.data.len());
//!     }
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod assembler;
mod config;
mod error;
mod record;
mod splitter;
mod window;

mod util; // internal helpers

#[cfg(feature = "async-io")]
mod async_stream;

//
// Public surface (intentionally tiny)
//

pub use assembler::{GroupingAssembler, PieceAssembler, RecordAssembler, RecordBuilder};
pub use config::SplitConfig;
pub use error::{Result, SplitError};
pub use record::Record;
pub use splitter::{Finalized, RecordSplitter, SplitIter};
pub use window::ScanWindow;

#[cfg(feature = "async-io")]
pub use async_stream::{RecordStream, split_async};

use std::io::Read;

use bytes::Bytes;

/// Splits an in-memory buffer into records.
///
/// Equivalent to one `process()` call followed by `finalize()` on a
/// splitter using [`PieceAssembler`].
///
/// # Example
///
/// ```
/// use recsplit::{split_bytes, SplitConfig};
///
/// let records = split_bytes(&b"a,b,,c"[..], SplitConfig::new(&b","[..])?)?;
/// let fields: Vec<_> = records.iter().map(|r| &r.data[..]).collect();
/// assert_eq!(fields, vec![&b"a"[..], b"b", b"", b"c"]);
/// # Ok::<(), recsplit::SplitError>(())
/// ```
pub fn split_bytes(data: impl Into<Bytes>, config: SplitConfig) -> Result<Vec<Record>> {
    config.validate()?;
    let mut splitter = RecordSplitter::new(PieceAssembler::new(config))?;
    let mut records = splitter.process(data)?;
    records.extend(splitter.finalize()?);
    Ok(records)
}

/// Returns an iterator over the records of `reader`, one per delimiter.
///
/// Chunks of [`SplitConfig::read_size`] bytes are fed to a splitter using
/// [`PieceAssembler`].
pub fn split_reader<R: Read>(reader: R, config: SplitConfig) -> Result<SplitIter<R, PieceAssembler>> {
    config.validate()?;
    let read_size = config.read_size();
    RecordSplitter::new(PieceAssembler::new(config))?.split(reader, read_size)
}
