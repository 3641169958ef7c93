//! Splitting engine for delimited byte streams.
//!
//! - [`RecordSplitter`] - Stateful splitter with `process()`/`finalize()` API
//! - [`Finalized`] - What `finalize()` flushes at end of stream
//! - [`SplitIter`] - Iterator that yields records from a [`std::io::Read`] source

mod engine;
mod finalized;
mod iter;

pub use engine::RecordSplitter;
pub use finalized::Finalized;
pub use iter::SplitIter;
