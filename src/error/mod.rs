//! Error types for recsplit.

use thiserror::Error;

/// Errors that can occur while splitting a byte stream into records.
///
/// None of these are retried internally. Scanner invariants, malformed
/// streams and I/O failures all abort the call in progress and surface here;
/// the caller decides whether to abandon the stream or start over.
#[derive(Debug, Error)]
pub enum SplitError {
    /// The cursor of a window was queried while it sat behind the anchor.
    #[error("invalid cursor position: cursor {cursor} cannot be less than anchor {anchor}")]
    InvalidCursorPosition {
        /// Cursor at the time of the query.
        cursor: usize,
        /// Anchor at the time of the query.
        anchor: usize,
    },

    /// The cursor was moved, or read, outside of the window's storage.
    #[error("cursor {cursor} out of bounds for window of {len} bytes")]
    CursorOutOfBounds {
        /// The cursor position that was requested.
        cursor: isize,
        /// Length of the window.
        len: usize,
    },

    /// Prepend was attempted on a window that has already emitted bytes.
    #[error("cannot prepend to a window whose anchor is at {anchor}")]
    CannotPrepend {
        /// Anchor of the receiving window.
        anchor: usize,
    },

    /// A leftover window survived two calls without being fully scanned.
    ///
    /// Either the delimiter is longer than the data supplied between two
    /// calls, or chunks were fed out of order.
    #[error("previous window still has {unprocessed} unscanned bytes")]
    PreviousStillPending {
        /// Bytes of the previous window the scanner never reached.
        unprocessed: usize,
    },

    /// Purge was requested but no previous window exists.
    #[error("previous window cannot be purged because it does not exist")]
    CannotPurgePrevious,

    /// The previous window holds unflushed bytes but there is no current
    /// window to receive them.
    #[error("cannot merge {remaining} leftover bytes: no current window")]
    CannotMergeLeftover {
        /// Unflushed bytes in the previous window.
        remaining: usize,
    },

    /// A continuation piece arrived before any record was started.
    #[error("continuation piece arrived with no pending record")]
    MissingPendingBuilder,

    /// The splitter was used after `destroy()`.
    #[error("splitter has been destroyed")]
    Destroyed,

    /// Invalid configuration parameter.
    #[error("invalid config: {message}")]
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },

    /// An I/O error occurred while reading input data.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for splitting operations.
pub type Result<T> = std::result::Result<T, SplitError>;
