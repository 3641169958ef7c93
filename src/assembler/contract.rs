//! The collaborator contract consumed by the splitter.

use bytes::Bytes;

/// Groups delimiter-bounded pieces into records.
///
/// The splitter calls these hooks in stream order. A piece always includes
/// the delimiter that terminated it, except for the unterminated tail handed
/// over by [`RecordSplitter::finalize`](crate::RecordSplitter::finalize).
///
/// For every piece:
///
/// 1. [`is_new_record`](Self::is_new_record) classifies it.
/// 2. A new record detaches the pending builder, passes it through
///    [`finish`](Self::finish), and starts a fresh builder with
///    [`create_builder`](Self::create_builder).
/// 3. A continuation goes to [`augment_builder`](Self::augment_builder).
///    The splitter reports
///    [`MissingPendingBuilder`](crate::SplitError::MissingPendingBuilder)
///    instead of calling it when nothing is pending.
///
/// # Example
///
/// ```
/// use bytes::Bytes;
/// use recsplit::{RecordAssembler, RecordSplitter};
///
/// /// Counts the pieces of each `;`-terminated record.
/// struct Counter;
///
/// impl RecordAssembler for Counter {
///     type Builder = usize;
///     type Output = usize;
///
///     fn record_delimiter(&self) -> &[u8] {
///         b";"
///     }
///     fn is_new_record(&self, piece: &[u8]) -> bool {
///         !piece.starts_with(b" ")
///     }
///     fn create_builder(&mut self, _piece: Bytes) -> usize {
///         1
///     }
///     fn augment_builder(&mut self, builder: &mut usize, _piece: Bytes) {
///         *builder += 1;
///     }
///     fn finish(&mut self, builder: usize) -> Option<usize> {
///         Some(builder)
///     }
/// }
///
/// let mut splitter = RecordSplitter::new(Counter)?;
/// let counts = splitter.process(&b"a; b; c;d;"[..])?;
/// assert_eq!(counts, vec![3]);
/// assert_eq!(splitter.finalize()?.into_vec(), vec![1]);
/// # Ok::<(), recsplit::SplitError>(())
/// ```
pub trait RecordAssembler {
    /// In-progress record state.
    type Builder;

    /// A finished record.
    type Output;

    /// The byte sequence separating pieces. Must be non-empty and must not
    /// change for the lifetime of the splitter.
    fn record_delimiter(&self) -> &[u8];

    /// Returns true if `piece` starts a new record.
    fn is_new_record(&self, piece: &[u8]) -> bool;

    /// Starts a new record from its first piece.
    fn create_builder(&mut self, piece: Bytes) -> Self::Builder;

    /// Appends a continuation piece to the pending record.
    fn augment_builder(&mut self, builder: &mut Self::Builder, piece: Bytes);

    /// Converts a finished builder into output. `None` drops the record.
    fn finish(&mut self, builder: Self::Builder) -> Option<Self::Output>;
}
