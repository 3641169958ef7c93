//! Ready-made assemblers producing [`Record`] values.

use bytes::{BufMut, Bytes, BytesMut};

use super::RecordAssembler;
use crate::config::SplitConfig;
use crate::record::Record;

/// Builder used by the built-in assemblers.
///
/// Pieces are kept as separate `Bytes` handles and only copied into one
/// buffer when the record is finished with more than one piece.
#[derive(Debug, Clone, Default)]
pub struct RecordBuilder {
    parts: Vec<Bytes>,
    offset: u64,
}

impl RecordBuilder {
    /// Stream offset of the first byte of the record.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Number of pieces gathered so far.
    pub fn pieces(&self) -> usize {
        self.parts.len()
    }

    /// Total bytes gathered so far.
    pub fn len(&self) -> usize {
        self.parts.iter().map(Bytes::len).sum()
    }

    /// Returns true if no bytes have been gathered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn into_bytes(mut self) -> Bytes {
        match self.parts.len() {
            0 => Bytes::new(),
            1 => self.parts.swap_remove(0),
            _ => {
                let mut merged = BytesMut::with_capacity(self.len());
                for part in &self.parts {
                    merged.put_slice(part);
                }
                merged.freeze()
            }
        }
    }
}

/// Offset tracking and record shaping shared by the built-in assemblers.
#[derive(Debug, Clone)]
struct Framing {
    config: SplitConfig,
    offset: u64,
}

impl Framing {
    fn new(config: SplitConfig) -> Self {
        Self { config, offset: 0 }
    }

    fn start(&mut self, piece: Bytes) -> RecordBuilder {
        let builder = RecordBuilder {
            offset: self.offset,
            parts: Vec::new(),
        };
        self.push(builder, piece)
    }

    fn push(&mut self, mut builder: RecordBuilder, piece: Bytes) -> RecordBuilder {
        self.offset += piece.len() as u64;
        builder.parts.push(piece);
        builder
    }

    fn finish(&self, builder: RecordBuilder) -> Option<Record> {
        let offset = builder.offset;
        let pieces = builder.pieces();
        let mut data = builder.into_bytes();

        if self.config.strip_delimiter() && data.ends_with(self.config.delimiter()) {
            data.truncate(data.len() - self.config.delimiter().len());
        }
        if self.config.skip_empty() && data.is_empty() {
            return None;
        }

        Some(Record {
            data,
            offset,
            pieces,
        })
    }
}

/// Emits every delimiter-bounded piece as its own [`Record`].
///
/// # Example
///
/// ```
/// use recsplit::{PieceAssembler, RecordSplitter, SplitConfig};
///
/// let config = SplitConfig::new(&b"\r\n"[..])?;
/// let mut splitter = RecordSplitter::new(PieceAssembler::new(config))?;
///
/// assert!(splitter.process(&b"rec1\r"[..])?.is_empty());
/// let records = splitter.process(&b"\nrec2\r\n"[..])?;
/// assert_eq!(&records[0].data[..], b"rec1");
///
/// let last: Vec<_> = splitter.finalize()?.into_iter().collect();
/// assert_eq!(&last[0].data[..], b"rec2");
/// # Ok::<(), recsplit::SplitError>(())
/// ```
#[derive(Debug, Clone)]
pub struct PieceAssembler {
    framing: Framing,
}

impl PieceAssembler {
    /// Creates an assembler using the delimiter and shaping from `config`.
    pub fn new(config: SplitConfig) -> Self {
        Self {
            framing: Framing::new(config),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SplitConfig {
        &self.framing.config
    }
}

impl Default for PieceAssembler {
    fn default() -> Self {
        Self::new(SplitConfig::default())
    }
}

impl RecordAssembler for PieceAssembler {
    type Builder = RecordBuilder;
    type Output = Record;

    fn record_delimiter(&self) -> &[u8] {
        self.framing.config.delimiter()
    }

    fn is_new_record(&self, _piece: &[u8]) -> bool {
        true
    }

    fn create_builder(&mut self, piece: Bytes) -> RecordBuilder {
        self.framing.start(piece)
    }

    fn augment_builder(&mut self, builder: &mut RecordBuilder, piece: Bytes) {
        let taken = std::mem::take(builder);
        *builder = self.framing.push(taken, piece);
    }

    fn finish(&mut self, builder: RecordBuilder) -> Option<Record> {
        self.framing.finish(builder)
    }
}

/// Groups pieces into records using a predicate.
///
/// A piece for which the predicate returns `true` starts a new record; any
/// other piece continues the pending one. Useful for folded headers,
/// multi-line log entries and similar formats.
///
/// # Example
///
/// ```
/// use recsplit::{GroupingAssembler, RecordSplitter, SplitConfig};
///
/// // Lines starting with whitespace continue the previous entry
/// let assembler = GroupingAssembler::new(SplitConfig::default(), |piece: &[u8]| {
///     !piece.starts_with(b" ")
/// });
/// let mut splitter = RecordSplitter::new(assembler)?;
///
/// let records = splitter.process(&b"ERROR boom\n  at foo\n  at bar\nINFO ok\n"[..])?;
/// assert_eq!(&records[0].data[..], b"ERROR boom\n  at foo\n  at bar");
/// assert_eq!(records[0].pieces, 3);
/// # Ok::<(), recsplit::SplitError>(())
/// ```
#[derive(Debug, Clone)]
pub struct GroupingAssembler<F> {
    framing: Framing,
    starts_record: F,
}

impl<F> GroupingAssembler<F>
where
    F: Fn(&[u8]) -> bool,
{
    /// Creates an assembler that starts a record wherever `starts_record`
    /// returns `true`.
    pub fn new(config: SplitConfig, starts_record: F) -> Self {
        Self {
            framing: Framing::new(config),
            starts_record,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SplitConfig {
        &self.framing.config
    }
}

impl<F> RecordAssembler for GroupingAssembler<F>
where
    F: Fn(&[u8]) -> bool,
{
    type Builder = RecordBuilder;
    type Output = Record;

    fn record_delimiter(&self) -> &[u8] {
        self.framing.config.delimiter()
    }

    fn is_new_record(&self, piece: &[u8]) -> bool {
        (self.starts_record)(piece)
    }

    fn create_builder(&mut self, piece: Bytes) -> RecordBuilder {
        self.framing.start(piece)
    }

    fn augment_builder(&mut self, builder: &mut RecordBuilder, piece: Bytes) {
        let taken = std::mem::take(builder);
        *builder = self.framing.push(taken, piece);
    }

    fn finish(&mut self, builder: RecordBuilder) -> Option<Record> {
        self.framing.finish(builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_assembler_offsets() {
        let mut assembler = PieceAssembler::default();
        let first = assembler.create_builder(Bytes::from_static(b"abc\n"));
        let second = assembler.create_builder(Bytes::from_static(b"de\n"));

        let first = assembler.finish(first).unwrap();
        let second = assembler.finish(second).unwrap();
        assert_eq!(&first.data[..], b"abc");
        assert_eq!(first.offset, 0);
        assert_eq!(&second.data[..], b"de");
        assert_eq!(second.offset, 4);
    }

    #[test]
    fn test_keep_delimiter() {
        let config = SplitConfig::default().with_strip_delimiter(false);
        let mut assembler = PieceAssembler::new(config);
        let builder = assembler.create_builder(Bytes::from_static(b"abc\n"));
        assert_eq!(&assembler.finish(builder).unwrap().data[..], b"abc\n");
    }

    #[test]
    fn test_unterminated_piece_is_not_stripped() {
        let mut assembler = PieceAssembler::default();
        let builder = assembler.create_builder(Bytes::from_static(b"tail"));
        assert_eq!(&assembler.finish(builder).unwrap().data[..], b"tail");
    }

    #[test]
    fn test_skip_empty() {
        let config = SplitConfig::default().with_skip_empty(true);
        let mut assembler = PieceAssembler::new(config);
        let builder = assembler.create_builder(Bytes::from_static(b"\n"));
        assert!(assembler.finish(builder).is_none());

        let mut assembler = PieceAssembler::default();
        let builder = assembler.create_builder(Bytes::from_static(b"\n"));
        assert!(assembler.finish(builder).unwrap().is_empty());
    }

    #[test]
    fn test_grouping_assembler() {
        let mut assembler =
            GroupingAssembler::new(SplitConfig::default(), |p: &[u8]| p.first() != Some(&b'\t'));
        assert!(assembler.is_new_record(b"head\n"));
        assert!(!assembler.is_new_record(b"\tmore\n"));

        let mut builder = assembler.create_builder(Bytes::from_static(b"head\n"));
        assembler.augment_builder(&mut builder, Bytes::from_static(b"\tmore\n"));
        assert_eq!(builder.pieces(), 2);
        assert_eq!(builder.len(), 11);

        let record = assembler.finish(builder).unwrap();
        assert_eq!(&record.data[..], b"head\n\tmore");
        assert_eq!(record.pieces, 2);
        assert_eq!(record.offset, 0);

        let next = assembler.create_builder(Bytes::from_static(b"x\n"));
        assert_eq!(next.offset(), 11);
    }
}
