//! End-of-stream output.

/// Records flushed by [`RecordSplitter::finalize`](crate::RecordSplitter::finalize).
///
/// At end of stream two things may be left: the pending record, and bytes
/// after the last delimiter. Each of them yields at most one record, in
/// that order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Finalized<T> {
    /// Nothing was left.
    #[default]
    Empty,
    /// Either the pending record or the unterminated tail.
    Single(T),
    /// The pending record followed by the unterminated tail.
    Pair(T, T),
}

impl<T> Finalized<T> {
    pub(crate) fn from_parts(pending: Option<T>, tail: Option<T>) -> Self {
        match (pending, tail) {
            (None, None) => Finalized::Empty,
            (Some(one), None) | (None, Some(one)) => Finalized::Single(one),
            (Some(first), Some(second)) => Finalized::Pair(first, second),
        }
    }

    /// Returns true if nothing was flushed.
    pub fn is_empty(&self) -> bool {
        matches!(self, Finalized::Empty)
    }

    /// Number of flushed records (0, 1 or 2).
    pub fn len(&self) -> usize {
        match self {
            Finalized::Empty => 0,
            Finalized::Single(_) => 1,
            Finalized::Pair(..) => 2,
        }
    }

    /// Collects the flushed records in stream order.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Finalized::Empty => Vec::new(),
            Finalized::Single(one) => vec![one],
            Finalized::Pair(first, second) => vec![first, second],
        }
    }
}

impl<T> IntoIterator for Finalized<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts() {
        assert_eq!(Finalized::<u8>::from_parts(None, None), Finalized::Empty);
        assert_eq!(Finalized::from_parts(Some(1), None), Finalized::Single(1));
        assert_eq!(Finalized::from_parts(None, Some(2)), Finalized::Single(2));
        assert_eq!(Finalized::from_parts(Some(1), Some(2)), Finalized::Pair(1, 2));
    }

    #[test]
    fn test_into_iter_order() {
        let all: Vec<_> = Finalized::Pair("pending", "tail").into_iter().collect();
        assert_eq!(all, vec!["pending", "tail"]);
        assert_eq!(Finalized::Pair(1, 2).len(), 2);
        assert!(Finalized::<u8>::Empty.is_empty());
    }
}
