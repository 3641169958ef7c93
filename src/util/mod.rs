//! Internal utility functions and helpers.
//!
//! This module contains small helper functions used throughout the crate.
//! It is an implementation detail and not part of the public API.

use bytes::Bytes;

/// Combines two byte slices into a new Bytes object.
///
/// Used to join the unterminated tails of the previous and current
/// windows at end of stream.
pub(crate) fn combine_bytes(a: &Bytes, b: &[u8]) -> Bytes {
    if a.is_empty() {
        return Bytes::copy_from_slice(b);
    }
    let mut combined = Vec::with_capacity(a.len() + b.len());
    combined.extend_from_slice(a);
    combined.extend_from_slice(b);
    Bytes::from(combined)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine_bytes() {
        let a = Bytes::from_static(b"foo");
        assert_eq!(&combine_bytes(&a, b"bar")[..], b"foobar");
        assert_eq!(&combine_bytes(&Bytes::new(), b"bar")[..], b"bar");
    }
}
