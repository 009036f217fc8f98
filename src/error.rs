//! Error types for array construction, access and arithmetic.

use thiserror::Error;

use super::TypeId;

/// Everything that can go wrong in this crate.
///
/// The variants are distinct failure classes: a caller can always tell a
/// bounds violation from a shape mismatch from an unallocated value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Operands are structurally incompatible: wrong number of indices,
    /// different shapes in element-wise arithmetic, or a raw-data request on
    /// a strided view.
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// Element counts disagree.
    #[error("Size mismatch: expected {expected} elements, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// A checked accessor got an index outside `0..extent`.
    #[error("Index {index} is out of range for extent {extent}")]
    IndexOutOfRange { index: usize, extent: usize },

    /// The array or value is empty (default-constructed or taken from).
    #[error("Memory not allocated")]
    MemoryNotAllocated,

    /// A type-erased value holds a different element type.
    #[error("Type error: expected {expected}, got {actual}")]
    TypeError { expected: TypeId, actual: TypeId },

    /// Unknown key in a name table.
    #[error("Unknown key: {0:?}")]
    KeyError(String),

    /// A slice whose range is empty or whose stride is zero or exceeds its span.
    #[error("Invalid slice {first}..{last} with stride {stride}")]
    InvalidSlice { first: usize, last: usize, stride: usize },
}

impl Error {
    /// Shorthand for an arity failure: `rank` indices expected, `len` given.
    pub(crate) fn arity(rank: usize, len: usize) -> Self {
        Error::ShapeMismatch { expected: vec![rank], actual: vec![len] }
    }

    pub(crate) fn shapes(expected: &[usize], actual: &[usize]) -> Self {
        Error::ShapeMismatch { expected: expected.to_vec(), actual: actual.to_vec() }
    }
}

/// Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Fails with [`Error::IndexOutOfRange`] unless `index < extent`.
#[inline]
pub(crate) fn check_index(index: usize, extent: usize) -> Result<()> {
    if index < extent { Ok(()) } else { Err(Error::IndexOutOfRange { index, extent }) }
}

/// Fails with [`Error::SizeMismatch`] unless `actual == expected`.
#[inline]
pub(crate) fn check_size(expected: usize, actual: usize) -> Result<()> {
    if expected == actual { Ok(()) } else { Err(Error::SizeMismatch { expected, actual }) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_context() {
        let e = Error::shapes(&[2, 3], &[3, 2]);
        assert_eq!(e.to_string(), "Shape mismatch: expected [2, 3], got [3, 2]");
        let e = Error::IndexOutOfRange { index: 5, extent: 5 };
        assert_eq!(e.to_string(), "Index 5 is out of range for extent 5");
    }

    #[test]
    fn checks() {
        assert!(check_index(0, 1).is_ok());
        assert_eq!(check_index(1, 1), Err(Error::IndexOutOfRange { index: 1, extent: 1 }));
        assert!(check_size(4, 4).is_ok());
        assert_eq!(check_size(4, 3), Err(Error::SizeMismatch { expected: 4, actual: 3 }));
        assert_eq!(Error::arity(2, 3), Error::ShapeMismatch { expected: vec![2], actual: vec![3] });
    }
}
