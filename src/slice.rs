//! Per-dimension selection specifiers.

use std::ops::{Range, RangeFrom, RangeTo, RangeFull};

use super::{Error, Result};

/// A validated half-open range `first..last` with a positive `stride`.
///
/// ```
/// use mdcore::{Slice};
/// let s = Slice::with_stride(1, 8, 3).unwrap();
/// assert_eq!(s.size(), 3); // 1, 4, 7
/// assert!(Slice::new(4, 4).is_err());
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Slice {
    first: usize,
    last: usize,
    stride: usize,
}

impl Slice {
    /// Equivalent to `Slice::with_stride(first, last, 1)`.
    pub fn new(first: usize, last: usize) -> Result<Self> { Self::with_stride(first, last, 1) }

    /// Fails with [`Error::InvalidSlice`] if the range is empty, if `stride`
    /// is zero, or if `stride` exceeds `last - first`.
    pub fn with_stride(first: usize, last: usize, stride: usize) -> Result<Self> {
        if first >= last || stride == 0 || stride > last - first {
            return Err(Error::InvalidSlice {first, last, stride});
        }
        Ok(Self {first, last, stride})
    }

    pub fn first(&self) -> usize { self.first }

    pub fn last(&self) -> usize { self.last }

    pub fn stride(&self) -> usize { self.stride }

    /// The number of positions selected: `ceil((last - first) / stride)`.
    pub fn size(&self) -> usize { (self.last - self.first + self.stride - 1) / self.stride }
}

// ----------------------------------------------------------------------------

/// What to select along one dimension of an array.
///
/// Usually constructed with [`s!`](crate::s) from integers and ranges.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Sel {
    /// Pin the dimension at one position. The dimension disappears from the
    /// result.
    Index(usize),

    /// Keep every `step`th position from `start` up to `stop`, or up to the
    /// end of the dimension if `stop` is `None`.
    Range {start: usize, stop: Option<usize>, step: usize},

    /// Keep the whole dimension.
    All,
}

impl Sel {
    /// Resolve `self` against a dimension of the given `extent`. Returns
    /// `None` for a pinned index, otherwise the selected [`Slice`].
    pub(crate) fn resolve(self, extent: usize) -> Result<Option<Slice>> {
        match self {
            Sel::Index(index) => {
                super::check_index(index, extent)?;
                Ok(None)
            },
            Sel::Range {start, stop, step} => {
                let stop = stop.unwrap_or(extent);
                if stop > extent { return Err(Error::IndexOutOfRange {index: stop, extent}); }
                Slice::with_stride(start, stop, step).map(Some)
            },
            Sel::All => Ok(Some(Slice {first: 0, last: extent, stride: 1})),
        }
    }
}

impl From<usize> for Sel {
    fn from(index: usize) -> Self { Sel::Index(index) }
}

impl From<Slice> for Sel {
    fn from(s: Slice) -> Self { Sel::Range {start: s.first, stop: Some(s.last), step: s.stride} }
}

impl From<Range<usize>> for Sel {
    fn from(r: Range<usize>) -> Self { Sel::Range {start: r.start, stop: Some(r.end), step: 1} }
}

impl From<RangeFrom<usize>> for Sel {
    fn from(r: RangeFrom<usize>) -> Self { Sel::Range {start: r.start, stop: None, step: 1} }
}

impl From<RangeTo<usize>> for Sel {
    fn from(r: RangeTo<usize>) -> Self { Sel::Range {start: 0, stop: Some(r.end), step: 1} }
}

impl From<RangeFull> for Sel {
    fn from(_: RangeFull) -> Self { Sel::All }
}

/// Build an array of [`Sel`]s, one per leading dimension. Dimensions not
/// mentioned are selected whole.
///
/// ```
/// use mdcore::{s, Sel, Slice};
/// let sels = s![1, 0..3, .., Slice::with_stride(0, 6, 2).unwrap()];
/// assert_eq!(sels[0], Sel::Index(1));
/// assert_eq!(sels[2], Sel::All);
/// assert_eq!(sels[3], Sel::Range {start: 0, stop: Some(6), step: 2});
/// ```
#[macro_export]
macro_rules! s {
    ($($sel:expr),* $(,)?) => { [$($crate::Sel::from($sel)),*] };
}

// ----------------------------------------------------------------------------
