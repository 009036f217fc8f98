//! Strided sub-regions of an array.

use smallvec::{SmallVec};

use super::{Error, Result, IndexMap, Sel, check_index};
use super::index_map::{c_strides_of};

/// A borrowed description of where the elements of an array or view live in
/// storage: the storage offset of index `[0, 0, ...]`, and the extent and
/// stride of each dimension.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Layout<'a> {
    pub dims: &'a [usize],
    pub strides: &'a [usize],
    pub offset: usize,
}

impl<'a> Layout<'a> {
    /// Returns the storage offset of `index`.
    ///
    /// Fails with [`Error::ShapeMismatch`] if `index` has the wrong number of
    /// components, or with [`Error::IndexOutOfRange`] if any component
    /// exceeds its extent.
    pub fn storage_offset(&self, index: &[usize]) -> Result<usize> {
        if index.len() != self.dims.len() { return Err(Error::arity(self.dims.len(), index.len())); }
        let mut offset = self.offset;
        for ((&i, &n), &s) in index.iter().zip(self.dims).zip(self.strides) {
            check_index(i, n)?;
            offset += i * s;
        }
        Ok(offset)
    }

    /// Returns the storage offset of the element at position `i` in
    /// row-major order. The result is meaningless if `i` is out of range.
    #[inline]
    pub fn linear_offset(&self, mut i: usize) -> usize {
        let mut offset = self.offset;
        for (&n, &s) in self.dims.iter().zip(self.strides).rev() {
            if n == 0 { return offset; }
            offset += (i % n) * s;
            i /= n;
        }
        offset
    }
}

// ----------------------------------------------------------------------------

/// The offset, shape and stride of a view into the storage of an array.
///
/// A `Selection` is computed from the parent's [`IndexMap`] and a list of
/// [`Sel`]s. Each pinned dimension adds `index * stride` to the offset and is
/// dropped; each range adds `start * stride` to the offset and contributes an
/// extent of `ceil((stop - start) / step)` and a stride of `step * stride`.
/// Trailing dimensions that are not mentioned are kept whole.
///
/// ```
/// use mdcore::{s, DynamicIndexMap, Selection};
/// let parent = DynamicIndexMap::new([4, 6]);
/// let sel = Selection::new(&parent, &s![1.., mdcore::Slice::with_stride(0, 6, 2).unwrap()]).unwrap();
/// assert_eq!(sel.offset(), 6);
/// assert_eq!(sel.dims(), [3, 3]);
/// assert_eq!(sel.strides(), [6, 2]);
/// assert!(!sel.is_contiguous());
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct Selection {
    offset: usize,
    dims: SmallVec<[usize; 4]>,
    strides: SmallVec<[usize; 4]>,
}

impl Selection {
    /// Select from an array whose layout is `parent`.
    pub fn new(parent: &impl IndexMap, sels: &[Sel]) -> Result<Self> {
        Self::from_layout(parent.layout(), sels)
    }

    /// Select the whole of `parent`.
    pub fn full(parent: &impl IndexMap) -> Self {
        Self {
            offset: 0,
            dims: parent.dims().into(),
            strides: parent.strides().into(),
        }
    }

    /// Select from an existing selection, i.e. make a view of a view.
    pub fn refine(&self, sels: &[Sel]) -> Result<Self> {
        Self::from_layout(self.layout(), sels)
    }

    pub(crate) fn from_layout(parent: Layout<'_>, sels: &[Sel]) -> Result<Self> {
        if sels.len() > parent.dims.len() {
            return Err(Error::arity(parent.dims.len(), sels.len()));
        }
        let mut offset = parent.offset;
        let mut dims = SmallVec::new();
        let mut strides = SmallVec::new();
        for (d, (&extent, &stride)) in parent.dims.iter().zip(parent.strides).enumerate() {
            let sel = sels.get(d).copied().unwrap_or(Sel::All);
            match sel.resolve(extent)? {
                None => if let Sel::Index(index) = sel { offset += index * stride; },
                Some(slice) => {
                    offset += slice.first() * stride;
                    dims.push(slice.size());
                    strides.push(slice.stride() * stride);
                },
            }
        }
        log::trace!("Selection at offset {} with shape {:?} and strides {:?}", offset, dims, strides);
        Ok(Self {offset, dims, strides})
    }

    pub fn layout(&self) -> Layout<'_> {
        Layout {dims: &self.dims, strides: &self.strides, offset: self.offset}
    }

    /// The storage offset of the first selected element.
    pub fn offset(&self) -> usize { self.offset }

    pub fn dims(&self) -> &[usize] { &self.dims }

    pub fn strides(&self) -> &[usize] { &self.strides }

    pub fn rank(&self) -> usize { self.dims.len() }

    pub fn size(&self) -> usize { self.dims.iter().product() }

    pub fn shape<C: FromIterator<usize>>(&self) -> C { self.dims.iter().copied().collect() }

    /// See [`Layout::storage_offset()`].
    pub fn storage_offset(&self, index: &[usize]) -> Result<usize> { self.layout().storage_offset(index) }

    /// See [`Layout::linear_offset()`].
    #[inline]
    pub fn linear_offset(&self, i: usize) -> usize { self.layout().linear_offset(i) }

    /// Whether the selected elements, read in row-major order, occupy
    /// `offset() .. offset() + size()` in storage with no gaps.
    ///
    /// Dimensions of extent `1` are ignored, since their stride is never
    /// used.
    pub fn is_contiguous(&self) -> bool {
        if self.size() == 0 { return true; }
        let expected = c_strides_of(&self.dims);
        self.dims.iter().zip(&self.strides).zip(&expected).all(|((&n, &s), &e)| n <= 1 || s == e)
    }
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{s, DynamicIndexMap, FixedIndexMap, Slice};

    #[test]
    fn pinned_row() {
        let parent = DynamicIndexMap::new([10, 3]);
        let sel = Selection::new(&parent, &s![4, 0..3]).unwrap();
        assert_eq!(sel.offset(), 12);
        assert_eq!(sel.rank(), 1);
        assert_eq!(sel.dims(), [3]);
        assert_eq!(sel.strides(), [1]);
        assert!(sel.is_contiguous());
    }

    #[test]
    fn column_is_strided() {
        let parent = FixedIndexMap::new([3, 4]);
        let sel = Selection::new(&parent, &s![.., 2]).unwrap();
        assert_eq!(sel.offset(), 2);
        assert_eq!(sel.dims(), [3]);
        assert_eq!(sel.strides(), [4]);
        assert!(!sel.is_contiguous());
        let offsets: Vec<usize> = (0..3).map(|i| sel.linear_offset(i)).collect();
        assert_eq!(offsets, [2, 6, 10]);
    }

    #[test]
    fn omitted_dims_are_whole() {
        let parent = DynamicIndexMap::new([2, 3, 4]);
        let sel = Selection::new(&parent, &s![1]).unwrap();
        assert_eq!(sel.offset(), 12);
        assert_eq!(sel.dims(), [3, 4]);
        assert!(sel.is_contiguous());
        assert_eq!(Selection::new(&parent, &[]).unwrap(), Selection::full(&parent));
    }

    #[test]
    fn too_many_sels() {
        let parent = DynamicIndexMap::new([2, 3]);
        assert_eq!(Selection::new(&parent, &s![0, 0, 0]), Err(Error::arity(2, 3)));
    }

    #[test]
    fn out_of_range() {
        let parent = DynamicIndexMap::new([2, 3]);
        assert_eq!(
            Selection::new(&parent, &s![2]),
            Err(Error::IndexOutOfRange {index: 2, extent: 2}),
        );
        assert_eq!(
            Selection::new(&parent, &s![.., 1..4]),
            Err(Error::IndexOutOfRange {index: 4, extent: 3}),
        );
    }

    #[test]
    fn refine() {
        let parent = DynamicIndexMap::new([6, 6]);
        let every_other = Selection::new(&parent, &s![Slice::with_stride(0, 6, 2).unwrap()]).unwrap();
        assert_eq!(every_other.dims(), [3, 6]);
        let inner = every_other.refine(&s![1, 2..5]).unwrap();
        assert_eq!(inner.offset(), 2 * 6 + 2);
        assert_eq!(inner.dims(), [3]);
        assert_eq!(inner.storage_offset(&[2]).unwrap(), 16);
        assert_eq!(inner.storage_offset(&[3]), Err(Error::IndexOutOfRange {index: 3, extent: 3}));
        assert_eq!(inner.storage_offset(&[0, 0]), Err(Error::arity(1, 2)));
    }

    #[test]
    fn single_row_block_is_contiguous() {
        let parent = DynamicIndexMap::new([4, 5]);
        let sel = Selection::new(&parent, &s![1..2, 0..5]).unwrap();
        assert!(sel.is_contiguous());
        let sel = Selection::new(&parent, &s![1..3, 0..4]).unwrap();
        assert!(!sel.is_contiguous());
    }
}
