use std::fmt::{Debug};
use std::marker::{PhantomData};

use smallvec::{SmallVec};

use super::{Error, Result, Layout, check_index};

/// Implemented by types that map a multi-dimensional index onto an offset in
/// a linear buffer, in row-major ("C") order: the last index varies fastest.
///
/// There are three implementations, differing only in how the shape is
/// stored: [`DynamicIndexMap`] (rank chosen at run time),
/// [`FixedIndexMap`] (rank fixed at compile time), and [`StaticIndexMap`]
/// (rank and extents fixed at compile time). Array code is written against
/// this trait alone.
///
/// ```
/// use mdcore::{IndexMap, DynamicIndexMap};
/// let map = DynamicIndexMap::from_shape(&[2, 3, 4]).unwrap();
/// assert_eq!(map.strides(), [12, 4, 1]);
/// assert_eq!(map.offset(&[1, 2, 3]).unwrap(), 23);
/// assert_eq!(map.index::<Vec<usize>>(23), [1, 2, 3]);
/// ```
pub trait IndexMap: Clone + Debug + PartialEq {
    /// Build a map for an array of shape `shape`.
    ///
    /// Any shape is legal for [`DynamicIndexMap`]. The other flavors fail
    /// with [`Error::ShapeMismatch`] if `shape` does not fit their
    /// compile-time constraints.
    fn from_shape(shape: &[usize]) -> Result<Self>;

    /// The extent of each dimension.
    fn dims(&self) -> &[usize];

    /// The linear step of each dimension. The last stride is `1` and each
    /// other stride is the next one times the next extent.
    fn strides(&self) -> &[usize];

    /// The number of dimensions.
    fn rank(&self) -> usize { self.dims().len() }

    /// The number of elements: the product of the extents, `1` for rank 0.
    fn size(&self) -> usize { self.dims().iter().product() }

    /// Same as [`size()`](Self::size()).
    fn max_elements(&self) -> usize { self.size() }

    /// Returns the shape in a container of the caller's choosing.
    fn shape<C: FromIterator<usize>>(&self) -> C { self.dims().iter().copied().collect() }

    /// Compute the linear offset of `index`.
    ///
    /// Fails with [`Error::ShapeMismatch`] if `index` does not have exactly
    /// [`rank()`](Self::rank()) components. Bounds are not checked here; see
    /// [`check_index()`](Self::check_index()).
    fn offset(&self, index: &[usize]) -> Result<usize> {
        if index.len() != self.rank() { return Err(Error::arity(self.rank(), index.len())); }
        Ok(self.offset_unchecked(index))
    }

    /// Compute the linear offset of `index` without checking anything.
    #[inline]
    fn offset_unchecked(&self, index: &[usize]) -> usize {
        index.iter().zip(self.strides()).map(|(i, s)| i * s).sum()
    }

    /// The inverse of [`offset()`](Self::offset()): returns the index whose
    /// offset is `offset`.
    ///
    /// The result is meaningful if `offset < size()`.
    fn index<C: FromIterator<usize>>(&self, offset: usize) -> C {
        let mut index: SmallVec<[usize; 6]> = SmallVec::from_elem(0, self.rank());
        unravel(self.dims(), offset, &mut index);
        index.into_iter().collect()
    }

    /// Fails with [`Error::ShapeMismatch`] if `index` has the wrong number of
    /// components, or with [`Error::IndexOutOfRange`] if any component is
    /// not less than its extent.
    fn check_index(&self, index: &[usize]) -> Result<()> {
        if index.len() != self.rank() { return Err(Error::arity(self.rank(), index.len())); }
        index.iter().zip(self.dims()).try_for_each(|(&i, &n)| check_index(i, n))
    }

    /// Equivalent to, but more efficient than,
    /// ```text
    /// for k in 0..self.size() { f(&self.index::<Vec<_>>(k)); }
    /// ```
    fn each(&self, mut f: impl FnMut(&[usize])) {
        let dims = self.dims();
        if dims.contains(&0) { return; }
        let mut index: SmallVec<[usize; 6]> = SmallVec::from_elem(0, dims.len());
        loop {
            f(&index);
            if !increment(dims, &mut index) { return; }
        }
    }

    /// The whole map as a [`Layout`] starting at offset `0`.
    fn layout(&self) -> Layout<'_> {
        Layout {dims: self.dims(), strides: self.strides(), offset: 0}
    }
}

/// Returns the row-major strides for an array of shape `dims`.
///
/// This is a `const fn` so that [`StaticShape`] strides are compile-time
/// constants.
///
/// ```
/// assert_eq!(mdcore::c_strides([2, 3, 4]), [12, 4, 1]);
/// ```
pub const fn c_strides<const N: usize>(dims: [usize; N]) -> [usize; N] {
    let mut strides = [1; N];
    let mut d = N;
    while d > 1 {
        d -= 1;
        strides[d - 1] = strides[d] * dims[d];
    }
    strides
}

/// Run-time version of [`c_strides()`].
pub(crate) fn fill_c_strides(dims: &[usize], strides: &mut [usize]) {
    let mut stride = 1;
    for (s, &n) in strides.iter_mut().zip(dims).rev() {
        *s = stride;
        stride *= n;
    }
}

/// Run-time version of [`c_strides()`], returning the strides.
pub(crate) fn c_strides_of(dims: &[usize]) -> SmallVec<[usize; 4]> {
    let mut strides = SmallVec::from_elem(0, dims.len());
    fill_c_strides(dims, &mut strides);
    strides
}

/// Write into `index` the row-major index of `offset` within `dims`.
#[inline]
pub(crate) fn unravel(dims: &[usize], mut offset: usize, index: &mut [usize]) {
    for (i, &n) in index.iter_mut().zip(dims).rev() {
        if n == 0 { *i = 0; continue; }
        *i = offset % n;
        offset /= n;
    }
}

/// Advance `index` to the next row-major position. Returns `false` after
/// the last one, leaving `index` all zeros.
#[inline]
pub(crate) fn increment(dims: &[usize], index: &mut [usize]) -> bool {
    for (i, &n) in index.iter_mut().zip(dims).rev() {
        *i += 1;
        if *i < n { return true; }
        *i = 0;
    }
    false
}

// ----------------------------------------------------------------------------

/// An [`IndexMap`] whose rank is chosen at run time.
///
/// The default value has rank `0`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct DynamicIndexMap {
    dims: SmallVec<[usize; 4]>,
    strides: SmallVec<[usize; 4]>,
}

impl DynamicIndexMap {
    pub fn new(shape: impl IntoIterator<Item=usize>) -> Self {
        let dims: SmallVec<[usize; 4]> = shape.into_iter().collect();
        let strides = c_strides_of(&dims);
        Self {dims, strides}
    }
}

impl IndexMap for DynamicIndexMap {
    fn from_shape(shape: &[usize]) -> Result<Self> { Ok(Self::new(shape.iter().copied())) }
    #[inline(always)]
    fn dims(&self) -> &[usize] { &self.dims }
    #[inline(always)]
    fn strides(&self) -> &[usize] { &self.strides }
}

// ----------------------------------------------------------------------------

/// An [`IndexMap`] whose rank `N` is a compile-time constant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct FixedIndexMap<const N: usize> {
    dims: [usize; N],
    strides: [usize; N],
}

impl<const N: usize> FixedIndexMap<N> {
    pub const fn new(dims: [usize; N]) -> Self {
        Self {dims, strides: c_strides(dims)}
    }
}

impl<const N: usize> Default for FixedIndexMap<N> {
    fn default() -> Self { Self::new([0; N]) }
}

impl<const N: usize> IndexMap for FixedIndexMap<N> {
    fn from_shape(shape: &[usize]) -> Result<Self> {
        let dims: [usize; N] = shape.try_into().map_err(|_| Error::arity(N, shape.len()))?;
        Ok(Self::new(dims))
    }
    #[inline(always)]
    fn dims(&self) -> &[usize] { &self.dims }
    #[inline(always)]
    fn strides(&self) -> &[usize] { &self.strides }
    #[inline(always)]
    fn rank(&self) -> usize { N }
}

// ----------------------------------------------------------------------------

/// A shape whose rank and extents are compile-time constants.
///
/// Implement this with [`static_shape!`](crate::static_shape).
pub trait StaticShape: 'static + Debug + Copy + Default + PartialEq {
    /// The extents.
    const DIMS: &'static [usize];

    /// `c_strides(DIMS)`.
    const STRIDES: &'static [usize];
}

/// Declare a unit struct implementing [`StaticShape`].
///
/// ```
/// use mdcore::{static_shape, IndexMap, StaticIndexMap};
/// static_shape!(pub Cube = [2, 3, 4]);
/// let map = StaticIndexMap::<Cube>::default();
/// assert_eq!(map.size(), 24);
/// assert_eq!(map.strides(), [12, 4, 1]);
/// ```
#[macro_export]
macro_rules! static_shape {
    ($(#[$attr:meta])* $vis:vis $name:ident = [$($dim:expr),* $(,)?]) => {
        $(#[$attr])*
        #[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
        $vis struct $name;

        impl $crate::StaticShape for $name {
            const DIMS: &'static [usize] = &[$($dim),*];
            const STRIDES: &'static [usize] = &$crate::c_strides([$($dim),*]);
        }
    };
}

/// An [`IndexMap`] for a [`StaticShape`]. Takes no space.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct StaticIndexMap<S: StaticShape>(PhantomData<S>);

impl<S: StaticShape> StaticIndexMap<S> {
    /// The number of elements, as a constant.
    pub const SIZE: usize = {
        let mut size = 1;
        let mut d = 0;
        while d < S::DIMS.len() {
            size *= S::DIMS[d];
            d += 1;
        }
        size
    };
}

impl<S: StaticShape> IndexMap for StaticIndexMap<S> {
    fn from_shape(shape: &[usize]) -> Result<Self> {
        if shape != S::DIMS { return Err(Error::shapes(S::DIMS, shape)); }
        Ok(Self(PhantomData))
    }
    #[inline(always)]
    fn dims(&self) -> &[usize] { S::DIMS }
    #[inline(always)]
    fn strides(&self) -> &[usize] { S::STRIDES }
    #[inline(always)]
    fn size(&self) -> usize { Self::SIZE }
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    static_shape!(Cube = [2, 3, 4]);
    static_shape!(Point = []);

    fn assert_round_trip<M: IndexMap>(map: &M) {
        for k in 0..map.size() {
            let index: Vec<usize> = map.index(k);
            assert_eq!(index.len(), map.rank());
            assert_eq!(map.offset(&index).unwrap(), k);
            assert!(map.check_index(&index).is_ok());
        }
    }

    #[test]
    fn strides() {
        assert_eq!(c_strides([5, 7]), [7, 1]);
        assert_eq!(c_strides::<0>([]), [0usize; 0]);
        let mut s = [0; 3];
        fill_c_strides(&[4, 0, 2], &mut s);
        assert_eq!(s, [0, 2, 1]);
    }

    #[test]
    fn dynamic() {
        let map = DynamicIndexMap::from_shape(&[3, 4]).unwrap();
        assert_eq!(map.rank(), 2);
        assert_eq!(map.size(), 12);
        assert_eq!(map.shape::<Vec<usize>>(), [3, 4]);
        assert_eq!(map.offset(&[1, 2]).unwrap(), 6);
        assert_eq!(map.offset(&[1, 2, 0]), Err(Error::arity(2, 3)));
        assert_eq!(map.check_index(&[3, 0]), Err(Error::IndexOutOfRange {index: 3, extent: 3}));
        assert_round_trip(&map);
    }

    #[test]
    fn rank_zero() {
        let map = DynamicIndexMap::default();
        assert_eq!(map.rank(), 0);
        assert_eq!(map.size(), 1);
        assert_eq!(map.offset(&[]).unwrap(), 0);
        assert_eq!(map.index::<Vec<usize>>(0), Vec::<usize>::new());
        let mut count = 0;
        map.each(|_| count += 1);
        assert_eq!(count, 1);
    }

    #[test]
    fn zero_extent() {
        let map = DynamicIndexMap::new([3, 0, 2]);
        assert_eq!(map.size(), 0);
        map.each(|_| panic!("no elements"));
    }

    #[test]
    fn fixed() {
        let map = FixedIndexMap::<3>::from_shape(&[2, 3, 4]).unwrap();
        assert_eq!(map.strides(), [12, 4, 1]);
        assert_eq!(FixedIndexMap::<3>::from_shape(&[2, 3]), Err(Error::arity(3, 2)));
        assert_eq!(map.shape::<std::collections::VecDeque<usize>>(), [2, 3, 4]);
        assert_round_trip(&map);
    }

    #[test]
    fn static_() {
        let map = StaticIndexMap::<Cube>::from_shape(&[2, 3, 4]).unwrap();
        assert_eq!(StaticIndexMap::<Cube>::SIZE, 24);
        assert_eq!(map.size(), 24);
        assert_eq!(Cube::STRIDES, [12, 4, 1]);
        assert_eq!(StaticIndexMap::<Cube>::from_shape(&[4, 3, 2]), Err(Error::shapes(&[2, 3, 4], &[4, 3, 2])));
        assert_round_trip(&map);
        assert_eq!(StaticIndexMap::<Point>::default().size(), 1);
    }

    #[test]
    fn each_visits_in_offset_order() {
        let map = DynamicIndexMap::new([2, 3]);
        let mut offsets = Vec::new();
        map.each(|index| offsets.push(map.offset_unchecked(index)));
        assert_eq!(offsets, (0..6).collect::<Vec<_>>());
    }

    proptest! {
        #[test]
        fn offset_index_round_trip(dims in prop::collection::vec(1usize..6, 0..5)) {
            let map = DynamicIndexMap::from_shape(&dims).unwrap();
            prop_assert_eq!(map.size(), dims.iter().product::<usize>());
            prop_assert_eq!(map.rank(), dims.len());
            for k in 0..map.size() {
                let index: Vec<usize> = map.index(k);
                prop_assert_eq!(map.offset(&index).unwrap(), k);
            }
        }
    }
}
