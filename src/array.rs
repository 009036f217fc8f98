use std::marker::{PhantomData};
use std::ops::{Index, IndexMut};

use super::{Error, Result, TypeId, Element, Storage, Allocate, IndexMap, DynamicIndexMap, Selection};
use super::{ArrayLike, ArrayView, ArrayViewMut, Subscript, check_index, check_size};

/// A dense, row-major array of `T`s.
///
/// The elements live in a [`Storage`] `S` and are addressed through an
/// [`IndexMap`] `M`. The defaults give a heap-allocated array whose rank is
/// chosen at run time.
///
/// An array may be empty, meaning it has no index map and no elements. This
/// is the state of [`Array::default()`] and of an array that has been
/// [`take()`](Array::take())n from. An empty array has `size() == 0` and
/// `rank() == 0`.
///
/// ```
/// use mdcore::{Array};
/// let mut a = Array::<f32>::new(&[3, 4]).unwrap();
/// assert_eq!((a.rank(), a.size()), (2, 12));
/// *a.element_mut(&[1, 2]).unwrap() = 42.0;
/// assert_eq!(a[1 * 4 + 2], 42.0);
/// assert_eq!(a[[1, 2]], 42.0);
/// assert!(a.element(&[3, 0]).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Array<T, M = DynamicIndexMap, S = Vec<T>> {
    map: Option<M>,
    data: S,
    _elem: PhantomData<T>,
}

impl<T, M: IndexMap, S: Storage<Elem=T>> Array<T, M, S> {
    pub(crate) fn from_raw(map: M, data: S) -> Self {
        debug_assert_eq!(map.size(), data.len());
        Self {map: Some(map), data, _elem: PhantomData}
    }

    /// Constructs an array of shape `shape` with default elements.
    pub fn new(shape: &[usize]) -> Result<Self> where T: Default, S: Allocate {
        let map = M::from_shape(shape)?;
        let data = S::allocate(map.size())?;
        Ok(Self::from_raw(map, data))
    }

    /// Constructs an array of shape `shape` with every element `value`.
    pub fn filled(shape: &[usize], value: T) -> Result<Self> where T: Clone, S: Allocate {
        let map = M::from_shape(shape)?;
        let data = S::allocate_filled(map.size(), value)?;
        Ok(Self::from_raw(map, data))
    }

    /// Constructs an array of shape `shape` by calling `f` on each index in
    /// row-major order.
    ///
    /// ```
    /// use mdcore::{Array};
    /// let a = Array::<usize>::from_fn(&[2, 3], |i| 10 * i[0] + i[1]).unwrap();
    /// assert_eq!(a.as_slice(), [0, 1, 2, 10, 11, 12]);
    /// ```
    pub fn from_fn(shape: &[usize], mut f: impl FnMut(&[usize]) -> T) -> Result<Self> where S: Allocate {
        let map = M::from_shape(shape)?;
        let mut items = Vec::with_capacity(map.size());
        map.each(|i| items.push(f(i)));
        let data = S::from_items(map.size(), items)?;
        Ok(Self::from_raw(map, data))
    }

    /// Wraps existing `storage`, which must hold exactly as many elements as
    /// `shape` requires, or this fails with [`Error::SizeMismatch`].
    pub fn from_storage(shape: &[usize], storage: S) -> Result<Self> {
        Self::from_parts(M::from_shape(shape)?, storage)
    }

    /// Like [`from_storage()`](Self::from_storage()) with a ready-made map.
    pub fn from_parts(map: M, storage: S) -> Result<Self> {
        check_size(map.size(), storage.len())?;
        Ok(Self::from_raw(map, storage))
    }

    /// Copies the elements of `src`, adopting its shape.
    pub fn from_like(src: &impl ArrayLike<Elem=T>) -> Result<Self> where S: Allocate {
        if src.rank() == 0 && src.size() == 0 {
            let data = S::from_items(0, std::iter::empty())?;
            return Ok(Self {map: None, data, _elem: PhantomData});
        }
        Self::from_like_with_shape(src.dims(), src)
    }

    /// Copies the elements of `src` into an array of shape `shape`. Fails with
    /// [`Error::SizeMismatch`] if the element counts differ.
    pub fn from_like_with_shape(shape: &[usize], src: &impl ArrayLike<Elem=T>) -> Result<Self> where S: Allocate {
        let map = M::from_shape(shape)?;
        check_size(map.size(), src.size())?;
        let data = S::from_items(map.size(), src.values())?;
        Ok(Self::from_raw(map, data))
    }

    /// Moves the contents out of `self`, leaving it empty.
    ///
    /// ```
    /// use mdcore::{Array};
    /// let mut b = Array::<u8>::filled(&[2, 3, 4], 9).unwrap();
    /// let a = b.take();
    /// assert_eq!((b.size(), b.rank()), (0, 0));
    /// assert_eq!(a.size(), 24);
    /// ```
    pub fn take(&mut self) -> Self where S: Default {
        std::mem::take(self)
    }

    /// Whether the array is empty (see the type-level docs).
    pub fn is_empty(&self) -> bool { self.map.is_none() }

    /// The number of elements.
    pub fn size(&self) -> usize { self.map.as_ref().map_or(0, IndexMap::size) }

    /// The number of dimensions.
    pub fn rank(&self) -> usize { self.map.as_ref().map_or(0, IndexMap::rank) }

    /// The extent of each dimension.
    pub fn dims(&self) -> &[usize] {
        match &self.map {
            Some(map) => map.dims(),
            None => &[],
        }
    }

    /// Returns the shape in a container of the caller's choosing.
    pub fn shape<C: FromIterator<usize>>(&self) -> C { self.dims().iter().copied().collect() }

    /// Fails with [`Error::MemoryNotAllocated`] if the array is empty.
    pub fn index_map(&self) -> Result<&M> { self.map.as_ref().ok_or(Error::MemoryNotAllocated) }

    pub fn storage(&self) -> &S { &self.data }

    /// Returns the elements in row-major order.
    pub fn as_slice(&self) -> &[T] {
        if self.map.is_none() { return &[]; }
        self.data.as_slice()
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        if self.map.is_none() { return &mut []; }
        self.data.as_mut_slice()
    }

    pub fn type_id(&self) -> TypeId where T: Element { T::TYPE_ID }

    /// Checked access to element `i` in row-major order. Fails with
    /// [`Error::IndexOutOfRange`] unless `i < size()`.
    pub fn at(&self, i: usize) -> Result<&T> {
        check_index(i, self.size())?;
        Ok(&self.as_slice()[i])
    }

    pub fn at_mut(&mut self, i: usize) -> Result<&mut T> {
        check_index(i, self.size())?;
        Ok(&mut self.as_mut_slice()[i])
    }

    /// Checked write: `*self.at_mut(i)? = value`.
    pub fn insert(&mut self, i: usize, value: T) -> Result<()> {
        *self.at_mut(i)? = value;
        Ok(())
    }

    /// Checked multi-index access.
    ///
    /// Fails with [`Error::MemoryNotAllocated`] if the array is empty, with
    /// [`Error::ShapeMismatch`] if `index.len() != rank()`, and with
    /// [`Error::IndexOutOfRange`] if any component is out of bounds.
    pub fn element(&self, index: &[usize]) -> Result<&T> {
        let map = self.index_map()?;
        map.check_index(index)?;
        Ok(&self.data.as_slice()[map.offset_unchecked(index)])
    }

    pub fn element_mut(&mut self, index: &[usize]) -> Result<&mut T> {
        let map = self.map.as_ref().ok_or(Error::MemoryNotAllocated)?;
        map.check_index(index)?;
        let offset = map.offset_unchecked(index);
        Ok(&mut self.data.as_mut_slice()[offset])
    }

    /// The first element. Fails with [`Error::IndexOutOfRange`] if there is
    /// none, including when the array is empty.
    pub fn front(&self) -> Result<&T> { self.at(0) }

    pub fn front_mut(&mut self) -> Result<&mut T> { self.at_mut(0) }

    /// The last element. Fails like [`front()`](Self::front()).
    pub fn back(&self) -> Result<&T> {
        let n = self.size();
        if n == 0 { return Err(Error::IndexOutOfRange {index: 0, extent: 0}); }
        self.at(n - 1)
    }

    pub fn back_mut(&mut self) -> Result<&mut T> {
        let n = self.size();
        if n == 0 { return Err(Error::IndexOutOfRange {index: 0, extent: 0}); }
        self.at_mut(n - 1)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> { self.as_slice().iter() }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> { self.as_mut_slice().iter_mut() }

    pub fn fill(&mut self, value: T) where T: Clone { self.as_mut_slice().fill(value); }

    /// Overwrite every element with those of `src`.
    ///
    /// A scalar `src` is broadcast. Otherwise `src` must have as many
    /// elements as `self`, or this fails with [`Error::SizeMismatch`]
    /// without writing anything. Shapes need not agree.
    pub fn assign(&mut self, src: &impl ArrayLike<Elem=T>) -> Result<()> where T: Clone {
        if src.is_scalar() {
            self.fill(src.value(0));
            return Ok(());
        }
        check_size(self.size(), src.size())?;
        self.iter_mut().zip(src.values()).for_each(|(t, u)| *t = u);
        Ok(())
    }

    /// A view of the whole array. Fails with [`Error::MemoryNotAllocated`]
    /// if the array is empty.
    pub fn view(&self) -> Result<ArrayView<'_, T>> {
        let sel = Selection::full(self.index_map()?);
        Ok(ArrayView::new(self.data.as_slice(), sel))
    }

    pub fn view_mut(&mut self) -> Result<ArrayViewMut<'_, T>> {
        let sel = Selection::full(self.index_map()?);
        Ok(ArrayViewMut::new(self.data.as_mut_slice(), sel))
    }

    /// Returns an element if `index` is a list of integers, or a view if it
    /// is a list of [`Sel`]s. See [`Subscript`].
    ///
    /// Fails with [`Error::MemoryNotAllocated`] if the array is empty.
    ///
    /// [`Sel`]: super::Sel
    ///
    /// ```
    /// use mdcore::{s, Array};
    /// let a = Array::<i32>::from_fn(&[3, 4], |i| (i[0] * 4 + i[1]) as i32).unwrap();
    /// assert_eq!(a.subscript([2, 1]), Ok(&9));
    /// let row = a.subscript(s![2]).unwrap();
    /// assert_eq!(row.dims(), [4]);
    /// ```
    pub fn subscript<I: Subscript>(&self, index: I) -> Result<I::Output<'_, T>> {
        let map = self.index_map()?;
        index.subscript(self.data.as_slice(), map.layout())
    }

    pub fn subscript_mut<I: Subscript>(&mut self, index: I) -> Result<I::OutputMut<'_, T>> {
        let map = self.map.as_ref().ok_or(Error::MemoryNotAllocated)?;
        index.subscript_mut(self.data.as_mut_slice(), map.layout())
    }
}

impl<T, M, S: Default> Default for Array<T, M, S> {
    fn default() -> Self { Self {map: None, data: S::default(), _elem: PhantomData} }
}

impl<T, M: IndexMap, S: Storage<Elem=T>> AsRef<[T]> for Array<T, M, S> {
    fn as_ref(&self) -> &[T] { self.as_slice() }
}

impl<T, M: IndexMap, S: Storage<Elem=T>> AsMut<[T]> for Array<T, M, S> {
    fn as_mut(&mut self) -> &mut [T] { self.as_mut_slice() }
}

/// Unchecked in the sense of [`Array::at()`]: panics if `i` is out of range.
impl<T, M: IndexMap, S: Storage<Elem=T>> Index<usize> for Array<T, M, S> {
    type Output = T;
    #[inline(always)]
    fn index(&self, i: usize) -> &T { &self.as_slice()[i] }
}

impl<T, M: IndexMap, S: Storage<Elem=T>> IndexMut<usize> for Array<T, M, S> {
    #[inline(always)]
    fn index_mut(&mut self, i: usize) -> &mut T { &mut self.as_mut_slice()[i] }
}

/// Panics if the index is invalid for any of the reasons given in
/// [`Array::element()`].
impl<T, M: IndexMap, S: Storage<Elem=T>, const N: usize> Index<[usize; N]> for Array<T, M, S> {
    type Output = T;
    fn index(&self, index: [usize; N]) -> &T {
        match self.element(&index) {
            Ok(t) => t,
            Err(e) => panic!("{}", e),
        }
    }
}

impl<T, M: IndexMap, S: Storage<Elem=T>, const N: usize> IndexMut<[usize; N]> for Array<T, M, S> {
    fn index_mut(&mut self, index: [usize; N]) -> &mut T {
        match self.element_mut(&index) {
            Ok(t) => t,
            Err(e) => panic!("{}", e),
        }
    }
}

impl<T: Clone, M: IndexMap, S: Storage<Elem=T>> ArrayLike for Array<T, M, S> {
    type Elem = T;
    #[inline(always)]
    fn size(&self) -> usize { Array::size(self) }
    #[inline(always)]
    fn dims(&self) -> &[usize] { Array::dims(self) }
    #[inline(always)]
    fn value(&self, i: usize) -> T { self.as_slice()[i].clone() }
}

impl<'a, T, M: IndexMap, S: Storage<Elem=T>> IntoIterator for &'a Array<T, M, S> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter { self.iter() }
}

impl<'a, T, M: IndexMap, S: Storage<Elem=T>> IntoIterator for &'a mut Array<T, M, S> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;
    fn into_iter(self) -> Self::IntoIter { self.iter_mut() }
}

/// Arrays are equal if they have the same shape and elements, regardless of
/// how the shape and elements are stored.
impl<T, U, M, N, S, R> PartialEq<Array<U, N, R>> for Array<T, M, S> where
    T: PartialEq<U>,
    M: IndexMap, S: Storage<Elem=T>,
    N: IndexMap, R: Storage<Elem=U>,
{
    fn eq(&self, other: &Array<U, N, R>) -> bool {
        self.dims() == other.dims() && self.as_slice() == other.as_slice()
    }
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::{Rng, SeedableRng};
    use rand::rngs::{StdRng};

    use super::*;
    use crate::{static_shape, FixedIndexMap, StaticIndexMap, Scalar};

    static_shape!(TwoByThree = [2, 3]);

    #[test]
    fn element_access() {
        let mut a = Array::<i32>::new(&[3, 4]).unwrap();
        assert_eq!(a.rank(), 2);
        assert_eq!(a.size(), 12);
        a[[1, 2]] = 42;
        assert_eq!(a[1 * 4 + 2], 42);
        assert_eq!(a.at(6), Ok(&42));
        assert_eq!(a.element(&[1, 2]), Ok(&42));
        assert_eq!(a.element(&[3, 0]), Err(Error::IndexOutOfRange {index: 3, extent: 3}));
        assert_eq!(a.element(&[1, 2, 0]), Err(Error::arity(2, 3)));
        assert_eq!(a.at(12), Err(Error::IndexOutOfRange {index: 12, extent: 12}));
        assert_eq!(a.insert(12, 0), Err(Error::IndexOutOfRange {index: 12, extent: 12}));
        a.insert(11, 7).unwrap();
        assert_eq!(a.back(), Ok(&7));
        assert_eq!(a.front(), Ok(&0));
        assert_eq!(a.type_id(), TypeId::Int32);
    }

    #[test]
    fn construction_errors() {
        assert_eq!(
            Array::<u8>::from_storage(&[2, 3], vec![0; 5]),
            Err(Error::SizeMismatch {expected: 6, actual: 5}),
        );
        assert_eq!(
            Array::<u8, FixedIndexMap<2>>::new(&[2, 3, 4]).err(),
            Some(Error::arity(2, 3)),
        );
        assert_eq!(
            Array::<u8, StaticIndexMap<TwoByThree>, [u8; 6]>::new(&[3, 2]).err(),
            Some(Error::shapes(&[2, 3], &[3, 2])),
        );
    }

    #[test]
    fn storage_flavours() {
        let a = Array::<f64, StaticIndexMap<TwoByThree>, [f64; 6]>::filled(&[2, 3], 1.5).unwrap();
        let b = Array::<f64, FixedIndexMap<2>, Box<[f64]>>::filled(&[2, 3], 1.5).unwrap();
        let c = Array::<f64>::filled(&[2, 3], 1.5).unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_ne!(c, Array::<f64>::filled(&[3, 2], 1.5).unwrap());
        let mut buffer = [0u16; 4];
        {
            let mut r = Array::<u16, DynamicIndexMap, &mut [u16]>::from_storage(&[2, 2], &mut buffer[..]).unwrap();
            r[[1, 0]] = 5;
        }
        assert_eq!(buffer, [0, 0, 5, 0]);
    }

    #[test]
    fn empty_array() {
        let mut a = Array::<f32>::default();
        assert_eq!((a.size(), a.rank()), (0, 0));
        assert!(a.is_empty());
        assert_eq!(a.index_map().err(), Some(Error::MemoryNotAllocated));
        assert_eq!(a.element(&[]), Err(Error::MemoryNotAllocated));
        let none: [crate::Sel; 0] = crate::s![];
        assert_eq!(a.subscript(none).err(), Some(Error::MemoryNotAllocated));
        assert_eq!(a.front(), Err(Error::IndexOutOfRange {index: 0, extent: 0}));
        assert_eq!(a.back_mut(), Err(Error::IndexOutOfRange {index: 0, extent: 0}));
        assert_eq!(a.iter().count(), 0);
        assert!(a.view().is_err());
        assert_eq!(Array::<f32>::from_like(&a).unwrap().size(), 0);
    }

    #[test]
    fn move_leaves_source_empty() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut b = Array::<f64>::from_fn(&[2, 3, 4], |_| rng.gen()).unwrap();
        let before = b.as_slice().to_vec();
        let a = b.take();
        assert_eq!(b.size(), 0);
        assert_eq!(b.rank(), 0);
        assert_eq!(a.dims(), [2, 3, 4]);
        assert_eq!(a.as_slice(), before);
        let c = std::mem::take(&mut b);
        assert!(c.is_empty());
    }

    #[test]
    fn copies_are_independent() {
        let a = Array::<i64>::filled(&[2, 2], 3).unwrap();
        let mut b = a.clone();
        b[0] = -1;
        assert_eq!(a[0], 3);
        assert_eq!(b[0], -1);
    }

    #[test]
    fn from_like() {
        let a = Array::<u32>::from_fn(&[4, 3], |i| (i[0] * 3 + i[1]) as u32).unwrap();
        let col = a.subscript(crate::s![.., 1]).unwrap();
        let b = Array::<u32>::from_like(&col).unwrap();
        assert_eq!(b.dims(), [4]);
        assert_eq!(b.as_slice(), [1, 4, 7, 10]);
        let c = Array::<u32, FixedIndexMap<2>>::from_like_with_shape(&[2, 2], &col).unwrap();
        assert_eq!(c[[1, 1]], 10);
        assert_eq!(
            Array::<u32>::from_like_with_shape(&[3], &col).err(),
            Some(Error::SizeMismatch {expected: 3, actual: 4}),
        );
        let d = Array::<u32, FixedIndexMap<2>>::from_like(&(&a * 2u32)).unwrap();
        assert_eq!(d[[3, 2]], 22);
    }

    #[test]
    fn assign() {
        let mut a = Array::<f64>::new(&[2, 3]).unwrap();
        let b = Array::<f64>::filled(&[3, 2], 2.0).unwrap();
        a.assign(&b).unwrap();
        assert_eq!(a.as_slice(), [2.0; 6]);
        a.assign(&(&b * 3.0)).unwrap();
        assert_eq!(a.as_slice(), [6.0; 6]);
        a.assign(&Scalar(1.0)).unwrap();
        assert_eq!(a.as_slice(), [1.0; 6]);
        let c = Array::<f64>::new(&[5]).unwrap();
        assert_eq!(a.assign(&c), Err(Error::SizeMismatch {expected: 6, actual: 5}));
        assert_eq!(a.as_slice(), [1.0; 6]);
    }

    #[test]
    fn iteration() {
        let mut a = Array::<u8>::from_fn(&[5], |i| i[0] as u8).unwrap();
        assert_eq!(a.iter().rev().copied().collect::<Vec<_>>(), [4, 3, 2, 1, 0]);
        for t in &mut a { *t *= 2; }
        assert_eq!((&a).into_iter().sum::<u8>(), 20);
        *a.front_mut().unwrap() = 100;
        assert_eq!(a.as_ref()[0], 100);
    }

    #[test]
    fn round_trip_5x7() {
        let a = Array::<u8>::new(&[5, 7]).unwrap();
        let map = a.index_map().unwrap();
        for k in 0..35 {
            let index: Vec<usize> = map.index(k);
            assert_eq!(map.offset(&index), Ok(k));
        }
    }

    proptest! {
        #[test]
        fn size_and_access(dims in prop::collection::vec(0usize..5, 0..4), seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let a = Array::<i16>::from_fn(&dims, |_| rng.gen()).unwrap();
            prop_assert_eq!(a.size(), dims.iter().product::<usize>());
            prop_assert_eq!(a.rank(), dims.len());
            prop_assert_eq!(a.shape::<Vec<usize>>(), dims);
            for i in 0..a.size() {
                prop_assert_eq!(Ok(&a[i]), a.at(i));
            }
            prop_assert!(a.at(a.size()).is_err());
        }
    }
}
