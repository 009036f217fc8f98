//! Borrowed, possibly strided, windows onto the storage of an [`Array`].
//!
//! [`Array`]: super::Array

use std::ops::{Index, IndexMut};
use std::iter::{FusedIterator};

use super::{Error, Result, TypeId, Element, Selection, Subscript, ArrayLike, Array, check_index, check_size};
use super::index_map::{c_strides_of};

/// Read-only view of some of the elements of an array.
///
/// Obtained from [`Array::subscript()`] with a [`Sel`] argument, or from
/// [`Array::view()`]. The borrow checker ensures the array outlives the view.
///
/// [`Sel`]: super::Sel
///
/// ```
/// use mdcore::{s, Array};
/// let a = Array::<u32>::from_fn(&[3, 4], |i| (i[0] * 4 + i[1]) as u32).unwrap();
/// let col = a.subscript(s![.., 1]).unwrap();
/// assert_eq!(col.dims(), [3]);
/// assert_eq!(col.iter().copied().collect::<Vec<_>>(), [1, 5, 9]);
/// assert!(col.data().is_err());
/// ```
pub struct ArrayView<'a, T> {
    data: &'a [T],
    sel: Selection,
}

impl<'a, T> ArrayView<'a, T> {
    pub(crate) fn new(data: &'a [T], sel: Selection) -> Self { Self {data, sel} }

    pub fn selection(&self) -> &Selection { &self.sel }

    pub fn size(&self) -> usize { self.sel.size() }

    pub fn rank(&self) -> usize { self.sel.rank() }

    pub fn dims(&self) -> &[usize] { self.sel.dims() }

    pub fn shape<C: FromIterator<usize>>(&self) -> C { self.sel.shape() }

    pub fn is_contiguous(&self) -> bool { self.sel.is_contiguous() }

    pub fn type_id(&self) -> TypeId where T: Element { T::TYPE_ID }

    /// Checked access to element `i` in row-major order.
    pub fn at(&self, i: usize) -> Result<&'a T> {
        check_index(i, self.size())?;
        Ok(&self.data[self.sel.linear_offset(i)])
    }

    /// Checked multi-index access.
    pub fn element(&self, index: &[usize]) -> Result<&'a T> {
        Ok(&self.data[self.sel.storage_offset(index)?])
    }

    /// Select an element or a sub-view of this view.
    pub fn subscript<I: Subscript>(&self, index: I) -> Result<I::Output<'a, T>> {
        index.subscript(self.data, self.sel.layout())
    }

    /// The first selected element. Fails with [`Error::IndexOutOfRange`]
    /// if the view has no elements.
    pub fn front(&self) -> Result<&'a T> { self.at(0) }

    pub fn back(&self) -> Result<&'a T> { self.at(last(self.size())?) }

    pub fn iter(&self) -> Iter<'a, T> { Iter::new(self.data, self.sel.clone()) }

    /// The selected elements as one slice. Fails with
    /// [`Error::ShapeMismatch`] unless the view is contiguous.
    pub fn data(&self) -> Result<&'a [T]> {
        if !self.is_contiguous() {
            return Err(Error::shapes(&c_strides_of(self.dims()), self.sel.strides()));
        }
        // The offset of an empty selection need not lie inside `data`.
        if self.size() == 0 { return Ok(&[]); }
        let start = self.sel.offset();
        Ok(&self.data[start..start + self.size()])
    }

    /// Copy the selected elements into a new array of the same shape.
    pub fn to_array(&self) -> Array<T> where T: Clone {
        ArrayLike::to_array(self)
    }
}

impl<'a, T> Clone for ArrayView<'a, T> {
    fn clone(&self) -> Self { Self {data: self.data, sel: self.sel.clone()} }
}

impl<'a, T: std::fmt::Debug> std::fmt::Debug for ArrayView<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArrayView")
            .field("dims", &self.dims())
            .field("elements", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}

/// Panics if `i` is out of range.
impl<'a, T> Index<usize> for ArrayView<'a, T> {
    type Output = T;
    fn index(&self, i: usize) -> &T {
        match self.at(i) {
            Ok(t) => t,
            Err(e) => panic!("{}", e),
        }
    }
}

/// Panics if the index is invalid for any of the reasons given in
/// [`ArrayView::element()`].
impl<'a, T, const N: usize> Index<[usize; N]> for ArrayView<'a, T> {
    type Output = T;
    fn index(&self, index: [usize; N]) -> &T {
        match self.element(&index) {
            Ok(t) => t,
            Err(e) => panic!("{}", e),
        }
    }
}

impl<'a, T: Clone> ArrayLike for ArrayView<'a, T> {
    type Elem = T;
    fn size(&self) -> usize { self.sel.size() }
    fn dims(&self) -> &[usize] { self.sel.dims() }
    #[inline]
    fn value(&self, i: usize) -> T { self.data[self.sel.linear_offset(i)].clone() }
}

impl<'a, T> IntoIterator for ArrayView<'a, T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter { Iter::new(self.data, self.sel) }
}

impl<'a, 'b, T> IntoIterator for &'b ArrayView<'a, T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter { self.iter() }
}

impl<'a, 'b, T: PartialEq> PartialEq<ArrayView<'b, T>> for ArrayView<'a, T> {
    fn eq(&self, other: &ArrayView<'b, T>) -> bool {
        self.dims() == other.dims() && self.iter().eq(other.iter())
    }
}

// ----------------------------------------------------------------------------

/// Read-write view of some of the elements of an array.
///
/// Obtained from [`Array::subscript_mut()`] with a [`Sel`] argument, or from
/// [`Array::view_mut()`].
///
/// [`Sel`]: super::Sel
///
/// ```
/// use mdcore::{s, Array};
/// let mut a = Array::<i64>::new(&[10, 3]).unwrap();
/// for i in 0..10 {
///     a.subscript_mut(s![i, 0..3]).unwrap().fill(i as i64);
/// }
/// assert_eq!(a.element(&[7, 2]), Ok(&7));
/// ```
pub struct ArrayViewMut<'a, T> {
    data: &'a mut [T],
    sel: Selection,
}

impl<'a, T> ArrayViewMut<'a, T> {
    pub(crate) fn new(data: &'a mut [T], sel: Selection) -> Self { Self {data, sel} }

    pub fn selection(&self) -> &Selection { &self.sel }

    pub fn size(&self) -> usize { self.sel.size() }

    pub fn rank(&self) -> usize { self.sel.rank() }

    pub fn dims(&self) -> &[usize] { self.sel.dims() }

    pub fn shape<C: FromIterator<usize>>(&self) -> C { self.sel.shape() }

    pub fn is_contiguous(&self) -> bool { self.sel.is_contiguous() }

    pub fn type_id(&self) -> TypeId where T: Element { T::TYPE_ID }

    /// Reborrow as a read-only view.
    pub fn view(&self) -> ArrayView<'_, T> { ArrayView::new(self.data, self.sel.clone()) }

    pub fn at(&self, i: usize) -> Result<&T> {
        check_index(i, self.size())?;
        Ok(&self.data[self.sel.linear_offset(i)])
    }

    pub fn at_mut(&mut self, i: usize) -> Result<&mut T> {
        check_index(i, self.size())?;
        Ok(&mut self.data[self.sel.linear_offset(i)])
    }

    /// Checked write: `*self.at_mut(i)? = value`.
    pub fn insert(&mut self, i: usize, value: T) -> Result<()> {
        *self.at_mut(i)? = value;
        Ok(())
    }

    pub fn element(&self, index: &[usize]) -> Result<&T> {
        Ok(&self.data[self.sel.storage_offset(index)?])
    }

    pub fn element_mut(&mut self, index: &[usize]) -> Result<&mut T> {
        Ok(&mut self.data[self.sel.storage_offset(index)?])
    }

    pub fn subscript<I: Subscript>(&self, index: I) -> Result<I::Output<'_, T>> {
        index.subscript(self.data, self.sel.layout())
    }

    pub fn subscript_mut<I: Subscript>(&mut self, index: I) -> Result<I::OutputMut<'_, T>> {
        index.subscript_mut(self.data, self.sel.layout())
    }

    pub fn iter(&self) -> Iter<'_, T> { Iter::new(self.data, self.sel.clone()) }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> { IterMut::new(self.data, self.sel.clone()) }

    /// See [`ArrayView::front()`].
    pub fn front(&self) -> Result<&T> { self.at(0) }

    pub fn front_mut(&mut self) -> Result<&mut T> { self.at_mut(0) }

    pub fn back(&self) -> Result<&T> { self.at(last(self.size())?) }

    pub fn back_mut(&mut self) -> Result<&mut T> {
        let i = last(self.size())?;
        self.at_mut(i)
    }

    /// See [`ArrayView::data()`].
    pub fn data(&self) -> Result<&[T]> { self.view().data() }

    /// Mutable version of [`data()`](Self::data()).
    pub fn data_mut(&mut self) -> Result<&mut [T]> {
        if !self.is_contiguous() {
            return Err(Error::shapes(&c_strides_of(self.dims()), self.sel.strides()));
        }
        if self.size() == 0 { return Ok(&mut []); }
        let start = self.sel.offset();
        let end = start + self.size();
        Ok(&mut self.data[start..end])
    }

    pub fn fill(&mut self, value: T) where T: Clone {
        self.iter_mut().for_each(|t| *t = value.clone());
    }

    /// Overwrite the selected elements with those of `src`.
    ///
    /// A scalar `src` is broadcast. Otherwise `src` must have as many
    /// elements as `self`, or this fails with [`Error::SizeMismatch`]
    /// without writing anything.
    pub fn assign(&mut self, src: &impl ArrayLike<Elem=T>) -> Result<()> where T: Clone {
        if src.is_scalar() {
            let value = src.value(0);
            self.iter_mut().for_each(|t| *t = value.clone());
            return Ok(());
        }
        check_size(self.size(), src.size())?;
        self.iter_mut().zip(src.values()).for_each(|(t, u)| *t = u);
        Ok(())
    }

    pub fn to_array(&self) -> Array<T> where T: Clone { self.view().to_array() }
}

impl<'a, T: std::fmt::Debug> std::fmt::Debug for ArrayViewMut<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self.view(), f)
    }
}

impl<'a, T> Index<usize> for ArrayViewMut<'a, T> {
    type Output = T;
    fn index(&self, i: usize) -> &T {
        match self.at(i) {
            Ok(t) => t,
            Err(e) => panic!("{}", e),
        }
    }
}

impl<'a, T> IndexMut<usize> for ArrayViewMut<'a, T> {
    fn index_mut(&mut self, i: usize) -> &mut T {
        match self.at_mut(i) {
            Ok(t) => t,
            Err(e) => panic!("{}", e),
        }
    }
}

impl<'a, T, const N: usize> Index<[usize; N]> for ArrayViewMut<'a, T> {
    type Output = T;
    fn index(&self, index: [usize; N]) -> &T {
        match self.element(&index) {
            Ok(t) => t,
            Err(e) => panic!("{}", e),
        }
    }
}

impl<'a, T, const N: usize> IndexMut<[usize; N]> for ArrayViewMut<'a, T> {
    fn index_mut(&mut self, index: [usize; N]) -> &mut T {
        match self.element_mut(&index) {
            Ok(t) => t,
            Err(e) => panic!("{}", e),
        }
    }
}

impl<'a, T: Clone> ArrayLike for ArrayViewMut<'a, T> {
    type Elem = T;
    fn size(&self) -> usize { self.sel.size() }
    fn dims(&self) -> &[usize] { self.sel.dims() }
    #[inline]
    fn value(&self, i: usize) -> T { self.data[self.sel.linear_offset(i)].clone() }
}

impl<'a, T> IntoIterator for ArrayViewMut<'a, T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;
    fn into_iter(self) -> Self::IntoIter { IterMut::new(self.data, self.sel) }
}

impl<'a, 'b, T> IntoIterator for &'b mut ArrayViewMut<'a, T> {
    type Item = &'b mut T;
    type IntoIter = IterMut<'b, T>;
    fn into_iter(self) -> Self::IntoIter { self.iter_mut() }
}

/// Position of the last of `size` elements.
fn last(size: usize) -> Result<usize> {
    size.checked_sub(1).ok_or(Error::IndexOutOfRange {index: 0, extent: 0})
}

// ----------------------------------------------------------------------------

/// Iterates over the elements of a view in row-major order.
pub struct Iter<'a, T> {
    data: &'a [T],
    sel: Selection,
    front: usize,
    back: usize,
}

impl<'a, T> Iter<'a, T> {
    fn new(data: &'a [T], sel: Selection) -> Self {
        let back = sel.size();
        Self {data, sel, front: 0, back}
    }
}

impl<'a, T> Clone for Iter<'a, T> {
    fn clone(&self) -> Self {
        Self {data: self.data, sel: self.sel.clone(), front: self.front, back: self.back}
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        if self.front >= self.back { return None; }
        let offset = self.sel.linear_offset(self.front);
        self.front += 1;
        Some(&self.data[offset])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.back - self.front;
        (n, Some(n))
    }

    fn nth(&mut self, n: usize) -> Option<&'a T> {
        self.front = self.front.saturating_add(n).min(self.back);
        self.next()
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    #[inline]
    fn next_back(&mut self) -> Option<&'a T> {
        if self.front >= self.back { return None; }
        self.back -= 1;
        Some(&self.data[self.sel.linear_offset(self.back)])
    }

    fn nth_back(&mut self, n: usize) -> Option<&'a T> {
        self.back = self.back.saturating_sub(n).max(self.front);
        self.next_back()
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T> FusedIterator for Iter<'a, T> {}

// ----------------------------------------------------------------------------

/// Iterates mutably over the elements of a view in row-major order.
///
/// Row-major storage offsets of a selection are strictly increasing, so the
/// unvisited elements always lie in one sub-slice, `rest`, which is split
/// as elements are handed out.
pub struct IterMut<'a, T> {
    rest: &'a mut [T],
    /// The storage offset of `rest[0]`.
    base: usize,
    sel: Selection,
    front: usize,
    back: usize,
}

impl<'a, T> IterMut<'a, T> {
    fn new(data: &'a mut [T], sel: Selection) -> Self {
        let back = sel.size();
        Self {rest: data, base: 0, sel, front: 0, back}
    }

    /// Split into the first `k` remaining elements and the rest.
    pub fn split_at(self, k: usize) -> (Self, Self) {
        let Self {rest, base, sel, front, back} = self;
        let mid = front.saturating_add(k).min(back);
        let split = if mid < back { sel.linear_offset(mid) - base } else { rest.len() };
        let (head, tail) = rest.split_at_mut(split);
        let right = Self {rest: tail, base: base + split, sel: sel.clone(), front: mid, back};
        let left = Self {rest: head, base, sel, front, back: mid};
        (left, right)
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    #[inline]
    fn next(&mut self) -> Option<&'a mut T> {
        if self.front >= self.back { return None; }
        let offset = self.sel.linear_offset(self.front);
        self.front += 1;
        let rest = std::mem::take(&mut self.rest);
        let (_, tail) = rest.split_at_mut(offset - self.base);
        let (t, tail) = tail.split_first_mut()?;
        self.rest = tail;
        self.base = offset + 1;
        Some(t)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.back - self.front;
        (n, Some(n))
    }

    fn nth(&mut self, n: usize) -> Option<&'a mut T> {
        self.front = self.front.saturating_add(n).min(self.back);
        self.next()
    }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {
    #[inline]
    fn next_back(&mut self) -> Option<&'a mut T> {
        if self.front >= self.back { return None; }
        self.back -= 1;
        let offset = self.sel.linear_offset(self.back);
        let rest = std::mem::take(&mut self.rest);
        let (head, tail) = rest.split_at_mut(offset - self.base);
        self.rest = head;
        tail.first_mut()
    }
}

impl<'a, T> ExactSizeIterator for IterMut<'a, T> {}

impl<'a, T> FusedIterator for IterMut<'a, T> {}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use crate::{s, Array, Error, Slice, Scalar, TypeId};

    fn grid() -> Array<i32> {
        Array::from_fn(&[4, 5], |i| (i[0] * 5 + i[1]) as i32).unwrap()
    }

    #[test]
    fn strided_reads() {
        let a = grid();
        let v = a.subscript(s![Slice::with_stride(0, 4, 2).unwrap(), 1..4]).unwrap();
        assert_eq!(v.dims(), [2, 3]);
        assert_eq!(v.iter().copied().collect::<Vec<_>>(), [1, 2, 3, 11, 12, 13]);
        assert_eq!(v.iter().rev().copied().collect::<Vec<_>>(), [13, 12, 11, 3, 2, 1]);
        assert_eq!(v.iter().nth(4), Some(&12));
        assert_eq!(v.iter().len(), 6);
        assert_eq!(v[3], 11);
        assert_eq!(v.at(6), Err(Error::IndexOutOfRange {index: 6, extent: 6}));
        assert_eq!(v.element(&[1, 2]), Ok(&13));
        assert_eq!(v.element(&[1]), Err(Error::arity(2, 1)));
        assert_eq!(v.type_id(), TypeId::Int32);
    }

    #[test]
    fn views_of_views() {
        let a = grid();
        let v = a.subscript(s![1..]).unwrap();
        let w = v.subscript(s![.., 4]).unwrap();
        assert_eq!(w.iter().copied().collect::<Vec<_>>(), [9, 14, 19]);
        assert_eq!(*v.subscript([2, 0]).unwrap(), 15);
    }

    #[test]
    fn contiguous_data() {
        let a = grid();
        let rows = a.subscript(s![1..3]).unwrap();
        assert_eq!(rows.data(), Ok(&[5, 6, 7, 8, 9, 10, 11, 12, 13, 14][..]));
        let col = a.subscript(s![.., 0]).unwrap();
        assert!(matches!(col.data(), Err(Error::ShapeMismatch {..})));
        assert_eq!(col.to_array().as_slice(), [0, 5, 10, 15]);
    }

    #[test]
    fn empty_selection_data() {
        let mut a = Array::<i32>::new(&[0, 3]).unwrap();
        let col = a.subscript(s![.., 1]).unwrap();
        assert_eq!(col.size(), 0);
        assert_eq!(col.data(), Ok(&[][..]));
        let mut col = a.subscript_mut(s![.., 2]).unwrap();
        assert_eq!(col.data_mut().map(|d| d.len()), Ok(0));
    }

    #[test]
    fn ends_and_multi_index() {
        let mut a = grid();
        let v = a.subscript(s![Slice::with_stride(1, 4, 2).unwrap(), 1..5]).unwrap();
        assert_eq!(v.front(), Ok(&6));
        assert_eq!(v.back(), Ok(&19));
        assert_eq!(v[[1, 2]], 18);
        let none = a.subscript(s![1..3, Slice::new(0, 1).unwrap()]).unwrap();
        assert_eq!(none.subscript(s![.., 0]).unwrap().back(), Ok(&10));

        let mut w = a.subscript_mut(s![.., Slice::with_stride(0, 5, 2).unwrap()]).unwrap();
        *w.front_mut().unwrap() = -1;
        *w.back_mut().unwrap() = -2;
        w[[1, 1]] = -3;
        assert_eq!(w.front(), Ok(&-1));
        assert_eq!(w[[1, 1]], -3);
        assert!(std::panic::catch_unwind(|| grid().subscript(s![.., 1]).unwrap()[[4]]).is_err());
        assert_eq!(a.as_slice()[..8], [-1, 1, 2, 3, 4, 5, 6, -3]);
        assert_eq!(a[[3, 4]], -2);

        let mut e = Array::<i32>::new(&[2, 0]).unwrap();
        let ev = e.subscript(s![.., ..]).unwrap();
        assert_eq!(ev.front(), Err(Error::IndexOutOfRange {index: 0, extent: 0}));
        assert_eq!(ev.back(), Err(Error::IndexOutOfRange {index: 0, extent: 0}));
        let mut em = e.subscript_mut(s![1, ..]).unwrap();
        assert!(em.front_mut().is_err());
        assert!(em.back_mut().is_err());
    }

    #[test]
    fn strided_writes() {
        let mut a = grid();
        let mut v = a.subscript_mut(s![.., Slice::with_stride(0, 5, 2).unwrap()]).unwrap();
        assert_eq!(v.size(), 12);
        for t in v.iter_mut() { *t = -*t; }
        v.insert(0, 100).unwrap();
        assert_eq!(v.insert(12, 0), Err(Error::IndexOutOfRange {index: 12, extent: 12}));
        *v.element_mut(&[3, 2]).unwrap() = 99;
        assert_eq!(a.as_slice()[..5], [100, 1, -2, 3, -4]);
        assert_eq!(a[19], 99);
        assert_eq!(a[18], 18);
    }

    #[test]
    fn iter_mut_from_both_ends() {
        let mut a = grid();
        let mut v = a.subscript_mut(s![.., 2]).unwrap();
        let mut it = v.iter_mut();
        *it.next().unwrap() = 0;
        *it.next_back().unwrap() = 0;
        assert_eq!(it.len(), 2);
        let (mut l, mut r) = it.split_at(1);
        assert_eq!(l.next().map(|t| *t), Some(7));
        assert_eq!(l.next(), None);
        assert_eq!(r.next().map(|t| *t), Some(12));
        assert_eq!(r.next(), None);
        assert_eq!(a.subscript(s![.., 2]).unwrap().iter().copied().collect::<Vec<_>>(), [0, 7, 12, 0]);
    }

    #[test]
    fn assign_and_fill() {
        let mut a = grid();
        let b = Array::<i32>::filled(&[4], 7).unwrap();
        let mut col = a.subscript_mut(s![.., 3]).unwrap();
        col.assign(&b).unwrap();
        assert_eq!(col.assign(&Array::<i32>::new(&[5]).unwrap()), Err(Error::SizeMismatch {expected: 4, actual: 5}));
        assert_eq!(col.iter().copied().collect::<Vec<_>>(), [7, 7, 7, 7]);
        col.assign(&Scalar(1)).unwrap();
        assert_eq!(a.element(&[2, 3]), Ok(&1));
        a.subscript_mut(s![0]).unwrap().fill(-5);
        assert_eq!(a.as_slice()[..5], [-5; 5]);
    }

    #[test]
    fn fill_each_row() {
        let mut a = Array::<usize>::new(&[10, 3]).unwrap();
        for i in 0..10 {
            a.subscript_mut(s![i, 0..3]).unwrap().fill(i);
        }
        for i in 0..10 {
            for j in 0..3 {
                assert_eq!(a.element(&[i, j]), Ok(&i));
            }
        }
    }
}
