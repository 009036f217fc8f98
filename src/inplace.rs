//! In-place element-wise arithmetic: `+=`, `-=`, `*=` and `/=`.
//!
//! The left-hand side is an [`Array`] or an [`ArrayViewMut`]. The right-hand
//! side is anything that implements [`Source`]: a scalar, an array-like of
//! the same shape, or a slice or other collection with the same number of
//! elements. Every check happens before the first element is written, so a
//! failed operation leaves the left-hand side unchanged.
//!
//! By default the elements are visited on the calling thread in row-major
//! order. A [`Threading`] policy splits the elements into contiguous chunks
//! that are processed on scoped threads.

use std::ops::{Range};

use num_complex::{Complex};

use super::{Error, Result, Threading, Array, ArrayView, ArrayViewMut, Scalar, BinaryExpr, ArrayLike};
use super::{IndexMap, Storage, Compound, ops};
use super::view::{IterMut};

/// A right-hand side of in-place arithmetic.
pub trait Source: Sync {
    type Item;

    /// Fails if `self` cannot be combined with a left-hand side of shape
    /// `dims` with `size` elements.
    fn check(&self, dims: &[usize], size: usize) -> Result<()>;

    /// Call `f(t, u)` for each `t` in `lhs`, where `u` is the corresponding
    /// item of `self`. The first element of `lhs` is element `start` of the
    /// left-hand side.
    fn zip_into<'a, E: 'a>(
        &self,
        start: usize,
        lhs: impl Iterator<Item=&'a mut E>,
        f: impl FnMut(&mut E, Self::Item),
    );
}

impl<U: Clone + Sync> Source for Scalar<U> {
    type Item = U;

    fn check(&self, _: &[usize], _: usize) -> Result<()> { Ok(()) }

    fn zip_into<'a, E: 'a>(&self, _: usize, lhs: impl Iterator<Item=&'a mut E>, mut f: impl FnMut(&mut E, U)) {
        lhs.for_each(|t| f(t, self.0.clone()));
    }
}

macro_rules! impl_source_for_element {
    ($($t:ty),*) => {$(
        impl Source for $t {
            type Item = $t;

            fn check(&self, _: &[usize], _: usize) -> Result<()> { Ok(()) }

            fn zip_into<'a, E: 'a>(&self, _: usize, lhs: impl Iterator<Item=&'a mut E>, mut f: impl FnMut(&mut E, $t)) {
                lhs.for_each(|t| f(t, *self));
            }
        }
    )*};
}

impl_source_for_element!(i8, u8, i16, u16, i32, u32, i64, u64, isize, usize, f32, f64, Complex<f32>, Complex<f64>);

/// Array-likes must have the left-hand shape, unless they are scalars.
fn check_like(like: &impl ArrayLike, dims: &[usize]) -> Result<()> {
    if like.is_scalar() || like.dims() == dims { return Ok(()); }
    Err(Error::shapes(dims, like.dims()))
}

fn zip_like<'a, T: 'a, A: ArrayLike>(
    like: &A,
    start: usize,
    lhs: impl Iterator<Item=&'a mut T>,
    mut f: impl FnMut(&mut T, A::Elem),
) {
    if like.is_scalar() {
        let u = like.value(0);
        lhs.for_each(|t| f(t, u.clone()));
    } else {
        lhs.enumerate().for_each(|(k, t)| f(t, like.value(start + k)));
    }
}

macro_rules! impl_source_for_array_like {
    ($([$($gen:tt)*] $t:ty),*) => {$(
        impl<$($gen)*> Source for $t where $t: ArrayLike + Sync {
            type Item = <$t as ArrayLike>::Elem;

            fn check(&self, dims: &[usize], _: usize) -> Result<()> { check_like(self, dims) }

            fn zip_into<'z, E: 'z>(&self, start: usize, lhs: impl Iterator<Item=&'z mut E>, f: impl FnMut(&mut E, Self::Item)) {
                zip_like(self, start, lhs, f)
            }
        }
    )*};
}

impl_source_for_array_like!(
    ['a, T, M, S] &'a Array<T, M, S>,
    ['a, 'b, T] &'a ArrayView<'b, T>,
    ['a, 'b, T] &'a ArrayViewMut<'b, T>,
    ['a, T] ArrayView<'a, T>,
    [L, R, B] BinaryExpr<L, R, B>,
    ['a, L, R, B] &'a BinaryExpr<L, R, B>
);

fn check_len(len: usize, size: usize) -> Result<()> {
    if len == size { return Ok(()); }
    Err(Error::shapes(&[size], &[len]))
}

impl<'a, U: Clone + Sync> Source for &'a [U] {
    type Item = U;

    fn check(&self, _: &[usize], size: usize) -> Result<()> { check_len(self.len(), size) }

    fn zip_into<'z, E: 'z>(&self, start: usize, lhs: impl Iterator<Item=&'z mut E>, mut f: impl FnMut(&mut E, U)) {
        lhs.zip(&self[start..]).for_each(|(t, u)| f(t, u.clone()));
    }
}

impl<'a, U: Clone + Sync> Source for &'a Vec<U> {
    type Item = U;

    fn check(&self, dims: &[usize], size: usize) -> Result<()> { self.as_slice().check(dims, size) }

    fn zip_into<'z, E: 'z>(&self, start: usize, lhs: impl Iterator<Item=&'z mut E>, f: impl FnMut(&mut E, U)) {
        self.as_slice().zip_into(start, lhs, f)
    }
}

/// Wraps any re-iterable collection to use it as a [`Source`]. It is iterated
/// once to count its items, and again to read them.
///
/// ```
/// use mdcore::{Array, Container, Inplace};
/// let mut a = Array::<u64>::filled(&[2, 2], 1).unwrap();
/// let ramp = std::collections::VecDeque::from(vec![0u64, 10, 20, 30]);
/// a.try_add_assign(Container(ramp.iter())).unwrap();
/// assert_eq!(a.as_slice(), [1, 11, 21, 31]);
/// assert!(a.try_add_assign(Container(0..3u64)).is_err());
/// ```
#[derive(Debug, Copy, Clone)]
pub struct Container<C>(pub C);

impl<C> Source for Container<C> where C: IntoIterator + Clone + Sync {
    type Item = C::Item;

    fn check(&self, _: &[usize], size: usize) -> Result<()> {
        check_len(self.0.clone().into_iter().count(), size)
    }

    fn zip_into<'z, E: 'z>(&self, start: usize, lhs: impl Iterator<Item=&'z mut E>, mut f: impl FnMut(&mut E, C::Item)) {
        lhs.zip(self.0.clone().into_iter().skip(start)).for_each(|(t, u)| f(t, u));
    }
}

// ----------------------------------------------------------------------------

/// Split `0..size` into `n` contiguous ranges. The first `size % n` ranges
/// are one element longer than the others.
///
/// ```
/// assert_eq!(mdcore::distribute(3, 8), [0..3, 3..6, 6..8]);
/// ```
pub fn distribute(n: usize, size: usize) -> Vec<Range<usize>> {
    let n = n.max(1);
    let (each, extra) = (size / n, size % n);
    let mut start = 0;
    (0..n).map(|k| {
        let len = each + usize::from(k < extra);
        start += len;
        (start - len)..start
    }).collect()
}

/// Mutable iterators that can be cut in two at a given position.
pub trait Partition: Sized + Send {
    fn split_at(self, k: usize) -> (Self, Self);
}

impl<'a, T: Send> Partition for std::slice::IterMut<'a, T> {
    fn split_at(self, k: usize) -> (Self, Self) {
        let (left, right) = self.into_slice().split_at_mut(k);
        (left.iter_mut(), right.iter_mut())
    }
}

impl<'a, T: Send> Partition for IterMut<'a, T> {
    fn split_at(self, k: usize) -> (Self, Self) { IterMut::split_at(self, k) }
}

fn dispatch<'a, T, B, R, P>(lhs: P, size: usize, rhs: &R, threading: Threading) where
    T: 'a + Send,
    R: Source,
    B: Compound<T, R::Item>,
    P: Partition + Iterator<Item=&'a mut T>,
{
    let n = threading.count().min(size);
    if n <= 1 {
        rhs.zip_into(0, lhs, B::call);
        return;
    }
    log::debug!("In-place arithmetic on {} elements in {} chunks", size, n);
    std::thread::scope(|scope| {
        let mut rest = lhs;
        for range in distribute(n, size) {
            let (chunk, tail) = rest.split_at(range.len());
            rest = tail;
            scope.spawn(move || rhs.zip_into(range.start, chunk, B::call));
        }
    });
}

// ----------------------------------------------------------------------------

/// In-place arithmetic on arrays and mutable views.
///
/// The `std::ops` compound assignment operators call the `try_*` methods
/// and panic on failure.
///
/// ```
/// use mdcore::{Array, Error, Inplace, Threading};
/// let mut a = Array::<f64>::filled(&[2, 3], 1.0).unwrap();
/// let b = Array::<f64>::filled(&[3, 2], 1.0).unwrap();
/// assert!(matches!(a.try_add_assign(&b), Err(Error::ShapeMismatch {..})));
/// a += 1.5;
/// let c = a.clone();
/// a.try_mul_assign_with(&c, Threading::threads(2)).unwrap();
/// assert_eq!(a.as_slice(), [6.25; 6]);
/// ```
pub trait Inplace {
    type Elem;

    /// Update every element `t` of `self` using `B::call(t, u)`, where `u`
    /// is the corresponding item of `rhs`.
    fn try_compound_with<B, R>(&mut self, rhs: R, threading: Threading) -> Result<()> where
        R: Source,
        B: Compound<Self::Elem, R::Item>;

    fn try_add_assign<R: Source>(&mut self, rhs: R) -> Result<()> where Self::Elem: std::ops::AddAssign<R::Item> {
        self.try_compound_with::<ops::AddAssign, R>(rhs, Threading::Single)
    }

    fn try_sub_assign<R: Source>(&mut self, rhs: R) -> Result<()> where Self::Elem: std::ops::SubAssign<R::Item> {
        self.try_compound_with::<ops::SubAssign, R>(rhs, Threading::Single)
    }

    fn try_mul_assign<R: Source>(&mut self, rhs: R) -> Result<()> where Self::Elem: std::ops::MulAssign<R::Item> {
        self.try_compound_with::<ops::MulAssign, R>(rhs, Threading::Single)
    }

    fn try_div_assign<R: Source>(&mut self, rhs: R) -> Result<()> where Self::Elem: std::ops::DivAssign<R::Item> {
        self.try_compound_with::<ops::DivAssign, R>(rhs, Threading::Single)
    }

    fn try_add_assign_with<R: Source>(&mut self, rhs: R, threading: Threading) -> Result<()> where
        Self::Elem: std::ops::AddAssign<R::Item>,
    { self.try_compound_with::<ops::AddAssign, R>(rhs, threading) }

    fn try_sub_assign_with<R: Source>(&mut self, rhs: R, threading: Threading) -> Result<()> where
        Self::Elem: std::ops::SubAssign<R::Item>,
    { self.try_compound_with::<ops::SubAssign, R>(rhs, threading) }

    fn try_mul_assign_with<R: Source>(&mut self, rhs: R, threading: Threading) -> Result<()> where
        Self::Elem: std::ops::MulAssign<R::Item>,
    { self.try_compound_with::<ops::MulAssign, R>(rhs, threading) }

    fn try_div_assign_with<R: Source>(&mut self, rhs: R, threading: Threading) -> Result<()> where
        Self::Elem: std::ops::DivAssign<R::Item>,
    { self.try_compound_with::<ops::DivAssign, R>(rhs, threading) }
}

impl<T: Send, M: IndexMap, S: Storage<Elem=T>> Inplace for Array<T, M, S> {
    type Elem = T;

    fn try_compound_with<B, R>(&mut self, rhs: R, threading: Threading) -> Result<()> where
        R: Source,
        B: Compound<Self::Elem, R::Item>,
    {
        let size = self.size();
        rhs.check(self.dims(), size)?;
        dispatch::<T, B, R, _>(self.iter_mut(), size, &rhs, threading);
        Ok(())
    }
}

impl<'v, T: Send> Inplace for ArrayViewMut<'v, T> {
    type Elem = T;

    fn try_compound_with<B, R>(&mut self, rhs: R, threading: Threading) -> Result<()> where
        R: Source,
        B: Compound<Self::Elem, R::Item>,
    {
        let size = self.size();
        rhs.check(self.dims(), size)?;
        dispatch::<T, B, R, _>(self.iter_mut(), size, &rhs, threading);
        Ok(())
    }
}

macro_rules! impl_compound_ops {
    ([$($gen:tt)*] $t:ty) => {
        impl_compound_ops! { @op [$($gen)*] $t, AddAssign, add_assign, try_add_assign }
        impl_compound_ops! { @op [$($gen)*] $t, SubAssign, sub_assign, try_sub_assign }
        impl_compound_ops! { @op [$($gen)*] $t, MulAssign, mul_assign, try_mul_assign }
        impl_compound_ops! { @op [$($gen)*] $t, DivAssign, div_assign, try_div_assign }
    };
    (@op [$($gen:tt)*] $t:ty, $op:ident, $method:ident, $try:ident) => {
        /// Panics if the right-hand side does not fit.
        impl<$($gen)* R: Source> std::ops::$op<R> for $t where
            $t: Inplace,
            <$t as Inplace>::Elem: std::ops::$op<R::Item>,
        {
            fn $method(&mut self, rhs: R) {
                if let Err(e) = self.$try(rhs) { panic!("{}", e); }
            }
        }
    };
}

impl_compound_ops!([T, M, S,] Array<T, M, S>);
impl_compound_ops!(['a, T,] ArrayViewMut<'a, T>);

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::{LinkedList};

    use proptest::prelude::*;

    use super::*;
    use crate::{s, FixedIndexMap, Slice};

    fn ramp(shape: &[usize]) -> Array<f64> {
        let mut k = 0.0;
        Array::from_fn(shape, |_| { k += 1.0; k }).unwrap()
    }

    #[test]
    fn scalar_and_array() {
        let mut a = ramp(&[2, 3]);
        a += 1.0;
        assert_eq!(a.as_slice(), [2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        a -= &ramp(&[2, 3]);
        assert_eq!(a.as_slice(), [1.0; 6]);
        a *= Scalar(4.0);
        a /= &(&ramp(&[2, 3]) * 0.0 + 2.0);
        assert_eq!(a.as_slice(), [2.0; 6]);
    }

    #[test]
    fn shape_mismatch_leaves_lhs_unchanged() {
        let mut a = ramp(&[2, 3]);
        let b = ramp(&[3, 2]);
        assert_eq!(a.try_add_assign(&b), Err(Error::shapes(&[2, 3], &[3, 2])));
        assert_eq!(a, ramp(&[2, 3]));
        let short = vec![1.0; 5];
        assert_eq!(a.try_sub_assign(&short), Err(Error::shapes(&[6], &[5])));
        assert_eq!(a, ramp(&[2, 3]));
        assert!(std::panic::catch_unwind(move || { let mut a = a; a += &b; }).is_err());
    }

    #[test]
    fn containers() {
        let mut a = Array::<i32, FixedIndexMap<1>>::filled(&[4], 10).unwrap();
        a.try_sub_assign(&[1, 2, 3, 4][..]).unwrap();
        assert_eq!(a.as_slice(), [9, 8, 7, 6]);
        let list: LinkedList<i32> = (1..=4).collect();
        a.try_mul_assign(Container(&list)).unwrap();
        assert_eq!(a.as_slice(), [9, 16, 21, 24]);
        a.try_div_assign(&vec![9, 8, 7, 6]).unwrap();
        assert_eq!(a.as_slice(), [1, 2, 3, 4]);
    }

    #[test]
    fn index_sized_elements() {
        let mut a = Array::<usize>::from_fn(&[2, 2], |i| 2 * i[0] + i[1]).unwrap();
        a += 1usize;
        a *= 3usize;
        assert_eq!(a.as_slice(), [3, 6, 9, 12]);
        let mut d = Array::<isize>::filled(&[3], 5).unwrap();
        d -= 7isize;
        assert_eq!(d.as_slice(), [-2, -2, -2]);
    }

    #[test]
    fn strided_lhs() {
        let mut a = ramp(&[3, 4]);
        let mut col = a.subscript_mut(s![.., 1]).unwrap();
        col += &[100.0, 200.0, 300.0][..];
        col *= 2.0;
        let b = ramp(&[3, 4]);
        a.subscript_mut(s![.., 2]).unwrap().try_add_assign(&b.subscript(s![.., 0]).unwrap()).unwrap();
        assert_eq!(a.as_slice(), [1.0, 204.0, 4.0, 4.0, 5.0, 412.0, 12.0, 8.0, 9.0, 620.0, 20.0, 12.0]);
    }

    #[test]
    fn view_shape_mismatch() {
        let mut a = ramp(&[3, 4]);
        let b = ramp(&[4]);
        let mut col = a.subscript_mut(s![.., 1]).unwrap();
        assert!(col.try_add_assign(&b).is_err());
        assert_eq!(a, ramp(&[3, 4]));
    }

    #[test]
    fn distribution() {
        assert_eq!(distribute(4, 10), [0..3, 3..6, 6..8, 8..10]);
        assert_eq!(distribute(2, 0), [0..0, 0..0]);
        assert_eq!(distribute(0, 3), [0..3]);
    }

    #[test]
    fn threads_match_single() {
        let b = ramp(&[7, 9]);
        for n in [2, 3, 8, 100] {
            let mut single = ramp(&[7, 9]);
            let mut multi = ramp(&[7, 9]);
            single.try_mul_assign(&(&b + 1.0)).unwrap();
            multi.try_mul_assign_with(&(&b + 1.0), Threading::threads(n)).unwrap();
            assert_eq!(single, multi);

            let mut single = ramp(&[7, 9]);
            let mut multi = ramp(&[7, 9]);
            let sel = s![1..6, Slice::with_stride(0, 9, 2).unwrap()];
            single.subscript_mut(sel).unwrap().try_add_assign(Container((0..25i32).map(f64::from))).unwrap();
            multi.subscript_mut(sel).unwrap()
                .try_add_assign_with(Container((0..25i32).map(f64::from)), Threading::threads(n)).unwrap();
            assert_eq!(single, multi);
            assert_eq!(multi.element(&[5, 8]), Ok(&(5.0 * 9.0 + 9.0 + 24.0)));
        }
    }

    proptest! {
        #[test]
        fn threaded_add(len in 0usize..200, n in 1usize..9, c in -100i64..100) {
            let mut a = Array::<i64>::from_fn(&[len], |i| i[0] as i64).unwrap();
            a.try_add_assign_with(c, Threading::threads(n)).unwrap();
            for (i, x) in a.iter().enumerate() {
                prop_assert_eq!(*x, i as i64 + c);
            }
        }
    }
}
