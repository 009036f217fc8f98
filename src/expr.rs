//! Lazily evaluated element-wise arithmetic.
//!
//! `&a + &b * 2.0` does not compute anything. It builds a tree of
//! [`BinaryExpr`] nodes whose leaves borrow `a` and `b` and hold the scalar
//! `2.0` by value. Each element is computed on demand by
//! [`ArrayLike::value()`], and the tree is materialized by
//! [`ArrayLike::to_array()`], [`Array::assign()`] or in-place arithmetic.
//!
//! Which operands are held by reference and which by value is decided by the
//! [`Operand`] trait.

use std::marker::{PhantomData};
use std::fmt::{Debug};

use num_complex::{Complex};

use super::{Error, Result, Array, ArrayView, ArrayViewMut, Scalar, DynamicIndexMap, Binary, ops};

/// Implemented by everything that can appear in element-wise arithmetic:
/// arrays, views, [`Scalar`]s and [`BinaryExpr`]s.
///
/// Elements are numbered `0..size()` in row-major order.
pub trait ArrayLike {
    type Elem: Clone;

    /// The number of elements.
    fn size(&self) -> usize;

    /// The extent of each dimension. Empty for a scalar.
    fn dims(&self) -> &[usize];

    fn rank(&self) -> usize { self.dims().len() }

    /// Whether `self` is broadcast against operands of any shape. Defaults to
    /// `rank() == 0 && size() == 1`.
    fn is_scalar(&self) -> bool { self.rank() == 0 && self.size() == 1 }

    /// Returns element `i`. Panics or returns garbage if `i` is out of range,
    /// except for scalars, which return their value for any `i`.
    fn value(&self, i: usize) -> Self::Elem;

    /// Iterate over the elements in order.
    fn values(&self) -> Values<'_, Self> {
        Values {like: self, front: 0, back: self.size()}
    }

    /// Evaluate every element into a new [`Array`] of the same shape.
    fn to_array(&self) -> Array<Self::Elem> {
        if self.rank() == 0 && self.size() == 0 { return Array::default(); }
        let map = DynamicIndexMap::new(self.dims().iter().copied());
        Array::from_raw(map, self.values().collect())
    }
}

impl<'a, A: ArrayLike + ?Sized> ArrayLike for &'a A {
    type Elem = A::Elem;
    #[inline(always)]
    fn size(&self) -> usize { (**self).size() }
    #[inline(always)]
    fn dims(&self) -> &[usize] { (**self).dims() }
    #[inline(always)]
    fn is_scalar(&self) -> bool { (**self).is_scalar() }
    #[inline(always)]
    fn value(&self, i: usize) -> Self::Elem { (**self).value(i) }
}

/// The return type of [`ArrayLike::values()`].
pub struct Values<'a, A: ?Sized> {
    like: &'a A,
    front: usize,
    back: usize,
}

impl<'a, A: ArrayLike + ?Sized> Iterator for Values<'a, A> {
    type Item = A::Elem;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back { return None; }
        self.front += 1;
        Some(self.like.value(self.front - 1))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.back - self.front;
        (n, Some(n))
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.front = self.front.saturating_add(n).min(self.back);
        self.next()
    }
}

impl<'a, A: ArrayLike + ?Sized> DoubleEndedIterator for Values<'a, A> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back { return None; }
        self.back -= 1;
        Some(self.like.value(self.back))
    }
}

impl<'a, A: ArrayLike + ?Sized> ExactSizeIterator for Values<'a, A> {}

impl<'a, A: ArrayLike + ?Sized> std::iter::FusedIterator for Values<'a, A> {}

// ----------------------------------------------------------------------------

/// How a value is stored when it becomes an operand of a [`BinaryExpr`].
///
/// - Arrays and views are borrowed: `Held = &Array<...>`.
/// - Scalars, including bare numbers, are copied: `Held = Scalar<T>`.
/// - Nested expressions are moved: `Held = BinaryExpr<...>`. They contain
///   only borrows and scalars, so this is cheap.
pub trait Operand: Sized {
    type Held: ArrayLike;

    fn hold(self) -> Self::Held;

    /// Fallible `self + rhs`.
    fn try_add<R: Operand>(self, rhs: R) -> Result<BinaryExpr<Self::Held, R::Held, ops::Add>> where
        ops::Add: Binary<<Self::Held as ArrayLike>::Elem, <R::Held as ArrayLike>::Elem>,
    { BinaryExpr::try_new(self.hold(), rhs.hold()) }

    /// Fallible `self - rhs`.
    fn try_sub<R: Operand>(self, rhs: R) -> Result<BinaryExpr<Self::Held, R::Held, ops::Sub>> where
        ops::Sub: Binary<<Self::Held as ArrayLike>::Elem, <R::Held as ArrayLike>::Elem>,
    { BinaryExpr::try_new(self.hold(), rhs.hold()) }

    /// Fallible `self * rhs`.
    fn try_mul<R: Operand>(self, rhs: R) -> Result<BinaryExpr<Self::Held, R::Held, ops::Mul>> where
        ops::Mul: Binary<<Self::Held as ArrayLike>::Elem, <R::Held as ArrayLike>::Elem>,
    { BinaryExpr::try_new(self.hold(), rhs.hold()) }

    /// Fallible `self / rhs`.
    fn try_div<R: Operand>(self, rhs: R) -> Result<BinaryExpr<Self::Held, R::Held, ops::Div>> where
        ops::Div: Binary<<Self::Held as ArrayLike>::Elem, <R::Held as ArrayLike>::Elem>,
    { BinaryExpr::try_new(self.hold(), rhs.hold()) }
}

impl<'a, T: Clone, M: super::IndexMap, S: super::Storage<Elem=T>> Operand for &'a Array<T, M, S> {
    type Held = Self;
    #[inline(always)]
    fn hold(self) -> Self { self }
}

impl<'a, 'b, T: Clone> Operand for &'a ArrayView<'b, T> {
    type Held = Self;
    #[inline(always)]
    fn hold(self) -> Self { self }
}

impl<'a, 'b, T: Clone> Operand for &'a ArrayViewMut<'b, T> {
    type Held = Self;
    #[inline(always)]
    fn hold(self) -> Self { self }
}

impl<'a, T: Clone> Operand for ArrayView<'a, T> {
    type Held = Self;
    #[inline(always)]
    fn hold(self) -> Self { self }
}

impl<T: Clone> Operand for Scalar<T> {
    type Held = Self;
    #[inline(always)]
    fn hold(self) -> Self { self }
}

impl<L: ArrayLike, R: ArrayLike, B> Operand for BinaryExpr<L, R, B> where
    B: Binary<L::Elem, R::Elem>,
    B::Output: Clone,
{
    type Held = Self;
    #[inline(always)]
    fn hold(self) -> Self { self }
}

macro_rules! impl_operand_for_element {
    ($($t:ty),*) => {$(
        impl Operand for $t {
            type Held = Scalar<$t>;
            #[inline(always)]
            fn hold(self) -> Scalar<$t> { Scalar(self) }
        }
    )*};
}

impl_operand_for_element!(i8, u8, i16, u16, i32, u32, i64, u64, isize, usize, f32, f64, Complex<f32>, Complex<f64>);

crate::impl_ops_for_operand!(['a, T, M, S,] &'a Array<T, M, S>);
crate::impl_ops_for_operand!(['a, 'b, T,] &'a ArrayView<'b, T>);
crate::impl_ops_for_operand!(['a, 'b, T,] &'a ArrayViewMut<'b, T>);
crate::impl_ops_for_operand!(['a, T,] ArrayView<'a, T>);
crate::impl_ops_for_operand!([T,] Scalar<T>);
crate::impl_ops_for_operand!([L, R, B,] BinaryExpr<L, R, B>);

/// Operators with a bare number on the left, e.g. `2.0 * &a`.
macro_rules! impl_ops_for_element_lhs {
    ($($p:ty),*) => {$(
        impl_ops_for_element_lhs! { @rhs $p, ['a, T, M, S] &'a Array<T, M, S> }
        impl_ops_for_element_lhs! { @rhs $p, ['a, 'b, T] &'a ArrayView<'b, T> }
        impl_ops_for_element_lhs! { @rhs $p, ['a, 'b, T] &'a ArrayViewMut<'b, T> }
        impl_ops_for_element_lhs! { @rhs $p, ['a, T] ArrayView<'a, T> }
        impl_ops_for_element_lhs! { @rhs $p, [L, R, B] BinaryExpr<L, R, B> }
    )*};
    (@rhs $p:ty, [$($gen:tt)*] $rhs:ty) => {
        impl_ops_for_element_lhs! { @op $p, Add, add, [$($gen)*] $rhs }
        impl_ops_for_element_lhs! { @op $p, Sub, sub, [$($gen)*] $rhs }
        impl_ops_for_element_lhs! { @op $p, Mul, mul, [$($gen)*] $rhs }
        impl_ops_for_element_lhs! { @op $p, Div, div, [$($gen)*] $rhs }
    };
    (@op $p:ty, $op:ident, $method:ident, [$($gen:tt)*] $rhs:ty) => {
        impl<$($gen)*> std::ops::$op<$rhs> for $p where
            $rhs: Operand,
            ops::$op: Binary<$p, <<$rhs as Operand>::Held as ArrayLike>::Elem>,
        {
            type Output = BinaryExpr<Scalar<$p>, <$rhs as Operand>::Held, ops::$op>;
            fn $method(self, rhs: $rhs) -> Self::Output { BinaryExpr::new(Scalar(self), rhs.hold()) }
        }
    };
}

impl_ops_for_element_lhs!(i8, u8, i16, u16, i32, u32, i64, u64, isize, usize, f32, f64, Complex<f32>, Complex<f64>);

// ----------------------------------------------------------------------------

/// A lazy element-wise `lhs B rhs`, where `B` is one of [`ops::Add`],
/// [`ops::Sub`], [`ops::Mul`] or [`ops::Div`].
///
/// A scalar operand (see [`ArrayLike::is_scalar()`]) is broadcast against
/// the other operand. Otherwise both operands must have the same shape.
/// Nothing is cached: reading an element twice computes it twice.
///
/// ```
/// use mdcore::{Array, ArrayLike, Operand};
/// let a = Array::<f64>::from_fn(&[2, 3], |i| (i[0] * 3 + i[1]) as f64).unwrap();
/// let b = Array::<f64>::filled(&[2, 3], 1.0).unwrap();
/// let e = &a + 10.0 + &b;
/// assert_eq!(e.dims(), [2, 3]);
/// assert_eq!(e.value(4), 15.0);
///
/// let c = Array::<f64>::filled(&[3, 2], 1.0).unwrap();
/// assert!((&a).try_add(&c).is_err());
/// ```
pub struct BinaryExpr<L, R, B> {
    lhs: L,
    rhs: R,
    lhs_scalar: bool,
    rhs_scalar: bool,
    _op: PhantomData<B>,
}

pub type AddExpr<L, R> = BinaryExpr<L, R, ops::Add>;
pub type SubExpr<L, R> = BinaryExpr<L, R, ops::Sub>;
pub type MulExpr<L, R> = BinaryExpr<L, R, ops::Mul>;
pub type DivExpr<L, R> = BinaryExpr<L, R, ops::Div>;

impl<L: ArrayLike, R: ArrayLike, B> BinaryExpr<L, R, B> {
    /// Fails with [`Error::ShapeMismatch`] if neither operand is a scalar
    /// and their shapes differ.
    pub fn try_new(lhs: L, rhs: R) -> Result<Self> {
        let lhs_scalar = lhs.is_scalar();
        let rhs_scalar = rhs.is_scalar();
        if !lhs_scalar && !rhs_scalar && lhs.dims() != rhs.dims() {
            return Err(Error::shapes(lhs.dims(), rhs.dims()));
        }
        Ok(Self {lhs, rhs, lhs_scalar, rhs_scalar, _op: PhantomData})
    }

    /// Like [`try_new()`](Self::try_new()).
    ///
    /// # Panics
    ///
    /// If the shapes are incompatible.
    pub fn new(lhs: L, rhs: R) -> Self {
        match Self::try_new(lhs, rhs) {
            Ok(e) => e,
            Err(e) => panic!("{}", e),
        }
    }

    pub fn lhs(&self) -> &L { &self.lhs }

    pub fn rhs(&self) -> &R { &self.rhs }
}

impl<L: Clone, R: Clone, B> Clone for BinaryExpr<L, R, B> {
    fn clone(&self) -> Self {
        Self {
            lhs: self.lhs.clone(),
            rhs: self.rhs.clone(),
            lhs_scalar: self.lhs_scalar,
            rhs_scalar: self.rhs_scalar,
            _op: PhantomData,
        }
    }
}

impl<L: Debug, R: Debug, B> Debug for BinaryExpr<L, R, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinaryExpr")
            .field("op", &std::any::type_name::<B>())
            .field("lhs", &self.lhs)
            .field("rhs", &self.rhs)
            .finish()
    }
}

impl<L: ArrayLike, R: ArrayLike, B> ArrayLike for BinaryExpr<L, R, B> where
    B: Binary<L::Elem, R::Elem>,
    B::Output: Clone,
{
    type Elem = B::Output;

    fn size(&self) -> usize {
        if self.lhs_scalar { self.rhs.size() } else { self.lhs.size() }
    }

    fn dims(&self) -> &[usize] {
        if self.lhs_scalar { self.rhs.dims() } else { self.lhs.dims() }
    }

    fn is_scalar(&self) -> bool { self.lhs_scalar && self.rhs_scalar }

    #[inline]
    fn value(&self, i: usize) -> Self::Elem {
        let l = self.lhs.value(if self.lhs_scalar { 0 } else { i });
        let r = self.rhs.value(if self.rhs_scalar { 0 } else { i });
        B::call(l, r)
    }
}

// ----------------------------------------------------------------------------
