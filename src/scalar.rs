use std::ops::{Deref};

use super::{ArrayLike};

/// A single value that looks like an array of any size.
///
/// `value(i)` returns the held value for every `i`, which is how a scalar
/// operand is broadcast in element-wise arithmetic.
///
/// ```
/// use mdcore::{ArrayLike, Scalar};
/// let s = Scalar(2.5);
/// assert_eq!(s.size(), 1);
/// assert_eq!(s.value(0), 2.5);
/// assert_eq!(s.value(1000), 2.5);
/// assert_eq!(*s + 1.0, 3.5);
/// ```
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Scalar<T>(pub T);

impl<T> Scalar<T> {
    pub fn into_inner(self) -> T { self.0 }
}

impl<T: Clone> Scalar<T> {
    /// Yields the held value `n` times.
    pub fn repeat(&self, n: usize) -> std::iter::Take<std::iter::Repeat<T>> {
        std::iter::repeat(self.0.clone()).take(n)
    }
}

impl<T> From<T> for Scalar<T> {
    fn from(t: T) -> Self { Scalar(t) }
}

impl<T> Deref for Scalar<T> {
    type Target = T;
    fn deref(&self) -> &T { &self.0 }
}

impl<T: Clone> ArrayLike for Scalar<T> {
    type Elem = T;
    #[inline(always)]
    fn size(&self) -> usize { 1 }
    #[inline(always)]
    fn dims(&self) -> &[usize] { &[] }
    #[inline(always)]
    fn is_scalar(&self) -> bool { true }
    #[inline(always)]
    fn value(&self, _: usize) -> T { self.0.clone() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broadcast() {
        let s = Scalar(7u8);
        assert_eq!(s.rank(), 0);
        assert!(s.is_scalar());
        assert_eq!(s.repeat(3).collect::<Vec<_>>(), [7, 7, 7]);
        assert_eq!(s.values().collect::<Vec<_>>(), [7]);
        assert_eq!(Scalar::from(7u8), s);
        assert_eq!(s.into_inner(), 7);
    }
}
