//! Linear element buffers.
//!
//! An [`Array`] is a [`Storage`] interpreted through an [`IndexMap`]. The
//! array never cares whether the buffer is heap-allocated, fixed-capacity, or
//! borrowed from somewhere else.
//!
//! [`Array`]: super::Array
//! [`IndexMap`]: super::IndexMap

use super::{check_size, Result};

/// A dense, linearly indexed buffer of `Self::Elem`s.
pub trait Storage {
    type Elem;

    fn as_slice(&self) -> &[Self::Elem];

    fn as_mut_slice(&mut self) -> &mut [Self::Elem];

    fn len(&self) -> usize { self.as_slice().len() }

    fn is_empty(&self) -> bool { self.len() == 0 }
}

/// A [`Storage`] that can be created with a given number of elements.
pub trait Allocate: Storage + Sized {
    /// Returns a buffer of `len` default-initialised elements.
    fn allocate(len: usize) -> Result<Self> where Self::Elem: Default;

    /// Returns a buffer of `len` copies of `value`.
    fn allocate_filled(len: usize, value: Self::Elem) -> Result<Self> where Self::Elem: Clone;

    /// Returns a buffer holding the items of `iter`, which must yield exactly
    /// `len` items.
    fn from_items(len: usize, iter: impl IntoIterator<Item=Self::Elem>) -> Result<Self>;
}

// ----------------------------------------------------------------------------

impl<T> Storage for Vec<T> {
    type Elem = T;
    #[inline(always)]
    fn as_slice(&self) -> &[T] { self }
    #[inline(always)]
    fn as_mut_slice(&mut self) -> &mut [T] { self }
}

impl<T> Allocate for Vec<T> {
    fn allocate(len: usize) -> Result<Self> where T: Default {
        let mut items = Vec::with_capacity(len);
        items.resize_with(len, T::default);
        Ok(items)
    }

    fn allocate_filled(len: usize, value: T) -> Result<Self> where T: Clone {
        Ok(vec![value; len])
    }

    fn from_items(len: usize, iter: impl IntoIterator<Item=T>) -> Result<Self> {
        let mut items = Vec::with_capacity(len);
        items.extend(iter);
        check_size(len, items.len())?;
        Ok(items)
    }
}

// ----------------------------------------------------------------------------

impl<T> Storage for Box<[T]> {
    type Elem = T;
    #[inline(always)]
    fn as_slice(&self) -> &[T] { self }
    #[inline(always)]
    fn as_mut_slice(&mut self) -> &mut [T] { self }
}

impl<T> Allocate for Box<[T]> {
    fn allocate(len: usize) -> Result<Self> where T: Default {
        Vec::<T>::allocate(len).map(Vec::into_boxed_slice)
    }

    fn allocate_filled(len: usize, value: T) -> Result<Self> where T: Clone {
        Vec::<T>::allocate_filled(len, value).map(Vec::into_boxed_slice)
    }

    fn from_items(len: usize, iter: impl IntoIterator<Item=T>) -> Result<Self> {
        Vec::<T>::from_items(len, iter).map(Vec::into_boxed_slice)
    }
}

// ----------------------------------------------------------------------------

/// Fixed-capacity storage. Allocating any length other than `N` fails with
/// [`Error::SizeMismatch`].
///
/// [`Error::SizeMismatch`]: super::Error::SizeMismatch
impl<T, const N: usize> Storage for [T; N] {
    type Elem = T;
    #[inline(always)]
    fn as_slice(&self) -> &[T] { self }
    #[inline(always)]
    fn as_mut_slice(&mut self) -> &mut [T] { self }
}

impl<T, const N: usize> Allocate for [T; N] {
    fn allocate(len: usize) -> Result<Self> where T: Default {
        check_size(N, len)?;
        Ok(std::array::from_fn(|_| T::default()))
    }

    fn allocate_filled(len: usize, value: T) -> Result<Self> where T: Clone {
        check_size(N, len)?;
        Ok(std::array::from_fn(|_| value.clone()))
    }

    fn from_items(len: usize, iter: impl IntoIterator<Item=T>) -> Result<Self> {
        check_size(N, len)?;
        let items = Vec::<T>::from_items(len, iter)?;
        let actual = items.len();
        items.try_into().map_err(|_| super::Error::SizeMismatch { expected: N, actual })
    }
}

// ----------------------------------------------------------------------------

/// A borrowed buffer. The array built on it writes straight into the
/// borrowed memory and cannot reallocate.
impl<'a, T> Storage for &'a mut [T] {
    type Elem = T;
    #[inline(always)]
    fn as_slice(&self) -> &[T] { self }
    #[inline(always)]
    fn as_mut_slice(&mut self) -> &mut [T] { self }
}
