//! Compile-time choice between element access and view construction.
//!
//! `a.subscript([1, 2])` returns `&T`, while `a.subscript(s![1, ..])` returns
//! an [`ArrayView`]. The choice is made by the argument type, through the
//! [`Subscript`] trait.

use super::{Error, Result, Layout, Sel, Selection, ArrayView, ArrayViewMut};

/// Implemented by the argument types of `subscript()` and `subscript_mut()`.
///
/// - Integer index containers (`[usize; N]`, `&[usize]`, `Vec<usize>`)
///   select one element. They must have exactly one index per dimension.
/// - [`Sel`] containers (`[Sel; N]`, `&[Sel]`, `Vec<Sel>`, usually built
///   with [`s!`](crate::s)) select a view. Trailing dimensions may be
///   omitted.
pub trait Subscript {
    type Output<'a, T: 'a>;

    type OutputMut<'a, T: 'a>;

    /// Apply `self` to elements `data` laid out according to `layout`.
    fn subscript<'a, T>(self, data: &'a [T], layout: Layout<'_>) -> Result<Self::Output<'a, T>>;

    /// Mutable version of [`subscript()`](Self::subscript()).
    fn subscript_mut<'a, T>(self, data: &'a mut [T], layout: Layout<'_>) -> Result<Self::OutputMut<'a, T>>;
}

fn element_offset(len: usize, layout: Layout<'_>, index: &[usize]) -> Result<usize> {
    let offset = layout.storage_offset(index)?;
    if offset >= len { return Err(Error::IndexOutOfRange {index: offset, extent: len}); }
    Ok(offset)
}

macro_rules! impl_subscript_for_index {
    ($([$($gen:tt)*] $t:ty),*) => {$(
        impl<$($gen)*> Subscript for $t {
            type Output<'a, T: 'a> = &'a T;
            type OutputMut<'a, T: 'a> = &'a mut T;

            fn subscript<'a, T>(self, data: &'a [T], layout: Layout<'_>) -> Result<&'a T> {
                let offset = element_offset(data.len(), layout, &self[..])?;
                Ok(&data[offset])
            }

            fn subscript_mut<'a, T>(self, data: &'a mut [T], layout: Layout<'_>) -> Result<&'a mut T> {
                let offset = element_offset(data.len(), layout, &self[..])?;
                Ok(&mut data[offset])
            }
        }
    )*};
}

impl_subscript_for_index!([const N: usize] [usize; N], ['s] &'s [usize], [] Vec<usize>);

macro_rules! impl_subscript_for_sel {
    ($([$($gen:tt)*] $t:ty),*) => {$(
        impl<$($gen)*> Subscript for $t {
            type Output<'a, T: 'a> = ArrayView<'a, T>;
            type OutputMut<'a, T: 'a> = ArrayViewMut<'a, T>;

            fn subscript<'a, T>(self, data: &'a [T], layout: Layout<'_>) -> Result<ArrayView<'a, T>> {
                let sel = Selection::from_layout(layout, &self[..])?;
                Ok(ArrayView::new(data, sel))
            }

            fn subscript_mut<'a, T>(self, data: &'a mut [T], layout: Layout<'_>) -> Result<ArrayViewMut<'a, T>> {
                let sel = Selection::from_layout(layout, &self[..])?;
                Ok(ArrayViewMut::new(data, sel))
            }
        }
    )*};
}

impl_subscript_for_sel!([const N: usize] [Sel; N], ['s] &'s [Sel], [] Vec<Sel>);

#[cfg(test)]
mod tests {
    use crate::{s, Array, Error, Sel};

    #[test]
    fn element_or_view() {
        let mut a = Array::<i32>::from_fn(&[3, 4], |i| (i[0] * 10 + i[1]) as i32).unwrap();
        let x: &i32 = a.subscript([2, 3]).unwrap();
        assert_eq!(*x, 23);
        let v = a.subscript(s![1]).unwrap();
        assert_eq!(v.dims(), [4]);
        assert_eq!(v[2], 12);
        *a.subscript_mut(vec![0, 0]).unwrap() = -1;
        assert_eq!(a[0], -1);
        let sels: &[Sel] = &s![.., 3];
        assert_eq!(a.subscript(sels).unwrap().iter().copied().collect::<Vec<_>>(), [3, 13, 23]);
    }

    #[test]
    fn errors() {
        let a = Array::<u8>::new(&[3, 4]).unwrap();
        let index: &[usize] = &[1];
        assert_eq!(a.subscript(index).err(), Some(Error::arity(2, 1)));
        assert_eq!(a.subscript([3, 0]).err(), Some(Error::IndexOutOfRange {index: 3, extent: 3}));
        assert_eq!(a.subscript(s![0, 0, 0]).err(), Some(Error::arity(2, 3)));
    }
}
