//! A pure-Rust library of dense multi-dimensional arrays with strided views
//! and lazily evaluated element-wise arithmetic.
//!
//! [`Array<T, M, S>`] stores `T`s in row-major order in a [`Storage`] `S`,
//! which can be a `Vec`, a boxed slice, a fixed-size array, or a borrowed
//! slice. The shape is described by an [`IndexMap`] `M`, whose rank and
//! extents may be chosen at run time ([`DynamicIndexMap`]), or partly
//! ([`FixedIndexMap`]) or wholly ([`StaticIndexMap`]) at compile time.
//!
//! [`Array::subscript()`] returns an element when given a list of integers,
//! and an [`ArrayView`] when given a list of [`Sel`]s, usually written with
//! the [`s!`] macro. A view borrows the array's storage and may be strided;
//! views of views are allowed.
//!
//! Arithmetic on references to arrays and views, on [`Scalar`]s and on bare
//! numbers builds a [`BinaryExpr`] tree instead of computing a result.
//! Anything implementing [`ArrayLike`] can be evaluated element by element,
//! copied into an array, or used as the right-hand side of in-place
//! arithmetic (see [`Inplace`]).
//!
//! ```
//! use mdcore::{s, Array, ArrayLike, Inplace, Threading};
//!
//! let a = Array::<f64>::from_fn(&[3, 4], |i| (i[0] * 4 + i[1]) as f64).unwrap();
//! let mut b = Array::<f64>::filled(&[3, 4], 1.0).unwrap();
//!
//! // Nothing is computed until the expression is consumed.
//! let e = &a * 2.0 + 1.0;
//! assert_eq!(e.value(5), 11.0);
//!
//! b.try_add_assign_with(&e, Threading::threads(2)).unwrap();
//! assert_eq!(b[[1, 1]], 12.0);
//!
//! let col = a.subscript(s![.., 2]).unwrap();
//! assert_eq!(col.to_array().as_slice(), [2.0, 6.0, 10.0]);
//! ```
//!
//! Every fallible operation returns a [`Result`]. The `std::ops` operators
//! cannot, so they panic where their `try_*` counterparts would fail.

mod error;
pub use error::{Error, Result};
pub(crate) use error::{check_index, check_size};

pub mod types;
pub use types::{TypeId, TypeClass, Element, Byte, type_id};

mod value;
pub use value::{Value};

mod storage;
pub use storage::{Storage, Allocate};

mod index_map;
pub use index_map::{IndexMap, DynamicIndexMap, FixedIndexMap, StaticIndexMap, StaticShape, c_strides};

mod slice;
pub use slice::{Slice, Sel};

mod selection;
pub use selection::{Layout, Selection};

mod subscript;
pub use subscript::{Subscript};

mod array;
pub use array::{Array};

pub mod view;
pub use view::{ArrayView, ArrayViewMut};

pub mod ops;
pub use ops::{Binary, Compound};

pub mod expr;
pub use expr::{ArrayLike, Operand, BinaryExpr, AddExpr, SubExpr, MulExpr, DivExpr};

mod scalar;
pub use scalar::{Scalar};

mod inplace;
pub use inplace::{Source, Container, Inplace, Partition, distribute};

mod config;
pub use config::{Threading};
