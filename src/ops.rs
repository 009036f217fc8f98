//! Operator selectors for expressions and in-place arithmetic.
//!
//! An expression node does not store a closure. It stores its operator as a
//! type parameter: [`BinaryExpr<L, R, Add>`] adds, [`BinaryExpr<L, R, Mul>`]
//! multiplies. The selectors are empty enums, so they exist only at the type
//! level, and each one forwards to the matching [`std::ops`] trait of the
//! element types. Result-type promotion therefore follows `std::ops`: `i32`
//! with `i32` stays `i32`, `Complex<f64>` times `f64` stays complex.
//!
//! [`AddAssign`] and its siblings do the same for [`Inplace`], which updates
//! a left-hand element through a mutable reference.
//!
//! [`BinaryExpr<L, R, Add>`]: super::BinaryExpr
//! [`BinaryExpr<L, R, Mul>`]: super::BinaryExpr
//! [`Inplace`]: super::Inplace

/// Element operation of an expression node: computes one output element
/// from an element of each operand.
pub trait Binary<T, U> {
    type Output;

    fn call(t: T, u: U) -> Self::Output;
}

/// Element operation of in-place arithmetic.
pub trait Compound<T, U> {
    fn call(t: &mut T, u: U);
}

macro_rules! selector {
    ($(#[$doc:meta])* $name:ident: $bound:ident :: $method:ident) => {
        $(#[$doc])*
        pub enum $name {}

        impl<T, U> Binary<T, U> for $name where T: std::ops::$bound<U> {
            type Output = T::Output;
            #[inline(always)]
            fn call(t: T, u: U) -> Self::Output { t.$method(u) }
        }
    };
}

macro_rules! compound_selector {
    ($(#[$doc:meta])* $name:ident: $bound:ident :: $method:ident) => {
        $(#[$doc])*
        pub enum $name {}

        impl<T, U> Compound<T, U> for $name where T: std::ops::$bound<U> {
            #[inline(always)]
            fn call(t: &mut T, u: U) { t.$method(u) }
        }
    };
}

selector!(/** Selects `+` in a [`super::BinaryExpr`]. */ Add: Add::add);
selector!(/** Selects `-`. */ Sub: Sub::sub);
selector!(/** Selects `*`. */ Mul: Mul::mul);
selector!(/** Selects `/`. Integer division by zero panics as it does for plain integers. */ Div: Div::div);

compound_selector!(/** Selects `+=` in [`super::Inplace`]. */ AddAssign: AddAssign::add_assign);
compound_selector!(SubAssign: SubAssign::sub_assign);
compound_selector!(MulAssign: MulAssign::mul_assign);
compound_selector!(DivAssign: DivAssign::div_assign);

// ----------------------------------------------------------------------------

/// Implement one of the [`std::ops`] traits for a type that implements
/// [`Operand`]. The result is a [`BinaryExpr`].
///
/// You perhaps want to use [`impl_ops_for_operand`] instead, which calls
/// this. The generic parameters of the type are given in square brackets,
/// each followed by a comma.
///
/// [`Operand`]: super::Operand
/// [`BinaryExpr`]: super::BinaryExpr
/// [`impl_ops_for_operand`]: crate::impl_ops_for_operand
#[macro_export]
macro_rules! impl_op_for_operand {
    ($op:ident for [$($gen:tt)*] $t:ty { $method:ident }) => {
        impl<$($gen)* RHS: $crate::Operand> std::ops::$op<RHS> for $t where
            $t: $crate::Operand,
            $crate::ops::$op: $crate::Binary<
                <<$t as $crate::Operand>::Held as $crate::ArrayLike>::Elem,
                <<RHS as $crate::Operand>::Held as $crate::ArrayLike>::Elem,
            >,
        {
            type Output = $crate::BinaryExpr<
                <$t as $crate::Operand>::Held,
                <RHS as $crate::Operand>::Held,
                $crate::ops::$op,
            >;
            fn $method(self, rhs: RHS) -> Self::Output {
                $crate::BinaryExpr::new(
                    $crate::Operand::hold(self),
                    $crate::Operand::hold(rhs),
                )
            }
        }
    };
}

/// Implement `+`, `-`, `*` and `/` for a type that implements [`Operand`].
///
/// ```
/// use mdcore::{ArrayLike, Operand, impl_ops_for_operand};
///
/// #[derive(Clone)]
/// pub struct Ramp(usize);
///
/// impl ArrayLike for Ramp {
///     type Elem = f64;
///     fn size(&self) -> usize { self.0 }
///     fn dims(&self) -> &[usize] { std::slice::from_ref(&self.0) }
///     fn value(&self, i: usize) -> f64 { i as f64 }
/// }
///
/// impl Operand for Ramp {
///     type Held = Self;
///     fn hold(self) -> Self { self }
/// }
///
/// impl_ops_for_operand!([] Ramp);
///
/// let e = Ramp(4) * 2.0;
/// assert_eq!(e.value(3), 6.0);
/// ```
///
/// [`Operand`]: super::Operand
#[macro_export]
macro_rules! impl_ops_for_operand {
    ([$($gen:tt)*] $t:ty) => {
        $crate::impl_op_for_operand! { Add for [$($gen)*] $t { add } }
        $crate::impl_op_for_operand! { Sub for [$($gen)*] $t { sub } }
        $crate::impl_op_for_operand! { Mul for [$($gen)*] $t { mul } }
        $crate::impl_op_for_operand! { Div for [$($gen)*] $t { div } }
    };
}
