//! A single element of any supported type, chosen at run time.

use num_complex::Complex;
use num_traits::{NumCast, ToPrimitive};

use super::{Byte, Element, Error, Result, TypeId};

/// A type-erased element.
///
/// `Value::None` is the unset state; every other variant holds exactly one
/// element whose [`TypeId`] is the variant name.
///
/// ```
/// use mdcore::{Value, TypeId};
/// let v = Value::from(3.5f32);
/// assert_eq!(v.type_id(), TypeId::Float32);
/// assert_eq!(*v.get::<f32>().unwrap(), 3.5);
/// assert_eq!(v.convert::<i64>().unwrap(), 3);
/// assert!(v.get::<f64>().is_err());
/// ```
#[derive(Debug, Default, Clone, PartialEq)]
pub enum Value {
    #[default]
    None,
    Int8(i8),
    UInt8(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    Complex32(Complex<f32>),
    Complex64(Complex<f64>),
    String(String),
    Binary(Byte),
    Bool(bool),
}

impl Value {
    pub fn type_id(&self) -> TypeId {
        match self {
            Value::None => TypeId::None,
            Value::Int8(_) => TypeId::Int8,
            Value::UInt8(_) => TypeId::UInt8,
            Value::Int16(_) => TypeId::Int16,
            Value::UInt16(_) => TypeId::UInt16,
            Value::Int32(_) => TypeId::Int32,
            Value::UInt32(_) => TypeId::UInt32,
            Value::Int64(_) => TypeId::Int64,
            Value::UInt64(_) => TypeId::UInt64,
            Value::Float32(_) => TypeId::Float32,
            Value::Float64(_) => TypeId::Float64,
            Value::Complex32(_) => TypeId::Complex32,
            Value::Complex64(_) => TypeId::Complex64,
            Value::String(_) => TypeId::String,
            Value::Binary(_) => TypeId::Binary,
            Value::Bool(_) => TypeId::Bool,
        }
    }

    pub fn is_none(&self) -> bool { matches!(self, Value::None) }

    /// Borrow the held element as a `T`.
    ///
    /// Fails with [`Error::MemoryNotAllocated`] if `self` is `None`, or with
    /// [`Error::TypeError`] if it holds some other type.
    pub fn get<T: Element>(&self) -> Result<&T> {
        if self.is_none() { return Err(Error::MemoryNotAllocated); }
        T::from_value(self).ok_or(Error::TypeError { expected: T::TYPE_ID, actual: self.type_id() })
    }

    /// Store `t`, provided `self` is `None` or already holds a `T`.
    pub fn set<T: Element>(&mut self, t: T) -> Result<()> {
        let actual = self.type_id();
        if actual != TypeId::None && actual != T::TYPE_ID {
            return Err(Error::TypeError { expected: actual, actual: T::TYPE_ID });
        }
        *self = t.into_value();
        Ok(())
    }

    /// Numerically convert the held integer or float to a `T`.
    ///
    /// Fails with [`Error::TypeError`] if the held element is not a real
    /// number or does not fit in a `T`.
    pub fn convert<T: Element + NumCast>(&self) -> Result<T> {
        let fail = || Error::TypeError { expected: T::TYPE_ID, actual: self.type_id() };
        let converted = match self {
            Value::None => return Err(Error::MemoryNotAllocated),
            Value::Int8(v) => cast(*v),
            Value::UInt8(v) => cast(*v),
            Value::Int16(v) => cast(*v),
            Value::UInt16(v) => cast(*v),
            Value::Int32(v) => cast(*v),
            Value::UInt32(v) => cast(*v),
            Value::Int64(v) => cast(*v),
            Value::UInt64(v) => cast(*v),
            Value::Float32(v) => cast(*v),
            Value::Float64(v) => cast(*v),
            _ => None,
        };
        converted.ok_or_else(fail)
    }
}

fn cast<S: ToPrimitive, T: NumCast>(s: S) -> Option<T> { <T as NumCast>::from(s) }

impl<T: Element> From<T> for Value {
    fn from(t: T) -> Self { t.into_value() }
}
