//! Run-time identifiers for the closed set of supported element types.
//!
//! Every element type that can be stored in a [`Value`] implements
//! [`Element`], which maps it to one [`TypeId`]. The name tables used by
//! [`TypeId::name()`] and [`TypeId::from_str()`] are immutable statics.
//!
//! [`Value`]: super::Value

use std::fmt;
use std::str::FromStr;

use num_complex::Complex;
use serde::{Deserialize, Serialize};

use super::{Error, Result, Value};

/// Identifies an element type at run time.
#[derive(Debug, Default, Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TypeId {
    #[default]
    None,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
    /// Reserved; no stable Rust type maps to it.
    Float128,
    Complex32,
    Complex64,
    /// Reserved; no stable Rust type maps to it.
    Complex128,
    String,
    Binary,
    Bool,
}

/// Coarse classification of a [`TypeId`].
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeClass {
    None,
    Integer,
    Float,
    Binary,
    Bool,
    Complex,
    String,
}

static NAMES: &[(TypeId, &str)] = &[
    (TypeId::Int8, "int8"),
    (TypeId::UInt8, "uint8"),
    (TypeId::Int16, "int16"),
    (TypeId::UInt16, "uint16"),
    (TypeId::Int32, "int32"),
    (TypeId::UInt32, "uint32"),
    (TypeId::Int64, "int64"),
    (TypeId::UInt64, "uint64"),
    (TypeId::Float32, "float32"),
    (TypeId::Float64, "float64"),
    (TypeId::Float128, "float128"),
    (TypeId::Complex32, "complex32"),
    (TypeId::Complex64, "complex64"),
    (TypeId::Complex128, "complex128"),
    (TypeId::String, "string"),
    (TypeId::Binary, "binary"),
    (TypeId::Bool, "bool"),
];

// Abbreviations accepted by `from_str()` in addition to `NAMES`.
static SHORT_NAMES: &[(&str, TypeId)] = &[
    ("i8", TypeId::Int8),
    ("ui8", TypeId::UInt8),
    ("i16", TypeId::Int16),
    ("ui16", TypeId::UInt16),
    ("i32", TypeId::Int32),
    ("ui32", TypeId::UInt32),
    ("i64", TypeId::Int64),
    ("ui64", TypeId::UInt64),
    ("f32", TypeId::Float32),
    ("f64", TypeId::Float64),
    ("f128", TypeId::Float128),
    ("c32", TypeId::Complex32),
    ("c64", TypeId::Complex64),
    ("c128", TypeId::Complex128),
    ("str", TypeId::String),
];

impl TypeId {
    /// The canonical name, e.g. `"uint16"`.
    ///
    /// Fails with [`Error::KeyError`] for [`TypeId::None`], which has no name.
    ///
    /// ```
    /// use mdcore::TypeId;
    /// assert_eq!(TypeId::Complex64.name().unwrap(), "complex64");
    /// assert!(TypeId::None.name().is_err());
    /// ```
    pub fn name(self) -> Result<&'static str> {
        NAMES.iter()
            .find(|(id, _)| *id == self)
            .map(|(_, name)| *name)
            .ok_or_else(|| Error::KeyError(format!("{:?}", self)))
    }

    pub fn class(self) -> TypeClass {
        match self {
            TypeId::None => TypeClass::None,
            TypeId::Int8 | TypeId::UInt8 | TypeId::Int16 | TypeId::UInt16 |
            TypeId::Int32 | TypeId::UInt32 | TypeId::Int64 | TypeId::UInt64 => TypeClass::Integer,
            TypeId::Float32 | TypeId::Float64 | TypeId::Float128 => TypeClass::Float,
            TypeId::Complex32 | TypeId::Complex64 | TypeId::Complex128 => TypeClass::Complex,
            TypeId::String => TypeClass::String,
            TypeId::Binary => TypeClass::Binary,
            TypeId::Bool => TypeClass::Bool,
        }
    }

    pub fn is_integer(self) -> bool { self.class() == TypeClass::Integer }

    pub fn is_float(self) -> bool { self.class() == TypeClass::Float }

    pub fn is_complex(self) -> bool { self.class() == TypeClass::Complex }

    /// Integers, floats and complex numbers.
    pub fn is_numeric(self) -> bool { self.is_integer() || self.is_float() || self.is_complex() }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Ok(name) => f.write_str(name),
            Err(_) => f.write_str("none"),
        }
    }
}

impl FromStr for TypeId {
    type Err = Error;

    /// Accepts canonical names (`"int32"`) and abbreviations (`"i32"`).
    fn from_str(s: &str) -> Result<Self> {
        NAMES.iter()
            .find(|(_, name)| *name == s)
            .map(|(id, _)| *id)
            .or_else(|| SHORT_NAMES.iter().find(|(name, _)| *name == s).map(|(_, id)| *id))
            .ok_or_else(|| Error::KeyError(s.to_owned()))
    }
}

// ----------------------------------------------------------------------------

/// An opaque byte. Distinct from `u8` so that binary data gets its own
/// [`TypeId`].
#[derive(Debug, Default, Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Byte(pub u8);

impl From<u8> for Byte {
    fn from(b: u8) -> Self { Byte(b) }
}

// ----------------------------------------------------------------------------

/// Implemented by the types that can be stored in a [`Value`].
pub trait Element: 'static + Clone + Send + Sync {
    /// The run-time identifier of `Self`.
    const TYPE_ID: TypeId;

    /// Box `self` into a [`Value`].
    fn into_value(self) -> Value;

    /// Borrow the payload of `value` if it holds a `Self`.
    fn from_value(value: &Value) -> Option<&Self>;
}

macro_rules! impl_element {
    ($($t:ty => $id:ident),* $(,)?) => {
        $(
            impl Element for $t {
                const TYPE_ID: TypeId = TypeId::$id;

                fn into_value(self) -> Value { Value::$id(self) }

                fn from_value(value: &Value) -> Option<&Self> {
                    match value {
                        Value::$id(v) => Some(v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_element! {
    i8 => Int8,
    u8 => UInt8,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
    i64 => Int64,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
    Complex<f32> => Complex32,
    Complex<f64> => Complex64,
    String => String,
    Byte => Binary,
    bool => Bool,
}

/// Returns the [`TypeId`] of `T`.
///
/// ```
/// use mdcore::{type_id, TypeId};
/// assert_eq!(type_id::<u16>(), TypeId::UInt16);
/// ```
pub fn type_id<T: Element>() -> TypeId { T::TYPE_ID }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_to_str() {
        assert_eq!(TypeId::Int8.name().unwrap(), "int8");
        assert_eq!(TypeId::UInt8.name().unwrap(), "uint8");
        assert_eq!(TypeId::UInt32.name().unwrap(), "uint32");
        assert_eq!(TypeId::Float128.name().unwrap(), "float128");
        assert_eq!(TypeId::Complex32.name().unwrap(), "complex32");
        assert_eq!(TypeId::String.name().unwrap(), "string");
        assert_eq!(TypeId::Binary.name().unwrap(), "binary");
        assert_eq!(TypeId::None.name(), Err(Error::KeyError("None".into())));
    }

    #[test]
    fn str_to_id() {
        for (id, name) in NAMES {
            assert_eq!(name.parse::<TypeId>().unwrap(), *id);
        }
        assert_eq!("i8".parse::<TypeId>().unwrap(), TypeId::Int8);
        assert_eq!("ui64".parse::<TypeId>().unwrap(), TypeId::UInt64);
        assert_eq!("c128".parse::<TypeId>().unwrap(), TypeId::Complex128);
        assert_eq!("str".parse::<TypeId>().unwrap(), TypeId::String);
        assert_eq!("blabla".parse::<TypeId>(), Err(Error::KeyError("blabla".into())));
    }

    #[test]
    fn classes() {
        assert!(TypeId::UInt16.is_integer());
        assert!(TypeId::Float64.is_float());
        assert!(TypeId::Complex32.is_complex());
        assert!(TypeId::Complex32.is_numeric());
        assert!(!TypeId::String.is_numeric());
        assert_eq!(TypeId::Bool.class(), TypeClass::Bool);
        assert_eq!(TypeId::None.class(), TypeClass::None);
    }

    #[test]
    fn element_ids() {
        assert_eq!(type_id::<i64>(), TypeId::Int64);
        assert_eq!(type_id::<Complex<f32>>(), TypeId::Complex32);
        assert_eq!(type_id::<Byte>(), TypeId::Binary);
        assert_eq!(type_id::<String>(), TypeId::String);
        assert_eq!(TypeId::Float32.to_string(), "float32");
        assert_eq!(TypeId::None.to_string(), "none");
    }
}
