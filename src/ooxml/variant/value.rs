//! Typed values carried by variant elements.

use super::kind::VariantKind;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

/// A decoded variant value.
///
/// Each [`VariantKind`] decodes to exactly one shape. Several kinds share a
/// shape (`lpstr`, `lpwstr` and `bstr` all decode to [`Value::Str`]), so the
/// kind is not recoverable from a scalar value alone.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `vt:null`
    Null,
    /// `vt:empty`: present but valueless, distinct from `Null`
    Empty,
    Bool(bool),
    Str(String),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    DateTime(DateTime<Utc>),
    F32(f32),
    F64(f64),
    Decimal(Decimal),
    /// An SCODE from `vt:error`
    ErrorCode(i32),
    Guid(Uuid),
    Bytes(Vec<u8>),
    /// A bounded, possibly multi-dimensional array.
    ///
    /// `items` are stored flat in document (row-major) order.
    Array {
        element_kind: VariantKind,
        bounds: Vec<(i32, i32)>,
        items: Vec<Value>,
    },
    /// A zero-based vector.
    Vector {
        element_kind: VariantKind,
        items: Vec<Value>,
    },
    /// The content of a `vt:variant` wrapper
    Nested(Box<Value>),
}

impl Value {
    /// A one-dimensional, zero-based `bstr` array.
    ///
    /// The upper bound saturates at `i32::MAX`; encoding a longer array
    /// reports a shape mismatch.
    pub fn string_array<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items: Vec<Value> = items.into_iter().map(|s| Value::Str(s.into())).collect();
        Value::Array {
            element_kind: VariantKind::BString,
            bounds: vec![(0, i32::try_from(items.len()).map_or(i32::MAX, |n| n - 1))],
            items,
        }
    }

    /// A heterogeneous vector; every item is wrapped in `vt:variant` on encode.
    pub fn object_vector<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Value::Vector {
            element_kind: VariantKind::Variant,
            items: items.into_iter().collect(),
        }
    }

    /// Name of this value's shape, used in error messages.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Empty => "Empty",
            Value::Bool(_) => "Bool",
            Value::Str(_) => "Str",
            Value::I8(_) => "I8",
            Value::I16(_) => "I16",
            Value::I32(_) => "I32",
            Value::I64(_) => "I64",
            Value::U8(_) => "U8",
            Value::U16(_) => "U16",
            Value::U32(_) => "U32",
            Value::U64(_) => "U64",
            Value::DateTime(_) => "DateTime",
            Value::F32(_) => "F32",
            Value::F64(_) => "F64",
            Value::Decimal(_) => "Decimal",
            Value::ErrorCode(_) => "ErrorCode",
            Value::Guid(_) => "Guid",
            Value::Bytes(_) => "Bytes",
            Value::Array { .. } => "Array",
            Value::Vector { .. } => "Vector",
            Value::Nested(_) => "Nested",
        }
    }

    /// Whether this value has the shape `kind` decodes to.
    #[inline]
    pub fn fits(&self, kind: VariantKind) -> bool {
        self.type_name() == kind.value_type_name()
    }

    /// Get the string content, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Strip any number of `vt:variant` wrappers.
    pub fn unwrap_nested(&self) -> &Value {
        let mut value = self;
        while let Value::Nested(inner) = value {
            value = inner.as_ref();
        }
        value
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from! {
    bool => Bool,
    String => Str,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    DateTime<Utc> => DateTime,
    f32 => F32,
    f64 => F64,
    Decimal => Decimal,
    Uuid => Guid,
    Vec<u8> => Bytes,
}

impl From<&str> for Value {
    #[inline]
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}
