//! OLE variant (`VT_*`) values in OOXML property parts.
//!
//! Custom and extended document properties store their values as elements
//! of the `docPropsVTypes` schema: `<vt:i4>42</vt:i4>`,
//! `<vt:vector size="2" baseType="lpstr">...</vt:vector>` and so on. This
//! module converts between those elements and typed [`Value`]s.
//!
//! # Wire format
//!
//! - `bstr` text escapes code units as `_xHHHH_` (see [`bstr`]).
//! - `blob`/`oblob` are base64 of a 4-byte little-endian length followed by
//!   the data (see [`blob`]).
//! - `filetime`/`date` are written as `yyyy-MM-ddTHH:mm:ssZ` in UTC.
//! - `error` is unsigned hexadecimal without a prefix.
//! - `array` bounds are comma-separated per dimension.
//!
//! # Example
//!
//! ```rust
//! use oxvariant::ooxml::variant::{decode, encode_from_runtime_type, Value, VariantElement};
//!
//! let element: VariantElement = encode_from_runtime_type(&Value::I32(42))?;
//! assert_eq!(element.to_xml()?, "<vt:i4>42</vt:i4>");
//! assert_eq!(decode(&element)?, Value::I32(42));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod blob;
pub mod bstr;
mod collection;
pub mod element;
pub mod error;
pub mod kind;
mod scalar;
pub mod value;
pub(crate) mod xml;

pub use element::{Element, VariantElement};
pub use error::{Result, VariantError};
pub use kind::{ArrayBaseType, VariantKind, VectorBaseType};
pub use scalar::DATE_FORMAT;
pub use value::Value;

use collection::{decode_array, decode_vector, encode_array, encode_vector};
use scalar::{decode_scalar, encode_scalar};

/// Decode a variant element into a typed value.
///
/// Dispatch is on the exact tag name; an unknown tag is an error.
///
/// Leaf text is read leniently: surrounding whitespace is ignored, `bool`
/// also accepts `1`/`0` and any letter case, and `decimal`/`cy` accept `,`
/// as the separator.
pub fn decode<E: Element>(element: &E) -> Result<Value> {
    let tag = element.tag_name();
    let Some(kind) = VariantKind::from_tag(tag) else {
        #[cfg(feature = "logging")]
        log::debug!("unsupported variant element <{}>", tag);
        return Err(VariantError::UnsupportedKind(tag.to_string()));
    };

    match kind {
        VariantKind::Array => decode_array(element),
        VariantKind::Vector => decode_vector(element),
        VariantKind::Variant => decode_wrapper(element),
        _ => decode_scalar(kind, element.inner_text()),
    }
}

/// Decode a `vt:variant` wrapper.
///
/// A wrapper without content is `Null`. Only the first child is read.
pub(crate) fn decode_wrapper<E: Element>(element: &E) -> Result<Value> {
    let mut children = element.child_elements();
    let Some(child) = children.next() else {
        return Ok(Value::Null);
    };

    #[cfg(feature = "logging")]
    {
        let extra = children.count();
        if extra > 0 {
            log::debug!("ignoring {} extra children of <variant>", extra);
        }
    }

    Ok(Value::Nested(Box::new(decode(child)?)))
}

/// Encode a value as an element of the given kind.
///
/// The value must have the shape `kind` decodes to. `format` is a chrono
/// pattern for `date`/`filetime`, defaulting to [`DATE_FORMAT`].
pub fn encode<E: Element>(kind: VariantKind, value: &Value, format: Option<&str>) -> Result<E> {
    match (kind, value) {
        (
            VariantKind::Array,
            Value::Array {
                element_kind,
                bounds,
                items,
            },
        ) => encode_array(*element_kind, bounds, items, format),
        (
            VariantKind::Vector,
            Value::Vector {
                element_kind,
                items,
            },
        ) => encode_vector(*element_kind, items, format),
        (VariantKind::Variant, Value::Nested(inner)) => encode_wrapped(inner, format),
        (VariantKind::Array | VariantKind::Vector | VariantKind::Variant, value) => {
            Err(VariantError::KindMismatch {
                kind,
                found: value.type_name(),
            })
        },
        (kind, value) => Ok(E::make(kind.tag_name(), &encode_scalar(kind, value, format)?)),
    }
}

/// Encode a value, choosing the kind from the value's type.
///
/// Strings become `lpwstr`, date-times `filetime`, arrays keep their element
/// kind, and vectors always become `variant` vectors with every item
/// wrapped, whatever their element kind. `Null`, `Empty`, error codes,
/// bytes and nested values have no inferred kind.
pub fn encode_from_runtime_type<E: Element>(value: &Value) -> Result<E> {
    match value {
        Value::Array {
            element_kind,
            bounds,
            items,
        } => encode_array(*element_kind, bounds, items, None),
        Value::Vector { items, .. } => encode_vector(VariantKind::Variant, items, None),
        other => {
            let kind = runtime_kind(other).ok_or(VariantError::UnsupportedValueType(other.type_name()))?;
            encode(kind, other, None)
        },
    }
}

/// The kind `encode_from_runtime_type` picks for a scalar value.
pub fn runtime_kind(value: &Value) -> Option<VariantKind> {
    let kind = match value {
        Value::Bool(_) => VariantKind::Bool,
        Value::Str(_) => VariantKind::Lpwstr,
        Value::I8(_) => VariantKind::Byte,
        Value::I16(_) => VariantKind::Short,
        Value::I32(_) => VariantKind::Int32,
        Value::I64(_) => VariantKind::Int64,
        Value::U8(_) => VariantKind::UnsignedByte,
        Value::U16(_) => VariantKind::UnsignedShort,
        Value::U32(_) => VariantKind::UInt32,
        Value::U64(_) => VariantKind::UInt64,
        Value::DateTime(_) => VariantKind::FileTime,
        Value::F32(_) => VariantKind::Float,
        Value::F64(_) => VariantKind::Double,
        Value::Decimal(_) => VariantKind::Decimal,
        Value::Guid(_) => VariantKind::ClassId,
        Value::Array { .. } => VariantKind::Array,
        Value::Vector { .. } => VariantKind::Vector,
        Value::Null
        | Value::Empty
        | Value::ErrorCode(_)
        | Value::Bytes(_)
        | Value::Nested(_) => return None,
    };
    Some(kind)
}

/// Wrap a value in `vt:variant`.
///
/// Inside a wrapper the markers and raw kinds are representable too:
/// `Null`, `Empty`, error codes (`error`) and bytes (`blob`).
pub(crate) fn encode_wrapped<E: Element>(value: &Value, format: Option<&str>) -> Result<E> {
    let inner = match value {
        Value::Null => encode(VariantKind::Null, value, None)?,
        Value::Empty => encode(VariantKind::Empty, value, None)?,
        Value::ErrorCode(_) => encode(VariantKind::Error, value, None)?,
        Value::Bytes(_) => encode(VariantKind::Blob, value, None)?,
        Value::Nested(inner) => encode_wrapped(inner, format)?,
        Value::Array { .. } | Value::Vector { .. } => encode_from_runtime_type(value)?,
        other => match runtime_kind(other) {
            Some(kind) => encode(kind, other, format)?,
            None => return Err(VariantError::UnsupportedValueType(other.type_name())),
        },
    };

    let mut wrapper = E::make(VariantKind::Variant.tag_name(), "");
    wrapper.append_child(inner);
    Ok(wrapper)
}
