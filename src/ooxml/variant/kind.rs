//! Variant kind tables.
//!
//! Every element of the `docPropsVTypes` schema is identified by its local
//! tag name. [`VariantKind`] is the closed set of kinds this crate knows how
//! to decode and encode; the two base-type tables describe which kinds may
//! appear inside `vt:array` and `vt:vector` containers.
//!
//! The array and vector tables are deliberately different. Arrays accept
//! `int`/`uint`/`decimal` but no GUIDs or 64-bit integers, while vectors
//! accept `clsid`, `lpstr`/`lpwstr`, `filetime` and the 64-bit integers.
//! Office rejects containers whose base type is outside these lists.

use phf::phf_map;
use std::fmt;

/// A variant type tag (`VT_*`) as it appears in OOXML property parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantKind {
    /// `vt:null`
    Null,
    /// `vt:empty`
    Empty,
    /// `vt:bool`
    Bool,
    /// `vt:lpstr`
    Lpstr,
    /// `vt:lpwstr`
    Lpwstr,
    /// `vt:bstr`, stored with `_xHHHH_` escapes
    BString,
    /// `vt:i1`, signed byte
    Byte,
    /// `vt:i2`
    Short,
    /// `vt:i4`
    Int32,
    /// `vt:int`
    Integer,
    /// `vt:i8`
    Int64,
    /// `vt:ui1`
    UnsignedByte,
    /// `vt:ui2`
    UnsignedShort,
    /// `vt:ui4`
    UInt32,
    /// `vt:uint`
    UnsignedInteger,
    /// `vt:ui8`
    UInt64,
    /// `vt:date`
    Date,
    /// `vt:filetime`
    FileTime,
    /// `vt:r4`
    Float,
    /// `vt:r8`
    Double,
    /// `vt:cy`
    Currency,
    /// `vt:decimal`
    Decimal,
    /// `vt:error`, an SCODE written in hexadecimal
    Error,
    /// `vt:clsid`
    ClassId,
    /// `vt:blob`, length-prefixed base64
    Blob,
    /// `vt:oblob`, length-prefixed base64
    OBlob,
    /// `vt:stream`
    StreamData,
    /// `vt:ostream`
    OStreamData,
    /// `vt:vstream`
    VStreamData,
    /// `vt:storage`
    Storage,
    /// `vt:ostorage`
    OStorage,
    /// `vt:array`
    Array,
    /// `vt:vector`
    Vector,
    /// `vt:variant`, a wrapper around exactly one other variant element
    Variant,
}

static KINDS_BY_TAG: phf::Map<&'static str, VariantKind> = phf_map! {
    "null" => VariantKind::Null,
    "empty" => VariantKind::Empty,
    "bool" => VariantKind::Bool,
    "lpstr" => VariantKind::Lpstr,
    "lpwstr" => VariantKind::Lpwstr,
    "bstr" => VariantKind::BString,
    "i1" => VariantKind::Byte,
    "i2" => VariantKind::Short,
    "i4" => VariantKind::Int32,
    "int" => VariantKind::Integer,
    "i8" => VariantKind::Int64,
    "ui1" => VariantKind::UnsignedByte,
    "ui2" => VariantKind::UnsignedShort,
    "ui4" => VariantKind::UInt32,
    "uint" => VariantKind::UnsignedInteger,
    "ui8" => VariantKind::UInt64,
    "date" => VariantKind::Date,
    "filetime" => VariantKind::FileTime,
    "r4" => VariantKind::Float,
    "r8" => VariantKind::Double,
    "cy" => VariantKind::Currency,
    "decimal" => VariantKind::Decimal,
    "error" => VariantKind::Error,
    "clsid" => VariantKind::ClassId,
    "blob" => VariantKind::Blob,
    "oblob" => VariantKind::OBlob,
    "stream" => VariantKind::StreamData,
    "ostream" => VariantKind::OStreamData,
    "vstream" => VariantKind::VStreamData,
    "storage" => VariantKind::Storage,
    "ostorage" => VariantKind::OStorage,
    "array" => VariantKind::Array,
    "vector" => VariantKind::Vector,
    "variant" => VariantKind::Variant,
};

impl VariantKind {
    /// Look up a kind by its exact (case-sensitive) local tag name.
    #[inline]
    pub fn from_tag(tag: &str) -> Option<Self> {
        KINDS_BY_TAG.get(tag).copied()
    }

    /// The local tag name written for this kind.
    pub const fn tag_name(self) -> &'static str {
        match self {
            VariantKind::Null => "null",
            VariantKind::Empty => "empty",
            VariantKind::Bool => "bool",
            VariantKind::Lpstr => "lpstr",
            VariantKind::Lpwstr => "lpwstr",
            VariantKind::BString => "bstr",
            VariantKind::Byte => "i1",
            VariantKind::Short => "i2",
            VariantKind::Int32 => "i4",
            VariantKind::Integer => "int",
            VariantKind::Int64 => "i8",
            VariantKind::UnsignedByte => "ui1",
            VariantKind::UnsignedShort => "ui2",
            VariantKind::UInt32 => "ui4",
            VariantKind::UnsignedInteger => "uint",
            VariantKind::UInt64 => "ui8",
            VariantKind::Date => "date",
            VariantKind::FileTime => "filetime",
            VariantKind::Float => "r4",
            VariantKind::Double => "r8",
            VariantKind::Currency => "cy",
            VariantKind::Decimal => "decimal",
            VariantKind::Error => "error",
            VariantKind::ClassId => "clsid",
            VariantKind::Blob => "blob",
            VariantKind::OBlob => "oblob",
            VariantKind::StreamData => "stream",
            VariantKind::OStreamData => "ostream",
            VariantKind::VStreamData => "vstream",
            VariantKind::Storage => "storage",
            VariantKind::OStorage => "ostorage",
            VariantKind::Array => "array",
            VariantKind::Vector => "vector",
            VariantKind::Variant => "variant",
        }
    }

    /// Name of the [`Value`](super::Value) variant this kind decodes to.
    pub const fn value_type_name(self) -> &'static str {
        match self {
            VariantKind::Null => "Null",
            VariantKind::Empty => "Empty",
            VariantKind::Bool => "Bool",
            VariantKind::Lpstr | VariantKind::Lpwstr | VariantKind::BString => "Str",
            VariantKind::Byte => "I8",
            VariantKind::Short => "I16",
            VariantKind::Int32 | VariantKind::Integer => "I32",
            VariantKind::Int64 => "I64",
            VariantKind::UnsignedByte => "U8",
            VariantKind::UnsignedShort => "U16",
            VariantKind::UInt32 | VariantKind::UnsignedInteger => "U32",
            VariantKind::UInt64 => "U64",
            VariantKind::Date | VariantKind::FileTime => "DateTime",
            VariantKind::Float => "F32",
            VariantKind::Double => "F64",
            VariantKind::Currency | VariantKind::Decimal => "Decimal",
            VariantKind::Error => "ErrorCode",
            VariantKind::ClassId => "Guid",
            VariantKind::Blob
            | VariantKind::OBlob
            | VariantKind::StreamData
            | VariantKind::OStreamData
            | VariantKind::VStreamData
            | VariantKind::Storage
            | VariantKind::OStorage => "Bytes",
            VariantKind::Array => "Array",
            VariantKind::Vector => "Vector",
            VariantKind::Variant => "Nested",
        }
    }

    /// Whether this kind is one of the length-prefixed blob kinds.
    #[inline]
    pub const fn is_blob(self) -> bool {
        matches!(self, VariantKind::Blob | VariantKind::OBlob)
    }

    /// Whether this kind carries a plain (unprefixed) base64 payload.
    #[inline]
    pub const fn is_stream(self) -> bool {
        matches!(
            self,
            VariantKind::StreamData
                | VariantKind::OStreamData
                | VariantKind::VStreamData
                | VariantKind::Storage
                | VariantKind::OStorage
        )
    }
}

impl fmt::Display for VariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag_name())
    }
}

/// Allowed `baseType` values of a `vt:array`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayBaseType {
    Variant,
    Byte,
    Short,
    Int32,
    Integer,
    UnsignedByte,
    UnsignedShort,
    UInt32,
    UnsignedInteger,
    Float,
    Double,
    Decimal,
    BString,
    Date,
    Bool,
    Currency,
    Error,
}

static ARRAY_BASE_TYPES: phf::Map<&'static str, ArrayBaseType> = phf_map! {
    "variant" => ArrayBaseType::Variant,
    "i1" => ArrayBaseType::Byte,
    "i2" => ArrayBaseType::Short,
    "i4" => ArrayBaseType::Int32,
    "int" => ArrayBaseType::Integer,
    "ui1" => ArrayBaseType::UnsignedByte,
    "ui2" => ArrayBaseType::UnsignedShort,
    "ui4" => ArrayBaseType::UInt32,
    "uint" => ArrayBaseType::UnsignedInteger,
    "r4" => ArrayBaseType::Float,
    "r8" => ArrayBaseType::Double,
    "decimal" => ArrayBaseType::Decimal,
    "bstr" => ArrayBaseType::BString,
    "date" => ArrayBaseType::Date,
    "bool" => ArrayBaseType::Bool,
    "cy" => ArrayBaseType::Currency,
    "error" => ArrayBaseType::Error,
};

impl ArrayBaseType {
    /// Parse a `baseType` attribute value.
    #[inline]
    pub fn parse(s: &str) -> Option<Self> {
        ARRAY_BASE_TYPES.get(s).copied()
    }

    /// The leaf kind of each child element.
    pub const fn element_kind(self) -> VariantKind {
        match self {
            ArrayBaseType::Variant => VariantKind::Variant,
            ArrayBaseType::Byte => VariantKind::Byte,
            ArrayBaseType::Short => VariantKind::Short,
            ArrayBaseType::Int32 => VariantKind::Int32,
            ArrayBaseType::Integer => VariantKind::Integer,
            ArrayBaseType::UnsignedByte => VariantKind::UnsignedByte,
            ArrayBaseType::UnsignedShort => VariantKind::UnsignedShort,
            ArrayBaseType::UInt32 => VariantKind::UInt32,
            ArrayBaseType::UnsignedInteger => VariantKind::UnsignedInteger,
            ArrayBaseType::Float => VariantKind::Float,
            ArrayBaseType::Double => VariantKind::Double,
            ArrayBaseType::Decimal => VariantKind::Decimal,
            ArrayBaseType::BString => VariantKind::BString,
            ArrayBaseType::Date => VariantKind::Date,
            ArrayBaseType::Bool => VariantKind::Bool,
            ArrayBaseType::Currency => VariantKind::Currency,
            ArrayBaseType::Error => VariantKind::Error,
        }
    }

    /// The base type used for elements of `kind`, if arrays allow it.
    pub fn for_kind(kind: VariantKind) -> Option<Self> {
        Self::parse(kind.tag_name())
    }

    /// The attribute value written for this base type.
    #[inline]
    pub const fn as_str(self) -> &'static str {
        self.element_kind().tag_name()
    }
}

/// Allowed `baseType` values of a `vt:vector`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VectorBaseType {
    Variant,
    Byte,
    Short,
    Int32,
    Int64,
    UnsignedByte,
    UnsignedShort,
    UInt32,
    UInt64,
    Float,
    Double,
    Lpstr,
    Lpwstr,
    BString,
    Date,
    FileTime,
    Bool,
    Currency,
    Error,
    ClassId,
}

static VECTOR_BASE_TYPES: phf::Map<&'static str, VectorBaseType> = phf_map! {
    "variant" => VectorBaseType::Variant,
    "i1" => VectorBaseType::Byte,
    "i2" => VectorBaseType::Short,
    "i4" => VectorBaseType::Int32,
    "i8" => VectorBaseType::Int64,
    "ui1" => VectorBaseType::UnsignedByte,
    "ui2" => VectorBaseType::UnsignedShort,
    "ui4" => VectorBaseType::UInt32,
    "ui8" => VectorBaseType::UInt64,
    "r4" => VectorBaseType::Float,
    "r8" => VectorBaseType::Double,
    "lpstr" => VectorBaseType::Lpstr,
    "lpwstr" => VectorBaseType::Lpwstr,
    "bstr" => VectorBaseType::BString,
    "date" => VectorBaseType::Date,
    "filetime" => VectorBaseType::FileTime,
    "bool" => VectorBaseType::Bool,
    "cy" => VectorBaseType::Currency,
    "error" => VectorBaseType::Error,
    "clsid" => VectorBaseType::ClassId,
};

impl VectorBaseType {
    /// Parse a `baseType` attribute value.
    #[inline]
    pub fn parse(s: &str) -> Option<Self> {
        VECTOR_BASE_TYPES.get(s).copied()
    }

    /// The leaf kind of each child element.
    pub const fn element_kind(self) -> VariantKind {
        match self {
            VectorBaseType::Variant => VariantKind::Variant,
            VectorBaseType::Byte => VariantKind::Byte,
            VectorBaseType::Short => VariantKind::Short,
            VectorBaseType::Int32 => VariantKind::Int32,
            VectorBaseType::Int64 => VariantKind::Int64,
            VectorBaseType::UnsignedByte => VariantKind::UnsignedByte,
            VectorBaseType::UnsignedShort => VariantKind::UnsignedShort,
            VectorBaseType::UInt32 => VariantKind::UInt32,
            VectorBaseType::UInt64 => VariantKind::UInt64,
            VectorBaseType::Float => VariantKind::Float,
            VectorBaseType::Double => VariantKind::Double,
            VectorBaseType::Lpstr => VariantKind::Lpstr,
            VectorBaseType::Lpwstr => VariantKind::Lpwstr,
            VectorBaseType::BString => VariantKind::BString,
            VectorBaseType::Date => VariantKind::Date,
            VectorBaseType::FileTime => VariantKind::FileTime,
            VectorBaseType::Bool => VariantKind::Bool,
            VectorBaseType::Currency => VariantKind::Currency,
            VectorBaseType::Error => VariantKind::Error,
            VectorBaseType::ClassId => VariantKind::ClassId,
        }
    }

    /// The base type used for elements of `kind`, if vectors allow it.
    pub fn for_kind(kind: VariantKind) -> Option<Self> {
        Self::parse(kind.tag_name())
    }

    /// The attribute value written for this base type.
    #[inline]
    pub const fn as_str(self) -> &'static str {
        self.element_kind().tag_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_KINDS: [VariantKind; 34] = [
        VariantKind::Null,
        VariantKind::Empty,
        VariantKind::Bool,
        VariantKind::Lpstr,
        VariantKind::Lpwstr,
        VariantKind::BString,
        VariantKind::Byte,
        VariantKind::Short,
        VariantKind::Int32,
        VariantKind::Integer,
        VariantKind::Int64,
        VariantKind::UnsignedByte,
        VariantKind::UnsignedShort,
        VariantKind::UInt32,
        VariantKind::UnsignedInteger,
        VariantKind::UInt64,
        VariantKind::Date,
        VariantKind::FileTime,
        VariantKind::Float,
        VariantKind::Double,
        VariantKind::Currency,
        VariantKind::Decimal,
        VariantKind::Error,
        VariantKind::ClassId,
        VariantKind::Blob,
        VariantKind::OBlob,
        VariantKind::StreamData,
        VariantKind::OStreamData,
        VariantKind::VStreamData,
        VariantKind::Storage,
        VariantKind::OStorage,
        VariantKind::Array,
        VariantKind::Vector,
        VariantKind::Variant,
    ];

    #[test]
    fn test_tag_table_is_bijective() {
        for kind in ALL_KINDS {
            assert_eq!(VariantKind::from_tag(kind.tag_name()), Some(kind));
        }
        assert_eq!(KINDS_BY_TAG.len(), ALL_KINDS.len());
    }

    #[test]
    fn test_tag_lookup_is_case_sensitive() {
        assert_eq!(VariantKind::from_tag("I4"), None);
        assert_eq!(VariantKind::from_tag("LPWSTR"), None);
        assert_eq!(VariantKind::from_tag("VTFrobnicate"), None);
    }

    #[test]
    fn test_array_and_vector_tables_differ() {
        // GUIDs only exist in vectors
        assert_eq!(ArrayBaseType::for_kind(VariantKind::ClassId), None);
        assert_eq!(
            VectorBaseType::for_kind(VariantKind::ClassId),
            Some(VectorBaseType::ClassId)
        );

        // decimal only exists in arrays, cy in both
        assert_eq!(
            ArrayBaseType::for_kind(VariantKind::Decimal),
            Some(ArrayBaseType::Decimal)
        );
        assert_eq!(VectorBaseType::for_kind(VariantKind::Decimal), None);
        assert!(ArrayBaseType::for_kind(VariantKind::Currency).is_some());
        assert!(VectorBaseType::for_kind(VariantKind::Currency).is_some());

        // 64-bit integers and lpwstr only exist in vectors
        assert_eq!(ArrayBaseType::for_kind(VariantKind::Int64), None);
        assert_eq!(ArrayBaseType::for_kind(VariantKind::Lpwstr), None);
        assert!(VectorBaseType::for_kind(VariantKind::UInt64).is_some());
    }

    #[test]
    fn test_base_type_round_trip() {
        for (name, base) in ARRAY_BASE_TYPES.entries() {
            assert_eq!(base.as_str(), *name);
        }
        for (name, base) in VECTOR_BASE_TYPES.entries() {
            assert_eq!(base.as_str(), *name);
        }
    }

    #[test]
    fn test_currency_and_decimal_share_value_type() {
        assert_eq!(
            VariantKind::Currency.value_type_name(),
            VariantKind::Decimal.value_type_name()
        );
    }
}
