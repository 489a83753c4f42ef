//! Text forms of leaf variant kinds.

use super::blob::{decode_blob, decode_stream, encode_blob, encode_stream};
use super::bstr::{decode_bstr, encode_bstr};
use super::error::{Result, VariantError};
use super::kind::VariantKind;
use super::value::Value;
use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use std::borrow::Cow;
use std::fmt::Write;
use uuid::Uuid;

/// Default text form of `vt:date` and `vt:filetime`.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

macro_rules! parse_int {
    ($ty:ty, $kind:expr, $text:expr) => {
        atoi_simd::parse::<$ty>($text.trim().as_bytes())
            .map_err(|_| VariantError::parse($kind, $text))
    };
}

macro_rules! parse_float {
    ($ty:ty, $kind:expr, $text:expr) => {
        fast_float2::parse::<$ty, _>($text.trim()).map_err(|_| VariantError::parse($kind, $text))
    };
}

/// Parse the text of a leaf kind.
///
/// Container kinds (`array`, `vector`, `variant`) are not leaves and are
/// rejected with [`VariantError::UnsupportedKind`].
pub(crate) fn decode_scalar(kind: VariantKind, text: &str) -> Result<Value> {
    let value = match kind {
        VariantKind::Null => Value::Null,
        VariantKind::Empty => Value::Empty,
        VariantKind::Bool => Value::Bool(parse_bool(kind, text)?),
        VariantKind::Lpstr | VariantKind::Lpwstr => Value::Str(text.to_string()),
        VariantKind::BString => Value::Str(decode_bstr(text)),
        VariantKind::Byte => Value::I8(parse_int!(i8, kind, text)?),
        VariantKind::Short => Value::I16(parse_int!(i16, kind, text)?),
        VariantKind::Int32 | VariantKind::Integer => Value::I32(parse_int!(i32, kind, text)?),
        VariantKind::Int64 => Value::I64(parse_int!(i64, kind, text)?),
        VariantKind::UnsignedByte => Value::U8(parse_int!(u8, kind, text)?),
        VariantKind::UnsignedShort => Value::U16(parse_int!(u16, kind, text)?),
        VariantKind::UInt32 | VariantKind::UnsignedInteger => Value::U32(parse_int!(u32, kind, text)?),
        VariantKind::UInt64 => Value::U64(parse_int!(u64, kind, text)?),
        VariantKind::Date | VariantKind::FileTime => Value::DateTime(parse_date(kind, text)?),
        VariantKind::Float => Value::F32(parse_float!(f32, kind, text)?),
        VariantKind::Double => Value::F64(parse_float!(f64, kind, text)?),
        VariantKind::Currency | VariantKind::Decimal => Value::Decimal(parse_decimal(kind, text)?),
        VariantKind::Error => Value::ErrorCode(parse_error_code(text)?),
        VariantKind::ClassId => Value::Guid(
            Uuid::parse_str(text.trim()).map_err(|_| VariantError::parse(kind, text))?,
        ),
        VariantKind::Blob | VariantKind::OBlob => Value::Bytes(decode_blob(text)?),
        VariantKind::StreamData
        | VariantKind::OStreamData
        | VariantKind::VStreamData
        | VariantKind::Storage
        | VariantKind::OStorage => Value::Bytes(decode_stream(kind, text)?),
        VariantKind::Array | VariantKind::Vector | VariantKind::Variant => {
            return Err(VariantError::UnsupportedKind(kind.tag_name().to_string()));
        },
    };
    Ok(value)
}

/// Format a value as the text of a leaf kind.
///
/// `format` is a chrono pattern used by the date kinds; other kinds ignore it.
pub(crate) fn encode_scalar(kind: VariantKind, value: &Value, format: Option<&str>) -> Result<String> {
    let text = match (kind, value) {
        (VariantKind::Null, Value::Null) | (VariantKind::Empty, Value::Empty) => String::new(),
        (VariantKind::Bool, Value::Bool(b)) => (if *b { "true" } else { "false" }).to_string(),
        (VariantKind::Lpstr | VariantKind::Lpwstr, Value::Str(s)) => s.clone(),
        (VariantKind::BString, Value::Str(s)) => encode_bstr(s),
        (VariantKind::Byte, Value::I8(v)) => format_int(*v),
        (VariantKind::Short, Value::I16(v)) => format_int(*v),
        (VariantKind::Int32 | VariantKind::Integer, Value::I32(v)) => format_int(*v),
        (VariantKind::Int64, Value::I64(v)) => format_int(*v),
        (VariantKind::UnsignedByte, Value::U8(v)) => format_int(*v),
        (VariantKind::UnsignedShort, Value::U16(v)) => format_int(*v),
        (VariantKind::UInt32 | VariantKind::UnsignedInteger, Value::U32(v)) => format_int(*v),
        (VariantKind::UInt64, Value::U64(v)) => format_int(*v),
        (VariantKind::Date | VariantKind::FileTime, Value::DateTime(dt)) => {
            format_date(kind, dt, format.unwrap_or(DATE_FORMAT))?
        },
        (VariantKind::Float, Value::F32(v)) => ryu::Buffer::new().format(*v).to_string(),
        (VariantKind::Double, Value::F64(v)) => ryu::Buffer::new().format(*v).to_string(),
        (VariantKind::Currency | VariantKind::Decimal, Value::Decimal(d)) => d.to_string(),
        (VariantKind::Error, Value::ErrorCode(code)) => format!("{:08X}", *code as u32),
        (VariantKind::ClassId, Value::Guid(guid)) => guid
            .braced()
            .encode_upper(&mut Uuid::encode_buffer())
            .to_string(),
        (VariantKind::Blob | VariantKind::OBlob, Value::Bytes(data)) => encode_blob(data)?,
        (kind, Value::Bytes(data)) if kind.is_stream() => encode_stream(data),
        (VariantKind::Array | VariantKind::Vector | VariantKind::Variant, _) => {
            return Err(VariantError::UnsupportedKind(kind.tag_name().to_string()));
        },
        (kind, value) => {
            return Err(VariantError::KindMismatch {
                kind,
                found: value.type_name(),
            });
        },
    };
    Ok(text)
}

fn parse_bool(kind: VariantKind, text: &str) -> Result<bool> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("true") || text == "1" {
        Ok(true)
    } else if text.eq_ignore_ascii_case("false") || text == "0" {
        Ok(false)
    } else {
        Err(VariantError::parse(kind, text))
    }
}

#[inline]
fn format_int<T: itoa::Integer>(v: T) -> String {
    itoa::Buffer::new().format(v).to_string()
}

/// Decimal text accepts either `.` or `,` as the separator.
fn parse_decimal(kind: VariantKind, text: &str) -> Result<Decimal> {
    let trimmed = text.trim();
    let normalized = if trimmed.contains(',') {
        #[cfg(feature = "logging")]
        log::trace!("accepting ',' as decimal separator in {:?}", trimmed);
        Cow::Owned(trimmed.replace(',', "."))
    } else {
        Cow::Borrowed(trimmed)
    };

    normalized
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(&normalized))
        .map_err(|_| VariantError::parse(kind, text))
}

/// SCODEs are unsigned hexadecimal; an `0x` prefix is tolerated.
fn parse_error_code(text: &str) -> Result<i32> {
    let trimmed = text.trim();
    let hex = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    u32::from_str_radix(hex, 16)
        .map(|code| code as i32)
        .map_err(|_| VariantError::parse(VariantKind::Error, text))
}

fn format_date(kind: VariantKind, dt: &DateTime<Utc>, pattern: &str) -> Result<String> {
    let mut out = String::with_capacity(20);
    write!(out, "{}", dt.format(pattern)).map_err(|_| VariantError::parse(kind, pattern))?;
    Ok(out)
}

/// ISO-8601 date-time. Values without an offset are taken as UTC.
fn parse_date(kind: VariantKind, text: &str) -> Result<DateTime<Utc>> {
    let trimmed = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = trimmed.strip_suffix('Z').unwrap_or(trimmed);
    NaiveDateTime::parse_from_str(naive, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(naive, "%Y-%m-%d %H:%M:%S%.f"))
        .or_else(|_| {
            chrono::NaiveDate::parse_from_str(naive, "%Y-%m-%d")
                .map(|date| date.and_time(chrono::NaiveTime::MIN))
        })
        .map(|naive| naive.and_utc())
        .map_err(|_| VariantError::parse(kind, text))
}
