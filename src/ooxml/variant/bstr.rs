//! BSTR escaping.
//!
//! `vt:bstr` text keeps to printable ASCII. Every UTF-16 code unit outside
//! `0x20..=0x7E`, and each of `_ < > & "`, is written as `_xHHHH_`. Escaping
//! the underscore itself keeps literal text such as `_x0041_` from being
//! read back as an escape.

use memchr::memchr;
use memchr::memmem;

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Whether `c` must be written as an `_xHHHH_` escape.
#[inline]
pub fn needs_encoding(c: char) -> bool {
    (c as u32) < 0x20 || (c as u32) > 0x7E || matches!(c, '_' | '<' | '>' | '&' | '"')
}

/// Escape a string for `vt:bstr` text.
///
/// # Examples
///
/// ```
/// use oxvariant::ooxml::variant::bstr::encode_bstr;
/// assert_eq!(encode_bstr("_"), "_x005F_");
/// assert_eq!(encode_bstr("a<b"), "a_x003C_b");
/// ```
pub fn encode_bstr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut units = [0u16; 2];
    for c in s.chars() {
        if !needs_encoding(c) {
            out.push(c);
            continue;
        }
        for &unit in c.encode_utf16(&mut units).iter() {
            push_escape(&mut out, unit);
        }
    }
    out
}

#[inline]
fn push_escape(out: &mut String, unit: u16) {
    out.push_str("_x");
    for shift in [12u16, 8, 4, 0] {
        out.push(HEX_DIGITS[((unit >> shift) & 0xF) as usize] as char);
    }
    out.push('_');
}

/// Unescape `vt:bstr` text.
///
/// Each `_x` opens an escape that runs to the next `_`. A run whose body is
/// not 1-4 hex digits is kept verbatim. Scanning stops at the first `_x`
/// with no closing underscore and the rest of the text is kept as is.
///
/// # Examples
///
/// ```
/// use oxvariant::ooxml::variant::bstr::decode_bstr;
/// assert_eq!(decode_bstr("_x005F_"), "_");
/// assert_eq!(decode_bstr("a_x0041_b"), "aAb");
/// assert_eq!(decode_bstr("tail_x0041"), "tail_x0041");
/// ```
pub fn decode_bstr(s: &str) -> String {
    let bytes = s.as_bytes();
    if memmem::find(bytes, b"_x").is_none() {
        return s.to_string();
    }

    let mut out: Vec<u16> = Vec::with_capacity(s.len());
    let mut pos = 0;
    while let Some(offset) = memmem::find(&bytes[pos..], b"_x") {
        let start = pos + offset;
        let body_start = start + 2;
        let Some(body_len) = memchr(b'_', &bytes[body_start..]) else {
            #[cfg(feature = "logging")]
            log::trace!("unterminated BSTR escape at byte {}", start);
            break;
        };
        let body_end = body_start + body_len;

        match parse_code_unit(&s[body_start..body_end]) {
            Some(unit) => {
                out.extend(s[pos..start].encode_utf16());
                out.push(unit);
                pos = body_end + 1;
            },
            None => {
                out.extend(s[pos..body_start].encode_utf16());
                pos = body_start;
            },
        }
    }
    out.extend(s[pos..].encode_utf16());

    String::from_utf16_lossy(&out)
}

#[inline]
fn parse_code_unit(hex: &str) -> Option<u16> {
    if hex.is_empty() || hex.len() > 4 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(hex, 16).ok()
}
