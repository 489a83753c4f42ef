//! Base64 payloads of blob, stream and storage kinds.
//!
//! `vt:blob` and `vt:oblob` carry a 4-byte little-endian length prefix in
//! front of the data before base64 encoding. The stream and storage kinds
//! carry the raw bytes with no prefix.

use super::error::{Result, VariantError};
use super::kind::VariantKind;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_ENGINE;

/// Size of the blob length prefix in bytes.
const LENGTH_PREFIX: usize = 4;

/// Encode bytes as length-prefixed base64.
///
/// Fails if `data` is longer than the prefix can declare.
pub fn encode_blob(data: &[u8]) -> Result<String> {
    let mut buffer = Vec::with_capacity(data.len() + LENGTH_PREFIX);
    buffer.extend_from_slice(&length_prefix(data.len())?);
    buffer.extend_from_slice(data);
    Ok(BASE64_ENGINE.encode(buffer))
}

#[inline]
fn length_prefix(len: usize) -> Result<[u8; LENGTH_PREFIX]> {
    let len = i32::try_from(len).map_err(|_| VariantError::LengthOverflow {
        kind: VariantKind::Blob,
        len,
    })?;
    Ok(len.to_le_bytes())
}

/// Decode length-prefixed base64.
///
/// Empty text decodes to no data. Otherwise the declared length must equal
/// the payload length exactly; a mismatch is rejected rather than truncated.
pub fn decode_blob(text: &str) -> Result<Vec<u8>> {
    let raw = decode_base64(VariantKind::Blob, text)?;
    if raw.is_empty() {
        return Ok(raw);
    }
    if raw.len() < LENGTH_PREFIX {
        return Err(VariantError::MalformedBlob {
            declared: -1,
            actual: raw.len(),
        });
    }

    let declared = i32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]);
    let actual = raw.len() - LENGTH_PREFIX;
    if declared < 0 || declared as usize != actual {
        #[cfg(feature = "logging")]
        log::debug!("blob length prefix {} does not match payload of {} bytes", declared, actual);
        return Err(VariantError::MalformedBlob {
            declared: declared as i64,
            actual,
        });
    }

    Ok(raw[LENGTH_PREFIX..].to_vec())
}

/// Encode bytes as plain base64.
#[inline]
pub fn encode_stream(data: &[u8]) -> String {
    BASE64_ENGINE.encode(data)
}

/// Decode plain base64 for a stream or storage kind. Empty text is no data.
#[inline]
pub fn decode_stream(kind: VariantKind, text: &str) -> Result<Vec<u8>> {
    decode_base64(kind, text)
}

fn decode_base64(kind: VariantKind, text: &str) -> Result<Vec<u8>> {
    // Producers may wrap long payloads across lines.
    let compact: String;
    let text = if text.bytes().any(|b| b.is_ascii_whitespace()) {
        compact = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        compact.as_str()
    } else {
        text
    };

    if text.is_empty() {
        return Ok(Vec::new());
    }
    BASE64_ENGINE
        .decode(text)
        .map_err(|_| VariantError::parse(kind, text))
}
