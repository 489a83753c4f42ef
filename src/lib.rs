//! Oxvariant - OOXML variant property values for Rust
//!
//! This library converts between the typed variant elements of the OOXML
//! `docPropsVTypes` namespace (`vt:i4`, `vt:lpwstr`, `vt:vector`, ...) and a
//! plain Rust [`Value`].
//!
//! # Features
//!
//! - **Variant codec**: Decode and encode every `vt:*` element kind
//! - **BSTR escaping**: `_xHHHH_` escapes for control and surrogate characters
//! - **Blobs and streams**: Length-prefixed and plain base64 payloads
//! - **Arrays and vectors**: Bounded arrays and sized vectors of any base type
//! - **Runtime inference**: Encode a value without naming its element kind
//! - **Custom properties**: Read and write `docProps/custom.xml`
//!
//! # Example - Decoding an element
//!
//! ```
//! use oxvariant::{Value, VariantElement, decode};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let element = VariantElement::from_xml(
//!     r#"<vt:vector size="2" baseType="lpwstr"><vt:lpwstr>a</vt:lpwstr><vt:lpwstr>b</vt:lpwstr></vt:vector>"#,
//! )?;
//! let value = decode(&element)?;
//! assert!(matches!(value, Value::Vector { ref items, .. } if items.len() == 2));
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Encoding a value
//!
//! ```
//! use oxvariant::{Value, VariantElement, VariantKind, encode, encode_from_runtime_type};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // With an explicit kind
//! let element: VariantElement = encode(VariantKind::Lpstr, &Value::from("text"), None)?;
//! assert_eq!(element.to_xml()?, "<vt:lpstr>text</vt:lpstr>");
//!
//! // Kind picked from the value
//! let element: VariantElement = encode_from_runtime_type(&Value::I64(7))?;
//! assert_eq!(element.to_xml()?, "<vt:i8>7</vt:i8>");
//! # Ok(())
//! # }
//! ```

/// OOXML (Office Open XML) property values
///
/// This module provides the variant codec and the custom properties part
/// built on it.
pub mod ooxml;

// Re-export commonly used types for convenience
pub use ooxml::custom_properties::CustomProperties;
pub use ooxml::variant::{
    Element, Value, VariantElement, VariantError, VariantKind, decode, encode,
    encode_from_runtime_type,
};
