//! Office Open XML (OOXML) property values.
//!
//! This module covers the typed values stored in OOXML property parts.
//!
//! # Architecture
//!
//! 1. **Variant codec** (`variant`): `vt:*` elements from the `docPropsVTypes`
//!    namespace, decoded to and encoded from [`Value`]
//! 2. **Property parts** (`custom_properties`): `docProps/custom.xml` built on
//!    top of the codec
//! 3. **Errors** (`error`): the part-level error type wrapping codec errors
//!
//! # Example
//!
//! ```rust
//! use oxvariant::ooxml::variant::{Value, VariantElement, decode};
//!
//! let element = VariantElement::from_xml("<vt:i4>42</vt:i4>")?;
//! assert_eq!(decode(&element)?, Value::I32(42));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub mod custom_properties;
pub mod error;
pub mod variant;

pub use custom_properties::CustomProperties;
pub use error::{OoxmlError, Result};
pub use variant::{Value, VariantElement, VariantError, VariantKind};
