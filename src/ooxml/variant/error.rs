/// Error types for variant encoding and decoding.
use super::kind::VariantKind;
use thiserror::Error;

/// Result type for variant operations.
pub type Result<T> = std::result::Result<T, VariantError>;

/// Error types for variant operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VariantError {
    /// Element tag is not a known variant kind
    #[error("Unsupported variant kind: {0}")]
    UnsupportedKind(String),

    /// Blob length prefix disagrees with the payload size
    #[error("Malformed blob: declared {declared} bytes, found {actual}")]
    MalformedBlob { declared: i64, actual: usize },

    /// Element text does not match the lexical form of its kind
    #[error("Invalid {kind} value: {text:?}")]
    ParseFailure { kind: VariantKind, text: String },

    /// Array or vector without a `baseType` attribute
    #[error("Missing baseType on {0}")]
    MissingBaseKind(VariantKind),

    /// `baseType` attribute names a type the container does not allow
    #[error("Unsupported {container} base type: {base}")]
    UnsupportedBaseType { container: VariantKind, base: String },

    /// No variant kind can be inferred for the value
    #[error("Unsupported value type: {0}")]
    UnsupportedValueType(&'static str),

    /// Value shape does not match the requested kind
    #[error("Cannot encode {found} as {kind}")]
    KindMismatch { kind: VariantKind, found: &'static str },

    /// Container child whose tag disagrees with the container's base type
    #[error("Expected {expected} element, found {found}")]
    UnexpectedElement { expected: VariantKind, found: String },

    /// Element count disagrees with the declared size or bounds
    #[error("Shape mismatch: room for {expected} elements, found {found}")]
    ShapeMismatch { expected: usize, found: usize },

    /// Length does not fit the 32-bit count the wire format carries
    #[error("{kind} of {len} elements exceeds the 32-bit length limit")]
    LengthOverflow { kind: VariantKind, len: usize },
}

impl VariantError {
    pub(crate) fn parse(kind: VariantKind, text: &str) -> Self {
        VariantError::ParseFailure {
            kind,
            text: text.to_string(),
        }
    }
}
