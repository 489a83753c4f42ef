/// Error types for OOXML property parts.
use crate::ooxml::variant::VariantError;
use thiserror::Error;

/// Result type for OOXML operations.
pub type Result<T> = std::result::Result<T, OoxmlError>;

/// Error types for OOXML operations.
#[derive(Error, Debug)]
pub enum OoxmlError {
    /// Variant value error
    #[error("Variant error: {0}")]
    Variant(#[from] VariantError),

    /// XML parsing error
    #[error("XML error: {0}")]
    Xml(String),

    /// Invalid format
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

impl From<quick_xml::Error> for OoxmlError {
    fn from(err: quick_xml::Error) -> Self {
        OoxmlError::Xml(err.to_string())
    }
}
