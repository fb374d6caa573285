//! Error types for mask loading.
//!
//! The numeric core never fails: degenerate geometry evaluates to an
//! unmasked value instead. Errors only come from decoding descriptions.

use thiserror::Error;

/// Result type for mask operations.
pub type MaskResult<T> = Result<T, MaskError>;

/// Errors that can occur while building a generator from a description.
#[derive(Debug, Error)]
pub enum MaskError {
    /// A curve string or point list could not be decoded.
    #[error("Invalid curve: {0}")]
    InvalidCurve(String),

    /// An attribute was present but not parseable.
    #[error("Invalid value for attribute '{name}': {value}")]
    InvalidAttribute {
        /// Attribute name.
        name: String,
        /// Raw attribute value.
        value: String,
    },

    /// The outline shape is not provided by this crate.
    #[error("Unsupported mask shape: {0}")]
    UnsupportedShape(String),

    /// XML fragment could not be parsed.
    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),

    /// JSON document serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
