use thiserror::Error;

/// Errors that can occur while building or serializing a SEPA document.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SepaError {
    /// A field setter rejected its input.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A payment batch failed its validity check at render time.
    /// Carries the batch identification.
    #[error("invalid payment info: {0}")]
    InvalidPaymentInfo(String),

    /// The document tree is incomplete or inconsistent.
    #[error("builder error: {0}")]
    Builder(String),

    /// XML generation error.
    #[error("XML error: {0}")]
    Xml(String),

    /// Writing the serialized document failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dot-separated path to the invalid field (e.g. "group_header.message_identification").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Length violation for a bounded text field.
    pub fn too_long(field: impl Into<String>, max: usize) -> Self {
        Self::new(field, format!("must not exceed {max} characters"))
    }

    /// A required value was missing or empty.
    pub fn required(field: impl Into<String>) -> Self {
        Self::new(field, "is required and must not be empty")
    }
}
