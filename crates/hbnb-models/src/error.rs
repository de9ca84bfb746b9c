/// Errors from entity construction, reconstruction, and mutation.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ModelError {
    /// The type name does not match any registered variant.
    #[error("unknown type: {0}")]
    UnknownType(String),

    /// A serialized record is missing a required field or holds a value that
    /// cannot be decoded into its declared type.
    #[error("malformed {class} record: {reason}")]
    MalformedRecord { class: String, reason: String },

    /// Identity and timestamp attributes cannot be assigned.
    #[error("attribute is read-only: {0}")]
    ReadOnlyAttribute(String),

    /// The raw value cannot be coerced to the attribute's declared type.
    #[error("invalid value {value:?} for {attribute}: expected {expected}")]
    InvalidValue {
        attribute: String,
        value: String,
        expected: &'static str,
    },

    /// Serialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl ModelError {
    pub(crate) fn malformed(class: impl ToString, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            class: class.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result alias for model operations.
pub type ModelResult<T> = Result<T, ModelError>;
