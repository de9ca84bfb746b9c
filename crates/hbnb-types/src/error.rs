use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown class: {0}")]
    UnknownClass(String),

    #[error("invalid timestamp {value:?}: {reason}")]
    InvalidTimestamp { value: String, reason: String },

    #[error("invalid object key: {0:?}")]
    InvalidKey(String),

    #[error("entity id must not be empty")]
    EmptyId,
}
