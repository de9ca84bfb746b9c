use std::path::PathBuf;

use hbnb_models::ModelError;

/// Errors from object store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Entity construction or mutation failed.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// A stored record could not be reconstructed.
    #[error("record {key}: {source}")]
    Record {
        key: String,
        #[source]
        source: ModelError,
    },

    /// A record's own class and id disagree with the key it is stored under.
    #[error("record stored under {stored} reconstructs as {computed}")]
    KeyMismatch { stored: String, computed: String },

    /// The durable file is not a JSON object of records.
    #[error("corrupt storage file {}: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },

    /// Serialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Invalid configuration.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
