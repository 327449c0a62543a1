//! Runtime error types

use credit_core::EncodingError;
use thiserror::Error;

/// Model loading and prediction errors
#[derive(Error, Debug)]
pub enum ModelError {
    /// Artifact or metadata file could not be read
    #[error("Failed to read model artifact {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Artifact or metadata is not valid JSON for its schema
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Artifact is structurally invalid
    #[error("Invalid model: {0}")]
    InvalidModel(String),

    /// Row width does not match the model's feature count
    #[error("Feature count mismatch: model expects {expected}, row has {found}")]
    FeatureCount { expected: usize, found: usize },

    /// Model returned no prediction for the submitted row
    #[error("Model returned no prediction")]
    EmptyOutput,
}

/// Metrics and audit sink errors
///
/// These never reach the caller: the handler logs and swallows them.
#[derive(Error, Debug)]
pub enum SinkError {
    /// Collaborator could not be reached or refused the write
    #[error("Sink unavailable: {0}")]
    Unavailable(String),

    /// I/O error from a file-backed sink
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Metric registration or encoding failed
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// Partition key cannot be mapped onto the store
    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

/// Runtime error
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Invocation envelope could not be unpacked
    #[error("Invalid request body: {0}")]
    InvalidEnvelope(String),

    /// Record failed to encode
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    /// Prediction failed
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// Side-effect failure
    #[error(transparent)]
    Sink(#[from] SinkError),
}

impl RuntimeError {
    /// HTTP-equivalent status for the structured error response
    pub fn status_code(&self) -> u16 {
        match self {
            RuntimeError::InvalidEnvelope(_) | RuntimeError::Encoding(_) => 400,
            RuntimeError::Model(_) | RuntimeError::Sink(_) => 500,
        }
    }

    /// Short label used for error counters
    pub fn kind(&self) -> &'static str {
        match self {
            RuntimeError::InvalidEnvelope(_) => "invalid_envelope",
            RuntimeError::Encoding(EncodingError::MissingField(_)) => "missing_field",
            RuntimeError::Encoding(EncodingError::TypeMismatch { .. }) => "type_mismatch",
            RuntimeError::Model(_) => "model",
            RuntimeError::Sink(_) => "sink",
        }
    }
}

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, RuntimeError>;
