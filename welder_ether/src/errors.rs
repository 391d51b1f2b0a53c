use thiserror::Error;
use welder_reflect::ReflectError;
use welder_types::{Path, SchemaError};

/// Result alias used across the Ethereum bindings.
pub type EtherResult<T> = Result<T, EtherError>;

/// Errors produced while converting, packing or unpacking ABI data.
#[derive(Debug, Error)]
pub enum EtherError {
    /// Schema and descriptor trees do not correspond.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Building or filling a value failed.
    #[error(transparent)]
    Reflect(#[from] ReflectError),

    /// A type string from a JSON ABI could not be parsed.
    #[error("invalid ABI type '{0}'")]
    AbiTypeParse(String),

    /// A value does not fit the descriptor it is packed against.
    #[error("cannot pack {found} as {expected} at {path}")]
    Value {
        path: Path,
        expected: String,
        found: String,
    },

    /// The number of values differs from the number of descriptors.
    #[error("expected {expected} values, found {found}")]
    ValueCount { expected: usize, found: usize },

    /// Structured input is not a list with one entry per argument.
    #[error("payload must be a JSON array of {expected} entries, found {found}")]
    Payload { expected: usize, found: String },

    /// The external codec refused the data.
    #[error("ABI codec error: {0}")]
    Codec(#[from] ethabi::Error),

    /// The payload or descriptor document is not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl EtherError {
    pub(crate) fn value(path: &Path, expected: impl Into<String>, found: impl Into<String>) -> Self {
        EtherError::Value {
            path: path.clone(),
            expected: expected.into(),
            found: found.into(),
        }
    }
}
