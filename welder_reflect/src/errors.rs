use thiserror::Error;
use welder_types::{Path, SchemaError};

/// Result alias used across the synthesis crate.
pub type ReflectResult<T> = Result<T, ReflectError>;

/// Top-level errors produced while building or filling values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReflectError {
    /// The schema itself is malformed or uses an unsupported kind.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A strategy refused a kind that is otherwise well formed.
    #[error("type '{kind}' at {path} is not supported by this builder: {reason}")]
    Rejected {
        kind: String,
        path: Path,
        reason: String,
    },

    /// Structured input did not fit the synthesized type.
    #[error("expected {expected} at {path}, found {found}")]
    Decode {
        path: Path,
        expected: String,
        found: String,
    },
}

impl ReflectError {
    pub(crate) fn decode(path: &Path, expected: impl Into<String>, found: impl Into<String>) -> Self {
        ReflectError::Decode {
            path: path.clone(),
            expected: expected.into(),
            found: found.into(),
        }
    }
}
