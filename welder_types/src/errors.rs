use crate::path::Path;
use thiserror::Error;

/// Result alias used for structural schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Structural errors shared by the type converter and the value synthesizer.
///
/// Every variant carries the path of the offending node.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A kind or descriptor tag outside the supported vocabulary.
    #[error("unsupported type '{kind}' at {path}")]
    UnsupportedType { kind: String, path: Path },

    /// An array does not have exactly one element type.
    #[error("array at {path} must have exactly one child, found {found}")]
    Arity { path: Path, found: usize },

    /// An object has no fields.
    #[error("object at {path} must have at least one child")]
    EmptyObject { path: Path },

    /// An object field has an empty name.
    #[error("field #{index} of object at {path} has no name")]
    UnnamedField { path: Path, index: usize },

    /// Two fields of one object share a name.
    #[error("object at {path} declares field '{name}' more than once")]
    DuplicateField { path: Path, name: String },

    /// A tuple descriptor's name list and type list disagree in length.
    #[error("tuple at {path} has {names} field names but {types} field types")]
    InconsistentTuple {
        path: Path,
        names: usize,
        types: usize,
    },

    /// A sequence descriptor has no element type.
    #[error("sequence at {path} has no element type")]
    MissingElementType { path: Path },

    /// A size that the target representation cannot express.
    #[error("{kind} at {path} has invalid size {size}")]
    InvalidSize {
        kind: String,
        size: usize,
        path: Path,
    },

    /// The tree nests deeper than the configured limit.
    #[error("schema at {path} nests deeper than the limit of {limit}")]
    TooDeep { path: Path, limit: usize },

    /// The zero value of the node would allocate more slots than allowed.
    #[error("value at {path} exceeds the limit of {limit} elements")]
    TooLarge { path: Path, limit: usize },
}

impl SchemaError {
    pub fn path(&self) -> &Path {
        match self {
            SchemaError::UnsupportedType { path, .. }
            | SchemaError::Arity { path, .. }
            | SchemaError::EmptyObject { path }
            | SchemaError::UnnamedField { path, .. }
            | SchemaError::DuplicateField { path, .. }
            | SchemaError::InconsistentTuple { path, .. }
            | SchemaError::MissingElementType { path }
            | SchemaError::InvalidSize { path, .. }
            | SchemaError::TooDeep { path, .. }
            | SchemaError::TooLarge { path, .. } => path,
        }
    }
}
