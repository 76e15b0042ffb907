use crate::kind::Kind;

/// Error type for descriptor resolution and container operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("{param} must be a string or an instance of DataType, an instance of {given} given")]
    InvalidTypeSpecification { param: &'static str, given: String },
    #[error("Unsupported type '{0}'")]
    UnsupportedTypeName(String),
    #[error("{param} must be {kinds}, {given} given", kinds = Kind::supported_list())]
    UnsupportedTypeKind { param: &'static str, given: String },
    #[error("Invalid key: null is not supported inside maps")]
    NullKeyNotAllowed,
    #[error("Invalid value: null is not supported inside {container}")]
    NullValueNotAllowed { container: &'static str },
    #[error("Invalid key: expected {expected}, an instance of {given} given")]
    KeyTypeMismatch { expected: String, given: String },
    #[error("Invalid value: expected {expected}, an instance of {given} given")]
    ValueTypeMismatch { expected: String, given: String },
    #[error("Invalid key: {0} not found")]
    KeyNotFound(String),
    #[error("Invalid argument for {kind}: {reason}")]
    InvalidArgument { kind: String, reason: String },
    #[error("Index out of bounds: {index} (length {len})")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("Invalid field: {udt} has no field named '{field}'")]
    UnknownField { udt: String, field: String },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid_argument(kind: impl ToString, reason: impl Into<String>) -> Self {
        Error::InvalidArgument {
            kind: kind.to_string(),
            reason: reason.into(),
        }
    }
}
