//! Object model errors

use crate::{ArrayId, CallableId, ConstructorId, RecordId};

/// Errors from object model operations.
///
/// A lookup miss is not an error: `get` returns `None` for it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ObjectError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Index past the end of this heap's arena. Ids carry no heap tag, so
    /// an in-range id from another heap resolves locally.
    #[error("{0} not found")]
    UnknownRecord(RecordId),

    #[error("{0} not found")]
    UnknownArray(ArrayId),

    #[error("{0} not found")]
    UnknownCallable(CallableId),

    #[error("{0} not found")]
    UnknownConstructor(ConstructorId),

    #[error("delegate chain cycle detected at {0}")]
    ChainCycle(RecordId),

    #[error("delegate chain depth {depth} exceeds max {max}")]
    ChainTooDeep { depth: usize, max: usize },

    #[error("property `{key}` not found in delegate chain")]
    MissingProperty { key: Box<str> },

    #[error("property `{key}` holds {found}, not a function")]
    NotCallable { key: Box<str>, found: &'static str },

    #[error("cannot reach `{key}`: parent is {found}")]
    NotARecord { key: Box<str>, found: &'static str },

    #[error("getter `{key}` nested too deeply")]
    GetterTooDeep { key: Box<str> },
}

impl ObjectError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

/// Result alias for object model operations
pub type Result<T> = std::result::Result<T, ObjectError>;
