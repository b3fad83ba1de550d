//! Unified error type for all store operations.

use thiserror::Error;

/// Things that can go wrong when using the store.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Empty key, missing value, or a value JSON can't represent.
    #[error("validation error: {0}")]
    Validation(String),
    /// `get` on a key that isn't in the store.
    #[error("no value for: {0}")]
    NotFound(String),
    /// File system problem (read, write, mkdir, rename).
    #[error("i/o error: {0}")]
    Io(String),
    /// The state file exists but isn't a JSON object.
    #[error("corrupt state file: {0}")]
    CorruptState(String),
    /// Failed to serialize the snapshot to bytes.
    #[error("serialization error: {0}")]
    Serialize(String),
    /// A stored value didn't match the requested type.
    #[error("deserialization error: {0}")]
    Deserialize(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

/// Result alias using our [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;
