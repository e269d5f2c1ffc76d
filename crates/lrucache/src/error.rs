//! Error types for lrucache

use std::fmt;

use recency::InvariantError;

/// Result type alias for lrucache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for cache construction and validation
///
/// Cache misses are not errors; `get` reports them as `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Capacity must be at least 1
    ZeroCapacity,

    /// Index and recency list disagree
    Invariant(InvariantError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ZeroCapacity => write!(f, "Invalid capacity: 0 (must be at least 1)"),
            Error::Invariant(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Invariant(e) => Some(e),
            _ => None,
        }
    }
}

impl From<InvariantError> for Error {
    fn from(err: InvariantError) -> Self {
        Error::Invariant(err)
    }
}
