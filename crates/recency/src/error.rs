//! Error types for recency

use std::fmt;

/// Returned by `check_invariants` when the list structure is inconsistent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Create a new invariant error with the given description
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Description of the invariant that failed
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invariant violated: {}", self.0)
    }
}

impl std::error::Error for InvariantError {}
