//! Cache configuration

use crate::error::{Error, Result};

/// Default number of entries when no capacity is configured
pub const DEFAULT_CAPACITY: usize = 1024;

/// Construction parameters for [`LruCache`](crate::LruCache)
///
/// With the `serde` feature enabled this can be embedded in a caller's own
/// config file; missing fields fall back to [`Default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct LruConfig {
    /// Maximum number of entries held at once
    pub capacity: usize,
}

impl LruConfig {
    /// Config with the given capacity
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Replace the capacity
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Reject configurations the cache cannot honour
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::ZeroCapacity);
        }
        Ok(())
    }
}

impl Default for LruConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}
