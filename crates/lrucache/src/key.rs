//! Key identity for cache lookups

use std::hash::Hash;
use std::rc::Rc;
use std::sync::Arc;

/// A type usable as a cache key
///
/// `has_identity` returns `false` for values that cannot name an entry, such
/// as the empty string. `put` silently ignores such keys.
pub trait CacheKey: Hash + Eq + Clone {
    /// Whether this key identifies an entry
    fn has_identity(&self) -> bool {
        true
    }
}

impl CacheKey for String {
    fn has_identity(&self) -> bool {
        !self.is_empty()
    }
}

impl CacheKey for &str {
    fn has_identity(&self) -> bool {
        !self.is_empty()
    }
}

impl CacheKey for Box<str> {
    fn has_identity(&self) -> bool {
        !self.is_empty()
    }
}

impl CacheKey for Arc<str> {
    fn has_identity(&self) -> bool {
        !self.is_empty()
    }
}

impl CacheKey for Rc<str> {
    fn has_identity(&self) -> bool {
        !self.is_empty()
    }
}

impl CacheKey for Vec<u8> {
    fn has_identity(&self) -> bool {
        !self.is_empty()
    }
}

macro_rules! impl_cache_key {
    ($($ty:ty),* $(,)?) => {
        $(impl CacheKey for $ty {})*
    };
}

impl_cache_key!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, char, bool);
