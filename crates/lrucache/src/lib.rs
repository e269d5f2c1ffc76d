//! # lrucache
//!
//! Fixed-capacity key-value cache with least-recently-used eviction.
//!
//! ## Architecture
//! - **Index**: AHash map from key to list handle for O(1) lookups
//! - **Recency list**: arena-backed doubly-linked list from the `recency`
//!   crate; head is least recent, tail most recent
//! - **Policy**: `get` promotes to the tail, `put` on a full cache evicts the head
//!
//! ## Example
//! ```
//! use lrucache::LruCache;
//!
//! let mut cache = LruCache::new(2).unwrap();
//! cache.put("a".to_string(), 1);
//! cache.put("b".to_string(), 2);
//! cache.get("a");
//! cache.put("c".to_string(), 3); // evicts "b"
//!
//! assert_eq!(cache.get("b"), None);
//! assert_eq!(cache.get("a"), Some(&1));
//! ```
//!
//! The cache is single-threaded. Callers that share it across threads wrap
//! it in one lock covering both the index and the list.

#![warn(missing_docs)]

mod cache;
mod config;
mod error;
mod key;

pub use cache::LruCache;
pub use config::{LruConfig, DEFAULT_CAPACITY};
pub use error::{Error, Result};
pub use key::CacheKey;
pub use recency::{InvariantError, Iter};
