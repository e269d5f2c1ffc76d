//! # recency
//!
//! Arena-backed doubly linked list that keeps entries in recency order.
//!
//! ## Architecture
//! - **Arena**: entries live in a `Vec` of slots, linked by slot index
//! - **Handles**: `Handle` = slot index + generation, so stale handles are
//!   detected instead of aliasing a reused slot
//! - **Ends**: `head` is the least-recently-used end, `tail` the most-recently-used
//!
//! All structural operations against a known handle are O(1). The positional
//! variants (`entry_at`, `insert_at`, `remove_at`) walk the list and are O(n).

#![warn(missing_docs)]

mod entry;
mod error;
mod list;

pub use entry::{Entry, Handle};
pub use error::InvariantError;
pub use list::{Iter, RecencyList};
