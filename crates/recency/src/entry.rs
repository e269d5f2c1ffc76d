//! Entry and handle types for the recency list

/// Opaque, non-owning reference to an entry in a [`RecencyList`](crate::RecencyList).
///
/// A handle stays valid until its entry is removed. After that it is stale:
/// the slot's generation has moved on, and every list operation given the
/// handle returns `None` / `false` even if the slot has been reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    pub(crate) index: usize,
    pub(crate) generation: u32,
}

impl Handle {
    /// Slot index inside the list's arena
    pub fn index(self) -> usize {
        self.index
    }
}

/// A key/value pair detached from the list
///
/// Returned by every removal operation; the list no longer tracks it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<K, V> {
    key: K,
    value: V,
}

impl<K, V> Entry<K, V> {
    /// Key the entry was stored under
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Stored value
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Consume the entry, keeping only the value
    pub fn into_value(self) -> V {
        self.value
    }

    /// Consume the entry into `(key, value)`
    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }
}

/// Node stored in an arena slot
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) prev: Option<usize>,
    pub(crate) next: Option<usize>,
}

impl<K, V> From<Node<K, V>> for Entry<K, V> {
    fn from(node: Node<K, V>) -> Self {
        Entry {
            key: node.key,
            value: node.value,
        }
    }
}

/// Arena slot: a node plus the generation used to validate handles
pub(crate) struct Slot<K, V> {
    pub(crate) generation: u32,
    pub(crate) node: Option<Node<K, V>>,
}
