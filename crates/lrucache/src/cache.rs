//! LRU cache: key index over a recency list
//!
//! The index maps each key to the [`Handle`] of its list entry, so lookups
//! never walk the list. The list's head is the eviction candidate and its
//! tail is the most recently used entry.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use ahash::RandomState;
use recency::{Handle, InvariantError, Iter, RecencyList};
use tracing::{debug, trace};

use crate::config::LruConfig;
use crate::error::Result;
use crate::key::CacheKey;

/// Upper bound on slots reserved up front; larger caches grow on demand
const MAX_PREALLOC: usize = 64 * 1024;

/// LRU cache with fixed capacity
pub struct LruCache<K, V> {
    map: HashMap<K, Handle, RandomState>,
    list: RecencyList<K, V>,
    capacity: usize,
}

impl<K, V> LruCache<K, V>
where
    K: CacheKey,
{
    /// Create a new LRU cache with the given capacity
    ///
    /// # Returns
    /// * `Err(Error::ZeroCapacity)` if `capacity` is 0
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_config(LruConfig::new(capacity))
    }

    /// Create a new LRU cache from a config
    pub fn with_config(config: LruConfig) -> Result<Self> {
        config.validate()?;

        let reserve = config.capacity.min(MAX_PREALLOC);
        debug!(capacity = config.capacity, "creating LRU cache");

        Ok(Self {
            map: HashMap::with_capacity_and_hasher(reserve, RandomState::new()),
            list: RecencyList::with_capacity(reserve),
            capacity: config.capacity,
        })
    }

    /// Get a value from the cache, marking it most recently used
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let handle = self.promote(key)?;
        self.list.get(handle)
    }

    /// Mutable access to a value, marking it most recently used
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let handle = self.promote(key)?;
        self.list.get_mut(handle)
    }

    /// Get a value without touching its recency
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let handle = *self.map.get(key)?;
        self.list.get(handle)
    }

    /// Check if a key is cached, without touching its recency
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.contains_key(key)
    }

    /// Insert a key-value pair into the cache
    ///
    /// An existing entry for `key` is dropped and recreated at the most
    /// recently used end. A new key on a full cache evicts the least recently
    /// used entry first. Keys without identity are ignored.
    pub fn put(&mut self, key: K, value: V) {
        if !key.has_identity() {
            debug!("ignoring put for key without identity");
            return;
        }

        if self.map.contains_key(&key) {
            trace!("replacing existing entry");
            self.remove(&key);
        } else if self.list.len() >= self.capacity {
            self.remove_least_recent();
        }

        let handle = self.list.append(key.clone(), value);
        self.map.insert(key, handle);
    }

    /// Remove a key from the cache
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let handle = self.map.remove(key)?;
        self.list.remove(handle).map(|entry| entry.into_value())
    }

    /// Get the current number of entries
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Clear the cache
    pub fn clear(&mut self) {
        self.map.clear();
        self.list.clear();
    }

    /// Entry that the next eviction would remove
    pub fn least_recent(&self) -> Option<(&K, &V)> {
        self.list.front().and_then(|handle| self.list.entry(handle))
    }

    /// Most recently used entry
    pub fn most_recent(&self) -> Option<(&K, &V)> {
        self.list.back().and_then(|handle| self.list.entry(handle))
    }

    /// Iterate entries from least to most recently used
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.list.iter()
    }

    /// Snapshot of keys from least to most recently used
    pub fn keys(&self) -> Vec<&K> {
        self.list.keys()
    }

    /// Verify that the index and the recency list agree
    pub fn check_invariants(&self) -> Result<()> {
        self.list.check_invariants()?;

        if self.list.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "list holds {} entries, capacity is {}",
                self.list.len(),
                self.capacity
            ))
            .into());
        }
        if self.map.len() != self.list.len() {
            return Err(InvariantError::new(format!(
                "index has {} keys, list has {} entries",
                self.map.len(),
                self.list.len()
            ))
            .into());
        }
        // Equal sizes plus a matching key per handle make the two sets equal
        for (key, handle) in &self.map {
            match self.list.key(*handle) {
                Some(listed) if listed == key => {}
                Some(_) => {
                    return Err(InvariantError::new(format!(
                        "index handle {} points at a different key",
                        handle.index()
                    ))
                    .into())
                }
                None => {
                    return Err(InvariantError::new(format!(
                        "index handle {} is stale",
                        handle.index()
                    ))
                    .into())
                }
            }
        }

        Ok(())
    }

    fn promote<Q>(&mut self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let handle = *self.map.get(key)?;
        self.list.move_to_back(handle);
        Some(handle)
    }

    fn remove_least_recent(&mut self) -> Option<(K, V)> {
        let entry = self.list.remove_first()?;
        self.map.remove(entry.key());
        trace!(len = self.list.len(), "evicted least recently used entry");
        Some(entry.into_parts())
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("capacity", &self.capacity)
            .field("entries", &self.list)
            .finish()
    }
}

impl<'a, K, V> IntoIterator for &'a LruCache<K, V>
where
    K: CacheKey,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn order(cache: &LruCache<i32, &'static str>) -> Vec<i32> {
        cache.keys().into_iter().copied().collect()
    }

    #[test]
    fn test_lru_basic() {
        let mut cache = LruCache::new(2).unwrap();

        cache.put(1, "a");
        cache.put(2, "b");

        assert_eq!(cache.get(&1), Some(&"a"));
        assert_eq!(cache.get(&2), Some(&"b"));
        assert_eq!(cache.len(), 2);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_lru_zero_capacity() {
        let result: Result<LruCache<i32, i32>> = LruCache::new(0);
        assert_eq!(result.err(), Some(Error::ZeroCapacity));
    }

    #[test]
    fn test_lru_eviction() {
        let mut cache = LruCache::new(2).unwrap();

        cache.put(1, "a");
        cache.put(2, "b");
        cache.put(3, "c"); // Should evict 1

        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&2), Some(&"b"));
        assert_eq!(cache.get(&3), Some(&"c"));
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_lru_get_promotes() {
        let mut cache = LruCache::new(2).unwrap();

        cache.put(1, "a");
        cache.put(2, "b");
        cache.get(&1); // 1 becomes most recent
        cache.put(3, "c"); // Should evict 2

        assert_eq!(cache.get(&1), Some(&"a"));
        assert_eq!(cache.get(&2), None);
        assert_eq!(cache.get(&3), Some(&"c"));
    }

    #[test]
    fn test_lru_miss_has_no_side_effects() {
        let mut cache = LruCache::new(3).unwrap();

        cache.put(1, "a");
        cache.put(2, "b");
        assert_eq!(cache.get(&9), None);

        assert_eq!(order(&cache), vec![1, 2]);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_lru_repeated_get() {
        let mut cache = LruCache::new(3).unwrap();

        cache.put(1, "a");
        cache.put(2, "b");
        cache.put(3, "c");

        assert_eq!(cache.get(&2), Some(&"b"));
        assert_eq!(order(&cache), vec![1, 3, 2]);
        assert_eq!(cache.get(&2), Some(&"b"));
        assert_eq!(order(&cache), vec![1, 3, 2]);
    }

    #[test]
    fn test_lru_overwrite() {
        let mut cache = LruCache::new(2).unwrap();

        cache.put(1, "a");
        cache.put(2, "b");
        cache.put(1, "c"); // Overwrite moves 1 to the back

        assert_eq!(cache.len(), 2);
        assert_eq!(order(&cache), vec![2, 1]);
        assert_eq!(cache.get(&1), Some(&"c"));
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_lru_overwrite_when_full_does_not_evict() {
        let mut cache = LruCache::new(2).unwrap();

        cache.put(1, "a");
        cache.put(2, "b");
        cache.put(2, "z");

        assert_eq!(cache.peek(&1), Some(&"a"));
        assert_eq!(cache.peek(&2), Some(&"z"));
    }

    #[test]
    fn test_lru_empty_key_ignored() {
        let mut cache: LruCache<String, i32> = LruCache::new(2).unwrap();

        cache.put(String::new(), 1);
        assert!(cache.is_empty());
        assert_eq!(cache.get(""), None);

        cache.put("a".to_string(), 1);
        cache.put("b".to_string(), 2);
        cache.put(String::new(), 3); // Must not evict anything
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a"), Some(&1));
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_lru_remove() {
        let mut cache = LruCache::new(3).unwrap();

        cache.put(1, "a");
        cache.put(2, "b");
        cache.put(3, "c");

        assert_eq!(cache.remove(&2), Some("b"));
        assert_eq!(cache.remove(&2), None);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&2), None);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_lru_peek_does_not_promote() {
        let mut cache = LruCache::new(2).unwrap();

        cache.put(1, "a");
        cache.put(2, "b");
        assert_eq!(cache.peek(&1), Some(&"a"));
        assert!(cache.contains(&1));
        cache.put(3, "c"); // 1 is still least recent

        assert!(!cache.contains(&1));
        assert_eq!(order(&cache), vec![2, 3]);
    }

    #[test]
    fn test_lru_get_mut() {
        let mut cache = LruCache::new(2).unwrap();

        cache.put(1, "a");
        cache.put(2, "b");
        if let Some(value) = cache.get_mut(&1) {
            *value = "updated";
        }

        assert_eq!(cache.most_recent(), Some((&1, &"updated")));
        assert_eq!(cache.least_recent(), Some((&2, &"b")));
    }

    #[test]
    fn test_lru_clear() {
        let mut cache = LruCache::new(3).unwrap();

        cache.put(1, "a");
        cache.put(2, "b");
        cache.clear();

        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.capacity(), 3);

        cache.put(3, "c");
        assert_eq!(order(&cache), vec![3]);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_lru_capacity_one() {
        let mut cache = LruCache::new(1).unwrap();

        cache.put(1, "a");
        cache.put(2, "b");

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&2), Some(&"b"));
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_lru_iter_order() {
        let mut cache = LruCache::new(3).unwrap();

        cache.put(1, "a");
        cache.put(2, "b");
        cache.put(3, "c");
        cache.get(&1);

        let pairs: Vec<_> = (&cache).into_iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(pairs, vec![(2, "b"), (3, "c"), (1, "a")]);
    }

    #[test]
    fn test_lru_debug() {
        let mut cache = LruCache::new(2).unwrap();
        cache.put(1, "a");

        assert_eq!(
            format!("{:?}", cache),
            r#"LruCache { capacity: 2, entries: [(1, "a")] }"#
        );
    }
}
