//! Recency list: doubly linked list stored in a slot arena
//!
//! ```text
//!   head (least recent)                          tail (most recent)
//!      │                                                │
//!      ▼                                                ▼
//!   [slot 2] ◄──► [slot 0] ◄──► [slot 3] ◄──► [slot 1]
//! ```
//!
//! Links are slot indices, never owning pointers. Freed slots go on a free
//! list and bump their generation so old handles stop resolving.

use std::fmt;

use crate::entry::{Entry, Handle, Node, Slot};
use crate::error::InvariantError;

/// Doubly linked list ordered from least-recently-used (front) to
/// most-recently-used (back)
pub struct RecencyList<K, V> {
    slots: Vec<Slot<K, V>>,
    free_list: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    count: usize,
}

impl<K, V> Default for RecencyList<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> RecencyList<K, V> {
    /// Create an empty list
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            head: None,
            tail: None,
            count: 0,
        }
    }

    /// Create an empty list with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            ..Self::new()
        }
    }

    /// Create a list holding a single entry
    pub fn with_entry(key: K, value: V) -> Self {
        let mut list = Self::new();
        list.insert_front(key, value);
        list
    }

    /// Number of entries in the list
    pub fn len(&self) -> usize {
        self.count
    }

    /// Check if the list is empty
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Handle of the least-recently-used entry
    pub fn front(&self) -> Option<Handle> {
        self.head.map(|idx| self.handle(idx))
    }

    /// Handle of the most-recently-used entry
    pub fn back(&self) -> Option<Handle> {
        self.tail.map(|idx| self.handle(idx))
    }

    /// Check whether `handle` still refers to an entry of this list
    pub fn contains(&self, handle: Handle) -> bool {
        self.resolve(handle).is_some()
    }

    /// Value behind a handle
    pub fn get(&self, handle: Handle) -> Option<&V> {
        self.node(handle).map(|node| &node.value)
    }

    /// Mutable value behind a handle
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut V> {
        let idx = self.resolve(handle)?;
        self.slots[idx].node.as_mut().map(|node| &mut node.value)
    }

    /// Key behind a handle
    pub fn key(&self, handle: Handle) -> Option<&K> {
        self.node(handle).map(|node| &node.key)
    }

    /// Key and value behind a handle
    pub fn entry(&self, handle: Handle) -> Option<(&K, &V)> {
        self.node(handle).map(|node| (&node.key, &node.value))
    }

    /// Insert a new entry before the current head
    pub fn insert_front(&mut self, key: K, value: V) -> Handle {
        let old_head = self.head;
        let idx = self.alloc(Node {
            key,
            value,
            prev: None,
            next: old_head,
        });

        match old_head {
            Some(head_idx) => self.set_prev(head_idx, Some(idx)),
            None => self.tail = Some(idx),
        }

        self.head = Some(idx);
        self.count += 1;
        self.handle(idx)
    }

    /// Insert a new entry after the current tail
    pub fn append(&mut self, key: K, value: V) -> Handle {
        let old_tail = match self.tail {
            Some(tail_idx) => tail_idx,
            None => return self.insert_front(key, value),
        };

        let idx = self.alloc(Node {
            key,
            value,
            prev: Some(old_tail),
            next: None,
        });
        self.set_next(old_tail, Some(idx));

        self.tail = Some(idx);
        self.count += 1;
        self.handle(idx)
    }

    /// Insert a new entry directly after `anchor`
    ///
    /// Returns `None` (and drops nothing into the list) if `anchor` is stale.
    pub fn insert_after(&mut self, anchor: Handle, key: K, value: V) -> Option<Handle> {
        let anchor_idx = self.resolve(anchor)?;
        if self.tail == Some(anchor_idx) {
            return Some(self.append(key, value));
        }

        let (_, next) = self.links(anchor_idx)?;
        let idx = self.alloc(Node {
            key,
            value,
            prev: Some(anchor_idx),
            next,
        });
        self.set_next(anchor_idx, Some(idx));
        if let Some(next_idx) = next {
            self.set_prev(next_idx, Some(idx));
        }

        self.count += 1;
        Some(self.handle(idx))
    }

    /// Insert a new entry directly before `anchor`
    ///
    /// Returns `None` if `anchor` is stale.
    pub fn insert_before(&mut self, anchor: Handle, key: K, value: V) -> Option<Handle> {
        let anchor_idx = self.resolve(anchor)?;
        if self.head == Some(anchor_idx) {
            return Some(self.insert_front(key, value));
        }

        let (prev, _) = self.links(anchor_idx)?;
        let idx = self.alloc(Node {
            key,
            value,
            prev,
            next: Some(anchor_idx),
        });
        self.set_prev(anchor_idx, Some(idx));
        if let Some(prev_idx) = prev {
            self.set_next(prev_idx, Some(idx));
        }

        self.count += 1;
        Some(self.handle(idx))
    }

    /// Detach and return the head (least-recently-used) entry
    pub fn remove_first(&mut self) -> Option<Entry<K, V>> {
        let idx = self.head?;
        let node = self.release(idx)?;

        self.head = node.next;
        match node.next {
            Some(next_idx) => self.set_prev(next_idx, None),
            None => self.tail = None,
        }

        self.count -= 1;
        Some(node.into())
    }

    /// Detach and return the tail (most-recently-used) entry
    pub fn remove_last(&mut self) -> Option<Entry<K, V>> {
        if self.count <= 1 {
            return self.remove_first();
        }

        let idx = self.tail?;
        let node = self.release(idx)?;

        self.tail = node.prev;
        if let Some(prev_idx) = node.prev {
            self.set_next(prev_idx, None);
        }

        self.count -= 1;
        Some(node.into())
    }

    /// Detach and return the entry behind `handle`
    ///
    /// Stale handles are a no-op returning `None`.
    pub fn remove(&mut self, handle: Handle) -> Option<Entry<K, V>> {
        let idx = self.resolve(handle)?;
        self.remove_index(idx)
    }

    /// Detach and return the entry right after `handle`
    pub fn remove_after(&mut self, handle: Handle) -> Option<Entry<K, V>> {
        let idx = self.resolve(handle)?;
        let (_, next) = self.links(idx)?;
        self.remove_index(next?)
    }

    /// Detach and return the entry right before `handle`
    pub fn remove_before(&mut self, handle: Handle) -> Option<Entry<K, V>> {
        let idx = self.resolve(handle)?;
        let (prev, _) = self.links(idx)?;
        self.remove_index(prev?)
    }

    /// Relink an existing entry at the tail; returns `false` if `handle` is stale
    ///
    /// The handle stays valid.
    pub fn move_to_back(&mut self, handle: Handle) -> bool {
        let idx = match self.resolve(handle) {
            Some(idx) => idx,
            None => return false,
        };
        if self.tail == Some(idx) {
            return true;
        }

        self.detach(idx);
        self.attach_back(idx);
        true
    }

    /// Relink an existing entry at the head; returns `false` if `handle` is stale
    pub fn move_to_front(&mut self, handle: Handle) -> bool {
        let idx = match self.resolve(handle) {
            Some(idx) => idx,
            None => return false,
        };
        if self.head == Some(idx) {
            return true;
        }

        self.detach(idx);
        self.attach_front(idx);
        true
    }

    /// Handle of the entry at `index` (0 = head). O(n).
    pub fn entry_at(&self, index: usize) -> Option<Handle> {
        if index >= self.count {
            return None;
        }

        // Walk from whichever end is closer
        let idx = if index <= self.count / 2 {
            let mut current = self.head?;
            for _ in 0..index {
                current = self.links(current)?.1?;
            }
            current
        } else {
            let mut current = self.tail?;
            for _ in 0..(self.count - 1 - index) {
                current = self.links(current)?.0?;
            }
            current
        };

        Some(self.handle(idx))
    }

    /// Insert a new entry so that it ends up at `index`. O(n).
    ///
    /// `index == len()` appends; anything past that returns `None`.
    pub fn insert_at(&mut self, index: usize, key: K, value: V) -> Option<Handle> {
        if index > self.count {
            return None;
        }
        if index == 0 {
            return Some(self.insert_front(key, value));
        }

        let anchor = self.entry_at(index - 1)?;
        self.insert_after(anchor, key, value)
    }

    /// Detach and return the entry at `index`. O(n).
    pub fn remove_at(&mut self, index: usize) -> Option<Entry<K, V>> {
        let handle = self.entry_at(index)?;
        self.remove(handle)
    }

    /// Iterate `(key, value)` pairs from head to tail
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            front: self.head,
            back: self.tail,
            remaining: self.count,
        }
    }

    /// Snapshot of all values from head to tail
    pub fn values(&self) -> Vec<&V> {
        self.iter().map(|(_, value)| value).collect()
    }

    /// Snapshot of all keys from head to tail
    pub fn keys(&self) -> Vec<&K> {
        self.iter().map(|(key, _)| key).collect()
    }

    /// Remove every entry; all outstanding handles become stale
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            if slot.node.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
        }

        self.free_list.clear();
        self.free_list.extend((0..self.slots.len()).rev());
        self.head = None;
        self.tail = None;
        self.count = 0;
    }

    /// Walk the list in both directions and verify the link structure
    ///
    /// Checks that head/tail/count agree, that every `next` has a matching
    /// `prev`, and that the arena holds exactly `count` live nodes.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.head.is_none() != self.tail.is_none() {
            return Err(InvariantError::new(format!(
                "head {:?} and tail {:?} must be both set or both empty",
                self.head, self.tail
            )));
        }
        if self.head.is_none() && self.count != 0 {
            return Err(InvariantError::new(format!(
                "empty list reports count {}",
                self.count
            )));
        }

        let mut steps = 0usize;
        let mut prev = None;
        let mut current = self.head;
        while let Some(idx) = current {
            let (node_prev, node_next) = self.links(idx).ok_or_else(|| {
                InvariantError::new(format!("slot {} is linked but empty", idx))
            })?;
            if node_prev != prev {
                return Err(InvariantError::new(format!(
                    "slot {} has prev {:?}, expected {:?}",
                    idx, node_prev, prev
                )));
            }

            steps += 1;
            if steps > self.count {
                return Err(InvariantError::new(format!(
                    "forward walk exceeds count {}",
                    self.count
                )));
            }
            prev = Some(idx);
            current = node_next;
        }

        if prev != self.tail {
            return Err(InvariantError::new(format!(
                "forward walk ends at {:?}, tail is {:?}",
                prev, self.tail
            )));
        }
        if steps != self.count {
            return Err(InvariantError::new(format!(
                "forward walk visited {} entries, count is {}",
                steps, self.count
            )));
        }

        let mut back_steps = 0usize;
        let mut current = self.tail;
        while let Some(idx) = current {
            back_steps += 1;
            if back_steps > self.count {
                return Err(InvariantError::new(format!(
                    "backward walk exceeds count {}",
                    self.count
                )));
            }
            current = self.links(idx).and_then(|(node_prev, _)| node_prev);
        }
        if back_steps != self.count {
            return Err(InvariantError::new(format!(
                "backward walk visited {} entries, count is {}",
                back_steps, self.count
            )));
        }

        let occupied = self.slots.iter().filter(|slot| slot.node.is_some()).count();
        if occupied != self.count {
            return Err(InvariantError::new(format!(
                "arena holds {} nodes, count is {}",
                occupied, self.count
            )));
        }
        if occupied + self.free_list.len() != self.slots.len() {
            return Err(InvariantError::new(format!(
                "{} live + {} free slots, arena has {}",
                occupied,
                self.free_list.len(),
                self.slots.len()
            )));
        }

        Ok(())
    }

    fn remove_index(&mut self, idx: usize) -> Option<Entry<K, V>> {
        let (prev, next) = self.links(idx)?;

        match (prev, next) {
            (None, _) => self.remove_first(),
            (_, None) => self.remove_last(),
            (Some(prev_idx), Some(next_idx)) => {
                let node = self.release(idx)?;
                self.set_next(prev_idx, Some(next_idx));
                self.set_prev(next_idx, Some(prev_idx));
                self.count -= 1;
                Some(node.into())
            }
        }
    }

    /// Unlink a node from its neighbours without freeing its slot
    fn detach(&mut self, idx: usize) {
        let (prev, next) = match self.links(idx) {
            Some(links) => links,
            None => return,
        };

        match prev {
            Some(prev_idx) => self.set_next(prev_idx, next),
            None => self.head = next,
        }
        match next {
            Some(next_idx) => self.set_prev(next_idx, prev),
            None => self.tail = prev,
        }

        self.set_prev(idx, None);
        self.set_next(idx, None);
    }

    fn attach_back(&mut self, idx: usize) {
        let old_tail = self.tail;
        self.set_prev(idx, old_tail);
        self.set_next(idx, None);

        match old_tail {
            Some(tail_idx) => self.set_next(tail_idx, Some(idx)),
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
    }

    fn attach_front(&mut self, idx: usize) {
        let old_head = self.head;
        self.set_prev(idx, None);
        self.set_next(idx, old_head);

        match old_head {
            Some(head_idx) => self.set_prev(head_idx, Some(idx)),
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
    }

    fn alloc(&mut self, node: Node<K, V>) -> usize {
        if let Some(idx) = self.free_list.pop() {
            self.slots[idx].node = Some(node);
            idx
        } else {
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            self.slots.len() - 1
        }
    }

    fn release(&mut self, idx: usize) -> Option<Node<K, V>> {
        let slot = self.slots.get_mut(idx)?;
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(idx);
        Some(node)
    }

    fn resolve(&self, handle: Handle) -> Option<usize> {
        let slot = self.slots.get(handle.index)?;
        (slot.generation == handle.generation && slot.node.is_some()).then_some(handle.index)
    }

    fn handle(&self, idx: usize) -> Handle {
        Handle {
            index: idx,
            generation: self.slots[idx].generation,
        }
    }

    fn node(&self, handle: Handle) -> Option<&Node<K, V>> {
        let idx = self.resolve(handle)?;
        self.slots[idx].node.as_ref()
    }

    fn links(&self, idx: usize) -> Option<(Option<usize>, Option<usize>)> {
        self.slots
            .get(idx)?
            .node
            .as_ref()
            .map(|node| (node.prev, node.next))
    }

    fn set_prev(&mut self, idx: usize, prev: Option<usize>) {
        if let Some(node) = self.slots.get_mut(idx).and_then(|slot| slot.node.as_mut()) {
            node.prev = prev;
        }
    }

    fn set_next(&mut self, idx: usize, next: Option<usize>) {
        if let Some(node) = self.slots.get_mut(idx).and_then(|slot| slot.node.as_mut()) {
            node.next = next;
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for RecencyList<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, K, V> IntoIterator for &'a RecencyList<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Borrowing iterator over a [`RecencyList`], head to tail
pub struct Iter<'a, K, V> {
    list: &'a RecencyList<K, V>,
    front: Option<usize>,
    back: Option<usize>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let idx = self.front?;
        let node = self.list.slots.get(idx)?.node.as_ref()?;
        self.front = node.next;
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let idx = self.back?;
        let node = self.list.slots.get(idx)?.node.as_ref()?;
        self.back = node.prev;
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
