//! Recency list: MRU-to-LRU ordering with O(1) relocation
//!
//! Entries live in an arena of slots linked by index. Slots 0 and 1 are
//! permanent head and tail sentinels, so every live entry always has a
//! predecessor and a successor and link patching never special-cases the
//! ends of the list. Freed slots are recycled through a free list; each slot
//! carries a generation that is bumped on release, which turns a stale
//! [`Handle`] into a detectable error instead of a silent alias.

use std::fmt;
use std::iter::FusedIterator;

const HEAD: usize = 0;
const TAIL: usize = 1;

/// Stable reference to an entry in a [`RecencyList`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    index: usize,
    generation: u64,
}

struct Slot<K, V> {
    entry: Option<(K, V)>,
    prev: usize,
    next: usize,
    generation: u64,
}

impl<K, V> Slot<K, V> {
    fn sentinel() -> Self {
        Self {
            entry: None,
            prev: HEAD,
            next: TAIL,
            generation: 0,
        }
    }
}

/// Ordered sequence of entries from most to least recently used
pub struct RecencyList<K, V> {
    slots: Vec<Slot<K, V>>,
    free_list: Vec<usize>,
    len: usize,
}

impl<K, V> Default for RecencyList<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> RecencyList<K, V> {
    /// Create an empty list
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty list with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity.saturating_add(2));
        slots.push(Slot::sentinel());
        slots.push(Slot::sentinel());

        Self {
            slots,
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the list holds no entries
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert a new entry at the MRU end
    pub fn insert_front(&mut self, key: K, value: V) -> Handle {
        let idx = self.alloc_slot();
        self.slots[idx].entry = Some((key, value));
        self.link_after(HEAD, idx);
        self.len += 1;

        self.handle_at(idx)
    }

    /// Detach an entry and return its key and value
    ///
    /// # Panics
    /// Panics if `handle` does not reference a live entry of this list.
    pub fn remove(&mut self, handle: Handle) -> (K, V) {
        let idx = self.resolve(handle);
        self.unlink(idx);

        let slot = &mut self.slots[idx];
        let Some(entry) = slot.entry.take() else {
            unreachable!("resolved slot {} has no entry", idx);
        };
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(idx);
        self.len -= 1;

        entry
    }

    /// Relocate an entry to the MRU end; only links change
    ///
    /// # Panics
    /// Panics if `handle` does not reference a live entry of this list.
    pub fn move_to_front(&mut self, handle: Handle) {
        let idx = self.resolve(handle);
        if self.slots[HEAD].next == idx {
            return;
        }

        self.unlink(idx);
        self.link_after(HEAD, idx);
    }

    /// Handle of the MRU entry
    pub fn peek_front(&self) -> Option<Handle> {
        (self.len > 0).then(|| self.handle_at(self.slots[HEAD].next))
    }

    /// Handle of the LRU entry (the eviction candidate)
    pub fn peek_back(&self) -> Option<Handle> {
        (self.len > 0).then(|| self.handle_at(self.slots[TAIL].prev))
    }

    /// Check whether `handle` still references a live entry
    pub fn contains(&self, handle: Handle) -> bool {
        self.slots
            .get(handle.index)
            .is_some_and(|slot| slot.generation == handle.generation && slot.entry.is_some())
    }

    /// Key and value behind a handle
    ///
    /// # Panics
    /// Panics if `handle` does not reference a live entry of this list.
    pub fn get(&self, handle: Handle) -> (&K, &V) {
        let idx = self.resolve(handle);
        match &self.slots[idx].entry {
            Some((key, value)) => (key, value),
            None => unreachable!("resolved slot {} has no entry", idx),
        }
    }

    /// Mutable value behind a handle
    ///
    /// # Panics
    /// Panics if `handle` does not reference a live entry of this list.
    pub fn get_mut(&mut self, handle: Handle) -> &mut V {
        let idx = self.resolve(handle);
        match &mut self.slots[idx].entry {
            Some((_, value)) => value,
            None => unreachable!("resolved slot {} has no entry", idx),
        }
    }

    /// Drop every entry; outstanding handles become stale
    pub fn clear(&mut self) {
        for idx in 2..self.slots.len() {
            let slot = &mut self.slots[idx];
            if slot.entry.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free_list.push(idx);
            }
        }

        self.slots[HEAD].next = TAIL;
        self.slots[TAIL].prev = HEAD;
        self.len = 0;
    }

    /// Iterate entries from MRU to LRU
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            front: self.slots[HEAD].next,
            back: self.slots[TAIL].prev,
            remaining: self.len,
        }
    }

    fn resolve(&self, handle: Handle) -> usize {
        if !self.contains(handle) {
            panic!(
                "invariant violated: {:?} does not reference a live entry",
                handle
            );
        }
        handle.index
    }

    fn handle_at(&self, idx: usize) -> Handle {
        Handle {
            index: idx,
            generation: self.slots[idx].generation,
        }
    }

    fn link_after(&mut self, at: usize, idx: usize) {
        let next = self.slots[at].next;
        self.slots[idx].prev = at;
        self.slots[idx].next = next;
        self.slots[next].prev = idx;
        self.slots[at].next = idx;
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.slots[idx].prev, self.slots[idx].next);
        self.slots[prev].next = next;
        self.slots[next].prev = prev;
    }

    fn alloc_slot(&mut self) -> usize {
        if let Some(idx) = self.free_list.pop() {
            idx
        } else {
            let idx = self.slots.len();
            self.slots.push(Slot {
                entry: None,
                prev: idx,
                next: idx,
                generation: 0,
            });
            idx
        }
    }

    /// Walk the chain both ways and panic on any broken link
    #[cfg(test)]
    pub(crate) fn assert_linked(&self) {
        let mut count = 0;
        let mut prev = HEAD;
        let mut idx = self.slots[HEAD].next;
        while idx != TAIL {
            assert_eq!(self.slots[idx].prev, prev, "back link of slot {}", idx);
            assert!(self.slots[idx].entry.is_some(), "dead slot {} in chain", idx);
            count += 1;
            prev = idx;
            idx = self.slots[idx].next;
        }
        assert_eq!(self.slots[TAIL].prev, prev);
        assert_eq!(count, self.len);
        assert_eq!(self.slots.len() - 2, self.len + self.free_list.len());
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for RecencyList<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// MRU-to-LRU iterator over a [`RecencyList`]
pub struct Iter<'a, K, V> {
    list: &'a RecencyList<K, V>,
    front: usize,
    back: usize,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    fn entry_at(&self, idx: usize) -> (&'a K, &'a V) {
        let list = self.list;
        match &list.slots[idx].entry {
            Some((key, value)) => (key, value),
            None => unreachable!("slot {} in chain has no entry", idx),
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let item = self.entry_at(self.front);
        self.front = self.list.slots[self.front].next;
        self.remaining -= 1;
        Some(item)
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
        let item = self.entry_at(self.back);
        self.back = self.list.slots[self.back].prev;
        self.remaining -= 1;
        Some(item)
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<'a, K, V> IntoIterator for &'a RecencyList<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
