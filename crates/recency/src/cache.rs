//! LRU cache: hash index over a recency list
//!
//! The index maps each resident key to a [`Handle`] into the list; the list
//! owns the entries. Every public operation leaves the index key set equal to
//! the list key set.

use std::collections::HashMap;
use std::fmt;
use std::hash::{BuildHasher, Hash};

use ahash::RandomState;
use tracing::{debug, trace};

use crate::config::{CacheConfig, Validator};
use crate::error::{Error, Field, Result};
use crate::list::{Handle, Iter, RecencyList};
use crate::stats::{CacheStats, MissRateHistory};

/// Most slots reserved up front; larger caches grow on demand
const PREALLOC_LIMIT: usize = 1024;

/// LRU cache with fixed capacity
pub struct LruCache<K, V, S = RandomState> {
    map: HashMap<K, Handle, S>,
    list: RecencyList<K, V>,
    capacity: usize,
    key_validator: Option<Validator<K>>,
    value_validator: Option<Validator<V>>,
    stats: CacheStats,
    history: Option<MissRateHistory>,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a new LRU cache with the given capacity
    ///
    /// # Returns
    /// * `Err(Error::InvalidCapacity)` if `capacity` is 0
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_config(CacheConfig::new(capacity))
    }

    /// Create a new LRU cache from a full configuration
    pub fn with_config(config: CacheConfig<K, V>) -> Result<Self> {
        Self::with_config_and_hasher(config, RandomState::new())
    }
}

impl<K, V, S> LruCache<K, V, S>
where
    K: Hash + Eq + Clone,
    S: BuildHasher,
{
    /// Create a new LRU cache using a custom index hasher
    pub fn with_config_and_hasher(config: CacheConfig<K, V>, hasher: S) -> Result<Self> {
        let CacheConfig {
            capacity,
            key_validator,
            value_validator,
            record_history,
        } = config;

        if capacity == 0 {
            return Err(Error::InvalidCapacity(capacity));
        }
        debug!(capacity, record_history, "creating LRU cache");

        let reserve = capacity.min(PREALLOC_LIMIT);
        Ok(Self {
            map: HashMap::with_capacity_and_hasher(reserve, hasher),
            list: RecencyList::with_capacity(reserve),
            capacity,
            key_validator,
            value_validator,
            stats: CacheStats::new(),
            history: record_history.then(MissRateHistory::new),
        })
    }

    /// Insert or update a key-value pair
    ///
    /// An existing key gets its value replaced and becomes most recently used
    /// (a hit). A new key is a miss; if the cache is full the least recently
    /// used entry is evicted first.
    ///
    /// # Returns
    /// * `Err(Error::InvalidInput)` if a validator rejects the key or value;
    ///   the cache is left untouched
    pub fn put(&mut self, key: K, value: V) -> Result<()> {
        self.validate_key(&key)?;
        if let Some(validator) = &self.value_validator {
            validator.validate(Field::Value, &value)?;
        }

        if let Some(&handle) = self.map.get(&key) {
            *self.list.get_mut(handle) = value;
            self.list.move_to_front(handle);
            self.stats.record_hit();
            self.stats.record_update();
            trace!("put hit, value updated");
        } else {
            self.stats.record_miss();
            if self.list.len() == self.capacity {
                self.evict_lru();
            }

            let handle = self.list.insert_front(key.clone(), value);
            self.map.insert(key, handle);
            self.stats.record_insert();
            trace!(len = self.list.len(), "put miss, entry inserted");
        }

        self.record_sample();
        Ok(())
    }

    /// Look up a key, marking it most recently used
    ///
    /// # Returns
    /// * `Ok(Some(value))` on a hit
    /// * `Ok(None)` on a miss
    /// * `Err(Error::InvalidInput)` if the key validator rejects `key`
    pub fn get(&mut self, key: &K) -> Result<Option<&V>> {
        self.validate_key(key)?;

        let Some(&handle) = self.map.get(key) else {
            self.stats.record_miss();
            self.record_sample();
            trace!("get miss");
            return Ok(None);
        };

        self.list.move_to_front(handle);
        self.stats.record_hit();
        self.record_sample();
        trace!("get hit");

        Ok(Some(self.list.get(handle).1))
    }

    /// Look up a key without touching recency or statistics
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.map.get(key).map(|&handle| self.list.get(handle).1)
    }

    /// Check if a key is resident (no recency or statistics effect)
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Remove a key from the cache
    ///
    /// Explicit removal is not an access and is not counted as an eviction.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let handle = self.map.remove(key)?;
        let (_, value) = self.list.remove(handle);
        Some(value)
    }

    /// Most recently used entry
    pub fn peek_mru(&self) -> Option<(&K, &V)> {
        self.list.peek_front().map(|handle| self.list.get(handle))
    }

    /// Least recently used entry, the next eviction candidate
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        self.list.peek_back().map(|handle| self.list.get(handle))
    }

    /// Drop every entry; statistics and history are kept
    pub fn clear(&mut self) {
        self.map.clear();
        self.list.clear();
    }

    fn validate_key(&self, key: &K) -> Result<()> {
        match &self.key_validator {
            Some(validator) => validator.validate(Field::Key, key),
            None => Ok(()),
        }
    }

    fn evict_lru(&mut self) {
        let Some(handle) = self.list.peek_back() else {
            return;
        };

        let (key, _) = self.list.remove(handle);
        if self.map.remove(&key).is_none() {
            panic!("invariant violated: evicted entry has no index entry");
        }
        self.stats.record_eviction();
        debug!(
            capacity = self.capacity,
            evictions = self.stats.evictions(),
            "evicted least recently used entry"
        );
    }

    /// Check index and list agree; panics on any mismatch
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        self.list.assert_linked();
        assert_eq!(self.map.len(), self.list.len(), "index/list size mismatch");
        assert!(self.list.len() <= self.capacity, "capacity exceeded");

        for (key, _) in self.list.iter() {
            let handle = self.map.get(key).expect("list key missing from index");
            assert!(self.list.get(*handle).0 == key, "index points at wrong entry");
        }
    }
}

impl<K, V, S> LruCache<K, V, S> {
    /// Get the current number of entries
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Get cache capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Percentage of accesses that missed; 0.0 before any access
    pub fn miss_rate(&self) -> f64 {
        self.stats.miss_rate()
    }

    /// Miss rate after each completed access, oldest first
    ///
    /// Empty when history recording is disabled.
    pub fn history(&self) -> &[f64] {
        self.history
            .as_ref()
            .map(MissRateHistory::samples)
            .unwrap_or(&[])
    }

    /// Entries from most to least recently used
    ///
    /// Each call walks the current state; nothing is touched.
    pub fn snapshot(&self) -> Iter<'_, K, V> {
        self.list.iter()
    }

    fn record_sample(&mut self) {
        if let Some(history) = &mut self.history {
            history.record(self.stats.miss_rate());
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for LruCache<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("capacity", &self.capacity)
            .field("len", &self.list.len())
            .field("entries", &self.list)
            .field("stats", &self.stats)
            .finish()
    }
}


#[cfg(test)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Op {
        Put(u8, u16),
        Get(u8),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u8..16, any::<u16>()).prop_map(|(k, v)| Op::Put(k, v)),
            (0u8..16).prop_map(Op::Get),
        ]
    }

    /// Reference model: a plain vector kept in MRU-first order
    #[derive(Default)]
    struct Model {
        entries: Vec<(u8, u16)>,
        misses: u64,
        accesses: u64,
    }

    impl Model {
        fn touch(&mut self, key: u8) -> Option<u16> {
            let pos = self.entries.iter().position(|(k, _)| *k == key)?;
            let entry = self.entries.remove(pos);
            self.entries.insert(0, entry);
            Some(entry.1)
        }

        fn get(&mut self, key: u8) -> Option<u16> {
            self.accesses += 1;
            let found = self.touch(key);
            if found.is_none() {
                self.misses += 1;
            }
            found
        }

        fn put(&mut self, key: u8, value: u16, capacity: usize) -> Option<u8> {
            self.accesses += 1;
            if self.touch(key).is_some() {
                self.entries[0].1 = value;
                return None;
            }

            self.misses += 1;
            let evicted = if self.entries.len() == capacity {
                self.entries.pop().map(|(k, _)| k)
            } else {
                None
            };
            self.entries.insert(0, (key, value));
            evicted
        }
    }

    proptest! {
        #[test]
        fn matches_reference_model(
            capacity in 1usize..8,
            ops in proptest::collection::vec(op_strategy(), 0..200),
        ) {
            let mut cache = LruCache::new(capacity).unwrap();
            let mut model = Model::default();

            for op in ops {
                match op {
                    Op::Put(k, v) => {
                        let evicted = model.put(k, v, capacity);
                        cache.put(k, v).unwrap();
                        if let Some(gone) = evicted {
                            prop_assert!(!cache.contains(&gone));
                        }
                    }
                    Op::Get(k) => {
                        let expected = model.get(k);
                        prop_assert_eq!(cache.get(&k).unwrap().copied(), expected);
                    }
                }

                let actual: Vec<(u8, u16)> = cache.snapshot().map(|(k, v)| (*k, *v)).collect();
                prop_assert_eq!(&actual, &model.entries);
                prop_assert!(cache.len() <= capacity);
                prop_assert_eq!(cache.stats().misses(), model.misses);
                prop_assert_eq!(cache.stats().accesses(), model.accesses);
                prop_assert_eq!(
                    cache.miss_rate(),
                    100.0 * model.misses as f64 / model.accesses as f64
                );
                cache.assert_consistent();
            }
        }

        #[test]
        fn touched_key_becomes_mru(
            keys in proptest::collection::vec(0u8..32, 1..100),
            capacity in 1usize..10,
        ) {
            let mut cache = LruCache::new(capacity).unwrap();

            for key in keys {
                let previous_mru = cache.peek_mru().map(|(k, _)| *k);
                cache.put(key, ()).unwrap();

                prop_assert_eq!(cache.peek_mru().map(|(k, _)| *k), Some(key));
                if let Some(prev) = previous_mru.filter(|p| *p != key) {
                    if capacity > 1 {
                        let second = cache.snapshot().nth(1).map(|(k, _)| *k);
                        prop_assert_eq!(second, Some(prev));
                    }
                }
            }
        }
    }
}
