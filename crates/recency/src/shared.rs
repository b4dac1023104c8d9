//! Thread-shared cache handle
//!
//! `get` and `put` read and write both the index and the recency list, so
//! the whole cache sits behind a single mutex. There is no finer-grained
//! locking.

use std::hash::{BuildHasher, Hash};
use std::sync::Arc;

use ahash::RandomState;
use parking_lot::Mutex;

use crate::cache::LruCache;
use crate::config::CacheConfig;
use crate::error::Result;
use crate::stats::CacheStats;

/// Cloneable, thread-safe handle to one [`LruCache`]
pub struct SharedLruCache<K, V, S = RandomState> {
    inner: Arc<Mutex<LruCache<K, V, S>>>,
}

impl<K, V, S> Clone for SharedLruCache<K, V, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> SharedLruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a shared cache with the given capacity
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(Self::from_cache(LruCache::new(capacity)?))
    }

    /// Create a shared cache from a full configuration
    pub fn with_config(config: CacheConfig<K, V>) -> Result<Self> {
        Ok(Self::from_cache(LruCache::with_config(config)?))
    }
}

impl<K, V, S> SharedLruCache<K, V, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: BuildHasher,
{
    /// Insert or update a key-value pair
    pub fn put(&self, key: K, value: V) -> Result<()> {
        self.inner.lock().put(key, value)
    }

    /// Look up a key, returning a copy of the value
    pub fn get(&self, key: &K) -> Result<Option<V>> {
        let mut cache = self.inner.lock();
        Ok(cache.get(key)?.cloned())
    }

    /// Remove a key
    pub fn remove(&self, key: &K) -> Option<V> {
        self.inner.lock().remove(key)
    }

    /// Entries from most to least recently used, copied under the lock
    pub fn snapshot(&self) -> Vec<(K, V)> {
        self.inner
            .lock()
            .snapshot()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Run `f` with exclusive access to the cache
    pub fn with_lock<R>(&self, f: impl FnOnce(&mut LruCache<K, V, S>) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

impl<K, V, S> SharedLruCache<K, V, S> {
    /// Wrap an existing cache
    pub fn from_cache(cache: LruCache<K, V, S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }

    /// Percentage of accesses that missed
    pub fn miss_rate(&self) -> f64 {
        self.inner.lock().miss_rate()
    }

    /// Copy of the current statistics
    pub fn stats(&self) -> CacheStats {
        *self.inner.lock().stats()
    }

    /// Get the current number of entries
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Get cache capacity
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_shared_basic() {
        let cache = SharedLruCache::new(2).unwrap();

        cache.put(1, "a".to_string()).unwrap();
        cache.put(2, "b".to_string()).unwrap();
        cache.put(3, "c".to_string()).unwrap();

        assert_eq!(cache.get(&1).unwrap(), None);
        assert_eq!(cache.get(&3).unwrap(), Some("c".to_string()));
        assert_eq!(
            cache.snapshot(),
            vec![(3, "c".to_string()), (2, "b".to_string())]
        );
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_shared_across_threads() {
        let cache = SharedLruCache::new(16).unwrap();

        let workers: Vec<_> = (0..4u64)
            .map(|t| {
                let cache = cache.clone();
                thread::spawn(move || {
                    for i in 0..100u64 {
                        let key = (t * 100 + i) % 32;
                        cache.put(key, key * 2).unwrap();
                        if let Some(value) = cache.get(&key).unwrap() {
                            assert_eq!(value, key * 2);
                        }
                    }
                })
            })
            .collect();

        for worker in workers {
            worker.join().unwrap();
        }

        let stats = cache.stats();
        assert_eq!(stats.accesses(), 800);
        assert!(cache.len() <= cache.capacity());
        cache.with_lock(|inner| inner.assert_consistent());
    }
}
