//! # recency
//!
//! Fixed-capacity LRU cache with O(1) lookup, insertion, update and eviction.
//!
//! ## Architecture
//! - **HashMap**: AHash index from key to list handle (O(1))
//! - **Recency list**: arena-backed doubly-linked list with head/tail
//!   sentinels, MRU first (O(1) promote and evict)
//! - **Stats**: access/miss counters and a miss-rate history
//! - **Shared**: one mutex around the whole cache for cross-thread use
//!
//! ```
//! use recency::LruCache;
//!
//! let mut cache = LruCache::new(2).unwrap();
//! cache.put(1, "one").unwrap();
//! cache.put(2, "two").unwrap();
//! cache.get(&1).unwrap();
//! cache.put(3, "three").unwrap(); // evicts 2
//!
//! assert!(!cache.contains(&2));
//! assert_eq!(cache.miss_rate(), 75.0);
//! ```

#![warn(missing_docs)]

mod cache;
mod config;
mod error;
mod list;
mod shared;
mod stats;

pub use cache::LruCache;
pub use config::{CacheConfig, Validator};
pub use error::{Error, Field, Result};
pub use list::{Handle, Iter, RecencyList};
pub use shared::SharedLruCache;
pub use stats::{CacheStats, MissRateHistory};
