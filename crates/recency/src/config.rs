//! Construction-time cache configuration

use std::fmt;
use std::ops::RangeInclusive;
use std::sync::Arc;

use crate::error::{Error, Field, Result};

/// Caller-supplied predicate run before each `get`/`put`
pub struct Validator<T> {
    description: String,
    check: Arc<dyn Fn(&T) -> bool + Send + Sync>,
}

impl<T> Validator<T> {
    /// Wrap a predicate; `description` is reported when it rejects an input
    pub fn new<F>(description: impl Into<String>, check: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self {
            description: description.into(),
            check: Arc::new(check),
        }
    }

    /// Accept only values inside `range`
    pub fn range(range: RangeInclusive<T>) -> Self
    where
        T: PartialOrd + fmt::Debug + Send + Sync + 'static,
    {
        let description = format!("must be in {:?}", range);
        Self::new(description, move |value| range.contains(value))
    }

    /// Description reported on rejection
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Check whether `value` is accepted
    pub fn accepts(&self, value: &T) -> bool {
        (self.check)(value)
    }

    pub(crate) fn validate(&self, field: Field, value: &T) -> Result<()> {
        if self.accepts(value) {
            Ok(())
        } else {
            Err(Error::InvalidInput {
                field,
                reason: self.description.clone(),
            })
        }
    }
}

impl<T> Clone for Validator<T> {
    fn clone(&self) -> Self {
        Self {
            description: self.description.clone(),
            check: Arc::clone(&self.check),
        }
    }
}

impl<T> fmt::Debug for Validator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Settings for building an [`LruCache`](crate::LruCache)
///
/// # Example
/// ```
/// use recency::{CacheConfig, LruCache, Validator};
///
/// let config = CacheConfig::new(50)
///     .key_validator(Validator::range(0..=100))
///     .value_validator(Validator::range(0..=100));
/// let mut cache: LruCache<i64, i64> = LruCache::with_config(config).unwrap();
///
/// assert!(cache.put(7, 7).is_ok());
/// assert!(cache.put(101, 7).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig<K, V> {
    pub(crate) capacity: usize,
    pub(crate) key_validator: Option<Validator<K>>,
    pub(crate) value_validator: Option<Validator<V>>,
    pub(crate) record_history: bool,
}

impl<K, V> CacheConfig<K, V> {
    /// Start a configuration with the given capacity
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            key_validator: None,
            value_validator: None,
            record_history: false,
        }
    }

    /// Reject keys the validator does not accept
    pub fn key_validator(mut self, validator: Validator<K>) -> Self {
        self.key_validator = Some(validator);
        self
    }

    /// Reject values the validator does not accept
    pub fn value_validator(mut self, validator: Validator<V>) -> Self {
        self.value_validator = Some(validator);
        self
    }

    /// Sample the miss rate after every access (off by default)
    ///
    /// The series grows by one sample per access and is never trimmed.
    pub fn record_history(mut self, enabled: bool) -> Self {
        self.record_history = enabled;
        self
    }

    /// Configured capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
