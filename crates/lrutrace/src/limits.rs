//! Caller-side domain limits applied to replayed caches

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use anyhow::{anyhow, ensure, Context, Result};
use recency::{CacheConfig, Validator};

/// Inclusive integer bounds written as `LO:HI`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    /// Lowest accepted value
    pub lo: i64,
    /// Highest accepted value
    pub hi: i64,
}

impl Bounds {
    /// Bounds as an inclusive range
    pub fn range(&self) -> RangeInclusive<i64> {
        self.lo..=self.hi
    }
}

impl FromStr for Bounds {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (lo, hi) = s
            .split_once(':')
            .ok_or_else(|| anyhow!("expected LO:HI, got {:?}", s))?;
        let lo = lo.trim().parse::<i64>().with_context(|| format!("bad lower bound {:?}", lo))?;
        let hi = hi.trim().parse::<i64>().with_context(|| format!("bad upper bound {:?}", hi))?;
        ensure!(lo <= hi, "lower bound {} exceeds upper bound {}", lo, hi);

        Ok(Self { lo, hi })
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.lo, self.hi)
    }
}

/// Optional key, value and capacity policies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Limits {
    /// Accepted keys
    pub keys: Option<Bounds>,
    /// Accepted values
    pub values: Option<Bounds>,
    /// Largest capacity a trace may request
    pub max_capacity: Option<usize>,
}

impl Limits {
    /// No restrictions beyond a positive capacity
    pub fn unrestricted() -> Self {
        Self::default()
    }

    /// Keys and values in 0..=100, capacity at most 50
    pub fn demo() -> Self {
        Self {
            keys: Some(Bounds { lo: 0, hi: 100 }),
            values: Some(Bounds { lo: 0, hi: 100 }),
            max_capacity: Some(50),
        }
    }

    /// Build the cache configuration for `capacity` under these limits
    pub fn config(&self, capacity: usize) -> Result<CacheConfig<i64, i64>> {
        if let Some(max) = self.max_capacity {
            ensure!(
                capacity <= max,
                "capacity {} exceeds the configured maximum of {}",
                capacity,
                max
            );
        }

        let mut config = CacheConfig::new(capacity).record_history(true);
        if let Some(keys) = self.keys {
            config = config.key_validator(Validator::range(keys.range()));
        }
        if let Some(values) = self.values {
            config = config.value_validator(Validator::range(values.range()));
        }
        Ok(config)
    }
}
