//! Cache statistics tracking

/// Access counters for one cache instance
///
/// Counters only grow; they start at zero when the cache is built and are
/// never reset afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    hits: u64,
    misses: u64,
    inserts: u64,
    updates: u64,
    evictions: u64,
}

impl CacheStats {
    /// Create new stats tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a cache hit
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    /// Record a cache miss
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// Record an insert of a new key
    pub fn record_insert(&mut self) {
        self.inserts += 1;
    }

    /// Record an in-place value update
    pub fn record_update(&mut self) {
        self.updates += 1;
    }

    /// Record an eviction
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Get total accesses (hits + misses)
    pub fn accesses(&self) -> u64 {
        self.hits + self.misses
    }

    /// Get total hits
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Get total misses
    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Get total inserts
    pub fn inserts(&self) -> u64 {
        self.inserts
    }

    /// Get total updates
    pub fn updates(&self) -> u64 {
        self.updates
    }

    /// Get total evictions
    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    /// Calculate hit ratio (0.0 to 1.0)
    pub fn hit_ratio(&self) -> f64 {
        let total = self.accesses();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Calculate miss rate as a percentage (0.0 to 100.0)
    pub fn miss_rate(&self) -> f64 {
        let total = self.accesses();
        if total == 0 {
            0.0
        } else {
            100.0 * self.misses as f64 / total as f64
        }
    }
}

/// Miss rate sampled after every completed access
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MissRateHistory {
    samples: Vec<f64>,
}

impl MissRateHistory {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one sample
    pub fn record(&mut self, miss_rate: f64) {
        self.samples.push(miss_rate);
    }

    /// All samples, oldest first
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Most recent sample
    pub fn last(&self) -> Option<f64> {
        self.samples.last().copied()
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
