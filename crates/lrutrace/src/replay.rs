//! Trace replay against a live cache

use std::fmt;
use std::io::Write;

use anyhow::{anyhow, Context, Result};
use recency::LruCache;
use serde::{Serialize, Serializer};
use tracing::{debug, info};

use crate::limits::Limits;
use crate::trace::Op;

/// Result of one replayed operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// `new` and `put` produce no value
    Done,
    /// `get` hit
    Value(i64),
    /// `get` miss
    NotFound,
}

impl Serialize for Outcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Outcome::Done => serializer.serialize_none(),
            Outcome::Value(v) => serializer.serialize_i64(*v),
            Outcome::NotFound => serializer.serialize_str("not_found"),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Done => f.write_str("None"),
            Outcome::Value(v) => write!(f, "{}", v),
            Outcome::NotFound => f.write_str("not_found"),
        }
    }
}

/// Everything a replay produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// One outcome per op, in trace order
    pub outputs: Vec<Outcome>,
    /// Final miss rate of the last cache, in percent
    pub miss_rate: f64,
    /// Miss rate after each access on the last cache
    pub history: Vec<f64>,
    /// Contents of the last cache, MRU first
    pub state: Vec<(i64, i64)>,
}

impl Report {
    /// Outputs rendered as `[None, None, 1, not_found]`
    pub fn outputs_line(&self) -> String {
        let items: Vec<String> = self.outputs.iter().map(Outcome::to_string).collect();
        format!("[{}]", items.join(", "))
    }
}

/// Feeds trace ops to a cache built under the given limits
pub struct Replayer {
    limits: Limits,
    cache: Option<LruCache<i64, i64>>,
    show_state: bool,
}

impl Replayer {
    /// Create a replayer with no cache yet
    pub fn new(limits: Limits) -> Self {
        Self {
            limits,
            cache: None,
            show_state: false,
        }
    }

    /// Log the cache contents after every op
    pub fn show_state(mut self, enabled: bool) -> Self {
        self.show_state = enabled;
        self
    }

    /// Current cache, if a `new` op has run
    pub fn cache(&self) -> Option<&LruCache<i64, i64>> {
        self.cache.as_ref()
    }

    /// Apply one op
    pub fn apply(&mut self, op: Op) -> Result<Outcome> {
        let outcome = match op {
            Op::New { capacity } => {
                let config = self.limits.config(capacity)?;
                self.cache = Some(LruCache::with_config(config)?);
                debug!(capacity, "cache created");
                Outcome::Done
            }
            Op::Put { key, value } => {
                self.cache_mut()?
                    .put(key, value)
                    .with_context(|| format!("put({}, {}) rejected", key, value))?;
                Outcome::Done
            }
            Op::Get { key } => {
                let found = self
                    .cache_mut()?
                    .get(&key)
                    .with_context(|| format!("get({}) rejected", key))?;
                match found {
                    Some(&value) => Outcome::Value(value),
                    None => Outcome::NotFound,
                }
            }
        };

        if self.show_state {
            if let Some(cache) = &self.cache {
                info!("{:?} -> {} | {}", op, outcome, render_state(cache));
            }
        }

        Ok(outcome)
    }

    /// Apply every op in order, stopping at the first failure
    pub fn run(&mut self, ops: &[Op]) -> Result<Report> {
        let mut outputs = Vec::with_capacity(ops.len());
        for (i, op) in ops.iter().enumerate() {
            let outcome = self.apply(*op).with_context(|| format!("op {} failed", i))?;
            outputs.push(outcome);
        }

        let cache = self
            .cache
            .as_ref()
            .ok_or_else(|| anyhow!("trace never created a cache"))?;

        Ok(Report {
            outputs,
            miss_rate: cache.miss_rate(),
            history: cache.history().to_vec(),
            state: cache.snapshot().map(|(k, v)| (*k, *v)).collect(),
        })
    }

    fn cache_mut(&mut self) -> Result<&mut LruCache<i64, i64>> {
        self.cache
            .as_mut()
            .ok_or_else(|| anyhow!("no cache: trace must start with a new op"))
    }
}

/// Replay `ops` under `limits`
pub fn replay(limits: Limits, ops: &[Op]) -> Result<Report> {
    Replayer::new(limits).run(ops)
}

/// Cache contents as `(k, v) <-> (k, v) <-> END`, MRU first
pub fn render_state(cache: &LruCache<i64, i64>) -> String {
    let mut parts: Vec<String> = cache
        .snapshot()
        .map(|(key, value)| format!("({}, {})", key, value))
        .collect();
    parts.push("END".to_string());
    parts.join(" <-> ")
}

/// Write the miss-rate history as `op,miss_rate` CSV rows
pub fn write_history_csv<W: Write>(mut out: W, history: &[f64]) -> Result<()> {
    writeln!(out, "op,miss_rate")?;
    for (i, rate) in history.iter().enumerate() {
        writeln!(out, "{},{:.4}", i + 1, rate)?;
    }
    out.flush()?;
    Ok(())
}
