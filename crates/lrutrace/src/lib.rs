//! # lrutrace
//!
//! Replays `new`/`put`/`get` operation traces against a [`recency`] LRU
//! cache, reporting per-op outputs, the final miss rate and the miss-rate
//! history. Key, value and capacity limits are optional caller policy.

#![warn(missing_docs)]

pub mod demo;
pub mod limits;
pub mod replay;
pub mod trace;

pub use limits::{Bounds, Limits};
pub use replay::{replay, Outcome, Replayer, Report};
pub use trace::{load_trace, parse_trace, Op};
