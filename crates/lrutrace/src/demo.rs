//! Built-in demonstration workload
//!
//! Phase one replays the classic capacity-2 trace. Phase two runs a
//! capacity-50 cache under the demo limits: fill keys 0..50, look up every
//! odd key below 100, then refill with the primes up to 100.

use anyhow::Result;
use tracing::info;

use crate::limits::Limits;
use crate::replay::{render_state, Replayer};
use crate::trace::Op;

/// Miss rate observed at the end of one demo phase
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseResult {
    /// Phase label
    pub name: &'static str,
    /// Cumulative miss rate in percent
    pub miss_rate: f64,
}

/// Everything the demo produced
#[derive(Debug, Clone, PartialEq)]
pub struct DemoSummary {
    /// Outputs of the capacity-2 trace
    pub trace_outputs: String,
    /// Per-phase miss rates
    pub phases: Vec<PhaseResult>,
    /// Miss-rate history of the capacity-50 cache
    pub history: Vec<f64>,
}

/// The capacity-2 trace used in the first phase
pub fn classic_trace() -> Vec<Op> {
    vec![
        Op::New { capacity: 2 },
        Op::Put { key: 1, value: 1 },
        Op::Put { key: 2, value: 2 },
        Op::Get { key: 1 },
        Op::Put { key: 3, value: 3 },
        Op::Get { key: 2 },
        Op::Put { key: 4, value: 4 },
        Op::Get { key: 1 },
        Op::Get { key: 3 },
        Op::Get { key: 4 },
    ]
}

fn is_prime(n: i64) -> bool {
    n >= 2 && (2..).take_while(|d| d * d <= n).all(|d| n % d != 0)
}

/// Run both phases and return what they observed
pub fn run(show_state: bool) -> Result<DemoSummary> {
    let mut phases = Vec::new();

    let mut replayer = Replayer::new(Limits::demo()).show_state(show_state);
    let report = replayer.run(&classic_trace())?;
    info!("classic trace output: {}", report.outputs_line());
    info!("classic trace miss rate: {:.2}%", report.miss_rate);
    phases.push(PhaseResult {
        name: "classic",
        miss_rate: report.miss_rate,
    });
    let trace_outputs = report.outputs_line();

    let mut replayer = Replayer::new(Limits::demo()).show_state(show_state);
    replayer.apply(Op::New { capacity: 50 })?;

    let workload: [(&'static str, Vec<Op>); 3] = [
        (
            "fill",
            (0..50).map(|i| Op::Put { key: i, value: i }).collect(),
        ),
        (
            "odd lookups",
            (1..100).step_by(2).map(|key| Op::Get { key }).collect(),
        ),
        (
            "prime refill",
            (0..=100)
                .filter(|n| is_prime(*n))
                .map(|p| Op::Put { key: p, value: p })
                .collect(),
        ),
    ];

    for (name, ops) in workload {
        for op in ops {
            replayer.apply(op)?;
        }

        if let Some(cache) = replayer.cache() {
            info!("after {}: {}", name, render_state(cache));
            info!("after {}: total miss rate {:.2}%", name, cache.miss_rate());
            phases.push(PhaseResult {
                name,
                miss_rate: cache.miss_rate(),
            });
        }
    }

    let history = replayer
        .cache()
        .map(|cache| cache.history().to_vec())
        .unwrap_or_default();

    Ok(DemoSummary {
        trace_outputs,
        phases,
        history,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_prime() {
        let primes: Vec<i64> = (0..30).filter(|n| is_prime(*n)).collect();
        assert_eq!(primes, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
    }

    #[test]
    fn test_demo_miss_rates() {
        let summary = run(false).unwrap();

        assert_eq!(
            summary.trace_outputs,
            "[None, None, None, 1, None, not_found, None, not_found, 3, 4]"
        );

        let rates: Vec<f64> = summary.phases.iter().map(|p| p.miss_rate).collect();
        assert!((rates[0] - 600.0 / 9.0).abs() < 1e-9);
        // 50 fills, all misses
        assert_eq!(rates[1], 100.0);
        // odd keys below 50 hit, the 25 above miss
        assert_eq!(rates[2], 75.0);
        // 15 primes below 50 hit, 10 above miss
        assert_eq!(rates[3], 68.0);
        assert_eq!(summary.history.len(), 125);
    }
}
