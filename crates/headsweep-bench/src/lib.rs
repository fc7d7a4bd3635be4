//! # headsweep-bench: Performance benchmarks for the scheduling kernel
//!
//! Shared fixtures and latency statistics for the bench targets.

// Benchmark code intentionally uses patterns that trigger some clippy lints
#![allow(clippy::cast_precision_loss)] // Latency stats use f64 for percentile calculations
#![allow(clippy::cast_possible_truncation)] // Nanosecond durations fit in u64
//!
//! ## Benchmarks
//!
//! - **kernel**: Criterion throughput of every algorithm across queue sizes
//! - **latency**: Per-run latency percentiles over seeded scenarios
//!
//! ## Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench -p headsweep-bench
//!
//! # Save baseline for comparison
//! cargo bench -p headsweep-bench --bench kernel -- --save-baseline main
//!
//! # Compare against baseline
//! cargo bench -p headsweep-bench --bench kernel -- --baseline main
//! ```

use std::time::Instant;

use hdrhistogram::Histogram;
use headsweep_kernel::{KernelError, calculate_algorithm};
use headsweep_sim::SimRng;
use headsweep_types::{Algorithm, DiskRequest, Scenario};

/// Upper track bound of every fixture.
pub const FIXTURE_MAX_TRACK: i64 = 4_999;

/// Builds a scenario with exactly `count` uniformly spread requests.
///
/// When `staggered` is set, arrivals are spread over `[0, count)`;
/// otherwise everything arrives at time 0.
pub fn fixture(count: usize, seed: u64, staggered: bool) -> Scenario {
    let mut rng = SimRng::new(seed);
    let initial = rng.next_i64_inclusive(0, FIXTURE_MAX_TRACK);
    let requests: Vec<DiskRequest> = (0..count)
        .map(|_| {
            let track = rng.next_i64_inclusive(0, FIXTURE_MAX_TRACK);
            let arrival = if staggered {
                (rng.next_f64() * count as f64).floor()
            } else {
                0.0
            };
            DiskRequest::new(track, arrival)
        })
        .collect();

    Scenario::new(initial)
        .with_requests(requests)
        .with_max_track(FIXTURE_MAX_TRACK)
        .with_n_step(8)
}

/// Tracks latency percentiles for kernel runs.
#[derive(Debug)]
pub struct LatencyTracker {
    histogram: Histogram<u64>,
}

impl LatencyTracker {
    /// Creates a new latency tracker with 3 significant digits.
    pub fn new() -> Self {
        Self {
            histogram: Histogram::new(3).expect("valid histogram config"),
        }
    }

    /// Records a latency measurement in nanoseconds.
    pub fn record(&mut self, latency_ns: u64) {
        self.histogram.record(latency_ns).ok();
    }

    pub fn count(&self) -> u64 {
        self.histogram.len()
    }

    pub fn p50(&self) -> u64 {
        self.histogram.value_at_quantile(0.50)
    }

    pub fn p99(&self) -> u64 {
        self.histogram.value_at_quantile(0.99)
    }

    pub fn max(&self) -> u64 {
        self.histogram.max()
    }

    pub fn mean(&self) -> f64 {
        self.histogram.mean()
    }

    /// Exports latency statistics as one JSON object for CI integration.
    pub fn to_json(&self, operation: &str) -> String {
        serde_json::json!({
            "operation": operation,
            "count": self.count(),
            "p50_ns": self.p50(),
            "p99_ns": self.p99(),
            "max_ns": self.max(),
            "mean_ns": self.mean(),
        })
        .to_string()
    }

    /// One aligned summary line, in microseconds.
    pub fn summary_line(&self, operation: &str) -> String {
        format!(
            "{operation:<8} p50 {:>9.2} μs  p99 {:>9.2} μs  max {:>9.2} μs  ({} runs)",
            self.p50() as f64 / 1000.0,
            self.p99() as f64 / 1000.0,
            self.max() as f64 / 1000.0,
            self.count()
        )
    }
}

impl Default for LatencyTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Times `algorithm` once per scenario.
pub fn profile(
    algorithm: Algorithm,
    scenarios: &[Scenario],
) -> Result<LatencyTracker, KernelError> {
    let mut tracker = LatencyTracker::new();
    for scenario in scenarios {
        let start = Instant::now();
        let result = calculate_algorithm(algorithm, scenario)?;
        tracker.record(start.elapsed().as_nanos() as u64);
        std::hint::black_box(result);
    }
    Ok(tracker)
}
