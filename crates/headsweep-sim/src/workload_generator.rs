//! Scenario generators for simulation testing.
//!
//! Each generator turns a seed into a complete [`Scenario`]: request tracks
//! and arrival times shaped by a [`WorkloadPattern`], plus a randomized head
//! position, direction, timing and batch size.
//!
//! ## Workload Types
//!
//! - **Uniform**: Tracks and arrivals spread evenly
//! - **Hotspot**: 20% of tracks get 80% of requests
//! - **Sequential**: Ascending runs of nearby tracks, as from a streaming reader
//! - **Bursty**: Arrivals clustered around a few burst instants
//! - **All at once**: Every request waiting at time 0

use headsweep_types::{DiskRequest, Direction, Scenario, Track};
use serde::{Deserialize, Serialize};

use crate::SimRng;

/// Choices for the per-track cost; small integers keep traces readable.
const TIME_PER_TRACK_CHOICES: [f64; 5] = [0.5, 1.0, 1.0, 2.0, 5.0];

/// Choices for the per-request service cost.
const TIME_PER_REQUEST_CHOICES: [f64; 4] = [0.0, 0.0, 1.0, 3.0];

// ============================================================================
// Workload Configuration
// ============================================================================

/// Configuration for generated scenarios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadConfig {
    /// Maximum number of requests per scenario (the actual count is random).
    pub num_requests: usize,

    /// Lower bound of the track domain.
    pub min_track: i64,

    /// Upper bound of the track domain.
    pub max_track: i64,

    /// Workload pattern; `None` picks one per seed.
    pub pattern: Option<WorkloadPattern>,

    /// Latest possible arrival time.
    pub max_arrival: f64,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            num_requests: 20,
            min_track: 0,
            max_track: 199,
            pattern: None,
            max_arrival: 50.0,
        }
    }
}

/// Request arrival patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkloadPattern {
    /// Uniform random tracks and arrivals.
    Uniform,

    /// Hotspot: 20% of tracks get 80% of requests.
    Hotspot,

    /// Ascending runs with steadily increasing arrivals.
    Sequential,

    /// Arrivals clustered in a handful of bursts.
    Bursty,

    /// Everything arrives at time 0.
    AllAtOnce,
}

impl WorkloadPattern {
    pub const ALL: [WorkloadPattern; 5] = [
        WorkloadPattern::Uniform,
        WorkloadPattern::Hotspot,
        WorkloadPattern::Sequential,
        WorkloadPattern::Bursty,
        WorkloadPattern::AllAtOnce,
    ];
}

// ============================================================================
// Workload Generator
// ============================================================================

/// Generates scenarios from a seeded RNG.
#[derive(Debug, Clone)]
pub struct WorkloadGenerator {
    config: WorkloadConfig,
}

impl WorkloadGenerator {
    /// Creates a new workload generator.
    pub fn new(config: WorkloadConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WorkloadConfig {
        &self.config
    }

    /// Generates a complete scenario.
    pub fn generate(&self, rng: &mut SimRng) -> Scenario {
        let pattern = self
            .config
            .pattern
            .unwrap_or_else(|| rng.choose(&WorkloadPattern::ALL));
        let count = rng.next_usize(self.config.num_requests + 1);

        let requests = match pattern {
            WorkloadPattern::Uniform => self.generate_uniform(rng, count),
            WorkloadPattern::Hotspot => self.generate_hotspot(rng, count),
            WorkloadPattern::Sequential => self.generate_sequential(rng, count),
            WorkloadPattern::Bursty => self.generate_bursty(rng, count),
            WorkloadPattern::AllAtOnce => self.generate_all_at_once(rng, count),
        };

        let direction = if rng.next_bool() {
            Direction::Asc
        } else {
            Direction::Desc
        };

        Scenario::new(self.random_track(rng))
            .with_requests(requests)
            .with_min_track(self.config.min_track)
            .with_max_track(self.config.max_track)
            .with_direction(direction)
            .with_time_per_track(rng.choose(&TIME_PER_TRACK_CHOICES))
            .with_time_per_request(rng.choose(&TIME_PER_REQUEST_CHOICES))
            .with_n_step(1 + rng.next_usize(5))
    }

    /// Generates uniform random tracks and arrivals.
    fn generate_uniform(&self, rng: &mut SimRng, count: usize) -> Vec<DiskRequest> {
        (0..count)
            .map(|_| DiskRequest::new(self.random_track(rng), self.random_arrival(rng)))
            .collect()
    }

    /// Generates hotspot pattern (80/20 rule).
    fn generate_hotspot(&self, rng: &mut SimRng, count: usize) -> Vec<DiskRequest> {
        let span = self.config.max_track - self.config.min_track;
        let hot_width = (span / 5).max(1);
        let hot_start = rng.next_i64_inclusive(self.config.min_track, self.config.max_track - hot_width);

        (0..count)
            .map(|_| {
                // 80% of requests land in the hot window
                let track = if rng.next_f64() < 0.8 {
                    Track::new(rng.next_i64_inclusive(hot_start, hot_start + hot_width))
                } else {
                    self.random_track(rng)
                };
                DiskRequest::new(track, self.random_arrival(rng))
            })
            .collect()
    }

    /// Generates ascending runs of nearby tracks with increasing arrivals.
    fn generate_sequential(&self, rng: &mut SimRng, count: usize) -> Vec<DiskRequest> {
        let mut requests = Vec::with_capacity(count);
        let mut track = self.random_track(rng);
        let mut arrival = 0.0;
        let gap = self.config.max_arrival / (count.max(1) as f64);

        for _ in 0..count {
            requests.push(DiskRequest::new(track, round_tenth(arrival)));

            let next = track.as_i64() + rng.next_i64_inclusive(1, 5);
            track = if next > self.config.max_track {
                // Start a new run
                self.random_track(rng)
            } else {
                Track::new(next)
            };
            arrival = (arrival + gap * rng.next_f64() * 2.0).min(self.config.max_arrival);
        }

        requests
    }

    /// Generates arrivals clustered around a few burst instants.
    fn generate_bursty(&self, rng: &mut SimRng, count: usize) -> Vec<DiskRequest> {
        let bursts: Vec<f64> = (0..1 + rng.next_usize(4))
            .map(|_| self.random_arrival(rng))
            .collect();

        (0..count)
            .map(|_| {
                let burst = rng.choose(&bursts);
                let jitter = rng.next_f64();
                let arrival = round_tenth((burst + jitter).min(self.config.max_arrival));
                DiskRequest::new(self.random_track(rng), arrival)
            })
            .collect()
    }

    /// Generates requests that are all waiting at time 0.
    fn generate_all_at_once(&self, rng: &mut SimRng, count: usize) -> Vec<DiskRequest> {
        (0..count)
            .map(|_| DiskRequest::immediate(self.random_track(rng)))
            .collect()
    }

    fn random_track(&self, rng: &mut SimRng) -> Track {
        Track::new(rng.next_i64_inclusive(self.config.min_track, self.config.max_track))
    }

    fn random_arrival(&self, rng: &mut SimRng) -> f64 {
        round_tenth(rng.next_f64() * self.config.max_arrival)
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn generator(pattern: WorkloadPattern) -> WorkloadGenerator {
        WorkloadGenerator::new(WorkloadConfig {
            pattern: Some(pattern),
            ..WorkloadConfig::default()
        })
    }

    #[test_case(WorkloadPattern::Uniform; "uniform")]
    #[test_case(WorkloadPattern::Hotspot; "hotspot")]
    #[test_case(WorkloadPattern::Sequential; "sequential")]
    #[test_case(WorkloadPattern::Bursty; "bursty")]
    #[test_case(WorkloadPattern::AllAtOnce; "all at once")]
    fn generated_scenarios_stay_in_bounds(pattern: WorkloadPattern) {
        let generator = generator(pattern);
        let config = generator.config().clone();
        for seed in 0..50 {
            let scenario = generator.generate(&mut SimRng::new(seed));
            assert!(scenario.requests.len() <= config.num_requests);
            assert!(scenario.requests_in_domain());
            assert!(scenario.initial_track.as_i64() >= config.min_track);
            assert!(scenario.initial_track.as_i64() <= config.max_track);
            assert!((1..=5).contains(&scenario.n_step));
            for request in &scenario.requests {
                assert!(request.arrival_time >= 0.0);
                assert!(request.arrival_time <= config.max_arrival);
            }
        }
    }

    #[test]
    fn all_at_once_arrives_at_zero() {
        let scenario = generator(WorkloadPattern::AllAtOnce).generate(&mut SimRng::new(3));
        assert!(scenario.requests.iter().all(|r| r.arrival_time.abs() < f64::EPSILON));
    }

    #[test]
    fn same_seed_same_scenario() {
        let generator = WorkloadGenerator::new(WorkloadConfig::default());
        for seed in 0..20 {
            assert_eq!(
                generator.generate(&mut SimRng::new(seed)),
                generator.generate(&mut SimRng::new(seed))
            );
        }
    }
}
