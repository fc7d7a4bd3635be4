//! Invariant checkers for simulation testing.
//!
//! Each checker inspects one finished run (scenario, algorithm, result) and
//! reports whether a correctness property holds. The properties hold for any
//! valid scenario, so they can be checked on randomly generated input.
//!
//! # Available Checkers
//!
//! - [`ConservationChecker`]: Every request serviced exactly once; distances add up
//! - [`MonotonicTimeChecker`]: Step instants never decrease
//! - [`ArrivalGateChecker`]: No request is serviced before it arrives
//! - [`DomainBoundsChecker`]: Edge-seeking sweeps stay inside the domain
//! - [`DirectionChecker`]: Circular sweeps only move in their configured direction
//! - [`DeterminismChecker`]: Re-running yields an identical trace fingerprint

use headsweep_kernel::{calculate_algorithm, compute_trace_hash};
use headsweep_types::{Algorithm, AlgorithmResult, Direction, Scenario};

use crate::SimError;

/// Tolerance for floating point comparisons of simulated time.
const TIME_EPSILON: f64 = 1e-9;

// ============================================================================
// Invariant Result
// ============================================================================

/// Result of an invariant check.
#[derive(Debug, Clone)]
pub enum InvariantResult {
    /// The invariant holds.
    Ok,
    /// The invariant is violated.
    Violated {
        /// Name of the violated invariant.
        invariant: String,
        /// Description of the violation.
        message: String,
        /// Additional context.
        context: Vec<(String, String)>,
    },
}

impl InvariantResult {
    /// Returns true if the invariant holds.
    pub fn is_ok(&self) -> bool {
        matches!(self, InvariantResult::Ok)
    }

    /// Converts to a `SimError` if violated.
    pub fn into_error(self, seed: u64, algorithm: Algorithm) -> Option<SimError> {
        match self {
            InvariantResult::Ok => None,
            InvariantResult::Violated {
                invariant, message, ..
            } => Some(SimError::InvariantViolation {
                seed,
                algorithm,
                invariant,
                message,
            }),
        }
    }

    fn violated(invariant: &str, message: String, context: Vec<(&str, String)>) -> Self {
        InvariantResult::Violated {
            invariant: invariant.to_string(),
            message,
            context: context
                .into_iter()
                .map(|(key, value)| (key.to_string(), value))
                .collect(),
        }
    }
}

/// One finished run, as seen by the checkers.
#[derive(Debug, Clone, Copy)]
pub struct SimulationRun<'a> {
    pub algorithm: Algorithm,
    pub scenario: &'a Scenario,
    pub result: &'a AlgorithmResult,
}

// ============================================================================
// Invariant Checker Trait
// ============================================================================

/// Trait for invariant checkers.
///
/// Invariant checkers verify that correctness properties hold for a run.
pub trait InvariantChecker {
    /// Returns the name of this checker.
    fn name(&self) -> &'static str;

    /// Checks one run.
    fn check(&mut self, run: &SimulationRun<'_>) -> InvariantResult;

    /// Number of runs checked so far.
    fn checks_performed(&self) -> u64;

    /// Resets the checker to its initial state.
    fn reset(&mut self);
}

/// Every checker, in the order the runner applies them.
pub fn default_checkers() -> Vec<Box<dyn InvariantChecker>> {
    vec![
        Box::new(ConservationChecker::new()),
        Box::new(MonotonicTimeChecker::new()),
        Box::new(ArrivalGateChecker::new()),
        Box::new(DomainBoundsChecker::new()),
        Box::new(DirectionChecker::new()),
        Box::new(DeterminismChecker::new()),
    ]
}

macro_rules! counting_checker {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Default)]
        pub struct $name {
            checks: u64,
        }

        impl $name {
            pub fn new() -> Self {
                Self::default()
            }
        }
    };
}

// ============================================================================
// Conservation Checker
// ============================================================================

counting_checker!(
    /// Verifies that requests are neither lost nor duplicated and that the
    /// distance total matches the steps.
    ConservationChecker
);

impl InvariantChecker for ConservationChecker {
    fn name(&self) -> &'static str {
        "conservation"
    }

    fn check(&mut self, run: &SimulationRun<'_>) -> InvariantResult {
        self.checks += 1;
        let result = run.result;

        let mut requested: Vec<i64> = run
            .scenario
            .requests
            .iter()
            .map(|r| r.track.as_i64())
            .collect();
        let mut serviced: Vec<i64> = result.sequence.iter().map(|t| t.as_i64()).collect();
        requested.sort_unstable();
        serviced.sort_unstable();
        if requested != serviced {
            return InvariantResult::violated(
                "conservation_requests",
                format!(
                    "{} requests in, {} serviced, multisets differ",
                    requested.len(),
                    serviced.len()
                ),
                vec![("algorithm", run.algorithm.to_string())],
            );
        }

        let service_targets: Vec<_> = result.service_steps().map(|step| step.to).collect();
        if service_targets != result.sequence {
            return InvariantResult::violated(
                "conservation_sequence",
                "sequence does not match the service steps".to_string(),
                vec![
                    ("service_steps", service_targets.len().to_string()),
                    ("sequence", result.sequence.len().to_string()),
                ],
            );
        }

        for (index, step) in result.steps.iter().enumerate() {
            if step.distance != step.from.distance_to(step.to) {
                return InvariantResult::violated(
                    "conservation_step_distance",
                    format!(
                        "step {index} claims distance {} for {} -> {}",
                        step.distance, step.from, step.to
                    ),
                    vec![("step", index.to_string())],
                );
            }
        }

        let sum: u64 = result.steps.iter().map(|step| step.distance).sum();
        if sum != result.total_tracks {
            return InvariantResult::violated(
                "conservation_total_tracks",
                format!(
                    "total_tracks {} != sum of step distances {sum}",
                    result.total_tracks
                ),
                vec![],
            );
        }

        InvariantResult::Ok
    }

    fn checks_performed(&self) -> u64 {
        self.checks
    }

    fn reset(&mut self) {
        self.checks = 0;
    }
}

// ============================================================================
// Monotonic Time Checker
// ============================================================================

counting_checker!(
    /// Verifies that simulated time never runs backwards.
    MonotonicTimeChecker
);

impl InvariantChecker for MonotonicTimeChecker {
    fn name(&self) -> &'static str {
        "monotonic_time"
    }

    fn check(&mut self, run: &SimulationRun<'_>) -> InvariantResult {
        self.checks += 1;
        let steps = &run.result.steps;

        for (index, pair) in steps.windows(2).enumerate() {
            if pair[1].instant < pair[0].instant {
                return InvariantResult::violated(
                    "monotonic_time",
                    format!(
                        "step {} starts at {} after step {index} started at {}",
                        index + 1,
                        pair[1].instant,
                        pair[0].instant
                    ),
                    vec![("step", (index + 1).to_string())],
                );
            }
        }

        if let Some(last) = steps.last() {
            if last.instant > run.result.total_time + TIME_EPSILON {
                return InvariantResult::violated(
                    "monotonic_total_time",
                    format!(
                        "last step starts at {} but total time is {}",
                        last.instant, run.result.total_time
                    ),
                    vec![],
                );
            }
        }

        InvariantResult::Ok
    }

    fn checks_performed(&self) -> u64 {
        self.checks
    }

    fn reset(&mut self) {
        self.checks = 0;
    }
}

// ============================================================================
// Arrival Gate Checker
// ============================================================================

counting_checker!(
    /// Verifies that the head never reaches a serviced track before the
    /// request for it has arrived.
    ArrivalGateChecker
);

impl InvariantChecker for ArrivalGateChecker {
    fn name(&self) -> &'static str {
        "arrival_gate"
    }

    fn check(&mut self, run: &SimulationRun<'_>) -> InvariantResult {
        self.checks += 1;
        let time_per_track = run.scenario.time_per_track;

        for (index, step) in run.result.steps.iter().enumerate() {
            if !step.kind.is_service() {
                continue;
            }
            let Some(arrival) = step.arrival_instant else {
                return InvariantResult::violated(
                    "arrival_gate_missing",
                    format!("service step {index} has no arrival instant"),
                    vec![("step", index.to_string())],
                );
            };
            let reached = step.instant + step.distance as f64 * time_per_track;
            if reached + TIME_EPSILON < arrival {
                return InvariantResult::violated(
                    "arrival_gate",
                    format!(
                        "track {} reached at {reached} but its request arrives at {arrival}",
                        step.to
                    ),
                    vec![
                        ("step", index.to_string()),
                        ("algorithm", run.algorithm.to_string()),
                    ],
                );
            }
        }

        InvariantResult::Ok
    }

    fn checks_performed(&self) -> u64 {
        self.checks
    }

    fn reset(&mut self) {
        self.checks = 0;
    }
}

// ============================================================================
// Domain Bounds Checker
// ============================================================================

counting_checker!(
    /// Verifies that edge-seeking sweeps never leave `[min_track, max_track]`.
    ///
    /// Only applies when the head and every request start inside the domain.
    DomainBoundsChecker
);

impl InvariantChecker for DomainBoundsChecker {
    fn name(&self) -> &'static str {
        "domain_bounds"
    }

    fn check(&mut self, run: &SimulationRun<'_>) -> InvariantResult {
        self.checks += 1;
        let scenario = run.scenario;
        let (min, max) = (scenario.min_track, scenario.effective_max_track());

        let applies = run.algorithm.visits_edges()
            && scenario.requests_in_domain()
            && scenario.initial_track >= min
            && scenario.initial_track <= max;
        if !applies {
            return InvariantResult::Ok;
        }

        for (index, step) in run.result.steps.iter().enumerate() {
            if step.to < min || step.to > max {
                return InvariantResult::violated(
                    "domain_bounds",
                    format!("step {index} moves to {} outside [{min}, {max}]", step.to),
                    vec![("algorithm", run.algorithm.to_string())],
                );
            }
        }

        InvariantResult::Ok
    }

    fn checks_performed(&self) -> u64 {
        self.checks
    }

    fn reset(&mut self) {
        self.checks = 0;
    }
}

// ============================================================================
// Direction Checker
// ============================================================================

counting_checker!(
    /// Verifies that C-SCAN and C-LOOK only move in their configured
    /// direction outside of wrap moves.
    DirectionChecker
);

impl InvariantChecker for DirectionChecker {
    fn name(&self) -> &'static str {
        "direction"
    }

    fn check(&mut self, run: &SimulationRun<'_>) -> InvariantResult {
        self.checks += 1;
        let scenario = run.scenario;
        let (min, max) = (scenario.min_track, scenario.effective_max_track());

        // A head outside the domain legitimately moves backwards to the edge.
        let applies = run.algorithm.is_circular()
            && scenario.initial_track >= min
            && scenario.initial_track <= max;
        if !applies {
            return InvariantResult::Ok;
        }

        for (index, step) in run.result.steps.iter().enumerate() {
            if step.kind.is_wrap() {
                continue;
            }
            let forward = match scenario.direction {
                Direction::Asc => step.from <= step.to,
                Direction::Desc => step.from >= step.to,
            };
            if !forward {
                return InvariantResult::violated(
                    "direction",
                    format!(
                        "step {index} moves {} -> {} against heading {}",
                        step.from, step.to, scenario.direction
                    ),
                    vec![("algorithm", run.algorithm.to_string())],
                );
            }
        }

        InvariantResult::Ok
    }

    fn checks_performed(&self) -> u64 {
        self.checks
    }

    fn reset(&mut self) {
        self.checks = 0;
    }
}

// ============================================================================
// Determinism Checker
// ============================================================================

counting_checker!(
    /// Verifies that re-running a scenario reproduces the trace bit for bit.
    DeterminismChecker
);

impl InvariantChecker for DeterminismChecker {
    fn name(&self) -> &'static str {
        "determinism"
    }

    fn check(&mut self, run: &SimulationRun<'_>) -> InvariantResult {
        self.checks += 1;
        let expected = compute_trace_hash(run.result);

        match calculate_algorithm(run.algorithm, run.scenario) {
            Ok(replay) => {
                let actual = compute_trace_hash(&replay);
                if actual == expected {
                    InvariantResult::Ok
                } else {
                    InvariantResult::violated(
                        "determinism",
                        "replay produced a different trace".to_string(),
                        vec![
                            ("algorithm", run.algorithm.to_string()),
                            ("expected_steps", run.result.steps.len().to_string()),
                            ("actual_steps", replay.steps.len().to_string()),
                        ],
                    )
                }
            }
            Err(e) => InvariantResult::violated(
                "determinism",
                format!("replay failed: {e}"),
                vec![("algorithm", run.algorithm.to_string())],
            ),
        }
    }

    fn checks_performed(&self) -> u64 {
        self.checks
    }

    fn reset(&mut self) {
        self.checks = 0;
    }
}
