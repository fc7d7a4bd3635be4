//! The kernel - calculators for every scheduling algorithm.
//!
//! Each calculator validates the scenario, looks up the algorithm's
//! [`Policy`] and runs the shared [`Engine`] to exhaustion. Calls are
//! self-contained: the scenario is only borrowed and nothing is shared
//! between runs.
//!
//! # Example
//!
//! ```
//! use headsweep_kernel::calculate_algorithm_by_tag;
//! use headsweep_types::Scenario;
//!
//! let scenario = Scenario::new(50).with_tracks([10, 70, 90, 20, 60, 80]).with_n_step(3);
//! let result = calculate_algorithm_by_tag("look-n", &scenario)?;
//! assert_eq!(result.total_tracks, 190);
//! # Ok::<(), headsweep_kernel::KernelError>(())
//! ```

use headsweep_types::{Algorithm, AlgorithmResult, Scenario};
use tracing::debug;

use crate::engine::Engine;
use crate::policy::Policy;

/// Runs `algorithm` over `scenario`.
pub fn calculate_algorithm(
    algorithm: Algorithm,
    scenario: &Scenario,
) -> Result<AlgorithmResult, KernelError> {
    match algorithm {
        Algorithm::Sstf => calculate_sstf(scenario),
        Algorithm::Scan => calculate_scan(scenario),
        Algorithm::CScan => calculate_cscan(scenario),
        Algorithm::Look => calculate_look(scenario),
        Algorithm::CLook => calculate_clook(scenario),
        Algorithm::ScanN => calculate_scan_n(scenario),
        Algorithm::LookN => calculate_look_n(scenario),
        Algorithm::FScan => calculate_fscan(scenario),
        Algorithm::FLook => calculate_flook(scenario),
    }
}

/// Runs the algorithm named by `tag` (`"C-SCAN"`, `"look-n"`, ...).
///
/// Unknown tags are rejected; there is no fallback algorithm.
pub fn calculate_algorithm_by_tag(
    tag: &str,
    scenario: &Scenario,
) -> Result<AlgorithmResult, KernelError> {
    let algorithm: Algorithm = tag
        .parse()
        .map_err(|_| KernelError::UnknownAlgorithm(tag.to_string()))?;
    calculate_algorithm(algorithm, scenario)
}

/// Shortest seek time first, with interception of en-route arrivals.
pub fn calculate_sstf(scenario: &Scenario) -> Result<AlgorithmResult, KernelError> {
    simulate(Algorithm::Sstf, scenario)
}

/// Elevator sweep bouncing off the physical edges.
pub fn calculate_scan(scenario: &Scenario) -> Result<AlgorithmResult, KernelError> {
    simulate(Algorithm::Scan, scenario)
}

/// One-way sweep with a non-servicing jump back from edge to edge.
pub fn calculate_cscan(scenario: &Scenario) -> Result<AlgorithmResult, KernelError> {
    simulate(Algorithm::CScan, scenario)
}

/// Elevator sweep turning around at the last request in the heading.
pub fn calculate_look(scenario: &Scenario) -> Result<AlgorithmResult, KernelError> {
    simulate(Algorithm::Look, scenario)
}

/// One-way sweep that jumps to and services the far extreme request.
pub fn calculate_clook(scenario: &Scenario) -> Result<AlgorithmResult, KernelError> {
    simulate(Algorithm::CLook, scenario)
}

/// SCAN over frozen batches of `n_step` arrived requests.
pub fn calculate_scan_n(scenario: &Scenario) -> Result<AlgorithmResult, KernelError> {
    simulate(Algorithm::ScanN, scenario)
}

/// LOOK over frozen batches of `n_step` arrived requests.
pub fn calculate_look_n(scenario: &Scenario) -> Result<AlgorithmResult, KernelError> {
    simulate(Algorithm::LookN, scenario)
}

/// SCAN over a frozen queue while a second queue collects arrivals.
pub fn calculate_fscan(scenario: &Scenario) -> Result<AlgorithmResult, KernelError> {
    simulate(Algorithm::FScan, scenario)
}

/// LOOK over a frozen queue while a second queue collects arrivals.
pub fn calculate_flook(scenario: &Scenario) -> Result<AlgorithmResult, KernelError> {
    simulate(Algorithm::FLook, scenario)
}

fn simulate(algorithm: Algorithm, scenario: &Scenario) -> Result<AlgorithmResult, KernelError> {
    validate(scenario)?;
    let policy = Policy::for_algorithm(algorithm, scenario.n_step)?;

    if scenario.requests.is_empty() {
        return Ok(AlgorithmResult::empty());
    }

    let result = Engine::new(policy, scenario).run()?;

    debug!(
        %algorithm,
        requests = scenario.requests.len(),
        steps = result.steps.len(),
        total_tracks = result.total_tracks,
        total_time = result.total_time,
        "simulation complete"
    );
    Ok(result)
}

fn validate(scenario: &Scenario) -> Result<(), KernelError> {
    for (field, value) in [
        ("time_per_track", scenario.time_per_track),
        ("time_per_request", scenario.time_per_request),
    ] {
        // Precondition: the clock must never run backwards
        if !value.is_finite() || value < 0.0 {
            return Err(KernelError::InvalidTiming { field, value });
        }
    }

    if let Some((index, request)) = scenario
        .requests
        .iter()
        .enumerate()
        .find(|(_, request)| !request.arrival_time.is_finite())
    {
        return Err(KernelError::InvalidArrival {
            index,
            value: request.arrival_time,
        });
    }

    Ok(())
}

/// Errors that can occur when running a simulation.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum KernelError {
    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("batch size must be at least 1, got {0}")]
    InvalidBatchSize(usize),

    #[error("{field} must be a finite, non-negative number, got {value}")]
    InvalidTiming { field: &'static str, value: f64 },

    #[error("request {index} has a non-finite arrival time ({value})")]
    InvalidArrival { index: usize, value: f64 },

    #[error("{remaining} request(s) can never be reached by the sweep")]
    UnreachableRequests { remaining: usize },

    #[error("total head movement overflows u64 ({total} + {distance} tracks)")]
    DistanceOverflow { total: u64, distance: u64 },
}
