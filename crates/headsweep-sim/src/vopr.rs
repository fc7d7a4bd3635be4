//! VOPR runner for seeded randomized verification.
//!
//! Each seed deterministically produces one scenario, which is run through
//! every configured algorithm and checked by every invariant checker. Batches
//! walk consecutive seeds, so a failure is reproduced by re-running its seed.

use headsweep_kernel::{calculate_algorithm, compute_trace_hash};
use headsweep_types::{Algorithm, AlgorithmResult, Scenario};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::invariant::{InvariantChecker, InvariantResult, SimulationRun, default_checkers};
use crate::workload_generator::{WorkloadConfig, WorkloadGenerator};
use crate::{SimError, SimRng};

// ============================================================================
// VOPR Configuration
// ============================================================================

/// Configuration for VOPR simulation runs.
#[derive(Debug, Clone)]
pub struct VoprConfig {
    /// Starting seed for simulations.
    pub seed: u64,
    /// Number of iterations to run.
    pub iterations: u64,
    /// Algorithms to run on every generated scenario.
    pub algorithms: Vec<Algorithm>,
    /// Shape of the generated scenarios.
    pub workload: WorkloadConfig,
    /// Re-run each algorithm and compare trace fingerprints.
    pub check_determinism: bool,
    /// Verbose output.
    pub verbose: bool,
}

impl Default for VoprConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            iterations: 100,
            algorithms: Algorithm::ALL.to_vec(),
            workload: WorkloadConfig::default(),
            check_determinism: true,
            verbose: false,
        }
    }
}

impl VoprConfig {
    /// Rejects configurations that cannot produce meaningful runs.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.algorithms.is_empty() {
            return Err(SimError::InvalidConfig(
                "at least one algorithm is required".to_string(),
            ));
        }
        if self.workload.max_track < self.workload.min_track {
            return Err(SimError::InvalidConfig(format!(
                "max_track {} is below min_track {}",
                self.workload.max_track, self.workload.min_track
            )));
        }
        if !self.workload.max_arrival.is_finite() || self.workload.max_arrival < 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "max_arrival must be a finite, non-negative number, got {}",
                self.workload.max_arrival
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Simulation Results
// ============================================================================

/// Result of a single VOPR simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum VoprResult {
    /// Every algorithm passed every checker.
    Success {
        /// Seed used for this run.
        seed: u64,
        /// Number of requests in the generated scenario.
        requests: usize,
        /// Trace fingerprint per algorithm, for determinism checking.
        fingerprints: Vec<(Algorithm, [u8; 32])>,
    },
    /// An invariant was violated.
    InvariantViolation {
        /// Seed that triggered the failure.
        seed: u64,
        /// Algorithm that produced the offending trace.
        algorithm: Algorithm,
        /// Invariant that was violated.
        invariant: String,
        /// Error message.
        message: String,
        /// Additional context from the checker.
        context: Vec<(String, String)>,
    },
}

impl VoprResult {
    /// Returns true if the simulation succeeded.
    pub fn is_ok(&self) -> bool {
        matches!(self, VoprResult::Success { .. })
    }

    /// Returns the seed for this result.
    pub fn seed(&self) -> u64 {
        match self {
            VoprResult::Success { seed, .. } | VoprResult::InvariantViolation { seed, .. } => *seed,
        }
    }
}

/// Results from a batch of VOPR runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoprBatchResults {
    /// All individual results.
    pub results: Vec<VoprResult>,
    /// Number of successful runs.
    pub successes: u64,
    /// Number of failed runs.
    pub failures: u64,
    /// Failed seeds for reproduction.
    pub failed_seeds: Vec<u64>,
    /// Total elapsed time (seconds).
    pub elapsed_secs: f64,
}

impl VoprBatchResults {
    /// Returns true if all simulations passed.
    pub fn all_passed(&self) -> bool {
        self.failures == 0
    }

    /// Returns the success rate (0.0 to 1.0).
    pub fn success_rate(&self) -> f64 {
        if self.results.is_empty() {
            0.0
        } else {
            self.successes as f64 / self.results.len() as f64
        }
    }

    /// Returns simulations per second.
    pub fn rate(&self) -> f64 {
        if self.elapsed_secs > 0.0 {
            self.results.len() as f64 / self.elapsed_secs
        } else {
            0.0
        }
    }
}

// ============================================================================
// VOPR Runner
// ============================================================================

/// Runs seeded simulations.
#[derive(Debug, Clone)]
pub struct VoprRunner {
    config: VoprConfig,
    generator: WorkloadGenerator,
}

impl VoprRunner {
    /// Creates a new VOPR runner with the given configuration.
    pub fn new(config: VoprConfig) -> Result<Self, SimError> {
        config.validate()?;
        let generator = WorkloadGenerator::new(config.workload.clone());
        Ok(Self { config, generator })
    }

    pub fn config(&self) -> &VoprConfig {
        &self.config
    }

    /// Generates the scenario for `seed`.
    pub fn scenario(&self, seed: u64) -> Scenario {
        let mut rng = SimRng::new(seed);
        self.generator.generate(&mut rng)
    }

    /// Re-runs one algorithm on the scenario for `seed`.
    pub fn replay(
        &self,
        seed: u64,
        algorithm: Algorithm,
    ) -> Result<(Scenario, AlgorithmResult), SimError> {
        let scenario = self.scenario(seed);
        let result = calculate_algorithm(algorithm, &scenario)?;
        Ok((scenario, result))
    }

    /// Runs a single simulation with the given seed.
    pub fn run_single(&self, seed: u64) -> VoprResult {
        let scenario = self.scenario(seed);
        let mut checkers = self.checkers();
        let mut fingerprints = Vec::with_capacity(self.config.algorithms.len());

        if self.config.verbose {
            info!(
                seed,
                requests = scenario.requests.len(),
                initial = %scenario.initial_track,
                direction = %scenario.direction,
                n_step = scenario.n_step,
                "generated scenario"
            );
        }

        for &algorithm in &self.config.algorithms {
            let result = match calculate_algorithm(algorithm, &scenario) {
                Ok(result) => result,
                Err(e) => {
                    warn!(seed, %algorithm, error = %e, "kernel rejected scenario");
                    return VoprResult::InvariantViolation {
                        seed,
                        algorithm,
                        invariant: "kernel_accepts_valid_scenario".to_string(),
                        message: e.to_string(),
                        context: vec![],
                    };
                }
            };

            let run = SimulationRun {
                algorithm,
                scenario: &scenario,
                result: &result,
            };
            for checker in &mut checkers {
                if let InvariantResult::Violated {
                    invariant,
                    message,
                    context,
                } = checker.check(&run)
                {
                    warn!(seed, %algorithm, checker = checker.name(), %message, "invariant violated");
                    return VoprResult::InvariantViolation {
                        seed,
                        algorithm,
                        invariant,
                        message,
                        context,
                    };
                }
            }

            debug!(
                seed,
                %algorithm,
                total_tracks = result.total_tracks,
                total_time = result.total_time,
                "algorithm passed"
            );
            fingerprints.push((algorithm, compute_trace_hash(&result)));
        }

        VoprResult::Success {
            seed,
            requests: scenario.requests.len(),
            fingerprints,
        }
    }

    /// Runs a batch of simulations.
    pub fn run_batch(&self) -> VoprBatchResults {
        let start = std::time::Instant::now();
        let mut results = Vec::new();
        let mut successes = 0;
        let mut failed_seeds = Vec::new();

        for i in 0..self.config.iterations {
            let seed = self.config.seed.wrapping_add(i);
            let result = self.run_single(seed);

            if result.is_ok() {
                successes += 1;
            } else {
                failed_seeds.push(seed);
            }

            results.push(result);
        }

        let elapsed = start.elapsed();
        info!(
            iterations = self.config.iterations,
            successes,
            failures = failed_seeds.len(),
            elapsed_secs = elapsed.as_secs_f64(),
            "batch complete"
        );

        VoprBatchResults {
            successes,
            failures: failed_seeds.len() as u64,
            failed_seeds,
            results,
            elapsed_secs: elapsed.as_secs_f64(),
        }
    }

    fn checkers(&self) -> Vec<Box<dyn InvariantChecker>> {
        default_checkers()
            .into_iter()
            .filter(|checker| self.config.check_determinism || checker.name() != "determinism")
            .collect()
    }
}
