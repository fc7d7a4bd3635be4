//! # headsweep-sim: Seeded verification harness for `headsweep`
//!
//! The harness generates random scenarios from a seed, runs them through
//! every scheduler, and checks the resulting traces against invariants that
//! must hold for any input. A failing seed reproduces exactly, so any
//! violation can be replayed and debugged.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐    ┌───────────────────┐    ┌──────────────┐    ┌─────────────────┐
//! │  SimRng   │ ─> │ WorkloadGenerator │ ─> │   Scenario   │ ─> │ headsweep-kernel│
//! │ (seeded)  │    │   (patterns)      │    │              │    │  (9 algorithms) │
//! └───────────┘    └───────────────────┘    └──────────────┘    └────────┬────────┘
//!                                                                        │
//!                            ┌──────────────┐    ┌───────────────────┐   │
//!                            │  VoprRunner  │ <─ │ InvariantCheckers │ <─┘
//!                            │ (batch/seed) │    │                   │
//!                            └──────────────┘    └───────────────────┘
//! ```
//!
//! - **`SimRng`**: Deterministic random number generator (seeded)
//! - **`WorkloadGenerator`**: Request patterns (uniform, hotspot, bursty, ...)
//! - **Invariant checkers**: Conservation, time, arrival, domain, direction, determinism
//! - **`VoprRunner`**: Runs seeds in batches and collects failures

pub mod invariant;
pub mod vopr;
pub mod workload_generator;

mod error;
mod rng;

pub use error::SimError;
pub use invariant::{
    ArrivalGateChecker, ConservationChecker, DeterminismChecker, DirectionChecker,
    DomainBoundsChecker, InvariantChecker, InvariantResult, MonotonicTimeChecker, SimulationRun,
    default_checkers,
};
pub use rng::SimRng;
pub use vopr::{VoprBatchResults, VoprConfig, VoprResult, VoprRunner};
pub use workload_generator::{WorkloadConfig, WorkloadGenerator, WorkloadPattern};
