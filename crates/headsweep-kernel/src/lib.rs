//! # headsweep-kernel: Functional core of `headsweep`
//!
//! The kernel simulates disk head scheduling. Given an initial head
//! position, a list of track requests tagged with arrival times and the
//! domain geometry, it produces the sequence of head movements an algorithm
//! would make together with per-step timing.
//!
//! ## Key Principles
//!
//! - **No IO**: The kernel never touches disk, network, or any external resource
//! - **No clocks**: Time is simulated; the clock only advances with head movement
//! - **No randomness**: Same scenario always produces the same trace
//! - **Pure functions**: `calculate_algorithm(algorithm, scenario) -> result`
//!
//! ## Architecture
//!
//! - [`queues`]: Request arena and the archive / active / buffer queues
//! - [`intercept`]: Redirects a planned move to a request arriving en route
//! - [`policy`]: Per-algorithm selection, admission and interception settings
//! - [`engine`]: The sweep state machine shared by every algorithm
//! - [`kernel`]: One calculator per algorithm plus the dispatch facade
//! - [`trace_hash`]: Deterministic BLAKE3 fingerprint of a result
//!
//! ## Example
//!
//! ```
//! use headsweep_kernel::calculate_look;
//! use headsweep_types::{DiskRequest, Scenario, Track};
//!
//! let scenario = Scenario::new(10)
//!     .with_requests([
//!         DiskRequest::new(10, 0.0),
//!         DiskRequest::new(19, 1.0),
//!         DiskRequest::new(3, 2.0),
//!         DiskRequest::new(14, 3.0),
//!         DiskRequest::new(12, 6.0),
//!         DiskRequest::new(9, 7.0),
//!     ])
//!     .with_time_per_track(5.0);
//!
//! let result = calculate_look(&scenario).unwrap();
//! let tracks: Vec<i64> = result.sequence.iter().map(|t| t.as_i64()).collect();
//! assert_eq!(tracks, vec![10, 12, 14, 19, 9, 3]);
//! assert_eq!(result.total_tracks, 25);
//! ```

pub mod engine;
pub mod intercept;
pub mod kernel;
pub mod policy;
pub mod queues;
pub mod trace_hash;

#[cfg(test)]
mod tests;

// Re-export commonly used items
pub use intercept::{Interception, find_interception};
pub use kernel::{
    KernelError, calculate_algorithm, calculate_algorithm_by_tag, calculate_clook, calculate_cscan,
    calculate_flook, calculate_fscan, calculate_look, calculate_look_n, calculate_scan,
    calculate_scan_n, calculate_sstf,
};
pub use policy::{Admission, Bound, Policy, Selection, Turnaround};
pub use trace_hash::{compute_trace_hash, trace_hash_hex};
