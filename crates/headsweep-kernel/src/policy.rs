//! Per-algorithm engine settings.
//!
//! Every algorithm runs on the same [`crate::engine`] state machine; they
//! differ only in how the next target is chosen, how requests move from the
//! archive into service, and whether moves may be intercepted.
//!
//! | algorithm | selection                  | admission        | intercept |
//! |-----------|----------------------------|------------------|-----------|
//! | SSTF      | nearest                    | immediate        | yes       |
//! | SCAN      | sweep, edge, reverse       | immediate        | yes       |
//! | C-SCAN    | sweep, edge, wrap          | immediate        | yes       |
//! | LOOK      | sweep, request, reverse    | immediate        | yes       |
//! | C-LOOK    | sweep, request, wrap       | immediate        | yes       |
//! | SCAN-N    | sweep, edge, reverse       | batches of N     | no        |
//! | LOOK-N    | sweep, request, reverse    | batches of N     | no        |
//! | F-SCAN    | sweep, edge, reverse       | double buffered  | no        |
//! | F-LOOK    | sweep, request, reverse    | double buffered  | no        |

use headsweep_types::Algorithm;
use serde::{Deserialize, Serialize};

use crate::kernel::KernelError;

/// Where a sweep turns around when nothing is left ahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bound {
    /// The physical edge of the domain.
    Edge,
    /// The last pending request in the heading.
    Request,
}

/// What a sweep does at its bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Turnaround {
    /// Flip the heading and sweep back.
    Reverse,
    /// Jump to the opposite end and keep the heading.
    Wrap,
}

/// How the next target is chosen from the active queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    /// Closest request in either direction.
    Nearest,
    /// Closest request strictly ahead in the current heading.
    Sweep { bound: Bound, turnaround: Turnaround },
}

/// How arrived requests become eligible for service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Admission {
    /// Every arrived request joins the active queue at once.
    Immediate,
    /// Up to `size` arrived requests are frozen into a batch; the rest wait
    /// in the archive until the batch is drained.
    Batched { size: usize },
    /// Arrivals collect in a buffer that replaces the active queue once it
    /// is drained.
    DoubleBuffered,
}

/// Complete engine configuration for one algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    pub selection: Selection,
    pub admission: Admission,
    /// Whether planned moves may be redirected to not-yet-admitted requests.
    pub intercept: bool,
    /// Whether an idle head finishes its sweep to the edge before waiting.
    pub idle_sweep: bool,
}

impl Policy {
    const fn sweep(bound: Bound, turnaround: Turnaround, admission: Admission) -> Self {
        Self {
            selection: Selection::Sweep { bound, turnaround },
            admission,
            intercept: matches!(admission, Admission::Immediate),
            idle_sweep: false,
        }
    }

    /// Returns the policy for `algorithm`.
    ///
    /// `n_step` is only read by SCAN-N and LOOK-N, which reject a batch size
    /// of zero.
    pub fn for_algorithm(algorithm: Algorithm, n_step: usize) -> Result<Self, KernelError> {
        use Bound::{Edge, Request};
        use Turnaround::{Reverse, Wrap};

        let batched = || {
            if n_step == 0 {
                Err(KernelError::InvalidBatchSize(n_step))
            } else {
                Ok(Admission::Batched { size: n_step })
            }
        };

        let policy = match algorithm {
            Algorithm::Sstf => Self {
                selection: Selection::Nearest,
                admission: Admission::Immediate,
                intercept: true,
                idle_sweep: false,
            },
            Algorithm::Scan => Self::sweep(Edge, Reverse, Admission::Immediate),
            Algorithm::CScan => Self::sweep(Edge, Wrap, Admission::Immediate),
            Algorithm::Look => Self::sweep(Request, Reverse, Admission::Immediate),
            Algorithm::CLook => Self::sweep(Request, Wrap, Admission::Immediate),
            Algorithm::ScanN => Self {
                idle_sweep: true,
                ..Self::sweep(Edge, Reverse, batched()?)
            },
            Algorithm::LookN => Self::sweep(Request, Reverse, batched()?),
            Algorithm::FScan => Self::sweep(Edge, Reverse, Admission::DoubleBuffered),
            Algorithm::FLook => Self::sweep(Request, Reverse, Admission::DoubleBuffered),
        };

        Ok(policy)
    }
}
