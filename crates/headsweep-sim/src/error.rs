use headsweep_kernel::KernelError;
use headsweep_types::Algorithm;

/// Errors raised by the simulation harness.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("invariant '{invariant}' violated by {algorithm} (seed {seed}): {message}")]
    InvariantViolation {
        seed: u64,
        algorithm: Algorithm,
        invariant: String,
        message: String,
    },

    #[error("kernel rejected generated scenario: {0}")]
    Kernel(#[from] KernelError),

    #[error("invalid simulation config: {0}")]
    InvalidConfig(String),
}
