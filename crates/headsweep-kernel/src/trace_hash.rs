//! Deterministic fingerprinting of simulation results.
//!
//! The fingerprint is a BLAKE3 hash over every step and the summary fields,
//! in trace order. Floats are hashed by their bit patterns, so two results
//! hash equal only if they are bit-for-bit identical.
//!
//! # Purpose
//!
//! - **Determinism validation**: Same scenario → identical fingerprint
//! - **Regression pinning**: A trace can be compared by a 64-character hex string

use blake3::Hasher;
use headsweep_types::{AlgorithmResult, StepKind, Track};

/// Computes a deterministic hash of an entire result.
///
/// # Examples
///
/// ```
/// use headsweep_kernel::{calculate_sstf, compute_trace_hash};
/// use headsweep_types::Scenario;
///
/// let scenario = Scenario::new(50).with_tracks([45, 55, 30]);
/// let a = calculate_sstf(&scenario).unwrap();
/// let b = calculate_sstf(&scenario).unwrap();
///
/// // Same scenario → same hash
/// assert_eq!(compute_trace_hash(&a), compute_trace_hash(&b));
/// ```
pub fn compute_trace_hash(result: &AlgorithmResult) -> [u8; 32] {
    let mut hasher = Hasher::new();

    // Summary
    hasher.update(&result.total_tracks.to_le_bytes());
    hasher.update(&result.total_time.to_bits().to_le_bytes());
    hash_tracks(&mut hasher, &result.sequence);

    // Steps, in order
    hasher.update(&(result.steps.len() as u64).to_le_bytes());
    for step in &result.steps {
        hasher.update(&step.from.as_i64().to_le_bytes());
        hasher.update(&step.to.as_i64().to_le_bytes());
        hasher.update(&step.distance.to_le_bytes());
        hasher.update(&step.instant.to_bits().to_le_bytes());
        hasher.update(&[kind_tag(step.kind)]);

        hash_tracks(&mut hasher, &step.remaining);
        match &step.buffer {
            Some(buffer) => {
                hasher.update(&[1u8]);
                hash_tracks(&mut hasher, buffer);
            }
            None => {
                hasher.update(&[0u8]);
            }
        }
        match step.arrival_instant {
            Some(arrival) => {
                hasher.update(&[1u8]);
                hasher.update(&arrival.to_bits().to_le_bytes());
            }
            None => {
                hasher.update(&[0u8]);
            }
        }
    }

    *hasher.finalize().as_bytes()
}

/// Hex rendering of [`compute_trace_hash`].
pub fn trace_hash_hex(result: &AlgorithmResult) -> String {
    compute_trace_hash(result)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

fn hash_tracks(hasher: &mut Hasher, tracks: &[Track]) {
    // Length prefix keeps adjacent lists from running together
    hasher.update(&(tracks.len() as u64).to_le_bytes());
    for track in tracks {
        hasher.update(&track.as_i64().to_le_bytes());
    }
}

fn kind_tag(kind: StepKind) -> u8 {
    match kind {
        StepKind::Service => 0,
        StepKind::Edge => 1,
        StepKind::Wrap => 2,
        StepKind::WrapService => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use headsweep_types::Step;

    fn sample() -> AlgorithmResult {
        AlgorithmResult {
            sequence: vec![Track::new(12)],
            total_tracks: 2,
            steps: vec![Step {
                from: Track::new(10),
                to: Track::new(12),
                distance: 2,
                remaining: vec![Track::new(19)],
                buffer: None,
                instant: 1.0,
                arrival_instant: Some(6.0),
                kind: StepKind::Service,
            }],
            total_time: 11.0,
        }
    }

    #[test]
    fn empty_results_hash_equal() {
        assert_eq!(
            compute_trace_hash(&AlgorithmResult::empty()),
            compute_trace_hash(&AlgorithmResult::default())
        );
    }

    #[test]
    fn every_field_contributes() {
        let base = compute_trace_hash(&sample());

        let mut changed = sample();
        changed.steps[0].instant = 1.5;
        assert_ne!(compute_trace_hash(&changed), base);

        let mut changed = sample();
        changed.steps[0].buffer = Some(Vec::new());
        assert_ne!(compute_trace_hash(&changed), base);

        let mut changed = sample();
        changed.steps[0].kind = StepKind::WrapService;
        assert_ne!(compute_trace_hash(&changed), base);
    }

    #[test]
    fn hex_is_64_characters() {
        let hex = trace_hash_hex(&sample());
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
