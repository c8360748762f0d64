use sonance_core::{PeakIndices, Sample, Signal};

use crate::error::DetectionResult;

/// Port for batch extrema detection
///
/// Implementations hold no mutable state between calls, so one detector can
/// be shared across threads and called once per frame.
pub trait PeakDetection: Send + Sync {
    /// Positions of the peaks (or valleys) in `samples`, ascending
    fn detect(&self, samples: &[Sample]) -> DetectionResult<PeakIndices>;

    /// Get the name of the detector
    fn name(&self) -> &str {
        "PeakDetection"
    }
}

/// Port for streaming anomaly classification
///
/// Implementations carry rolling state across calls. Consecutive calls are
/// treated as consecutive stretches of one stream; callers sharing a detector
/// across threads must serialise access themselves.
pub trait SignalDetection: Send {
    /// Classify `samples`, extending the rolling state by `samples.len()` entries
    ///
    /// The result is aligned index-for-index with `samples`.
    fn signals(&mut self, samples: &[Sample]) -> DetectionResult<Vec<Signal>>;

    /// Has the rolling baseline been established?
    fn is_warmed_up(&self) -> bool;

    /// Discard all rolling state
    fn reset(&mut self);

    /// Get the name of the detector
    fn name(&self) -> &str {
        "SignalDetection"
    }
}
