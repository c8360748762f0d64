//! Sonance Peak Detection
//!
//! Batch detection of local maxima (or minima) in one frame of samples,
//! with minimum height, minimum distance, neighbour threshold and plateau
//! edge policies.

mod detector;

pub use detector::{PeakDetector, detect};

// Re-export the port and configuration for convenience
pub use sonance_core::{EdgePolicy, PeakIndices};
pub use sonance_ports::{DetectionError, DetectionResult, PeakDetection, PeakDetectorConfig};

/// Factory function to create a peak detector by edge policy name
///
/// Names are matched case-insensitively; an unknown name is an
/// [`DetectionError::InvalidArgument`].
pub fn create_peak_detector(edge_policy: &str) -> DetectionResult<Box<dyn PeakDetection>> {
    let edge_policy = edge_policy.parse::<EdgePolicy>()?;
    Ok(Box::new(PeakDetector::with_config(
        PeakDetectorConfig::default().with_edge_policy(edge_policy),
    )))
}
