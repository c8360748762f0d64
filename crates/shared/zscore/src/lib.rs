//! Sonance Smoothed Z-Score
//!
//! Streaming anomaly classification over a rolling window of filtered
//! samples. Anomalous samples enter the rolling filter damped by the
//! configured influence, so a burst does not immediately become the new
//! baseline.

mod detector;
mod stats;

pub use detector::SmoothedZScoreDetector;
pub use stats::{mean, population_std_dev};

// Re-export the port and configuration for convenience
pub use sonance_core::Signal;
pub use sonance_ports::{DetectionError, DetectionResult, SignalDetection, ZScoreConfig};
