//! Sonance Ports
//!
//! Port definitions (traits) for the Sonance detectors, together with the
//! error taxonomy and the configuration each detector is built from.
//! These define the boundaries between the detection algorithms and
//! whatever feeds them frames.

mod config;
mod detection;
mod error;

pub use config::{PeakDetectorConfig, ZScoreConfig};
pub use detection::{PeakDetection, SignalDetection};
pub use error::{DetectionError, DetectionResult};
