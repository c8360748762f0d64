//! Detector configuration
//!
//! Both configurations deserialize with `#[serde(default)]`, so a partial
//! settings object is merged over the defaults.

use serde::{Deserialize, Serialize};
use sonance_core::EdgePolicy;

use crate::error::{DetectionError, DetectionResult};

/// Configuration for batch peak detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeakDetectorConfig {
    /// Drop peaks whose value is strictly below this height
    pub min_peak_height: Option<f64>,
    /// Minimum index separation between reported peaks (>= 1)
    pub min_peak_distance: usize,
    /// Minimum drop from a peak to both of its immediate neighbours (>= 0)
    pub threshold: f64,
    /// Plateau handling
    pub edge_policy: EdgePolicy,
    /// Keep equal-height peaks that are closer than `min_peak_distance`
    pub keep_equal_height_peaks: bool,
    /// Detect local minima instead of maxima
    pub detect_valleys: bool,
}

impl Default for PeakDetectorConfig {
    fn default() -> Self {
        Self {
            min_peak_height: None,
            min_peak_distance: 1,
            threshold: 0.0,
            edge_policy: EdgePolicy::Rising,
            keep_equal_height_peaks: false,
            detect_valleys: false,
        }
    }
}

impl PeakDetectorConfig {
    /// Default configuration for valley detection
    pub fn valleys() -> Self {
        Self {
            detect_valleys: true,
            ..Default::default()
        }
    }

    pub fn with_min_peak_height(mut self, height: f64) -> Self {
        self.min_peak_height = Some(height);
        self
    }

    pub fn with_min_peak_distance(mut self, distance: usize) -> Self {
        self.min_peak_distance = distance;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_edge_policy(mut self, edge_policy: EdgePolicy) -> Self {
        self.edge_policy = edge_policy;
        self
    }

    pub fn with_keep_equal_height_peaks(mut self, keep: bool) -> Self {
        self.keep_equal_height_peaks = keep;
        self
    }

    pub fn with_detect_valleys(mut self, valleys: bool) -> Self {
        self.detect_valleys = valleys;
        self
    }

    /// Reject out-of-range settings. Nothing is clamped.
    pub fn validate(&self) -> DetectionResult<()> {
        if self.min_peak_distance < 1 {
            return Err(DetectionError::invalid(
                "min_peak_distance must be at least 1",
            ));
        }
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(DetectionError::invalid(format!(
                "threshold must be a finite non-negative number, got {}",
                self.threshold
            )));
        }
        if let Some(height) = self.min_peak_height {
            if height.is_nan() {
                return Err(DetectionError::invalid("min_peak_height must not be NaN"));
            }
        }
        Ok(())
    }
}

/// Configuration for the smoothed z-score detector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZScoreConfig {
    /// Size of the rolling statistics window (>= 1)
    pub lag: usize,
    /// Number of standard deviations that marks an anomaly (> 0)
    pub threshold: f64,
    /// Weight of an anomalous sample in the rolling filter, in [0, 1]
    pub influence: f64,
}

impl Default for ZScoreConfig {
    fn default() -> Self {
        Self {
            lag: 5,
            threshold: 3.5,
            influence: 0.5,
        }
    }
}

impl ZScoreConfig {
    pub fn new(lag: usize, threshold: f64, influence: f64) -> Self {
        Self {
            lag,
            threshold,
            influence,
        }
    }

    /// Samples the first call must supply to complete warm-up
    #[inline]
    pub fn warm_up_len(&self) -> usize {
        self.lag + 2
    }

    /// Reject out-of-range settings. Nothing is clamped.
    pub fn validate(&self) -> DetectionResult<()> {
        if self.lag < 1 {
            return Err(DetectionError::invalid("lag must be at least 1"));
        }
        // Written as negated comparisons so NaN is rejected too
        if !(self.threshold > 0.0) {
            return Err(DetectionError::invalid(format!(
                "threshold must be positive, got {}",
                self.threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.influence) {
            return Err(DetectionError::invalid(format!(
                "influence must lie in [0, 1], got {}",
                self.influence
            )));
        }
        Ok(())
    }
}
