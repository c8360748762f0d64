use log::{debug, trace};
use serde::{Deserialize, Serialize};
use sonance_core::{Sample, Signal};
use sonance_ports::{DetectionError, DetectionResult, SignalDetection, ZScoreConfig};

use crate::stats::{mean, population_std_dev};

/// Smoothed z-score detector over one sample stream
///
/// The first call to [`signals`](Self::signals) must supply at least
/// `lag + 2` samples. Its first `lag` samples seed the rolling filter and are
/// classified [`Signal::Neutral`]. Every later sample, in that call and in
/// all following calls, is compared against the mean and standard deviation
/// of the `lag` filtered values before it.
///
/// The filtered history, rolling means and rolling standard deviations are
/// index-aligned with everything the detector has been fed. Means and
/// deviations before position `lag - 1` are undefined and stored as NaN.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "DetectorSnapshot", try_from = "DetectorSnapshot")]
pub struct SmoothedZScoreDetector {
    config: ZScoreConfig,
    filtered: Vec<f64>,
    means: Vec<f64>,
    std_devs: Vec<f64>,
}

impl SmoothedZScoreDetector {
    /// Create a detector; fails if the configuration is out of range
    pub fn new(config: ZScoreConfig) -> DetectionResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            filtered: Vec::new(),
            means: Vec::new(),
            std_devs: Vec::new(),
        })
    }

    /// Classify the next stretch of the stream
    ///
    /// Before warm-up, fails with [`DetectionError::InsufficientData`] when
    /// fewer than `lag + 2` samples are given, leaving the detector
    /// untouched. After warm-up any length is accepted, including zero.
    pub fn signals(&mut self, samples: &[Sample]) -> DetectionResult<Vec<Signal>> {
        if self.is_warmed_up() {
            return Ok(self.feed(samples));
        }

        let required = self.config.warm_up_len();
        if samples.len() < required {
            return Err(DetectionError::InsufficientData {
                required,
                actual: samples.len(),
            });
        }

        let lag = self.config.lag;
        let (lead_in, rest) = samples.split_at(lag);
        self.seed(lead_in);

        debug!(
            "z-score warm-up over {} samples: mean={}, std_dev={}",
            lag,
            self.means[lag - 1],
            self.std_devs[lag - 1]
        );

        let mut out = vec![Signal::Neutral; lag];
        out.extend(self.feed(rest));
        Ok(out)
    }

    /// Seed the filter from the lead-in window
    fn seed(&mut self, lead_in: &[Sample]) {
        let lag = lead_in.len();
        self.filtered.extend_from_slice(lead_in);
        self.means.resize(lag - 1, f64::NAN);
        self.means.push(mean(lead_in));
        self.std_devs.resize(lag - 1, f64::NAN);
        self.std_devs.push(population_std_dev(lead_in));
    }

    fn feed(&mut self, samples: &[Sample]) -> Vec<Signal> {
        samples.iter().map(|&sample| self.step(sample)).collect()
    }

    /// Classify one sample and roll the window forward
    fn step(&mut self, sample: Sample) -> Signal {
        let i = self.filtered.len();
        let prev_mean = self.means[i - 1];
        let prev_std = self.std_devs[i - 1];

        let signal = if (sample - prev_mean).abs() > self.config.threshold * prev_std {
            if sample > prev_mean {
                Signal::Positive
            } else if sample < prev_mean {
                Signal::Negative
            } else {
                Signal::Neutral
            }
        } else {
            Signal::Neutral
        };

        let filtered = if signal.is_anomaly() {
            trace!(
                "sample {} at {} is {} (mean={}, std_dev={})",
                sample, i, signal, prev_mean, prev_std
            );
            let influence = self.config.influence;
            influence * sample + (1.0 - influence) * self.filtered[i - 1]
        } else {
            sample
        };
        self.push_filtered(filtered);

        signal
    }

    /// Append a filtered value and the statistics of the window ending at it
    fn push_filtered(&mut self, filtered: f64) {
        self.filtered.push(filtered);
        let window = &self.filtered[self.filtered.len() - self.config.lag..];
        self.means.push(mean(window));
        self.std_devs.push(population_std_dev(window));
    }

    /// Filtered history, one entry per sample fed
    #[inline]
    pub fn filtered(&self) -> &[f64] {
        &self.filtered
    }

    /// Rolling means, aligned with [`filtered`](Self::filtered)
    #[inline]
    pub fn means(&self) -> &[f64] {
        &self.means
    }

    /// Rolling population standard deviations, aligned with [`filtered`](Self::filtered)
    #[inline]
    pub fn std_devs(&self) -> &[f64] {
        &self.std_devs
    }

    /// Number of samples fed so far
    #[inline]
    pub fn len(&self) -> usize {
        self.filtered.len()
    }

    /// Check if nothing has been fed yet
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.filtered.is_empty()
    }

    /// Check if the rolling baseline exists
    #[inline]
    pub fn is_warmed_up(&self) -> bool {
        !self.filtered.is_empty()
    }

    /// Get the detector configuration
    #[inline]
    pub fn config(&self) -> &ZScoreConfig {
        &self.config
    }

    /// Drop all history; the next call warms up again
    pub fn reset(&mut self) {
        self.filtered.clear();
        self.means.clear();
        self.std_devs.clear();
    }
}

impl Default for SmoothedZScoreDetector {
    fn default() -> Self {
        Self {
            config: ZScoreConfig::default(),
            filtered: Vec::new(),
            means: Vec::new(),
            std_devs: Vec::new(),
        }
    }
}

impl SignalDetection for SmoothedZScoreDetector {
    fn signals(&mut self, samples: &[Sample]) -> DetectionResult<Vec<Signal>> {
        SmoothedZScoreDetector::signals(self, samples)
    }

    fn is_warmed_up(&self) -> bool {
        SmoothedZScoreDetector::is_warmed_up(self)
    }

    fn reset(&mut self) {
        SmoothedZScoreDetector::reset(self)
    }

    fn name(&self) -> &str {
        "SmoothedZScore"
    }
}

/// Serialized form of a detector
///
/// Only the configuration and the filtered history are stored; the rolling
/// statistics are a function of the history and are rebuilt on load.
/// NaN entries are written as `null`.
#[derive(Serialize, Deserialize)]
struct DetectorSnapshot {
    config: ZScoreConfig,
    filtered: Vec<Option<f64>>,
}

impl From<SmoothedZScoreDetector> for DetectorSnapshot {
    fn from(detector: SmoothedZScoreDetector) -> Self {
        Self {
            config: detector.config,
            filtered: detector
                .filtered
                .iter()
                .map(|&v| (!v.is_nan()).then_some(v))
                .collect(),
        }
    }
}

impl TryFrom<DetectorSnapshot> for SmoothedZScoreDetector {
    type Error = DetectionError;

    fn try_from(snapshot: DetectorSnapshot) -> Result<Self, Self::Error> {
        let mut detector = SmoothedZScoreDetector::new(snapshot.config)?;
        let history: Vec<f64> = snapshot
            .filtered
            .into_iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect();
        if history.is_empty() {
            return Ok(detector);
        }

        let required = detector.config.warm_up_len();
        if history.len() < required {
            return Err(DetectionError::invalid(format!(
                "history of {} samples is shorter than the warm-up of {}",
                history.len(),
                required
            )));
        }

        let (lead_in, rest) = history.split_at(detector.config.lag);
        detector.seed(lead_in);
        for &filtered in rest {
            detector.push_filtered(filtered);
        }
        Ok(detector)
    }
}
