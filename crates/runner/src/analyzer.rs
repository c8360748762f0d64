//! Frame analyzer - runs the configured detectors over each frame

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use sonance_core::{PeakIndices, Sample, Signal, frame_from_bytes, truncate_bins};
use sonance_peaks::PeakDetector;
use sonance_ports::{DetectionError, PeakDetection, SignalDetection};
use sonance_zscore::SmoothedZScoreDetector;

use crate::config::{AnalyzerConfig, SignalMode};
use crate::error::RunnerResult;

/// Detector output for one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameReport {
    /// Sequence number of the frame (0-based)
    pub frame: u64,
    /// Number of bins analysed after truncation
    pub bins: usize,
    /// Peak positions; empty when peak detection is disabled
    pub peaks: PeakIndices,
    /// Valley positions; empty when valley detection is disabled
    pub valleys: PeakIndices,
    /// One classification per bin; empty when z-score is disabled or the
    /// frame was too short to score
    pub signals: Vec<Signal>,
}

impl FrameReport {
    /// Positions classified as anomalous in either direction
    pub fn anomalies(&self) -> Vec<usize> {
        self.signals
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.is_anomaly().then_some(i))
            .collect()
    }
}

/// Runs peak, valley and z-score detection once per frame
///
/// In [`SignalMode::Streaming`] one z-score detector sees every frame in
/// order; the first frame must be long enough to warm it up. In
/// [`SignalMode::PerFrame`] each frame is scored by a fresh detector.
#[derive(Debug, Clone)]
pub struct FrameAnalyzer {
    config: AnalyzerConfig,
    peaks: Option<PeakDetector>,
    valleys: Option<PeakDetector>,
    zscore: Option<SmoothedZScoreDetector>,
    frames: u64,
}

impl FrameAnalyzer {
    /// Create an analyzer with the default configuration
    pub fn new() -> Self {
        Self {
            config: AnalyzerConfig::default(),
            peaks: Some(PeakDetector::new()),
            valleys: None,
            zscore: Some(SmoothedZScoreDetector::default()),
            frames: 0,
        }
    }

    /// Create with custom configuration
    pub fn with_config(config: AnalyzerConfig) -> RunnerResult<Self> {
        config.validate()?;

        let peaks = config.peaks.clone().map(PeakDetector::with_config);
        let valleys = config
            .valleys
            .clone()
            .map(|v| PeakDetector::with_config(v.with_detect_valleys(true)));
        let zscore = config.zscore.map(SmoothedZScoreDetector::new).transpose()?;

        Ok(Self {
            config,
            peaks,
            valleys,
            zscore,
            frames: 0,
        })
    }

    /// Analyse one frame of samples
    ///
    /// In streaming mode a first frame shorter than the z-score warm-up
    /// fails with [`DetectionError::InsufficientData`]; the analyzer is left
    /// unchanged and the frame is not counted.
    pub fn analyze(&mut self, frame: &[Sample]) -> RunnerResult<FrameReport> {
        let frame = truncate_bins(frame, self.config.max_bins);

        let signals = self.score(frame)?;
        let peaks = match &self.peaks {
            Some(detector) => detector.detect(frame)?,
            None => Vec::new(),
        };
        let valleys = match &self.valleys {
            Some(detector) => detector.detect(frame)?,
            None => Vec::new(),
        };

        let report = FrameReport {
            frame: self.frames,
            bins: frame.len(),
            peaks,
            valleys,
            signals,
        };
        self.frames += 1;

        debug!(
            "frame {}: bins={}, peaks={:?}, valleys={:?}, anomalies={}",
            report.frame,
            report.bins,
            report.peaks,
            report.valleys,
            report.signals.iter().filter(|s| s.is_anomaly()).count()
        );

        Ok(report)
    }

    /// Analyse one frame of byte magnitudes (0..=255)
    pub fn analyze_bytes(&mut self, frame: &[u8]) -> RunnerResult<FrameReport> {
        self.analyze(&frame_from_bytes(frame))
    }

    fn score(&mut self, frame: &[Sample]) -> RunnerResult<Vec<Signal>> {
        let Some(zscore) = self.zscore.as_mut() else {
            return Ok(Vec::new());
        };

        match self.config.signal_mode {
            SignalMode::Streaming => Ok(zscore.signals(frame)?),
            SignalMode::PerFrame => {
                zscore.reset();
                match zscore.signals(frame) {
                    Ok(signals) => Ok(signals),
                    Err(DetectionError::InsufficientData { required, actual }) => {
                        warn!(
                            "frame {} has {} bins, z-score needs {}; skipping signals",
                            self.frames, actual, required
                        );
                        Ok(Vec::new())
                    }
                    Err(e) => Err(e.into()),
                }
            }
        }
    }

    /// Number of frames analysed successfully
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Get the analyzer configuration
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// The streaming z-score detector, if enabled
    pub fn zscore(&self) -> Option<&SmoothedZScoreDetector> {
        self.zscore.as_ref()
    }

    /// Restart the stream and the frame count
    pub fn reset(&mut self) {
        if let Some(zscore) = self.zscore.as_mut() {
            zscore.reset();
        }
        self.frames = 0;
    }
}

impl Default for FrameAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sonance_ports::{PeakDetectorConfig, ZScoreConfig};

    #[test]
    fn test_default_analyzer() {
        let mut analyzer = FrameAnalyzer::new();
        let report = analyzer
            .analyze(&[0.0, 1.0, 0.0, 3.0, 0.0, 2.0, 0.0, 1.0])
            .unwrap();

        assert_eq!(report.frame, 0);
        assert_eq!(report.bins, 8);
        assert_eq!(report.peaks, vec![1, 3, 5]);
        assert!(report.valleys.is_empty());
        assert_eq!(report.signals.len(), 8);
        assert_eq!(analyzer.frames(), 1);
    }

    #[test]
    fn test_max_bins_truncates() {
        let config = AnalyzerConfig::default().with_max_bins(4).with_zscore(None);
        let mut analyzer = FrameAnalyzer::with_config(config).unwrap();

        let report = analyzer.analyze(&[0.0, 1.0, 0.0, 1.0, 9.0, 0.0]).unwrap();
        assert_eq!(report.bins, 4);
        assert_eq!(report.peaks, vec![1]);
        assert!(report.signals.is_empty());
    }

    #[test]
    fn test_valleys_enabled() {
        let config = AnalyzerConfig::default()
            .with_peaks(None)
            .with_valleys(Some(PeakDetectorConfig::default()))
            .with_zscore(None);
        let mut analyzer = FrameAnalyzer::with_config(config).unwrap();

        let report = analyzer.analyze(&[5.0, 1.0, 5.0, 0.0, 5.0]).unwrap();
        assert!(report.peaks.is_empty());
        assert_eq!(report.valleys, vec![1, 3]);
    }

    #[test]
    fn test_streaming_short_first_frame_fails_cleanly() {
        let mut analyzer = FrameAnalyzer::new();
        let err = analyzer.analyze(&[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(
            err,
            crate::RunnerError::Detection(DetectionError::InsufficientData { required: 7, actual: 3 })
        ));
        assert_eq!(analyzer.frames(), 0);
        assert!(!analyzer.zscore().unwrap().is_warmed_up());
    }

    #[test]
    fn test_per_frame_short_frame_skips_signals() {
        let config = AnalyzerConfig::default()
            .with_zscore(Some(ZScoreConfig::new(4, 3.0, 0.5)))
            .with_signal_mode(SignalMode::PerFrame);
        let mut analyzer = FrameAnalyzer::with_config(config).unwrap();

        let report = analyzer.analyze(&[0.0, 1.0, 0.0]).unwrap();
        assert!(report.signals.is_empty());
        assert_eq!(report.peaks, vec![1]);
    }

    #[test]
    fn test_analyze_bytes() {
        let config = AnalyzerConfig::default().with_zscore(None);
        let mut analyzer = FrameAnalyzer::with_config(config).unwrap();
        let report = analyzer.analyze_bytes(&[0, 200, 10, 255, 3]).unwrap();
        assert_eq!(report.peaks, vec![1, 3]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config =
            AnalyzerConfig::default().with_peaks(Some(PeakDetectorConfig::default().with_min_peak_distance(0)));
        assert!(FrameAnalyzer::with_config(config).is_err());
    }

    #[test]
    fn test_report_anomalies() {
        let report = FrameReport {
            signals: vec![Signal::Neutral, Signal::Positive, Signal::Neutral, Signal::Negative],
            ..Default::default()
        };
        assert_eq!(report.anomalies(), vec![1, 3]);
    }
}
