//! Analyzer configuration
//!
//! Loaded from JSON with every field optional:
//!
//! ```json
//! {
//!   "peaks": { "min_peak_distance": 4, "edge_policy": "both" },
//!   "valleys": null,
//!   "zscore": { "lag": 20, "threshold": 3.0, "influence": 0.5 },
//!   "signal_mode": "per_frame",
//!   "max_bins": 256
//! }
//! ```

use serde::{Deserialize, Serialize};
use sonance_ports::{PeakDetectorConfig, ZScoreConfig};

use crate::error::RunnerResult;

/// How frames relate to the z-score stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalMode {
    /// Frames are consecutive stretches of one stream sharing one detector
    #[default]
    Streaming,
    /// Every frame is scored on its own, warm-up included
    PerFrame,
}

/// Which detectors run on each frame, and how
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Peak detection; `None` disables it
    pub peaks: Option<PeakDetectorConfig>,
    /// Valley detection; `detect_valleys` is forced on. `None` disables it
    pub valleys: Option<PeakDetectorConfig>,
    /// Z-score classification; `None` disables it
    pub zscore: Option<ZScoreConfig>,
    /// Stream or per-frame scoring
    pub signal_mode: SignalMode,
    /// Only the leading bins are analysed when set
    pub max_bins: Option<usize>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            peaks: Some(PeakDetectorConfig::default()),
            valleys: None,
            zscore: Some(ZScoreConfig::default()),
            signal_mode: SignalMode::Streaming,
            max_bins: None,
        }
    }
}

impl AnalyzerConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> RunnerResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> RunnerResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn with_peaks(mut self, peaks: Option<PeakDetectorConfig>) -> Self {
        self.peaks = peaks;
        self
    }

    pub fn with_valleys(mut self, valleys: Option<PeakDetectorConfig>) -> Self {
        self.valleys = valleys.map(|v| v.with_detect_valleys(true));
        self
    }

    pub fn with_zscore(mut self, zscore: Option<ZScoreConfig>) -> Self {
        self.zscore = zscore;
        self
    }

    pub fn with_signal_mode(mut self, mode: SignalMode) -> Self {
        self.signal_mode = mode;
        self
    }

    pub fn with_max_bins(mut self, max_bins: usize) -> Self {
        self.max_bins = Some(max_bins);
        self
    }

    /// Validate every enabled detector configuration
    pub fn validate(&self) -> RunnerResult<()> {
        if let Some(peaks) = &self.peaks {
            peaks.validate()?;
        }
        if let Some(valleys) = &self.valleys {
            valleys.validate()?;
        }
        if let Some(zscore) = &self.zscore {
            zscore.validate()?;
        }
        Ok(())
    }
}
