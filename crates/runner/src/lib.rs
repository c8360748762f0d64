//! Sonance Runner - Per-Frame Analysis
//!
//! Orchestrates the detectors the way a render loop uses them: once per
//! tick, one frame of magnitude bins goes in and one report comes out.
//!
//! ## Architecture
//!
//! ```text
//!        frame (f64 or byte magnitudes)
//!                     │
//!            ┌────────▼────────┐
//!            │  FrameAnalyzer  │  truncate to max_bins
//!            └──┬──────┬─────┬─┘
//!               │      │     │
//!     ┌─────────▼┐ ┌───▼────┐ ┌▼──────────────┐
//!     │  Peaks   │ │Valleys │ │ Smoothed      │
//!     │ (batch)  │ │(batch) │ │ Z-Score       │
//!     └─────────┬┘ └───┬────┘ │ (streaming or │
//!               │      │      │  per frame)   │
//!               │      │      └┬──────────────┘
//!            ┌──▼──────▼───────▼┐
//!            │   FrameReport    │
//!            └──────────────────┘
//! ```
//!
//! The detectors never call each other; each sees the same truncated frame.

pub mod analyzer;
pub mod config;
pub mod error;

// Re-export main types
pub use analyzer::{FrameAnalyzer, FrameReport};
pub use config::{AnalyzerConfig, SignalMode};
pub use error::{RunnerError, RunnerResult};

// Re-export detector types for convenience
pub use sonance_core::{EdgePolicy, Signal};
pub use sonance_ports::{DetectionError, PeakDetectorConfig, ZScoreConfig};
