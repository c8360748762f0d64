//! Sonance Core Domain
//!
//! Pure value types shared by the Sonance detectors.
//! This crate contains no I/O and no detector state.

pub mod frame;
pub mod values;

// Re-export commonly used types at crate root
pub use frame::{frame_from_bytes, truncate_bins};
pub use values::{EdgePolicy, ParseEdgePolicyError, PeakIndices, Sample, Signal};
