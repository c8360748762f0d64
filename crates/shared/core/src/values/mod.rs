mod edge;
mod signal;

pub use edge::{EdgePolicy, ParseEdgePolicyError};
pub use signal::Signal;

/// One real-valued magnitude reading. NaN marks a missing reading.
pub type Sample = f64;

/// Ascending, de-duplicated positions of detected peaks (or valleys)
pub type PeakIndices = Vec<usize>;
