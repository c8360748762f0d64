//! Frame helpers
//!
//! A frame is one tick's worth of magnitude bins. Analysers commonly hand
//! out byte magnitudes (0..=255); detectors work on `f64`.

use crate::values::Sample;

/// Widen byte magnitudes into samples
pub fn frame_from_bytes(bytes: &[u8]) -> Vec<Sample> {
    bytes.iter().map(|&b| b as Sample).collect()
}

/// Keep at most `max_bins` leading bins of a frame
#[inline]
pub fn truncate_bins(frame: &[Sample], max_bins: Option<usize>) -> &[Sample] {
    match max_bins {
        Some(max) if max < frame.len() => &frame[..max],
        _ => frame,
    }
}
