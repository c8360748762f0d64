//! Window statistics for the rolling filter
//!
//! Both functions recompute over the whole window on every call.
// TODO: a Welford running update would make each step O(1) instead of O(lag);
// it needs a tolerance in the streaming tests since it drifts from recomputation.

/// Arithmetic mean of a window. NaN for an empty window.
#[inline]
pub fn mean(window: &[f64]) -> f64 {
    if let Some(constant) = constant_value(window) {
        return constant;
    }
    window.iter().sum::<f64>() / window.len() as f64
}

/// Population standard deviation (divides by the window size)
///
/// A window holding one repeated value has a deviation of exactly zero.
pub fn population_std_dev(window: &[f64]) -> f64 {
    if constant_value(window).is_some() {
        return 0.0;
    }
    let m = mean(window);
    let sum_sq_diff: f64 = window.iter().map(|&x| (x - m) * (x - m)).sum();
    (sum_sq_diff / window.len() as f64).sqrt()
}

/// The single value a non-empty window repeats, if it does
#[inline]
fn constant_value(window: &[f64]) -> Option<f64> {
    let (&first, rest) = window.split_first()?;
    rest.iter().all(|&v| v == first).then_some(first)
}
