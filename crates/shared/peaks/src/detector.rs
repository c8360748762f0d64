use log::{debug, trace};
use sonance_core::{EdgePolicy, PeakIndices, Sample};
use sonance_ports::{DetectionResult, PeakDetection, PeakDetectorConfig};
use sonance_vector::{
    columnwise_min, concat, elementwise_combine, elementwise_map, gather, set_difference,
    stable_argsort_descending, unique_sorted, where_indices,
};

/// Peak detector bound to one configuration
///
/// Holds no state besides its configuration; `detect` can be called from
/// several threads at once.
#[derive(Debug, Clone, Default)]
pub struct PeakDetector {
    config: PeakDetectorConfig,
}

impl PeakDetector {
    /// Create a new peak detector with default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom configuration
    pub fn with_config(config: PeakDetectorConfig) -> Self {
        Self { config }
    }

    /// Get the detector configuration
    pub fn config(&self) -> &PeakDetectorConfig {
        &self.config
    }
}

impl PeakDetection for PeakDetector {
    fn detect(&self, samples: &[Sample]) -> DetectionResult<PeakIndices> {
        detect(samples, &self.config)
    }

    fn name(&self) -> &str {
        if self.config.detect_valleys {
            "ValleyDetector"
        } else {
            "PeakDetector"
        }
    }
}

/// Detect peaks (or valleys) in `samples`
///
/// Returns ascending, unique positions. The first and last positions are
/// never reported, and neither is any position next to a NaN sample.
pub fn detect(samples: &[Sample], config: &PeakDetectorConfig) -> DetectionResult<PeakIndices> {
    config.validate()?;

    if samples.len() < 3 {
        return Ok(Vec::new());
    }

    // Valleys are peaks of the negated sequence
    let (mut x, min_height) = if config.detect_valleys {
        (
            elementwise_map(samples, |v| -v),
            config.min_peak_height.map(|h| -h),
        )
    } else {
        (samples.to_vec(), config.min_peak_height)
    };
    let last = x.len() - 1;

    // Differences are taken before NaN replacement, so every difference
    // touching a NaN is itself NaN and becomes +inf below.
    let mut dx = elementwise_combine(&x[1..], &x[..last], |next, prev| next - prev)?;

    let nan_positions = where_indices(&x, |v| v.is_nan());
    if !nan_positions.is_empty() {
        for &i in &nan_positions {
            x[i] = f64::INFINITY;
        }
        for i in where_indices(&dx, |v| v.is_nan()) {
            dx[i] = f64::INFINITY;
        }
    }

    let mut ind = edge_candidates(&dx, config.edge_policy)?;
    trace!("candidates after edge policy {}: {:?}", config.edge_policy, ind);

    // NaNs and their direct neighbours cannot be peaks
    if !ind.is_empty() && !nan_positions.is_empty() {
        let below: Vec<usize> = nan_positions.iter().filter_map(|i| i.checked_sub(1)).collect();
        let above = elementwise_map(&nan_positions, |i| i + 1);
        let near_nan = unique_sorted(&concat(&[&nan_positions[..], &below[..], &above[..]]));
        ind = set_difference(&ind, &near_nan);
        trace!("candidates away from NaN {:?}: {:?}", nan_positions, ind);
    }

    // A peak needs two neighbours
    ind.retain(|&i| i != 0 && i != last);

    if let Some(min_height) = min_height {
        if !ind.is_empty() {
            let heights = gather(&x, &ind)?;
            ind = gather(&ind, &where_indices(&heights, |&h| h >= min_height))?;
            trace!("candidates at or above height {}: {:?}", min_height, ind);
        }
    }

    if config.threshold > 0.0 && !ind.is_empty() {
        ind = apply_threshold(&x, &ind, config.threshold)?;
        trace!("candidates clearing threshold {}: {:?}", config.threshold, ind);
    }

    if config.min_peak_distance > 1 && !ind.is_empty() {
        ind = apply_min_distance(
            &x,
            &ind,
            config.min_peak_distance,
            config.keep_equal_height_peaks,
        )?;
    }

    debug!(
        "{} {} detected in {} samples: {:?}",
        ind.len(),
        if config.detect_valleys { "valleys" } else { "peaks" },
        samples.len(),
        ind
    );

    Ok(ind)
}

/// Candidate positions for the given plateau policy
///
/// `dx` is padded with a zero on each side so that position `i` sees the
/// difference entering it and the difference leaving it.
fn edge_candidates(dx: &[f64], edge_policy: EdgePolicy) -> DetectionResult<Vec<usize>> {
    let entering = concat(&[&[0.0][..], dx]);
    let leaving = concat(&[dx, &[0.0][..]]);

    if edge_policy == EdgePolicy::None {
        return edge_mask(&entering, &leaving, |e| e > 0.0, |l| l < 0.0);
    }

    let rising = if edge_policy.keeps_rising() {
        edge_mask(&entering, &leaving, |e| e > 0.0, |l| l <= 0.0)?
    } else {
        Vec::new()
    };
    let falling = if edge_policy.keeps_falling() {
        edge_mask(&entering, &leaving, |e| e >= 0.0, |l| l < 0.0)?
    } else {
        Vec::new()
    };

    Ok(unique_sorted(&concat(&[&rising[..], &falling[..]])))
}

fn edge_mask(
    entering: &[f64],
    leaving: &[f64],
    enters: impl Fn(f64) -> bool,
    leaves: impl Fn(f64) -> bool,
) -> DetectionResult<Vec<usize>> {
    let mask = elementwise_combine(entering, leaving, |&e, &l| enters(e) && leaves(l))?;
    Ok(where_indices(&mask, |&m| m))
}

/// Drop candidates whose smaller drop to a neighbour is below `threshold`
fn apply_threshold(x: &[f64], ind: &[usize], threshold: f64) -> DetectionResult<Vec<usize>> {
    let heights = gather(x, ind)?;
    let left = gather(x, &elementwise_map(ind, |i| i - 1))?;
    let right = gather(x, &elementwise_map(ind, |i| i + 1))?;

    let drop_left = elementwise_combine(&heights, &left, |h, n| h - n)?;
    let drop_right = elementwise_combine(&heights, &right, |h, n| h - n)?;
    let drops = columnwise_min(&[drop_left, drop_right])?;

    // NaN drops compare false and are kept
    let kept = where_indices(&drops, |&d| !(d < threshold));
    gather(ind, &kept)
}

/// Suppress candidates within `distance` of a higher candidate
///
/// Candidates are visited tallest first (ties: earlier position first).
/// Each visited, unsuppressed candidate marks every other candidate within
/// `distance` as suppressed, except equal-or-taller ones when
/// `keep_equal_height` is set. Survivors are returned in position order.
///
/// `ind` must be ascending; each visit only scans the candidates inside its
/// `±distance` range, found by binary search.
fn apply_min_distance(
    x: &[f64],
    ind: &[usize],
    distance: usize,
    keep_equal_height: bool,
) -> DetectionResult<Vec<usize>> {
    let heights = gather(x, ind)?;
    let order = stable_argsort_descending(&heights);

    let mut suppressed = vec![false; ind.len()];
    for &i in &order {
        if suppressed[i] {
            continue;
        }
        let peak = ind[i];
        let lo = ind.partition_point(|&q| q < peak.saturating_sub(distance));
        let hi = ind.partition_point(|&q| q <= peak.saturating_add(distance));
        for j in lo..hi {
            if j == i || suppressed[j] {
                continue;
            }
            if !keep_equal_height || heights[i] > heights[j] {
                suppressed[j] = true;
            }
        }
    }

    let kept = gather(ind, &where_indices(&suppressed, |&s| !s))?;
    trace!(
        "candidates at least {} apart: {:?} (suppressed {})",
        distance,
        kept,
        ind.len() - kept.len()
    );
    Ok(kept)
}
