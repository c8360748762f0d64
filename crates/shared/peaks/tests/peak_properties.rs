//! Peak Detection Property Tests
//!
//! Checks the result invariants over many seeded random frames:
//! 1. Boundaries are never reported
//! 2. Results are strictly ascending
//! 3. Minimum distance holds when equal heights are not kept
//! 4. Valley detection equals peak detection on the negated frame
//! 5. Repeated calls agree
//! 6. Distance suppression agrees with an all-pairs reference

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sonance_peaks::{EdgePolicy, PeakDetection, PeakDetector, PeakDetectorConfig, detect};

const EDGES: [EdgePolicy; 4] = [
    EdgePolicy::Rising,
    EdgePolicy::Falling,
    EdgePolicy::Both,
    EdgePolicy::None,
];

/// Small integer levels so plateaus and equal heights are common
fn random_frame(rng: &mut StdRng) -> Vec<f64> {
    let len = rng.gen_range(0..40);
    (0..len)
        .map(|_| {
            if rng.gen_ratio(1, 25) {
                f64::NAN
            } else {
                rng.gen_range(0..6) as f64
            }
        })
        .collect()
}

fn random_config(rng: &mut StdRng) -> PeakDetectorConfig {
    let mut config = PeakDetectorConfig::default()
        .with_edge_policy(EDGES[rng.gen_range(0..EDGES.len())])
        .with_min_peak_distance(rng.gen_range(1..6))
        .with_keep_equal_height_peaks(rng.gen_bool(0.3))
        .with_detect_valleys(rng.gen_bool(0.3));
    if rng.gen_bool(0.3) {
        config = config.with_threshold(rng.gen_range(0..3) as f64 * 0.5);
    }
    if rng.gen_bool(0.3) {
        config = config.with_min_peak_height(rng.gen_range(-3..4) as f64);
    }
    config
}

#[test]
fn test_results_are_ascending_and_interior() {
    let _ = env_logger::try_init();
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..500 {
        let frame = random_frame(&mut rng);
        let config = random_config(&mut rng);
        let peaks = detect(&frame, &config).unwrap();

        assert!(
            peaks.windows(2).all(|w| w[0] < w[1]),
            "not strictly ascending: {:?}",
            peaks
        );
        if let (Some(&first), Some(&last)) = (peaks.first(), peaks.last()) {
            assert!(first > 0, "first index reported for {:?}", frame);
            assert!(last < frame.len() - 1, "last index reported for {:?}", frame);
        }
        for &p in &peaks {
            assert!(!frame[p].is_nan());
            assert!(!frame[p - 1].is_nan() && !frame[p + 1].is_nan());
        }
    }
}

#[test]
fn test_min_distance_respected() {
    let mut rng = StdRng::seed_from_u64(11);

    for _ in 0..500 {
        let frame = random_frame(&mut rng);
        let config = random_config(&mut rng).with_keep_equal_height_peaks(false);
        let distance = config.min_peak_distance;
        if distance < 2 {
            continue;
        }

        let peaks = detect(&frame, &config).unwrap();
        for w in peaks.windows(2) {
            assert!(
                w[1] - w[0] >= distance,
                "peaks {:?} closer than {} in {:?}",
                w,
                distance,
                frame
            );
        }
    }
}

#[test]
fn test_valleys_match_negated_peaks() {
    let mut rng = StdRng::seed_from_u64(13);

    for _ in 0..300 {
        let frame = random_frame(&mut rng);
        let config = random_config(&mut rng).with_detect_valleys(true);

        let negated: Vec<f64> = frame.iter().map(|v| -v).collect();
        let mut peak_config = config.clone().with_detect_valleys(false);
        peak_config.min_peak_height = config.min_peak_height.map(|h| -h);

        assert_eq!(
            detect(&frame, &config).unwrap(),
            detect(&negated, &peak_config).unwrap()
        );
    }
}

#[test]
fn test_plateau_of_any_length() {
    for k in 2..8 {
        let mut frame = vec![0.0, 1.0];
        frame.extend(std::iter::repeat_n(4.0, k));
        frame.extend([1.0, 0.0]);
        let first = 2;
        let last = first + k - 1;

        let run = |edge| detect(&frame, &PeakDetectorConfig::default().with_edge_policy(edge));
        assert_eq!(run(EdgePolicy::Rising).unwrap(), vec![first]);
        assert_eq!(run(EdgePolicy::Falling).unwrap(), vec![last]);
        assert_eq!(run(EdgePolicy::Both).unwrap(), vec![first, last]);
        assert!(run(EdgePolicy::None).unwrap().is_empty());
    }
}

#[test]
fn test_repeated_calls_agree() {
    let mut rng = StdRng::seed_from_u64(17);
    let detector = PeakDetector::with_config(
        PeakDetectorConfig::default()
            .with_min_peak_distance(3)
            .with_edge_policy(EdgePolicy::Both),
    );

    for _ in 0..100 {
        let frame = random_frame(&mut rng);
        let first = detector.detect(&frame).unwrap();
        let second = detector.detect(&frame).unwrap();
        assert_eq!(first, second);
    }
}

/// All-pairs distance suppression over ascending candidates
fn suppress_all_pairs(
    frame: &[f64],
    candidates: &[usize],
    distance: usize,
    keep_equal: bool,
) -> Vec<usize> {
    let mut order: Vec<usize> = (0..candidates.len()).collect();
    order.sort_by(|&a, &b| {
        frame[candidates[b]]
            .partial_cmp(&frame[candidates[a]])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut suppressed = vec![false; candidates.len()];
    for &i in &order {
        if suppressed[i] {
            continue;
        }
        for j in 0..candidates.len() {
            let close = candidates[i].abs_diff(candidates[j]) <= distance;
            let lower = !keep_equal || frame[candidates[i]] > frame[candidates[j]];
            if j != i && !suppressed[j] && close && lower {
                suppressed[j] = true;
            }
        }
    }
    (0..candidates.len())
        .filter(|&k| !suppressed[k])
        .map(|k| candidates[k])
        .collect()
}

#[test]
fn test_min_distance_matches_all_pairs_reference() {
    let mut rng = StdRng::seed_from_u64(19);

    for _ in 0..500 {
        let frame: Vec<f64> = (0..rng.gen_range(3..60))
            .map(|_| rng.gen_range(0..6) as f64)
            .collect();
        let config = random_config(&mut rng).with_detect_valleys(false);
        let distance = config.min_peak_distance;

        let candidates = detect(&frame, &config.clone().with_min_peak_distance(1)).unwrap();
        let expected =
            suppress_all_pairs(&frame, &candidates, distance, config.keep_equal_height_peaks);
        let expected = if distance > 1 { expected } else { candidates };

        assert_eq!(
            detect(&frame, &config).unwrap(),
            expected,
            "frame {:?}, config {:?}",
            frame,
            config
        );
    }
}

#[test]
fn test_min_distance_on_dense_frame() {
    // Equal peaks at every odd position: the earliest survivor suppresses the
    // next one, so every fourth position remains.
    let frame: Vec<f64> = (0..20_001).map(|i| (i % 2) as f64).collect();
    let config = PeakDetectorConfig::default().with_min_peak_distance(2);

    let peaks = detect(&frame, &config).unwrap();
    let expected: Vec<usize> = (1..20_000).step_by(4).collect();
    assert_eq!(peaks, expected);
}

#[test]
fn test_equal_heights_resolved_by_position() {
    // Three equal peaks two apart: the earliest wins and suppresses its
    // neighbour, which leaves the third free.
    let frame = [0.0, 3.0, 0.0, 3.0, 0.0, 3.0, 0.0];
    let config = PeakDetectorConfig::default().with_min_peak_distance(2);
    assert_eq!(detect(&frame, &config).unwrap(), vec![1, 5]);

    let keep = config.with_keep_equal_height_peaks(true);
    assert_eq!(detect(&frame, &keep).unwrap(), vec![1, 3, 5]);
}

#[test]
fn test_spectrum_like_frame() {
    // Byte magnitudes with two formants and a noise floor
    let frame: Vec<f64> = [
        12, 14, 40, 90, 160, 200, 170, 95, 50, 30, 28, 60, 120, 150, 118, 64, 25, 15, 13, 12,
    ]
    .iter()
    .map(|&b| b as f64)
    .collect();

    let config = PeakDetectorConfig::default()
        .with_min_peak_height(100.0)
        .with_min_peak_distance(4);
    assert_eq!(detect(&frame, &config).unwrap(), vec![5, 13]);

    let valleys = PeakDetectorConfig::valleys().with_threshold(1.0);
    assert_eq!(detect(&frame, &valleys).unwrap(), vec![10]);
}
