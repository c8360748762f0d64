//! Sonance Vector Operations
//!
//! Stateless helpers over index sequences, sample sequences and boolean
//! masks. The peak detector is written in terms of these.
//!
//! Every operation that needs equal-length inputs reports a mismatch as
//! [`DetectionError::InvalidArgument`] rather than truncating.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::hash::Hash;

use sonance_ports::{DetectionError, DetectionResult};

/// Ascending positions where `predicate` holds
pub fn where_indices<T, F>(seq: &[T], predicate: F) -> Vec<usize>
where
    F: Fn(&T) -> bool,
{
    seq.iter()
        .enumerate()
        .filter_map(|(i, v)| predicate(v).then_some(i))
        .collect()
}

/// Apply `f` to each element
#[inline]
pub fn elementwise_map<T, U, F>(seq: &[T], f: F) -> Vec<U>
where
    F: Fn(&T) -> U,
{
    seq.iter().map(f).collect()
}

/// Combine two equal-length sequences pointwise
pub fn elementwise_combine<A, B, U, F>(a: &[A], b: &[B], f: F) -> DetectionResult<Vec<U>>
where
    F: Fn(&A, &B) -> U,
{
    ensure_same_len(a.len(), b.len())?;
    Ok(a.iter().zip(b).map(|(x, y)| f(x, y)).collect())
}

/// Elements of `seq` at `indices`, in the order the indices are given
pub fn gather<T: Copy>(seq: &[T], indices: &[usize]) -> DetectionResult<Vec<T>> {
    indices
        .iter()
        .map(|&i| {
            seq.get(i).copied().ok_or_else(|| {
                DetectionError::invalid(format!(
                    "index {} out of bounds for sequence of length {}",
                    i,
                    seq.len()
                ))
            })
        })
        .collect()
}

/// Ascending copy with duplicates removed
pub fn unique_sorted<T: Ord + Copy>(seq: &[T]) -> Vec<T> {
    let mut out = seq.to_vec();
    out.sort_unstable();
    out.dedup();
    out
}

/// Join sequences in argument order
pub fn concat<T: Copy>(seqs: &[&[T]]) -> Vec<T> {
    let total = seqs.iter().map(|s| s.len()).sum();
    let mut out = Vec::with_capacity(total);
    for seq in seqs {
        out.extend_from_slice(seq);
    }
    out
}

/// Elements of `seq` that are absent from `exclude`, order preserved
pub fn set_difference<T: Eq + Hash + Copy>(seq: &[T], exclude: &[T]) -> Vec<T> {
    let exclude: HashSet<T> = exclude.iter().copied().collect();
    seq.iter().copied().filter(|v| !exclude.contains(v)).collect()
}

/// Elements of `seq` that are present in `include`, order preserved
pub fn set_intersection<T: Eq + Hash + Copy>(seq: &[T], include: &[T]) -> Vec<T> {
    let include: HashSet<T> = include.iter().copied().collect();
    seq.iter().copied().filter(|v| include.contains(v)).collect()
}

/// Positions that sort `seq` by descending value
///
/// The sort is stable: equal values keep their original relative order, so
/// the earlier position comes first. Incomparable pairs (NaN) are treated
/// as equal.
pub fn stable_argsort_descending(seq: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..seq.len()).collect();
    order.sort_by(|&a, &b| seq[b].partial_cmp(&seq[a]).unwrap_or(Ordering::Equal));
    order
}

/// Elementwise minimum across equal-length rows
///
/// NaN propagates: a column containing NaN yields NaN.
pub fn columnwise_min(rows: &[Vec<f64>]) -> DetectionResult<Vec<f64>> {
    let Some((first, rest)) = rows.split_first() else {
        return Ok(Vec::new());
    };
    let mut out = first.clone();
    for row in rest {
        ensure_same_len(out.len(), row.len())?;
        for (acc, &v) in out.iter_mut().zip(row) {
            *acc = nan_min(*acc, v);
        }
    }
    Ok(out)
}

#[inline]
fn nan_min(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.min(b)
    }
}

#[inline]
fn ensure_same_len(a: usize, b: usize) -> DetectionResult<()> {
    if a != b {
        return Err(DetectionError::invalid(format!(
            "sequence lengths differ: {} vs {}",
            a, b
        )));
    }
    Ok(())
}
