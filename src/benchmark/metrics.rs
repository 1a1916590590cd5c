//! Retrieval quality metrics.
//!
//! Ground truth comes from the exact Chamfer engine; these measure how much of
//! it an approximate engine recovers.

use std::collections::HashSet;

/// Fraction of the top-`k` ground truth found in the top-`k` retrieved ids.
///
/// ```text
/// recall@k = |gt[..k] ∩ retrieved[..k]| / |gt[..k]|
/// ```
///
/// The denominator is the ground-truth length after truncation to `k`, so a
/// corpus smaller than `k` can still reach 1.0. Returns 0.0 when `k == 0` or
/// the ground truth is empty.
pub fn recall_at_k(ground_truth: &[u32], retrieved: &[u32], k: usize) -> f32 {
    if k == 0 || ground_truth.is_empty() {
        return 0.0;
    }

    let gt_set: HashSet<u32> = ground_truth.iter().take(k).copied().collect();
    let hits = retrieved
        .iter()
        .take(k)
        .collect::<HashSet<_>>()
        .into_iter()
        .filter(|id| gt_set.contains(*id))
        .count();
    hits as f32 / gt_set.len() as f32
}

/// Mean of [`recall_at_k`] over paired queries.
pub fn mean_recall(ground_truths: &[Vec<u32>], retrievals: &[Vec<u32>], k: usize) -> f32 {
    if ground_truths.is_empty() {
        return 0.0;
    }

    let total: f32 = ground_truths
        .iter()
        .zip(retrievals.iter())
        .map(|(gt, ret)| recall_at_k(gt, ret, k))
        .sum();

    total / ground_truths.len() as f32
}

/// Recall at several cutoffs.
pub fn recall_curve(
    ground_truth: &[u32],
    retrieved: &[u32],
    k_values: &[usize],
) -> Vec<(usize, f32)> {
    k_values
        .iter()
        .map(|&k| (k, recall_at_k(ground_truth, retrieved, k)))
        .collect()
}

/// Fraction of queries whose `target` appears in the first `k` retrieved ids.
pub fn hit_rate(targets: &[u32], retrievals: &[Vec<u32>], k: usize) -> f32 {
    if targets.is_empty() {
        return 0.0;
    }
    let hits = targets
        .iter()
        .zip(retrievals)
        .filter(|(target, ret)| ret.iter().take(k).any(|id| id == *target))
        .count();
    hits as f32 / targets.len() as f32
}
