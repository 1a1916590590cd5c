//! Chamfer similarity between vector sets.
//!
//! ```text
//! Chamfer(Q, D) = Σ_{q ∈ Q} max_{d ∈ D} <q, d>
//! ```
//!
//! Asymmetric: every query vector is matched to its best document vector, and
//! document vectors that match nothing are ignored. This is ColBERT's "MaxSim"
//! late interaction.
//!
//! Edge cases:
//! - empty `Q` scores `0.0` (a sum over nothing);
//! - empty `D` with a non-empty `Q` scores `f32::NEG_INFINITY`, so such a
//!   document ranks after every document that has vectors.

use crate::distance::{cosine, dot};
use crate::vector_set::VectorSet;

/// Exact Chamfer similarity under the inner product.
///
/// Both sets must share a dimension; callers validate this.
#[must_use]
pub fn chamfer_similarity(query: &VectorSet, document: &VectorSet) -> f32 {
    debug_assert_eq!(query.dimension(), document.dimension());
    if query.is_empty() {
        return 0.0;
    }
    if document.is_empty() {
        return f32::NEG_INFINITY;
    }
    query
        .rows()
        .map(|q| {
            document
                .rows()
                .map(|d| dot(q, d))
                .fold(f32::NEG_INFINITY, f32::max)
        })
        .sum()
}

/// Chamfer similarity with cosine and a smooth maximum.
///
/// Each query vector contributes `(1/s) · ln Σ_d exp(s · cos(q, d))` instead of
/// `max_d cos(q, d)`. The smooth max is an upper bound on the max that
/// overshoots by at most `ln(|D|) / s`, so it converges to cosine Chamfer as
/// `s` grows. Computed with the max subtracted first, which keeps `exp` in
/// `(0, 1]` for any `s`.
///
/// `softmax_s` must be finite and positive; callers validate this.
#[must_use]
pub fn relaxed_chamfer_similarity(query: &VectorSet, document: &VectorSet, softmax_s: f32) -> f32 {
    debug_assert_eq!(query.dimension(), document.dimension());
    debug_assert!(softmax_s.is_finite() && softmax_s > 0.0);
    if query.is_empty() {
        return 0.0;
    }
    if document.is_empty() {
        return f32::NEG_INFINITY;
    }

    let mut sims = Vec::with_capacity(document.len());
    query
        .rows()
        .map(|q| {
            sims.clear();
            sims.extend(document.rows().map(|d| cosine(q, d)));
            smooth_max(&sims, softmax_s)
        })
        .sum()
}

/// `(1/s) · ln Σ exp(s · x)`, max-shifted. `xs` is non-empty.
fn smooth_max(xs: &[f32], s: f32) -> f32 {
    let m = xs.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let sum: f32 = xs.iter().map(|&x| (s * (x - m)).exp()).sum();
    m + sum.ln() / s
}
