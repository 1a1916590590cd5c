//! Dense vector primitives.
//!
//! Everything in this crate scores with the plain inner product. Cosine is only
//! used by the relaxed Chamfer engine, which hard-wires it.
//!
//! ## Important nuance
//!
//! [`dot`] does **not** normalize. If your embeddings are L2-normalized (as most
//! ColBERT-style token embeddings are) the inner product equals cosine similarity and
//! Chamfer scores are sums of cosines. Otherwise vector norms leak into the score.

const NORM_EPSILON: f32 = 1e-9;

/// Dot product of two vectors.
///
/// Written as a zipped sum so the compiler can auto-vectorize it.
#[inline]
#[must_use]
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// L2 norm of a vector.
#[inline]
#[must_use]
pub fn norm(v: &[f32]) -> f32 {
    dot(v, v).sqrt()
}

/// Cosine similarity. Returns 0.0 if either vector is (near) zero.
#[inline]
#[must_use]
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let d = dot(a, b);
    let na = norm(a);
    let nb = norm(b);
    if na > NORM_EPSILON && nb > NORM_EPSILON {
        d / (na * nb)
    } else {
        0.0
    }
}

/// Normalize a vector to unit L2 norm. Zero vectors stay zero.
#[inline]
#[must_use]
pub fn normalize(v: &[f32]) -> Vec<f32> {
    let n = norm(v);
    if n < 1e-10 {
        return vec![0.0; v.len()];
    }
    v.iter().map(|x| x / n).collect()
}

/// `acc += v`, element-wise.
#[inline]
pub(crate) fn add_assign(acc: &mut [f32], v: &[f32]) {
    debug_assert_eq!(acc.len(), v.len());
    for (a, x) in acc.iter_mut().zip(v.iter()) {
        *a += x;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_basic() {
        let a = [1.0_f32, 2.0, 3.0];
        let b = [4.0_f32, -5.0, 6.0];
        assert!((dot(&a, &b) - 12.0).abs() < 1e-6);
    }

    #[test]
    fn test_norm() {
        let v = [3.0_f32, 4.0];
        assert!((norm(&v) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_orthogonal() {
        let a = [1.0_f32, 0.0];
        let b = [0.0_f32, 1.0];
        assert!(cosine(&a, &b).abs() < 1e-6);
    }

    #[test]
    fn cosine_of_zero_vector_is_zero() {
        assert_eq!(cosine(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn normalize_matches_cosine() {
        let a = normalize(&[3.0_f32, 4.0]);
        let b = normalize(&[6.0_f32, 8.0]);
        assert!((dot(&a, &b) - cosine(&a, &b)).abs() < 1e-6);
        assert!((norm(&a) - 1.0).abs() < 1e-6);
    }
}
