//! Random linear projection `R^dimensions -> R^d_proj`.
//!
//! Entries are i.i.d. `N(0, 1) / sqrt(d_proj)`, so `E[<Sx, Sy>] = <x, y>`
//! (Johnson-Lindenstrauss). Projection is linear, which is what lets the encoder
//! project first and aggregate afterwards without changing bucket sums.

use crate::distance::dot;
use crate::rng::{RandomSource, Role};

#[derive(Debug, Clone)]
pub struct RandomProjection {
    /// `d_out x d_in`, row-major.
    matrix: Vec<f32>,
    d_in: usize,
    d_out: usize,
}

impl RandomProjection {
    pub fn new(source: &RandomSource, repetition: usize, d_in: usize, d_out: usize) -> Self {
        let scale = 1.0 / (d_out as f32).sqrt();
        let mut matrix = source.gaussian_matrix(repetition, Role::Projection, d_out, d_in);
        for x in &mut matrix {
            *x *= scale;
        }
        Self {
            matrix,
            d_in,
            d_out,
        }
    }

    /// Write `S v` into `out`.
    #[inline]
    pub fn apply(&self, v: &[f32], out: &mut [f32]) {
        debug_assert_eq!(v.len(), self.d_in);
        debug_assert_eq!(out.len(), self.d_out);
        for (o, row) in out.iter_mut().zip(self.matrix.chunks_exact(self.d_in)) {
            *o = dot(row, v);
        }
    }

    /// `S v` as a new vector.
    pub fn project(&self, v: &[f32]) -> Vec<f32> {
        let mut out = vec![0.0; self.d_out];
        self.apply(v, &mut out);
        out
    }

    pub fn output_dim(&self) -> usize {
        self.d_out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_is_linear() {
        let src = RandomSource::new(5);
        let s = RandomProjection::new(&src, 0, 12, 6);
        let a: Vec<f32> = (0..12).map(|i| i as f32 * 0.1).collect();
        let b: Vec<f32> = (0..12).map(|i| (i as f32).sin()).collect();
        let sum: Vec<f32> = a.iter().zip(&b).map(|(x, y)| x + y).collect();

        let lhs = s.project(&sum);
        let rhs: Vec<f32> = s
            .project(&a)
            .iter()
            .zip(s.project(&b))
            .map(|(x, y)| x + y)
            .collect();
        for (l, r) in lhs.iter().zip(&rhs) {
            assert!((l - r).abs() < 1e-4);
        }
    }

    #[test]
    fn preserves_squared_norm_on_average() {
        let src = RandomSource::new(17);
        let v: Vec<f32> = (0..64).map(|i| ((i * 13) as f32 * 0.7).cos()).collect();
        let norm_sq = dot(&v, &v);
        let trials = 200;
        let mean: f32 = (0..trials)
            .map(|r| {
                let p = RandomProjection::new(&src, r, 64, 32).project(&v);
                dot(&p, &p)
            })
            .sum::<f32>()
            / trials as f32;
        assert!(
            (mean / norm_sq - 1.0).abs() < 0.1,
            "ratio {}",
            mean / norm_sq
        );
    }
}
