//! Deterministic random source for the encoder.
//!
//! Every random matrix the encoder needs is a pure function of
//! `(seed, repetition, role)`. There is no shared generator that advances as
//! matrices are drawn, so the order in which repetitions are built (or whether
//! they are built on different threads) never changes the result.
//!
//! `ChaCha8Rng` is used instead of `StdRng` because its output stream is
//! specified and portable: the same seed gives the same matrices on every
//! platform and across `rand` releases. Each `(repetition, role)` pair gets its
//! own ChaCha stream under the same key.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;

/// What a random draw is used for. Distinct roles never share a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// `dimensions -> d_proj` projection matrix.
    Projection,
    /// SimHash hyperplane normals in the projected space.
    Hyperplanes,
    /// Count-sketch slots and signs for the final reduction.
    FinalProjection,
}

impl Role {
    const COUNT: u64 = 3;

    fn index(self) -> u64 {
        match self {
            Role::Projection => 0,
            Role::Hyperplanes => 1,
            Role::FinalProjection => 2,
        }
    }
}

/// Seed-derived generator factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomSource {
    seed: u64,
}

impl RandomSource {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// A fresh generator for `(repetition, role)`.
    ///
    /// Calling this twice with the same arguments yields identical streams.
    pub fn rng(&self, repetition: usize, role: Role) -> ChaCha8Rng {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        rng.set_stream((repetition as u64) * Role::COUNT + role.index());
        rng
    }

    /// `rows x cols` standard normal entries, row-major.
    pub fn gaussian_matrix(
        &self,
        repetition: usize,
        role: Role,
        rows: usize,
        cols: usize,
    ) -> Vec<f32> {
        let mut rng = self.rng(repetition, role);
        (0..rows * cols)
            .map(|_| rng.sample::<f32, _>(StandardNormal))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_inputs_same_stream() {
        let src = RandomSource::new(42);
        let a = src.gaussian_matrix(3, Role::Hyperplanes, 4, 8);
        let b = src.gaussian_matrix(3, Role::Hyperplanes, 4, 8);
        assert_eq!(a, b);
    }

    #[test]
    fn roles_and_repetitions_are_independent() {
        let src = RandomSource::new(42);
        let base = src.gaussian_matrix(0, Role::Projection, 4, 8);
        assert_ne!(base, src.gaussian_matrix(0, Role::Hyperplanes, 4, 8));
        assert_ne!(base, src.gaussian_matrix(1, Role::Projection, 4, 8));
        assert_ne!(
            base,
            RandomSource::new(43).gaussian_matrix(0, Role::Projection, 4, 8)
        );
    }

    #[test]
    fn draw_order_does_not_matter() {
        let src = RandomSource::new(7);
        let late = {
            let _ = src.gaussian_matrix(0, Role::Projection, 16, 16);
            src.gaussian_matrix(5, Role::Projection, 2, 2)
        };
        assert_eq!(late, src.gaussian_matrix(5, Role::Projection, 2, 2));
    }

    #[test]
    fn gaussian_entries_look_standard() {
        let src = RandomSource::new(1);
        let m = src.gaussian_matrix(0, Role::Projection, 100, 100);
        let mean = m.iter().sum::<f32>() / m.len() as f32;
        let var = m.iter().map(|x| (x - mean).powi(2)).sum::<f32>() / m.len() as f32;
        assert!(mean.abs() < 0.05, "mean {mean}");
        assert!((var - 1.0).abs() < 0.1, "variance {var}");
    }
}
