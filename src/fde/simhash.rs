//! SimHash space partitioning.
//!
//! `k_sim` random Gaussian hyperplanes split the (projected) space into `2^k_sim`
//! cells. A vector's bucket is its sign pattern against the hyperplanes, packed
//! little-endian: bit `i` is set iff `<h_i, v> >= 0`.
//!
//! ```text
//! P[sign(h·a) = sign(h·b)] = 1 - θ(a,b)/π
//! ```
//!
//! so vectors at a small angle usually share a bucket, and the Hamming distance
//! between two bucket ids estimates the angle between the cells.
//!
//! The tie at exactly zero goes to 1. NaN products compare false and give 0.

use crate::distance::dot;
use crate::rng::{RandomSource, Role};

/// Random-hyperplane partitioner for one repetition.
#[derive(Debug, Clone)]
pub struct SimHashPartitioner {
    /// `k_sim x dimension`, row-major.
    normals: Vec<f32>,
    k_sim: usize,
    dimension: usize,
}

impl SimHashPartitioner {
    /// Draw `k_sim` hyperplanes in `dimension`-space for `repetition`.
    pub fn new(source: &RandomSource, repetition: usize, k_sim: usize, dimension: usize) -> Self {
        debug_assert!(k_sim <= 32);
        Self {
            normals: source.gaussian_matrix(repetition, Role::Hyperplanes, k_sim, dimension),
            k_sim,
            dimension,
        }
    }

    /// Bucket id in `[0, 2^k_sim)`.
    #[inline]
    pub fn bucket(&self, v: &[f32]) -> u32 {
        debug_assert_eq!(v.len(), self.dimension);
        self.normals
            .chunks_exact(self.dimension)
            .enumerate()
            .fold(0u32, |acc, (i, h)| {
                if dot(h, v) >= 0.0 {
                    acc | (1u32 << i)
                } else {
                    acc
                }
            })
    }

    /// Number of buckets, `2^k_sim`.
    pub fn num_buckets(&self) -> usize {
        1usize << self.k_sim
    }

    pub fn k_sim(&self) -> usize {
        self.k_sim
    }
}

/// Number of hyperplanes on which two buckets disagree.
#[inline]
pub fn hamming_distance(a: u32, b: u32) -> u32 {
    (a ^ b).count_ones()
}
