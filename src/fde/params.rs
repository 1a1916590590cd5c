//! FDE parameters.

use serde::{Deserialize, Serialize};

use super::EncodingRole;
use crate::error::{Result, RetrieveError};

/// Largest supported `k_sim`. Bucket ids are packed into a `u32`.
pub const MAX_K_SIM: usize = 30;

/// How the vectors that fall into one bucket are summarized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Sum of the bucket's vectors.
    Sum,
    /// Centroid of the bucket's vectors.
    Mean,
}

/// How an encoding wider than `d_final` is brought down to `d_final` values.
///
/// When the natural width fits, every reduction is plain concatenation plus
/// zero padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalReduction {
    /// Split `d_final` into `r_reps` contiguous slices (the first
    /// `d_final % r_reps` one value longer) and keep the prefix of each
    /// repetition's block that fits its slice. Exact on what survives, but
    /// high-index buckets are dropped.
    Truncate,
    /// Hash every coordinate to a seeded random slot with a seeded random sign
    /// and add it there. Inner products are preserved in expectation and every
    /// bucket of every repetition contributes. Slots are derived on the fly,
    /// so memory does not grow with the natural width.
    #[default]
    CountSketch,
}

/// Parameters of a Fixed Dimensional Encoder.
///
/// The natural (pre-reduction) encoding width is `r_reps * 2^k_sim * d_proj`.
///
/// ```rust
/// use muvera::fde::{FdeParams, FinalReduction};
///
/// let params = FdeParams::new(128, 16, 10_240, 5, 20, 42)
///     .with_final_reduction(FinalReduction::Truncate);
/// assert!(params.validate().is_ok());
/// assert_eq!(params.natural_dim(), Some(20 * 32 * 16));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FdeParams {
    /// Length of every input vector.
    pub dimensions: usize,
    /// Width of the random projection, and of every bucket summary.
    pub d_proj: usize,
    /// Output length of the encoding.
    pub d_final: usize,
    /// Number of SimHash hyperplanes per repetition (`2^k_sim` buckets).
    pub k_sim: usize,
    /// Number of independent repetitions.
    pub r_reps: usize,
    /// Seed for every random matrix.
    pub seed: u64,
    /// Bucket summary on the document side.
    pub document_aggregation: Aggregation,
    /// Bucket summary on the query side.
    pub query_aggregation: Aggregation,
    /// Fill empty document buckets from the nearest (Hamming) non-empty one.
    pub fill_empty_buckets: bool,
    pub final_reduction: FinalReduction,
}

impl Default for FdeParams {
    fn default() -> Self {
        Self {
            dimensions: 128,
            d_proj: 16,
            d_final: 20 * 32 * 16,
            k_sim: 5,
            r_reps: 20,
            seed: 42,
            document_aggregation: Aggregation::Mean,
            query_aggregation: Aggregation::Sum,
            fill_empty_buckets: false,
            final_reduction: FinalReduction::CountSketch,
        }
    }
}

impl FdeParams {
    /// Parameters with the given shape and default policies.
    pub fn new(
        dimensions: usize,
        d_proj: usize,
        d_final: usize,
        k_sim: usize,
        r_reps: usize,
        seed: u64,
    ) -> Self {
        Self {
            dimensions,
            d_proj,
            d_final,
            k_sim,
            r_reps,
            seed,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_aggregation(mut self, document: Aggregation, query: Aggregation) -> Self {
        self.document_aggregation = document;
        self.query_aggregation = query;
        self
    }

    #[must_use]
    pub fn with_fill_empty_buckets(mut self, fill: bool) -> Self {
        self.fill_empty_buckets = fill;
        self
    }

    #[must_use]
    pub fn with_final_reduction(mut self, reduction: FinalReduction) -> Self {
        self.final_reduction = reduction;
        self
    }

    /// Aggregation policy used for `role`.
    pub fn aggregation(&self, role: EncodingRole) -> Aggregation {
        match role {
            EncodingRole::Document => self.document_aggregation,
            EncodingRole::Query => self.query_aggregation,
        }
    }

    /// `2^k_sim`. Only meaningful once [`validate`](Self::validate) passed.
    pub fn num_buckets(&self) -> usize {
        1usize << self.k_sim
    }

    /// `r_reps * 2^k_sim * d_proj`, or `None` on overflow.
    pub fn natural_dim(&self) -> Option<usize> {
        if self.k_sim > MAX_K_SIM {
            return None;
        }
        self.num_buckets()
            .checked_mul(self.d_proj)?
            .checked_mul(self.r_reps)
    }

    /// Check every invariant.
    pub fn validate(&self) -> Result<()> {
        if self.dimensions == 0 {
            return Err(invalid("dimensions must be positive"));
        }
        if self.d_proj == 0 {
            return Err(invalid("d_proj must be positive"));
        }
        if self.r_reps == 0 {
            return Err(invalid("r_reps must be positive"));
        }
        if self.k_sim == 0 || self.k_sim > MAX_K_SIM {
            return Err(RetrieveError::InvalidParameter(format!(
                "k_sim must be in 1..={MAX_K_SIM}, got {}",
                self.k_sim
            )));
        }
        if self.d_final < self.r_reps {
            return Err(RetrieveError::InvalidParameter(format!(
                "d_final ({}) must be at least r_reps ({})",
                self.d_final, self.r_reps
            )));
        }
        if self.natural_dim().is_none() {
            return Err(invalid("r_reps * 2^k_sim * d_proj overflows usize"));
        }
        if self.final_reduction == FinalReduction::CountSketch
            && u32::try_from(self.d_final).is_err()
        {
            return Err(invalid("count sketch requires d_final to fit in u32"));
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> RetrieveError {
    RetrieveError::InvalidParameter(msg.to_string())
}
