//! The Fixed Dimensional Encoder.

use smallvec::SmallVec;
use tracing::{debug, warn};

use super::params::{Aggregation, FdeParams, FinalReduction};
use super::projection::RandomProjection;
use super::simhash::{hamming_distance, SimHashPartitioner};
use super::sketch::CountSketch;
use crate::distance::add_assign;
use crate::error::{Result, RetrieveError};
use crate::rng::RandomSource;
use crate::vector_set::VectorSet;

/// Which side of the Chamfer product a set is encoded for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncodingRole {
    Document,
    Query,
}

/// Where a repetition's block lands in the output.
#[derive(Debug, Clone)]
enum Placement {
    /// The first `len` coordinates of the block are copied to `offset..offset + len`.
    Slice { offset: usize, len: usize },
    /// The whole block is count-sketched onto all of `d_final`.
    Sketch(CountSketch),
}

/// Random state of one repetition.
#[derive(Debug, Clone)]
struct Repetition {
    projection: RandomProjection,
    partitioner: SimHashPartitioner,
    placement: Placement,
}

/// Maps a [`VectorSet`] to a single vector of length `d_final`.
///
/// All random matrices are drawn at construction; [`encode`](Self::encode) is a
/// pure function of its input and the parameters, and the encoder is `Send + Sync`.
///
/// ```rust
/// use muvera::fde::{EncodingRole, FdeParams, FixedDimensionalEncoder};
/// use muvera::VectorSet;
///
/// let encoder = FixedDimensionalEncoder::new(FdeParams::new(4, 4, 256, 3, 4, 7)).unwrap();
/// let doc = VectorSet::from_rows(4, &[[1.0, 0.0, 0.0, 0.0], [0.0, 1.0, 0.0, 0.0]]).unwrap();
/// let enc = encoder.encode(&doc, EncodingRole::Document).unwrap();
/// assert_eq!(enc.len(), 256);
/// ```
#[derive(Debug, Clone)]
pub struct FixedDimensionalEncoder {
    params: FdeParams,
    /// One entry per repetition; every repetition reaches the output.
    repetitions: Vec<Repetition>,
    natural_dim: usize,
}

impl FixedDimensionalEncoder {
    /// Validate `params` and draw every repetition's matrices.
    pub fn new(params: FdeParams) -> Result<Self> {
        params.validate()?;
        let natural_dim = params
            .natural_dim()
            .ok_or_else(|| RetrieveError::InvalidParameter("natural dimension overflows".into()))?;
        let block_len = params.num_buckets() * params.d_proj;
        let reduced = natural_dim > params.d_final;

        // d_final >= r_reps, so every slice holds at least one value.
        let share = params.d_final / params.r_reps;
        let extra = params.d_final % params.r_reps;

        if reduced {
            match params.final_reduction {
                FinalReduction::Truncate => warn!(
                    natural_dim,
                    d_final = params.d_final,
                    kept_per_repetition = share,
                    block_len,
                    "encoding truncated; trailing buckets of every repetition are discarded"
                ),
                FinalReduction::CountSketch => debug!(
                    natural_dim,
                    d_final = params.d_final,
                    "encoding count-sketched to d_final"
                ),
            }
        }

        let source = RandomSource::new(params.seed);
        let repetitions = (0..params.r_reps)
            .map(|r| Repetition {
                projection: RandomProjection::new(&source, r, params.dimensions, params.d_proj),
                partitioner: SimHashPartitioner::new(&source, r, params.k_sim, params.d_proj),
                placement: match (reduced, params.final_reduction) {
                    (false, _) => Placement::Slice {
                        offset: r * block_len,
                        len: block_len,
                    },
                    (true, FinalReduction::Truncate) => Placement::Slice {
                        offset: r * share + r.min(extra),
                        len: share + usize::from(r < extra),
                    },
                    (true, FinalReduction::CountSketch) => {
                        Placement::Sketch(CountSketch::new(&source, r, params.d_final))
                    }
                },
            })
            .collect();

        debug!(
            dimensions = params.dimensions,
            d_proj = params.d_proj,
            k_sim = params.k_sim,
            r_reps = params.r_reps,
            d_final = params.d_final,
            natural_dim,
            "built FDE encoder"
        );

        Ok(Self {
            params,
            repetitions,
            natural_dim,
        })
    }

    pub fn params(&self) -> &FdeParams {
        &self.params
    }

    /// Length of the encoding before the final reduction.
    pub fn natural_dim(&self) -> usize {
        self.natural_dim
    }

    /// Length of every encoding (`d_final`).
    pub fn output_dim(&self) -> usize {
        self.params.d_final
    }

    /// Encode with the document-side policy.
    pub fn encode_document(&self, set: &VectorSet) -> Result<Vec<f32>> {
        self.encode(set, EncodingRole::Document)
    }

    /// Encode with the query-side policy.
    pub fn encode_query(&self, set: &VectorSet) -> Result<Vec<f32>> {
        self.encode(set, EncodingRole::Query)
    }

    /// Encode `set` for `role`.
    ///
    /// An empty set encodes to all zeros.
    pub fn encode(&self, set: &VectorSet, role: EncodingRole) -> Result<Vec<f32>> {
        let p = &self.params;
        if set.dimension() != p.dimensions {
            return Err(RetrieveError::InvalidDimension {
                expected: p.dimensions,
                actual: set.dimension(),
            });
        }

        let mut out = vec![0.0f32; p.d_final];
        if set.is_empty() {
            return Ok(out);
        }

        let aggregation = p.aggregation(role);
        let fill = p.fill_empty_buckets && role == EncodingRole::Document;
        let d_proj = p.d_proj;
        let mut projected = vec![0.0f32; set.len() * d_proj];
        let mut summary = vec![0.0f32; d_proj];

        for rep in &self.repetitions {
            let visible = self.visible_buckets(rep);

            for (row, dst) in set.rows().zip(projected.chunks_exact_mut(d_proj)) {
                rep.projection.apply(row, dst);
            }

            // (bucket, vector index), sorted so each bucket's members are contiguous
            // and summed in input order.
            let mut assignment: SmallVec<[(u32, u32); 32]> = projected
                .chunks_exact(d_proj)
                .enumerate()
                .map(|(i, v)| (rep.partitioner.bucket(v), i as u32))
                .collect();
            assignment.sort_unstable();

            for group in assignment.chunk_by(|a, b| a.0 == b.0) {
                let bucket = group[0].0 as usize;
                if bucket >= visible {
                    break;
                }
                summary.fill(0.0);
                for &(_, idx) in group {
                    add_assign(&mut summary, row_of(&projected, d_proj, idx as usize));
                }
                if aggregation == Aggregation::Mean && group.len() > 1 {
                    let inv = 1.0 / group.len() as f32;
                    for x in &mut summary {
                        *x *= inv;
                    }
                }
                self.emit(rep, bucket, &summary, &mut out);
            }

            if fill {
                self.fill_empty(rep, visible, &assignment, &projected, &mut out);
            }
        }

        Ok(out)
    }

    /// Buckets of `rep` that reach the output.
    fn visible_buckets(&self, rep: &Repetition) -> usize {
        let num_buckets = self.params.num_buckets();
        match rep.placement {
            Placement::Sketch(_) => num_buckets,
            Placement::Slice { len, .. } => len.div_ceil(self.params.d_proj).min(num_buckets),
        }
    }

    /// Write one bucket summary into the output.
    fn emit(&self, rep: &Repetition, bucket: usize, summary: &[f32], out: &mut [f32]) {
        let d_proj = self.params.d_proj;
        let start = bucket * d_proj;
        match &rep.placement {
            Placement::Sketch(sketch) => sketch.accumulate(start, summary, out),
            Placement::Slice { offset, len } => {
                if start >= *len {
                    return;
                }
                let end = (start + d_proj).min(*len);
                out[offset + start..offset + end].copy_from_slice(&summary[..end - start]);
            }
        }
    }

    /// Give every empty visible bucket the projected vector whose bucket id is
    /// nearest in Hamming distance (ties go to the earlier vector).
    fn fill_empty(
        &self,
        rep: &Repetition,
        visible: usize,
        assignment: &[(u32, u32)],
        projected: &[f32],
        out: &mut [f32],
    ) {
        let d_proj = self.params.d_proj;
        let mut occupied = assignment.iter().map(|&(b, _)| b as usize).peekable();
        for bucket in 0..visible {
            while occupied.next_if(|&b| b < bucket).is_some() {}
            if occupied.peek() == Some(&bucket) {
                continue;
            }
            let nearest = assignment
                .iter()
                .min_by_key(|&&(b, idx)| (hamming_distance(b, bucket as u32), idx))
                .map(|&(_, idx)| idx as usize);
            if let Some(idx) = nearest {
                self.emit(rep, bucket, row_of(projected, d_proj, idx), out);
            }
        }
    }
}

#[inline]
fn row_of(flat: &[f32], width: usize, i: usize) -> &[f32] {
    &flat[i * width..(i + 1) * width]
}
