//! MUVERA Fixed Dimensional Encodings.
//!
//! Turns a set of vectors into one vector whose inner product with another
//! encoding approximates the Chamfer similarity of the two sets. Multi-vector
//! retrieval then becomes ordinary single-vector inner-product search.
//!
//! ## How an encoding is built
//!
//! For each of `r_reps` independent repetitions:
//!
//! 1. Project every vector `R^dimensions -> R^d_proj` with a Gaussian matrix
//!    scaled by `1/sqrt(d_proj)`.
//! 2. Partition the projected space with `k_sim` SimHash hyperplanes into
//!    `2^k_sim` buckets.
//! 3. Summarize each bucket: documents take the **mean** of the bucket's
//!    projected vectors, queries take the **sum**. Empty buckets are zeros.
//!
//! ```text
//! rep 0                          rep 1              rep r_reps-1
//! [b0: d_proj][b1: d_proj]...    [b0][b1]...   ...  [b0][b1]...
//! └────── 2^k_sim * d_proj ─────┘
//! ```
//!
//! When the blocks fit in `d_final` they are concatenated and zero-padded.
//! Otherwise [`FinalReduction`] decides how `d_final` is shared: the default
//! count sketch folds every block into the whole output, while truncation
//! gives each repetition its own contiguous slice and keeps a prefix of its
//! block there. Either way every repetition reaches the output.
//!
//! ## Why mean vs. sum?
//!
//! For a query vector `q` and a bucket holding document vectors `D_b`,
//! `<q, mean(D_b)>` stands in for `max_{d in D_b} <q, d>` when the bucket is
//! tight. Summing the query side then adds up one such term per query vector
//! in the bucket, which is exactly the shape of `Σ_q max_d <q, d>`.
//!
//! ## Reference
//!
//! Dhulipala et al., "MUVERA: Multi-Vector Retrieval via Fixed Dimensional
//! Encodings" (NeurIPS 2024).

mod encoder;
mod params;
mod projection;
mod simhash;
mod sketch;

pub use encoder::{EncodingRole, FixedDimensionalEncoder};
pub use params::{Aggregation, FdeParams, FinalReduction, MAX_K_SIM};
pub use projection::RandomProjection;
pub use simhash::{hamming_distance, SimHashPartitioner};
pub use sketch::CountSketch;
