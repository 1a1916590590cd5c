//! muvera: multi-vector retrieval under Chamfer similarity.
//!
//! Documents and queries are *sets* of embedding vectors (ColBERT-style token
//! embeddings, image patches, ...). A document's relevance to a query is
//!
//! ```text
//! Chamfer(Q, D) = Σ_{q ∈ Q} max_{d ∈ D} <q, d>
//! ```
//!
//! Two ways to search:
//!
//! - [`ExactChamferRetriever`]: brute force. Every query vector against every
//!   document vector. Ground truth.
//! - [`MuveraRetriever`]: each set is mapped to one Fixed Dimensional Encoding
//!   ([`fde`]) whose inner product approximates Chamfer. Search becomes
//!   single-vector maximum inner product search over `d_final`-length vectors.
//!
//! [`RelaxedChamferRetriever`] swaps the hard max for a smooth one under cosine.
//!
//! All engines implement [`Retriever`] and break score ties by ascending
//! `doc_id`, so their outputs are directly comparable.
//!
//! # Critical Nuances
//!
//! ## Similarity is the raw inner product
//!
//! Nothing is normalized. If embeddings are unit length, scores are sums of
//! cosines; otherwise long vectors dominate. Normalize upstream
//! ([`distance::normalize`]) if that is not what you want.
//!
//! ## Empty sets
//!
//! An empty query scores 0 against everything. An empty document scores `-inf`
//! against any non-empty query under exact search and ranks last.
//!
//! ## Encodings wider than `d_final`
//!
//! `r_reps * 2^k_sim * d_proj` easily exceeds `d_final`. By default the
//! encoder count-sketches every repetition into the output rather than cutting
//! the tail, so each repetition still contributes
//! ([`fde::FinalReduction`]).
//!
//! ## Determinism
//!
//! Every random matrix in an encoder is derived from `(seed, repetition, role)`
//! with a portable ChaCha generator. Equal parameters and data give equal
//! encodings and equal results, regardless of thread count.
//!
//! # Features
//!
//! - `parallel` (default): encode and score documents on the rayon pool.

pub mod benchmark;
pub mod chamfer;
pub mod distance;
pub mod error;
pub mod fde;
pub mod retriever;
pub mod rng;
pub mod topk;
pub mod vector_set;

mod index;

pub use error::{Result, RetrieveError};
pub use fde::{EncodingRole, FdeParams, FixedDimensionalEncoder};
pub use retriever::{
    ExactChamferRetriever, MuveraRetriever, RelaxedChamferRetriever, Retriever, RetrieverStats,
};
pub use vector_set::VectorSet;
