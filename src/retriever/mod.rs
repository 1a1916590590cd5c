//! Retrieval engines behind one interface.
//!
//! | Engine | Stores | Score | Cost per query |
//! |--------|--------|-------|----------------|
//! | [`ExactChamferRetriever`] | raw vector sets | exact Chamfer (inner product) | O(N · \|Q\| · \|D\| · dim) |
//! | [`MuveraRetriever`] | one FDE per document | `<FDE(Q), FDE(D)>` | O(encode(Q) + N · d_final) |
//! | [`RelaxedChamferRetriever`] | raw vector sets | smooth-max Chamfer (cosine) | as exact |
//!
//! All engines share the validation rules of `index_dataset`, the write-once
//! index and the top-k tie-break (score descending, then `doc_id` ascending),
//! so their results can be compared one to one. The exact engine is the
//! ground truth for measuring MUVERA's recall.
//!
//! # Lifecycle
//!
//! `index_dataset` fully replaces any previous index. The new index is built
//! aside and installed only if every document validates and encodes, so a
//! failed call leaves the retriever exactly as it was. Queries before the first
//! successful `index_dataset` fail with [`RetrieveError::NotIndexed`].
//!
//! # Example
//!
//! ```rust
//! use muvera::{ExactChamferRetriever, Retriever, VectorSet};
//!
//! let mut retriever = ExactChamferRetriever::new(2, 10).unwrap();
//! let docs = vec![
//!     VectorSet::from_rows(2, &[[1.0, 0.0]]).unwrap(),
//!     VectorSet::from_rows(2, &[[0.0, 1.0]]).unwrap(),
//! ];
//! retriever.index_dataset(&docs, &[1, 2]).unwrap();
//!
//! let query = VectorSet::from_rows(2, &[[1.0, 0.0]]).unwrap();
//! assert_eq!(retriever.get_top_k(&query, 1).unwrap(), vec![1]);
//! ```

mod exact;
mod muvera;
mod relaxed;

pub use exact::ExactChamferRetriever;
pub use muvera::MuveraRetriever;
pub use relaxed::RelaxedChamferRetriever;

use crate::error::{Result, RetrieveError};
use crate::vector_set::VectorSet;

/// Shared interface of every retrieval engine.
pub trait Retriever {
    /// Build the index from `documents`, with `ids[i]` naming `documents[i]`.
    ///
    /// Replaces any previous index. On error the previous index is kept.
    fn index_dataset(&mut self, documents: &[VectorSet], ids: &[u32]) -> Result<()>;

    /// The best `min(k, N)` documents with their scores, best first.
    fn search(&self, query: &VectorSet, k: usize) -> Result<Vec<(u32, f32)>>;

    /// The best `min(k, N)` document ids, best first.
    fn get_top_k(&self, query: &VectorSet, k: usize) -> Result<Vec<u32>> {
        Ok(self
            .search(query, k)?
            .into_iter()
            .map(|(id, _)| id)
            .collect())
    }

    /// Length of every vector.
    fn dimension(&self) -> usize;

    /// Largest number of documents one `index_dataset` call accepts.
    fn capacity(&self) -> usize;

    /// Number of indexed documents (0 before indexing).
    fn num_documents(&self) -> usize;

    /// True once `index_dataset` has succeeded.
    fn is_indexed(&self) -> bool;

    fn stats(&self) -> RetrieverStats;
}

/// Statistics about a retriever.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrieverStats {
    pub num_documents: usize,
    pub dimension: usize,
    pub capacity: usize,
    /// Approximate heap bytes held by the index.
    pub size_bytes: usize,
    pub algorithm: String,
}

pub(crate) fn check_construction(dimensions: usize, max_points: usize) -> Result<()> {
    if dimensions == 0 {
        return Err(RetrieveError::InvalidParameter(
            "dimensions must be positive".to_string(),
        ));
    }
    if max_points == 0 {
        return Err(RetrieveError::InvalidParameter(
            "max_points must be positive".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn check_query(query: &VectorSet, dimensions: usize) -> Result<()> {
    if query.dimension() != dimensions {
        return Err(RetrieveError::InvalidDimension {
            expected: dimensions,
            actual: query.dimension(),
        });
    }
    Ok(())
}
