//! Brute-force Chamfer search with cosine and a smooth maximum.

use tracing::{debug, info};

use super::{check_construction, check_query, Retriever, RetrieverStats};
use crate::chamfer::relaxed_chamfer_similarity;
use crate::error::{Result, RetrieveError};
use crate::index::DocumentIndex;
use crate::vector_set::VectorSet;

/// Exact-cost retriever whose per-query-vector max is replaced by
/// `(1/s) · ln Σ exp(s · cos(q, d))`.
///
/// Small `softmax_s` lets every document vector contribute; large values
/// converge to Chamfer similarity under cosine.
#[derive(Debug, Clone)]
pub struct RelaxedChamferRetriever {
    dimensions: usize,
    max_points: usize,
    softmax_s: f32,
    index: Option<DocumentIndex<VectorSet>>,
}

impl RelaxedChamferRetriever {
    /// `softmax_s` must be finite and positive.
    pub fn new(dimensions: usize, max_points: usize, softmax_s: f32) -> Result<Self> {
        check_construction(dimensions, max_points)?;
        if !(softmax_s.is_finite() && softmax_s > 0.0) {
            return Err(RetrieveError::InvalidParameter(format!(
                "softmax_s must be finite and positive, got {softmax_s}"
            )));
        }
        Ok(Self {
            dimensions,
            max_points,
            softmax_s,
            index: None,
        })
    }

    pub fn softmax_s(&self) -> f32 {
        self.softmax_s
    }
}

impl Retriever for RelaxedChamferRetriever {
    fn index_dataset(&mut self, documents: &[VectorSet], ids: &[u32]) -> Result<()> {
        let index = DocumentIndex::build(
            documents,
            ids,
            self.dimensions,
            self.max_points,
            |doc| Ok(doc.clone()),
        )?;
        info!(
            documents = index.len(),
            dimension = self.dimensions,
            softmax_s = self.softmax_s,
            "built relaxed Chamfer index"
        );
        self.index = Some(index);
        Ok(())
    }

    fn search(&self, query: &VectorSet, k: usize) -> Result<Vec<(u32, f32)>> {
        let index = self.index.as_ref().ok_or(RetrieveError::NotIndexed)?;
        check_query(query, self.dimensions)?;
        debug!(query_vectors = query.len(), k, candidates = index.len(), "relaxed search");
        let s = self.softmax_s;
        Ok(index.top_k(k, |doc| relaxed_chamfer_similarity(query, doc, s)))
    }

    fn dimension(&self) -> usize {
        self.dimensions
    }

    fn capacity(&self) -> usize {
        self.max_points
    }

    fn num_documents(&self) -> usize {
        self.index.as_ref().map_or(0, DocumentIndex::len)
    }

    fn is_indexed(&self) -> bool {
        self.index.is_some()
    }

    fn stats(&self) -> RetrieverStats {
        let size_bytes = self.index.as_ref().map_or(0, |index| {
            index.entries().iter().map(VectorSet::size_bytes).sum()
        });
        RetrieverStats {
            num_documents: self.num_documents(),
            dimension: self.dimensions,
            capacity: self.max_points,
            size_bytes,
            algorithm: "RelaxedChamfer".to_string(),
        }
    }
}
