//! MUVERA retrieval: Chamfer search as single-vector inner-product search.

use tracing::{debug, info};

use super::{check_construction, check_query, Retriever, RetrieverStats};
use crate::distance::dot;
use crate::error::{Result, RetrieveError};
use crate::fde::{FdeParams, FixedDimensionalEncoder};
use crate::index::DocumentIndex;
use crate::vector_set::VectorSet;

/// Encodes every document once at index time and every query once per search,
/// then ranks documents by `<FDE(query), FDE(document)>`.
///
/// Two retrievers with the same parameters (seed included) and the same
/// dataset produce identical encodings and identical results.
///
/// ```rust
/// use muvera::{MuveraRetriever, Retriever, VectorSet};
///
/// let mut retriever = MuveraRetriever::new(2, 10, 8, 512, 3, 4, 42).unwrap();
/// let docs = vec![
///     VectorSet::from_rows(2, &[[1.0, 0.0]]).unwrap(),
///     VectorSet::from_rows(2, &[[0.0, 1.0]]).unwrap(),
/// ];
/// retriever.index_dataset(&docs, &[1, 2]).unwrap();
/// assert_eq!(retriever.num_documents(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MuveraRetriever {
    encoder: FixedDimensionalEncoder,
    max_points: usize,
    index: Option<DocumentIndex<Vec<f32>>>,
}

impl MuveraRetriever {
    /// Retriever with the default aggregation, no bucket filling and
    /// count-sketch reduction when the natural width exceeds `d_final`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        dimensions: usize,
        max_points: usize,
        d_proj: usize,
        d_final: usize,
        k_sim: usize,
        r_reps: usize,
        seed: u64,
    ) -> Result<Self> {
        Self::with_params(
            max_points,
            FdeParams::new(dimensions, d_proj, d_final, k_sim, r_reps, seed),
        )
    }

    /// Retriever with fully specified encoder parameters.
    pub fn with_params(max_points: usize, params: FdeParams) -> Result<Self> {
        check_construction(params.dimensions, max_points)?;
        Ok(Self {
            encoder: FixedDimensionalEncoder::new(params)?,
            max_points,
            index: None,
        })
    }

    pub fn encoder(&self) -> &FixedDimensionalEncoder {
        &self.encoder
    }

    pub fn params(&self) -> &FdeParams {
        self.encoder.params()
    }

    /// The stored encoding of `doc_id`, if indexed.
    pub fn document_encoding(&self, doc_id: u32) -> Option<&[f32]> {
        self.index.as_ref()?.get(doc_id).map(Vec::as_slice)
    }
}

impl Retriever for MuveraRetriever {
    fn index_dataset(&mut self, documents: &[VectorSet], ids: &[u32]) -> Result<()> {
        let encoder = &self.encoder;
        let index = DocumentIndex::build(
            documents,
            ids,
            encoder.params().dimensions,
            self.max_points,
            |doc| encoder.encode_document(doc),
        )?;
        info!(
            documents = index.len(),
            dimension = encoder.params().dimensions,
            d_final = encoder.output_dim(),
            natural_dim = encoder.natural_dim(),
            "built MUVERA index"
        );
        self.index = Some(index);
        Ok(())
    }

    fn search(&self, query: &VectorSet, k: usize) -> Result<Vec<(u32, f32)>> {
        let index = self.index.as_ref().ok_or(RetrieveError::NotIndexed)?;
        check_query(query, self.dimension())?;
        let encoded = self.encoder.encode_query(query)?;
        debug!(query_vectors = query.len(), k, candidates = index.len(), "MUVERA search");
        Ok(index.top_k(k, |doc| dot(&encoded, doc)))
    }

    fn dimension(&self) -> usize {
        self.encoder.params().dimensions
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
        RetrieverStats {
            num_documents: self.num_documents(),
            dimension: self.dimension(),
            capacity: self.max_points,
            size_bytes: self.num_documents()
                * self.encoder.output_dim()
                * std::mem::size_of::<f32>(),
            algorithm: "MUVERA".to_string(),
        }
    }
}
