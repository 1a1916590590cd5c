//! Brute-force exact Chamfer search.

use tracing::{debug, info};

use super::{check_construction, check_query, Retriever, RetrieverStats};
use crate::chamfer::chamfer_similarity;
use crate::error::{Result, RetrieveError};
use crate::index::DocumentIndex;
use crate::vector_set::VectorSet;

/// Scores every document with exact Chamfer similarity under the inner product.
///
/// Ground truth for the approximate engines. A document with no vectors scores
/// `-inf` against any non-empty query.
#[derive(Debug, Clone)]
pub struct ExactChamferRetriever {
    dimensions: usize,
    max_points: usize,
    index: Option<DocumentIndex<VectorSet>>,
}

impl ExactChamferRetriever {
    /// `dimensions` and `max_points` must both be positive.
    pub fn new(dimensions: usize, max_points: usize) -> Result<Self> {
        check_construction(dimensions, max_points)?;
        Ok(Self {
            dimensions,
            max_points,
            index: None,
        })
    }
}

impl Retriever for ExactChamferRetriever {
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
            "built exact Chamfer index"
        );
        self.index = Some(index);
        Ok(())
    }

    fn search(&self, query: &VectorSet, k: usize) -> Result<Vec<(u32, f32)>> {
        let index = self.index.as_ref().ok_or(RetrieveError::NotIndexed)?;
        check_query(query, self.dimensions)?;
        debug!(query_vectors = query.len(), k, candidates = index.len(), "exact search");
        Ok(index.top_k(k, |doc| chamfer_similarity(query, doc)))
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
            algorithm: "ExactChamfer".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_sizes() {
        assert!(ExactChamferRetriever::new(0, 10).is_err());
        assert!(ExactChamferRetriever::new(4, 0).is_err());
    }

    #[test]
    fn query_before_index_fails() {
        let r = ExactChamferRetriever::new(2, 4).unwrap();
        let q = VectorSet::from_rows(2, &[[1.0, 0.0]]).unwrap();
        assert_eq!(r.get_top_k(&q, 1), Err(RetrieveError::NotIndexed));
        assert!(!r.is_indexed());
        assert_eq!(r.num_documents(), 0);
    }

    #[test]
    fn returns_scores_best_first() {
        let mut r = ExactChamferRetriever::new(2, 4).unwrap();
        let docs = vec![
            VectorSet::from_rows(2, &[[1.0, 0.0]]).unwrap(),
            VectorSet::from_rows(2, &[[0.0, 1.0]]).unwrap(),
        ];
        r.index_dataset(&docs, &[1, 2]).unwrap();
        let q = VectorSet::from_rows(2, &[[1.0, 0.0]]).unwrap();
        assert_eq!(r.search(&q, 2).unwrap(), vec![(1, 1.0), (2, 0.0)]);

        let stats = r.stats();
        assert_eq!(stats.num_documents, 2);
        assert_eq!(stats.size_bytes, 4 * std::mem::size_of::<f32>());
    }

    #[test]
    fn query_dimension_is_checked() {
        let mut r = ExactChamferRetriever::new(2, 4).unwrap();
        r.index_dataset(&[VectorSet::from_rows(2, &[[1.0, 0.0]]).unwrap()], &[0])
            .unwrap();
        let q = VectorSet::from_rows(3, &[[1.0, 0.0, 0.0]]).unwrap();
        assert_eq!(
            r.get_top_k(&q, 1),
            Err(RetrieveError::InvalidDimension {
                expected: 2,
                actual: 3
            })
        );
    }
}
