//! Synthetic multi-vector datasets for recall measurements.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::chamfer::chamfer_similarity;
use crate::error::Result;
use crate::topk::TopK;
use crate::vector_set::VectorSet;

/// Range of every generated coordinate.
pub const VALUE_RANGE: (f32, f32) = (-3.0, 3.0);

/// Documents with ids, ready for `index_dataset`.
#[derive(Debug, Clone)]
pub struct MultiVectorDataset {
    pub documents: Vec<VectorSet>,
    /// `ids[i]` names `documents[i]`; ids are `1..=num_documents`.
    pub ids: Vec<u32>,
    pub dimension: usize,
}

impl MultiVectorDataset {
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Total number of vectors across documents.
    pub fn num_vectors(&self) -> usize {
        self.documents.iter().map(VectorSet::len).sum()
    }

    /// Queries made by jittering the vectors of randomly chosen documents.
    ///
    /// Each query is paired with the id of the document it came from. With a
    /// small `noise`, that document is almost always the exact top-1.
    pub fn perturbed_queries(
        &self,
        num_queries: usize,
        noise: f32,
        seed: u64,
    ) -> Result<Vec<(u32, VectorSet)>> {
        if self.documents.is_empty() {
            return Ok(Vec::new());
        }
        let mut rng = StdRng::seed_from_u64(seed);
        (0..num_queries)
            .map(|_| {
                let pick = rng.random_range(0..self.documents.len());
                let source = &self.documents[pick];
                let data = source
                    .as_flat()
                    .iter()
                    .map(|&x| x + rng.random_range(-noise..=noise))
                    .collect();
                let query = VectorSet::from_flat(source.dimension(), data)?;
                Ok((self.ids[pick], query))
            })
            .collect()
    }
}

/// `num_documents` documents of `vectors_per_document` uniform vectors each.
///
/// Fails with [`InvalidParameter`](crate::RetrieveError::InvalidParameter)
/// when `dimension == 0`.
pub fn generate_multivector_dataset(
    num_documents: usize,
    vectors_per_document: usize,
    dimension: usize,
    seed: u64,
) -> Result<MultiVectorDataset> {
    let mut rng = StdRng::seed_from_u64(seed);
    let documents = (0..num_documents)
        .map(|_| random_set(&mut rng, vectors_per_document, dimension))
        .collect::<Result<Vec<_>>>()?;
    Ok(MultiVectorDataset {
        documents,
        ids: (1..=num_documents as u32).collect(),
        dimension,
    })
}

/// One set of `n` uniform vectors.
pub fn random_set<R: Rng>(rng: &mut R, n: usize, dimension: usize) -> Result<VectorSet> {
    let data = (0..n * dimension)
        .map(|_| rng.random_range(VALUE_RANGE.0..VALUE_RANGE.1))
        .collect();
    VectorSet::from_flat(dimension, data)
}

/// Exact Chamfer top-`k` ids for one query, best first.
pub fn compute_ground_truth(query: &VectorSet, dataset: &MultiVectorDataset, k: usize) -> Vec<u32> {
    let mut top = TopK::new(k);
    for (&id, doc) in dataset.ids.iter().zip(&dataset.documents) {
        top.push(id, chamfer_similarity(query, doc));
    }
    top.into_sorted_vec().into_iter().map(|(id, _)| id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_and_range() {
        let ds = generate_multivector_dataset(20, 4, 8, 1).unwrap();
        assert_eq!(ds.len(), 20);
        assert_eq!(ds.num_vectors(), 80);
        assert_eq!(ds.ids.first(), Some(&1));
        assert_eq!(ds.ids.last(), Some(&20));
        for doc in &ds.documents {
            assert_eq!(doc.dimension(), 8);
            assert!(doc
                .as_flat()
                .iter()
                .all(|&x| (VALUE_RANGE.0..VALUE_RANGE.1).contains(&x)));
        }
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let a = generate_multivector_dataset(5, 3, 4, 99).unwrap();
        let b = generate_multivector_dataset(5, 3, 4, 99).unwrap();
        assert_eq!(a.documents, b.documents);
        let c = generate_multivector_dataset(5, 3, 4, 100).unwrap();
        assert_ne!(a.documents, c.documents);
    }

    #[test]
    fn perturbed_query_finds_its_source() {
        let ds = generate_multivector_dataset(50, 4, 16, 3).unwrap();
        for (source, query) in ds.perturbed_queries(10, 0.01, 7).unwrap() {
            assert_eq!(compute_ground_truth(&query, &ds, 1), vec![source]);
        }
    }

    #[test]
    fn zero_dimension_is_reported() {
        use crate::error::RetrieveError;

        assert!(matches!(
            generate_multivector_dataset(3, 2, 0, 1),
            Err(RetrieveError::InvalidParameter(_))
        ));
        let mut rng = StdRng::seed_from_u64(0);
        assert!(random_set(&mut rng, 4, 0).is_err());
    }

    #[test]
    fn perturbed_queries_keep_the_source_shape() {
        let ds = generate_multivector_dataset(10, 5, 6, 2).unwrap();
        for (source, query) in ds.perturbed_queries(8, 0.5, 1).unwrap() {
            let doc = &ds.documents[(source - 1) as usize];
            assert_eq!(query.len(), doc.len());
            assert_eq!(query.dimension(), 6);
        }
    }
}
