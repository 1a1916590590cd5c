//! Write-once document store shared by every retriever.
//!
//! A retriever turns each document into a payload `T` (the raw [`VectorSet`]
//! for exact search, an encoding for MUVERA) and keeps them in a
//! [`DocumentIndex`]. Building validates the whole batch before any work is
//! done, so a failed build never leaves a half-filled index behind.
//!
//! With the `parallel` feature, payload construction and scoring run on the
//! rayon pool. Payloads are collected in input order and partial top-k heaps
//! are merged under a total order, so results match the serial path exactly.

use std::collections::{HashMap, HashSet};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{Result, RetrieveError};
use crate::topk::TopK;
use crate::vector_set::VectorSet;

/// Check a batch handed to `index_dataset`.
///
/// Order of checks: count mismatch, capacity, dimensions, duplicate ids.
pub(crate) fn validate_batch(
    documents: &[VectorSet],
    ids: &[u32],
    dimensions: usize,
    max_points: usize,
) -> Result<()> {
    if documents.len() != ids.len() {
        return Err(RetrieveError::LengthMismatch {
            documents: documents.len(),
            ids: ids.len(),
        });
    }
    if documents.len() > max_points {
        return Err(RetrieveError::CapacityExceeded {
            capacity: max_points,
            requested: documents.len(),
        });
    }
    if let Some(doc) = documents.iter().find(|d| d.dimension() != dimensions) {
        return Err(RetrieveError::InvalidDimension {
            expected: dimensions,
            actual: doc.dimension(),
        });
    }
    let mut seen = HashSet::with_capacity(ids.len());
    for &id in ids {
        if !seen.insert(id) {
            return Err(RetrieveError::DuplicateId(id));
        }
    }
    Ok(())
}

/// `doc_id -> T`, in insertion order.
#[derive(Debug, Clone)]
pub(crate) struct DocumentIndex<T> {
    ids: Vec<u32>,
    entries: Vec<T>,
    positions: HashMap<u32, usize>,
}

impl<T: Send + Sync> DocumentIndex<T> {
    /// Validate the batch, then build one payload per document.
    pub(crate) fn build<F>(
        documents: &[VectorSet],
        ids: &[u32],
        dimensions: usize,
        max_points: usize,
        make: F,
    ) -> Result<Self>
    where
        F: Fn(&VectorSet) -> Result<T> + Sync,
    {
        validate_batch(documents, ids, dimensions, max_points)?;

        #[cfg(feature = "parallel")]
        let entries = documents.par_iter().map(&make).collect::<Result<Vec<T>>>()?;
        #[cfg(not(feature = "parallel"))]
        let entries = documents.iter().map(&make).collect::<Result<Vec<T>>>()?;

        let positions = ids.iter().enumerate().map(|(pos, &id)| (id, pos)).collect();
        Ok(Self {
            ids: ids.to_vec(),
            entries,
            positions,
        })
    }

    /// Score every entry and keep the best `k`, best first.
    pub(crate) fn top_k<F>(&self, k: usize, score: F) -> Vec<(u32, f32)>
    where
        F: Fn(&T) -> f32 + Sync,
    {
        if k == 0 {
            return Vec::new();
        }

        #[cfg(feature = "parallel")]
        let top = self
            .ids
            .par_iter()
            .zip(self.entries.par_iter())
            .fold(
                || TopK::new(k),
                |mut top, (&id, entry)| {
                    top.push(id, score(entry));
                    top
                },
            )
            .reduce(|| TopK::new(k), TopK::merge);

        #[cfg(not(feature = "parallel"))]
        let top = {
            let mut top = TopK::new(k);
            for (&id, entry) in self.ids.iter().zip(&self.entries) {
                top.push(id, score(entry));
            }
            top
        };

        top.into_sorted_vec()
    }

    pub(crate) fn get(&self, doc_id: u32) -> Option<&T> {
        self.positions.get(&doc_id).map(|&pos| &self.entries[pos])
    }

    pub(crate) fn len(&self) -> usize {
        self.ids.len()
    }

    pub(crate) fn entries(&self) -> &[T] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(dim: usize, n: usize) -> Vec<VectorSet> {
        (0..n)
            .map(|i| VectorSet::from_flat(dim, vec![i as f32; dim]).unwrap())
            .collect()
    }

    #[test]
    fn validation_order() {
        let d = docs(2, 3);
        assert_eq!(
            validate_batch(&d, &[0, 1], 2, 10),
            Err(RetrieveError::LengthMismatch { documents: 3, ids: 2 })
        );
        assert_eq!(
            validate_batch(&d, &[0, 1, 2], 2, 2),
            Err(RetrieveError::CapacityExceeded {
                capacity: 2,
                requested: 3
            })
        );
        assert_eq!(
            validate_batch(&d, &[0, 1, 2], 3, 10),
            Err(RetrieveError::InvalidDimension {
                expected: 3,
                actual: 2
            })
        );
        assert_eq!(
            validate_batch(&d, &[0, 1, 0], 2, 10),
            Err(RetrieveError::DuplicateId(0))
        );
        assert!(validate_batch(&d, &[5, 1, 3], 2, 3).is_ok());
    }

    #[test]
    fn empty_batch_is_valid() {
        assert!(validate_batch(&[], &[], 4, 1).is_ok());
    }

    #[test]
    fn build_keeps_input_order() {
        let d = docs(1, 40);
        let ids: Vec<u32> = (0..40).rev().collect();
        let index = DocumentIndex::build(&d, &ids, 1, 40, |s| Ok(s.row(0)[0])).unwrap();
        assert_eq!(index.len(), 40);
        for (pos, &v) in index.entries().iter().enumerate() {
            assert_eq!(v, pos as f32);
        }
        assert_eq!(index.get(39), Some(&0.0));
        assert_eq!(index.get(0), Some(&39.0));
        assert_eq!(index.get(40), None);
    }

    #[test]
    fn build_propagates_payload_errors() {
        let d = docs(1, 3);
        let result: Result<DocumentIndex<f32>> = DocumentIndex::build(&d, &[0, 1, 2], 1, 3, |_| {
            Err(RetrieveError::InvalidParameter("boom".into()))
        });
        assert!(result.is_err());
    }

    #[test]
    fn top_k_orders_by_score_then_id() {
        let d = docs(1, 6);
        let ids = [10, 11, 12, 13, 14, 15];
        let index = DocumentIndex::build(&d, &ids, 1, 6, |s| Ok(s.row(0)[0])).unwrap();
        // Scores: 0 1 2 2 1 0 after folding around the middle.
        let got = index.top_k(4, |&v| 2.5 - (v - 2.5).abs());
        let ids: Vec<u32> = got.iter().map(|&(id, _)| id).collect();
        assert_eq!(ids, vec![12, 13, 11, 14]);
        assert!(index.top_k(0, |&v| v).is_empty());
        assert_eq!(index.top_k(100, |&v| v).len(), 6);
    }
}
