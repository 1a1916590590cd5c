//! Bounded top-k selection with a deterministic order.
//!
//! Results are ordered by score descending, then by `doc_id` ascending. Scores
//! are compared with `total_cmp`, so the order is total (NaN included) and a
//! `TopK` built from any partition of the same candidates, merged in any order,
//! holds the same entries.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// One scored document.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Scored {
    doc_id: u32,
    score: f32,
}

impl Scored {
    /// `Less` means "ranks before".
    fn rank(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| self.doc_id.cmp(&other.doc_id))
    }
}

impl Eq for Scored {}

// Max-heap by rank: the top of the heap is the worst retained entry.
impl Ord for Scored {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank(other)
    }
}

impl PartialOrd for Scored {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Keeps the `k` best `(doc_id, score)` pairs seen so far.
#[derive(Debug, Clone)]
pub struct TopK {
    k: usize,
    heap: BinaryHeap<Scored>,
}

impl TopK {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            // `k` may be far larger than the number of candidates.
            heap: BinaryHeap::with_capacity(k.min(1024) + 1),
        }
    }

    /// Offer a candidate.
    #[inline]
    pub fn push(&mut self, doc_id: u32, score: f32) {
        if self.k == 0 {
            return;
        }
        // `total_cmp` orders -0.0 below 0.0; they must tie.
        let score = if score == 0.0 { 0.0 } else { score };
        let candidate = Scored { doc_id, score };
        if self.heap.len() < self.k {
            self.heap.push(candidate);
        } else if let Some(mut worst) = self.heap.peek_mut() {
            if candidate < *worst {
                *worst = candidate;
            }
        }
    }

    /// Fold another selector's candidates into this one.
    #[must_use]
    pub fn merge(mut self, other: TopK) -> TopK {
        for s in other.heap {
            self.push(s.doc_id, s.score);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Retained entries, best first.
    pub fn into_sorted_vec(self) -> Vec<(u32, f32)> {
        // Ascending by rank is best first.
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|s| (s.doc_id, s.score))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(v: &[(u32, f32)]) -> Vec<u32> {
        v.iter().map(|&(id, _)| id).collect()
    }

    #[test]
    fn keeps_best_k() {
        let mut top = TopK::new(3);
        for (id, s) in [(0, 0.1), (1, 0.9), (2, 0.5), (3, 0.7), (4, 0.3)] {
            top.push(id, s);
        }
        assert_eq!(ids(&top.into_sorted_vec()), vec![1, 3, 2]);
    }

    #[test]
    fn ties_break_by_ascending_id() {
        let mut top = TopK::new(3);
        for id in [9, 4, 7, 1, 5] {
            top.push(id, 1.0);
        }
        assert_eq!(ids(&top.into_sorted_vec()), vec![1, 4, 5]);
    }

    #[test]
    fn signed_zeros_tie() {
        let mut top = TopK::new(2);
        top.push(4, 0.0);
        top.push(2, -0.0);
        assert_eq!(ids(&top.into_sorted_vec()), vec![2, 4]);
    }

    #[test]
    fn k_zero_is_empty() {
        let mut top = TopK::new(0);
        top.push(1, 1.0);
        assert!(top.is_empty());
        assert!(top.into_sorted_vec().is_empty());
    }

    #[test]
    fn k_larger_than_candidates() {
        let mut top = TopK::new(100);
        top.push(2, 0.0);
        top.push(1, 0.0);
        assert_eq!(top.len(), 2);
        assert_eq!(ids(&top.into_sorted_vec()), vec![1, 2]);
    }

    #[test]
    fn negative_infinity_ranks_last() {
        let mut top = TopK::new(3);
        top.push(0, f32::NEG_INFINITY);
        top.push(5, -100.0);
        top.push(3, 0.0);
        assert_eq!(ids(&top.into_sorted_vec()), vec![3, 5, 0]);
    }

    #[test]
    fn merge_is_order_independent() {
        let candidates: Vec<(u32, f32)> = (0..50)
            .map(|i| (i, ((i * 7919) % 13) as f32))
            .collect();

        let mut whole = TopK::new(10);
        for &(id, s) in &candidates {
            whole.push(id, s);
        }
        let expected = whole.into_sorted_vec();

        for split in [1, 7, 25, 49] {
            let (a, b) = candidates.split_at(split);
            let mut left = TopK::new(10);
            let mut right = TopK::new(10);
            a.iter().for_each(|&(id, s)| left.push(id, s));
            b.iter().for_each(|&(id, s)| right.push(id, s));
            assert_eq!(left.clone().merge(right.clone()).into_sorted_vec(), expected);
            assert_eq!(right.merge(left).into_sorted_vec(), expected);
        }
    }
}
