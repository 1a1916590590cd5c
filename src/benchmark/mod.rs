//! Evaluation utilities: recall metrics and seeded synthetic datasets.
//!
//! Used by the integration tests and benches to measure MUVERA against the
//! exact Chamfer engine. Not needed for retrieval itself.

pub mod datasets;
pub mod metrics;

pub use datasets::{
    compute_ground_truth, generate_multivector_dataset, random_set, MultiVectorDataset,
};
pub use metrics::{hit_rate, mean_recall, recall_at_k, recall_curve};
