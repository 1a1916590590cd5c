//! Error types for muvera.

use thiserror::Error;

/// Errors that can occur during encoding, indexing or search.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetrieveError {
    /// A vector's length does not match the configured dimension.
    #[error("invalid dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    /// More documents than the index capacity (`max_points`).
    #[error("capacity exceeded: index holds at most {capacity} documents, got {requested}")]
    CapacityExceeded { capacity: usize, requested: usize },

    /// The same document id appeared twice in one `index_dataset` call.
    #[error("duplicate document id: {0}")]
    DuplicateId(u32),

    /// `documents` and `ids` have different lengths.
    #[error("length mismatch: {documents} documents but {ids} ids")]
    LengthMismatch { documents: usize, ids: usize },

    /// Invalid construction parameter.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Query issued before any successful `index_dataset`.
    #[error("index has not been built; call index_dataset first")]
    NotIndexed,
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RetrieveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context() {
        let e = RetrieveError::InvalidDimension {
            expected: 128,
            actual: 64,
        };
        assert_eq!(e.to_string(), "invalid dimension: expected 128, got 64");

        let e = RetrieveError::CapacityExceeded {
            capacity: 10,
            requested: 11,
        };
        assert!(e.to_string().contains("at most 10"));
    }
}
