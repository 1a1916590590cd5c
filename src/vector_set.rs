//! Fixed-shape storage for a set of vectors (one document or one query).
//!
//! Vectors are stored row-major in a single flat buffer, the same SoA layout the
//! indexes use for single vectors. Every constructor validates the shape, so code
//! downstream can rely on `data.len() == len() * dimension()`.

use crate::error::{Result, RetrieveError};

/// An ordered set of `dimension`-length vectors.
///
/// ```rust
/// use muvera::VectorSet;
///
/// let set = VectorSet::from_rows(2, &[vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
/// assert_eq!(set.len(), 2);
/// assert_eq!(set.row(1), &[0.0, 1.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct VectorSet {
    data: Vec<f32>,
    dimension: usize,
}

impl VectorSet {
    /// Create an empty set.
    ///
    /// Fails with [`RetrieveError::InvalidParameter`] when `dimension == 0`, like
    /// every other constructor.
    pub fn new(dimension: usize) -> Result<Self> {
        Self::with_capacity(dimension, 0)
    }

    /// Create an empty set with room for `n` vectors.
    pub fn with_capacity(dimension: usize, n: usize) -> Result<Self> {
        check_dimension(dimension)?;
        Ok(Self {
            data: Vec::with_capacity(n.saturating_mul(dimension)),
            dimension,
        })
    }

    /// Wrap a row-major buffer.
    ///
    /// Fails with [`RetrieveError::InvalidDimension`] when `data.len()` is not a
    /// multiple of `dimension`; `actual` is then the length of the trailing partial row.
    pub fn from_flat(dimension: usize, data: Vec<f32>) -> Result<Self> {
        check_dimension(dimension)?;
        let rem = data.len() % dimension;
        if rem != 0 {
            return Err(RetrieveError::InvalidDimension {
                expected: dimension,
                actual: rem,
            });
        }
        Ok(Self { data, dimension })
    }

    /// Copy rows into a new set, checking each row's length.
    pub fn from_rows<R: AsRef<[f32]>>(dimension: usize, rows: &[R]) -> Result<Self> {
        let mut set = Self::with_capacity(dimension, rows.len())?;
        for row in rows {
            set.push(row.as_ref())?;
        }
        Ok(set)
    }

    /// Append one vector.
    pub fn push(&mut self, v: &[f32]) -> Result<()> {
        if v.len() != self.dimension {
            return Err(RetrieveError::InvalidDimension {
                expected: self.dimension,
                actual: v.len(),
            });
        }
        self.data.extend_from_slice(v);
        Ok(())
    }

    /// Number of vectors.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len() / self.dimension
    }

    /// True if the set holds no vectors.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Length of every vector in the set.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// The `i`-th vector.
    ///
    /// # Panics
    ///
    /// Panics if `i >= len()`.
    #[inline]
    pub fn row(&self, i: usize) -> &[f32] {
        let start = i * self.dimension;
        &self.data[start..start + self.dimension]
    }

    /// Iterate over the vectors in order.
    #[inline]
    pub fn rows(&self) -> std::slice::ChunksExact<'_, f32> {
        self.data.chunks_exact(self.dimension)
    }

    /// The flat row-major buffer.
    #[inline]
    pub fn as_flat(&self) -> &[f32] {
        &self.data
    }

    /// Approximate heap footprint in bytes.
    pub fn size_bytes(&self) -> usize {
        self.data.len() * std::mem::size_of::<f32>()
    }
}

fn check_dimension(dimension: usize) -> Result<()> {
    if dimension == 0 {
        return Err(RetrieveError::InvalidParameter(
            "dimension must be positive".to_string(),
        ));
    }
    Ok(())
}
