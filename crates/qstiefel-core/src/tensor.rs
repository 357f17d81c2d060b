//! Batched tensor representations.
//!
//! Parameters live in two representations:
//!
//! - [`RealTensor`]: the host storage layout, a flat real array of shape
//!   `(..batch.., q, p, 2)` where the trailing axis of size 2 holds the real
//!   part at index 0 and the imaginary part at index 1;
//! - [`MatrixBatch`]: the working layout, one complex q x p matrix per batch
//!   entry, on which all manifold operations act.
//!
//! Batch dimensions are leading and processed independently; entries are
//! stored row-major over the batch shape.

use crate::error::{ManifoldError, Result};
use crate::types::{ComplexMatrix, Scalar};

/// A batch of complex matrices stored as real scalars, layout `(..., q, p, 2)`.
///
/// This is the only storage layout the core defines; persistence of the
/// underlying buffer is the host framework's concern.
#[derive(Debug, Clone, PartialEq)]
pub struct RealTensor<T: Scalar> {
    pub(crate) batch_shape: Vec<usize>,
    pub(crate) nrows: usize,
    pub(crate) ncols: usize,
    pub(crate) data: Vec<T>,
}

impl<T: Scalar> RealTensor<T> {
    /// Creates a zero-filled tensor for a batch of `nrows` x `ncols` matrices.
    ///
    /// The batch shape may be empty, denoting a single matrix.
    pub fn zeros(batch_shape: &[usize], nrows: usize, ncols: usize) -> Result<Self> {
        check_dims(batch_shape, nrows, ncols)?;
        let len = batch_shape.iter().product::<usize>() * nrows * ncols * 2;
        Ok(Self {
            batch_shape: batch_shape.to_vec(),
            nrows,
            ncols,
            data: vec![T::zero(); len],
        })
    }

    /// Creates a tensor from a flat buffer in `(..., q, p, 2)` row-major order.
    pub fn from_data(
        batch_shape: &[usize],
        nrows: usize,
        ncols: usize,
        data: Vec<T>,
    ) -> Result<Self> {
        check_dims(batch_shape, nrows, ncols)?;
        let expected = batch_shape.iter().product::<usize>() * nrows * ncols * 2;
        if data.len() != expected {
            return Err(ManifoldError::dimension_mismatch(
                format!("{expected} scalars"),
                format!("{} scalars", data.len()),
            ));
        }
        Ok(Self {
            batch_shape: batch_shape.to_vec(),
            nrows,
            ncols,
            data,
        })
    }

    /// Leading batch shape (may be empty for a single matrix).
    pub fn batch_shape(&self) -> &[usize] {
        &self.batch_shape
    }

    /// Number of batch entries (product of the batch shape).
    pub fn batch_len(&self) -> usize {
        self.batch_shape.iter().product()
    }

    /// Number of matrix rows (q).
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of matrix columns (p).
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// The flat backing buffer.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Mutable access to the flat backing buffer.
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Reads one scalar: batch entry `b`, row `i`, column `j`, `part` 0 (real)
    /// or 1 (imaginary).
    pub fn get(&self, b: usize, i: usize, j: usize, part: usize) -> T {
        self.data[((b * self.nrows + i) * self.ncols + j) * 2 + part]
    }

    /// Whether another tensor has identical batch shape and matrix dimensions.
    pub fn same_shape(&self, other: &Self) -> bool {
        self.batch_shape == other.batch_shape
            && self.nrows == other.nrows
            && self.ncols == other.ncols
    }

    /// Human-readable shape description for error messages.
    pub fn shape_string(&self) -> String {
        format!("({:?}, {}, {}, 2)", self.batch_shape, self.nrows, self.ncols)
    }
}

/// A batch of complex matrices with a leading batch shape.
///
/// All manifold operations act on this representation; batch entries are
/// independent except for the explicit canonical-metric reduction.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixBatch<T: Scalar> {
    pub(crate) batch_shape: Vec<usize>,
    pub(crate) mats: Vec<ComplexMatrix<T>>,
}

impl<T: Scalar> MatrixBatch<T> {
    /// Creates a batch from a batch shape and matching list of matrices.
    pub fn new(batch_shape: Vec<usize>, mats: Vec<ComplexMatrix<T>>) -> Result<Self> {
        let expected = batch_shape.iter().product::<usize>();
        if mats.len() != expected {
            return Err(ManifoldError::dimension_mismatch(
                format!("{expected} batch entries"),
                format!("{} matrices", mats.len()),
            ));
        }
        let first = mats.first().ok_or_else(|| {
            ManifoldError::dimension_mismatch("at least one batch entry", "empty batch")
        })?;
        check_dims(&batch_shape, first.nrows(), first.ncols())?;
        let (q, p) = (first.nrows(), first.ncols());
        for m in &mats {
            if m.nrows() != q || m.ncols() != p {
                return Err(ManifoldError::dimension_mismatch(
                    format!("({q}, {p})"),
                    format!("({}, {})", m.nrows(), m.ncols()),
                ));
            }
        }
        Ok(Self { batch_shape, mats })
    }

    /// Wraps a single matrix as a batch with empty batch shape.
    pub fn from_matrix(mat: ComplexMatrix<T>) -> Result<Self> {
        Self::new(Vec::new(), vec![mat])
    }

    /// Leading batch shape (may be empty for a single matrix).
    pub fn batch_shape(&self) -> &[usize] {
        &self.batch_shape
    }

    /// Number of batch entries.
    pub fn batch_len(&self) -> usize {
        self.mats.len()
    }

    /// Number of matrix rows (q).
    pub fn nrows(&self) -> usize {
        self.mats[0].nrows()
    }

    /// Number of matrix columns (p).
    pub fn ncols(&self) -> usize {
        self.mats[0].ncols()
    }

    /// The matrices, row-major over the batch shape.
    pub fn mats(&self) -> &[ComplexMatrix<T>] {
        &self.mats
    }

    /// Mutable access to the matrices.
    pub fn mats_mut(&mut self) -> &mut [ComplexMatrix<T>] {
        &mut self.mats
    }

    /// Consumes the batch, returning its matrices.
    pub fn into_mats(self) -> Vec<ComplexMatrix<T>> {
        self.mats
    }

    /// Builds a batch with the same shape by pairing entries of `self` and
    /// `other` through `f`.
    pub fn zip_map<F>(&self, other: &Self, f: F) -> Result<Self>
    where
        F: Fn(&ComplexMatrix<T>, &ComplexMatrix<T>) -> ComplexMatrix<T>,
    {
        if self.batch_shape != other.batch_shape
            || self.nrows() != other.nrows()
            || self.ncols() != other.ncols()
        {
            return Err(ManifoldError::dimension_mismatch(
                format!("({:?}, {}, {})", self.batch_shape, self.nrows(), self.ncols()),
                format!(
                    "({:?}, {}, {})",
                    other.batch_shape,
                    other.nrows(),
                    other.ncols()
                ),
            ));
        }
        let mats = self
            .mats
            .iter()
            .zip(&other.mats)
            .map(|(a, b)| f(a, b))
            .collect();
        Ok(Self {
            batch_shape: self.batch_shape.clone(),
            mats,
        })
    }

}

fn check_dims(batch_shape: &[usize], nrows: usize, ncols: usize) -> Result<()> {
    if nrows == 0 || ncols == 0 {
        return Err(ManifoldError::dimension_mismatch(
            "matrix dimensions >= 1",
            format!("({nrows}, {ncols})"),
        ));
    }
    if batch_shape.contains(&0) {
        return Err(ManifoldError::dimension_mismatch(
            "batch dimensions >= 1",
            format!("{batch_shape:?}"),
        ));
    }
    Ok(())
}
