//! Lossless conversion between complex matrices and their paired real layout.
//!
//! Host tensor storage in this domain is real-only, so a batch of complex
//! q x p matrices is stored as a real array of shape `(..., q, p, 2)` with
//! the real part at trailing index 0 and the imaginary part at index 1.
//! Both conversions are pure and total for well-typed input, and are exact
//! inverses of each other up to floating-point representability.

use crate::tensor::{MatrixBatch, RealTensor};
use crate::types::{ComplexMatrix, Scalar};
use nalgebra::Complex;

/// Stacks real and imaginary parts along a trailing axis of size 2.
pub fn complex_to_real<T: Scalar>(z: &MatrixBatch<T>) -> RealTensor<T> {
    let (q, p) = (z.nrows(), z.ncols());
    let mut data = Vec::with_capacity(z.batch_len() * q * p * 2);
    for m in z.mats() {
        for i in 0..q {
            for j in 0..p {
                let e = m[(i, j)];
                data.push(e.re);
                data.push(e.im);
            }
        }
    }
    RealTensor {
        batch_shape: z.batch_shape().to_vec(),
        nrows: q,
        ncols: p,
        data,
    }
}

/// Combines trailing `[..., 0]` and `[..., 1]` slices into complex values.
pub fn real_to_complex<T: Scalar>(r: &RealTensor<T>) -> MatrixBatch<T> {
    let (q, p) = (r.nrows(), r.ncols());
    let stride = q * p * 2;
    let data = r.data();
    let mats = (0..r.batch_len())
        .map(|b| {
            let base = b * stride;
            ComplexMatrix::from_fn(q, p, |i, j| {
                let off = base + (i * p + j) * 2;
                Complex::new(data[off], data[off + 1])
            })
        })
        .collect();
    MatrixBatch {
        batch_shape: r.batch_shape().to_vec(),
        mats,
    }
}
