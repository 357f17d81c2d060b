//! Type definitions and numerical constants.
//!
//! The manifold works over complex matrices, but host tensor storage in this
//! domain is real-only, so the scalar trait is defined for the real field and
//! complex values appear as `Complex<T>` entries of nalgebra matrices.

use nalgebra::{Complex, DMatrix, RealField, Scalar as NalgebraScalar};
use num_traits::{Float, FromPrimitive};
use std::fmt::{Debug, Display};

/// Trait for real scalar types used in optimization (f32 or f64).
pub trait Scalar:
    NalgebraScalar
    + RealField
    + Float
    + FromPrimitive
    + Display
    + Debug
    + Default
    + Copy
    + Send
    + Sync
    + 'static
{
    /// Machine epsilon for this scalar type.
    const EPSILON: Self;

    /// Default tolerance for approximate comparisons.
    const DEFAULT_TOLERANCE: Self;

    /// Tolerance for checking orthonormality of manifold points.
    const ORTHONORMALITY_TOLERANCE: Self;

    /// Convert from f64 (for constants).
    ///
    /// # Panics
    ///
    /// Panics if the conversion fails. Use `try_from_f64` for a
    /// non-panicking version.
    fn from_f64(v: f64) -> Self {
        <Self as FromPrimitive>::from_f64(v).expect("Failed to convert from f64")
    }

    /// Try to convert from f64.
    fn try_from_f64(v: f64) -> Option<Self> {
        <Self as FromPrimitive>::from_f64(v)
    }

    /// Convert to f64 (for display).
    ///
    /// # Panics
    ///
    /// Panics if the conversion fails.
    fn to_f64(self) -> f64 {
        num_traits::cast(self).expect("Failed to convert to f64")
    }

    /// Convert from usize (for iteration counts).
    ///
    /// # Panics
    ///
    /// Panics if the conversion fails.
    fn from_usize(v: usize) -> Self {
        <Self as FromPrimitive>::from_usize(v).expect("Failed to convert from usize")
    }
}

impl Scalar for f32 {
    const EPSILON: Self = f32::EPSILON;
    const DEFAULT_TOLERANCE: Self = 1e-4;
    const ORTHONORMALITY_TOLERANCE: Self = 1e-4;
}

impl Scalar for f64 {
    const EPSILON: Self = f64::EPSILON;
    const DEFAULT_TOLERANCE: Self = 1e-10;
    const ORTHONORMALITY_TOLERANCE: Self = 1e-10;
}

/// Type alias for a dynamically-sized complex matrix.
pub type ComplexMatrix<T> = DMatrix<Complex<T>>;

/// Lifts a real scalar into the complex field.
pub fn complex<T: Scalar>(re: T) -> Complex<T> {
    Complex::new(re, T::zero())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_scalar_constants() {
        assert_eq!(<f32 as Scalar>::EPSILON, f32::EPSILON);
        assert!(<f32 as Scalar>::DEFAULT_TOLERANCE > 0.0);
        assert!(<f64 as Scalar>::ORTHONORMALITY_TOLERANCE > f64::EPSILON);
    }

    #[test]
    fn test_scalar_conversions() {
        let val_f64 = 3.14159;
        let val_f32 = <f32 as Scalar>::from_f64(val_f64);
        assert_relative_eq!(val_f32 as f64, val_f64, epsilon = 1e-6);

        assert_eq!(<f64 as Scalar>::from_usize(42), 42.0);
    }

    #[test]
    fn test_complex_lift() {
        let z = complex(2.5_f64);
        assert_eq!(z.re, 2.5);
        assert_eq!(z.im, 0.0);
    }
}
