//! Error types for manifold operations and optimizer configuration.

use thiserror::Error;

/// Errors that can occur during manifold operations.
#[derive(Debug, Clone, Error)]
pub enum ManifoldError {
    /// Point is not on the manifold.
    ///
    /// This error occurs when a point fails to satisfy the manifold
    /// constraints within numerical tolerance, or when a manifold is
    /// constructed with impossible dimensions.
    #[error("Point is not on the manifold: {reason}")]
    InvalidPoint {
        /// Description of why the point is invalid
        reason: String,
    },

    /// Vector is not in the tangent space.
    #[error("Vector is not in the tangent space: {reason}")]
    InvalidTangent {
        /// Description of why the tangent vector is invalid
        reason: String,
    },

    /// Dimension mismatch between tensors.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions
        expected: String,
        /// Actual dimensions
        actual: String,
    },

    /// Numerical degeneracy detected.
    ///
    /// This error occurs when a decomposition becomes unstable or
    /// undefined, such as the SVD of a rank-deficient matrix during
    /// retraction. It is propagated to the caller and never retried:
    /// every operation in this crate is deterministic per call.
    #[error("Numerical degeneracy detected: {reason}")]
    NumericalError {
        /// Description of the numerical issue
        reason: String,
    },
}

impl ManifoldError {
    /// Create an `InvalidPoint` error with a custom reason.
    pub fn invalid_point<S: Into<String>>(reason: S) -> Self {
        Self::InvalidPoint {
            reason: reason.into(),
        }
    }

    /// Create an `InvalidTangent` error with a custom reason.
    pub fn invalid_tangent<S: Into<String>>(reason: S) -> Self {
        Self::InvalidTangent {
            reason: reason.into(),
        }
    }

    /// Create a `DimensionMismatch` error.
    pub fn dimension_mismatch<S1, S2>(expected: S1, actual: S2) -> Self
    where
        S1: std::fmt::Display,
        S2: std::fmt::Display,
    {
        Self::DimensionMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create a `NumericalError` with a custom reason.
    pub fn numerical_error<S: Into<String>>(reason: S) -> Self {
        Self::NumericalError {
            reason: reason.into(),
        }
    }
}

/// Errors that can occur during optimizer construction or application.
#[derive(Debug, Clone, Error)]
pub enum OptimizerError {
    /// Invalid optimizer configuration.
    ///
    /// Raised once at construction time, e.g. for a momentum coefficient
    /// outside `[0, 1]` or a non-positive learning rate. Schedules bypass
    /// the numeric checks.
    #[error("Invalid optimizer configuration: {reason} ({parameter} = {value})")]
    InvalidConfiguration {
        /// Description of the configuration error
        reason: String,
        /// Name of the invalid parameter
        parameter: String,
        /// Value that was invalid
        value: String,
    },

    /// Operation deliberately not supported by this optimizer.
    ///
    /// Sparse gradient application always fails with this error; the code
    /// path is a stub by design, not by oversight.
    #[error("Operation not supported: {operation}")]
    UnsupportedOperation {
        /// Name of the unsupported operation
        operation: String,
    },

    /// Propagated manifold error.
    #[error("Manifold operation failed: {0}")]
    ManifoldError(#[from] ManifoldError),
}

impl OptimizerError {
    /// Create an `InvalidConfiguration` error.
    pub fn invalid_configuration<S1, S2, S3>(reason: S1, parameter: S2, value: S3) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        Self::InvalidConfiguration {
            reason: reason.into(),
            parameter: parameter.into(),
            value: value.into(),
        }
    }

    /// Create an `UnsupportedOperation` error.
    pub fn unsupported_operation<S: Into<String>>(operation: S) -> Self {
        Self::UnsupportedOperation {
            operation: operation.into(),
        }
    }
}

/// Result type alias for operations that can produce `ManifoldError`.
pub type Result<T> = std::result::Result<T, ManifoldError>;

/// Result type alias for optimizer operations.
pub type OptimizerResult<T> = std::result::Result<T, OptimizerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifold_error_display() {
        let err = ManifoldError::invalid_point("columns are not orthonormal");
        assert!(matches!(err, ManifoldError::InvalidPoint { .. }));
        assert_eq!(
            err.to_string(),
            "Point is not on the manifold: columns are not orthonormal"
        );

        let err = ManifoldError::dimension_mismatch("(4, 2)", "(2, 4)");
        assert_eq!(err.to_string(), "Dimension mismatch: expected (4, 2), got (2, 4)");

        let err = ManifoldError::numerical_error("SVD failed to converge");
        assert!(err.to_string().contains("Numerical degeneracy"));
    }

    #[test]
    fn test_optimizer_error_creation() {
        let err = OptimizerError::invalid_configuration(
            "`momentum` must be between [0, 1]",
            "momentum",
            "1.5",
        );
        assert!(matches!(err, OptimizerError::InvalidConfiguration { .. }));
        assert!(err.to_string().contains("momentum"));

        let err = OptimizerError::unsupported_operation("sparse gradient update");
        assert_eq!(err.to_string(), "Operation not supported: sparse gradient update");
    }

    #[test]
    fn test_manifold_error_propagation() {
        let manifold_err = ManifoldError::numerical_error("rank-deficient retraction input");
        let optimizer_err: OptimizerError = manifold_err.into();

        assert!(matches!(optimizer_err, OptimizerError::ManifoldError(_)));
        assert!(optimizer_err.to_string().contains("Manifold operation failed"));
        assert!(optimizer_err.to_string().contains("rank-deficient"));
    }
}
