//! Core types for SGD on the complex Stiefel manifold.
//!
//! This crate provides the foundations shared by the manifold geometry and
//! the optimizer:
//!
//! - [`tensor`]: batched complex matrices and their paired real storage layout
//! - [`bridge`]: lossless conversion between the two representations
//! - [`schedule`]: learning-rate and momentum schedules
//! - [`optimizer`]: the explicit-state optimizer capability trait
//! - [`error`]: error types for manifold and optimizer operations
//! - [`types`]: scalar trait and type aliases

pub mod bridge;
pub mod error;
pub mod optimizer;
pub mod schedule;
pub mod tensor;
pub mod types;

// Re-export commonly used items at the crate root
pub use error::{ManifoldError, OptimizerError, OptimizerResult, Result};

/// Prelude module for convenient imports.
///
/// # Example
/// ```
/// use qstiefel_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::bridge::{complex_to_real, real_to_complex};
    pub use crate::error::{ManifoldError, OptimizerError, OptimizerResult, Result};
    pub use crate::optimizer::Optimizer;
    pub use crate::schedule::Schedule;
    pub use crate::tensor::{MatrixBatch, RealTensor};
    pub use crate::types::{complex, ComplexMatrix, Scalar};
}
