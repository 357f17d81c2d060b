//! SGD on the complex Stiefel manifold.
//!
//! This facade re-exports the workspace crates:
//!
//! - [`core`](qstiefel_core): tensors, the real/complex bridge, schedules,
//!   errors, and the optimizer capability trait
//! - [`manifolds`](qstiefel_manifolds): the [`ComplexStiefel`] geometry
//! - [`optim`](qstiefel_optim): the [`StiefelSgd`] optimizer
//!
//! # Example
//!
//! ```
//! use qstiefel::prelude::*;
//!
//! let stiefel = ComplexStiefel::new(4, 2)?;
//! let point = stiefel.random_point::<f64>()?;
//! let var = complex_to_real(&MatrixBatch::from_matrix(point)?);
//!
//! let mut sgd = StiefelSgd::new(
//!     SgdConfig::new()
//!         .with_constant_learning_rate(0.01)
//!         .with_constant_momentum(0.9),
//! )?;
//!
//! let grad = RealTensor::zeros(var.batch_shape(), var.nrows(), var.ncols())?;
//! let mut var = var;
//! sgd.apply_dense(SlotId(0), &grad, &mut var)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use qstiefel_core as core;
pub use qstiefel_manifolds as manifolds;
pub use qstiefel_optim as optim;

pub use qstiefel_manifolds::ComplexStiefel;
pub use qstiefel_optim::{SgdConfig, SlotId, StiefelSgd};

/// Re-export of the underlying linear algebra library.
pub use nalgebra;

/// Prelude module for convenient imports.
///
/// # Example
/// ```
/// use qstiefel::prelude::*;
/// ```
pub mod prelude {
    pub use qstiefel_core::prelude::*;
    pub use qstiefel_manifolds::ComplexStiefel;
    pub use qstiefel_optim::{
        Momentum, SgdConfig, SgdConfigRecord, SlotId, StiefelSgd, CONFIG_VERSION,
    };
}
