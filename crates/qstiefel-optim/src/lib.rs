//! Optimizers constrained to the complex Stiefel manifold.
//!
//! Currently a single optimizer, [`StiefelSgd`]: projected gradient descent
//! with optional transported momentum, keeping every parameter on the
//! manifold through an SVD retraction after each step.

pub mod sgd;

pub use sgd::{Momentum, SgdConfig, SgdConfigRecord, SlotId, StiefelSgd, CONFIG_VERSION};
