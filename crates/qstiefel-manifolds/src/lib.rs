//! Manifold geometry for SGD on the complex Stiefel manifold.
//!
//! Currently this crate provides a single manifold, [`ComplexStiefel`]:
//! tangent-space projection, SVD-based retraction, projection-based vector
//! transport, the canonical metric, and Euclidean-to-Riemannian gradient
//! conversion, each with batched variants.

pub mod stiefel;

pub use stiefel::ComplexStiefel;
