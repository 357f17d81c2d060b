//! Optimizer capability interface.
//!
//! State is passed explicitly by the caller rather than attached through a
//! framework's per-variable slot machinery: the host creates one state value
//! per tracked parameter with [`Optimizer::create_state`] and threads it
//! through every [`Optimizer::step`] call for that parameter.

use crate::error::OptimizerResult;
use crate::tensor::RealTensor;
use crate::types::Scalar;

/// A stateful update rule over parameters in paired real representation.
///
/// `step` mutates the parameter in place and is not reentrant for the same
/// parameter/state pair: the host is responsible for serializing calls, one
/// per parameter per optimization step. Calls for distinct parameters are
/// independent.
pub trait Optimizer<T: Scalar> {
    /// Per-parameter optimizer state (e.g. a momentum buffer).
    type State;

    /// Optimizer display name.
    fn name(&self) -> &str;

    /// Creates the initial state for one parameter.
    fn create_state(&self, param: &RealTensor<T>) -> Self::State;

    /// Applies one optimization step for one parameter, in place.
    fn step(
        &mut self,
        grad: &RealTensor<T>,
        param: &mut RealTensor<T>,
        state: &mut Self::State,
    ) -> OptimizerResult<()>;
}
