//! Stochastic gradient descent on the complex Stiefel manifold.
//!
//! One optimization step, per parameter slot:
//! 1. Convert parameter and Euclidean gradient from the paired real layout
//!    to complex matrices.
//! 2. Project the gradient onto the tangent space (Riemannian gradient).
//! 3. With momentum tracking: blend `m' = beta*m + (1 - beta)*rgrad`, step
//!    `U - lr*m'`, retract, transport `m'` to the new point and store it.
//!    Without: step `U - lr*rgrad` and retract.
//! 4. Write the new point back into the parameter storage, in place.
//!
//! The optimizer works only with parameters of shape `(..., q, p, 2)` whose
//! complex view has orthonormal columns; it keeps them on the manifold by
//! retracting after every step.

use std::collections::HashMap;

use qstiefel_core::{
    bridge::{complex_to_real, real_to_complex},
    error::{ManifoldError, OptimizerError, OptimizerResult},
    optimizer::Optimizer,
    schedule::Schedule,
    tensor::RealTensor,
    types::{complex, Scalar},
};
use qstiefel_manifolds::ComplexStiefel;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Version tag for exported configuration records.
pub const CONFIG_VERSION: u32 = 1;

/// Momentum coefficient: a plain constant or a dynamic schedule.
///
/// The two variants are not interchangeable at the boundaries: a constant is
/// range-checked at construction and a literal `0` disables momentum tracking
/// entirely, while a schedule bypasses the numeric check and always enables
/// tracking, whatever its current value. This asymmetry is intentional and
/// preserved.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Momentum<T: Scalar> {
    /// Fixed coefficient in `[0, 1]`.
    Constant(T),
    /// Scheduled coefficient, evaluated each step.
    Schedule(Schedule<T>),
}

impl<T: Scalar> Momentum<T> {
    /// Evaluates the coefficient at iteration `k`.
    pub fn value_at(&self, iteration: usize) -> T {
        match self {
            Self::Constant(beta) => *beta,
            Self::Schedule(schedule) => schedule.value_at(iteration),
        }
    }
}

/// Configuration for [`StiefelSgd`], immutable after construction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SgdConfig<T: Scalar> {
    /// Learning rate, constant or scheduled. A constant must be positive.
    pub learning_rate: Schedule<T>,
    /// Momentum coefficient. A constant must lie in `[0, 1]`.
    pub momentum: Momentum<T>,
    /// Optimizer display name.
    pub name: String,
}

impl<T: Scalar> Default for SgdConfig<T> {
    fn default() -> Self {
        Self {
            learning_rate: Schedule::Constant(<T as Scalar>::from_f64(0.01)),
            momentum: Momentum::Constant(T::zero()),
            name: "StiefelSGD".to_string(),
        }
    }
}

impl<T: Scalar> SgdConfig<T> {
    /// Creates a configuration with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the learning rate schedule.
    pub fn with_learning_rate(mut self, schedule: Schedule<T>) -> Self {
        self.learning_rate = schedule;
        self
    }

    /// Sets a constant learning rate.
    pub fn with_constant_learning_rate(mut self, learning_rate: T) -> Self {
        self.learning_rate = Schedule::Constant(learning_rate);
        self
    }

    /// Sets a constant momentum coefficient.
    pub fn with_constant_momentum(mut self, momentum: T) -> Self {
        self.momentum = Momentum::Constant(momentum);
        self
    }

    /// Sets a momentum schedule (always enables momentum tracking).
    pub fn with_momentum_schedule(mut self, schedule: Schedule<T>) -> Self {
        self.momentum = Momentum::Schedule(schedule);
        self
    }

    /// Sets the optimizer name.
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }
}

/// Exported configuration for host-side persistence.
///
/// A plain, versioned data record: the host serializes and restores it
/// itself, there is no implicit registry.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SgdConfigRecord<T: Scalar> {
    /// Record format version.
    pub version: u32,
    /// Optimizer display name.
    pub name: String,
    /// Learning rate setting.
    pub learning_rate: Schedule<T>,
    /// Momentum setting.
    pub momentum: Momentum<T>,
}

/// Identifies one tracked parameter slot.
///
/// Momentum state is keyed by slot identity; the host assigns each parameter
/// a stable id and uses it for every apply call on that parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(pub usize);

/// Stochastic gradient descent constrained to the complex Stiefel manifold.
///
/// Owns per-slot momentum state, created lazily on first application and
/// never implicitly reset. `apply_dense` is not reentrant for the same slot;
/// the host serializes calls, one per parameter per optimization step, and
/// advances the schedule clock with [`StiefelSgd::advance_step`].
///
/// # Examples
///
/// ```
/// use qstiefel_optim::{SgdConfig, StiefelSgd};
///
/// let sgd = StiefelSgd::<f64>::new(
///     SgdConfig::new()
///         .with_constant_learning_rate(0.01)
///         .with_constant_momentum(0.9),
/// )
/// .unwrap();
/// assert!(sgd.momentum_enabled());
/// ```
#[derive(Debug)]
pub struct StiefelSgd<T: Scalar> {
    config: SgdConfig<T>,
    momentum_enabled: bool,
    iteration: usize,
    slots: HashMap<SlotId, RealTensor<T>>,
}

impl<T: Scalar> StiefelSgd<T> {
    /// Creates a new optimizer, validating the configuration once.
    ///
    /// A constant learning rate must be positive and a constant momentum must
    /// lie in `[0, 1]`; schedules bypass both checks. Momentum tracking is
    /// enabled for any schedule and for constants strictly greater than zero.
    pub fn new(config: SgdConfig<T>) -> OptimizerResult<Self> {
        if let Schedule::Constant(lr) = config.learning_rate {
            if lr <= T::zero() {
                return Err(OptimizerError::invalid_configuration(
                    "`learning_rate` must be positive",
                    "learning_rate",
                    format!("{lr}"),
                ));
            }
        }
        let momentum_enabled = match config.momentum {
            Momentum::Constant(beta) => {
                if beta < T::zero() || beta > T::one() {
                    return Err(OptimizerError::invalid_configuration(
                        "`momentum` must be between [0, 1]",
                        "momentum",
                        format!("{beta}"),
                    ));
                }
                beta > T::zero()
            }
            // A schedule always enables tracking, whatever its current value.
            Momentum::Schedule(_) => true,
        };
        Ok(Self {
            config,
            momentum_enabled,
            iteration: 0,
            slots: HashMap::new(),
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SgdConfig<T> {
        &self.config
    }

    /// Returns the optimizer name.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Whether momentum state is tracked per slot.
    pub fn momentum_enabled(&self) -> bool {
        self.momentum_enabled
    }

    /// Current value of the schedule clock.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Advances the schedule clock; the host calls this once per
    /// optimization step, after applying all parameters.
    pub fn advance_step(&mut self) {
        self.iteration += 1;
    }

    /// Read access to a slot's momentum state, if it has been created.
    pub fn momentum_state(&self, slot: SlotId) -> Option<&RealTensor<T>> {
        self.slots.get(&slot)
    }

    /// Applies one optimization step to the parameter tracked by `slot`.
    ///
    /// `grad` is the Euclidean gradient and `var` the current point, both in
    /// the paired real representation `(..., q, p, 2)`; `var` is updated in
    /// place. The momentum slot is created zero-initialized on first use.
    pub fn apply_dense(
        &mut self,
        slot: SlotId,
        grad: &RealTensor<T>,
        var: &mut RealTensor<T>,
    ) -> OptimizerResult<()> {
        if self.momentum_enabled && !self.slots.contains_key(&slot) {
            let zero = RealTensor::zeros(var.batch_shape(), var.nrows(), var.ncols())?;
            self.slots.insert(slot, zero);
        }
        let momentum_state = if self.momentum_enabled {
            self.slots.get_mut(&slot)
        } else {
            None
        };
        Self::step_impl(&self.config, self.iteration, grad, var, momentum_state)
    }

    /// Sparse gradient updates are not supported, by design.
    pub fn apply_sparse(
        &mut self,
        _slot: SlotId,
        _grad: &RealTensor<T>,
        _var: &mut RealTensor<T>,
    ) -> OptimizerResult<()> {
        Err(OptimizerError::unsupported_operation(
            "sparse gradient update",
        ))
    }

    /// Exports the configuration for persistence by the host.
    pub fn get_config(&self) -> SgdConfigRecord<T> {
        SgdConfigRecord {
            version: CONFIG_VERSION,
            name: self.config.name.clone(),
            learning_rate: self.config.learning_rate,
            momentum: self.config.momentum,
        }
    }

    /// One step for one parameter; momentum is tracked iff a state buffer is
    /// supplied.
    fn step_impl(
        config: &SgdConfig<T>,
        iteration: usize,
        grad: &RealTensor<T>,
        var: &mut RealTensor<T>,
        momentum_state: Option<&mut RealTensor<T>>,
    ) -> OptimizerResult<()> {
        if !grad.same_shape(var) {
            return Err(ManifoldError::dimension_mismatch(
                format!("gradient of shape {}", var.shape_string()),
                grad.shape_string(),
            )
            .into());
        }

        let var_c = real_to_complex(var);
        let grad_c = real_to_complex(grad);
        let manifold = ComplexStiefel::for_batch(&var_c)?;

        let rgrad = manifold.egrad_to_rgrad_batch(&var_c, &grad_c)?;
        let lr = complex(config.learning_rate.value_at(iteration));

        let new_var = match momentum_state {
            Some(state) => {
                if !state.same_shape(var) {
                    return Err(ManifoldError::dimension_mismatch(
                        format!("momentum state of shape {}", var.shape_string()),
                        state.shape_string(),
                    )
                    .into());
                }
                let beta = config.momentum.value_at(iteration);
                let beta_c = complex(beta);
                let blend_c = complex(T::one() - beta);

                let momentum_c = real_to_complex(state);
                let blended = momentum_c.zip_map(&rgrad, |m, g| m * beta_c + g * blend_c)?;

                let candidate = var_c.zip_map(&blended, |u, m| u - m * lr)?;
                let new_var = manifold.retract_batch(&candidate)?;

                // Carry the momentum into the tangent space of the new point.
                let transported = manifold.vector_transport_batch(&new_var, &blended)?;
                *state = complex_to_real(&transported);
                new_var
            }
            None => {
                let candidate = var_c.zip_map(&rgrad, |u, g| u - g * lr)?;
                manifold.retract_batch(&candidate)?
            }
        };

        *var = complex_to_real(&new_var);
        Ok(())
    }
}

impl<T: Scalar> Optimizer<T> for StiefelSgd<T> {
    type State = Option<RealTensor<T>>;

    fn name(&self) -> &str {
        &self.config.name
    }

    fn create_state(&self, param: &RealTensor<T>) -> Self::State {
        if self.momentum_enabled {
            // Cannot fail: the dimensions come from an existing tensor.
            RealTensor::zeros(param.batch_shape(), param.nrows(), param.ncols()).ok()
        } else {
            None
        }
    }

    fn step(
        &mut self,
        grad: &RealTensor<T>,
        param: &mut RealTensor<T>,
        state: &mut Self::State,
    ) -> OptimizerResult<()> {
        Self::step_impl(&self.config, self.iteration, grad, param, state.as_mut())
    }
}
