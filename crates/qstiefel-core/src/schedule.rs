//! Scalar schedules for learning rate and momentum.
//!
//! A schedule maps the optimizer's iteration counter to a coefficient value.
//! Schedules are evaluated lazily each step; the host advances the counter
//! explicitly, once per optimization step.

use crate::types::Scalar;
use num_traits::Float;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Scalar scheduling strategies.
///
/// # Formulas
///
/// - **Constant**: value = a for all iterations
/// - **Exponential decay**: value at iteration k = a * g^k, g in (0, 1)
/// - **Polynomial decay**: value = a / (1 + b*k)^p
/// - **Square root decay**: value = a / sqrt(1 + k)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Schedule<T: Scalar> {
    /// Fixed value for all iterations.
    Constant(T),

    /// Exponential decay: `initial * decay_rate^k`.
    ExponentialDecay {
        /// Initial value
        initial: T,
        /// Decay factor in (0, 1), typically 0.9-0.99
        decay_rate: T,
    },

    /// Polynomial decay: `initial / (1 + decay_rate * k)^power`.
    PolynomialDecay {
        /// Initial value
        initial: T,
        /// Decay coefficient > 0
        decay_rate: T,
        /// Decay power > 0, typically 0.5-1.0
        power: T,
    },

    /// Square root decay: `initial / sqrt(1 + k)`.
    SquareRootDecay {
        /// Initial value
        initial: T,
    },
}

impl<T: Scalar> Schedule<T> {
    /// Evaluates the schedule at iteration `k`.
    pub fn value_at(&self, iteration: usize) -> T {
        let k = <T as Scalar>::from_usize(iteration);

        match self {
            Self::Constant(value) => *value,

            Self::ExponentialDecay {
                initial,
                decay_rate,
            } => *initial * <T as Float>::powf(*decay_rate, k),

            Self::PolynomialDecay {
                initial,
                decay_rate,
                power,
            } => *initial / <T as Float>::powf(T::one() + *decay_rate * k, *power),

            Self::SquareRootDecay { initial } => {
                *initial / <T as Float>::sqrt(T::one() + k)
            }
        }
    }

    /// Creates a constant schedule.
    pub fn constant(value: T) -> Self {
        Self::Constant(value)
    }

    /// Creates an exponential decay schedule.
    pub fn exponential_decay(initial: T, decay_rate: T) -> Self {
        Self::ExponentialDecay {
            initial,
            decay_rate,
        }
    }

    /// Creates a polynomial decay schedule.
    pub fn polynomial_decay(initial: T, decay_rate: T, power: T) -> Self {
        Self::PolynomialDecay {
            initial,
            decay_rate,
            power,
        }
    }

    /// Creates a square root decay schedule.
    pub fn sqrt_decay(initial: T) -> Self {
        Self::SquareRootDecay { initial }
    }

    /// Whether this is a plain constant rather than a dynamic schedule.
    pub fn is_constant(&self) -> bool {
        matches!(self, Self::Constant(_))
    }
}
