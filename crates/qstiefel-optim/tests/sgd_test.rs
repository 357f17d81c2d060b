//! Integration tests for SGD on the complex Stiefel manifold.

use approx::assert_relative_eq;
use nalgebra::Complex;
use qstiefel_core::{
    bridge::{complex_to_real, real_to_complex},
    error::OptimizerError,
    optimizer::Optimizer,
    schedule::Schedule,
    tensor::{MatrixBatch, RealTensor},
    types::ComplexMatrix,
};
use qstiefel_manifolds::ComplexStiefel;
use qstiefel_optim::{SgdConfig, SlotId, StiefelSgd};

/// Random parameter tensor: a batch of random points on St(q,p) in the
/// paired real layout.
fn random_var(batch_shape: &[usize], q: usize, p: usize) -> RealTensor<f64> {
    let stiefel = ComplexStiefel::new(q, p).unwrap();
    let n: usize = batch_shape.iter().product();
    let mats = (0..n).map(|_| stiefel.random_point().unwrap()).collect();
    complex_to_real(&MatrixBatch::new(batch_shape.to_vec(), mats).unwrap())
}

/// Random tangent gradient at the current value of `var`.
fn random_tangent_grad(var: &RealTensor<f64>) -> RealTensor<f64> {
    let stiefel = ComplexStiefel::new(var.nrows(), var.ncols()).unwrap();
    let points = real_to_complex(var);
    let mats = points
        .mats()
        .iter()
        .map(|u| stiefel.random_tangent(u).unwrap())
        .collect();
    complex_to_real(&MatrixBatch::new(var.batch_shape().to_vec(), mats).unwrap())
}

/// Worst manifold-membership violation `max |U^H U - I|` over all entries.
fn membership_error(var: &RealTensor<f64>) -> f64 {
    let points = real_to_complex(var);
    let p = var.ncols();
    let mut worst: f64 = 0.0;
    for u in points.mats() {
        let gram = u.adjoint() * u;
        for i in 0..p {
            for j in 0..p {
                let expected = if i == j {
                    Complex::new(1.0, 0.0)
                } else {
                    Complex::new(0.0, 0.0)
                };
                worst = worst.max((gram[(i, j)] - expected).norm());
            }
        }
    }
    worst
}

fn identity_tensor(n: usize) -> RealTensor<f64> {
    let m = ComplexMatrix::<f64>::from_fn(n, n, |i, j| {
        if i == j {
            Complex::new(1.0, 0.0)
        } else {
            Complex::new(0.0, 0.0)
        }
    });
    complex_to_real(&MatrixBatch::from_matrix(m).unwrap())
}

#[test]
fn test_step_keeps_parameter_on_manifold() {
    let mut var = random_var(&[], 4, 2);
    // Arbitrary non-tangent Euclidean gradient.
    let grad_mat = ComplexMatrix::<f64>::from_fn(4, 2, |i, j| {
        Complex::new((i + 1) as f64, (j as f64) - 1.5)
    });
    let grad = complex_to_real(&MatrixBatch::from_matrix(grad_mat).unwrap());

    let mut sgd =
        StiefelSgd::new(SgdConfig::new().with_constant_learning_rate(0.1)).unwrap();
    sgd.apply_dense(SlotId(0), &grad, &mut var).unwrap();

    assert!(membership_error(&var) < 1e-10);
}

#[test]
fn test_identity_point_with_identity_gradient_is_fixed() {
    // U = I and G = I: U^H G - G^H U = 0 and (I - U U^H) G = 0, so the
    // Riemannian gradient vanishes, the candidate equals U, and retraction
    // returns U unchanged.
    let mut var = identity_tensor(2);
    let grad = identity_tensor(2);
    let before = var.clone();

    let mut sgd =
        StiefelSgd::new(SgdConfig::new().with_constant_learning_rate(0.1)).unwrap();
    sgd.apply_dense(SlotId(0), &grad, &mut var).unwrap();

    for (a, b) in var.data().iter().zip(before.data()) {
        assert_relative_eq!(a, b, epsilon = 1e-12);
    }
}

#[test]
fn test_scheduled_zero_momentum_matches_plain_branch() {
    let var0 = random_var(&[], 4, 2);
    let grad = random_tangent_grad(&var0);

    // Literal zero: tracking disabled entirely.
    let mut plain =
        StiefelSgd::new(SgdConfig::new().with_constant_learning_rate(0.05)).unwrap();
    let mut var_plain = var0.clone();
    plain.apply_dense(SlotId(0), &grad, &mut var_plain).unwrap();
    assert!(plain.momentum_state(SlotId(0)).is_none());

    // Scheduled zero: tracking enabled, but one step must produce the same
    // point since the blend reduces to the projected gradient.
    let mut scheduled = StiefelSgd::new(
        SgdConfig::new()
            .with_constant_learning_rate(0.05)
            .with_momentum_schedule(Schedule::constant(0.0)),
    )
    .unwrap();
    let mut var_scheduled = var0.clone();
    scheduled
        .apply_dense(SlotId(0), &grad, &mut var_scheduled)
        .unwrap();
    assert!(scheduled.momentum_state(SlotId(0)).is_some());

    for (a, b) in var_plain.data().iter().zip(var_scheduled.data()) {
        assert_relative_eq!(a, b, epsilon = 1e-12);
    }
}

#[test]
fn test_momentum_state_is_lazy_and_tangent_at_new_point() {
    let mut var = random_var(&[], 5, 2);
    let mut sgd = StiefelSgd::new(
        SgdConfig::new()
            .with_constant_learning_rate(0.05)
            .with_constant_momentum(0.9),
    )
    .unwrap();
    assert!(sgd.momentum_state(SlotId(3)).is_none());

    for _ in 0..3 {
        let grad = random_tangent_grad(&var);
        sgd.apply_dense(SlotId(3), &grad, &mut var).unwrap();
        sgd.advance_step();

        assert!(membership_error(&var) < 1e-10);

        // Stored momentum satisfies the tangent condition at the new point.
        let stiefel = ComplexStiefel::new(5, 2).unwrap();
        let momentum = real_to_complex(sgd.momentum_state(SlotId(3)).unwrap());
        let point = real_to_complex(&var);
        assert!(stiefel.is_vector_in_tangent_space(
            &point.mats()[0],
            &momentum.mats()[0],
            1e-10
        ));
    }
}

#[test]
fn test_distinct_slots_do_not_share_momentum() {
    let mut var_a = random_var(&[], 4, 2);
    let mut var_b = random_var(&[], 4, 2);
    let mut sgd = StiefelSgd::new(
        SgdConfig::new()
            .with_constant_learning_rate(0.05)
            .with_constant_momentum(0.5),
    )
    .unwrap();

    let grad_a = random_tangent_grad(&var_a);
    let grad_b = random_tangent_grad(&var_b);
    sgd.apply_dense(SlotId(0), &grad_a, &mut var_a).unwrap();
    sgd.apply_dense(SlotId(1), &grad_b, &mut var_b).unwrap();

    let m_a = sgd.momentum_state(SlotId(0)).unwrap();
    let m_b = sgd.momentum_state(SlotId(1)).unwrap();
    assert_ne!(m_a.data(), m_b.data());
}

#[test]
fn test_batched_long_run_stays_on_manifold() {
    // Batch of 3 independent 4x2 points, 100 momentum steps with random
    // tangent gradients: repeated retraction must not let the orthonormality
    // error drift.
    let mut var = random_var(&[3], 4, 2);
    let mut sgd = StiefelSgd::new(
        SgdConfig::new()
            .with_constant_learning_rate(0.01)
            .with_constant_momentum(0.9),
    )
    .unwrap();

    for _ in 0..100 {
        let grad = random_tangent_grad(&var);
        sgd.apply_dense(SlotId(0), &grad, &mut var).unwrap();
        sgd.advance_step();
    }

    assert!(membership_error(&var) < 1e-8);
    assert_eq!(sgd.iteration(), 100);
}

#[test]
fn test_explicit_state_interface() {
    let mut param = random_var(&[], 4, 2);
    let mut sgd = StiefelSgd::new(
        SgdConfig::new()
            .with_constant_learning_rate(0.05)
            .with_constant_momentum(0.9),
    )
    .unwrap();

    let mut state = sgd.create_state(&param);
    assert!(state.is_some());

    for _ in 0..2 {
        let grad = random_tangent_grad(&param);
        sgd.step(&grad, &mut param, &mut state).unwrap();
    }
    assert!(membership_error(&param) < 1e-10);

    let stiefel = ComplexStiefel::new(4, 2).unwrap();
    let momentum = real_to_complex(state.as_ref().unwrap());
    let point = real_to_complex(&param);
    assert!(stiefel.is_vector_in_tangent_space(&point.mats()[0], &momentum.mats()[0], 1e-10));
}

#[test]
fn test_gradient_shape_mismatch_is_rejected() {
    let mut var = random_var(&[], 4, 2);
    let grad = RealTensor::<f64>::zeros(&[], 3, 2).unwrap();

    let mut sgd = StiefelSgd::new(SgdConfig::new()).unwrap();
    let err = sgd.apply_dense(SlotId(0), &grad, &mut var).unwrap_err();
    assert!(matches!(err, OptimizerError::ManifoldError(_)));
}

#[test]
fn test_wide_matrix_parameter_is_rejected() {
    // q < p cannot be a Stiefel point.
    let mut var = RealTensor::<f64>::zeros(&[], 2, 4).unwrap();
    let grad = RealTensor::<f64>::zeros(&[], 2, 4).unwrap();

    let mut sgd = StiefelSgd::new(SgdConfig::new()).unwrap();
    assert!(sgd.apply_dense(SlotId(0), &grad, &mut var).is_err());
}
