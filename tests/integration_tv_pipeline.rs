//! Integration tests for the TV reconstruction pipeline.
//!
//! Purpose
//! -------
//! - Validate the end-to-end flow a benchmark harness follows: build a
//!   problem, bind it to each solver, run a fixed number of iterations and
//!   read back the labelled result.
//! - Check that the five splitting schemes agree on the minimizer of a small
//!   denoising problem whose solution is known through the TV prox.
//!
//! Coverage
//! --------
//! - `objective::problem::TVProblem` with identity and convolution models.
//! - `objective::benchmark::TVObjective` grid, data lifecycle and naming.
//! - `solvers::registry::SolverKind` build and sweep, and the
//!   `solvers::traits::TVSolver` lifecycle (skip, run, get_result).
//!
//! Exclusions
//! ----------
//! - Low-level operator identities (adjointness, projection bounds) are
//!   covered by unit tests.
//! - Python bindings.
use std::sync::Arc;

use ndarray::{Array3, Zip};
use tv_recon::{
    objective::{
        benchmark::TVObjective,
        isotropy::Isotropy,
        problem::TVProblem,
        traits::ProximableFunction,
        tv_prior::{TVPrior, TvProxOptions},
    },
    operators::{
        forward::{Convolution, ForwardOperator, Identity, gaussian_kernel},
        types::Image,
    },
    solvers::{
        douglas_rachford::DouglasRachford,
        errors::SolverError,
        forward_backward::ForwardBackward,
        options::{DouglasRachfordParams, ForwardBackwardParams, RunOptions},
        registry::{Overrides, SolverKind},
        traits::{ANISOTROPIC_SKIP_REASON, TVSolver},
    },
};

/// Step edge between columns 1 and 2 with one bright and one dark outlier.
fn edge_with_outliers() -> Image {
    let mut y = Array3::from_shape_fn((1, 4, 4), |(_, _, j)| if j >= 2 { 1.0 } else { 0.0 });
    y[[0, 1, 1]] += 0.8;
    y[[0, 2, 3]] -= 0.6;
    y
}

fn denoising(y: Image, reg: f64, isotropy: Isotropy) -> TVProblem {
    TVProblem::from_operator(Arc::new(Identity), y, reg, isotropy).expect("valid problem")
}

fn max_abs_diff(a: &Image, b: &Image) -> f64 {
    Zip::from(a).and(b).fold(0.0_f64, |acc, &x, &y| acc.max((x - y).abs()))
}

/// Run `solver` with the solver's own configuration and return `(u, obj)`.
fn solve(mut solver: Box<dyn TVSolver>, problem: &TVProblem, n_iter: usize) -> (Image, f64) {
    solver.set_objective(problem.clone());
    solver.run(n_iter).expect("supported problem");
    let result = solver.get_result().expect("ran");
    (result.u, result.obj)
}

#[test]
// Purpose
// -------
// Every solver reaches the denoising minimizer.
//
// Given
// -----
// - `A = I`, so the minimizer is `prox_{reg TV}(y)`, computed here with a
//   tight inner tolerance.
// - Default hyperparameters and 500 iterations per solver; Forward-Backward
//   and Douglas-Rachford get tight TV prox options.
//
// Expect
// ------
// - Each estimate is within 1e-3 of the reference and its objective within
//   1e-4 of the reference objective.
fn all_solvers_agree_on_denoising_minimizer() {
    let reg = 0.1;
    let y = edge_with_outliers();
    let problem = denoising(y.clone(), reg, Isotropy::Isotropic);

    let prior = TVPrior::new(Isotropy::Isotropic)
        .with_prox_options(TvProxOptions::new(20_000, 1e-12).expect("options"));
    let reference = prior.prox(&y, reg).expect("prox");
    let reference_obj = problem.reported_value(&reference);
    assert!(reference_obj < problem.reported_value(&y));

    let tight = TvProxOptions::new(5_000, 1e-10).expect("options");
    let solvers: Vec<Box<dyn TVSolver>> = vec![
        Box::new(
            ForwardBackward::new(ForwardBackwardParams::default(), RunOptions::default())
                .with_prox_options(tight),
        ),
        Box::new(
            DouglasRachford::new(DouglasRachfordParams::default(), RunOptions::default())
                .with_prox_options(tight),
        ),
        SolverKind::Admm.build(Overrides::default(), RunOptions::default()).expect("admm"),
        SolverKind::ChambollePock.build(Overrides::default(), RunOptions::default()).expect("cp"),
        SolverKind::CondatVu.build(Overrides::default(), RunOptions::default()).expect("cv"),
    ];

    for solver in solvers {
        let name = solver.name();
        let (u, obj) = solve(solver, &problem, 500);
        let err = max_abs_diff(&u, &reference);
        assert!(err < 1e-3, "{name}: max deviation {err}");
        assert!((obj - reference_obj).abs() < 1e-4, "{name}: {obj} vs {reference_obj}");
    }
}

#[test]
// Purpose
// -------
// Anisotropic problems are declined by every solver.
//
// Expect
// ------
// - `skip` returns the shared reason.
// - `run` fails with `Unsupported` and leaves no result behind.
fn anisotropic_problems_are_declined() {
    let problem = denoising(edge_with_outliers(), 0.1, Isotropy::Anisotropic);
    for kind in SolverKind::ALL {
        let mut solver = kind.build(Overrides::default(), RunOptions::default()).expect("defaults");
        assert_eq!(solver.skip(&problem).as_deref(), Some(ANISOTROPIC_SKIP_REASON));

        solver.set_objective(problem.clone());
        assert!(matches!(solver.run(10), Err(SolverError::Unsupported { .. })), "{kind}");
        assert_eq!(solver.get_result(), Err(SolverError::NoResult));
    }
}

#[test]
// Purpose
// -------
// With no regularization and `A = I`, the observation is the minimizer.
//
// Expect
// ------
// - Every solver returns an estimate within 1e-6 of `y` with objective near
//   zero.
fn zero_regularization_recovers_observation() {
    let y = edge_with_outliers();
    let problem = denoising(y.clone(), 0.0, Isotropy::Isotropic);
    for kind in SolverKind::ALL {
        let solver = kind.build(Overrides::default(), RunOptions::default()).expect("defaults");
        let (u, obj) = solve(solver, &problem, 300);
        let err = max_abs_diff(&u, &y);
        assert!(err < 1e-6, "{kind}: max deviation {err}");
        assert!(obj < 1e-10, "{kind}: objective {obj}");
    }
}

#[test]
// Purpose
// -------
// Forward-Backward decreases the objective on a deblurring problem.
//
// Given
// -----
// - 3x3 Gaussian blur of an 8x8 two-channel square, `reg = 0.05`.
// - `gamma_mult = 1.9`, just below the stability limit.
//
// Expect
// ------
// - Objective after `k + 1` iterations never exceeds the one after `k`.
fn forward_backward_is_monotone_on_deblurring() {
    let x_true = Array3::from_shape_fn((2, 8, 8), |(c, i, j)| {
        if (2..6).contains(&i) && (2..6).contains(&j) { 1.0 + c as f64 } else { 0.0 }
    });
    let op = Convolution::new(gaussian_kernel(3, 1.0).expect("kernel")).expect("valid kernel");
    let y = op.apply(&x_true);
    let problem = TVProblem::from_operator(Arc::new(op), y, 0.05, Isotropy::Isotropic).expect("valid");

    let tight = TvProxOptions::new(5_000, 1e-10).expect("options");
    let mut previous = f64::INFINITY;
    for n_iter in 0..15 {
        let solver = ForwardBackward::new(ForwardBackwardParams::new(1.9).expect("gamma_mult"), RunOptions::default())
            .with_prox_options(tight);
        let (_, obj) = solve(Box::new(solver), &problem, n_iter);
        assert!(obj <= previous + 1e-9, "iteration {n_iter}: {obj} > {previous}");
        previous = obj;
    }
}

#[test]
// Purpose
// -------
// Deblurring runs improve on both natural starting points.
//
// Expect
// ------
// - After 200 iterations every solver beats the objective at `y` and at the
//   zero image.
fn deblurring_improves_on_observation_and_zero() {
    let x_true = Array3::from_shape_fn((1, 10, 10), |(_, i, j)| if i + j >= 10 { 1.0 } else { 0.2 });
    let op = Convolution::new(gaussian_kernel(5, 1.5).expect("kernel")).expect("valid kernel");
    let y = op.apply(&x_true);
    let problem = TVProblem::from_operator(Arc::new(op), y.clone(), 0.02, Isotropy::Isotropic).expect("valid");

    let at_y = problem.reported_value(&y);
    let at_zero = problem.reported_value(&Image::zeros(y.raw_dim()));
    for kind in SolverKind::ALL {
        let solver = kind.build(Overrides::default(), RunOptions::default()).expect("defaults");
        let (_, obj) = solve(solver, &problem, 200);
        assert!(obj < at_y && obj < at_zero, "{kind}: {obj} vs y {at_y}, zero {at_zero}");
    }
}

#[test]
// Purpose
// -------
// Drive the objective grid against every solver sweep the way a harness
// does.
//
// Expect
// ------
// - Anisotropic grid points are skipped by all 28 configurations.
// - Isotropic points run, report finite non-negative objectives, and
//   produce final results labelled with the observation model.
fn harness_sweep_over_objective_grid() {
    let x_true = Array3::from_shape_fn((1, 6, 6), |(_, i, j)| if i < 3 && j < 3 { 1.0 } else { 0.0 });
    let op: Arc<dyn ForwardOperator> =
        Arc::new(Convolution::new(gaussian_kernel(3, 0.8).expect("kernel")).expect("valid kernel"));
    let mut y = op.apply(&x_true);
    y[[0, 4, 4]] += 0.3;
    let anorm2 = op.norm2_bound();

    let mut n_runs = 0;
    let mut n_skips = 0;
    for params in TVObjective::grid() {
        let mut objective = TVObjective::new(params);
        objective
            .set_data(x_true.clone(), "blur", op.clone(), y.clone(), anorm2)
            .expect("consistent data");
        let problem = objective.get_objective().expect("data set");
        assert_eq!(objective.get_one_result().expect("data set").dim(), y.dim());

        for kind in SolverKind::ALL {
            for mut solver in kind.sweep(RunOptions::default()) {
                if solver.skip(&problem).is_some() {
                    assert_eq!(params.isotropy, Isotropy::Anisotropic);
                    n_skips += 1;
                    continue;
                }
                solver.set_objective(problem.clone());
                solver.run(20).expect("supported");
                let result = solver.get_result().expect("ran");
                let obj = objective.evaluate_result(&result);
                assert!(obj.is_finite() && obj >= 0.0, "{}: {obj}", result.name);

                let saved = objective.save_final_results(&result.name, &result.u).expect("data set");
                assert!(saved.name.starts_with(kind.as_str()));
                assert!(saved.name.ends_with(", type_A = blur"));
                n_runs += 1;
            }
        }
    }
    assert_eq!(n_runs, 3 * 28);
    assert_eq!(n_skips, 3 * 28);
}
