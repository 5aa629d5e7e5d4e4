//! solvers::admm_inner — x-update of ADMM.
//!
//! Purpose
//! -------
//! Approximately minimize the augmented least-squares subproblem
//!
//! ```text
//! q(x) = 0.5 ||L x - t||^2 + ||A x - y||^2 / (2 gamma),    t = z - w
//! ```
//!
//! with gradient `L*(L x - t) + (1/gamma) A*(A x - y)` and Lipschitz bound
//! `LNORM2 + anorm2 / gamma`.
//!
//! Key behaviors
//! -------------
//! - [`gradient_descent`]: fixed number of explicit `1 / Lip` steps.
//! - [`lbfgs`]: argmin L-BFGS with More-Thuente line search on the
//!   flattened image; skipped when the warm start is already stationary.
//!   With feature `obs_slog` and a verbose run, argmin's `SlogLogger`
//!   observer is attached.
//!
//! Conventions
//! -----------
//! - Both strategies warm-start at the previous ADMM iterate.
//! - argmin works on `Array1<f64>`; images are flattened in logical order.
use argmin::{
    core::{CostFunction, Error, Executor, Gradient},
    solver::{linesearch::MoreThuenteLineSearch, quasinewton::LBFGS},
};
use ndarray::Array1;

use crate::{
    objective::problem::TVProblem,
    operators::{
        forward::ForwardOperator,
        gradient::GradientOperator,
        linalg::norm2,
        types::{GradField, Image, ImageDim, LNORM2},
    },
    solvers::{errors::SolverResult, options::InnerSolver},
};

/// Flattened parameter / gradient vector seen by argmin.
pub type Flat = Array1<f64>;

pub type MoreThuenteLS = MoreThuenteLineSearch<Flat, Flat, f64>;

pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Flat, Flat, f64>;

/// Augmented least-squares subproblem of one ADMM iteration.
#[derive(Debug)]
pub struct AugmentedLsq<'a> {
    op: &'a dyn ForwardOperator,
    y: &'a Image,
    l: GradientOperator,
    target: GradField,
    gamma: f64,
    anorm2: f64,
}

impl<'a> AugmentedLsq<'a> {
    /// Bind the subproblem for `t = target` and penalty `gamma`.
    pub fn new(problem: &'a TVProblem, target: GradField, gamma: f64) -> Self {
        Self {
            op: problem.op.as_ref(),
            y: &problem.y,
            l: GradientOperator::new(),
            target,
            gamma,
            anorm2: problem.anorm2,
        }
    }

    pub fn dim(&self) -> ImageDim {
        self.y.dim()
    }

    pub fn lipschitz(&self) -> f64 {
        LNORM2 + self.anorm2 / self.gamma
    }

    pub fn value(&self, x: &Image) -> f64 {
        let mut lx = self.l.apply(x);
        lx -= &self.target;
        let mut r = self.op.apply(x);
        r -= self.y;
        0.5 * norm2(&lx) + norm2(&r) / (2.0 * self.gamma)
    }

    pub fn grad(&self, x: &Image) -> Image {
        let mut lx = self.l.apply(x);
        lx -= &self.target;
        let mut r = self.op.apply(x);
        r -= self.y;
        let mut g = self.op.adjoint(&r);
        g /= self.gamma;
        g += &self.l.adjoint(&lx);
        g
    }

    fn unflatten(&self, theta: &Flat) -> Result<Image, Error> {
        Ok(Image::from_shape_vec(self.dim(), theta.to_vec())?)
    }
}

impl CostFunction for AugmentedLsq<'_> {
    type Param = Flat;
    type Output = f64;

    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        Ok(self.value(&self.unflatten(theta)?))
    }
}

impl Gradient for AugmentedLsq<'_> {
    type Param = Flat;
    type Gradient = Flat;

    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        Ok(flatten(&self.grad(&self.unflatten(theta)?)))
    }
}

pub fn flatten(x: &Image) -> Flat {
    x.iter().copied().collect()
}

/// Dispatch on the configured inner strategy.
///
/// # Errors
/// Propagates argmin failures from the L-BFGS branch.
pub fn solve(f: AugmentedLsq<'_>, x0: Image, inner: InnerSolver, verbose: bool) -> SolverResult<Image> {
    match inner {
        InnerSolver::GradientDescent { iters } => Ok(gradient_descent(&f, x0, iters)),
        InnerSolver::Lbfgs { max_iters, mem } => lbfgs(f, x0, max_iters, mem, verbose),
    }
}

/// `iters` steps of `x <- x - grad(x) / Lip`.
pub fn gradient_descent(f: &AugmentedLsq<'_>, mut x: Image, iters: usize) -> Image {
    let step = 1.0 / f.lipschitz();
    for _ in 0..iters {
        let g = f.grad(&x);
        x.scaled_add(-step, &g);
    }
    x
}

/// L-BFGS (More-Thuente) for at most `max_iters` iterations.
///
/// Returns `x0` unchanged when its gradient is exactly zero or when argmin
/// reports no best parameter.
///
/// # Errors
/// Any argmin error, mapped through `From<argmin::core::Error>`.
pub fn lbfgs(
    f: AugmentedLsq<'_>, x0: Image, max_iters: usize, mem: usize, verbose: bool,
) -> SolverResult<Image> {
    let g0 = f.grad(&x0);
    if g0.iter().all(|&gi| gi == 0.0) {
        return Ok(x0);
    }
    let dim = f.dim();
    let theta0 = flatten(&x0);

    let solver: LbfgsMoreThuente = LBFGS::new(MoreThuenteLS::new(), mem);
    let optimizer = Executor::new(f, solver)
        .configure(|state| state.param(theta0).max_iters(max_iters as u64));
    #[cfg(feature = "obs_slog")]
    let optimizer = if verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always)
    } else {
        optimizer
    };
    #[cfg(not(feature = "obs_slog"))]
    let _ = verbose;

    let mut result = optimizer.run()?.state().clone();
    if !result.get_best_cost().is_finite() {
        return Ok(x0);
    }
    match result.take_best_param() {
        Some(theta) => Ok(Image::from_shape_vec(dim, theta.to_vec()).unwrap_or(x0)),
        None => Ok(x0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operators::forward::{Convolution, Identity, gaussian_kernel};
    use approx::assert_relative_eq;
    use finitediff::FiniteDiff;
    use ndarray::Array;
    use rand::{Rng, SeedableRng, rngs::StdRng};
    use std::sync::Arc;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The analytic gradient of the subproblem against finite differences.
    // - Monotone decrease of both inner strategies.
    // - The stationary warm-start shortcut of the L-BFGS branch.
    // -------------------------------------------------------------------------

    fn blur_problem(rng: &mut StdRng) -> TVProblem {
        let op = Convolution::new(gaussian_kernel(3, 0.9).expect("kernel")).expect("valid kernel");
        let y = Array::from_shape_fn((1, 5, 5), |_| rng.gen_range(0.0..1.0));
        TVProblem::from_operator(Arc::new(op), y, 0.1, crate::objective::isotropy::Isotropy::Isotropic)
            .expect("valid problem")
    }

    fn random_target(rng: &mut StdRng, dim: ImageDim) -> GradField {
        Array::from_shape_fn((dim.0, 2, dim.1, dim.2), |_| rng.gen_range(-0.5..0.5))
    }

    #[test]
    // Purpose
    // -------
    // The analytic gradient matches central finite differences of the cost.
    //
    // Given
    // -----
    // - Gaussian blur problem on a 5x5 image, random target, gamma = 0.7.
    //
    // Expect
    // ------
    // - Max absolute deviation below 1e-5.
    fn gradient_matches_finite_differences() {
        let mut rng = StdRng::seed_from_u64(17);
        let problem = blur_problem(&mut rng);
        let f = AugmentedLsq::new(&problem, random_target(&mut rng, problem.dim()), 0.7);
        let theta = flatten(&Array::from_shape_fn(problem.dim(), |_| rng.gen_range(-1.0..1.0)));

        let analytic = f.gradient(&theta).expect("gradient");
        let numeric = theta.central_diff(&|t: &Flat| f.cost(t).expect("cost"));
        for (a, n) in analytic.iter().zip(numeric.iter()) {
            assert_relative_eq!(*a, *n, epsilon = 1e-5);
        }
    }

    #[test]
    fn both_strategies_decrease_the_subproblem() {
        let mut rng = StdRng::seed_from_u64(23);
        let problem = blur_problem(&mut rng);
        let target = random_target(&mut rng, problem.dim());
        let x0 = Image::zeros(problem.dim());

        let f = AugmentedLsq::new(&problem, target.clone(), 1.0);
        let start = f.value(&x0);
        let gd = gradient_descent(&f, x0.clone(), 10);
        assert!(f.value(&gd) < start);

        let quasi = lbfgs(AugmentedLsq::new(&problem, target, 1.0), x0, 20, 7, false)
            .expect("lbfgs run");
        assert!(f.value(&quasi) <= f.value(&gd) + 1e-9);
    }

    #[test]
    // Purpose
    // -------
    // A stationary warm start is returned untouched by L-BFGS.
    //
    // Given
    // -----
    // - Identity operator, y = 0, target = 0: x = 0 is the minimizer.
    fn lbfgs_skips_stationary_start() {
        let problem = TVProblem::from_operator(
            Arc::new(Identity),
            Image::zeros((1, 3, 3)),
            0.1,
            crate::objective::isotropy::Isotropy::Isotropic,
        )
        .expect("valid problem");
        let f = AugmentedLsq::new(&problem, GradField::zeros((1, 2, 3, 3)), 1.0);
        let x = lbfgs(f, Image::zeros((1, 3, 3)), 5, 7, false).expect("lbfgs");
        assert!(x.iter().all(|&v| v == 0.0));
    }
}
