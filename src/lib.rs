//! tv_recon — total-variation image reconstruction with proximal splitting.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the solvers to Python via the `_tv_recon` extension module.
//! The crate minimizes
//!
//! ```text
//! F(u) = 0.5 ||A u - y||^2 + reg * TV(u)
//! ```
//!
//! over images `u` of shape `(channel, height, width)`, for a linear forward
//! model `A` (identity for denoising, convolution for deblurring).
//!
//! Key behaviors
//! -------------
//! - [`operators`]: discrete gradient `L` / `L*`, forward models, CG.
//! - [`objective`]: data term, TV prior (dual-ball projection, TV prox),
//!   objective evaluator, validated problems, and the benchmark objective.
//! - [`solvers`]: Forward-Backward, Douglas-Rachford, ADMM, Chambolle-Pock and
//!   Condat-Vu behind the [`solvers::traits::TVSolver`] lifecycle.
//! - With `python-bindings`, `_tv_recon.solve_tv`, `_tv_recon.skip_reason`
//!   and `_tv_recon.tv_value`.
//!
//! Invariants & assumptions
//! ------------------------
//! - All heavy numerical work lives in the inner modules; the items below
//!   only convert inputs, call into Rust, and map errors.
//! - Every solver runs a fixed number of iterations; there is no adaptive
//!   stopping and no divergence detection.
//!
//! Conventions
//! -----------
//! - Python images may be `(H, W)` (single channel) or `(C, H, W)`; results
//!   are always returned as `(C, H, W)`.
//! - Errors from core Rust code are converted to `ValueError` at the PyO3
//!   boundary.
//!
//! Testing notes
//! -------------
//! - Numerical behavior is covered by unit tests in the inner modules and by
//!   `tests/integration_tv_pipeline.rs`, which drives every solver through a
//!   harness-style sweep.

pub mod objective;
pub mod operators;
pub mod solvers;
pub mod utils;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray3};

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    objective::{isotropy::Isotropy, traits::ProximableFunction, tv_prior::TVPrior},
    solvers::{
        options::{InnerSolver, RunOptions},
        registry::{Overrides, SolverKind},
        traits::TVSolver,
    },
    utils::{build_problem, extract_image},
};

/// solve_tv — run one solver on a denoising or deblurring problem.
///
/// Parameters
/// ----------
/// - `solver`: `str`
///   Solver name, e.g. `"Chambolle-Pock"` (case insensitive).
/// - `y`: `ndarray`
///   Observation, `(H, W)` or `(C, H, W)` float64.
/// - `reg`: `float`
///   Regularization weight, `>= 0`.
/// - `n_iter`: `int`
///   Exact number of iterations.
/// - `isotropy`: `str`
///   `"isotropic"` (default) or `"anisotropic"`.
/// - `kernel`: `ndarray | None`
///   Odd-sized 2-D blur kernel; `None` means denoising.
/// - `gamma`, `gamma_mult`, `tau_mult`: `float | None`
///   Hyperparameter overrides; `None` keeps the solver default.
/// - `inner`: `str | None`
///   ADMM x-update, `"gd"` or `"lbfgs"`; `None` keeps gradient descent.
/// - `inner_iters`: `int`
///   Inner iterations when `inner` is given.
/// - `verbose`: `bool`
///   Emit progress records when built with `obs_slog`.
///
/// Returns
/// -------
/// `(name, u, obj)` with the labelled result name, the `(C, H, W)` estimate
/// and the reported objective.
///
/// Errors
/// ------
/// - `ValueError` for unknown names, invalid parameters, invalid data, or a
///   configuration the solver does not support.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (
    solver, y, reg, n_iter, isotropy = "isotropic", kernel = None, gamma = None,
    gamma_mult = None, tau_mult = None, inner = None, inner_iters = 10, verbose = false
))]
#[allow(clippy::too_many_arguments)]
pub fn solve_tv<'py>(
    py: Python<'py>, solver: &str, y: &Bound<'py, PyAny>, reg: f64, n_iter: usize,
    isotropy: &str, kernel: Option<&Bound<'py, PyAny>>, gamma: Option<f64>,
    gamma_mult: Option<f64>, tau_mult: Option<f64>, inner: Option<&str>, inner_iters: usize,
    verbose: bool,
) -> PyResult<(String, Bound<'py, PyArray3<f64>>, f64)> {
    let kind: SolverKind = solver.parse()?;
    let problem = build_problem(y, reg, isotropy, kernel)?;
    let run_opts = RunOptions { verbose, ..RunOptions::default() };
    let inner = inner.map(|name| InnerSolver::from_name(name, inner_iters)).transpose()?;

    let mut solver = kind.build(Overrides { gamma, gamma_mult, tau_mult, inner }, run_opts)?;
    solver.set_objective(problem);
    solver.run(n_iter)?;
    let result = solver.get_result()?;
    Ok((result.name, result.u.into_pyarray(py), result.obj))
}

/// skip_reason — why `solver` rejects a problem with this isotropy, if it does.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (solver, isotropy = "isotropic"))]
pub fn skip_reason(solver: &str, isotropy: &str) -> PyResult<Option<String>> {
    let kind: SolverKind = solver.parse()?;
    let isotropy: Isotropy = isotropy.parse()?;
    let template = crate::objective::problem::TVProblem::from_operator(
        std::sync::Arc::new(crate::operators::forward::Identity),
        crate::operators::types::Image::zeros((1, 1, 1)),
        0.0,
        isotropy,
    )?;
    let solver = kind.build(Overrides::default(), RunOptions::default())?;
    Ok(solver.skip(&template))
}

/// tv_value — anisotropic or isotropic TV of an image.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (u, isotropy = "isotropic"))]
pub fn tv_value<'py>(u: &Bound<'py, PyAny>, isotropy: &str) -> PyResult<f64> {
    let u = extract_image(u)?;
    let isotropy: Isotropy = isotropy.parse()?;
    Ok(TVPrior::new(isotropy).value(&u))
}

/// `_tv_recon` — Python extension module initializer.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _tv_recon(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(solve_tv, m)?)?;
    m.add_function(wrap_pyfunction!(skip_reason, m)?)?;
    m.add_function(wrap_pyfunction!(tv_value, m)?)?;
    Ok(())
}
