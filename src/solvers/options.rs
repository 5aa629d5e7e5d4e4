//! solvers::options — validated hyperparameters and run configuration.
//!
//! Purpose
//! -------
//! Hold the hyperparameters of each solver together with the grid a
//! benchmark sweeps, plus the run-level options shared by every solver.
//!
//! Key behaviors
//! -------------
//! - Every params struct has a validating `new` and a `Default` picked from
//!   its grid.
//! - `grid()` enumerates the benchmark sweep in a fixed order.
//! - [`InnerSolver`] selects how ADMM performs its x-update.
//!
//! Invariants & assumptions
//! ------------------------
//! - All step parameters are finite and strictly positive after `new`.
//! - Step sizes themselves (`gamma`, `tau`) are derived at run time from
//!   these multipliers, `anorm2` and `LNORM2`.
use crate::solvers::{
    errors::{SolverError, SolverResult},
    validation::{validate_inner_iters, validate_step},
};

/// Default L-BFGS history size for the ADMM inner solve.
pub const DEFAULT_LBFGS_MEM: usize = 7;

/// Forward-Backward: `gamma = gamma_mult / anorm2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForwardBackwardParams {
    pub gamma_mult: f64,
}

impl ForwardBackwardParams {
    pub const GAMMA_MULT_GRID: [f64; 4] = [0.1, 0.5, 1.0, 1.9];

    pub fn new(gamma_mult: f64) -> SolverResult<Self> {
        Ok(Self { gamma_mult: validate_step("gamma_mult", gamma_mult)? })
    }

    pub fn grid() -> Vec<Self> {
        Self::GAMMA_MULT_GRID.iter().map(|&gamma_mult| Self { gamma_mult }).collect()
    }
}

impl Default for ForwardBackwardParams {
    fn default() -> Self {
        Self { gamma_mult: 1.0 }
    }
}

/// Douglas-Rachford: prox step `gamma` on both terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DouglasRachfordParams {
    pub gamma: f64,
}

impl DouglasRachfordParams {
    pub const GAMMA_GRID: [f64; 3] = [0.1, 1.0, 10.0];

    pub fn new(gamma: f64) -> SolverResult<Self> {
        Ok(Self { gamma: validate_step("gamma", gamma)? })
    }

    pub fn grid() -> Vec<Self> {
        Self::GAMMA_GRID.iter().map(|&gamma| Self { gamma }).collect()
    }
}

impl Default for DouglasRachfordParams {
    fn default() -> Self {
        Self { gamma: 1.0 }
    }
}

/// ADMM x-update strategy.
///
/// Variants:
/// - `GradientDescent { iters }`: `iters` explicit steps of size `1 / Lip`
///   on the augmented least-squares subproblem.
/// - `Lbfgs { max_iters, mem }`: argmin L-BFGS with More-Thuente line search
///   on the flattened image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InnerSolver {
    GradientDescent { iters: usize },
    Lbfgs { max_iters: usize, mem: usize },
}

impl InnerSolver {
    pub fn gradient_descent(iters: usize) -> SolverResult<Self> {
        Ok(InnerSolver::GradientDescent { iters: validate_inner_iters(iters)? })
    }

    pub fn lbfgs(max_iters: usize, mem: usize) -> SolverResult<Self> {
        if mem == 0 {
            return Err(SolverError::InvalidLbfgsMem { mem });
        }
        Ok(InnerSolver::Lbfgs { max_iters: validate_inner_iters(max_iters)?, mem })
    }
}

impl InnerSolver {
    /// Strategy by name with `iters` inner iterations.
    ///
    /// `"gd"` / `"gradient-descent"` or `"lbfgs"` (history
    /// [`DEFAULT_LBFGS_MEM`]); case and separators are ignored.
    ///
    /// # Errors
    /// - [`SolverError::UnknownSolver`] for any other name.
    /// - [`SolverError::InvalidInnerIters`] for `iters == 0`.
    pub fn from_name(name: &str, iters: usize) -> SolverResult<Self> {
        let key: String = name.chars().filter(|c| c.is_ascii_alphanumeric()).collect::<String>().to_lowercase();
        match key.as_str() {
            "gd" | "gradientdescent" => InnerSolver::gradient_descent(iters),
            "lbfgs" => InnerSolver::lbfgs(iters, DEFAULT_LBFGS_MEM),
            _ => Err(SolverError::UnknownSolver {
                name: name.to_string(),
                reason: "Valid inner solvers are gradient-descent (gd) or lbfgs (case insensitive).",
            }),
        }
    }
}

impl Default for InnerSolver {
    fn default() -> Self {
        InnerSolver::GradientDescent { iters: 10 }
    }
}

/// ADMM: penalty `gamma` and inner solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdmmParams {
    pub gamma: f64,
    pub inner: InnerSolver,
}

impl AdmmParams {
    pub const GAMMA_GRID: [f64; 3] = [0.5, 1.0, 2.0];

    pub fn new(gamma: f64, inner: InnerSolver) -> SolverResult<Self> {
        Ok(Self { gamma: validate_step("gamma", gamma)?, inner })
    }

    pub fn grid() -> Vec<Self> {
        Self::GAMMA_GRID
            .iter()
            .map(|&gamma| Self { gamma, inner: InnerSolver::default() })
            .collect()
    }
}

impl Default for AdmmParams {
    fn default() -> Self {
        Self { gamma: 1.0, inner: InnerSolver::default() }
    }
}

/// Chambolle-Pock: `tau = tau_mult / (LNORM2 gamma)`, dual step `gamma`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChambollePockParams {
    pub tau_mult: f64,
    pub gamma: f64,
}

impl ChambollePockParams {
    pub const TAU_MULT_GRID: [f64; 3] = [0.1, 0.5, 0.9];
    pub const GAMMA_GRID: [f64; 3] = [0.35, 1.0, 10.0];

    pub fn new(tau_mult: f64, gamma: f64) -> SolverResult<Self> {
        Ok(Self { tau_mult: validate_step("tau_mult", tau_mult)?, gamma: validate_step("gamma", gamma)? })
    }

    pub fn grid() -> Vec<Self> {
        product(&Self::TAU_MULT_GRID, &Self::GAMMA_GRID)
            .map(|(tau_mult, gamma)| Self { tau_mult, gamma })
            .collect()
    }
}

impl Default for ChambollePockParams {
    fn default() -> Self {
        Self { tau_mult: 0.9, gamma: 1.0 }
    }
}

/// Condat-Vu: `tau = tau_mult / (anorm2 / 2 + LNORM2 gamma)`, dual step `gamma`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CondatVuParams {
    pub tau_mult: f64,
    pub gamma: f64,
}

impl CondatVuParams {
    pub const TAU_MULT_GRID: [f64; 3] = [0.1, 0.5, 0.9];
    pub const GAMMA_GRID: [f64; 3] = [0.1, 1.0, 10.0];

    pub fn new(tau_mult: f64, gamma: f64) -> SolverResult<Self> {
        Ok(Self { tau_mult: validate_step("tau_mult", tau_mult)?, gamma: validate_step("gamma", gamma)? })
    }

    pub fn grid() -> Vec<Self> {
        product(&Self::TAU_MULT_GRID, &Self::GAMMA_GRID)
            .map(|(tau_mult, gamma)| Self { tau_mult, gamma })
            .collect()
    }
}

impl Default for CondatVuParams {
    fn default() -> Self {
        Self { tau_mult: 0.9, gamma: 1.0 }
    }
}

/// Run-level options shared by all solvers.
///
/// - `verbose`: emit progress records (only with feature `obs_slog`).
/// - `log_every`: iterations between progress records.
///
/// Default: `verbose = false`, `log_every = 100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub verbose: bool,
    pub log_every: usize,
}

impl RunOptions {
    pub fn new(verbose: bool, log_every: usize) -> SolverResult<Self> {
        if log_every == 0 {
            return Err(SolverError::InvalidLogEvery { log_every });
        }
        Ok(Self { verbose, log_every })
    }
}

impl Default for RunOptions {
    fn default() -> Self {
        Self { verbose: false, log_every: 100 }
    }
}

fn product<'a>(outer: &'a [f64], inner: &'a [f64]) -> impl Iterator<Item = (f64, f64)> + 'a {
    outer.iter().flat_map(move |&a| inner.iter().map(move |&b| (a, b)))
}
