//! solvers::traits — lifecycle shared by every TV solver.
//!
//! Purpose
//! -------
//! Define the contract a benchmark harness drives: check whether a problem
//! is supported, bind it, run a fixed number of iterations, and read back a
//! named estimate with its objective value.
//!
//! Key behaviors
//! -------------
//! - [`TVSolver`] provides `set_objective`, `run`, `get_result` and
//!   `get_one_result` on top of two solver-specific hooks: `label` (name
//!   with resolved hyperparameters) and `iterate` (the algorithm itself).
//! - [`SolverCore`] holds the bound problem, the run options and the last
//!   result; each solver embeds one.
//!
//! Invariants & assumptions
//! ------------------------
//! - `set_objective` replaces any previously bound problem and clears the
//!   previous result.
//! - `run` re-initializes every iterate, so results never depend on earlier
//!   runs.
//! - The reported objective is always `0.5||A u - y||^2 + reg TV_iso(u)`.
use crate::{
    objective::{isotropy::Isotropy, problem::TVProblem},
    operators::types::Image,
    solvers::{
        errors::{SolverError, SolverResult},
        logging::RunLogger,
        options::RunOptions,
    },
};

/// Reason reported by every solver for anisotropic problems.
pub const ANISOTROPIC_SKIP_REASON: &str = "solver does not work with anisotropic regularization";

/// Named estimate returned by [`TVSolver::get_result`].
#[derive(Debug, Clone, PartialEq)]
pub struct SolveResult {
    pub name: String,
    pub u: Image,
    pub obj: f64,
}

/// Bound state embedded in every solver.
#[derive(Debug, Clone, Default)]
pub struct SolverCore {
    pub run_opts: RunOptions,
    problem: Option<TVProblem>,
    result: Option<(Image, f64)>,
}

impl SolverCore {
    pub fn new(run_opts: RunOptions) -> Self {
        Self { run_opts, problem: None, result: None }
    }

    pub fn bind(&mut self, problem: TVProblem) {
        self.problem = Some(problem);
        self.result = None;
    }

    pub fn problem(&self) -> SolverResult<&TVProblem> {
        self.problem.as_ref().ok_or(SolverError::NotInitialized)
    }

    pub fn store(&mut self, u: Image, obj: f64) {
        self.result = Some((u, obj));
    }

    pub fn result(&self) -> SolverResult<&(Image, f64)> {
        self.result.as_ref().ok_or(SolverError::NoResult)
    }
}

/// TV reconstruction solver driven by a benchmark harness.
///
/// Required:
/// - `name()`: display name, e.g. `"Douglas-Rachford"`.
/// - `label()`: name with resolved hyperparameters, e.g.
///   `"Douglas-Rachford[gamma=1]"`. Called after a problem is bound.
/// - `core()` / `core_mut()`: access to the embedded [`SolverCore`].
/// - `iterate(problem, n_iter, log)`: run exactly `n_iter` iterations from
///   a fresh initialization and return the primal estimate.
///
/// Optional:
/// - `skip(problem)`: `Some(reason)` rejects the configuration. Defaults to
///   rejecting anisotropic TV.
pub trait TVSolver {
    // Required methods
    fn name(&self) -> &'static str;
    fn label(&self) -> String;
    fn core(&self) -> &SolverCore;
    fn core_mut(&mut self) -> &mut SolverCore;
    fn iterate(&self, problem: &TVProblem, n_iter: usize, log: &RunLogger) -> SolverResult<Image>;

    // Optional methods
    fn skip(&self, problem: &TVProblem) -> Option<String> {
        match problem.isotropy {
            Isotropy::Anisotropic => Some(ANISOTROPIC_SKIP_REASON.to_string()),
            Isotropy::Isotropic => None,
        }
    }

    // Provided lifecycle
    fn set_objective(&mut self, problem: TVProblem) {
        self.core_mut().bind(problem);
    }

    /// Run `n_iter` iterations and store the estimate and its objective.
    ///
    /// # Errors
    /// - [`SolverError::NotInitialized`] before `set_objective`.
    /// - [`SolverError::Unsupported`] if `skip` rejects the bound problem.
    /// - Any error raised by `iterate`.
    fn run(&mut self, n_iter: usize) -> SolverResult<()> {
        let problem = self.core().problem()?.clone();
        if let Some(reason) = self.skip(&problem) {
            return Err(SolverError::Unsupported { solver: self.name(), reason });
        }
        let log = RunLogger::new(&self.label(), &self.core().run_opts);
        log.start(n_iter, || problem.reported_value(&problem.y));

        let u = self.iterate(&problem, n_iter, &log)?;
        let obj = problem.reported_value(&u);
        log.finish(n_iter, obj);
        self.core_mut().store(u, obj);
        Ok(())
    }

    /// # Errors
    /// - [`SolverError::NoResult`] before the first successful `run`.
    fn get_result(&self) -> SolverResult<SolveResult> {
        let (u, obj) = self.core().result()?;
        Ok(SolveResult { name: self.label(), u: u.clone(), obj: *obj })
    }

    /// Zero image shaped like the bound observation.
    ///
    /// # Errors
    /// - [`SolverError::NotInitialized`] before `set_objective`.
    fn get_one_result(&self) -> SolverResult<Image> {
        Ok(Image::zeros(self.core().problem()?.y.raw_dim()))
    }
}

/// Format a hyperparameter the way result names print it (`1`, `0.5`).
pub fn fmt_param(value: f64) -> String {
    format!("{value}")
}
