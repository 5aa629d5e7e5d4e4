//! ADMM on the split `z = L x` with scaled dual `w`.
//!
//! Iteration, from `x = 0`, `z = 0`, `w = 0`:
//!
//! ```text
//! x <- argmin 0.5 ||L x - z + w||^2 + ||A x - y||^2 / (2 gamma)   (inexact)
//! z <- shrink(w + L x, reg / gamma)
//! w <- w + L x - z
//! ```
//!
//! The x-update is delegated to [`admm_inner`](crate::solvers::admm_inner),
//! warm-started at the previous iterate.
use crate::{
    objective::{problem::TVProblem, tv_prior::shrink},
    operators::{
        gradient::GradientOperator,
        types::{GradField, Image},
    },
    solvers::{
        admm_inner::{self, AugmentedLsq},
        errors::SolverResult,
        logging::RunLogger,
        options::{AdmmParams, RunOptions},
        traits::{SolverCore, TVSolver, fmt_param},
    },
};

#[derive(Debug, Clone, Default)]
pub struct Admm {
    pub params: AdmmParams,
    core: SolverCore,
}

impl Admm {
    pub fn new(params: AdmmParams, run_opts: RunOptions) -> Self {
        Self { params, core: SolverCore::new(run_opts) }
    }
}

impl TVSolver for Admm {
    fn name(&self) -> &'static str {
        "ADMM"
    }

    fn label(&self) -> String {
        format!("{}[gamma={}]", self.name(), fmt_param(self.params.gamma))
    }

    fn core(&self) -> &SolverCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SolverCore {
        &mut self.core
    }

    fn iterate(&self, problem: &TVProblem, n_iter: usize, log: &RunLogger) -> SolverResult<Image> {
        let l = GradientOperator::new();
        let gamma = self.params.gamma;
        let (channels, rows, cols) = problem.dim();

        let mut x = Image::zeros((channels, rows, cols));
        let mut z = GradField::zeros((channels, 2, rows, cols));
        let mut w = z.clone();
        for k in 1..=n_iter {
            let target = &z - &w;
            let subproblem = AugmentedLsq::new(problem, target, gamma);
            x = admm_inner::solve(subproblem, x, self.params.inner, log.is_enabled())?;

            let lx = l.apply(&x);
            z = shrink(&(&w + &lx), problem.reg / gamma, problem.isotropy);
            w += &lx;
            w -= &z;
            log.iteration(k, || problem.reported_value(&x));
        }
        Ok(x)
    }
}
