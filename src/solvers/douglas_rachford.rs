//! Douglas-Rachford splitting between the data term and `reg * TV`.
//!
//! Iteration, from `x = v = y`:
//!
//! ```text
//! x <- prox_{gamma f}(v)
//! v <- v + prox_{gamma reg TV}(2 x - v) - x
//! ```
//!
//! `x` converges to a minimizer for any `gamma > 0`.
use crate::{
    objective::{problem::TVProblem, traits::ProximableFunction, tv_prior::TvProxOptions},
    operators::types::Image,
    solvers::{
        errors::SolverResult,
        logging::RunLogger,
        options::{DouglasRachfordParams, RunOptions},
        traits::{SolverCore, TVSolver, fmt_param},
    },
};

#[derive(Debug, Clone, Default)]
pub struct DouglasRachford {
    pub params: DouglasRachfordParams,
    pub prox_opts: TvProxOptions,
    core: SolverCore,
}

impl DouglasRachford {
    pub fn new(params: DouglasRachfordParams, run_opts: RunOptions) -> Self {
        Self { params, prox_opts: TvProxOptions::default(), core: SolverCore::new(run_opts) }
    }

    pub fn with_prox_options(mut self, prox_opts: TvProxOptions) -> Self {
        self.prox_opts = prox_opts;
        self
    }
}

impl TVSolver for DouglasRachford {
    fn name(&self) -> &'static str {
        "Douglas-Rachford"
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
        let data = problem.data_fidelity();
        let prior = problem.tv_prior().with_prox_options(self.prox_opts);
        let gamma = self.params.gamma;

        let mut x = problem.y.as_ref().clone();
        let mut v = x.clone();
        for k in 1..=n_iter {
            x = data.prox(&v, gamma)?;
            let mut reflected = &x * 2.0;
            reflected -= &v;
            v += &prior.prox(&reflected, problem.reg * gamma)?;
            v -= &x;
            log.iteration(k, || problem.reported_value(&x));
        }
        Ok(x)
    }
}
