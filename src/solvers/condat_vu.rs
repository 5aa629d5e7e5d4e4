//! Condat-Vu primal-dual iteration with an explicit data gradient.
//!
//! Iteration, from `x = y`, `v = L y`, with
//! `tau = tau_mult / (anorm2 / 2 + LNORM2 gamma)`:
//!
//! ```text
//! x_prev = x
//! x <- x - tau A*(A x - y) - tau L* v
//! v <- P_reg(v + gamma L(2 x - x_prev))
//! ```
//!
//! Unlike Chambolle-Pock the data term is never prox'ed, so blur operators
//! cost one `A` / `A*` pair per iteration.
use crate::{
    objective::{problem::TVProblem, traits::ProximableFunction, tv_prior::project_dual_ball_inplace},
    operators::{gradient::GradientOperator, types::{Image, LNORM2}},
    solvers::{
        errors::SolverResult,
        logging::RunLogger,
        options::{CondatVuParams, RunOptions},
        traits::{SolverCore, TVSolver, fmt_param},
    },
};

#[derive(Debug, Clone, Default)]
pub struct CondatVu {
    pub params: CondatVuParams,
    core: SolverCore,
}

impl CondatVu {
    pub fn new(params: CondatVuParams, run_opts: RunOptions) -> Self {
        Self { params, core: SolverCore::new(run_opts) }
    }

    /// Primal step `tau = tau_mult / (anorm2 / 2 + LNORM2 gamma)`.
    pub fn tau(&self, anorm2: f64) -> f64 {
        self.params.tau_mult / (0.5 * anorm2 + LNORM2 * self.params.gamma)
    }
}

impl TVSolver for CondatVu {
    fn name(&self) -> &'static str {
        "Condat-Vu"
    }

    fn label(&self) -> String {
        let gamma = fmt_param(self.params.gamma);
        match self.core.problem() {
            Ok(problem) => format!("{}[tau={},gamma={gamma}]", self.name(), fmt_param(self.tau(problem.anorm2))),
            Err(_) => format!("{}[tau_mult={},gamma={gamma}]", self.name(), fmt_param(self.params.tau_mult)),
        }
    }

    fn core(&self) -> &SolverCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SolverCore {
        &mut self.core
    }

    fn iterate(&self, problem: &TVProblem, n_iter: usize, log: &RunLogger) -> SolverResult<Image> {
        let data = problem.data_fidelity();
        let l = GradientOperator::new();
        let (tau, gamma) = (self.tau(problem.anorm2), self.params.gamma);

        let mut x = problem.y.as_ref().clone();
        let mut v = l.apply(&x);
        for k in 1..=n_iter {
            let mut step = data.grad(&x)?;
            step += &l.adjoint(&v);
            let mut next = x.clone();
            next.scaled_add(-tau, &step);
            let x_prev = std::mem::replace(&mut x, next);

            let mut extrapolated = &x * 2.0;
            extrapolated -= &x_prev;
            v.scaled_add(gamma, &l.apply(&extrapolated));
            project_dual_ball_inplace(&mut v, problem.reg, problem.isotropy);
            log.iteration(k, || problem.reported_value(&x));
        }
        Ok(x)
    }
}
