//! Solver lookup by name and benchmark sweeps.
//!
//! - [`SolverKind`]: case-insensitive parsing of solver names
//!   (`"Forward-Backward"`, `"fb"`, `"Chambolle-Pock"`, ...).
//! - [`SolverKind::build`]: solver with hyperparameter overrides.
//! - [`SolverKind::sweep`]: one solver per point of its parameter grid.
use std::str::FromStr;

use crate::solvers::{
    admm::Admm,
    chambolle_pock::ChambollePock,
    condat_vu::CondatVu,
    douglas_rachford::DouglasRachford,
    errors::{SolverError, SolverResult},
    forward_backward::ForwardBackward,
    options::{
        AdmmParams, ChambollePockParams, CondatVuParams, DouglasRachfordParams,
        ForwardBackwardParams, InnerSolver, RunOptions,
    },
    traits::TVSolver,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolverKind {
    ForwardBackward,
    DouglasRachford,
    Admm,
    ChambollePock,
    CondatVu,
}

/// Optional hyperparameter overrides; `None` keeps the solver default.
///
/// Each solver reads only the fields it understands: `gamma_mult`
/// (Forward-Backward), `gamma` (all others), `tau_mult`
/// (Chambolle-Pock, Condat-Vu) and `inner` (ADMM).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Overrides {
    pub gamma: Option<f64>,
    pub gamma_mult: Option<f64>,
    pub tau_mult: Option<f64>,
    pub inner: Option<InnerSolver>,
}

impl SolverKind {
    pub const ALL: [SolverKind; 5] = [
        SolverKind::ForwardBackward,
        SolverKind::DouglasRachford,
        SolverKind::Admm,
        SolverKind::ChambollePock,
        SolverKind::CondatVu,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SolverKind::ForwardBackward => "Forward-Backward",
            SolverKind::DouglasRachford => "Douglas-Rachford",
            SolverKind::Admm => "ADMM",
            SolverKind::ChambollePock => "Chambolle-Pock",
            SolverKind::CondatVu => "Condat-Vu",
        }
    }

    /// Build a solver with defaults replaced by `overrides`.
    ///
    /// # Errors
    /// - [`SolverError::InvalidStep`] for an invalid override.
    pub fn build(&self, overrides: Overrides, run_opts: RunOptions) -> SolverResult<Box<dyn TVSolver>> {
        let solver: Box<dyn TVSolver> = match self {
            SolverKind::ForwardBackward => {
                let defaults = ForwardBackwardParams::default();
                let params = ForwardBackwardParams::new(overrides.gamma_mult.unwrap_or(defaults.gamma_mult))?;
                Box::new(ForwardBackward::new(params, run_opts))
            }
            SolverKind::DouglasRachford => {
                let defaults = DouglasRachfordParams::default();
                let params = DouglasRachfordParams::new(overrides.gamma.unwrap_or(defaults.gamma))?;
                Box::new(DouglasRachford::new(params, run_opts))
            }
            SolverKind::Admm => {
                let defaults = AdmmParams::default();
                let params = AdmmParams::new(
                    overrides.gamma.unwrap_or(defaults.gamma),
                    overrides.inner.unwrap_or(defaults.inner),
                )?;
                Box::new(Admm::new(params, run_opts))
            }
            SolverKind::ChambollePock => {
                let defaults = ChambollePockParams::default();
                let params = ChambollePockParams::new(
                    overrides.tau_mult.unwrap_or(defaults.tau_mult),
                    overrides.gamma.unwrap_or(defaults.gamma),
                )?;
                Box::new(ChambollePock::new(params, run_opts))
            }
            SolverKind::CondatVu => {
                let defaults = CondatVuParams::default();
                let params = CondatVuParams::new(
                    overrides.tau_mult.unwrap_or(defaults.tau_mult),
                    overrides.gamma.unwrap_or(defaults.gamma),
                )?;
                Box::new(CondatVu::new(params, run_opts))
            }
        };
        Ok(solver)
    }

    /// One solver per point of this kind's parameter grid.
    pub fn sweep(&self, run_opts: RunOptions) -> Vec<Box<dyn TVSolver>> {
        match self {
            SolverKind::ForwardBackward => ForwardBackwardParams::grid()
                .into_iter()
                .map(|p| Box::new(ForwardBackward::new(p, run_opts)) as Box<dyn TVSolver>)
                .collect(),
            SolverKind::DouglasRachford => DouglasRachfordParams::grid()
                .into_iter()
                .map(|p| Box::new(DouglasRachford::new(p, run_opts)) as Box<dyn TVSolver>)
                .collect(),
            SolverKind::Admm => AdmmParams::grid()
                .into_iter()
                .map(|p| Box::new(Admm::new(p, run_opts)) as Box<dyn TVSolver>)
                .collect(),
            SolverKind::ChambollePock => ChambollePockParams::grid()
                .into_iter()
                .map(|p| Box::new(ChambollePock::new(p, run_opts)) as Box<dyn TVSolver>)
                .collect(),
            SolverKind::CondatVu => CondatVuParams::grid()
                .into_iter()
                .map(|p| Box::new(CondatVu::new(p, run_opts)) as Box<dyn TVSolver>)
                .collect(),
        }
    }
}

impl FromStr for SolverKind {
    type Err = SolverError;

    fn from_str(s: &str) -> SolverResult<Self> {
        let key: String = s.chars().filter(|c| c.is_ascii_alphanumeric()).collect::<String>().to_lowercase();
        match key.as_str() {
            "forwardbackward" | "fb" => Ok(SolverKind::ForwardBackward),
            "douglasrachford" | "dr" => Ok(SolverKind::DouglasRachford),
            "admm" => Ok(SolverKind::Admm),
            "chambollepock" | "cp" => Ok(SolverKind::ChambollePock),
            "condatvu" | "cv" => Ok(SolverKind::CondatVu),
            _ => Err(SolverError::UnknownSolver {
                name: s.to_string(),
                reason: "Valid options are Forward-Backward, Douglas-Rachford, ADMM, Chambolle-Pock or Condat-Vu (case insensitive).",
            }),
        }
    }
}

impl std::fmt::Display for SolverKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
