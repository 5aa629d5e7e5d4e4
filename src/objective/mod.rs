//! objective — terms of the TV reconstruction objective and bound problems.
//!
//! Purpose
//! -------
//! Describe *what* is minimized, independently of *how*: the least-squares
//! data term, the total-variation prior with its proximal machinery, the
//! evaluator used for reporting, the validated problem a solver binds, and
//! the harness-facing benchmark objective.
//!
//! Key behaviors
//! -------------
//! - [`data_fidelity::DataFidelity`]: value, gradient and prox of
//!   `0.5 ||A u - y||^2`.
//! - [`tv_prior`]: TV value, dual-ball projection, group shrink and the
//!   TV prox (dual FISTA).
//! - [`evaluator::ObjectiveEvaluator`]: data term plus `reg * TV`.
//! - [`problem::TVProblem`]: validated `(A, y, anorm2, reg, data_fit,
//!   isotropy)` bundle shared by all solvers.
//! - [`benchmark::TVObjective`]: parameter grid, data hand-off and final
//!   artifacts.
//!
//! Invariants & assumptions
//! ------------------------
//! - Problems are validated once at construction; evaluation code assumes
//!   finite inputs and never re-checks them.
//! - All terms are convex; proxes may be computed inexactly.
//!
//! Conventions
//! -----------
//! - Errors surface as [`errors::ObjectiveError`]; operator failures are
//!   folded in through `From<OperatorError>`.
//! - No I/O or logging happens here.

pub mod benchmark;
pub mod data_fidelity;
pub mod errors;
pub mod evaluator;
pub mod isotropy;
pub mod problem;
pub mod traits;
pub mod tv_prior;

pub mod prelude {
    pub use super::benchmark::{FinalResults, ObjectiveParams, TVObjective};
    pub use super::data_fidelity::DataFidelity;
    pub use super::errors::{ObjectiveError, ObjectiveResult};
    pub use super::evaluator::ObjectiveEvaluator;
    pub use super::isotropy::{DataFit, Isotropy};
    pub use super::problem::TVProblem;
    pub use super::traits::ProximableFunction;
    pub use super::tv_prior::{TVPrior, TvProxOptions, group_norm, project_dual_ball, shrink};
}
