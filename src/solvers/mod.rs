//! solvers — first-order proximal splitting schemes for TV reconstruction.
//!
//! Purpose
//! -------
//! Implement the five algorithms a TV benchmark compares on
//! `0.5 ||A u - y||^2 + reg * TV(u)`, behind one lifecycle trait so a
//! harness can drive them interchangeably.
//!
//! Key behaviors
//! -------------
//! - [`forward_backward::ForwardBackward`]: gradient step on the data term,
//!   TV prox.
//! - [`douglas_rachford::DouglasRachford`]: data prox and TV prox with
//!   reflection.
//! - [`admm::Admm`]: split `z = L x`, inexact x-update
//!   ([`admm_inner`]), group shrink on `z`.
//! - [`chambolle_pock::ChambollePock`]: primal-dual with data prox and
//!   dual-ball projection.
//! - [`condat_vu::CondatVu`]: primal-dual with data gradient and dual-ball
//!   projection.
//! - [`registry::SolverKind`]: lookup by name and grid sweeps.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every run performs exactly `n_iter` iterations from a fresh
//!   initialization; there is no adaptive stopping and no divergence check.
//! - Step parameters are validated at construction; the problem is
//!   validated when it is built.
//! - Anisotropic TV is rejected by every solver (`skip`).
//!
//! Conventions
//! -----------
//! - Result names embed resolved hyperparameters, e.g.
//!   `Chambolle-Pock[tau=0.0125,gamma=1]`.
//! - Errors surface as [`errors::SolverError`]; objective, operator and
//!   argmin errors are converted into it.
//! - Progress logging goes through [`logging::RunLogger`] and is compiled
//!   out without feature `obs_slog`.

pub mod admm;
pub mod admm_inner;
pub mod chambolle_pock;
pub mod condat_vu;
pub mod douglas_rachford;
pub mod errors;
pub mod forward_backward;
pub mod logging;
pub mod options;
pub mod registry;
pub mod traits;
pub mod validation;

pub mod prelude {
    pub use super::admm::Admm;
    pub use super::chambolle_pock::ChambollePock;
    pub use super::condat_vu::CondatVu;
    pub use super::douglas_rachford::DouglasRachford;
    pub use super::errors::{SolverError, SolverResult};
    pub use super::forward_backward::ForwardBackward;
    pub use super::options::{
        AdmmParams, ChambollePockParams, CondatVuParams, DouglasRachfordParams,
        ForwardBackwardParams, InnerSolver, RunOptions,
    };
    pub use super::registry::{Overrides, SolverKind};
    pub use super::traits::{SolveResult, TVSolver};
}
