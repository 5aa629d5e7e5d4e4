//! solvers::errors — error surface for solver configuration and runs.
//!
//! Purpose
//! -------
//! Normalize every failure a solver can report into [`SolverError`]:
//! invalid step parameters, lifecycle misuse (running before binding a
//! problem, reading a result before running), unsupported configurations,
//! unknown solver names, wrapped objective errors, and errors raised by the
//! `argmin` backend used for the ADMM inner solve.
//!
//! Conventions
//! -----------
//! - `argmin::core::Error` values never leak; they are downcast and mapped
//!   onto the `Argmin` section of this enum.
//! - Objective errors keep their most useful variants (step, shape) and wrap
//!   the rest as text.
use argmin::core::{ArgminError, Error};
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

use crate::{objective::errors::ObjectiveError, operators::errors::OperatorError};

/// Result alias for solver operations.
pub type SolverResult<T> = Result<T, SolverError>;

#[derive(Debug, Clone, PartialEq)]
pub enum SolverError {
    // ---- Parameters ----
    /// Step parameter (`gamma`, `gamma_mult`, `tau_mult`) must be finite and > 0.
    InvalidStep { name: &'static str, value: f64, reason: &'static str },

    /// Inner iteration count must be > 0.
    InvalidInnerIters { iters: usize },

    /// L-BFGS memory must be >= 1.
    InvalidLbfgsMem { mem: usize },

    /// Logging cadence must be > 0.
    InvalidLogEvery { log_every: usize },

    // ---- Lifecycle ----
    /// `run` called before `set_objective`.
    NotInitialized,

    /// `get_result` called before `run`.
    NoResult,

    /// Problem configuration rejected by `skip`.
    Unsupported { solver: &'static str, reason: String },

    // ---- Registry ----
    /// Solver name not recognized.
    UnknownSolver { name: String, reason: &'static str },

    // ---- Objective ----
    /// Operator output shape differs from the observation.
    ShapeMismatch { expected: (usize, usize, usize), found: (usize, usize, usize) },

    /// Wrapper for any other objective / operator error.
    ObjectiveFailure { text: String },

    // ---- Argmin ----
    /// Wrapper for argmin::InvalidParameter
    InvalidParameter { text: String },
    /// Wrapper for argmin::NotImplemented
    NotImplemented { text: String },
    /// Wrapper for argmin::NotInitialized
    BackendNotInitialized { text: String },
    /// Wrapper for argmin::ConditionViolated
    ConditionViolated { text: String },
    /// Wrapper for argmin::CheckPointNotFound
    CheckPointNotFound { text: String },
    /// Wrapper for argmin::PotentialBug
    PotentialBug { text: String },
    /// Wrapper for argmin::ImpossibleError
    ImpossibleError { text: String },
    /// Wrapper for other argmin::Error types
    BackendError { text: String },

    // ---- Fallback ----
    UnknownError,
}

impl std::error::Error for SolverError {}

impl std::fmt::Display for SolverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Parameters ----
            SolverError::InvalidStep { name, value, reason } => {
                write!(f, "Invalid {name} {value}: {reason}")
            }
            SolverError::InvalidInnerIters { iters } => {
                write!(f, "Inner iteration count must be > 0; got: {iters}")
            }
            SolverError::InvalidLbfgsMem { mem } => {
                write!(f, "L-BFGS memory must be >= 1; got: {mem}")
            }
            SolverError::InvalidLogEvery { log_every } => {
                write!(f, "log_every must be > 0; got: {log_every}")
            }

            // ---- Lifecycle ----
            SolverError::NotInitialized => {
                write!(f, "Solver has no objective; call set_objective first")
            }
            SolverError::NoResult => {
                write!(f, "Solver has no result; call run first")
            }
            SolverError::Unsupported { solver, reason } => {
                write!(f, "{solver} cannot solve this problem: {reason}")
            }

            // ---- Registry ----
            SolverError::UnknownSolver { name, reason } => {
                write!(f, "Unknown solver '{name}': {reason}")
            }

            // ---- Objective ----
            SolverError::ShapeMismatch { expected, found } => {
                write!(f, "Shape mismatch: expected {expected:?}, found {found:?}")
            }
            SolverError::ObjectiveFailure { text } => {
                write!(f, "Objective failure: {text}")
            }

            // ---- Argmin ----
            SolverError::InvalidParameter { text } => {
                write!(f, "Invalid parameter: {text}")
            }
            SolverError::NotImplemented { text } => {
                write!(f, "Not implemented: {text}")
            }
            SolverError::BackendNotInitialized { text } => {
                write!(f, "Not initialized: {text}")
            }
            SolverError::ConditionViolated { text } => {
                write!(f, "Condition violated: {text}")
            }
            SolverError::CheckPointNotFound { text } => {
                write!(f, "Checkpoint not found: {text}")
            }
            SolverError::PotentialBug { text } => {
                write!(f, "Potential bug: {text}")
            }
            SolverError::ImpossibleError { text } => {
                write!(f, "Impossible error: {text}")
            }
            SolverError::BackendError { text } => {
                write!(f, "Backend error: {text}")
            }

            // ---- Fallback ----
            SolverError::UnknownError => {
                write!(f, "Unknown error")
            }
        }
    }
}

impl From<Error> for SolverError {
    fn from(original_err: Error) -> Self {
        match original_err.downcast() {
            Ok(argmin_err) => match argmin_err {
                ArgminError::InvalidParameter { text } => SolverError::InvalidParameter { text },
                ArgminError::NotImplemented { text } => SolverError::NotImplemented { text },
                ArgminError::NotInitialized { text } => SolverError::BackendNotInitialized { text },
                ArgminError::ConditionViolated { text } => SolverError::ConditionViolated { text },
                ArgminError::CheckpointNotFound { text } => SolverError::CheckPointNotFound { text },
                ArgminError::PotentialBug { text } => SolverError::PotentialBug { text },
                ArgminError::ImpossibleError { text } => SolverError::ImpossibleError { text },
                _ => SolverError::UnknownError,
            },
            Err(err) => SolverError::BackendError { text: err.to_string() },
        }
    }
}

impl From<ObjectiveError> for SolverError {
    fn from(err: ObjectiveError) -> Self {
        match err {
            ObjectiveError::InvalidGamma { value, reason } => {
                SolverError::InvalidStep { name: "gamma", value, reason }
            }
            ObjectiveError::ShapeMismatch { expected, found } => {
                SolverError::ShapeMismatch { expected, found }
            }
            other => SolverError::ObjectiveFailure { text: other.to_string() },
        }
    }
}

impl From<OperatorError> for SolverError {
    fn from(err: OperatorError) -> Self {
        ObjectiveError::from(err).into()
    }
}

#[cfg(feature = "python-bindings")]
impl From<SolverError> for PyErr {
    fn from(err: SolverError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
