//! objective::errors — error surface for problem data, priors, and fidelities.
//!
//! Purpose
//! -------
//! Provide one error enum for everything that can go wrong while binding a
//! TV reconstruction problem or evaluating its terms: invalid
//! regularization weights and step sizes, malformed observations, unknown
//! configuration names, and invalid TV-prox options.
//!
//! Key behaviors
//! -------------
//! - Define [`ObjectiveError`] and [`ObjectiveResult`].
//! - Fold operator failures into this surface via `From<OperatorError>`,
//!   keeping shape mismatches as a dedicated variant.
//! - Convert to `PyValueError` behind `python-bindings`.
//!
//! Conventions
//! -----------
//! - Indices into images are `(channel, row, col)`, 0-based.
//! - Names in `Unknown*` variants are echoed verbatim.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

use crate::operators::errors::OperatorError;

/// Result alias for objective construction and evaluation.
pub type ObjectiveResult<T> = Result<T, ObjectiveError>;

/// Unified error type for objective terms and bound problems.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectiveError {
    // ---- Problem parameters ----
    /// Regularization weight must be finite and >= 0.
    InvalidReg { value: f64, reason: &'static str },

    /// Proximal step must be finite and >= 0.
    InvalidGamma { value: f64, reason: &'static str },

    /// Squared operator norm bound must be finite and > 0.
    InvalidNormBound { value: f64 },

    // ---- Observation ----
    /// Observation has no entries.
    EmptyObservation,

    /// Observation entries must be finite.
    NonFiniteObservation { index: (usize, usize, usize), value: f64 },

    /// Operator output shape differs from the observation.
    ShapeMismatch { expected: (usize, usize, usize), found: (usize, usize, usize) },

    // ---- Configuration names ----
    /// Isotropy name not recognized.
    UnknownIsotropy { name: String, reason: &'static str },

    /// Data-fit name not recognized.
    UnknownDataFit { name: String, reason: &'static str },

    // ---- TV prox options ----
    /// Inner TV-prox tolerance must be finite and > 0.
    InvalidTvProxTol { tol: f64, reason: &'static str },

    /// Inner TV-prox iteration cap must be > 0.
    InvalidTvProxMaxIter { max_iter: usize },

    // ---- Function capabilities ----
    /// Function has no gradient (non-smooth term).
    GradientNotImplemented,

    // ---- Benchmark objective ----
    /// `set_data` has not been called yet.
    MissingData,

    // ---- Operators ----
    /// Wrapper for any other operator failure.
    OperatorFailure { text: String },
}

impl std::error::Error for ObjectiveError {}

impl std::fmt::Display for ObjectiveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Problem parameters ----
            ObjectiveError::InvalidReg { value, reason } => {
                write!(f, "Invalid regularization weight {value}: {reason}")
            }
            ObjectiveError::InvalidGamma { value, reason } => {
                write!(f, "Invalid proximal step {value}: {reason}")
            }
            ObjectiveError::InvalidNormBound { value } => {
                write!(f, "Squared operator norm bound must be finite and > 0; got: {value}")
            }

            // ---- Observation ----
            ObjectiveError::EmptyObservation => {
                write!(f, "Observation is empty")
            }
            ObjectiveError::NonFiniteObservation { index, value } => {
                write!(f, "Observation entry at {index:?} is non-finite: {value}")
            }
            ObjectiveError::ShapeMismatch { expected, found } => {
                write!(f, "Operator output shape mismatch: expected {expected:?}, found {found:?}")
            }

            // ---- Configuration names ----
            ObjectiveError::UnknownIsotropy { name, reason } => {
                write!(f, "Unknown isotropy '{name}': {reason}")
            }
            ObjectiveError::UnknownDataFit { name, reason } => {
                write!(f, "Unknown data fit '{name}': {reason}")
            }

            // ---- TV prox options ----
            ObjectiveError::InvalidTvProxTol { tol, reason } => {
                write!(f, "Invalid TV prox tolerance {tol}: {reason}")
            }
            ObjectiveError::InvalidTvProxMaxIter { max_iter } => {
                write!(f, "TV prox max_iter must be > 0; got: {max_iter}")
            }

            // ---- Function capabilities ----
            ObjectiveError::GradientNotImplemented => {
                write!(f, "Gradient not implemented for this function")
            }

            // ---- Benchmark objective ----
            ObjectiveError::MissingData => {
                write!(f, "Objective has no data; call set_data first")
            }

            // ---- Operators ----
            ObjectiveError::OperatorFailure { text } => {
                write!(f, "Operator failure: {text}")
            }
        }
    }
}

impl From<OperatorError> for ObjectiveError {
    fn from(err: OperatorError) -> Self {
        match err {
            OperatorError::ShapeMismatch { expected, found } => {
                ObjectiveError::ShapeMismatch { expected, found }
            }
            OperatorError::InvalidNormBound { value } => ObjectiveError::InvalidNormBound { value },
            other => ObjectiveError::OperatorFailure { text: other.to_string() },
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<ObjectiveError> for PyErr {
    fn from(err: ObjectiveError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Operator errors keep shape information and wrap everything else.
    //
    // Expect
    // ------
    // - `ShapeMismatch` maps to `ObjectiveError::ShapeMismatch` with the same
    //   payload.
    // - Kernel errors map to `OperatorFailure` carrying the operator message.
    fn operator_errors_convert() {
        let shape = OperatorError::ShapeMismatch { expected: (1, 2, 2), found: (1, 3, 3) };
        assert_eq!(
            ObjectiveError::from(shape),
            ObjectiveError::ShapeMismatch { expected: (1, 2, 2), found: (1, 3, 3) }
        );

        let kernel = OperatorError::EmptyKernel;
        let text = kernel.to_string();
        assert_eq!(ObjectiveError::from(kernel), ObjectiveError::OperatorFailure { text });
    }

    #[test]
    fn display_embeds_names_and_values() {
        let err = ObjectiveError::UnknownIsotropy { name: "diagonal".into(), reason: "nope" };
        assert!(err.to_string().contains("'diagonal'"));

        let err = ObjectiveError::InvalidReg { value: -0.5, reason: "must be >= 0" };
        assert!(err.to_string().contains("-0.5"));
    }
}
