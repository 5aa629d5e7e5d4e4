//! operators::errors — error surface for linear operators and their solves.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias used by forward operators,
//! convolution kernels, and the conjugate-gradient routine behind the
//! data-fidelity proximal step.
//!
//! Key behaviors
//! -------------
//! - Define [`OperatorError`] and [`OperatorResult`] as the canonical error
//!   and result types for `operators`.
//! - Attach human-readable `Display` messages that embed the offending
//!   value or shape.
//! - Implement `From<OperatorError> for PyErr` behind `python-bindings` so
//!   operator failures surface as `ValueError` in Python.
//!
//! Conventions
//! -----------
//! - Shapes are reported as `(channel, height, width)` tuples.
//! - Kernel shapes are reported as `(rows, cols)` tuples.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Result alias for operator construction and validation.
pub type OperatorResult<T> = Result<T, OperatorError>;

/// Unified error type for linear operators.
#[derive(Debug, Clone, PartialEq)]
pub enum OperatorError {
    // ---- Convolution kernels ----
    /// Kernel has zero rows or columns.
    EmptyKernel,

    /// Kernel sides must be odd so the kernel has a center tap.
    EvenKernel { shape: (usize, usize) },

    /// Kernel entries must be finite.
    NonFiniteKernel { row: usize, col: usize, value: f64 },

    /// Gaussian kernel width must be finite and > 0.
    InvalidSigma { sigma: f64 },

    // ---- Conjugate gradients ----
    /// CG tolerance must be finite and > 0.
    InvalidCgTol { tol: f64, reason: &'static str },

    /// CG iteration cap must be > 0.
    InvalidCgMaxIter { max_iter: usize },

    // ---- Shapes ----
    /// Operator output does not match the observation shape.
    ShapeMismatch { expected: (usize, usize, usize), found: (usize, usize, usize) },

    /// Squared operator norm bound must be finite and > 0.
    InvalidNormBound { value: f64 },
}

impl std::error::Error for OperatorError {}

impl std::fmt::Display for OperatorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Convolution kernels ----
            OperatorError::EmptyKernel => {
                write!(f, "Convolution kernel must have at least one row and one column")
            }
            OperatorError::EvenKernel { shape } => {
                write!(f, "Convolution kernel sides must be odd; got shape {shape:?}")
            }
            OperatorError::NonFiniteKernel { row, col, value } => {
                write!(f, "Convolution kernel entry ({row}, {col}) is non-finite: {value}")
            }
            OperatorError::InvalidSigma { sigma } => {
                write!(f, "Gaussian kernel sigma must be finite and > 0; got: {sigma}")
            }

            // ---- Conjugate gradients ----
            OperatorError::InvalidCgTol { tol, reason } => {
                write!(f, "Invalid conjugate-gradient tolerance {tol}: {reason}")
            }
            OperatorError::InvalidCgMaxIter { max_iter } => {
                write!(f, "Conjugate-gradient max_iter must be > 0; got: {max_iter}")
            }

            // ---- Shapes ----
            OperatorError::ShapeMismatch { expected, found } => {
                write!(f, "Operator output shape mismatch: expected {expected:?}, found {found:?}")
            }
            OperatorError::InvalidNormBound { value } => {
                write!(f, "Squared operator norm bound must be finite and > 0; got: {value}")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<OperatorError> for PyErr {
    fn from(err: OperatorError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
