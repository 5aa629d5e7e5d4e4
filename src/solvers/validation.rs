//! Parameter checks shared by the solver option structs.
use crate::solvers::errors::{SolverError, SolverResult};

/// Ensure a step parameter is finite and strictly positive.
///
/// # Errors
/// Returns [`SolverError::InvalidStep`] naming the offending parameter.
pub fn validate_step(name: &'static str, value: f64) -> SolverResult<f64> {
    if !value.is_finite() {
        return Err(SolverError::InvalidStep { name, value, reason: "Step must be finite." });
    }
    if value <= 0.0 {
        return Err(SolverError::InvalidStep { name, value, reason: "Step must be positive." });
    }
    Ok(value)
}

/// Ensure an inner iteration budget is non-zero.
///
/// # Errors
/// Returns [`SolverError::InvalidInnerIters`] for `iters == 0`.
pub fn validate_inner_iters(iters: usize) -> SolverResult<usize> {
    if iters == 0 {
        return Err(SolverError::InvalidInnerIters { iters });
    }
    Ok(iters)
}
