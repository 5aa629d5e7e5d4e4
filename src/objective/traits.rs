//! Interface shared by the two terms of the TV objective.
//!
//! Convention: every term is a convex function of an [`Image`]. Smooth terms
//! provide `grad`; non-smooth ones keep the default, which reports
//! [`ObjectiveError::GradientNotImplemented`].
use crate::{
    objective::errors::{ObjectiveError, ObjectiveResult},
    operators::types::Image,
};

/// Convex function with a computable proximal operator.
///
/// Required:
/// - `value(&Image) -> f64`: evaluate `f(x)`.
/// - `prox(&Image, gamma) -> ObjectiveResult<Image>`: return
///   `argmin_x gamma f(x) + 0.5 ||x - v||^2`.
///   - Errors: [`ObjectiveError::InvalidGamma`] for negative or non-finite
///     `gamma`. `gamma == 0` returns `v`.
///
/// Optional:
/// - `grad(&Image) -> ObjectiveResult<Image>`: gradient of a smooth term.
pub trait ProximableFunction {
    // Required methods
    fn value(&self, x: &Image) -> f64;
    fn prox(&self, v: &Image, gamma: f64) -> ObjectiveResult<Image>;

    // Optional methods
    fn grad(&self, _x: &Image) -> ObjectiveResult<Image> {
        Err(ObjectiveError::GradientNotImplemented)
    }
}

/// Validate a proximal step.
///
/// # Errors
/// - [`ObjectiveError::InvalidGamma`] if `gamma` is non-finite or negative.
pub fn validate_gamma(gamma: f64) -> ObjectiveResult<()> {
    if !gamma.is_finite() {
        return Err(ObjectiveError::InvalidGamma { value: gamma, reason: "Step must be finite." });
    }
    if gamma < 0.0 {
        return Err(ObjectiveError::InvalidGamma { value: gamma, reason: "Step must be >= 0." });
    }
    Ok(())
}
