//! objective::problem — validated TV reconstruction problem.
//!
//! Purpose
//! -------
//! Bundle everything a solver binds in `set_objective`: the forward model,
//! the observation, the squared norm bound of `A`, the regularization weight
//! and the TV / data-fit switches. Validation happens once here so solver
//! loops can assume finite, shape-consistent inputs.
//!
//! Invariants & assumptions
//! ------------------------
//! - `reg` is finite and `>= 0`; `anorm2` is finite and `> 0`.
//! - `y` is non-empty and finite, and `A` preserves its shape.
//! - The operator and observation are shared through `Arc`; cloning a
//!   problem never copies image data.
use std::sync::Arc;

use crate::{
    objective::{
        data_fidelity::DataFidelity,
        errors::{ObjectiveError, ObjectiveResult},
        evaluator::ObjectiveEvaluator,
        isotropy::{DataFit, Isotropy},
        tv_prior::TVPrior,
    },
    operators::{
        forward::{ForwardOperator, check_output_shape},
        types::Image,
    },
};

/// TVProblem — `min_u 0.5 ||A u - y||^2 + reg * TV(u)`.
///
/// Fields
/// ------
/// - `op`: `Arc<dyn ForwardOperator>`
///   Forward model `A`.
/// - `y`: `Arc<Image>`
///   Observation `(C, H, W)`.
/// - `anorm2`: `f64`
///   Squared operator norm of `A` used for step sizes.
/// - `reg`: `f64`
///   Regularization weight.
/// - `data_fit`: [`DataFit`]
/// - `isotropy`: [`Isotropy`]
#[derive(Debug, Clone)]
pub struct TVProblem {
    pub op: Arc<dyn ForwardOperator>,
    pub y: Arc<Image>,
    pub anorm2: f64,
    pub reg: f64,
    pub data_fit: DataFit,
    pub isotropy: Isotropy,
}

impl TVProblem {
    /// Construct a validated problem.
    ///
    /// # Errors
    /// - [`ObjectiveError::InvalidReg`] if `reg` is non-finite or negative.
    /// - [`ObjectiveError::InvalidNormBound`] if `anorm2` is non-finite or ≤ 0.
    /// - [`ObjectiveError::EmptyObservation`] if `y` has no entries.
    /// - [`ObjectiveError::NonFiniteObservation`] for NaN/±inf in `y`.
    /// - [`ObjectiveError::ShapeMismatch`] if `A` changes the shape of `y`.
    pub fn new(
        op: Arc<dyn ForwardOperator>, y: Arc<Image>, anorm2: f64, reg: f64, data_fit: DataFit,
        isotropy: Isotropy,
    ) -> ObjectiveResult<Self> {
        if !reg.is_finite() {
            return Err(ObjectiveError::InvalidReg { value: reg, reason: "Weight must be finite." });
        }
        if reg < 0.0 {
            return Err(ObjectiveError::InvalidReg { value: reg, reason: "Weight must be >= 0." });
        }
        if !anorm2.is_finite() || anorm2 <= 0.0 {
            return Err(ObjectiveError::InvalidNormBound { value: anorm2 });
        }
        if y.is_empty() {
            return Err(ObjectiveError::EmptyObservation);
        }
        if let Some((index, &value)) = y.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(ObjectiveError::NonFiniteObservation { index, value });
        }
        check_output_shape(op.as_ref(), &y)?;

        Ok(Self { op, y, anorm2, reg, data_fit, isotropy })
    }

    /// Convenience constructor taking `anorm2` from the operator's bound.
    pub fn from_operator(
        op: Arc<dyn ForwardOperator>, y: Image, reg: f64, isotropy: Isotropy,
    ) -> ObjectiveResult<Self> {
        let anorm2 = op.norm2_bound();
        Self::new(op, Arc::new(y), anorm2, reg, DataFit::Lsq, isotropy)
    }

    pub fn data_fidelity(&self) -> DataFidelity<'_> {
        DataFidelity::new(self.op.as_ref(), &self.y)
    }

    pub fn tv_prior(&self) -> TVPrior {
        TVPrior::new(self.isotropy)
    }

    /// Evaluator for the isotropic objective reported by every solver.
    pub fn reporting_evaluator(&self) -> ObjectiveEvaluator {
        ObjectiveEvaluator::new(self.reg, Isotropy::Isotropic)
    }

    /// `0.5 ||A u - y||^2 + reg * TV_iso(u)`.
    pub fn reported_value(&self, u: &Image) -> f64 {
        self.reporting_evaluator().value(u, &self.data_fidelity())
    }

    pub fn dim(&self) -> (usize, usize, usize) {
        self.y.dim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operators::forward::{Convolution, Identity};
    use ndarray::array;

    fn identity() -> Arc<dyn ForwardOperator> {
        Arc::new(Identity)
    }

    #[test]
    fn new_rejects_invalid_parameters() {
        let y = Arc::new(Image::zeros((1, 3, 3)));
        let build = |anorm2: f64, reg: f64| {
            TVProblem::new(identity(), y.clone(), anorm2, reg, DataFit::Lsq, Isotropy::Isotropic)
        };

        assert!(build(1.0, 0.1).is_ok());
        assert!(build(1.0, 0.0).is_ok());
        assert!(matches!(build(1.0, -0.1), Err(ObjectiveError::InvalidReg { .. })));
        assert!(matches!(build(1.0, f64::NAN), Err(ObjectiveError::InvalidReg { .. })));
        assert!(matches!(build(0.0, 0.1), Err(ObjectiveError::InvalidNormBound { .. })));
        assert!(matches!(build(f64::INFINITY, 0.1), Err(ObjectiveError::InvalidNormBound { .. })));
    }

    #[test]
    // Purpose
    // -------
    // Observations must be non-empty and finite.
    //
    // Expect
    // ------
    // - Empty `y` -> `EmptyObservation`.
    // - NaN at (0, 1, 0) -> `NonFiniteObservation` with that index.
    fn new_rejects_invalid_observations() {
        let empty = TVProblem::from_operator(identity(), Image::zeros((1, 0, 4)), 0.1, Isotropy::Isotropic);
        assert_eq!(empty.err(), Some(ObjectiveError::EmptyObservation));

        let y = array![[[0.0, 1.0], [f64::NAN, 2.0]]];
        let err = TVProblem::from_operator(identity(), y, 0.1, Isotropy::Isotropic).err();
        assert!(matches!(err, Some(ObjectiveError::NonFiniteObservation { index: (0, 1, 0), .. })));
    }

    #[test]
    fn from_operator_uses_operator_norm_bound() {
        let op = Convolution::new(array![[0.5, 0.0, -0.5]]).expect("valid kernel");
        let problem =
            TVProblem::from_operator(Arc::new(op), Image::zeros((2, 3, 4)), 0.5, Isotropy::Anisotropic)
                .expect("valid problem");
        assert_eq!(problem.anorm2, 1.0);
        assert_eq!(problem.dim(), (2, 3, 4));
        assert_eq!(problem.data_fit, DataFit::Lsq);
    }

    #[test]
    fn reported_value_uses_isotropic_tv() {
        let y = Image::zeros((1, 2, 2));
        let problem = TVProblem::from_operator(identity(), y, 1.0, Isotropy::Anisotropic).expect("valid");
        let u = array![[[0.0, 3.0], [4.0, 3.0]]];
        // 0.5 * 34 + 1.0 * 6 (isotropic), not 8 (anisotropic)
        assert_eq!(problem.reported_value(&u), 23.0);
    }
}
