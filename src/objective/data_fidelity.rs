//! DataFidelity — least-squares data term `0.5 ||A u - y||^2`.
//!
//! The term borrows the forward model and the observation from a bound
//! problem; it owns nothing and is cheap to rebuild inside solver loops.
use crate::{
    objective::{
        errors::ObjectiveResult,
        traits::{ProximableFunction, validate_gamma},
    },
    operators::{forward::ForwardOperator, linalg::norm2, types::Image},
};

/// Least-squares fidelity to an observation `y` through a forward model `A`.
///
/// Fields
/// ------
/// - `op`: `&dyn ForwardOperator`
///   Forward model `A`.
/// - `y`: `&Image`
///   Observation; `A u` must have the same shape.
///
/// Notes
/// -----
/// - `grad` is Lipschitz with constant `op.norm2_bound()`.
/// - `prox` delegates to [`ForwardOperator::prox_data`], which may be an
///   inexact CG solve.
#[derive(Debug, Clone, Copy)]
pub struct DataFidelity<'a> {
    op: &'a dyn ForwardOperator,
    y: &'a Image,
}

impl<'a> DataFidelity<'a> {
    pub fn new(op: &'a dyn ForwardOperator, y: &'a Image) -> Self {
        Self { op, y }
    }

    /// `A u - y`.
    pub fn residual(&self, u: &Image) -> Image {
        let mut r = self.op.apply(u);
        r -= self.y;
        r
    }

    pub fn lipschitz(&self) -> f64 {
        self.op.norm2_bound()
    }
}

impl ProximableFunction for DataFidelity<'_> {
    fn value(&self, u: &Image) -> f64 {
        0.5 * norm2(&self.residual(u))
    }

    fn prox(&self, v: &Image, gamma: f64) -> ObjectiveResult<Image> {
        validate_gamma(gamma)?;
        if gamma == 0.0 {
            return Ok(v.clone());
        }
        Ok(self.op.prox_data(v, self.y, gamma))
    }

    /// `A*(A u - y)`.
    fn grad(&self, u: &Image) -> ObjectiveResult<Image> {
        Ok(self.op.adjoint(&self.residual(u)))
    }
}
