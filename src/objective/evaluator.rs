//! Full objective `0.5 ||A u - y||^2 + reg * TV(u)` for reporting.
use crate::{
    objective::{
        data_fidelity::DataFidelity, isotropy::Isotropy, traits::ProximableFunction,
        tv_prior::TVPrior,
    },
    operators::types::Image,
};

/// Evaluates the regularized objective for a fixed `reg` and TV variant.
///
/// Solvers report the isotropic objective regardless of the prior they
/// iterate with; the benchmark objective exposes both variants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectiveEvaluator {
    pub reg: f64,
    tv: TVPrior,
}

impl ObjectiveEvaluator {
    pub fn new(reg: f64, isotropy: Isotropy) -> Self {
        Self { reg, tv: TVPrior::new(isotropy) }
    }

    pub fn isotropy(&self) -> Isotropy {
        self.tv.isotropy
    }

    pub fn tv_value(&self, u: &Image) -> f64 {
        self.tv.value(u)
    }

    pub fn value(&self, u: &Image, data: &DataFidelity<'_>) -> f64 {
        data.value(u) + self.reg * self.tv_value(u)
    }
}
