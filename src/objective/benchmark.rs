//! objective::benchmark — harness-facing TV objective.
//!
//! Purpose
//! -------
//! Expose the objective side of a benchmark run: its parameter grid, the
//! data hand-off from a dataset, the problem handed to each solver, and the
//! artifacts saved after a run.
//!
//! Key behaviors
//! -------------
//! - [`TVObjective::grid`] enumerates `reg x isotropy x data_fit`.
//! - [`TVObjective::set_data`] stores `(x_true, type_A, A, y, anorm2)`;
//!   [`TVObjective::get_objective`] turns it into a validated [`TVProblem`].
//! - [`TVObjective::save_final_results`] labels the estimate with the
//!   observation model (`"<name>, type_A = <type_A>"`).
//!
//! Conventions
//! -----------
//! - The reported value of a run is the `obj` a solver computed; the
//!   objective does not re-evaluate it.
use std::sync::Arc;

use crate::{
    objective::{
        errors::{ObjectiveError, ObjectiveResult},
        isotropy::{DataFit, Isotropy},
        problem::TVProblem,
        traits::ProximableFunction,
        tv_prior::TVPrior,
    },
    operators::{forward::ForwardOperator, types::Image},
    solvers::traits::SolveResult,
};

/// Regularization weights swept by the benchmark.
pub const REG_GRID: [f64; 3] = [0.1, 0.5, 1.0];

/// One point of the objective parameter grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectiveParams {
    pub reg: f64,
    pub isotropy: Isotropy,
    pub data_fit: DataFit,
}

impl ObjectiveParams {
    /// Build parameters from configuration strings.
    ///
    /// # Errors
    /// - [`ObjectiveError::InvalidReg`] for negative or non-finite `reg`.
    /// - [`ObjectiveError::UnknownIsotropy`] / [`ObjectiveError::UnknownDataFit`]
    ///   for unrecognized names.
    pub fn new(reg: f64, isotropy: &str, data_fit: &str) -> ObjectiveResult<Self> {
        if !reg.is_finite() || reg < 0.0 {
            return Err(ObjectiveError::InvalidReg { value: reg, reason: "Weight must be finite and >= 0." });
        }
        Ok(Self { reg, isotropy: isotropy.parse()?, data_fit: data_fit.parse()? })
    }
}

/// Dataset payload stored by [`TVObjective::set_data`].
#[derive(Debug, Clone)]
struct BenchmarkData {
    x_true: Arc<Image>,
    type_a: String,
    op: Arc<dyn ForwardOperator>,
    y: Arc<Image>,
    anorm2: f64,
}

/// Artifacts kept for a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalResults {
    pub name: String,
    pub y: Arc<Image>,
    pub x_true: Arc<Image>,
    pub u: Image,
}

/// TVObjective — objective `0.5 ||A u - y||^2 + reg * TV(u)` as seen by a
/// benchmark harness.
#[derive(Debug, Clone)]
pub struct TVObjective {
    pub params: ObjectiveParams,
    data: Option<BenchmarkData>,
}

impl TVObjective {
    pub const NAME: &'static str = "TV";

    pub fn new(params: ObjectiveParams) -> Self {
        Self { params, data: None }
    }

    /// Cartesian product of [`REG_GRID`], both isotropies and `lsq`.
    pub fn grid() -> Vec<ObjectiveParams> {
        let mut out = Vec::with_capacity(REG_GRID.len() * Isotropy::ALL.len());
        for &reg in REG_GRID.iter() {
            for isotropy in Isotropy::ALL {
                out.push(ObjectiveParams { reg, isotropy, data_fit: DataFit::Lsq });
            }
        }
        out
    }

    /// Store the dataset for subsequent `get_objective` calls.
    ///
    /// The payload is validated by building the problem once.
    ///
    /// # Errors
    /// - Any [`TVProblem::new`] validation error.
    /// - [`ObjectiveError::ShapeMismatch`] if `x_true` and `y` differ in shape.
    pub fn set_data(
        &mut self, x_true: Image, type_a: impl Into<String>, op: Arc<dyn ForwardOperator>, y: Image,
        anorm2: f64,
    ) -> ObjectiveResult<()> {
        if x_true.dim() != y.dim() {
            return Err(ObjectiveError::ShapeMismatch { expected: y.dim(), found: x_true.dim() });
        }
        let data = BenchmarkData {
            x_true: Arc::new(x_true),
            type_a: type_a.into(),
            op,
            y: Arc::new(y),
            anorm2,
        };
        self.build_problem(&data)?;
        self.data = Some(data);
        Ok(())
    }

    /// The problem handed to every solver.
    ///
    /// # Errors
    /// - [`ObjectiveError::MissingData`] before `set_data`.
    pub fn get_objective(&self) -> ObjectiveResult<TVProblem> {
        self.build_problem(self.data()?)
    }

    /// Zero image with the observation's shape.
    pub fn get_one_result(&self) -> ObjectiveResult<Image> {
        Ok(Image::zeros(self.data()?.y.raw_dim()))
    }

    pub fn evaluate_result(&self, result: &SolveResult) -> f64 {
        result.obj
    }

    pub fn isotropic_tv_value(u: &Image) -> f64 {
        TVPrior::new(Isotropy::Isotropic).value(u)
    }

    pub fn anisotropic_tv_value(u: &Image) -> f64 {
        TVPrior::new(Isotropy::Anisotropic).value(u)
    }

    /// Label `u` with the observation model and attach the dataset images.
    pub fn save_final_results(&self, name: &str, u: &Image) -> ObjectiveResult<FinalResults> {
        let data = self.data()?;
        Ok(FinalResults {
            name: format!("{name}, type_A = {}", data.type_a),
            y: data.y.clone(),
            x_true: data.x_true.clone(),
            u: u.clone(),
        })
    }

    fn data(&self) -> ObjectiveResult<&BenchmarkData> {
        self.data.as_ref().ok_or(ObjectiveError::MissingData)
    }

    fn build_problem(&self, data: &BenchmarkData) -> ObjectiveResult<TVProblem> {
        TVProblem::new(
            data.op.clone(),
            data.y.clone(),
            data.anorm2,
            self.params.reg,
            self.params.data_fit,
            self.params.isotropy,
        )
    }
}
