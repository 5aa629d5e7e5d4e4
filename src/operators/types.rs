//! operators::types — shared tensor aliases and operator constants.
//!
//! Purpose
//! -------
//! Centralize the tensor types used by every operator, objective, and
//! solver so the rest of the crate can stay agnostic to the exact
//! `ndarray` containers.
//!
//! Conventions
//! -----------
//! - Images are `(channel, height, width)`; channels are processed
//!   independently by every operator in this crate.
//! - Gradient fields are `(channel, direction, height, width)` with
//!   `direction == 0` the forward difference along the height (row) axis and
//!   `direction == 1` along the width (column) axis.
use ndarray::{Array3, Array4};

/// Image tensor `(channel, height, width)`.
pub type Image = Array3<f64>;

/// Gradient field `(channel, 2, height, width)` produced by `L(u)`.
pub type GradField = Array4<f64>;

/// Spatial shape of an [`Image`].
pub type ImageDim = (usize, usize, usize);

/// Upper bound on `||L||^2` for the 2D forward-difference operator.
///
/// Valid for the zero-padded discretization in
/// [`GradientOperator`](crate::operators::gradient::GradientOperator); it has
/// to be re-derived if the boundary convention changes.
pub const LNORM2: f64 = 8.0;

/// Number of gradient directions in 2D.
pub const N_DIRECTIONS: usize = 2;
