//! operators::forward — forward operators `A` for the data-fidelity term.
//!
//! Purpose
//! -------
//! Define the capability interface every forward model must expose to the
//! solvers, and ship the two operators used by the TV benchmark datasets:
//! the identity (denoising) and a per-channel 2D convolution (deblurring).
//!
//! Key behaviors
//! -------------
//! - [`ForwardOperator`] exposes `apply`, `adjoint`, a squared-norm bound,
//!   and `prox_data`, the proximal step of `0.5||A x - y||^2`.
//! - The default `prox_data` solves `(I + gamma A*A) x = v + gamma A* y`
//!   with conjugate gradients warm-started at `v`; operators with a closed
//!   form override it.
//! - [`Convolution`] correlates each channel with an odd-sized kernel under
//!   zero boundary conditions and keeps the image size.
//!
//! Invariants & assumptions
//! ------------------------
//! - Operators are linear, map an image to an image of the same shape, and
//!   are immutable once constructed (`Send + Sync`, shared through `Arc`).
//! - `norm2_bound()` is an upper bound on `||A||^2`; solvers derive their
//!   step sizes from it.
//! - `prox_data` may be inexact; callers tolerate iterative solutions.
//!
//! Conventions
//! -----------
//! - `label()` names the observation model the way the benchmark reports it
//!   (`type_A`), e.g. `"denoising"` or `"deblurring"`.
//!
//! Testing notes
//! -------------
//! - Unit tests cover kernel validation, the adjoint identity of
//!   [`Convolution`], the norm bound, and the optimality condition of both
//!   closed-form and CG-based data proxes.
use std::fmt::Debug;

use ndarray::{Array2, s};

use crate::operators::{
    cg::{CgOptions, cg_solve},
    errors::{OperatorError, OperatorResult},
    types::Image,
};

/// Capability interface of a forward model `A`.
///
/// Required:
/// - `apply(u)`: `A u`.
/// - `adjoint(r)`: `A* r`.
/// - `norm2_bound()`: upper bound on `||A||^2`.
/// - `label()`: short name of the observation model.
///
/// Optional:
/// - `prox_data(v, y, gamma)`: `argmin_x 0.5||A x - y||^2 + 1/(2 gamma)||x - v||^2`.
///   Defaults to a CG solve of the normal equations.
/// - `cg_options()`: stopping rule for that CG solve.
pub trait ForwardOperator: Debug + Send + Sync {
    // Required methods
    fn apply(&self, u: &Image) -> Image;
    fn adjoint(&self, r: &Image) -> Image;
    fn norm2_bound(&self) -> f64;
    fn label(&self) -> &str;

    // Optional methods
    fn prox_data(&self, v: &Image, y: &Image, gamma: f64) -> Image {
        if gamma == 0.0 {
            return v.clone();
        }
        let mut rhs = self.adjoint(y);
        rhs *= gamma;
        rhs += v;
        let normal = |x: &Image| {
            let mut out = self.adjoint(&self.apply(x));
            out *= gamma;
            out += x;
            out
        };
        cg_solve(normal, &rhs, v.clone(), &self.cg_options())
    }

    fn cg_options(&self) -> CgOptions {
        CgOptions::default()
    }
}

/// Check that `A` maps the solution domain onto the observation shape.
///
/// Solvers initialize their primal iterate from `y`, so `A` must preserve
/// the `(channel, height, width)` shape of `y`.
///
/// # Errors
/// Returns [`OperatorError::ShapeMismatch`] if `A(0)` has a different shape.
pub fn check_output_shape(op: &dyn ForwardOperator, y: &Image) -> OperatorResult<()> {
    let image = op.apply(&Image::zeros(y.raw_dim()));
    if image.dim() != y.dim() {
        return Err(OperatorError::ShapeMismatch { expected: y.dim(), found: image.dim() });
    }
    Ok(())
}

/// Identity forward model (denoising).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Identity;

impl ForwardOperator for Identity {
    fn apply(&self, u: &Image) -> Image {
        u.clone()
    }

    fn adjoint(&self, r: &Image) -> Image {
        r.clone()
    }

    fn norm2_bound(&self) -> f64 {
        1.0
    }

    fn label(&self) -> &str {
        "denoising"
    }

    /// Closed form `(v + gamma y) / (1 + gamma)`.
    fn prox_data(&self, v: &Image, y: &Image, gamma: f64) -> Image {
        let mut out = y * gamma;
        out += v;
        out /= 1.0 + gamma;
        out
    }
}

/// Convolution — per-channel 2D correlation with zero boundary.
///
/// Purpose
/// -------
/// Model a spatially invariant blur applied independently to every channel,
/// keeping the image size ("same" output).
///
/// Fields
/// ------
/// - `kernel`: `Array2<f64>`
///   Odd-sized kernel; its center tap sits at `(rows / 2, cols / 2)`.
/// - `norm2`: `f64`
///   Cached bound `(sum |k|)^2` on `||A||^2`.
/// - `cg`: [`CgOptions`]
///   Stopping rule for the data prox.
///
/// Invariants
/// ----------
/// - Kernel is non-empty, odd-sized in both axes, and finite.
///
/// Notes
/// -----
/// - `apply` computes `out[i, j] = sum_{a,b} k[a, b] u[i + a - ci, j + b - cj]`
///   and `adjoint` correlates with the flipped kernel, so the pair is exact
///   adjoint under the zero boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct Convolution {
    kernel: Array2<f64>,
    norm2: f64,
    cg: CgOptions,
}

impl Convolution {
    /// Build a convolution operator from a validated kernel.
    ///
    /// # Errors
    /// - [`OperatorError::EmptyKernel`] for a kernel with no entries.
    /// - [`OperatorError::EvenKernel`] if either side is even.
    /// - [`OperatorError::NonFiniteKernel`] for NaN/±inf entries.
    pub fn new(kernel: Array2<f64>) -> OperatorResult<Self> {
        let (rows, cols) = kernel.dim();
        if rows == 0 || cols == 0 {
            return Err(OperatorError::EmptyKernel);
        }
        if rows % 2 == 0 || cols % 2 == 0 {
            return Err(OperatorError::EvenKernel { shape: (rows, cols) });
        }
        for ((row, col), &value) in kernel.indexed_iter() {
            if !value.is_finite() {
                return Err(OperatorError::NonFiniteKernel { row, col, value });
            }
        }
        let l1: f64 = kernel.iter().map(|k| k.abs()).sum();
        Ok(Self { kernel, norm2: l1 * l1, cg: CgOptions::default() })
    }

    /// Override the CG stopping rule used by `prox_data`.
    pub fn with_cg_options(mut self, cg: CgOptions) -> Self {
        self.cg = cg;
        self
    }

    fn correlate(&self, src: &Image, flip: bool) -> Image {
        let (rows, cols) = self.kernel.dim();
        let (ci, cj) = ((rows / 2) as isize, (cols / 2) as isize);
        let mut out = Image::zeros(src.raw_dim());
        for ((a, b), &k) in self.kernel.indexed_iter() {
            if k == 0.0 {
                continue;
            }
            let (di, dj) = (a as isize - ci, b as isize - cj);
            let (di, dj) = if flip { (-di, -dj) } else { (di, dj) };
            accumulate_shifted(&mut out, src, k, di, dj);
        }
        out
    }
}

impl ForwardOperator for Convolution {
    fn apply(&self, u: &Image) -> Image {
        self.correlate(u, false)
    }

    fn adjoint(&self, r: &Image) -> Image {
        self.correlate(r, true)
    }

    fn norm2_bound(&self) -> f64 {
        self.norm2
    }

    fn label(&self) -> &str {
        "deblurring"
    }

    fn cg_options(&self) -> CgOptions {
        self.cg
    }
}

/// `out[c, i, j] += weight * src[c, i + di, j + dj]` wherever both indices
/// are in range.
fn accumulate_shifted(out: &mut Image, src: &Image, weight: f64, di: isize, dj: isize) {
    let (_, h, w) = out.dim();
    let (Some((o_rows, s_rows)), Some((o_cols, s_cols))) = (overlap(h, di), overlap(w, dj))
    else {
        return;
    };
    let mut dst = out.slice_mut(s![.., o_rows.0..o_rows.1, o_cols.0..o_cols.1]);
    dst.scaled_add(weight, &src.slice(s![.., s_rows.0..s_rows.1, s_cols.0..s_cols.1]));
}

/// Index ranges `(out, src)` along one axis for a shift of `d`.
fn overlap(n: usize, d: isize) -> Option<((usize, usize), (usize, usize))> {
    let shift = d.unsigned_abs();
    if shift >= n {
        return None;
    }
    if d >= 0 {
        Some(((0, n - shift), (shift, n)))
    } else {
        Some(((shift, n), (0, n - shift)))
    }
}

/// Normalized isotropic Gaussian kernel of odd side `size`.
///
/// # Errors
/// - [`OperatorError::EvenKernel`] if `size` is even (including zero).
/// - [`OperatorError::InvalidSigma`] if `sigma` is non-finite or ≤ 0.
pub fn gaussian_kernel(size: usize, sigma: f64) -> OperatorResult<Array2<f64>> {
    if size % 2 == 0 {
        return Err(OperatorError::EvenKernel { shape: (size, size) });
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(OperatorError::InvalidSigma { sigma });
    }
    let c = (size / 2) as f64;
    let mut k = Array2::from_shape_fn((size, size), |(i, j)| {
        let (x, y) = (i as f64 - c, j as f64 - c);
        (-(x * x + y * y) / (2.0 * sigma * sigma)).exp()
    });
    let total = k.sum();
    k /= total;
    Ok(k)
}
