//! Conjugate gradients on image tensors.
//!
//! Solves `M x = b` for a symmetric positive definite `M` given as a
//! closure. Used by [`ForwardOperator::prox_data`](crate::operators::forward::ForwardOperator::prox_data)
//! to solve `(I + gamma A*A) x = v + gamma A* y` when no closed form exists.
use crate::operators::{
    errors::{OperatorError, OperatorResult},
    linalg::{inner, norm2},
    types::Image,
};

/// Stopping rule for [`cg_solve`].
///
/// - `tol`: stop once `||r|| <= tol * ||b||`.
/// - `max_iter`: hard cap on CG iterations.
///
/// Default: `tol = 1e-10`, `max_iter = 200`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CgOptions {
    pub tol: f64,
    pub max_iter: usize,
}

impl CgOptions {
    /// Construct validated CG options.
    ///
    /// # Errors
    /// - [`OperatorError::InvalidCgTol`] if `tol` is non-finite or ≤ 0.
    /// - [`OperatorError::InvalidCgMaxIter`] if `max_iter == 0`.
    pub fn new(tol: f64, max_iter: usize) -> OperatorResult<Self> {
        if !tol.is_finite() {
            return Err(OperatorError::InvalidCgTol { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OperatorError::InvalidCgTol { tol, reason: "Tolerance must be positive." });
        }
        if max_iter == 0 {
            return Err(OperatorError::InvalidCgMaxIter { max_iter });
        }
        Ok(Self { tol, max_iter })
    }
}

impl Default for CgOptions {
    fn default() -> Self {
        Self { tol: 1e-10, max_iter: 200 }
    }
}

/// Solve `M x = b` starting from `x0`.
///
/// The solve is inexact by construction: it returns the last iterate once
/// the relative residual drops below `opts.tol`, after `opts.max_iter`
/// iterations, or when the search direction degenerates.
pub fn cg_solve<F>(m_op: F, b: &Image, x0: Image, opts: &CgOptions) -> Image
where
    F: Fn(&Image) -> Image,
{
    let mut x = x0;
    let b_norm2 = norm2(b);
    if b_norm2 == 0.0 {
        return Image::zeros(b.raw_dim());
    }
    let stop2 = opts.tol * opts.tol * b_norm2;

    let mut r = b - &m_op(&x);
    let mut rs_old = norm2(&r);
    if rs_old <= stop2 {
        return x;
    }
    let mut p = r.clone();

    for _ in 0..opts.max_iter {
        let mp = m_op(&p);
        let pmp = inner(&p, &mp);
        if pmp.abs() < 1e-300 {
            break;
        }
        let alpha = rs_old / pmp;
        x.scaled_add(alpha, &p);
        r.scaled_add(-alpha, &mp);

        let rs_new = norm2(&r);
        if rs_new <= stop2 {
            break;
        }
        let beta = rs_new / rs_old;
        p *= beta;
        p += &r;
        rs_old = rs_new;
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array;

    #[test]
    fn cg_solves_identity_in_one_step() {
        let b = Array::from_shape_fn((1, 2, 3), |(_, i, j)| (i * 3 + j) as f64);
        let x = cg_solve(|v| v.clone(), &b, Image::zeros(b.raw_dim()), &CgOptions::default());
        for (xi, bi) in x.iter().zip(b.iter()) {
            assert!((xi - bi).abs() < 1e-12, "expected {bi}, got {xi}");
        }
    }

    #[test]
    fn cg_solves_diagonal_system() {
        // diag(d) x = b with d = 1 + index, so x = b / d.
        let d = Array::from_shape_fn((2, 2, 2), |(c, i, j)| 1.0 + (c * 4 + i * 2 + j) as f64);
        let b = Array::from_shape_fn((2, 2, 2), |(c, i, j)| (c + i + j) as f64 - 1.0);
        let x = cg_solve(|v| v * &d, &b, Image::zeros(b.raw_dim()), &CgOptions::default());
        for ((xi, bi), di) in x.iter().zip(b.iter()).zip(d.iter()) {
            assert!((xi - bi / di).abs() < 1e-9, "expected {}, got {xi}", bi / di);
        }
    }

    #[test]
    fn cg_options_reject_invalid_values() {
        assert!(matches!(CgOptions::new(0.0, 10), Err(OperatorError::InvalidCgTol { .. })));
        assert!(matches!(CgOptions::new(f64::NAN, 10), Err(OperatorError::InvalidCgTol { .. })));
        assert_eq!(CgOptions::new(1e-6, 0), Err(OperatorError::InvalidCgMaxIter { max_iter: 0 }));
        assert!(CgOptions::new(1e-6, 5).is_ok());
    }
}
