//! operators::gradient — discrete 2D gradient `L` and its adjoint `L*`.
//!
//! Purpose
//! -------
//! Provide the per-channel forward-difference operator used by every TV
//! term in the crate, together with its exact adjoint (negative
//! divergence).
//!
//! Key behaviors
//! -------------
//! - [`GradientOperator::apply`] maps an image `(C, H, W)` to a gradient
//!   field `(C, 2, H, W)`: direction 0 differences along rows, direction 1
//!   along columns. The last row (direction 0) and last column
//!   (direction 1) are zero.
//! - [`GradientOperator::adjoint`] maps a gradient field back to an image
//!   and satisfies `<L u, g> = <u, L* g>` for every `u` and `g`, including
//!   fields with non-zero entries in the padded row/column (those entries
//!   are ignored).
//!
//! Invariants & assumptions
//! ------------------------
//! - Both maps are linear and channel-separable.
//! - `||L||^2 <= LNORM2 = 8` for this boundary convention.
//!
//! Conventions
//! -----------
//! - The operator is stateless; a unit struct is used so solvers can carry
//!   it alongside the forward operator and call it through methods.
//!
//! Testing notes
//! -------------
//! - Unit tests cover hand-computed differences, the adjoint identity on
//!   random tensors of several shapes, and degenerate 1-pixel extents.
use ndarray::{ArrayBase, Data, Ix3, Ix4, Zip, s};

use crate::operators::types::{GradField, Image, LNORM2, N_DIRECTIONS};

/// Forward-difference gradient with zero padding at the far boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GradientOperator;

impl GradientOperator {
    pub fn new() -> Self {
        GradientOperator
    }

    /// Compute `L(u)`.
    ///
    /// `g[c, 0, i, j] = u[c, i + 1, j] - u[c, i, j]` for `i < H - 1`, and
    /// `g[c, 1, i, j] = u[c, i, j + 1] - u[c, i, j]` for `j < W - 1`; all
    /// other entries are zero.
    pub fn apply<S>(&self, u: &ArrayBase<S, Ix3>) -> GradField
    where
        S: Data<Elem = f64>,
    {
        let (c, h, w) = u.dim();
        let mut g = GradField::zeros((c, N_DIRECTIONS, h, w));
        if h > 1 {
            Zip::from(g.slice_mut(s![.., 0, ..h - 1, ..]))
                .and(u.slice(s![.., 1.., ..]))
                .and(u.slice(s![.., ..h - 1, ..]))
                .for_each(|out, &next, &cur| *out = next - cur);
        }
        if w > 1 {
            Zip::from(g.slice_mut(s![.., 1, .., ..w - 1]))
                .and(u.slice(s![.., .., 1..]))
                .and(u.slice(s![.., .., ..w - 1]))
                .for_each(|out, &next, &cur| *out = next - cur);
        }
        g
    }

    /// Compute `L*(g)`, the negative divergence matching [`apply`](Self::apply).
    pub fn adjoint<S>(&self, g: &ArrayBase<S, Ix4>) -> Image
    where
        S: Data<Elem = f64>,
    {
        let (c, _, h, w) = g.dim();
        let mut x = Image::zeros((c, h, w));
        if h > 1 {
            let rows = g.slice(s![.., 0, ..h - 1, ..]);
            let mut head = x.slice_mut(s![.., ..h - 1, ..]);
            head -= &rows;
            let mut tail = x.slice_mut(s![.., 1.., ..]);
            tail += &rows;
        }
        if w > 1 {
            let cols = g.slice(s![.., 1, .., ..w - 1]);
            let mut head = x.slice_mut(s![.., .., ..w - 1]);
            head -= &cols;
            let mut tail = x.slice_mut(s![.., .., 1..]);
            tail += &cols;
        }
        x
    }

    /// Squared operator-norm bound used for step sizes.
    pub fn norm2_bound(&self) -> f64 {
        LNORM2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operators::linalg::inner;
    use approx::assert_relative_eq;
    use ndarray::{Array, array};
    use rand::{Rng, SeedableRng, rngs::StdRng};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Exact forward differences and zero padding of `apply`.
    // - The discrete adjoint identity for random images / fields.
    // - Degenerate extents (single row, single column, single pixel).
    //
    // They intentionally DO NOT cover:
    // - The operator-norm bound numerically; it is a closed-form constant.
    // -------------------------------------------------------------------------

    fn random_image(rng: &mut StdRng, dim: (usize, usize, usize)) -> Image {
        Array::from_shape_fn(dim, |_| rng.gen_range(-1.0..1.0))
    }

    fn random_field(rng: &mut StdRng, dim: (usize, usize, usize)) -> GradField {
        Array::from_shape_fn((dim.0, 2, dim.1, dim.2), |_| rng.gen_range(-1.0..1.0))
    }

    #[test]
    // Purpose
    // -------
    // Verify `apply` on a 3x3 single-channel ramp.
    //
    // Given
    // -----
    // - u[i, j] = 3 i + j.
    //
    // Expect
    // ------
    // - Row differences equal 3 except the padded last row.
    // - Column differences equal 1 except the padded last column.
    fn apply_matches_hand_computed_differences() {
        let u = array![[[0.0, 1.0, 2.0], [3.0, 4.0, 5.0], [6.0, 7.0, 8.0]]];
        let g = GradientOperator::new().apply(&u);

        let rows = array![[3.0, 3.0, 3.0], [3.0, 3.0, 3.0], [0.0, 0.0, 0.0]];
        let cols = array![[1.0, 1.0, 0.0], [1.0, 1.0, 0.0], [1.0, 1.0, 0.0]];
        assert_eq!(g.slice(s![0, 0, .., ..]), rows);
        assert_eq!(g.slice(s![0, 1, .., ..]), cols);
    }

    #[test]
    // Purpose
    // -------
    // Check the adjoint identity `<L u, g> = <u, L* g>` on random data.
    //
    // Given
    // -----
    // - Several shapes, including non-square and multi-channel images.
    // - Random gradient fields with non-zero padded entries.
    //
    // Expect
    // ------
    // - Both inner products agree to round-off.
    fn adjoint_identity_holds_on_random_tensors() {
        let op = GradientOperator::new();
        let mut rng = StdRng::seed_from_u64(7);
        for dim in [(1, 4, 4), (3, 5, 7), (2, 1, 6), (2, 6, 1), (1, 1, 1)] {
            let u = random_image(&mut rng, dim);
            let g = random_field(&mut rng, dim);

            let lhs = inner(&op.apply(&u), &g);
            let rhs = inner(&u, &op.adjoint(&g));
            assert_relative_eq!(lhs, rhs, epsilon = 1e-12, max_relative = 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // Ensure padded entries of the field do not leak into `L*`.
    //
    // Given
    // -----
    // - A field that is non-zero only on the last row of direction 0 and the
    //   last column of direction 1.
    //
    // Expect
    // ------
    // - `adjoint` returns exactly zero.
    fn adjoint_ignores_padded_entries() {
        let mut g = GradField::zeros((1, 2, 3, 3));
        g.slice_mut(s![0, 0, 2, ..]).fill(5.0);
        g.slice_mut(s![0, 1, .., 2]).fill(-4.0);

        let x = GradientOperator::new().adjoint(&g);
        assert!(x.iter().all(|&v| v == 0.0));
    }

    #[test]
    // Purpose
    // -------
    // A constant image has zero gradient, and a single pixel has no
    // differences at all.
    fn constant_and_single_pixel_images_have_zero_gradient() {
        let op = GradientOperator::new();
        let flat = Image::from_elem((2, 4, 5), 3.5);
        assert!(op.apply(&flat).iter().all(|&v| v == 0.0));

        let pixel = Image::from_elem((1, 1, 1), 2.0);
        let g = op.apply(&pixel);
        assert_eq!(g.dim(), (1, 2, 1, 1));
        assert!(g.iter().all(|&v| v == 0.0));
    }

    #[test]
    // Purpose
    // -------
    // Check that `LNORM2` bounds `||L u||^2 / ||u||^2` on a checkerboard, the
    // image that nearly attains the bound.
    fn checkerboard_respects_norm_bound() {
        let op = GradientOperator::new();
        let u = Array::from_shape_fn((1, 8, 8), |(_, i, j)| if (i + j) % 2 == 0 { 1.0 } else { -1.0 });
        let ratio = crate::operators::linalg::norm2(&op.apply(&u))
            / crate::operators::linalg::norm2(&u);
        assert!(ratio <= op.norm2_bound());
        assert!(ratio > 6.0);
    }
}
