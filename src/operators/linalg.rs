//! Small reductions on `ndarray` tensors shared by the operators and solvers.
//!
//! All helpers iterate in logical (row-major) order, so they work on views
//! with arbitrary strides. Shapes are asserted equal by the caller.
use ndarray::{ArrayBase, Data, Dimension};

/// Euclidean inner product `<a, b>` over all entries.
pub fn inner<S1, S2, D>(a: &ArrayBase<S1, D>, b: &ArrayBase<S2, D>) -> f64
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
    D: Dimension,
{
    debug_assert_eq!(a.shape(), b.shape());
    a.iter().zip(b.iter()).map(|(&x, &y)| x * y).sum()
}

/// Squared Euclidean norm `||a||^2`.
pub fn norm2<S, D>(a: &ArrayBase<S, D>) -> f64
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    a.iter().map(|&x| x * x).sum()
}

/// Euclidean norm `||a||`.
pub fn norm<S, D>(a: &ArrayBase<S, D>) -> f64
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    norm2(a).sqrt()
}

/// Squared distance `||a - b||^2` without allocating the difference.
pub fn dist2<S1, S2, D>(a: &ArrayBase<S1, D>, b: &ArrayBase<S2, D>) -> f64
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
    D: Dimension,
{
    debug_assert_eq!(a.shape(), b.shape());
    a.iter().zip(b.iter()).map(|(&x, &y)| (x - y) * (x - y)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn reductions_match_hand_computed_values() {
        let a = array![[1.0, 2.0], [3.0, 4.0]];
        let b = array![[0.5, -1.0], [2.0, 0.0]];

        assert_relative_eq!(inner(&a, &b), 0.5 - 2.0 + 6.0);
        assert_relative_eq!(norm2(&a), 30.0);
        assert_relative_eq!(norm(&a), 30.0_f64.sqrt());
        assert_relative_eq!(dist2(&a, &b), 0.25 + 9.0 + 1.0 + 16.0);
    }

    #[test]
    fn inner_handles_transposed_views() {
        let a = array![[1.0, 2.0], [3.0, 4.0]];
        let at = a.t();
        let b = array![[1.0, 3.0], [2.0, 4.0]];

        assert_relative_eq!(inner(&at, &b), norm2(&a));
    }
}
