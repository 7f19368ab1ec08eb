//! Linear operator abstraction for matrix-free solvers.
//!
//! The Krylov solvers never look inside the matrix: they only need a square
//! operator that can compute `y = A * x`.

use num_complex::Complex;
use num_traits::{One, Zero};
use splitsparse_core::Real;

/// A square complex linear operator.
///
/// # Panics
///
/// Implementations may panic if `x` or `y` do not have length [`dim`](Self::dim).
/// The solvers check every length before the first application.
pub trait ComplexOperator<T: Real> {
    /// Dimension of the operator (number of rows).
    fn dim(&self) -> usize;

    /// Number of columns; equal to [`dim`](Self::dim) for a square operator.
    fn ncols(&self) -> usize {
        self.dim()
    }

    /// Apply the operator: `y = A * x`.
    fn apply(&self, x: &[Complex<T>], y: &mut [Complex<T>]);

    /// Apply and accumulate: `y = alpha * A * x + beta * y`.
    ///
    /// The default goes through a temporary vector; implementations with a
    /// fused product should override it.
    fn apply_add(
        &self,
        alpha: Complex<T>,
        x: &[Complex<T>],
        beta: Complex<T>,
        y: &mut [Complex<T>],
    ) {
        let mut ax = vec![Complex::zero(); y.len()];
        self.apply(x, &mut ax);
        for (yi, axi) in y.iter_mut().zip(ax) {
            *yi = alpha * axi + beta * *yi;
        }
    }
}

/// `r = b - A * x`.
pub fn residual<T: Real>(
    op: &dyn ComplexOperator<T>,
    x: &[Complex<T>],
    b: &[Complex<T>],
    r: &mut [Complex<T>],
) {
    r.copy_from_slice(b);
    op.apply_add(-Complex::<T>::one(), x, Complex::one(), r);
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64 as C64;

    /// Diagonal operator relying on the default `apply_add`.
    struct DiagOp {
        diag: Vec<C64>,
    }

    impl ComplexOperator<f64> for DiagOp {
        fn dim(&self) -> usize {
            self.diag.len()
        }

        fn apply(&self, x: &[C64], y: &mut [C64]) {
            for i in 0..self.diag.len() {
                y[i] = self.diag[i] * x[i];
            }
        }
    }

    #[test]
    fn default_apply_add_scales_both_terms() {
        let op = DiagOp {
            diag: vec![C64::new(2.0, 0.0), C64::new(0.0, 1.0)],
        };
        let x = vec![C64::new(1.0, 0.0), C64::new(1.0, 0.0)];
        let mut y = vec![C64::new(1.0, 1.0), C64::new(2.0, 0.0)];

        op.apply_add(C64::new(3.0, 0.0), &x, C64::new(0.0, 1.0), &mut y);

        // 3 * 2 + i * (1 + i) = 5 + i
        assert_eq!(y[0], C64::new(5.0, 1.0));
        // 3 * i + i * 2 = 5i
        assert_eq!(y[1], C64::new(0.0, 5.0));
    }

    #[test]
    fn residual_of_exact_solution_is_zero() {
        let op = DiagOp {
            diag: vec![C64::new(2.0, 1.0), C64::new(4.0, 0.0)],
        };
        let x = vec![C64::new(1.0, 0.0), C64::new(0.5, 0.0)];
        let b = vec![C64::new(2.0, 1.0), C64::new(2.0, 0.0)];
        let mut r = vec![C64::default(); 2];

        residual(&op, &x, &b, &mut r);
        assert!(r.iter().all(|ri| ri.norm() == 0.0));
    }
}
