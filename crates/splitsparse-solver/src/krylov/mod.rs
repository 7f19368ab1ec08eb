//! Krylov subspace solvers.
//!
//! All solvers share one calling convention:
//!
//! ```ignore
//! let result = qmr_sym(&matrix, &mut x, &b, &precond, &mut iteration)?;
//! ```
//!
//! The solution is written into `x`. The returned [`SolveResult`](crate::SolveResult)
//! says whether the iteration converged, ran out of budget or broke down; an
//! `Err` is only returned when the operator, preconditioner and vectors
//! disagree on the system size.
//!
//! # Module Structure
//!
//! - [`qmr_sym`] - QMR for complex symmetric matrices, bilinear recurrences
//! - [`cocg`] - conjugate orthogonal conjugate gradient, complex symmetric matrices
//! - [`gmres`] - restarted GMRES for general matrices

pub mod cocg;
pub mod gmres;
pub mod qmr_sym;

pub use cocg::cocg;
pub use gmres::gmres;
pub use qmr_sym::qmr_sym;

use num_complex::Complex;
use serde::{Deserialize, Serialize};
use splitsparse_core::Real;

use crate::error::{Result, check_dim};
use crate::operator::ComplexOperator;
use crate::preconditioner::ComplexPreconditioner;

/// GMRES solver configuration.
///
/// Tolerance and iteration budget live in the
/// [`IterationConfig`](crate::IterationConfig) of the controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GmresConfig {
    /// Restart parameter (Krylov subspace dimension before restart).
    pub restart: usize,
}

impl Default for GmresConfig {
    fn default() -> Self {
        Self { restart: 30 }
    }
}

/// Check that the operator is square and every participant of a solve has its
/// dimension.
pub(crate) fn check_system<T: Real>(
    op: &dyn ComplexOperator<T>,
    precond: &dyn ComplexPreconditioner<T>,
    x: &[Complex<T>],
    b: &[Complex<T>],
) -> Result<usize> {
    let n = op.dim();
    check_dim(n, op.ncols())?;
    check_dim(n, b.len())?;
    check_dim(n, x.len())?;
    check_dim(n, precond.dim())?;
    Ok(n)
}

#[cfg(test)]
pub(crate) mod test_support {
    use num_complex::Complex64 as C64;
    use splitsparse_core::{RowMajor, RowSym, SplitSparseMatrix};

    pub fn c(re: f64, im: f64) -> C64 {
        C64::new(re, im)
    }

    /// Diagonal matrix with the given complex entries.
    pub fn diagonal(diag: &[C64]) -> SplitSparseMatrix<f64, RowMajor> {
        let triplets: Vec<_> = diag.iter().enumerate().map(|(i, &d)| (i, i, d)).collect();
        SplitSparseMatrix::from_triplets(diag.len(), diag.len(), &triplets).unwrap()
    }

    /// Complex symmetric tridiagonal matrix: `4 + i` on the diagonal, `-1` beside it.
    pub fn tridiagonal(n: usize) -> SplitSparseMatrix<f64, RowSym> {
        let mut m = SplitSparseMatrix::with_shape(n, n).unwrap();
        for i in 0..n {
            m.add_interaction(i, i, c(4.0, 1.0)).unwrap();
            if i + 1 < n {
                m.add_interaction(i, i + 1, c(-1.0, 0.0)).unwrap();
            }
        }
        m
    }

    /// `[[0, 1], [1, 0]]`: every real vector `e_k` is mapped to an orthogonal one.
    pub fn swap() -> SplitSparseMatrix<f64, RowSym> {
        SplitSparseMatrix::from_triplets(2, 2, &[(0, 1, c(1.0, 0.0))]).unwrap()
    }

    /// `b = A * x` for a known `x`.
    pub fn rhs_for<L: splitsparse_core::Layout>(
        a: &SplitSparseMatrix<f64, L>,
        x: &[C64],
    ) -> Vec<C64> {
        let mut b = vec![C64::default(); x.len()];
        a.mlt(x, &mut b).unwrap();
        b
    }

    /// Known solution used with [`rhs_for`].
    pub fn reference_solution(n: usize) -> Vec<C64> {
        (0..n).map(|i| c(i as f64 + 1.0, -0.5 * i as f64)).collect()
    }

    pub fn max_error(x: &[C64], expected: &[C64]) -> f64 {
        x.iter()
            .zip(expected)
            .map(|(a, b)| (a - b).norm())
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gmres_config_default() {
        let config = GmresConfig::default();
        assert_eq!(config.restart, 30);
    }
}
