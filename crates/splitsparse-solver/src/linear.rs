//! Direct reference solvers.
//!
//! Used to cross-check the iterative solvers and for small systems where a
//! factorization is cheaper than iterating. Both work on `f64` matrices.

use faer::prelude::*;
use nalgebra::DVector;
use num_complex::Complex64 as C64;
use splitsparse_core::{Layout, SplitSparseMatrix};

use crate::error::{Error, Result, check_dim};
use crate::sparse_operator::to_faer;

fn check_square<L: Layout>(matrix: &SplitSparseMatrix<f64, L>, rhs_len: usize) -> Result<()> {
    check_dim(matrix.rows(), matrix.cols())?;
    check_dim(matrix.rows(), rhs_len)
}

/// Solve `A x = b` with faer's sparse LU decomposition.
///
/// Symmetric and Hermitian layouts are expanded to the full matrix first.
pub fn solve_sparse_direct<L: Layout>(
    matrix: &SplitSparseMatrix<f64, L>,
    b: &[C64],
) -> Result<Vec<C64>> {
    check_square(matrix, b.len())?;
    let size = b.len();

    let sparse_mat = to_faer(matrix).ok_or(Error::SingularMatrix)?;
    let lu = sparse_mat.sp_lu().map_err(|_| Error::SingularMatrix)?;

    let faer_rhs = Col::<c64>::from_fn(size, |i| c64::new(b[i].re, b[i].im));
    let faer_x = lu.solve(&faer_rhs);

    let x: Vec<C64> = (0..size).map(|i| C64::new(faer_x[i].re, faer_x[i].im)).collect();
    if x.iter().any(|xi| !xi.is_finite()) {
        return Err(Error::SingularMatrix);
    }
    Ok(x)
}

/// Solve `A x = b` with nalgebra's dense LU decomposition of [`to_dense`].
///
/// [`to_dense`]: SplitSparseMatrix::to_dense
pub fn solve_dense<L: Layout>(matrix: &SplitSparseMatrix<f64, L>, b: &[C64]) -> Result<Vec<C64>> {
    check_square(matrix, b.len())?;

    let rhs = DVector::from_column_slice(b);
    let x = matrix.to_dense().lu().solve(&rhs).ok_or(Error::SingularMatrix)?;
    Ok(x.iter().copied().collect())
}
