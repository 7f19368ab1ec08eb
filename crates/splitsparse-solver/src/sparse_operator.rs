//! Split matrices as solver operators, and the bridge to faer.
//!
//! [`SplitSparseMatrix`] implements [`ComplexOperator`] directly. For the
//! direct solvers the matrix can also be converted to a faer
//! `SparseColMat<usize, c64>` holding the full logical matrix (both triangles
//! for symmetric layouts).

use faer::prelude::*;
use faer::sparse::{SparseColMat, Triplet};
use num_complex::Complex;
use splitsparse_core::{Layout, Real, SplitSparseMatrix, Symmetry};

use crate::operator::ComplexOperator;

/// # Panics
///
/// `apply` panics if the matrix is not square or the vectors do not match its
/// dimension.
impl<T: Real, L: Layout> ComplexOperator<T> for SplitSparseMatrix<T, L> {
    fn dim(&self) -> usize {
        self.rows()
    }

    fn ncols(&self) -> usize {
        self.cols()
    }

    fn apply(&self, x: &[Complex<T>], y: &mut [Complex<T>]) {
        if let Err(err) = self.mlt(x, y) {
            panic!("sparse operator: {err}");
        }
    }

    fn apply_add(
        &self,
        alpha: Complex<T>,
        x: &[Complex<T>],
        beta: Complex<T>,
        y: &mut [Complex<T>],
    ) {
        if let Err(err) = self.mlt_add(alpha, x, beta, y) {
            panic!("sparse operator: {err}");
        }
    }
}

/// Every logical nonzero as `(row, col, value)`.
///
/// Symmetric and Hermitian layouts are expanded to both triangles.
pub fn logical_entries<T: Real, L: Layout>(
    matrix: &SplitSparseMatrix<T, L>,
) -> Vec<(usize, usize, Complex<T>)> {
    let stored = matrix.stored_entries();
    if !L::is_triangular() {
        return stored;
    }

    let mut out = Vec::with_capacity(2 * stored.len());
    for (i, j, v) in stored {
        out.push((i, j, v));
        if i != j {
            let mirrored = if L::SYMMETRY == Symmetry::Hermitian { v.conj() } else { v };
            out.push((j, i, mirrored));
        }
    }
    out
}

/// Convert to a faer sparse column matrix.
///
/// Returns `None` if faer rejects the pattern.
pub fn to_faer<L: Layout>(matrix: &SplitSparseMatrix<f64, L>) -> Option<SparseColMat<usize, c64>> {
    let faer_triplets: Vec<_> = logical_entries(matrix)
        .into_iter()
        .map(|(r, c, v)| Triplet::new(r, c, c64::new(v.re, v.im)))
        .collect();

    SparseColMat::<usize, c64>::try_new_from_triplets(matrix.rows(), matrix.cols(), &faer_triplets)
        .ok()
}
