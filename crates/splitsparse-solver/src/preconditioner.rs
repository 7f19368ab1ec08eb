//! Preconditioners for iterative solvers.
//!
//! A preconditioner `M` approximates `A`; the solvers only ever ask it for
//! `z = M^(-1) * r`.

use num_complex::Complex;
use num_traits::{One, Zero};
use splitsparse_core::{Layout, Real, SplitSparseMatrix};

/// A preconditioner for complex-valued linear systems.
pub trait ComplexPreconditioner<T: Real>: Send + Sync {
    /// Apply the preconditioner: `z = M^(-1) * r`.
    fn solve(&self, r: &[Complex<T>], z: &mut [Complex<T>]);

    /// Dimension of the preconditioner.
    fn dim(&self) -> usize;
}

// ============================================================================
// Jacobi (Diagonal) Preconditioner
// ============================================================================

/// Jacobi (diagonal) preconditioner.
///
/// Uses `M = diag(A)`, so `M^(-1) * r = r / diag(A)`. Diagonal entries that
/// are exactly zero are left unscaled.
#[derive(Debug, Clone)]
pub struct JacobiPreconditioner<T: Real> {
    /// Inverse of diagonal elements.
    inv_diag: Vec<Complex<T>>,
}

impl<T: Real> JacobiPreconditioner<T> {
    /// Create from the diagonal of a square split matrix.
    ///
    /// Real and imaginary diagonal coefficients are combined; an absent
    /// diagonal coefficient counts as zero.
    pub fn from_matrix<L: Layout>(matrix: &SplitSparseMatrix<T, L>) -> Self {
        let n = matrix.rows().min(matrix.cols());
        let mut diag = vec![Complex::zero(); n];
        for (i, j, value) in matrix.stored_entries() {
            if i == j {
                diag[i] = value;
            }
        }
        Self::from_diagonal(&diag)
    }

    /// Create from a diagonal vector.
    pub fn from_diagonal(diag: &[Complex<T>]) -> Self {
        let inv_diag = diag
            .iter()
            .map(|&d| {
                if d.is_zero() {
                    Complex::one()
                } else {
                    Complex::<T>::one() / d
                }
            })
            .collect();

        Self { inv_diag }
    }
}

impl<T: Real> ComplexPreconditioner<T> for JacobiPreconditioner<T> {
    fn solve(&self, r: &[Complex<T>], z: &mut [Complex<T>]) {
        assert_eq!(r.len(), self.inv_diag.len());
        assert_eq!(z.len(), self.inv_diag.len());

        for (zi, (&ri, &inv_di)) in z.iter_mut().zip(r.iter().zip(&self.inv_diag)) {
            *zi = ri * inv_di;
        }
    }

    fn dim(&self) -> usize {
        self.inv_diag.len()
    }
}

// ============================================================================
// Identity Preconditioner (no preconditioning)
// ============================================================================

/// Identity preconditioner (no-op).
///
/// Useful as a baseline or when no preconditioning is desired.
#[derive(Debug, Clone, Copy)]
pub struct IdentityPreconditioner {
    size: usize,
}

impl IdentityPreconditioner {
    /// Create an identity preconditioner of the given size.
    pub fn new(size: usize) -> Self {
        Self { size }
    }
}

impl<T: Real> ComplexPreconditioner<T> for IdentityPreconditioner {
    fn solve(&self, r: &[Complex<T>], z: &mut [Complex<T>]) {
        z.copy_from_slice(r);
    }

    fn dim(&self) -> usize {
        self.size
    }
}
