//! Conjugate orthogonal conjugate gradient (COCG).
//!
//! Conjugate gradient with the bilinear form `u·v = Σ uᵢvᵢ` in place of the
//! Hermitian inner product, for complex symmetric `A`. Cheaper per iteration
//! than QMR (no smoothing), with an irregular residual history.

use num_complex::Complex;
use num_traits::Zero;
use splitsparse_core::Real;

use super::check_system;
use crate::error::Result;
use crate::iteration::{BreakdownKind, IterationControl, SolveResult};
use crate::operator::{ComplexOperator, residual};
use crate::preconditioner::ComplexPreconditioner;
use crate::vector::{axpy, dot, xpay};

/// Solve `A x = b` with preconditioned COCG.
///
/// Breakdowns: `r·z = 0` is [`BreakdownKind::Rho`], `p·Ap = 0` is
/// [`BreakdownKind::Curvature`].
pub fn cocg<T: Real>(
    op: &dyn ComplexOperator<T>,
    x: &mut [Complex<T>],
    b: &[Complex<T>],
    precond: &dyn ComplexPreconditioner<T>,
    iter: &mut dyn IterationControl<T>,
) -> Result<SolveResult<T>> {
    let n = check_system(op, precond, x, b)?;

    if iter.init(b).is_err() {
        x.fill(Complex::zero());
        return Ok(SolveResult::trivial());
    }

    let zero = Complex::<T>::zero();
    let mut r = vec![zero; n];
    if iter.is_initial_guess_zero() {
        x.fill(zero);
        r.copy_from_slice(b);
    } else {
        residual(op, x, b, &mut r);
    }

    let mut z = vec![zero; n];
    let mut p = vec![zero; n];
    let mut q = vec![zero; n];
    let mut rho_prev = zero;

    while !iter.finished(&r) {
        precond.solve(&r, &mut z);

        let rho = dot(&r, &z);
        if rho.is_zero() {
            return Ok(SolveResult::breakdown(iter, "COCG", BreakdownKind::Rho));
        }

        if iter.is_first() {
            p.copy_from_slice(&z);
        } else {
            xpay(&z, rho / rho_prev, &mut p);
        }

        op.apply(&p, &mut q);

        let delta = dot(&p, &q);
        if delta.is_zero() {
            return Ok(SolveResult::breakdown(iter, "COCG", BreakdownKind::Curvature));
        }

        let alpha = rho / delta;
        axpy(alpha, &p, x);
        axpy(-alpha, &q, &mut r);

        rho_prev = rho;
        iter.advance();
    }

    let result = SolveResult::from_control(iter);
    if result.converged() {
        log::debug!(
            "COCG converged in {} iterations, residual {:e}",
            result.iterations,
            result.residual
        );
    } else {
        log::warn!("COCG stopped after {} iterations: {}", result.iterations, result.status);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iteration::{Iteration, IterationConfig, SolveStatus};
    use crate::krylov::test_support::*;
    use crate::preconditioner::{IdentityPreconditioner, JacobiPreconditioner};
    use num_complex::Complex64 as C64;

    fn controller(tol: f64, max_iter: usize) -> Iteration<f64> {
        Iteration::new(IterationConfig::default().with_tol(tol).with_max_iter(max_iter))
    }

    #[test]
    fn cocg_diagonal_system() {
        let a = diagonal(&[c(2.0, 0.0), c(3.0, 0.0), c(5.0, 0.0)]);
        let b = vec![c(4.0, 0.0), c(9.0, 0.0), c(15.0, 0.0)];
        let mut x = vec![C64::default(); 3];
        let mut iter = controller(1e-10, 100);

        let result = cocg(&a, &mut x, &b, &IdentityPreconditioner::new(3), &mut iter).unwrap();

        assert!(result.converged());
        assert!(result.iterations <= 3);
        assert!(max_error(&x, &[c(2.0, 0.0), c(3.0, 0.0), c(3.0, 0.0)]) < 1e-10);
    }

    #[test]
    fn cocg_complex_symmetric_tridiagonal() {
        let n = 20;
        let a = tridiagonal(n);
        let expected = reference_solution(n);
        let b = rhs_for(&a, &expected);

        for jacobi in [false, true] {
            let mut x = vec![C64::default(); n];
            let mut iter = controller(1e-10, 100);
            let precond: Box<dyn ComplexPreconditioner<f64>> = if jacobi {
                Box::new(JacobiPreconditioner::from_matrix(&a))
            } else {
                Box::new(IdentityPreconditioner::new(n))
            };
            let result = cocg(&a, &mut x, &b, precond.as_ref(), &mut iter).unwrap();

            assert!(result.converged(), "jacobi = {jacobi}: {:?}", result.status);
            assert!(result.iterations <= n);
            assert!(max_error(&x, &expected) < 1e-7);
        }
    }

    #[test]
    fn cocg_rho_breakdown_on_isotropic_rhs() {
        let a = diagonal(&[c(1.0, 0.0), c(1.0, 0.0)]);
        let b = vec![c(1.0, 0.0), c(0.0, 1.0)];
        let mut x = vec![C64::default(); 2];
        let mut iter = controller(1e-10, 100);

        let result = cocg(&a, &mut x, &b, &IdentityPreconditioner::new(2), &mut iter).unwrap();

        assert_eq!(result.status, SolveStatus::Breakdown(BreakdownKind::Rho));
        assert_eq!(iter.error_code(), 1);
        assert_eq!(x, vec![C64::default(); 2]);
    }

    #[test]
    fn cocg_curvature_breakdown() {
        let a = swap();
        let b = vec![c(1.0, 0.0), c(0.0, 0.0)];
        let mut x = vec![C64::default(); 2];
        let mut iter = controller(1e-10, 100);

        let result = cocg(&a, &mut x, &b, &IdentityPreconditioner::new(2), &mut iter).unwrap();

        assert_eq!(result.status, SolveStatus::Breakdown(BreakdownKind::Curvature));
        assert_eq!(iter.error_code(), 2);
    }

    #[test]
    fn cocg_reports_iteration_budget() {
        let n = 20;
        let a = tridiagonal(n);
        let b = rhs_for(&a, &reference_solution(n));
        let mut x = vec![C64::default(); n];
        let mut iter = controller(1e-10, 4);

        let result = cocg(&a, &mut x, &b, &IdentityPreconditioner::new(n), &mut iter).unwrap();

        assert_eq!(result.status, SolveStatus::MaxIterations);
        assert_eq!(result.iterations, 4);
    }

    #[test]
    fn cocg_zero_rhs_gives_zero_solution() {
        let a = diagonal(&[c(2.0, 0.0)]);
        let mut x = vec![c(3.0, 0.0)];
        let mut iter = controller(1e-10, 100);

        let identity = IdentityPreconditioner::new(1);
        let result = cocg(&a, &mut x, &[C64::default()], &identity, &mut iter).unwrap();

        assert!(result.converged());
        assert_eq!(x[0], C64::default());
    }
}
