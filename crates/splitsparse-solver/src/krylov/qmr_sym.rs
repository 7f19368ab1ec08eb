//! Quasi-minimal residual method for complex symmetric matrices.
//!
//! The Lanczos recurrences use the bilinear form `u·v = Σ uᵢvᵢ`, which makes
//! the method a short-recurrence solver for `A = Aᵀ` (not `A = Aᴴ`). Each
//! iteration costs one product with `A` and one preconditioner solve.
//!
//! Seven working vectors of length `n` are allocated per call and dropped on
//! return.

use num_complex::Complex;
use num_traits::{One, Zero};
use splitsparse_core::Real;

use super::check_system;
use crate::error::Result;
use crate::iteration::{BreakdownKind, IterationControl, SolveResult};
use crate::operator::{ComplexOperator, residual};
use crate::preconditioner::ComplexPreconditioner;
use crate::vector::{axpy, dot, norm2, scale, scale_real, xpay};

/// Solve `A x = b` with symmetric QMR.
///
/// `x` is the initial guess (ignored if the controller declares it zero) and
/// receives the solution. On breakdown `x` holds the last completed update.
pub fn qmr_sym<T: Real>(
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
    let one = Complex::<T>::one();

    let mut r = vec![zero; n];
    if iter.is_initial_guess_zero() {
        x.fill(zero);
        r.copy_from_slice(b);
    } else {
        residual(op, x, b, &mut r);
    }

    let mut v = r.clone();
    let mut y = vec![zero; n];
    precond.solve(&v, &mut y);
    let mut rho = norm2(&y);

    let mut p = vec![zero; n];
    let mut p_tilde = vec![zero; n];
    let mut d = vec![zero; n];
    let mut s = vec![zero; n];

    let mut gamma = one;
    let mut eta = -one;
    let mut theta = zero;
    let mut epsilon = zero;

    while !iter.finished(&r) {
        if rho.is_zero() {
            return Ok(SolveResult::breakdown(iter, "QMR", BreakdownKind::Rho));
        }

        let inv_rho = T::one() / rho;
        scale_real(inv_rho, &mut v);
        scale_real(inv_rho, &mut y);

        let delta = dot(&y, &v);
        if delta.is_zero() {
            return Ok(SolveResult::breakdown(iter, "QMR", BreakdownKind::Delta));
        }

        // p = y - (rho * delta / epsilon) * p
        if iter.is_first() {
            p.copy_from_slice(&y);
        } else {
            xpay(&y, -(delta * rho / epsilon), &mut p);
        }

        op.apply(&p, &mut p_tilde);

        epsilon = dot(&p, &p_tilde);
        if epsilon.is_zero() {
            return Ok(SolveResult::breakdown(iter, "QMR", BreakdownKind::Epsilon));
        }

        let beta = epsilon / delta;
        if beta.is_zero() {
            return Ok(SolveResult::breakdown(iter, "QMR", BreakdownKind::Beta));
        }

        // v = p_tilde - beta * v
        xpay(&p_tilde, -beta, &mut v);
        precond.solve(&v, &mut y);

        let rho_prev = rho;
        rho = norm2(&y);

        let gamma_prev = gamma;
        let theta_prev = theta;
        theta = Complex::new(rho, T::zero()) / (gamma_prev * beta);
        let gamma_sq_inv = one + theta * theta;
        // 1/√∞ is zero; complex division would give NaN
        gamma = if gamma_sq_inv.re.is_finite() && gamma_sq_inv.im.is_finite() { one / gamma_sq_inv.sqrt() } else { zero };
        if gamma.is_zero() {
            return Ok(SolveResult::breakdown(iter, "QMR", BreakdownKind::Gamma));
        }

        eta = -eta * rho_prev * gamma * gamma / (beta * gamma_prev * gamma_prev);

        if iter.is_first() {
            d.copy_from_slice(&p);
            scale(eta, &mut d);
            s.copy_from_slice(&p_tilde);
            scale(eta, &mut s);
        } else {
            let damping = theta_prev * theta_prev * gamma * gamma;
            scale(damping, &mut d);
            axpy(eta, &p, &mut d);
            scale(damping, &mut s);
            axpy(eta, &p_tilde, &mut s);
        }

        axpy(one, &d, x);
        axpy(-one, &s, &mut r);

        iter.advance();
    }

    let result = SolveResult::from_control(iter);
    if result.converged() {
        log::debug!(
            "QMR converged in {} iterations, residual {:e}",
            result.iterations,
            result.residual
        );
    } else {
        log::warn!("QMR stopped after {} iterations: {}", result.iterations, result.status);
    }
    Ok(result)
}
