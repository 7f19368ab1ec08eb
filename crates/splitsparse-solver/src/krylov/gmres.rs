//! Restarted, right-preconditioned GMRES.
//!
//! Solves `A M^(-1) u = b` with `x = M^(-1) u`, using modified Gram-Schmidt
//! with the Hermitian inner product and Givens rotations on the Hessenberg
//! matrix. Works for any nonsingular `A`, symmetric or not.
//!
//! Each Arnoldi step counts as one iteration of the controller. The residual
//! estimate `|g[k]|` drives the inner loop; the true residual is checked at
//! every restart.

use num_complex::Complex;
use num_traits::Zero;
use splitsparse_core::Real;

use super::{GmresConfig, check_system};
use crate::error::{Error, Result};
use crate::iteration::{IterationControl, SolveResult};
use crate::operator::{ComplexOperator, residual};
use crate::preconditioner::ComplexPreconditioner;
use crate::vector::{axpy, dot_conj, givens_rotation, norm2, scale_real};

/// Solve `A x = b` with restarted GMRES.
///
/// Fails with [`Error::InvalidConfig`] if the restart length is zero.
pub fn gmres<T: Real>(
    op: &dyn ComplexOperator<T>,
    x: &mut [Complex<T>],
    b: &[Complex<T>],
    precond: &dyn ComplexPreconditioner<T>,
    iter: &mut dyn IterationControl<T>,
    config: &GmresConfig,
) -> Result<SolveResult<T>> {
    let n = check_system(op, precond, x, b)?;
    if config.restart == 0 {
        return Err(Error::InvalidConfig("GMRES restart length must be positive".into()));
    }

    if iter.init(b).is_err() {
        x.fill(Complex::zero());
        return Ok(SolveResult::trivial());
    }

    let zero = Complex::<T>::zero();
    if iter.is_initial_guess_zero() {
        x.fill(zero);
    }

    let m = config.restart.min(n);
    let mut r = vec![zero; n];
    let mut w = vec![zero; n];
    let mut cycle = 0usize;

    loop {
        residual(op, x, b, &mut r);
        let r_norm = norm2(&r);
        if iter.finished_with_norm(r_norm) {
            break;
        }
        cycle += 1;
        log::debug!("GMRES restart cycle {cycle}, residual {:e}", iter.residual());

        // Arnoldi process with modified Gram-Schmidt
        let mut v: Vec<Vec<Complex<T>>> = Vec::with_capacity(m + 1);
        let mut z: Vec<Vec<Complex<T>>> = Vec::with_capacity(m);
        let mut h = vec![vec![zero; m + 1]; m];

        scale_real(T::one() / r_norm, &mut r);
        v.push(r.clone());

        // g = ||r|| * e_1
        let mut g = vec![zero; m + 1];
        g[0] = Complex::new(r_norm, T::zero());

        let mut cs = vec![zero; m];
        let mut sn = vec![zero; m];

        let mut k = 0;
        while k < m {
            let mut zk = vec![zero; n];
            precond.solve(&v[k], &mut zk);
            op.apply(&zk, &mut w);
            z.push(zk);

            for j in 0..=k {
                let hjk = dot_conj(&v[j], &w);
                h[k][j] = hjk;
                axpy(-hjk, &v[j], &mut w);
            }

            let w_norm = norm2(&w);
            h[k][k + 1] = Complex::new(w_norm, T::zero());

            // Apply previous Givens rotations to column k
            for j in 0..k {
                let temp = cs[j].conj() * h[k][j] + sn[j].conj() * h[k][j + 1];
                h[k][j + 1] = -sn[j] * h[k][j] + cs[j] * h[k][j + 1];
                h[k][j] = temp;
            }

            let (c, s) = givens_rotation(h[k][k], h[k][k + 1]);
            cs[k] = c;
            sn[k] = s;

            h[k][k] = c.conj() * h[k][k] + s.conj() * h[k][k + 1];
            h[k][k + 1] = zero;

            let temp_g = c.conj() * g[k] + s.conj() * g[k + 1];
            g[k + 1] = -s * g[k] + c * g[k + 1];
            g[k] = temp_g;

            iter.advance();
            k += 1;

            // lucky breakdown: the Krylov space is invariant
            if w_norm.is_zero() {
                break;
            }

            let mut next = w.clone();
            scale_real(T::one() / w_norm, &mut next);
            v.push(next);

            if iter.finished_with_norm(g[k].norm()) {
                break;
            }
        }

        // Back-substitution to find y from H*y = g
        let mut y = vec![zero; k];
        for i in (0..k).rev() {
            let mut sum = g[i];
            for j in (i + 1)..k {
                sum -= h[j][i] * y[j];
            }
            if !h[i][i].is_zero() {
                y[i] = sum / h[i][i];
            }
        }

        // x = x + Z * y
        for (zi, &yi) in z.iter().zip(&y) {
            axpy(yi, zi, x);
        }
    }

    let result = SolveResult::from_control(iter);
    if result.converged() {
        log::debug!(
            "GMRES converged in {} iterations ({cycle} cycles), residual {:e}",
            result.iterations,
            result.residual
        );
    } else {
        log::warn!("GMRES stopped after {} iterations: {}", result.iterations, result.status);
    }
    Ok(result)
}
