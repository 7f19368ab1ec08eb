//! Vector primitives on slices of complex values.
//!
//! Two inner products are provided: [`dot`] is the bilinear form `Σ aᵢbᵢ`
//! used by the complex symmetric solvers, [`dot_conj`] the Hermitian one
//! `Σ conj(aᵢ)bᵢ` used by GMRES.

use num_complex::Complex;
use num_traits::{One, Zero};
use splitsparse_core::Real;

/// Bilinear dot product `Σ a[i] * b[i]`, without conjugation.
pub fn dot<T: Real>(a: &[Complex<T>], b: &[Complex<T>]) -> Complex<T> {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b)
        .fold(Complex::zero(), |acc, (&ai, &bi)| acc + ai * bi)
}

/// Hermitian dot product `Σ conj(a[i]) * b[i]`.
pub fn dot_conj<T: Real>(a: &[Complex<T>], b: &[Complex<T>]) -> Complex<T> {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b)
        .fold(Complex::zero(), |acc, (&ai, &bi)| acc + ai.conj() * bi)
}

/// Euclidean norm.
pub fn norm2<T: Real>(v: &[Complex<T>]) -> T {
    v.iter()
        .fold(T::zero(), |acc, vi| acc + vi.norm_sqr())
        .sqrt()
}

/// `y += alpha * x`.
pub fn axpy<T: Real>(alpha: Complex<T>, x: &[Complex<T>], y: &mut [Complex<T>]) {
    debug_assert_eq!(x.len(), y.len());
    for (yi, &xi) in y.iter_mut().zip(x) {
        *yi += alpha * xi;
    }
}

/// `y = x + alpha * y`.
pub fn xpay<T: Real>(x: &[Complex<T>], alpha: Complex<T>, y: &mut [Complex<T>]) {
    debug_assert_eq!(x.len(), y.len());
    for (yi, &xi) in y.iter_mut().zip(x) {
        *yi = xi + alpha * *yi;
    }
}

/// `v *= alpha`.
pub fn scale<T: Real>(alpha: Complex<T>, v: &mut [Complex<T>]) {
    if alpha.is_one() {
        return;
    }
    for vi in v.iter_mut() {
        *vi = *vi * alpha;
    }
}

/// `v *= alpha` for a real factor.
pub fn scale_real<T: Real>(alpha: T, v: &mut [Complex<T>]) {
    for vi in v.iter_mut() {
        *vi = *vi * alpha;
    }
}

/// Compute Givens rotation coefficients for complex values.
///
/// Returns (c, s) such that:
/// ```text
/// [ c* s* ] [ a ]   [ r ]
/// [-s  c  ] [ b ] = [ 0 ]
/// ```
pub fn givens_rotation<T: Real>(a: Complex<T>, b: Complex<T>) -> (Complex<T>, Complex<T>) {
    if b.is_zero() {
        return (Complex::one(), Complex::zero());
    }
    let r = (a.norm_sqr() + b.norm_sqr()).sqrt();
    (a / r, b / r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64 as C64;

    #[test]
    fn bilinear_dot_does_not_conjugate() {
        let a = vec![C64::new(1.0, 0.0), C64::new(0.0, 1.0)];
        // 1 + i*i = 0
        assert_eq!(dot(&a, &a), C64::new(0.0, 0.0));
        // 1 + (-i)(i) = 2
        assert_eq!(dot_conj(&a, &a), C64::new(2.0, 0.0));
    }

    #[test]
    fn norm_of_complex_vector() {
        let v = vec![C64::new(3.0, 4.0)];
        assert!((norm2(&v) - 5.0).abs() < 1e-15);
        assert_eq!(norm2::<f64>(&[]), 0.0);
    }

    #[test]
    fn axpy_and_xpay() {
        let x = vec![C64::new(1.0, 1.0), C64::new(2.0, 0.0)];
        let mut y = vec![C64::new(1.0, 0.0), C64::new(0.0, 1.0)];
        axpy(C64::new(0.0, 1.0), &x, &mut y);
        assert_eq!(y, vec![C64::new(0.0, 1.0), C64::new(0.0, 3.0)]);

        xpay(&x, C64::new(2.0, 0.0), &mut y);
        assert_eq!(y, vec![C64::new(1.0, 3.0), C64::new(2.0, 6.0)]);
    }

    #[test]
    fn scaling() {
        let mut v = vec![C64::new(1.0, -1.0)];
        scale(C64::new(0.0, 1.0), &mut v);
        assert_eq!(v[0], C64::new(1.0, 1.0));
        scale_real(0.5, &mut v);
        assert_eq!(v[0], C64::new(0.5, 0.5));
    }

    #[test]
    fn givens_rotation_annihilates_second_component() {
        let a = C64::new(3.0, 1.0);
        let b = C64::new(4.0, -2.0);
        let (c, s) = givens_rotation(a, b);

        let new_b = -s * a + c * b;
        assert!(new_b.norm() < 1e-12);
        assert!((c.norm_sqr() + s.norm_sqr() - 1.0).abs() < 1e-12);

        let (c, s) = givens_rotation(a, C64::new(0.0, 0.0));
        assert_eq!((c, s), (C64::new(1.0, 0.0), C64::new(0.0, 0.0)));
    }
}
