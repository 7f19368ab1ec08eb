//! Complex sparse matrix with split real/imaginary storage.
//!
//! The real and imaginary parts are kept in two independent compressed
//! patterns over the same logical shape, so a coefficient can be purely real,
//! purely imaginary, or both, without storing explicit zeros.
//!
//! # Example
//!
//! ```
//! use num_complex::Complex64;
//! use splitsparse_core::{RowMajor, SplitSparseMatrix};
//!
//! let mut a = SplitSparseMatrix::<f64, RowMajor>::with_shape(3, 3).unwrap();
//! *a.real_or_insert(0, 0).unwrap() = 2.0;
//! *a.imag_or_insert(0, 0).unwrap() = -1.0;
//! *a.imag_or_insert(2, 1).unwrap() = 4.0;
//!
//! assert_eq!(a.at(0, 0).unwrap(), Complex64::new(2.0, -1.0));
//! assert_eq!(a.at(2, 1).unwrap(), Complex64::new(0.0, 4.0));
//! assert_eq!(a.real_nnz(), 1);
//! assert_eq!(a.imag_nnz(), 2);
//! ```

use std::marker::PhantomData;

use nalgebra::DMatrix;
use num_complex::Complex;
use num_traits::{One, Zero};

use crate::error::{Error, Result};
use crate::layout::{Layout, RowMajor, Symmetry};
use crate::pattern::CompressedPattern;
use crate::scalar::Real;

/// Sparse `rows × cols` complex matrix stored as two real patterns.
///
/// The logical coefficient at `(i, j)` is
/// `Complex::new(real_or_zero(i, j), imag_or_zero(i, j))`. The layout `L`
/// selects the compressed axis and the symmetry class; see [`crate::layout`].
#[derive(Debug, Clone, PartialEq)]
pub struct SplitSparseMatrix<T: Real, L: Layout = RowMajor> {
    rows: usize,
    cols: usize,
    real: CompressedPattern<T>,
    imag: CompressedPattern<T>,
    _layout: PhantomData<L>,
}

impl<T: Real, L: Layout> Default for SplitSparseMatrix<T, L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Real, L: Layout> SplitSparseMatrix<T, L> {
    /// Empty `0 × 0` matrix.
    pub fn new() -> Self {
        Self {
            rows: 0,
            cols: 0,
            real: CompressedPattern::new(),
            imag: CompressedPattern::new(),
            _layout: PhantomData,
        }
    }

    /// Empty `rows × cols` matrix with no stored coefficient.
    pub fn with_shape(rows: usize, cols: usize) -> Result<Self> {
        let mut m = Self::new();
        m.reallocate(rows, cols)?;
        Ok(m)
    }

    /// Build from `(row, col, value)` triplets.
    ///
    /// Duplicates are summed. A zero real (imaginary) part does not create a
    /// real (imaginary) entry. For symmetric layouts lower-triangle triplets are
    /// folded onto the upper triangle (conjugated for Hermitian layouts).
    pub fn from_triplets(
        rows: usize,
        cols: usize,
        triplets: &[(usize, usize, Complex<T>)],
    ) -> Result<Self> {
        Self::check_shape(rows, cols)?;
        let major_dim = L::major_dim(rows, cols);

        let mut real = Vec::new();
        let mut imag = Vec::new();
        for &(i, j, value) in triplets {
            check_index(i, rows)?;
            check_index(j, cols)?;
            let pos = L::locate(i, j);
            let value = if pos.conjugate { value.conj() } else { value };
            if !value.re.is_zero() {
                real.push((pos.major, pos.minor, value.re));
            }
            if !value.im.is_zero() {
                imag.push((pos.major, pos.minor, value.im));
            }
        }

        let real = CompressedPattern::from_entries(major_dim, real)?;
        let imag = CompressedPattern::from_entries(major_dim, imag)?;
        Ok(Self::from_parts(rows, cols, real, imag))
    }

    pub(crate) fn from_parts(
        rows: usize,
        cols: usize,
        real: CompressedPattern<T>,
        imag: CompressedPattern<T>,
    ) -> Self {
        Self {
            rows,
            cols,
            real,
            imag,
            _layout: PhantomData,
        }
    }

    pub(crate) fn check_shape(rows: usize, cols: usize) -> Result<()> {
        if L::is_triangular() && rows != cols {
            return Err(Error::Dimension(format!(
                "{} storage needs a square matrix, got {rows} x {cols}",
                L::NAME
            )));
        }
        Ok(())
    }

    fn check_capacity(rows: usize, cols: usize, nz_real: usize, nz_imag: usize) -> Result<()> {
        let cells = L::storable_cells(rows, cols)
            .ok_or_else(|| Error::Dimension(format!("{rows} x {cols} overflows")))?;
        for (name, nz) in [("real", nz_real), ("imaginary", nz_imag)] {
            if nz > cells {
                let layout = L::NAME;
                return Err(Error::Dimension(format!(
                    "{nz} {name} nonzeros requested, {rows} x {cols} {layout} holds {cells}"
                )));
            }
        }
        Ok(())
    }

    /// Replace the whole content at once.
    fn commit(
        &mut self,
        rows: usize,
        cols: usize,
        real: CompressedPattern<T>,
        imag: CompressedPattern<T>,
    ) {
        self.rows = rows;
        self.cols = cols;
        self.real = real;
        self.imag = imag;
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Discard the content and become an empty `rows × cols` matrix.
    ///
    /// On allocation failure the matrix is left empty (`0 × 0`).
    pub fn reallocate(&mut self, rows: usize, cols: usize) -> Result<()> {
        Self::check_shape(rows, cols)?;
        self.clear();
        let major_dim = L::major_dim(rows, cols);
        let real = CompressedPattern::empty(major_dim)?;
        let imag = CompressedPattern::empty(major_dim)?;
        self.commit(rows, cols, real, imag);
        Ok(())
    }

    /// Discard the content and preallocate exactly `nz_real` / `nz_imag` coefficients.
    ///
    /// The preallocated coefficients are zero-valued and occupy the first cells
    /// of the shape in storage order, so both patterns are valid right away;
    /// callers typically overwrite them through [`set_data`](Self::set_data) or
    /// [`real_data_mut`](Self::real_data_mut). Counts larger than the number of
    /// storable cells fail with [`Error::Dimension`] and leave the matrix unchanged.
    pub fn reallocate_with_nnz(
        &mut self,
        rows: usize,
        cols: usize,
        nz_real: usize,
        nz_imag: usize,
    ) -> Result<()> {
        Self::check_shape(rows, cols)?;
        Self::check_capacity(rows, cols, nz_real, nz_imag)?;
        self.clear();

        let major_dim = L::major_dim(rows, cols);
        let minor_dim = L::minor_dim(rows, cols);
        let mut real = CompressedPattern::empty(major_dim)?;
        real.set_nnz(nz_real, minor_dim, L::minor_range)?;
        let mut imag = CompressedPattern::empty(major_dim)?;
        imag.set_nnz(nz_imag, minor_dim, L::minor_range)?;

        self.commit(rows, cols, real, imag);
        log::trace!(
            "reallocated {} {rows}x{cols} with {nz_real}+{nz_imag} nonzeros",
            L::NAME
        );
        Ok(())
    }

    /// Change the shape, keeping every coefficient whose position is still valid.
    ///
    /// New segments are empty. The matrix is unchanged if this fails.
    pub fn resize(&mut self, rows: usize, cols: usize) -> Result<()> {
        Self::check_shape(rows, cols)?;
        let major_dim = L::major_dim(rows, cols);
        let minor_dim = L::minor_dim(rows, cols);
        let real = self.real.resized(major_dim, minor_dim)?;
        let imag = self.imag.resized(major_dim, minor_dim)?;
        self.commit(rows, cols, real, imag);
        Ok(())
    }

    /// Change the shape and set the number of stored coefficients.
    ///
    /// Surviving coefficients keep their positions in the arrays; shrinking drops
    /// the tail, growing appends zero-valued coefficients in the first free
    /// cells after the last stored one. The matrix is unchanged if this fails.
    pub fn resize_with_nnz(
        &mut self,
        rows: usize,
        cols: usize,
        nz_real: usize,
        nz_imag: usize,
    ) -> Result<()> {
        Self::check_shape(rows, cols)?;
        Self::check_capacity(rows, cols, nz_real, nz_imag)?;
        let major_dim = L::major_dim(rows, cols);
        let minor_dim = L::minor_dim(rows, cols);

        let mut real = self.real.resized(major_dim, minor_dim)?;
        real.set_nnz(nz_real, minor_dim, L::minor_range)?;
        let mut imag = self.imag.resized(major_dim, minor_dim)?;
        imag.set_nnz(nz_imag, minor_dim, L::minor_range)?;

        self.commit(rows, cols, real, imag);
        Ok(())
    }

    /// Take ownership of caller-built patterns.
    ///
    /// The arrays are moved, not copied. Debug builds check the array lengths
    /// against the shape and fail with [`Error::Dimension`]; release builds
    /// trust the caller. Use [`check`](Self::check) for a full validation.
    pub fn set_data(
        &mut self,
        rows: usize,
        cols: usize,
        real: CompressedPattern<T>,
        imag: CompressedPattern<T>,
    ) -> Result<()> {
        if cfg!(debug_assertions) {
            Self::check_shape(rows, cols)?;
            let major_dim = L::major_dim(rows, cols);
            real.check_lengths(major_dim)?;
            imag.check_lengths(major_dim)?;
        }
        self.commit(rows, cols, real, imag);
        Ok(())
    }

    /// Hand both patterns back to the caller and become an empty `0 × 0` matrix.
    pub fn nullify(&mut self) -> (CompressedPattern<T>, CompressedPattern<T>) {
        let taken = std::mem::take(self);
        (taken.real, taken.imag)
    }

    /// Release all storage and become an empty `0 × 0` matrix.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Deep copy.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of stored real coefficients.
    pub fn real_nnz(&self) -> usize {
        self.real.nnz()
    }

    /// Number of stored imaginary coefficients.
    pub fn imag_nnz(&self) -> usize {
        self.imag.nnz()
    }

    /// Total number of stored coefficients (real + imaginary).
    pub fn data_size(&self) -> usize {
        self.real.nnz() + self.imag.nnz()
    }

    /// Bytes held by the six arrays.
    pub fn memory_size(&self) -> usize {
        self.real.memory_size() + self.imag.memory_size()
    }

    /// Real pattern.
    pub fn real(&self) -> &CompressedPattern<T> {
        &self.real
    }

    /// Imaginary pattern.
    pub fn imag(&self) -> &CompressedPattern<T> {
        &self.imag
    }

    /// Offsets of each major line in the real pattern.
    pub fn real_ptr(&self) -> &[usize] {
        self.real.ptr()
    }

    /// Minor index of each stored real coefficient.
    pub fn real_ind(&self) -> &[usize] {
        self.real.ind()
    }

    /// Stored real coefficients.
    pub fn real_data(&self) -> &[T] {
        self.real.data()
    }

    /// Stored real coefficients, writable in place.
    pub fn real_data_mut(&mut self) -> &mut [T] {
        self.real.data_mut()
    }

    /// Offsets of each major line in the imaginary pattern.
    pub fn imag_ptr(&self) -> &[usize] {
        self.imag.ptr()
    }

    /// Minor index of each stored imaginary coefficient.
    pub fn imag_ind(&self) -> &[usize] {
        self.imag.ind()
    }

    /// Stored imaginary coefficients.
    pub fn imag_data(&self) -> &[T] {
        self.imag.data()
    }

    /// Stored imaginary coefficients, writable in place.
    pub fn imag_data_mut(&mut self) -> &mut [T] {
        self.imag.data_mut()
    }

    /// Validate every structural invariant of both patterns.
    pub fn check(&self) -> Result<()> {
        Self::check_shape(self.rows, self.cols)?;
        let major_dim = L::major_dim(self.rows, self.cols);
        let minor_dim = L::minor_dim(self.rows, self.cols);
        self.real.check(major_dim, minor_dim)?;
        self.imag.check(major_dim, minor_dim)
    }

    // ------------------------------------------------------------------
    // Element access
    // ------------------------------------------------------------------

    fn check_bounds(&self, i: usize, j: usize) -> Result<()> {
        check_index(i, self.rows)?;
        check_index(j, self.cols)
    }

    /// Logical value at an in-bounds position.
    fn value_at(&self, i: usize, j: usize) -> Complex<T> {
        let pos = L::locate(i, j);
        let re = self.real.get(pos.major, pos.minor).unwrap_or_else(T::zero);
        let im = self.imag.get(pos.major, pos.minor).unwrap_or_else(T::zero);
        let value = Complex::new(re, im);
        if pos.conjugate { value.conj() } else { value }
    }

    /// Complex coefficient at `(i, j)`; absent parts read as zero.
    pub fn at(&self, i: usize, j: usize) -> Result<Complex<T>> {
        self.check_bounds(i, j)?;
        Ok(self.value_at(i, j))
    }

    /// Mutable reference to a stored real coefficient.
    ///
    /// Fails with [`Error::NoSuchEntry`] if `(i, j)` has no real coefficient;
    /// use [`real_or_insert`](Self::real_or_insert) to create it. For symmetric
    /// layouts a lower-triangle position addresses the mirrored stored one.
    pub fn real_ref(&mut self, i: usize, j: usize) -> Result<&mut T> {
        self.check_bounds(i, j)?;
        let pos = L::locate(i, j);
        self.real
            .get_mut(pos.major, pos.minor)
            .ok_or(Error::NoSuchEntry { row: i, col: j })
    }

    /// Mutable reference to a stored imaginary coefficient.
    ///
    /// For Hermitian layouts a lower-triangle position addresses the stored
    /// upper coefficient, whose logical lower value is its negation.
    pub fn imag_ref(&mut self, i: usize, j: usize) -> Result<&mut T> {
        self.check_bounds(i, j)?;
        let pos = L::locate(i, j);
        self.imag
            .get_mut(pos.major, pos.minor)
            .ok_or(Error::NoSuchEntry { row: i, col: j })
    }

    /// Mutable reference to the real coefficient at `(i, j)`, inserting a zero
    /// coefficient if it is not stored yet. Insertion costs O(nnz).
    pub fn real_or_insert(&mut self, i: usize, j: usize) -> Result<&mut T> {
        self.check_bounds(i, j)?;
        let pos = L::locate(i, j);
        self.real.get_or_insert(pos.major, pos.minor)
    }

    /// Mutable reference to the imaginary coefficient at `(i, j)`, inserting a
    /// zero coefficient if it is not stored yet. Insertion costs O(nnz).
    pub fn imag_or_insert(&mut self, i: usize, j: usize) -> Result<&mut T> {
        self.check_bounds(i, j)?;
        let pos = L::locate(i, j);
        self.imag.get_or_insert(pos.major, pos.minor)
    }

    /// Add `value` to the coefficient at `(i, j)`.
    ///
    /// Only the components with a non-zero part are touched, so adding a real
    /// number never creates an imaginary entry.
    pub fn add_interaction(&mut self, i: usize, j: usize, value: Complex<T>) -> Result<()> {
        self.check_bounds(i, j)?;
        let pos = L::locate(i, j);
        let value = if pos.conjugate { value.conj() } else { value };
        if !value.re.is_zero() {
            *self.real.get_or_insert(pos.major, pos.minor)? += value.re;
        }
        if !value.im.is_zero() {
            *self.imag.get_or_insert(pos.major, pos.minor)? += value.im;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Bulk mutators
    // ------------------------------------------------------------------

    /// Set every stored coefficient to zero, keeping the structure.
    pub fn zero(&mut self) {
        self.real.zero();
        self.imag.zero();
    }

    /// Write `value.re` into every real slot and `value.im` into every imaginary slot.
    pub fn fill(&mut self, value: Complex<T>) {
        self.real.fill(value.re);
        self.imag.fill(value.im);
    }

    /// Rebuild the patterns as the identity: ones on the real diagonal, no
    /// imaginary coefficient.
    pub fn set_identity(&mut self) -> Result<()> {
        let major_dim = L::major_dim(self.rows, self.cols);
        let n = self.rows.min(self.cols);
        let diagonal = (0..n).map(|k| (k, k, T::one())).collect();
        let real = CompressedPattern::from_entries(major_dim, diagonal)?;
        let imag = CompressedPattern::empty(major_dim)?;
        self.real = real;
        self.imag = imag;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Conversions and products
    // ------------------------------------------------------------------

    /// Stored positions as `(row, col, value)`, one per position present in
    /// either pattern, in storage order. Symmetric layouts yield the upper
    /// triangle only.
    pub fn stored_entries(&self) -> Vec<(usize, usize, Complex<T>)> {
        let mut out = Vec::with_capacity(self.data_size());
        for major in 0..self.real.major_dim() {
            let (re_ind, re_val) = segment_of(&self.real, major);
            let (im_ind, im_val) = segment_of(&self.imag, major);
            let (mut a, mut b) = (0, 0);
            while a < re_ind.len() || b < im_ind.len() {
                let ra = re_ind.get(a).copied().unwrap_or(usize::MAX);
                let ib = im_ind.get(b).copied().unwrap_or(usize::MAX);
                let (minor, value) = if ra < ib {
                    a += 1;
                    (ra, Complex::new(re_val[a - 1], T::zero()))
                } else if ib < ra {
                    b += 1;
                    (ib, Complex::new(T::zero(), im_val[b - 1]))
                } else {
                    a += 1;
                    b += 1;
                    (ra, Complex::new(re_val[a - 1], im_val[b - 1]))
                };
                let (i, j) = L::to_row_col(major, minor);
                out.push((i, j, value));
            }
        }
        out
    }

    /// Dense copy, for small matrices and cross-checks.
    pub fn to_dense(&self) -> DMatrix<Complex<T>> {
        DMatrix::from_fn(self.rows, self.cols, |i, j| self.value_at(i, j))
    }

    /// `y = alpha * A * x + beta * y`.
    ///
    /// Symmetric and Hermitian layouts apply both triangles.
    pub fn mlt_add(
        &self,
        alpha: Complex<T>,
        x: &[Complex<T>],
        beta: Complex<T>,
        y: &mut [Complex<T>],
    ) -> Result<()> {
        if x.len() != self.cols {
            return Err(Error::Dimension(format!(
                "input vector has length {}, matrix has {} columns",
                x.len(),
                self.cols
            )));
        }
        if y.len() != self.rows {
            return Err(Error::Dimension(format!(
                "output vector has length {}, matrix has {} rows",
                y.len(),
                self.rows
            )));
        }

        if beta.is_zero() {
            y.fill(Complex::zero());
        } else if !beta.is_one() {
            for yi in y.iter_mut() {
                *yi = *yi * beta;
            }
        }

        accumulate::<T, L>(&self.real, false, alpha, x, y);
        accumulate::<T, L>(&self.imag, true, alpha, x, y);
        Ok(())
    }

    /// `y = A * x`.
    pub fn mlt(&self, x: &[Complex<T>], y: &mut [Complex<T>]) -> Result<()> {
        self.mlt_add(Complex::one(), x, Complex::zero(), y)
    }
}

fn check_index(index: usize, dim: usize) -> Result<()> {
    if index >= dim {
        return Err(Error::Bounds { index, dim });
    }
    Ok(())
}

fn segment_of<T: Real>(pattern: &CompressedPattern<T>, major: usize) -> (&[usize], &[T]) {
    let seg = pattern.segment(major);
    (&pattern.ind()[seg.clone()], &pattern.data()[seg])
}

/// Add the contribution of one component to `y`.
fn accumulate<T: Real, L: Layout>(
    pattern: &CompressedPattern<T>,
    imaginary: bool,
    alpha: Complex<T>,
    x: &[Complex<T>],
    y: &mut [Complex<T>],
) {
    for (major, minor, v) in pattern.iter() {
        let (i, j) = L::to_row_col(major, minor);
        let a = if imaginary {
            Complex::new(T::zero(), v)
        } else {
            Complex::new(v, T::zero())
        };
        y[i] += alpha * a * x[j];
        if L::is_triangular() && i != j {
            let mirrored = if L::SYMMETRY == Symmetry::Hermitian { a.conj() } else { a };
            y[j] += alpha * mirrored * x[i];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{ColMajor, ColSym, RowHerm, RowSym};
    use num_complex::Complex64 as C64;

    fn c(re: f64, im: f64) -> C64 {
        C64::new(re, im)
    }

    fn sample() -> SplitSparseMatrix<f64> {
        SplitSparseMatrix::from_triplets(
            3,
            4,
            &[
                (0, 0, c(1.0, 0.0)),
                (0, 3, c(0.0, 2.0)),
                (1, 1, c(3.0, -1.0)),
                (2, 0, c(-4.0, 0.5)),
                (2, 2, c(5.0, 0.0)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn new_matrix_is_empty() {
        let m = SplitSparseMatrix::<f64>::new();
        assert_eq!((m.rows(), m.cols()), (0, 0));
        assert_eq!(m.data_size(), 0);
        assert_eq!(m.real_ptr(), &[0]);
        m.check().unwrap();
    }

    #[test]
    fn reallocate_gives_empty_patterns() {
        let mut m = sample();
        m.reallocate(5, 2).unwrap();
        assert_eq!((m.rows(), m.cols()), (5, 2));
        assert_eq!(m.real_nnz(), 0);
        assert_eq!(m.imag_nnz(), 0);
        assert_eq!(m.real_ptr(), &[0; 6]);
        assert_eq!(m.imag_ptr(), &[0; 6]);
    }

    #[test]
    fn reallocate_with_nnz_preallocates_valid_patterns() {
        let mut m = SplitSparseMatrix::<f64>::new();
        m.reallocate_with_nnz(3, 3, 4, 2).unwrap();
        assert_eq!(m.real_nnz(), 4);
        assert_eq!(m.imag_nnz(), 2);
        assert_eq!(m.real_ptr(), &[0, 3, 4, 4]);
        assert!(m.real_data().iter().all(|&v| v == 0.0));
        m.check().unwrap();
    }

    #[test]
    fn reallocate_with_too_many_nonzeros_fails() {
        let mut m = sample();
        let before = m.clone();
        let err = m.reallocate_with_nnz(2, 2, 5, 0).unwrap_err();
        assert!(matches!(err, Error::Dimension(_)));
        assert_eq!(m, before);

        // triangle of a 3x3 symmetric matrix holds 6 cells
        let mut s = SplitSparseMatrix::<f64, RowSym>::new();
        assert!(s.reallocate_with_nnz(3, 3, 6, 6).is_ok());
        assert!(s.reallocate_with_nnz(3, 3, 7, 0).is_err());
    }

    #[test]
    fn symmetric_layouts_require_square_shape() {
        let mut s = SplitSparseMatrix::<f64, ColSym>::new();
        assert!(matches!(s.reallocate(3, 4), Err(Error::Dimension(_))));
    }

    #[test]
    fn at_combines_independent_patterns() {
        let m = sample();
        assert_eq!(m.real_nnz(), 4);
        assert_eq!(m.imag_nnz(), 3);
        assert_eq!(m.at(0, 3).unwrap(), c(0.0, 2.0));
        assert_eq!(m.at(1, 1).unwrap(), c(3.0, -1.0));
        assert_eq!(m.at(2, 0).unwrap(), c(-4.0, 0.5));
        assert_eq!(m.at(1, 2).unwrap(), c(0.0, 0.0));
    }

    #[test]
    fn at_checks_bounds() {
        let m = sample();
        assert!(matches!(m.at(3, 0), Err(Error::Bounds { index: 3, dim: 3 })));
        assert!(matches!(m.at(0, 4), Err(Error::Bounds { index: 4, dim: 4 })));
    }

    #[test]
    fn ref_requires_existing_entry() {
        let mut m = sample();
        *m.real_ref(2, 2).unwrap() = 7.0;
        assert_eq!(m.at(2, 2).unwrap(), c(7.0, 0.0));

        assert!(matches!(
            m.imag_ref(2, 2),
            Err(Error::NoSuchEntry { row: 2, col: 2 })
        ));
        assert!(matches!(m.real_ref(0, 3), Err(Error::NoSuchEntry { .. })));
    }

    #[test]
    fn or_insert_materializes_entry() {
        let mut m = sample();
        *m.imag_or_insert(2, 2).unwrap() = 1.5;
        *m.real_or_insert(1, 3).unwrap() = -2.0;
        assert_eq!(m.at(2, 2).unwrap(), c(5.0, 1.5));
        assert_eq!(m.at(1, 3).unwrap(), c(-2.0, 0.0));
        assert_eq!(m.imag_nnz(), 4);
        assert_eq!(m.real_nnz(), 5);
        m.check().unwrap();
    }

    #[test]
    fn col_major_stores_by_column() {
        let mut m = SplitSparseMatrix::<f64, ColMajor>::with_shape(2, 3).unwrap();
        *m.real_or_insert(1, 2).unwrap() = 1.0;
        *m.real_or_insert(0, 2).unwrap() = 2.0;
        assert_eq!(m.real_ptr(), &[0, 0, 0, 2]);
        assert_eq!(m.real_ind(), &[0, 1]);
        assert_eq!(m.at(0, 2).unwrap(), c(2.0, 0.0));
    }

    #[test]
    fn symmetric_layout_mirrors_lower_triangle() {
        let mut m = SplitSparseMatrix::<f64, RowSym>::with_shape(3, 3).unwrap();
        *m.imag_or_insert(2, 0).unwrap() = 4.0;
        assert_eq!(m.imag_ptr(), &[0, 1, 1, 1]);
        assert_eq!(m.at(0, 2).unwrap(), c(0.0, 4.0));
        assert_eq!(m.at(2, 0).unwrap(), c(0.0, 4.0));
    }

    #[test]
    fn hermitian_layout_conjugates_lower_triangle() {
        let mut m = SplitSparseMatrix::<f64, RowHerm>::with_shape(2, 2).unwrap();
        m.add_interaction(0, 1, c(1.0, 2.0)).unwrap();
        assert_eq!(m.at(1, 0).unwrap(), c(1.0, -2.0));

        m.add_interaction(1, 0, c(0.0, -1.0)).unwrap();
        assert_eq!(m.at(0, 1).unwrap(), c(1.0, 3.0));
    }

    #[test]
    fn add_interaction_touches_nonzero_parts_only() {
        let mut m = SplitSparseMatrix::<f64>::with_shape(2, 2).unwrap();
        m.add_interaction(0, 1, c(2.0, 0.0)).unwrap();
        m.add_interaction(0, 1, c(1.0, 0.0)).unwrap();
        assert_eq!(m.real_nnz(), 1);
        assert_eq!(m.imag_nnz(), 0);
        assert_eq!(m.at(0, 1).unwrap(), c(3.0, 0.0));
    }

    #[test]
    fn resize_preserves_surviving_entries() {
        let mut m = sample();
        m.resize(4, 6).unwrap();
        assert_eq!(m.at(2, 0).unwrap(), c(-4.0, 0.5));
        assert_eq!(m.at(0, 3).unwrap(), c(0.0, 2.0));
        assert_eq!(m.at(3, 5).unwrap(), c(0.0, 0.0));
        m.check().unwrap();

        m.resize(2, 2).unwrap();
        assert_eq!(m.real_nnz(), 2);
        assert_eq!(m.imag_nnz(), 1);
        assert_eq!(m.at(1, 1).unwrap(), c(3.0, -1.0));
    }

    #[test]
    fn resize_with_nnz_keeps_prefix() {
        let mut m = sample();
        let real_prefix = m.real_data()[..2].to_vec();
        m.resize_with_nnz(3, 4, 2, 5).unwrap();
        assert_eq!(m.real_data(), &real_prefix[..]);
        assert_eq!(m.imag_nnz(), 5);
        assert_eq!(m.at(2, 0).unwrap().im, 0.5);
        m.check().unwrap();
    }

    #[test]
    fn set_data_moves_arrays() {
        let real = CompressedPattern::from_raw_parts(vec![0, 1, 2], vec![1, 0], vec![2.0, 3.0]);
        let imag = CompressedPattern::from_raw_parts(vec![0, 0, 1], vec![1], vec![-1.0]);

        let mut m = SplitSparseMatrix::<f64>::new();
        m.set_data(2, 2, real, imag).unwrap();
        assert_eq!(m.at(0, 1).unwrap(), c(2.0, 0.0));
        assert_eq!(m.at(1, 1).unwrap(), c(0.0, -1.0));

        let (real, imag) = m.nullify();
        assert_eq!(real.ind(), &[1, 0]);
        assert_eq!(imag.data(), &[-1.0]);
        assert_eq!((m.rows(), m.cols()), (0, 0));
    }

    #[cfg(debug_assertions)]
    #[test]
    fn set_data_rejects_bad_lengths_in_debug() {
        let real = CompressedPattern::from_raw_parts(vec![0, 1], vec![0], vec![1.0]);
        let imag = CompressedPattern::<f64>::empty(2).unwrap();
        let mut m = SplitSparseMatrix::<f64>::new();
        assert!(matches!(m.set_data(2, 2, real, imag), Err(Error::Dimension(_))));
    }

    #[test]
    fn zero_keeps_structure() {
        let mut m = sample();
        let (ptr, ind) = (m.real_ptr().to_vec(), m.real_ind().to_vec());
        let stored = m.data_size();
        m.zero();
        assert_eq!(m.data_size(), stored);
        assert_eq!(m.real_ptr(), &ptr[..]);
        assert_eq!(m.real_ind(), &ind[..]);
        assert!(m.real_data().iter().chain(m.imag_data()).all(|&v| v == 0.0));
    }

    #[test]
    fn fill_writes_each_component() {
        let mut m = sample();
        m.fill(c(2.0, -3.0));
        assert_eq!(m.at(0, 0).unwrap(), c(2.0, 0.0));
        assert_eq!(m.at(0, 3).unwrap(), c(0.0, -3.0));
        assert_eq!(m.at(1, 1).unwrap(), c(2.0, -3.0));
    }

    #[test]
    fn set_identity_rebuilds_pattern() {
        let mut m = sample();
        m.set_identity().unwrap();
        assert_eq!(m.real_nnz(), 3);
        assert_eq!(m.imag_nnz(), 0);
        for i in 0..3 {
            assert_eq!(m.at(i, i).unwrap(), c(1.0, 0.0));
        }
        assert_eq!(m.at(2, 0).unwrap(), c(0.0, 0.0));
    }

    #[test]
    fn copy_is_independent() {
        let m = sample();
        let mut copy = m.copy();
        *copy.real_ref(0, 0).unwrap() = 9.0;
        assert_eq!(m.at(0, 0).unwrap(), c(1.0, 0.0));
        assert_eq!(copy.at(0, 0).unwrap(), c(9.0, 0.0));
    }

    #[test]
    fn stored_entries_merge_components() {
        let m = sample();
        let entries = m.stored_entries();
        assert_eq!(
            entries,
            vec![
                (0, 0, c(1.0, 0.0)),
                (0, 3, c(0.0, 2.0)),
                (1, 1, c(3.0, -1.0)),
                (2, 0, c(-4.0, 0.5)),
                (2, 2, c(5.0, 0.0)),
            ]
        );
    }

    #[test]
    fn matvec_matches_dense_product() {
        let m = sample();
        let x = vec![c(1.0, 1.0), c(2.0, 0.0), c(0.0, -1.0), c(0.5, 0.5)];
        let mut y = vec![c(0.0, 0.0); 3];
        m.mlt(&x, &mut y).unwrap();

        let dense = m.to_dense();
        for i in 0..3 {
            let expected: C64 = (0..4).map(|j| dense[(i, j)] * x[j]).sum();
            assert!((y[i] - expected).norm() < 1e-14);
        }
    }

    #[test]
    fn matvec_add_scales_output() {
        let m = SplitSparseMatrix::<f64>::from_triplets(
            2,
            2,
            &[(0, 0, c(2.0, 0.0)), (1, 1, c(0.0, 1.0))],
        )
        .unwrap();
        let x = vec![c(1.0, 0.0), c(1.0, 0.0)];
        let mut y = vec![c(1.0, 0.0), c(1.0, 0.0)];
        m.mlt_add(c(-1.0, 0.0), &x, c(2.0, 0.0), &mut y).unwrap();
        assert_eq!(y, vec![c(0.0, 0.0), c(2.0, -1.0)]);
    }

    #[test]
    fn symmetric_matvec_uses_both_triangles() {
        let triplets = [
            (0, 0, c(2.0, 1.0)),
            (0, 1, c(-1.0, 0.5)),
            (1, 1, c(3.0, 0.0)),
        ];
        let sym = SplitSparseMatrix::<f64, RowSym>::from_triplets(2, 2, &triplets).unwrap();
        let general = SplitSparseMatrix::<f64>::from_triplets(
            2,
            2,
            &[triplets[0], triplets[1], (1, 0, c(-1.0, 0.5)), triplets[2]],
        )
        .unwrap();

        let x = vec![c(1.0, -2.0), c(0.5, 3.0)];
        let mut ys = vec![c(0.0, 0.0); 2];
        let mut yg = vec![c(0.0, 0.0); 2];
        sym.mlt(&x, &mut ys).unwrap();
        general.mlt(&x, &mut yg).unwrap();
        for (a, b) in ys.iter().zip(&yg) {
            assert!((a - b).norm() < 1e-14);
        }
        assert_eq!(sym.to_dense(), general.to_dense());
    }

    #[test]
    fn matvec_rejects_wrong_lengths() {
        let m = sample();
        let mut y = vec![c(0.0, 0.0); 3];
        assert!(matches!(m.mlt(&[c(1.0, 0.0)], &mut y), Err(Error::Dimension(_))));
    }

    #[test]
    fn single_precision_storage() {
        let mut m = SplitSparseMatrix::<f32>::with_shape(2, 2).unwrap();
        *m.imag_or_insert(1, 0).unwrap() = 0.25;
        assert_eq!(m.at(1, 0).unwrap(), num_complex::Complex32::new(0.0, 0.25));
    }
}
