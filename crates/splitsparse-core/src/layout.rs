//! Storage layout policies: orientation × symmetry.
//!
//! A layout decides which axis is compressed (rows for `Row*`, columns for
//! `Col*`) and which logical entries are actually stored. Symmetric and
//! Hermitian layouts keep only the upper triangle (`i <= j`); reads of the lower
//! triangle are answered from the mirrored position.
//!
//! Layouts are zero-sized marker types used as a generic parameter of
//! [`SplitSparseMatrix`](crate::SplitSparseMatrix), so the index arithmetic is
//! resolved at compile time.

use std::fmt::Debug;
use std::ops::Range;

/// Symmetry class of a storage layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symmetry {
    /// Every entry is stored explicitly.
    General,
    /// `A[j][i] = A[i][j]`; only the upper triangle is stored.
    Symmetric,
    /// `A[j][i] = conj(A[i][j])`; only the upper triangle is stored.
    Hermitian,
}

/// Where a logical `(row, col)` entry lives in the compressed patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// Index of the compressed segment.
    pub major: usize,
    /// Index inside the segment.
    pub minor: usize,
    /// The logical entry is the conjugate of the stored one (Hermitian lower triangle).
    pub conjugate: bool,
}

/// Compile-time storage policy of a split sparse matrix.
pub trait Layout: Copy + Default + Debug + PartialEq + Eq + Send + Sync + 'static {
    /// Short name, used in logs and by the CLI.
    const NAME: &'static str;
    /// Rows are the compressed axis.
    const ROW_MAJOR: bool;
    /// Symmetry class.
    const SYMMETRY: Symmetry;

    /// Number of compressed segments for a `rows × cols` matrix.
    #[inline]
    fn major_dim(rows: usize, cols: usize) -> usize {
        if Self::ROW_MAJOR { rows } else { cols }
    }

    /// Extent of the indices stored inside a segment.
    #[inline]
    fn minor_dim(rows: usize, cols: usize) -> usize {
        if Self::ROW_MAJOR { cols } else { rows }
    }

    /// True if only the upper triangle is stored.
    #[inline]
    fn is_triangular() -> bool {
        Self::SYMMETRY != Symmetry::General
    }

    /// Map a logical `(i, j)` to its stored position.
    #[inline]
    fn locate(i: usize, j: usize) -> Position {
        let (i, j, conjugate) = if Self::is_triangular() && i > j {
            (j, i, Self::SYMMETRY == Symmetry::Hermitian)
        } else {
            (i, j, false)
        };
        if Self::ROW_MAJOR {
            Position { major: i, minor: j, conjugate }
        } else {
            Position { major: j, minor: i, conjugate }
        }
    }

    /// Inverse of [`locate`](Self::locate) for stored positions.
    #[inline]
    fn to_row_col(major: usize, minor: usize) -> (usize, usize) {
        if Self::ROW_MAJOR { (major, minor) } else { (minor, major) }
    }

    /// Minor indices a segment is allowed to hold.
    #[inline]
    fn minor_range(major: usize, minor_dim: usize) -> Range<usize> {
        match (Self::is_triangular(), Self::ROW_MAJOR) {
            (false, _) => 0..minor_dim,
            // upper triangle, row `major` holds columns major..n
            (true, true) => major.min(minor_dim)..minor_dim,
            // upper triangle, column `major` holds rows 0..=major
            (true, false) => 0..(major + 1).min(minor_dim),
        }
    }

    /// Number of cells a single component can store for this shape.
    ///
    /// `None` on overflow.
    fn storable_cells(rows: usize, cols: usize) -> Option<usize> {
        if Self::is_triangular() {
            let n = rows.min(cols);
            n.checked_add(1)
                .and_then(|m| n.checked_mul(m))
                .map(|c| c / 2)
        } else {
            rows.checked_mul(cols)
        }
    }
}

macro_rules! layout {
    ($(#[$doc:meta])* $name:ident, $row_major:expr, $symmetry:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub struct $name;

        impl Layout for $name {
            const NAME: &'static str = stringify!($name);
            const ROW_MAJOR: bool = $row_major;
            const SYMMETRY: Symmetry = $symmetry;
        }
    };
}

layout!(
    /// Compressed rows, every entry stored.
    RowMajor, true, Symmetry::General
);
layout!(
    /// Compressed columns, every entry stored.
    ColMajor, false, Symmetry::General
);
layout!(
    /// Compressed rows, complex symmetric, upper triangle stored.
    RowSym, true, Symmetry::Symmetric
);
layout!(
    /// Compressed columns, complex symmetric, upper triangle stored.
    ColSym, false, Symmetry::Symmetric
);
layout!(
    /// Compressed rows, Hermitian, upper triangle stored.
    RowHerm, true, Symmetry::Hermitian
);
layout!(
    /// Compressed columns, Hermitian, upper triangle stored.
    ColHerm, false, Symmetry::Hermitian
);
