//! Split-storage complex sparse matrices.
//!
//! This crate provides:
//! - [`CompressedPattern`]: one compressed sparse pattern (pointer, index, value arrays)
//! - [`SplitSparseMatrix`]: a complex matrix built from independent real and imaginary patterns
//! - Storage layouts for row/column orientation and general/symmetric/Hermitian storage
//! - A bit-exact binary format and a coordinate text format

pub mod error;
pub mod io;
pub mod layout;
pub mod matrix;
pub mod pattern;
pub mod scalar;

pub use error::{Error, Result};
pub use layout::{ColHerm, ColMajor, ColSym, Layout, Position, RowHerm, RowMajor, RowSym, Symmetry};
pub use matrix::SplitSparseMatrix;
pub use pattern::CompressedPattern;
pub use scalar::Real;
