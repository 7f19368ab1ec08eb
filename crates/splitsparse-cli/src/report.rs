//! Result summaries and their text/JSON output.

use serde::Serialize;
use splitsparse_core::{Layout, SplitSparseMatrix};
use splitsparse_solver::SolveStatus;

use crate::method::Method;

/// Shape and storage summary of a loaded matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixSummary {
    pub file: String,
    pub layout: &'static str,
    pub rows: usize,
    pub cols: usize,
    pub real_nnz: usize,
    pub imag_nnz: usize,
    pub data_size: usize,
    pub memory_bytes: usize,
    /// `None` when the layout already implies the answer or the matrix is not square.
    pub symmetric: Option<bool>,
}

impl MatrixSummary {
    pub fn new<L: Layout>(
        file: String,
        matrix: &SplitSparseMatrix<f64, L>,
    ) -> anyhow::Result<Self> {
        let symmetric = if L::is_triangular() || matrix.rows() != matrix.cols() {
            None
        } else {
            Some(is_symmetric(matrix)?)
        };
        Ok(Self {
            file,
            layout: L::NAME,
            rows: matrix.rows(),
            cols: matrix.cols(),
            real_nnz: matrix.real_nnz(),
            imag_nnz: matrix.imag_nnz(),
            data_size: matrix.data_size(),
            memory_bytes: matrix.memory_size(),
            symmetric,
        })
    }

    pub fn print(&self) {
        println!("File: {}", self.file);
        println!("Layout: {}", self.layout);
        println!("Size: {} x {}", self.rows, self.cols);
        println!("Nonzeros: {} real, {} imaginary", self.real_nnz, self.imag_nnz);
        println!("Stored positions: {}", self.data_size);
        println!("Memory: {} bytes", self.memory_bytes);
        if let Some(symmetric) = self.symmetric {
            println!("Symmetric: {}", if symmetric { "yes" } else { "no" });
        }
    }
}

/// Whether every stored entry of a square general-layout matrix equals its transpose.
pub fn is_symmetric<L: Layout>(matrix: &SplitSparseMatrix<f64, L>) -> anyhow::Result<bool> {
    for (i, j, value) in matrix.stored_entries() {
        if i != j && matrix.at(j, i)? != value {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Outcome of `solve` against the all-ones reference solution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolveReport {
    pub file: String,
    pub layout: &'static str,
    pub method: Method,
    pub size: usize,
    pub preconditioner: &'static str,
    pub status: SolveStatus,
    pub code: i32,
    pub message: Option<String>,
    pub iterations: usize,
    pub residual: f64,
    /// Largest `|x_i - 1|`.
    pub max_error: f64,
    /// Largest difference to the sparse LU solution, when requested.
    pub direct_difference: Option<f64>,
    pub seconds: f64,
}

impl SolveReport {
    pub fn print(&self) {
        println!("Solve ({}, {} preconditioner)", self.method, self.preconditioner);
        println!("  Matrix: {} ({}, n = {})", self.file, self.layout, self.size);
        println!("  Status: {} (code {})", self.status, self.code);
        if let Some(message) = &self.message {
            println!("  Message: {message}");
        }
        println!("  Iterations: {}", self.iterations);
        println!("  Relative residual: {:.3e}", self.residual);
        println!("  Max error: {:.3e}", self.max_error);
        if let Some(diff) = self.direct_difference {
            println!("  Difference to sparse LU: {diff:.3e}");
        }
        println!("  Time: {:.3} s", self.seconds);
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
