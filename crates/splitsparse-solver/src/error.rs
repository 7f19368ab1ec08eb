//! Error types for the solver layer.

use thiserror::Error;

/// Errors raised before or outside an iteration.
///
/// Numerical breakdowns and iteration exhaustion are not errors; they are
/// reported through [`SolveStatus`](crate::SolveStatus).
#[derive(Debug, Error)]
pub enum Error {
    /// Operator, preconditioner and vectors disagree on the system size.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A direct factorization found the matrix singular.
    #[error("Matrix is singular")]
    SingularMatrix,

    /// A solver configuration value is unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Matrix-level error.
    #[error("Matrix error: {0}")]
    Core(#[from] splitsparse_core::Error),
}

/// Result type for solver operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Fail with [`Error::DimensionMismatch`] unless `actual == expected`.
pub(crate) fn check_dim(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(Error::DimensionMismatch { expected, actual });
    }
    Ok(())
}
