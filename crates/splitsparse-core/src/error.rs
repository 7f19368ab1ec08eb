//! Error types for split-storage sparse matrices.

use thiserror::Error;

/// Errors raised by structural operations, element access and serialization.
#[derive(Debug, Error)]
pub enum Error {
    /// A backing array could not be allocated. The matrix is left empty.
    #[error("Allocation of {requested} elements failed")]
    Allocation { requested: usize },

    /// Caller-supplied dimensions or nonzero counts are inconsistent.
    #[error("Invalid dimensions: {0}")]
    Dimension(String),

    /// Index outside `[0, dim)` on element access.
    #[error("Index {index} out of bounds for dimension {dim}")]
    Bounds { index: usize, dim: usize },

    /// Non-inserting accessor called on a position with no stored coefficient.
    #[error("No stored entry at ({row}, {col})")]
    NoSuchEntry { row: usize, col: usize },

    /// Malformed line in the text format.
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Stream failure during serialization (short read, unwritable file, ...).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for matrix operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_position() {
        let err = Error::NoSuchEntry { row: 3, col: 7 };
        assert_eq!(err.to_string(), "No stored entry at (3, 7)");

        let err = Error::Bounds { index: 5, dim: 4 };
        assert_eq!(err.to_string(), "Index 5 out of bounds for dimension 4");
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "short read");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
