//! Error types for the core numeric primitives.

use thiserror::Error;

/// Errors raised by matrix and vector arithmetic.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// The inner dimensions of a matrix product disagree.
    #[error("Dimension mismatch: cannot multiply {left_rows}x{left_cols} by {right_rows}x{right_cols}")]
    DimensionMismatch {
        left_rows: usize,
        left_cols: usize,
        right_rows: usize,
        right_cols: usize,
    },

    /// A matrix was built from rows of differing length.
    #[error("Ragged matrix: row {row} has {len} columns, expected {expected}")]
    RaggedRows {
        row: usize,
        len: usize,
        expected: usize,
    },
}

/// Result type for core arithmetic.
pub type Result<T> = std::result::Result<T, MathError>;
