//! Error types for geometry construction and approximation.

use lasergen_core::{MathError, Vector};
use thiserror::Error;

/// Errors raised while building or approximating curves.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// The curve cannot exist with the given inputs (zero length, point-like arc, ...).
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// A segment appended to a chain does not start where the chain ends.
    #[error("Discontinuous chain: last end {end} is {distance} away from new start {start}")]
    DiscontinuousChain {
        end: Vector,
        start: Vector,
        distance: f64,
    },

    /// The adaptive step search shrank below its minimum increment without progress.
    #[error("Approximation stalled at t={t} with increment {increment}")]
    ApproximationStalled { t: f64, increment: f64 },

    /// Approximation parameters are out of range.
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// A transform function name is not recognised.
    #[error("Unknown transform: {0}")]
    UnknownTransform(String),

    /// A transform function has the wrong number or kind of arguments.
    #[error("Invalid arguments for transform '{name}': {reason}")]
    InvalidTransform { name: String, reason: String },

    /// Underlying matrix arithmetic failed.
    #[error(transparent)]
    Math(#[from] MathError),
}

/// Result type for geometry operations.
pub type Result<T> = std::result::Result<T, GeometryError>;
