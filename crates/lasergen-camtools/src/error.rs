//! Error types for the CAM tools crate.

use std::fmt;
use std::io;

use lasergen_geometry::GeometryError;
use thiserror::Error;

/// Errors raised while building or emitting an instruction stream.
#[derive(Error, Debug)]
pub enum CompileError {
    /// Mandatory settings are missing or out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A cutting move was requested before any speed was commanded.
    #[error("Undefined movement speed; set a movement speed before executing movement commands")]
    MissingSpeed,

    /// Laser power outside [0, 1].
    #[error("Laser power {0} is out of bounds; it must be between 0 and 1")]
    InvalidPower(f64),

    /// Raster input that cannot be scanned.
    #[error("Invalid raster: {0}")]
    InvalidRaster(String),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// I/O error while writing output.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
}

/// Result type for compiler and interface operations.
pub type Result<T> = std::result::Result<T, CompileError>;

/// Geometry that leaves the configured machine travel on one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundsWarning {
    pub axis: char,
    pub min: f64,
    pub max: f64,
    pub travel: f64,
}

impl fmt::Display for BoundsWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} axis out of bounds: geometry spans {:.3}..{:.3}, machine travel is 0..{}",
            self.axis, self.min, self.max, self.travel
        )
    }
}
