//! Numeric tolerances used across the pipeline.

/// Tolerance set used by geometry, parsing and instruction emission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    /// Maximum deviation allowed between a curve and its polyline approximation.
    pub approximation: f64,
    /// How far apart two input points may be and still be considered the same.
    pub input: f64,
    /// Resolution of internal arithmetic and of emitted coordinates.
    pub operation: f64,
}

impl Tolerances {
    /// Number of decimal places needed to represent the operation tolerance.
    pub fn precision(&self) -> usize {
        (-self.operation.log10()).round().max(0.0) as usize
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        TOLERANCES
    }
}

/// Default tolerances.
pub const TOLERANCES: Tolerances = Tolerances {
    approximation: 1e-2,
    input: 1e-3,
    operation: 1e-6,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_precision() {
        assert_eq!(TOLERANCES.precision(), 6);
    }

    #[test]
    fn test_tolerances_ordering() {
        assert!(TOLERANCES.operation < TOLERANCES.input);
        assert!(TOLERANCES.input < TOLERANCES.approximation);
    }
}
