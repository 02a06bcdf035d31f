//! Quadratic and cubic Bezier curves.

use crate::curve::Curve;
use crate::error::{GeometryError, Result};
use lasergen_core::Vector;

/// Quadratic Bezier with a single control point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticBezier {
    pub start: Vector,
    pub control: Vector,
    pub end: Vector,
}

impl QuadraticBezier {
    pub fn new(start: Vector, control: Vector, end: Vector) -> Self {
        Self {
            start,
            control,
            end,
        }
    }

    /// Exact cubic representation of this curve.
    pub fn to_cubic(&self) -> CubicBezier {
        CubicBezier::new(
            self.start,
            self.start + (self.control - self.start) * (2.0 / 3.0),
            self.end + (self.control - self.end) * (2.0 / 3.0),
            self.end,
        )
    }
}

impl Curve for QuadraticBezier {
    fn start(&self) -> Vector {
        self.start
    }

    fn end(&self) -> Vector {
        self.end
    }

    fn point(&self, t: f64) -> Vector {
        let mt = 1.0 - t;
        self.start * (mt * mt) + self.control * (2.0 * mt * t) + self.end * (t * t)
    }

    fn derivative(&self, t: f64) -> Vector {
        (self.control - self.start) * (2.0 * (1.0 - t)) + (self.end - self.control) * (2.0 * t)
    }

    fn sanity_check(&self) -> Result<()> {
        check_finite(&[self.start, self.control, self.end])
    }
}

/// Cubic Bezier with two control points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub start: Vector,
    pub control1: Vector,
    pub control2: Vector,
    pub end: Vector,
}

impl CubicBezier {
    pub fn new(start: Vector, control1: Vector, control2: Vector, end: Vector) -> Self {
        Self {
            start,
            control1,
            control2,
            end,
        }
    }
}

impl Curve for CubicBezier {
    fn start(&self) -> Vector {
        self.start
    }

    fn end(&self) -> Vector {
        self.end
    }

    fn point(&self, t: f64) -> Vector {
        let mt = 1.0 - t;
        self.start * (mt * mt * mt)
            + self.control1 * (3.0 * mt * mt * t)
            + self.control2 * (3.0 * mt * t * t)
            + self.end * (t * t * t)
    }

    fn derivative(&self, t: f64) -> Vector {
        let mt = 1.0 - t;
        (self.control1 - self.start) * (3.0 * mt * mt)
            + (self.control2 - self.control1) * (6.0 * mt * t)
            + (self.end - self.control2) * (3.0 * t * t)
    }

    fn sanity_check(&self) -> Result<()> {
        check_finite(&[self.start, self.control1, self.control2, self.end])
    }
}

fn check_finite(points: &[Vector]) -> Result<()> {
    match points.iter().find(|p| !p.is_finite()) {
        Some(p) => Err(GeometryError::DegenerateGeometry(format!(
            "bezier has non-finite control point {}",
            p
        ))),
        None => Ok(()),
    }
}
