//! Straight line segments.

use crate::curve::{ArcLength, Curve};
use crate::error::{GeometryError, Result};
use lasergen_core::{math, Vector, TOLERANCES};

/// A straight segment from `start` to `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub start: Vector,
    pub end: Vector,
}

impl Line {
    pub fn new(start: Vector, end: Vector) -> Self {
        Self { start, end }
    }

    /// dy/dx, or `None` for a vertical line.
    pub fn slope(&self) -> Option<f64> {
        let d = self.end - self.start;
        if d.x.abs() <= TOLERANCES.operation {
            None
        } else {
            Some(d.y / d.x)
        }
    }

    /// Y intercept of the infinite line, or `None` for a vertical line.
    pub fn offset(&self) -> Option<f64> {
        self.slope().map(|m| self.start.y - m * self.start.x)
    }

    pub fn direction(&self) -> Vector {
        self.end - self.start
    }

    /// Shortest distance from `p` to this segment.
    pub fn distance_to_point(&self, p: Vector) -> f64 {
        let d = self.direction();
        let len2 = d.dot(d);
        if len2 == 0.0 {
            return p.distance_to(self.start);
        }
        let t = ((p - self.start).dot(d) / len2).clamp(0.0, 1.0);
        p.distance_to(self.point(t))
    }
}

impl Curve for Line {
    fn start(&self) -> Vector {
        self.start
    }

    fn end(&self) -> Vector {
        self.end
    }

    fn point(&self, t: f64) -> Vector {
        Vector::new(
            math::linear_map(self.start.x, self.end.x, t),
            math::linear_map(self.start.y, self.end.y, t),
        )
    }

    fn derivative(&self, _t: f64) -> Vector {
        self.direction()
    }

    fn sanity_check(&self) -> Result<()> {
        if !self.start.is_finite() || !self.end.is_finite() {
            return Err(GeometryError::DegenerateGeometry(format!(
                "line has non-finite endpoint: {} -> {}",
                self.start, self.end
            )));
        }
        Ok(())
    }

    fn as_line(&self) -> Option<Line> {
        Some(*self)
    }
}

impl ArcLength for Line {
    fn length(&self) -> f64 {
        self.start.distance_to(self.end)
    }
}
