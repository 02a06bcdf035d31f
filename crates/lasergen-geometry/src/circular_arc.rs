//! Circular arcs in center parameterization.

use crate::curve::{ArcLength, Curve};
use crate::error::{GeometryError, Result};
use lasergen_core::{math, Vector, TOLERANCES};
use std::f64::consts::{PI, TAU};

/// Arc of a circle swept from `start_angle` to `end_angle` (radians,
/// counter-clockwise positive).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircularArc {
    pub start: Vector,
    pub end: Vector,
    pub center: Vector,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl CircularArc {
    /// Minor arc from `start` to `end` around `center`.
    ///
    /// The radius is measured from `start`; use [`CircularArc::sanity_check`]
    /// to confirm `end` lies on the same circle.
    pub fn new(start: Vector, end: Vector, center: Vector) -> Self {
        let radius = start.distance_to(center);
        let start_angle = angle_of(start - center);
        let mut sweep = angle_of(end - center) - start_angle;
        if sweep > PI {
            sweep -= TAU;
        } else if sweep <= -PI {
            sweep += TAU;
        }
        Self {
            start,
            end,
            center,
            radius,
            start_angle,
            end_angle: start_angle + sweep,
        }
    }

    /// Arc defined by its center, radius and angular range.
    pub fn from_angles(center: Vector, radius: f64, start_angle: f64, end_angle: f64) -> Self {
        let on_circle = |a: f64| center + Vector::from_angle(a) * radius;
        Self {
            start: on_circle(start_angle),
            end: on_circle(end_angle),
            center,
            radius,
            start_angle,
            end_angle,
        }
    }

    /// Signed angle swept from start to end.
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    fn angle_at(&self, t: f64) -> f64 {
        math::linear_map(self.start_angle, self.end_angle, t)
    }
}

fn angle_of(v: Vector) -> f64 {
    v.y.atan2(v.x)
}

impl Curve for CircularArc {
    fn start(&self) -> Vector {
        self.start
    }

    fn end(&self) -> Vector {
        self.end
    }

    fn point(&self, t: f64) -> Vector {
        self.center + Vector::from_angle(self.angle_at(t)) * self.radius
    }

    fn derivative(&self, t: f64) -> Vector {
        let (sin, cos) = self.angle_at(t).sin_cos();
        Vector::new(-sin, cos) * (self.radius * self.sweep())
    }

    fn sanity_check(&self) -> Result<()> {
        let tol = TOLERANCES.input;
        if self.start.distance_to(self.end) <= tol {
            return Err(GeometryError::DegenerateGeometry(format!(
                "arc is a point, start {} equals end {}",
                self.start, self.end
            )));
        }
        if self.start.distance_to(self.center) <= tol {
            return Err(GeometryError::DegenerateGeometry(format!(
                "arc is a line, start {} equals center {}",
                self.start, self.center
            )));
        }
        if self.end.distance_to(self.center) <= tol {
            return Err(GeometryError::DegenerateGeometry(format!(
                "arc is a line, end {} equals center {}",
                self.end, self.center
            )));
        }
        let skew = (self.start.distance_to(self.center) - self.end.distance_to(self.center)).abs();
        if skew >= tol {
            return Err(GeometryError::DegenerateGeometry(format!(
                "center {} is not equidistant from start and end (difference {})",
                self.center, skew
            )));
        }
        Ok(())
    }
}

impl ArcLength for CircularArc {
    fn length(&self) -> f64 {
        self.sweep().abs() * self.radius
    }
}
