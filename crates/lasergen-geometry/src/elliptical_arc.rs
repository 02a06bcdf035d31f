//! Elliptical arcs in center parameterization.

use crate::curve::Curve;
use crate::error::{GeometryError, Result};
use crate::transform::Transformation;
use lasergen_core::{math, Vector, TOLERANCES};
use std::f64::consts::TAU;

/// Arc of an ellipse.
///
/// Angles are in radians and measured in the ellipse's own unrotated frame.
/// A positive `sweep_angle` runs counter-clockwise. The optional
/// `transformation` maps the arc from the space it was described in to the
/// output space; it is applied after the arc is evaluated so that a sheared or
/// non-uniformly scaled ellipse stays exact.
#[derive(Debug, Clone, PartialEq)]
pub struct EllipticalArc {
    pub center: Vector,
    pub radii: Vector,
    /// Rotation of the ellipse x-axis, radians.
    pub rotation: f64,
    pub start_angle: f64,
    pub sweep_angle: f64,
    pub transformation: Transformation,
    start: Vector,
    end: Vector,
}

impl EllipticalArc {
    pub fn new(
        center: Vector,
        radii: Vector,
        rotation: f64,
        start_angle: f64,
        sweep_angle: f64,
    ) -> Self {
        Self::with_transformation(
            center,
            radii,
            rotation,
            start_angle,
            sweep_angle,
            Transformation::new(),
        )
    }

    pub fn with_transformation(
        center: Vector,
        radii: Vector,
        rotation: f64,
        start_angle: f64,
        sweep_angle: f64,
        transformation: Transformation,
    ) -> Self {
        let mut arc = Self {
            center,
            radii,
            rotation,
            start_angle,
            sweep_angle,
            transformation,
            start: Vector::ZERO,
            end: Vector::ZERO,
        };
        arc.start = arc.point(0.0);
        arc.end = arc.point(1.0);
        arc
    }

    pub fn end_angle(&self) -> f64 {
        self.start_angle + self.sweep_angle
    }

    /// Point on the untransformed ellipse at `angle`.
    pub fn angle_to_point(&self, angle: f64) -> Vector {
        let (sin, cos) = angle.sin_cos();
        let local = Vector::new(self.radii.x * cos, self.radii.y * sin);
        self.center + math::rotate(local, self.rotation)
    }

    fn angle_at(&self, t: f64) -> f64 {
        math::linear_map(self.start_angle, self.end_angle(), t)
    }
}

impl Curve for EllipticalArc {
    fn start(&self) -> Vector {
        self.start
    }

    fn end(&self) -> Vector {
        self.end
    }

    fn point(&self, t: f64) -> Vector {
        self.transformation
            .apply_affine(self.angle_to_point(self.angle_at(t)))
    }

    fn derivative(&self, t: f64) -> Vector {
        let (sin, cos) = self.angle_at(t).sin_cos();
        let local = Vector::new(-self.radii.x * sin, self.radii.y * cos) * self.sweep_angle;
        self.transformation
            .apply_linear(math::rotate(local, self.rotation))
    }

    fn sanity_check(&self) -> Result<()> {
        let tol = TOLERANCES.operation;
        if !(self.radii.x.is_finite() && self.radii.y.is_finite())
            || self.radii.x <= tol
            || self.radii.y <= tol
        {
            return Err(GeometryError::DegenerateGeometry(format!(
                "elliptical arc radii must be positive, got {}",
                self.radii
            )));
        }
        if self.sweep_angle.abs() <= tol || !self.sweep_angle.is_finite() {
            return Err(GeometryError::DegenerateGeometry(
                "elliptical arc sweeps no angle".to_string(),
            ));
        }
        if self.sweep_angle.abs() > TAU + tol {
            return Err(GeometryError::DegenerateGeometry(format!(
                "elliptical arc sweep {} exceeds a full turn",
                self.sweep_angle
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_half_ellipse() {
        let arc = EllipticalArc::new(Vector::ZERO, Vector::new(2.0, 1.0), 0.0, 0.0, PI);
        assert!(arc.sanity_check().is_ok());
        assert!(arc.start().distance_to(Vector::new(2.0, 0.0)) < 1e-12);
        assert!(arc.end().distance_to(Vector::new(-2.0, 0.0)) < 1e-12);
        assert!(arc.point(0.5).distance_to(Vector::new(0.0, 1.0)) < 1e-12);
    }

    #[test]
    fn test_rotated_ellipse() {
        let arc = EllipticalArc::new(Vector::new(1.0, 1.0), Vector::new(2.0, 1.0), FRAC_PI_2, 0.0, PI);
        assert!(arc.start().distance_to(Vector::new(1.0, 3.0)) < 1e-12);
    }

    #[test]
    fn test_transformation_applied() {
        let mut t = Transformation::new();
        t.add_translation(0.0, 10.0).add_scale(1.0, -1.0);
        let arc = EllipticalArc::with_transformation(
            Vector::ZERO,
            Vector::new(1.0, 1.0),
            0.0,
            0.0,
            FRAC_PI_2,
            t,
        );
        assert!(arc.end().distance_to(Vector::new(0.0, 9.0)) < 1e-12);
        // mirrored: the tangent at the start now points down
        assert!(arc.derivative(0.0).y < 0.0);
    }

    #[test]
    fn test_derivative_matches_finite_difference() {
        let arc = EllipticalArc::new(Vector::new(3.0, -1.0), Vector::new(4.0, 2.0), 0.3, 0.2, -2.0);
        let h = 1e-6;
        let numeric = (arc.point(0.4 + h) - arc.point(0.4 - h)) / (2.0 * h);
        assert!((numeric - arc.derivative(0.4)).magnitude() < 1e-5);
    }

    #[test]
    fn test_zero_radius_rejected() {
        let arc = EllipticalArc::new(Vector::ZERO, Vector::new(0.0, 1.0), 0.0, 0.0, PI);
        assert!(arc.sanity_check().is_err());
    }

    #[test]
    fn test_zero_sweep_rejected() {
        let arc = EllipticalArc::new(Vector::ZERO, Vector::new(1.0, 1.0), 0.0, 0.0, 0.0);
        assert!(arc.sanity_check().is_err());
    }
}
