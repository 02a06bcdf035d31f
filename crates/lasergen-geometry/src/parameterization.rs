//! Conversion between the endpoint and center forms of an elliptical arc.
//!
//! Path data describes arcs by their endpoints, radii, x-axis rotation and the
//! large-arc/sweep flags. Evaluating an arc needs the center form instead.
//! The conversion follows the W3C SVG implementation notes (B.2.4 and B.2.5).

use crate::error::{GeometryError, Result};
use lasergen_core::{math, Vector, TOLERANCES};
use std::f64::consts::{PI, TAU};

/// Arc in endpoint form, as written in path data. `rotation` is in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EndpointArc {
    pub start: Vector,
    pub end: Vector,
    pub radii: Vector,
    pub rotation: f64,
    pub large_arc: bool,
    pub sweep: bool,
}

/// Arc in center form. Angles are in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenterArc {
    pub center: Vector,
    pub radii: Vector,
    pub rotation: f64,
    pub start_angle: f64,
    pub sweep_angle: f64,
}

/// Result of converting an endpoint arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArcConversion {
    Arc(CenterArc),
    /// One radius vanished; the arc is a straight line between its endpoints.
    Line,
}

/// Convert an endpoint-form arc to center form.
///
/// Fails with [`GeometryError::DegenerateGeometry`] when both endpoints
/// coincide. Radii too small to span the endpoints are scaled up uniformly.
pub fn endpoint_to_center(arc: &EndpointArc) -> Result<ArcConversion> {
    let tol = TOLERANCES.operation;

    if arc.start.distance_to(arc.end) <= tol {
        return Err(GeometryError::DegenerateGeometry(format!(
            "arc start {} and end {} coincide",
            arc.start, arc.end
        )));
    }

    let mut rx = arc.radii.x.abs();
    let mut ry = arc.radii.y.abs();
    if rx <= tol || ry <= tol {
        return Ok(ArcConversion::Line);
    }

    let phi = arc.rotation;
    let half_diff = (arc.start - arc.end) / 2.0;
    let p = math::rotate(half_diff, -phi);

    let lambda = (p.x * p.x) / (rx * rx) + (p.y * p.y) / (ry * ry);
    if lambda > 1.0 {
        let scale = lambda.sqrt();
        rx *= scale;
        ry *= scale;
    }

    let rx2 = rx * rx;
    let ry2 = ry * ry;
    let numerator = rx2 * ry2 - rx2 * p.y * p.y - ry2 * p.x * p.x;
    let denominator = rx2 * p.y * p.y + ry2 * p.x * p.x;
    // numerator dips below zero by rounding when lambda is close to 1
    let mut coefficient = (numerator / denominator).max(0.0).sqrt();
    if arc.large_arc == arc.sweep {
        coefficient = -coefficient;
    }
    let center_prime = Vector::new(coefficient * rx * p.y / ry, -coefficient * ry * p.x / rx);

    let midpoint = (arc.start + arc.end) / 2.0;
    let center = math::rotate(center_prime, phi) + midpoint;

    let start_vector = Vector::new((p.x - center_prime.x) / rx, (p.y - center_prime.y) / ry);
    let end_vector = Vector::new((-p.x - center_prime.x) / rx, (-p.y - center_prime.y) / ry);

    let start_angle = math::angle_between(Vector::new(1.0, 0.0), start_vector);
    let mut sweep_angle = math::angle_between(start_vector, end_vector);

    if !arc.sweep && sweep_angle > 0.0 {
        sweep_angle -= TAU;
    } else if arc.sweep && sweep_angle < 0.0 {
        sweep_angle += TAU;
    }

    Ok(ArcConversion::Arc(CenterArc {
        center,
        radii: Vector::new(rx, ry),
        rotation: phi,
        start_angle,
        sweep_angle,
    }))
}

/// Convert a center-form arc back to endpoint form.
pub fn center_to_endpoint(arc: &CenterArc) -> EndpointArc {
    let at = |angle: f64| {
        let (sin, cos) = angle.sin_cos();
        arc.center + math::rotate(Vector::new(arc.radii.x * cos, arc.radii.y * sin), arc.rotation)
    };

    EndpointArc {
        start: at(arc.start_angle),
        end: at(arc.start_angle + arc.sweep_angle),
        radii: arc.radii,
        rotation: arc.rotation,
        large_arc: arc.sweep_angle.abs() > PI,
        sweep: arc.sweep_angle > 0.0,
    }
}
