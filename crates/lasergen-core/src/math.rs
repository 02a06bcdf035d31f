//! Scalar helpers: linear maps, angles and wrap-around.

use crate::vector::Vector;
use std::f64::consts::TAU;

/// Map `t` in `[0, 1]` onto the range `[min, max]`.
pub fn linear_map(min: f64, max: f64, t: f64) -> f64 {
    min + t * (max - min)
}

/// Inverse of [`linear_map`]: where `value` sits between `min` and `max`.
/// Returns 0 for an empty range.
pub fn inv_linear_map(min: f64, max: f64, value: f64) -> f64 {
    if max == min {
        0.0
    } else {
        (value - min) / (max - min)
    }
}

/// Unsigned angle between two vectors in `[0, pi]`.
///
/// The cosine is clamped to `[-1, 1]` so that rounding on nearly parallel
/// vectors cannot produce NaN.
pub fn unsigned_angle_between(u: Vector, v: Vector) -> f64 {
    let denom = u.magnitude() * v.magnitude();
    if denom == 0.0 {
        return 0.0;
    }
    (u.dot(v) / denom).clamp(-1.0, 1.0).acos()
}

/// Signed angle from `u` to `v` in `(-pi, pi]`, positive counter-clockwise.
pub fn angle_between(u: Vector, v: Vector) -> f64 {
    let angle = unsigned_angle_between(u, v);
    if u.cross(v) < 0.0 {
        -angle
    } else {
        angle
    }
}

/// Rotate `v` counter-clockwise by `angle` radians about the origin.
pub fn rotate(v: Vector, angle: f64) -> Vector {
    let (sin, cos) = angle.sin_cos();
    Vector::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Wrap `value` into the half-open interval `[lower, upper)`.
pub fn wrap(value: f64, lower: f64, upper: f64) -> f64 {
    let span = upper - lower;
    if span <= 0.0 || !value.is_finite() {
        return value;
    }
    lower + (value - lower).rem_euclid(span)
}

/// Wrap an angle into `[0, 2pi)`.
pub fn wrap_angle(angle: f64) -> f64 {
    wrap(angle, 0.0, TAU)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_linear_map_roundtrip() {
        assert_eq!(linear_map(0.0, 255.0, 0.5), 127.5);
        assert_eq!(inv_linear_map(0.0, 255.0, 127.5), 0.5);
        assert_eq!(inv_linear_map(3.0, 3.0, 3.0), 0.0);
    }

    #[test]
    fn test_signed_angle() {
        let x = Vector::new(1.0, 0.0);
        let y = Vector::new(0.0, 1.0);
        assert!((angle_between(x, y) - FRAC_PI_2).abs() < 1e-12);
        assert!((angle_between(y, x) + FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_angle_between_clamps_parallel() {
        let u = Vector::new(1e-8, 1.0);
        let v = Vector::new(1e-8 * 3.0, 3.0);
        assert!(angle_between(u, v).is_finite());
        assert!((unsigned_angle_between(u, -v) - PI).abs() < 1e-6);
    }

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(-FRAC_PI_2) - 3.0 * FRAC_PI_2).abs() < 1e-12);
        assert!((wrap_angle(5.0 * PI) - PI).abs() < 1e-12);
        assert_eq!(wrap_angle(0.0), 0.0);
        assert!((wrap(725.0, -180.0, 180.0) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_wrap_huge_value_terminates() {
        let w = wrap_angle(1e300);
        assert!((0.0..TAU).contains(&w));
    }

    #[test]
    fn test_rotate() {
        let r = rotate(Vector::new(1.0, 0.0), PI);
        assert!((r.x + 1.0).abs() < 1e-12);
        assert!(r.y.abs() < 1e-12);
    }
}
