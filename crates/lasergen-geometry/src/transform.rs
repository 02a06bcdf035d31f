//! Affine transformations in homogeneous 2D coordinates.
//!
//! A [`Transformation`] accumulates primitive operations by right-multiplying
//! each new primitive onto the current matrix, the same way an SVG
//! `transform` list composes. For `translate(...) scale(...)` the scale acts
//! on the point first and the translation last.

use crate::error::{GeometryError, Result};
use lasergen_core::{Matrix, Vector};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static TRANSFORM_FN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Za-z]+)\s*\(([^)]*)\)").expect("invalid transform regex")
});

static ARG_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s,]+").expect("invalid separator regex"));

/// A primitive operation recorded in a [`Transformation`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformOp {
    Translate { x: f64, y: f64 },
    Scale { x: f64, y: f64 },
    /// Angle in degrees about `(cx, cy)`.
    Rotate { angle: f64, cx: f64, cy: f64 },
    /// Angle in degrees.
    SkewX(f64),
    /// Angle in degrees.
    SkewY(f64),
    Matrix([f64; 6]),
}

impl fmt::Display for TransformOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Translate { x, y } => write!(f, "translate({}, {})", x, y),
            Self::Scale { x, y } => write!(f, "scale({}, {})", x, y),
            Self::Rotate { angle, cx, cy } if *cx == 0.0 && *cy == 0.0 => {
                write!(f, "rotate({})", angle)
            }
            Self::Rotate { angle, cx, cy } => write!(f, "rotate({}, {}, {})", angle, cx, cy),
            Self::SkewX(a) => write!(f, "skewX({})", a),
            Self::SkewY(a) => write!(f, "skewY({})", a),
            Self::Matrix([a, b, c, d, e, g]) => {
                write!(f, "matrix({}, {}, {}, {}, {}, {})", a, b, c, d, e, g)
            }
        }
    }
}

/// Accumulated affine transformation.
///
/// Cloning yields an independent copy, which is how inherited transforms are
/// handed down an element tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Transformation {
    matrix: Matrix,
    record: Vec<TransformOp>,
}

impl Default for Transformation {
    fn default() -> Self {
        Self::new()
    }
}

impl Transformation {
    /// The identity transformation.
    pub fn new() -> Self {
        Self {
            matrix: Matrix::identity(3),
            record: Vec::new(),
        }
    }

    /// Parse an SVG transform list such as `translate(10,5) rotate(30)`.
    pub fn from_svg(transform: &str) -> Result<Self> {
        let mut t = Self::new();
        t.parse(transform)?;
        Ok(t)
    }

    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    /// Primitive operations in the order they were added.
    pub fn record(&self) -> &[TransformOp] {
        &self.record
    }

    pub fn is_identity(&self) -> bool {
        self.matrix == Matrix::identity(3)
    }

    pub fn add_translation(&mut self, x: f64, y: f64) -> &mut Self {
        self.push(
            TransformOp::Translate { x, y },
            [[1.0, 0.0, x], [0.0, 1.0, y]],
        )
    }

    pub fn add_scale(&mut self, x: f64, y: f64) -> &mut Self {
        self.push(TransformOp::Scale { x, y }, [[x, 0.0, 0.0], [0.0, y, 0.0]])
    }

    /// Rotate by `angle` degrees about the origin.
    pub fn add_rotation(&mut self, angle: f64) -> &mut Self {
        self.add_rotation_about(angle, 0.0, 0.0)
    }

    /// Rotate by `angle` degrees about `(cx, cy)`.
    pub fn add_rotation_about(&mut self, angle: f64, cx: f64, cy: f64) -> &mut Self {
        let (sin, cos) = angle.to_radians().sin_cos();
        // translate(cx, cy) rotate(angle) translate(-cx, -cy)
        let e = cx - cos * cx + sin * cy;
        let f = cy - sin * cx - cos * cy;
        self.push(
            TransformOp::Rotate { angle, cx, cy },
            [[cos, -sin, e], [sin, cos, f]],
        )
    }

    /// Skew along x by `angle` degrees.
    pub fn add_skew_x(&mut self, angle: f64) -> &mut Self {
        let tan = angle.to_radians().tan();
        self.push(TransformOp::SkewX(angle), [[1.0, tan, 0.0], [0.0, 1.0, 0.0]])
    }

    /// Skew along y by `angle` degrees.
    pub fn add_skew_y(&mut self, angle: f64) -> &mut Self {
        let tan = angle.to_radians().tan();
        self.push(TransformOp::SkewY(angle), [[1.0, 0.0, 0.0], [tan, 1.0, 0.0]])
    }

    /// Append an SVG `matrix(a, b, c, d, e, f)`.
    pub fn add_matrix(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> &mut Self {
        self.push(
            TransformOp::Matrix([a, b, c, d, e, f]),
            [[a, c, e], [b, d, f]],
        )
    }

    /// Parse a transform list and append every function in declaration order.
    pub fn parse(&mut self, transform: &str) -> Result<&mut Self> {
        let mut consumed = 0;
        for caps in TRANSFORM_FN.captures_iter(transform) {
            let whole = caps.get(0).map(|m| m.range()).unwrap_or(0..0);
            Self::check_gap(&transform[consumed..whole.start])?;
            consumed = whole.end;

            let name = &caps[1];
            let args = parse_args(name, &caps[2])?;
            self.apply_function(name, &args)?;
        }
        Self::check_gap(&transform[consumed..])?;
        Ok(self)
    }

    /// Right-multiply by another transformation and append its record.
    pub fn extend(&mut self, other: &Transformation) -> &mut Self {
        self.matrix = multiply3(&self.matrix, &other.matrix);
        self.record.extend_from_slice(&other.record);
        self
    }

    /// Transform a point, including translation.
    pub fn apply_affine(&self, point: Vector) -> Vector {
        let m = &self.matrix;
        Vector::new(
            m[(0, 0)] * point.x + m[(0, 1)] * point.y + m[(0, 2)],
            m[(1, 0)] * point.x + m[(1, 1)] * point.y + m[(1, 2)],
        )
    }

    /// Transform a direction or extent with the 2x2 linear part only.
    pub fn apply_linear(&self, vector: Vector) -> Vector {
        let m = &self.matrix;
        Vector::new(
            m[(0, 0)] * vector.x + m[(0, 1)] * vector.y,
            m[(1, 0)] * vector.x + m[(1, 1)] * vector.y,
        )
    }

    /// Determinant of the linear part. Negative when the transformation mirrors.
    pub fn determinant(&self) -> f64 {
        let m = &self.matrix;
        m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)]
    }

    fn apply_function(&mut self, name: &str, args: &[f64]) -> Result<()> {
        match (name, args) {
            ("translate", [x]) => self.add_translation(*x, 0.0),
            ("translate", [x, y]) => self.add_translation(*x, *y),
            ("scale", [s]) => self.add_scale(*s, *s),
            ("scale", [x, y]) => self.add_scale(*x, *y),
            ("rotate", [a]) => self.add_rotation(*a),
            ("rotate", [a, cx, cy]) => self.add_rotation_about(*a, *cx, *cy),
            ("skewX", [a]) => self.add_skew_x(*a),
            ("skewY", [a]) => self.add_skew_y(*a),
            ("matrix", [a, b, c, d, e, f]) => self.add_matrix(*a, *b, *c, *d, *e, *f),
            ("translate" | "scale" | "rotate" | "skewX" | "skewY" | "matrix", _) => {
                return Err(GeometryError::InvalidTransform {
                    name: name.to_string(),
                    reason: format!("unexpected argument count {}", args.len()),
                })
            }
            _ => return Err(GeometryError::UnknownTransform(name.to_string())),
        };
        Ok(())
    }

    fn check_gap(gap: &str) -> Result<()> {
        let rest = gap.trim_matches(|c: char| c.is_whitespace() || c == ',');
        if rest.is_empty() {
            Ok(())
        } else {
            Err(GeometryError::UnknownTransform(rest.to_string()))
        }
    }

    fn push(&mut self, op: TransformOp, rows: [[f64; 3]; 2]) -> &mut Self {
        let mut primitive = Matrix::identity(3);
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                primitive[(r, c)] = *value;
            }
        }
        self.matrix = multiply3(&self.matrix, &primitive);
        self.record.push(op);
        self
    }
}

impl fmt::Display for Transformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ops: Vec<String> = self.record.iter().map(ToString::to_string).collect();
        write!(f, "Transformation[{}]", ops.join(" "))
    }
}

fn multiply3(a: &Matrix, b: &Matrix) -> Matrix {
    // Both operands are always 3x3, so the product cannot fail.
    a.multiply(b).unwrap_or_else(|_| a.clone())
}

fn parse_args(name: &str, raw: &str) -> Result<Vec<f64>> {
    ARG_SEPARATOR
        .split(raw.trim())
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>().map_err(|_| GeometryError::InvalidTransform {
                name: name.to_string(),
                reason: format!("'{}' is not a number", s),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Vector, b: Vector) {
        assert!((a - b).magnitude() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn test_identity() {
        let t = Transformation::new();
        assert!(t.is_identity());
        assert_eq!(t.apply_affine(Vector::new(3.0, 4.0)), Vector::new(3.0, 4.0));
    }

    #[test]
    fn test_translate_then_scale_order() {
        // translate(10,0) scale(2): the scale acts first.
        let mut t = Transformation::new();
        t.add_translation(10.0, 0.0).add_scale(2.0, 2.0);
        assert_close(t.apply_affine(Vector::new(1.0, 1.0)), Vector::new(12.0, 2.0));
    }

    #[test]
    fn test_origin_flip() {
        let mut t = Transformation::new();
        t.add_translation(0.0, 10.0).add_scale(1.0, -1.0);
        assert_close(t.apply_affine(Vector::new(0.0, 0.0)), Vector::new(0.0, 10.0));
        assert_close(t.apply_affine(Vector::new(10.0, 2.0)), Vector::new(10.0, 8.0));
    }

    #[test]
    fn test_rotation_about_center() {
        let mut t = Transformation::new();
        t.add_rotation_about(90.0, 1.0, 1.0);
        assert_close(t.apply_affine(Vector::new(2.0, 1.0)), Vector::new(1.0, 2.0));
    }

    #[test]
    fn test_skew() {
        let mut t = Transformation::new();
        t.add_skew_x(45.0);
        assert_close(t.apply_affine(Vector::new(0.0, 1.0)), Vector::new(1.0, 1.0));

        let mut t = Transformation::new();
        t.add_skew_y(45.0);
        assert_close(t.apply_affine(Vector::new(1.0, 0.0)), Vector::new(1.0, 1.0));
    }

    #[test]
    fn test_matrix_convention() {
        let mut t = Transformation::new();
        t.add_matrix(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
        assert_close(t.apply_affine(Vector::new(1.0, 0.0)), Vector::new(6.0, 8.0));
        assert_close(t.apply_linear(Vector::new(1.0, 0.0)), Vector::new(1.0, 2.0));
    }

    #[test]
    fn test_parse_list() {
        let t = Transformation::from_svg("translate(10, 5) scale(2) rotate(90)").unwrap();
        assert_eq!(t.record().len(), 3);
        assert_close(t.apply_affine(Vector::new(1.0, 0.0)), Vector::new(10.0, 7.0));
    }

    #[test]
    fn test_parse_single_arg_translate() {
        let t = Transformation::from_svg("translate(4)").unwrap();
        assert_close(t.apply_affine(Vector::ZERO), Vector::new(4.0, 0.0));
    }

    #[test]
    fn test_parse_unknown_function() {
        let err = Transformation::from_svg("perspective(3)").unwrap_err();
        assert_eq!(err, GeometryError::UnknownTransform("perspective".to_string()));
    }

    #[test]
    fn test_parse_bad_arity() {
        let err = Transformation::from_svg("matrix(1,2,3)").unwrap_err();
        assert!(matches!(err, GeometryError::InvalidTransform { .. }));
    }

    #[test]
    fn test_parse_garbage_between_functions() {
        assert!(Transformation::from_svg("scale(2) oops translate(1)").is_err());
    }

    #[test]
    fn test_extend_and_clone_independent() {
        let mut parent = Transformation::new();
        parent.add_translation(5.0, 0.0);
        let mut child = parent.clone();
        child.add_scale(2.0, 2.0);

        assert_eq!(parent.record().len(), 1);
        assert_close(child.apply_affine(Vector::new(1.0, 0.0)), Vector::new(7.0, 0.0));

        let mut combined = Transformation::new();
        combined.extend(&child);
        assert_eq!(combined, child);
    }

    #[test]
    fn test_linear_ignores_translation() {
        let t = Transformation::from_svg("translate(100,100) scale(3,2)").unwrap();
        assert_close(t.apply_linear(Vector::new(1.0, 1.0)), Vector::new(3.0, 2.0));
        assert_eq!(t.determinant(), 6.0);
    }
}
