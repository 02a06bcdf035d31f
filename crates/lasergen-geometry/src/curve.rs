//! The parametric curve abstraction shared by every curve variant.

use crate::bezier::{CubicBezier, QuadraticBezier};
use crate::circular_arc::CircularArc;
use crate::elliptical_arc::EllipticalArc;
use crate::error::Result;
use crate::line::Line;
use lasergen_core::{math, Vector};
use std::fmt;

/// Default number of interior samples used by [`max_distance`].
pub const DEFAULT_SAMPLES: usize = 9;

/// A 2D curve evaluable over `t` in `[0, 1]`.
///
/// Implementations must satisfy `point(0) == start()` and `point(1) == end()`
/// within the operation tolerance.
pub trait Curve {
    fn start(&self) -> Vector;
    fn end(&self) -> Vector;

    /// Position at parameter `t`.
    fn point(&self, t: f64) -> Vector;

    /// Tangent `d point / dt` at parameter `t`.
    fn derivative(&self, t: f64) -> Vector;

    /// Validate that the curve is geometrically meaningful.
    fn sanity_check(&self) -> Result<()> {
        Ok(())
    }

    /// The curve as a straight segment, if it is one.
    fn as_line(&self) -> Option<Line> {
        None
    }
}

/// Curves whose geometric length is cheap to compute.
pub trait ArcLength {
    fn length(&self) -> f64;
}

/// Largest distance between two curves over matched parameter ranges.
///
/// Both curves are sampled at `samples` interior points spread evenly over
/// their ranges (the endpoints are skipped). This is itself an approximation
/// and can miss a spike between samples, so it should only compare curves
/// that are locally smooth.
pub fn max_distance<A, B>(
    a: &A,
    b: &B,
    a_range: (f64, f64),
    b_range: (f64, f64),
    samples: usize,
) -> f64
where
    A: Curve + ?Sized,
    B: Curve + ?Sized,
{
    (0..samples)
        .map(|i| {
            let s = (i + 1) as f64 / (samples + 1) as f64;
            let pa = a.point(math::linear_map(a_range.0, a_range.1, s));
            let pb = b.point(math::linear_map(b_range.0, b_range.1, s));
            pa.distance_to(pb)
        })
        .fold(0.0, f64::max)
}

/// Any curve the path parser can produce.
#[derive(Debug, Clone, PartialEq)]
pub enum PathCurve {
    Line(Line),
    CircularArc(CircularArc),
    EllipticalArc(EllipticalArc),
    QuadraticBezier(QuadraticBezier),
    CubicBezier(CubicBezier),
}

impl PathCurve {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Line(_) => "line",
            Self::CircularArc(_) => "circular arc",
            Self::EllipticalArc(_) => "elliptical arc",
            Self::QuadraticBezier(_) => "quadratic bezier",
            Self::CubicBezier(_) => "cubic bezier",
        }
    }

    fn inner(&self) -> &dyn Curve {
        match self {
            Self::Line(c) => c,
            Self::CircularArc(c) => c,
            Self::EllipticalArc(c) => c,
            Self::QuadraticBezier(c) => c,
            Self::CubicBezier(c) => c,
        }
    }
}

impl Curve for PathCurve {
    fn start(&self) -> Vector {
        self.inner().start()
    }

    fn end(&self) -> Vector {
        self.inner().end()
    }

    fn point(&self, t: f64) -> Vector {
        self.inner().point(t)
    }

    fn derivative(&self, t: f64) -> Vector {
        self.inner().derivative(t)
    }

    fn sanity_check(&self) -> Result<()> {
        self.inner().sanity_check()
    }

    fn as_line(&self) -> Option<Line> {
        self.inner().as_line()
    }
}

impl fmt::Display for PathCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({} -> {})", self.kind(), self.start(), self.end())
    }
}

impl From<Line> for PathCurve {
    fn from(c: Line) -> Self {
        Self::Line(c)
    }
}

impl From<CircularArc> for PathCurve {
    fn from(c: CircularArc) -> Self {
        Self::CircularArc(c)
    }
}

impl From<EllipticalArc> for PathCurve {
    fn from(c: EllipticalArc) -> Self {
        Self::EllipticalArc(c)
    }
}

impl From<QuadraticBezier> for PathCurve {
    fn from(c: QuadraticBezier) -> Self {
        Self::QuadraticBezier(c)
    }
}

impl From<CubicBezier> for PathCurve {
    fn from(c: CubicBezier) -> Self {
        Self::CubicBezier(c)
    }
}
