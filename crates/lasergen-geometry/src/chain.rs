//! Continuous sequences of curves.

use crate::bezier::{CubicBezier, QuadraticBezier};
use crate::circular_arc::CircularArc;
use crate::curve::{ArcLength, Curve};
use crate::error::{GeometryError, Result};
use crate::line::Line;
use lasergen_core::{math, Vector, TOLERANCES};
use std::fmt::Write as _;

/// Curves whose start point can be moved onto the end of a predecessor.
pub trait Joinable: Curve {
    fn snap_start(&mut self, point: Vector);
}

impl Joinable for Line {
    fn snap_start(&mut self, point: Vector) {
        self.start = point;
    }
}

impl Joinable for CircularArc {
    fn snap_start(&mut self, point: Vector) {
        self.start = point;
    }
}

impl Joinable for QuadraticBezier {
    fn snap_start(&mut self, point: Vector) {
        self.start = point;
    }
}

impl Joinable for CubicBezier {
    fn snap_start(&mut self, point: Vector) {
        self.start = point;
    }
}

/// Ordered curves where each one starts where the previous one ends.
#[derive(Debug, Clone, PartialEq)]
pub struct Chain<C> {
    curves: Vec<C>,
}

/// A chain of straight segments: the output of polyline approximation.
pub type LineSegmentChain = Chain<Line>;

impl<C> Default for Chain<C> {
    fn default() -> Self {
        Self { curves: Vec::new() }
    }
}

impl<C: Joinable> Chain<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a curve, enforcing continuity within the input tolerance.
    ///
    /// On success the new curve's start is snapped exactly onto the previous
    /// end so rounding does not accumulate along the chain.
    pub fn append(&mut self, mut curve: C) -> Result<()> {
        if let Some(last) = self.curves.last() {
            let end = last.end();
            let start = curve.start();
            let distance = end.distance_to(start);
            if distance > TOLERANCES.input {
                return Err(GeometryError::DiscontinuousChain {
                    end,
                    start,
                    distance,
                });
            }
            curve.snap_start(end);
        }
        self.curves.push(curve);
        Ok(())
    }

    pub fn extend<I: IntoIterator<Item = C>>(&mut self, curves: I) -> Result<()> {
        for curve in curves {
            self.append(curve)?;
        }
        Ok(())
    }

    /// Append every curve of `other`.
    pub fn merge(&mut self, other: Chain<C>) -> Result<()> {
        self.extend(other.curves)
    }
}

impl<C> Chain<C> {
    /// Number of curves in the chain.
    pub fn chain_size(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&C> {
        self.curves.get(index)
    }

    pub fn first(&self) -> Option<&C> {
        self.curves.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, C> {
        self.curves.iter()
    }

    pub fn as_slice(&self) -> &[C] {
        &self.curves
    }
}

impl<C: Curve + ArcLength> Chain<C> {
    /// Map a chain parameter to `(curve index, curve parameter)` by arc length.
    fn locate(&self, t: f64) -> Option<(usize, f64)> {
        let lengths: Vec<f64> = self.curves.iter().map(ArcLength::length).collect();
        let total: f64 = lengths.iter().sum();
        let last = self.curves.len().checked_sub(1)?;
        if total <= 0.0 {
            return Some((0, t.clamp(0.0, 1.0)));
        }
        let target = t.clamp(0.0, 1.0) * total;
        let mut position = 0.0;
        for (i, length) in lengths.iter().enumerate() {
            if position + length >= target || i == last {
                let local = math::inv_linear_map(position, position + length, target);
                return Some((i, local.clamp(0.0, 1.0)));
            }
            position += length;
        }
        None
    }
}

impl<C: Curve + ArcLength> ArcLength for Chain<C> {
    fn length(&self) -> f64 {
        self.curves.iter().map(ArcLength::length).sum()
    }
}

/// An empty chain evaluates to the origin.
impl<C: Curve + ArcLength> Curve for Chain<C> {
    fn start(&self) -> Vector {
        self.curves.first().map(Curve::start).unwrap_or_default()
    }

    fn end(&self) -> Vector {
        self.curves.last().map(Curve::end).unwrap_or_default()
    }

    fn point(&self, t: f64) -> Vector {
        self.locate(t)
            .map(|(i, local)| self.curves[i].point(local))
            .unwrap_or_default()
    }

    fn derivative(&self, t: f64) -> Vector {
        self.locate(t)
            .map(|(i, local)| self.curves[i].derivative(local))
            .unwrap_or_default()
    }

    fn sanity_check(&self) -> Result<()> {
        self.curves.iter().try_for_each(Curve::sanity_check)
    }
}

impl LineSegmentChain {
    /// Render the chain as SVG path data (`M x y L x y ...`), handy when
    /// inspecting an approximation.
    pub fn to_path_data(&self) -> String {
        let mut d = String::new();
        if let Some(first) = self.curves.first() {
            let _ = write!(d, "M{} {}", first.start.x, first.start.y);
        }
        for line in &self.curves {
            let _ = write!(d, " L{} {}", line.end.x, line.end.y);
        }
        d
    }
}

impl<C> IntoIterator for Chain<C> {
    type Item = C;
    type IntoIter = std::vec::IntoIter<C>;

    fn into_iter(self) -> Self::IntoIter {
        self.curves.into_iter()
    }
}

impl<'a, C> IntoIterator for &'a Chain<C> {
    type Item = &'a C;
    type IntoIter = std::slice::Iter<'a, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.curves.iter()
    }
}
