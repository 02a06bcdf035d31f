//! Axis-aligned bounding boxes.

use lasergen_core::Vector;
use std::fmt;

/// Axis-aligned box spanned by `min` and `max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vector,
    pub max: Vector,
}

impl BoundingBox {
    /// A box containing a single point.
    pub fn from_point(point: Vector) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Smallest box containing every point, or `None` when empty.
    pub fn from_points<I: IntoIterator<Item = Vector>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bbox = Self::from_point(first);
        for p in iter {
            bbox.include(p);
        }
        Some(bbox)
    }

    pub fn include(&mut self, point: Vector) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn contains(&self, point: Vector) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "X{:.3}..{:.3} Y{:.3}..{:.3}",
            self.min.x, self.max.x, self.min.y, self.max.y
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_include_and_size() {
        let mut bbox = BoundingBox::from_point(Vector::new(1.0, 1.0));
        bbox.include(Vector::new(-2.0, 4.0));
        assert_eq!(bbox.min, Vector::new(-2.0, 1.0));
        assert_eq!(bbox.max, Vector::new(1.0, 4.0));
        assert_eq!(bbox.width(), 3.0);
        assert_eq!(bbox.height(), 3.0);
        assert!(bbox.contains(Vector::new(0.0, 2.0)));
        assert!(!bbox.contains(Vector::new(2.0, 2.0)));
    }

    #[test]
    fn test_from_points() {
        assert!(BoundingBox::from_points(Vec::new()).is_none());
        let bbox = BoundingBox::from_points([Vector::new(0.0, 5.0), Vector::new(3.0, -1.0)]).unwrap();
        assert_eq!(bbox.to_string(), "X0.000..3.000 Y-1.000..5.000");
    }
}
