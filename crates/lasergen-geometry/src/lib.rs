//! # Lasergen Geometry
//!
//! Parametric curves and the operations the G-code pipeline needs on them.
//!
//! - [`Transformation`]: affine transforms parsed from SVG transform lists
//! - [`Curve`] and its variants: [`Line`], [`CircularArc`], [`EllipticalArc`],
//!   [`QuadraticBezier`], [`CubicBezier`], unified by [`PathCurve`]
//! - [`parameterization`]: endpoint/center conversion of elliptical arcs
//! - [`Chain`] and [`LineSegmentChain`]: continuity-checked curve sequences
//! - [`line_segment_approximation`]: adaptive, error-bounded polyline approximation

pub mod approximation;
pub mod bezier;
pub mod bounds;
pub mod chain;
pub mod circular_arc;
pub mod curve;
pub mod elliptical_arc;
pub mod error;
pub mod line;
pub mod parameterization;
pub mod transform;

pub use approximation::{line_segment_approximation, ApproximationSettings};
pub use bezier::{CubicBezier, QuadraticBezier};
pub use bounds::BoundingBox;
pub use chain::{Chain, Joinable, LineSegmentChain};
pub use circular_arc::CircularArc;
pub use curve::{max_distance, ArcLength, Curve, PathCurve, DEFAULT_SAMPLES};
pub use elliptical_arc::EllipticalArc;
pub use error::{GeometryError, Result};
pub use line::Line;
pub use parameterization::{center_to_endpoint, endpoint_to_center, ArcConversion, CenterArc, EndpointArc};
pub use transform::{TransformOp, Transformation};
