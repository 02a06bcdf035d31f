//! Path data interpretation: the command state machine.

use crate::command::PathCommand;
use crate::error::{PathError, Result};
use crate::scanner::parse_commands;
use lasergen_core::{Vector, TOLERANCES};
use lasergen_geometry::{
    endpoint_to_center, ArcConversion, CubicBezier, Curve, EllipticalArc, EndpointArc, Line,
    PathCurve, QuadraticBezier, Transformation,
};
use tracing::{debug, warn};

/// Control point remembered for the smooth curve commands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LastControl {
    Cubic(Vector),
    Quadratic(Vector),
}

/// Position of the pen in untransformed path coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Cursor {
    pub current: Vector,
    /// Start of the current subpath, the target of close-path.
    pub initial: Vector,
    pub last_control: Option<LastControl>,
}

impl Cursor {
    fn resolve(&self, point: Vector, relative: bool) -> Vector {
        if relative {
            self.current + point
        } else {
            point
        }
    }

    /// Reflection of the last control point of the given kind, or the current
    /// point when the previous command was not of that kind.
    fn reflected(&self, cubic: bool) -> Vector {
        match (self.last_control, cubic) {
            (Some(LastControl::Cubic(c)), true) | (Some(LastControl::Quadratic(c)), false) => {
                self.current * 2.0 - c
            }
            _ => self.current,
        }
    }

    fn moved_to(&self, to: Vector, last_control: Option<LastControl>) -> Cursor {
        Cursor {
            current: to,
            initial: self.initial,
            last_control,
        }
    }
}

/// Apply one command to the cursor.
///
/// Returns the next cursor and the curve the command draws, if any. The
/// transformation maps untransformed path coordinates to output space. The
/// input cursor is never modified, so a failing command leaves the parse
/// where it was.
pub fn transition(
    cursor: &Cursor,
    command: &PathCommand,
    transformation: &Transformation,
) -> Result<(Cursor, Option<PathCurve>)> {
    let t = |p: Vector| transformation.apply_affine(p);

    let (next, curve): (Cursor, Option<PathCurve>) = match *command {
        PathCommand::MoveTo { to, relative } => {
            let to = cursor.resolve(to, relative);
            let next = Cursor {
                current: to,
                initial: to,
                last_control: None,
            };
            (next, None)
        }
        PathCommand::LineTo { to, relative } => {
            let to = cursor.resolve(to, relative);
            line_to(cursor, to, &t)
        }
        PathCommand::Horizontal { x, relative } => {
            let x = if relative { cursor.current.x + x } else { x };
            line_to(cursor, Vector::new(x, cursor.current.y), &t)
        }
        PathCommand::Vertical { y, relative } => {
            let y = if relative { cursor.current.y + y } else { y };
            line_to(cursor, Vector::new(cursor.current.x, y), &t)
        }
        PathCommand::Close => {
            let next = cursor.moved_to(cursor.initial, None);
            let curve = if cursor.current.distance_to(cursor.initial) > TOLERANCES.operation {
                Some(Line::new(t(cursor.current), t(cursor.initial)).into())
            } else {
                None
            };
            (next, curve)
        }
        PathCommand::CubicTo {
            control1,
            control2,
            to,
            relative,
        } => {
            let c1 = cursor.resolve(control1, relative);
            let c2 = cursor.resolve(control2, relative);
            let to = cursor.resolve(to, relative);
            cubic_to(cursor, c1, c2, to, &t)
        }
        PathCommand::SmoothCubicTo {
            control2,
            to,
            relative,
        } => {
            let c1 = cursor.reflected(true);
            let c2 = cursor.resolve(control2, relative);
            let to = cursor.resolve(to, relative);
            cubic_to(cursor, c1, c2, to, &t)
        }
        PathCommand::QuadraticTo {
            control,
            to,
            relative,
        } => {
            let c = cursor.resolve(control, relative);
            let to = cursor.resolve(to, relative);
            quadratic_to(cursor, c, to, &t)
        }
        PathCommand::SmoothQuadraticTo { to, relative } => {
            let c = cursor.reflected(false);
            let to = cursor.resolve(to, relative);
            quadratic_to(cursor, c, to, &t)
        }
        PathCommand::ArcTo {
            radii,
            rotation,
            large_arc,
            sweep,
            to,
            relative,
        } => {
            let to = cursor.resolve(to, relative);
            let endpoint = EndpointArc {
                start: cursor.current,
                end: to,
                radii,
                rotation: rotation.to_radians(),
                large_arc,
                sweep,
            };
            let curve: PathCurve = match endpoint_to_center(&endpoint)? {
                ArcConversion::Line => Line::new(t(cursor.current), t(to)).into(),
                ArcConversion::Arc(arc) => EllipticalArc::with_transformation(
                    arc.center,
                    arc.radii,
                    arc.rotation,
                    arc.start_angle,
                    arc.sweep_angle,
                    transformation.clone(),
                )
                .into(),
            };
            (cursor.moved_to(to, None), Some(curve))
        }
    };

    if let Some(curve) = &curve {
        curve.sanity_check()?;
    }
    Ok((next, curve))
}

fn line_to(cursor: &Cursor, to: Vector, t: &impl Fn(Vector) -> Vector) -> (Cursor, Option<PathCurve>) {
    let curve = Line::new(t(cursor.current), t(to));
    (cursor.moved_to(to, None), Some(curve.into()))
}

fn cubic_to(
    cursor: &Cursor,
    c1: Vector,
    c2: Vector,
    to: Vector,
    t: &impl Fn(Vector) -> Vector,
) -> (Cursor, Option<PathCurve>) {
    let curve = CubicBezier::new(t(cursor.current), t(c1), t(c2), t(to));
    (
        cursor.moved_to(to, Some(LastControl::Cubic(c2))),
        Some(curve.into()),
    )
}

fn quadratic_to(
    cursor: &Cursor,
    c: Vector,
    to: Vector,
    t: &impl Fn(Vector) -> Vector,
) -> (Cursor, Option<PathCurve>) {
    let curve = QuadraticBezier::new(t(cursor.current), t(c), t(to));
    (
        cursor.moved_to(to, Some(LastControl::Quadratic(c))),
        Some(curve.into()),
    )
}

/// Transient state while interpreting one path.
#[derive(Debug, Clone, Default)]
pub struct PathParseState {
    pub cursor: Cursor,
    pub transformation: Transformation,
    pub curves: Vec<PathCurve>,
}

impl PathParseState {
    pub fn new(transformation: Transformation) -> Self {
        Self {
            cursor: Cursor::default(),
            transformation,
            curves: Vec::new(),
        }
    }

    /// Apply one command, committing the new cursor and curve on success.
    pub fn apply(&mut self, command: &PathCommand) -> Result<()> {
        let (cursor, curve) = transition(&self.cursor, command, &self.transformation)?;
        self.cursor = cursor;
        self.curves.extend(curve);
        Ok(())
    }
}

/// The curves described by one `d` attribute.
#[derive(Debug, Clone, Default)]
pub struct Path {
    pub curves: Vec<PathCurve>,
    /// Commands that were skipped, with the reason.
    pub skipped: Vec<PathError>,
}

impl Path {
    /// Interpret path data.
    ///
    /// With `transform_origin`, points are mapped from the SVG frame (origin
    /// top-left, y down) to a machine frame (origin bottom-left, y up) using
    /// `canvas_height`. `transformation` is the element's own transform; it
    /// acts on the path coordinates before the origin flip.
    pub fn parse(
        d: &str,
        canvas_height: f64,
        transform_origin: bool,
        transformation: Option<&Transformation>,
    ) -> Path {
        let mut composed = Transformation::new();
        if transform_origin {
            composed
                .add_translation(0.0, canvas_height)
                .add_scale(1.0, -1.0);
        }
        if let Some(element) = transformation {
            composed.extend(element);
        }
        Self::parse_with(d, composed)
    }

    /// Interpret path data with an already composed transformation.
    pub fn parse_with(d: &str, transformation: Transformation) -> Path {
        let mut state = PathParseState::new(transformation);
        let mut skipped = Vec::new();

        for command in parse_commands(d) {
            let result = command.and_then(|command| {
                debug!(command = %command.letter(), "path command");
                state.apply(&command)
            });
            if let Err(err) = result {
                if err.is_recoverable() {
                    warn!("Skipping path command: {}", err);
                    skipped.push(err);
                } else {
                    warn!("Stopping path early: {}", err);
                    skipped.push(err);
                    break;
                }
            }
        }

        Path {
            curves: state.curves,
            skipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lasergen_geometry::GeometryError;

    fn parse_plain(d: &str) -> Path {
        Path::parse(d, 0.0, false, None)
    }

    #[test]
    fn test_straight_line_with_origin_flip() {
        let path = Path::parse("M0,0 L10,0", 10.0, true, None);
        assert_eq!(path.curves.len(), 1);
        let line = path.curves[0].as_line().unwrap();
        assert_eq!(line.start, Vector::new(0.0, 10.0));
        assert_eq!(line.end, Vector::new(10.0, 10.0));
    }

    #[test]
    fn test_relative_commands() {
        let path = parse_plain("m1 1 l2 0 v3 h-2 z");
        assert_eq!(path.curves.len(), 4);
        assert_eq!(path.curves[2].end(), Vector::new(1.0, 4.0));
        assert_eq!(path.curves[3].end(), Vector::new(1.0, 1.0));
    }

    #[test]
    fn test_close_on_start_draws_nothing() {
        let path = parse_plain("M0 0 L5 0 L0 0 Z");
        assert_eq!(path.curves.len(), 2);
    }

    #[test]
    fn test_subpaths_close_to_their_own_start() {
        let path = parse_plain("M0 0 L1 0 L1 1 Z M5 5 L6 5 L6 6 Z");
        assert_eq!(path.curves.last().unwrap().end(), Vector::new(5.0, 5.0));
    }

    #[test]
    fn test_smooth_cubic_reflects_control() {
        let path = parse_plain("M0 0 C0 1 1 1 1 0 S2 -1 2 0");
        let PathCurve::CubicBezier(second) = &path.curves[1] else {
            panic!("expected cubic");
        };
        assert_eq!(second.control1, Vector::new(1.0, -1.0));
    }

    #[test]
    fn test_smooth_cubic_without_previous_uses_current_point() {
        let path = parse_plain("M3 3 S4 4 5 3");
        let PathCurve::CubicBezier(curve) = &path.curves[0] else {
            panic!("expected cubic");
        };
        assert_eq!(curve.control1, Vector::new(3.0, 3.0));
    }

    #[test]
    fn test_smooth_quadratic_chain() {
        let path = parse_plain("M0 0 Q1 1 2 0 T4 0 T6 0");
        let controls: Vec<Vector> = path
            .curves
            .iter()
            .map(|c| match c {
                PathCurve::QuadraticBezier(q) => q.control,
                _ => panic!("expected quadratic"),
            })
            .collect();
        assert_eq!(controls, vec![Vector::new(1.0, 1.0), Vector::new(3.0, -1.0), Vector::new(5.0, 1.0)]);
    }

    #[test]
    fn test_smooth_quadratic_after_cubic_uses_current_point() {
        let path = parse_plain("M0 0 C0 1 1 1 1 0 T3 0");
        let PathCurve::QuadraticBezier(q) = &path.curves[1] else {
            panic!("expected quadratic");
        };
        assert_eq!(q.control, Vector::new(1.0, 0.0));
    }

    #[test]
    fn test_arc_same_endpoints_skipped() {
        let path = parse_plain("M0 0 L5 0 A3 3 0 0 1 5 0 L5 5");
        assert_eq!(path.curves.len(), 2);
        assert!(matches!(
            path.skipped[0],
            PathError::Geometry(GeometryError::DegenerateGeometry(_))
        ));
        assert_eq!(path.curves[1].end(), Vector::new(5.0, 5.0));
    }

    #[test]
    fn test_arc_with_zero_radius_is_line() {
        let path = parse_plain("M0 0 A0 5 0 0 1 4 4");
        assert!(path.curves[0].as_line().is_some());
    }

    #[test]
    fn test_arc_endpoints() {
        let path = Path::parse("M10 20 A10 10 0 0 1 30 20", 100.0, true, None);
        let arc = &path.curves[0];
        assert!(arc.start().distance_to(Vector::new(10.0, 80.0)) < 1e-9);
        assert!(arc.end().distance_to(Vector::new(30.0, 80.0)) < 1e-9);
        // sweep flag 1 passes over the top in SVG space (y = 10), y = 90 after the flip
        assert!(arc.point(0.5).distance_to(Vector::new(20.0, 90.0)) < 1e-9);
    }

    #[test]
    fn test_element_transform_applies_before_flip() {
        let element = Transformation::from_svg("translate(5, 0)").unwrap();
        let path = Path::parse("M0 0 L0 2", 10.0, true, Some(&element));
        assert_eq!(path.curves[0].start(), Vector::new(5.0, 10.0));
        assert_eq!(path.curves[0].end(), Vector::new(5.0, 8.0));
    }

    #[test]
    fn test_malformed_command_does_not_abort() {
        let path = parse_plain("M0 0 L1 0 C1 2 L2 2 Q");
        assert_eq!(path.curves.len(), 2);
        assert_eq!(path.skipped.len(), 2);
    }

    #[test]
    fn test_transition_is_pure() {
        let cursor = Cursor::default();
        let t = Transformation::new();
        let cmd = PathCommand::LineTo {
            to: Vector::new(1.0, 1.0),
            relative: false,
        };
        let (next, curve) = transition(&cursor, &cmd, &t).unwrap();
        assert_eq!(cursor.current, Vector::ZERO);
        assert_eq!(next.current, Vector::new(1.0, 1.0));
        assert!(curve.is_some());
    }
}
