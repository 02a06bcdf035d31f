//! Typed path commands.

use lasergen_core::Vector;

/// One path command with its arguments, as written (not yet resolved
/// against the current point).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo {
        to: Vector,
        relative: bool,
    },
    LineTo {
        to: Vector,
        relative: bool,
    },
    Horizontal {
        x: f64,
        relative: bool,
    },
    Vertical {
        y: f64,
        relative: bool,
    },
    CubicTo {
        control1: Vector,
        control2: Vector,
        to: Vector,
        relative: bool,
    },
    SmoothCubicTo {
        control2: Vector,
        to: Vector,
        relative: bool,
    },
    QuadraticTo {
        control: Vector,
        to: Vector,
        relative: bool,
    },
    SmoothQuadraticTo {
        to: Vector,
        relative: bool,
    },
    ArcTo {
        radii: Vector,
        /// x-axis rotation in degrees
        rotation: f64,
        large_arc: bool,
        sweep: bool,
        to: Vector,
        relative: bool,
    },
    Close,
}

/// Number of arguments a command letter consumes, or `None` if the letter
/// is not a path command.
pub fn arity(letter: char) -> Option<usize> {
    match letter.to_ascii_uppercase() {
        'M' | 'L' | 'T' => Some(2),
        'H' | 'V' => Some(1),
        'Z' => Some(0),
        'C' => Some(6),
        'Q' | 'S' => Some(4),
        'A' => Some(7),
        _ => None,
    }
}

/// Letter used when a command's arguments repeat without a new letter.
pub fn implicit_successor(letter: char) -> char {
    match letter {
        'M' => 'L',
        'm' => 'l',
        other => other,
    }
}

impl PathCommand {
    /// Build a command from its letter and exactly `arity(letter)` arguments.
    pub fn from_letter(letter: char, args: &[f64]) -> Option<Self> {
        let relative = letter.is_ascii_lowercase();
        let v = |i: usize| Vector::new(args[i], args[i + 1]);
        if arity(letter) != Some(args.len()) {
            return None;
        }
        let command = match letter.to_ascii_uppercase() {
            'M' => Self::MoveTo { to: v(0), relative },
            'L' => Self::LineTo { to: v(0), relative },
            'H' => Self::Horizontal {
                x: args[0],
                relative,
            },
            'V' => Self::Vertical {
                y: args[0],
                relative,
            },
            'C' => Self::CubicTo {
                control1: v(0),
                control2: v(2),
                to: v(4),
                relative,
            },
            'S' => Self::SmoothCubicTo {
                control2: v(0),
                to: v(2),
                relative,
            },
            'Q' => Self::QuadraticTo {
                control: v(0),
                to: v(2),
                relative,
            },
            'T' => Self::SmoothQuadraticTo { to: v(0), relative },
            'A' => Self::ArcTo {
                radii: v(0),
                rotation: args[2],
                large_arc: args[3] != 0.0,
                sweep: args[4] != 0.0,
                to: v(5),
                relative,
            },
            'Z' => Self::Close,
            _ => return None,
        };
        Some(command)
    }

    pub fn letter(&self) -> char {
        let (upper, relative) = match self {
            Self::MoveTo { relative, .. } => ('M', *relative),
            Self::LineTo { relative, .. } => ('L', *relative),
            Self::Horizontal { relative, .. } => ('H', *relative),
            Self::Vertical { relative, .. } => ('V', *relative),
            Self::CubicTo { relative, .. } => ('C', *relative),
            Self::SmoothCubicTo { relative, .. } => ('S', *relative),
            Self::QuadraticTo { relative, .. } => ('Q', *relative),
            Self::SmoothQuadraticTo { relative, .. } => ('T', *relative),
            Self::ArcTo { relative, .. } => ('A', *relative),
            Self::Close => ('Z', false),
        };
        if relative {
            upper.to_ascii_lowercase()
        } else {
            upper
        }
    }
}
