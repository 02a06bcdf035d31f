//! Error types for path data and SVG document parsing.

use lasergen_geometry::GeometryError;
use thiserror::Error;

/// Errors raised while scanning or interpreting path data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    /// A character that is neither a command letter nor part of a number.
    #[error("Unknown command '{letter}' at offset {offset}")]
    UnknownCommand { letter: char, offset: usize },

    /// A command ran out of arguments before reaching its arity.
    #[error("Command '{command}' at offset {offset} expects {expected} arguments, found {found}")]
    Arity {
        command: char,
        offset: usize,
        expected: usize,
        found: usize,
    },

    /// Numbers with no command to consume them.
    #[error("Unexpected number at offset {offset}")]
    UnexpectedNumber { offset: usize },

    /// The curve produced by a command is invalid.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

impl PathError {
    /// Errors local to one command. Anything else aborts the path.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Geometry(GeometryError::DegenerateGeometry(_)) => true,
            Self::Geometry(GeometryError::DiscontinuousChain { .. }) => true,
            Self::Geometry(_) => false,
            _ => true,
        }
    }
}

/// Errors raised while reading an SVG document.
#[derive(Error, Debug)]
pub enum SvgError {
    /// The document is not well-formed XML.
    #[error("XML parsing error: {0}")]
    Xml(String),

    /// The origin flip was requested but no canvas height is known.
    #[error("Canvas height is required to flip the origin; set it explicitly or add a height attribute to the root element")]
    MissingCanvasHeight,

    /// An attribute value could not be interpreted.
    #[error("Invalid {attribute} on <{element}>: {value}")]
    InvalidAttribute {
        element: String,
        attribute: String,
        value: String,
    },

    /// An embedded raster image could not be decoded.
    #[error("Image error: {0}")]
    Image(String),

    /// I/O error while reading a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

impl From<quick_xml::Error> for SvgError {
    fn from(err: quick_xml::Error) -> Self {
        Self::Xml(err.to_string())
    }
}

/// Result type for path parsing.
pub type Result<T> = std::result::Result<T, PathError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_error_display() {
        let err = PathError::Arity {
            command: 'C',
            offset: 4,
            expected: 6,
            found: 2,
        };
        assert_eq!(
            err.to_string(),
            "Command 'C' at offset 4 expects 6 arguments, found 2"
        );
    }

    #[test]
    fn test_recoverable() {
        assert!(PathError::UnknownCommand { letter: 'X', offset: 0 }.is_recoverable());
        assert!(PathError::Geometry(GeometryError::DegenerateGeometry("x".into())).is_recoverable());
        assert!(!PathError::Geometry(GeometryError::ApproximationStalled { t: 0.0, increment: 0.0 })
            .is_recoverable());
    }
}
