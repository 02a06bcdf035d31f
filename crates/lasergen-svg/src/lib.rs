//! # Lasergen SVG
//!
//! Turns SVG content into lasergen curves.
//!
//! - [`scanner`]: tokenizes path data into [`PathCommand`]s
//! - [`path`]: the command state machine producing curves from one `d` attribute
//! - [`shapes`]: basic shapes rewritten as path data
//! - [`document`]: depth-first document traversal with transform and
//!   visibility inheritance, plus embedded raster images

pub mod command;
pub mod document;
pub mod error;
pub mod path;
pub mod scanner;
pub mod shapes;

pub use command::PathCommand;
pub use document::{parse_file, parse_length, parse_string, DocumentItem, ParseOptions, RasterImage, SvgDocument};
pub use error::{PathError, Result, SvgError};
pub use path::{Cursor, LastControl, Path, PathParseState};
pub use scanner::parse_commands;
