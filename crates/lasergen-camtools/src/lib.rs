//! # Lasergen CAM Tools
//!
//! Turns approximated geometry into laser G-code.
//!
//! - [`Interface`]: the abstract instruction vocabulary and [`MachineState`]
//! - [`Gcode`] and [`FanControlledGcode`]: concrete dialects
//! - [`Compiler`]: per-chain emission, raster scanning, passes and the
//!   bounds report
//! - [`RasterScanlines`]: image sampling and run-length compression

pub mod compiler;
pub mod error;
pub mod fan_gcode;
pub mod gcode;
pub mod interface;
pub mod raster;

pub use compiler::{BoundsReport, Compiler};
pub use error::{BoundsWarning, CompileError, Result};
pub use fan_gcode::FanControlledGcode;
pub use gcode::{format_number, Gcode};
pub use interface::{Interface, MachineParameters, MachineState};
pub use raster::{RasterScanlines, Run, Scanline};
