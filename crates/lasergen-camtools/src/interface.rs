//! The instruction vocabulary the compiler drives.
//!
//! A dialect turns abstract operations into command text and keeps the
//! [`MachineState`] needed to elide redundant output. Every operation returns
//! the text to emit, possibly empty.

use lasergen_core::{DistanceMode, LaserMode, Unit, Vector};
use lasergen_geometry::BoundingBox;
use lasergen_settings::LaserSettings;

use crate::error::Result;

/// Machine parameters a dialect needs to scale power and drive accessories.
#[derive(Debug, Clone, PartialEq)]
pub struct MachineParameters {
    pub minimum_laser_power: u32,
    pub maximum_laser_power: u32,
    pub fan: bool,
    pub laser_mode_enable: Option<bool>,
}

impl Default for MachineParameters {
    fn default() -> Self {
        Self {
            minimum_laser_power: 0,
            maximum_laser_power: 255,
            fan: false,
            laser_mode_enable: None,
        }
    }
}

impl MachineParameters {
    pub fn from_settings(settings: &LaserSettings) -> Self {
        let defaults = Self::default();
        Self {
            minimum_laser_power: settings.minimum_laser_power,
            maximum_laser_power: settings
                .maximum_laser_power
                .unwrap_or(defaults.maximum_laser_power),
            fan: settings.fan,
            laser_mode_enable: settings.laser_mode_enable,
        }
    }
}

/// What the machine has been told so far.
///
/// `commanded_*` is the value requested by the caller, `emitted_*` the value
/// last written to the output. A value is written only when the two differ.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MachineState {
    /// Unknown until the first move.
    pub position: Option<Vector>,
    pub commanded_speed: Option<f64>,
    pub emitted_speed: Option<f64>,
    /// Spindle value, already scaled to the machine's power range.
    pub commanded_power: Option<f64>,
    pub emitted_power: Option<f64>,
    /// M3/M4 in effect; `None` once the laser is switched off.
    pub laser_mode: Option<LaserMode>,
    /// Whether an M5 is known to be in effect.
    pub laser_off: bool,
    pub fan_on: bool,
    pub distance_mode: DistanceMode,
    pub unit: Option<Unit>,
    /// Unknown until the first move.
    pub bounding_box: Option<BoundingBox>,
}

impl MachineState {
    /// Grow the bounding box to include `point`.
    pub fn track(&mut self, point: Vector) {
        match self.bounding_box.as_mut() {
            Some(bbox) => bbox.include(point),
            None => self.bounding_box = Some(BoundingBox::from_point(point)),
        }
    }
}

/// A target instruction dialect.
pub trait Interface {
    fn state(&self) -> &MachineState;

    fn state_mut(&mut self) -> &mut MachineState;

    fn set_machine_parameters(&mut self, parameters: MachineParameters);

    /// Machine initialization, placed first in the header.
    fn code_initialize(&mut self) -> String;

    /// Speed for subsequent cutting moves.
    fn set_movement_speed(&mut self, speed: f64) -> String;

    /// Cutting move. Axes left `None` are not moved.
    fn linear_move(&mut self, x: Option<f64>, y: Option<f64>, z: Option<f64>) -> Result<String>;

    /// Non-cutting move at the machine's rapid rate.
    fn rapid_move(&mut self, x: Option<f64>, y: Option<f64>, z: Option<f64>) -> Result<String>;

    fn laser_off(&mut self) -> String;

    /// Power for subsequent cutting moves as a fraction in [0, 1].
    fn set_laser_power(&mut self, power: f64) -> Result<String>;

    fn set_laser_mode(&mut self, mode: LaserMode) -> String;

    fn set_distance_mode(&mut self, mode: DistanceMode) -> String;

    fn set_unit(&mut self, unit: Unit) -> String;

    fn dwell(&mut self, milliseconds: f64) -> String;

    fn program_end(&mut self) -> String;

    /// A comment line in the dialect's syntax.
    fn comment(&self, text: &str) -> String;

    /// Make the current position the origin. Empty when unsupported.
    fn set_origin_at_position(&mut self) -> String {
        String::new()
    }

    /// Home all axes. Empty when unsupported.
    fn home_axes(&mut self) -> String {
        String::new()
    }

    fn position(&self) -> Option<Vector> {
        self.state().position
    }
}
