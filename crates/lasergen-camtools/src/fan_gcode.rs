//! G-code for machines whose air assist is wired to the mist coolant output.
//!
//! Identical to [`Gcode`] except that the fan is switched with `M7` and every
//! power change is annotated with a `Cut at` comment.

use lasergen_core::{DistanceMode, LaserMode, Unit};

use crate::error::Result;
use crate::gcode::Gcode;
use crate::interface::{Interface, MachineParameters, MachineState};

#[derive(Debug, Clone, Default)]
pub struct FanControlledGcode {
    inner: Gcode,
}

impl FanControlledGcode {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Interface for FanControlledGcode {
    fn state(&self) -> &MachineState {
        self.inner.state()
    }

    fn state_mut(&mut self) -> &mut MachineState {
        self.inner.state_mut()
    }

    fn set_machine_parameters(&mut self, parameters: MachineParameters) {
        self.inner.set_machine_parameters(parameters);
    }

    fn code_initialize(&mut self) -> String {
        self.inner.code_initialize()
    }

    fn set_movement_speed(&mut self, speed: f64) -> String {
        self.inner.set_movement_speed(speed)
    }

    fn linear_move(&mut self, x: Option<f64>, y: Option<f64>, z: Option<f64>) -> Result<String> {
        self.inner.linear_move(x, y, z)
    }

    fn rapid_move(&mut self, x: Option<f64>, y: Option<f64>, z: Option<f64>) -> Result<String> {
        self.inner.rapid_move(x, y, z)
    }

    fn laser_off(&mut self) -> String {
        self.inner.laser_off()
    }

    fn set_laser_power(&mut self, power: f64) -> Result<String> {
        self.inner.command_power(power)?;

        let state = self.inner.state();
        let speed = state
            .commanded_speed
            .map(|speed| self.inner.format(speed))
            .unwrap_or_else(|| "?".to_string());
        let unit = state.unit.unwrap_or_default();

        let mut lines = vec![self.comment(&format!(
            "Cut at {} {}/min, {}% power",
            speed,
            unit,
            (power * 100.0).round()
        ))];
        let fan = self.inner.fan_on("M7");
        if !fan.is_empty() {
            lines.push(fan);
        }
        Ok(lines.join("\n"))
    }

    fn set_laser_mode(&mut self, mode: LaserMode) -> String {
        self.inner.set_laser_mode(mode)
    }

    fn set_distance_mode(&mut self, mode: DistanceMode) -> String {
        self.inner.set_distance_mode(mode)
    }

    fn set_unit(&mut self, unit: Unit) -> String {
        self.inner.set_unit(unit)
    }

    fn dwell(&mut self, milliseconds: f64) -> String {
        self.inner.dwell(milliseconds)
    }

    fn program_end(&mut self) -> String {
        self.inner.program_end()
    }

    fn comment(&self, text: &str) -> String {
        self.inner.comment(text)
    }

    fn set_origin_at_position(&mut self) -> String {
        self.inner.set_origin_at_position()
    }

    fn home_axes(&mut self) -> String {
        self.inner.home_axes()
    }
}
