//! GRBL-flavoured G-code.
//!
//! Every command is terminated with `;`. Speed (`F`) and power (`S`) words are
//! attached to motion commands and written only when they change.

use lasergen_core::math::linear_map;
use lasergen_core::{DistanceMode, LaserMode, Unit, Vector, TOLERANCES};
use tracing::warn;

use crate::error::{CompileError, Result};
use crate::interface::{Interface, MachineParameters, MachineState};

/// Format a coordinate with `precision` decimals, dropping the fraction of
/// whole numbers.
pub fn format_number(value: f64, precision: usize) -> String {
    let mut text = format!("{:.*}", precision, value);
    if let Some(dot) = text.find('.') {
        if text[dot + 1..].bytes().all(|b| b == b'0') {
            text.truncate(dot);
        }
    }
    if text == "-0" {
        text = "0".to_string();
    }
    text
}

#[derive(Debug, Clone)]
pub struct Gcode {
    state: MachineState,
    parameters: MachineParameters,
    precision: usize,
}

impl Default for Gcode {
    fn default() -> Self {
        Self::new()
    }
}

impl Gcode {
    pub fn new() -> Self {
        Self {
            state: MachineState::default(),
            parameters: MachineParameters::default(),
            precision: TOLERANCES.precision(),
        }
    }

    pub fn with_parameters(parameters: MachineParameters) -> Self {
        Self {
            parameters,
            ..Self::new()
        }
    }

    pub fn parameters(&self) -> &MachineParameters {
        &self.parameters
    }

    pub fn format(&self, value: f64) -> String {
        format_number(value, self.precision)
    }

    /// Validate `power` and record its scaled spindle value.
    pub(crate) fn command_power(&mut self, power: f64) -> Result<f64> {
        if !(0.0..=1.0).contains(&power) {
            return Err(CompileError::InvalidPower(power));
        }
        let scaled = linear_map(
            self.parameters.minimum_laser_power as f64,
            self.parameters.maximum_laser_power as f64,
            power,
        );
        self.state.commanded_power = Some(scaled);
        Ok(scaled)
    }

    /// Switch the fan on with `code` if it is configured and not running yet.
    pub(crate) fn fan_on(&mut self, code: &str) -> String {
        if self.parameters.fan && !self.state.fan_on {
            self.state.fan_on = true;
            format!("{};", code)
        } else {
            String::new()
        }
    }

    fn motion(
        &mut self,
        word: &str,
        target: [Option<f64>; 3],
        cutting: bool,
    ) -> Result<String> {
        let [x, y, z] = target;
        if x.is_none() && y.is_none() && z.is_none() {
            warn!("{} invoked without arguments", word);
            return Ok(String::new());
        }

        let mut command = word.to_string();

        if cutting {
            let speed = self.state.commanded_speed.ok_or(CompileError::MissingSpeed)?;
            if self.state.emitted_speed != Some(speed) {
                self.state.emitted_speed = Some(speed);
                command.push_str(&format!(" F{}", self.format(speed)));
            }
        }

        let base = match self.state.distance_mode {
            DistanceMode::Absolute => Vector::ZERO,
            DistanceMode::Incremental => self.state.position.unwrap_or(Vector::ZERO),
        };
        if let Some(x) = x {
            command.push_str(&format!(" X{}", self.format(x - base.x)));
        }
        if let Some(y) = y {
            command.push_str(&format!(" Y{}", self.format(y - base.y)));
        }
        if let Some(z) = z {
            command.push_str(&format!(" Z{}", self.format(z)));
        }

        if cutting {
            if let Some(power) = self.state.commanded_power {
                if self.state.emitted_power != Some(power) {
                    self.state.emitted_power = Some(power);
                    command.push_str(&format!(" S{}", self.format(power)));
                }
            }
        }

        match (self.state.position, x, y) {
            (Some(position), _, _) => {
                self.state.position = Some(Vector::new(x.unwrap_or(position.x), y.unwrap_or(position.y)));
            }
            (None, Some(x), Some(y)) => self.state.position = Some(Vector::new(x, y)),
            _ => {}
        }

        command.push(';');
        Ok(command)
    }
}

impl Interface for Gcode {
    fn state(&self) -> &MachineState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut MachineState {
        &mut self.state
    }

    fn set_machine_parameters(&mut self, parameters: MachineParameters) {
        self.parameters = parameters;
    }

    fn code_initialize(&mut self) -> String {
        match self.parameters.laser_mode_enable {
            Some(true) => "$32=1;".to_string(),
            Some(false) => "$32=0;".to_string(),
            None => String::new(),
        }
    }

    fn set_movement_speed(&mut self, speed: f64) -> String {
        self.state.commanded_speed = Some(speed);
        String::new()
    }

    fn linear_move(&mut self, x: Option<f64>, y: Option<f64>, z: Option<f64>) -> Result<String> {
        self.motion("G1", [x, y, z], true)
    }

    fn rapid_move(&mut self, x: Option<f64>, y: Option<f64>, z: Option<f64>) -> Result<String> {
        self.motion("G0", [x, y, z], false)
    }

    fn laser_off(&mut self) -> String {
        let mut lines = Vec::new();
        if !self.state.laser_off {
            self.state.laser_off = true;
            self.state.laser_mode = None;
            lines.push("M5;");
        }
        if self.state.fan_on {
            self.state.fan_on = false;
            lines.push("M9;");
        }
        lines.join("\n")
    }

    fn set_laser_power(&mut self, power: f64) -> Result<String> {
        self.command_power(power)?;
        Ok(self.fan_on("M8"))
    }

    fn set_laser_mode(&mut self, mode: LaserMode) -> String {
        if self.state.laser_mode == Some(mode) {
            return String::new();
        }
        self.state.laser_mode = Some(mode);
        self.state.laser_off = false;
        match mode {
            LaserMode::Constant => "M3;".to_string(),
            LaserMode::Dynamic => "M4;".to_string(),
        }
    }

    fn set_distance_mode(&mut self, mode: DistanceMode) -> String {
        self.state.distance_mode = mode;
        match mode {
            DistanceMode::Absolute => "G90;".to_string(),
            DistanceMode::Incremental => "G91;".to_string(),
        }
    }

    fn set_unit(&mut self, unit: Unit) -> String {
        self.state.unit = Some(unit);
        match unit {
            Unit::Mm => "G21;".to_string(),
            Unit::Inch => "G20;".to_string(),
        }
    }

    fn dwell(&mut self, milliseconds: f64) -> String {
        if milliseconds <= 0.0 {
            return String::new();
        }
        format!("G4 P{};", self.format(milliseconds / 1000.0))
    }

    fn program_end(&mut self) -> String {
        "M2;".to_string()
    }

    fn comment(&self, text: &str) -> String {
        format!("; {}", text)
    }

    fn set_origin_at_position(&mut self) -> String {
        self.state.position = Some(Vector::ZERO);
        "G92 X0 Y0 Z0;".to_string()
    }

    fn home_axes(&mut self) -> String {
        self.state.position = None;
        "G28;".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gcode() -> Gcode {
        let mut gcode = Gcode::new();
        gcode.set_movement_speed(300.0);
        gcode
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(10.0, 6), "10");
        assert_eq!(format_number(-0.0000001, 6), "0");
        assert_eq!(format_number(1.5, 6), "1.500000");
        assert_eq!(format_number(2.0000004, 6), "2");
        assert_eq!(format_number(-3.25, 6), "-3.250000");
    }

    #[test]
    fn test_redundant_power_elided() {
        let mut gcode = gcode();
        assert_eq!(gcode.set_laser_power(0.5).unwrap(), "");
        assert_eq!(gcode.set_laser_power(0.5).unwrap(), "");
        let first = gcode.linear_move(Some(1.0), Some(2.0), None).unwrap();
        assert_eq!(first, "G1 F300 X1 Y2 S127.500000;");

        gcode.set_laser_power(0.5).unwrap();
        let second = gcode.linear_move(Some(3.0), Some(2.0), None).unwrap();
        assert_eq!(second, "G1 X3 Y2;");
        assert_eq!(second.matches('S').count(), 0);
    }

    #[test]
    fn test_speed_change_emitted_once() {
        let mut gcode = gcode();
        gcode.linear_move(Some(1.0), None, None).unwrap();
        gcode.set_movement_speed(600.0);
        assert_eq!(gcode.linear_move(Some(2.0), None, None).unwrap(), "G1 F600 X2;");
        assert_eq!(gcode.linear_move(Some(3.0), None, None).unwrap(), "G1 X3;");
    }

    #[test]
    fn test_missing_speed() {
        let mut gcode = Gcode::new();
        let err = gcode.linear_move(Some(1.0), Some(1.0), None).unwrap_err();
        assert!(matches!(err, CompileError::MissingSpeed));

        // Rapid moves do not need a feed rate.
        assert_eq!(gcode.rapid_move(Some(1.0), Some(1.0), None).unwrap(), "G0 X1 Y1;");
    }

    #[test]
    fn test_invalid_power() {
        let mut gcode = gcode();
        assert!(matches!(gcode.set_laser_power(1.2), Err(CompileError::InvalidPower(_))));
        assert!(matches!(gcode.set_laser_power(-0.1), Err(CompileError::InvalidPower(_))));
        assert!(gcode.state().commanded_power.is_none());
    }

    #[test]
    fn test_move_without_axes_is_noop() {
        let mut gcode = gcode();
        assert_eq!(gcode.linear_move(None, None, None).unwrap(), "");
        assert!(gcode.position().is_none());
    }

    #[test]
    fn test_position_tracking() {
        let mut gcode = gcode();
        gcode.linear_move(Some(1.0), None, None).unwrap();
        assert!(gcode.position().is_none());
        gcode.linear_move(Some(1.0), Some(2.0), None).unwrap();
        assert_eq!(gcode.position(), Some(Vector::new(1.0, 2.0)));
        gcode.linear_move(None, Some(5.0), None).unwrap();
        assert_eq!(gcode.position(), Some(Vector::new(1.0, 5.0)));
    }

    #[test]
    fn test_incremental_coordinates() {
        let mut gcode = gcode();
        gcode.set_distance_mode(DistanceMode::Incremental);
        assert_eq!(gcode.rapid_move(Some(2.0), Some(3.0), None).unwrap(), "G0 X2 Y3;");
        assert_eq!(gcode.linear_move(Some(5.0), Some(3.0), None).unwrap(), "G1 F300 X3 Y0;");
        assert_eq!(gcode.position(), Some(Vector::new(5.0, 3.0)));
    }

    #[test]
    fn test_laser_off_and_mode() {
        let mut gcode = gcode();
        assert_eq!(gcode.laser_off(), "M5;");
        assert_eq!(gcode.laser_off(), "");
        assert_eq!(gcode.set_laser_mode(LaserMode::Dynamic), "M4;");
        assert_eq!(gcode.set_laser_mode(LaserMode::Dynamic), "");
        assert_eq!(gcode.laser_off(), "M5;");
        // Switching back on after M5 re-emits the mode.
        assert_eq!(gcode.set_laser_mode(LaserMode::Dynamic), "M4;");
        assert_eq!(gcode.set_laser_mode(LaserMode::Constant), "M3;");
    }

    #[test]
    fn test_fan_control() {
        let mut gcode = Gcode::with_parameters(MachineParameters {
            fan: true,
            ..Default::default()
        });
        gcode.laser_off();
        assert_eq!(gcode.set_laser_power(1.0).unwrap(), "M8;");
        assert_eq!(gcode.set_laser_power(1.0).unwrap(), "");
        gcode.set_laser_mode(LaserMode::Dynamic);
        assert_eq!(gcode.laser_off(), "M5;\nM9;");
    }

    #[test]
    fn test_power_range_mapping() {
        let mut gcode = Gcode::with_parameters(MachineParameters {
            minimum_laser_power: 100,
            maximum_laser_power: 1100,
            ..Default::default()
        });
        gcode.set_movement_speed(100.0);
        gcode.set_laser_power(0.25).unwrap();
        assert_eq!(gcode.linear_move(Some(0.0), Some(0.0), None).unwrap(), "G1 F100 X0 Y0 S350;");
    }

    #[test]
    fn test_misc_commands() {
        let mut gcode = gcode();
        assert_eq!(gcode.code_initialize(), "");
        gcode.set_machine_parameters(MachineParameters {
            laser_mode_enable: Some(true),
            ..Default::default()
        });
        assert_eq!(gcode.code_initialize(), "$32=1;");
        assert_eq!(gcode.set_unit(Unit::Inch), "G20;");
        assert_eq!(gcode.set_unit(Unit::Mm), "G21;");
        assert_eq!(gcode.dwell(0.0), "");
        assert_eq!(gcode.dwell(250.0), "G4 P0.250000;");
        assert_eq!(gcode.program_end(), "M2;");
        assert_eq!(gcode.comment("hello"), "; hello");
        assert_eq!(gcode.set_origin_at_position(), "G92 X0 Y0 Z0;");
        assert_eq!(gcode.position(), Some(Vector::ZERO));
        assert_eq!(gcode.home_axes(), "G28;");
        assert!(gcode.position().is_none());
    }
}
