//! The laser settings record.

use lasergen_core::{DistanceMode, LaserMode, Unit};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SettingsError};

/// Settings for one laser job.
///
/// Keys match the settings file format; every key is optional in a file and
/// falls back to the value of [`LaserSettings::default`]. `maximum_laser_power`
/// and `movement_speed` have no usable default and must be provided.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LaserSettings {
    // Machine parameters
    /// Emit `$32=1` to switch GRBL into laser mode
    pub laser_mode_enable: Option<bool>,
    /// Spindle value for 0% power
    pub minimum_laser_power: u32,
    /// Spindle value for 100% power (`$30` on GRBL)
    pub maximum_laser_power: Option<u32>,
    /// Unused by the compiler, kept for completeness of the machine record
    pub x_axis_maximum_rate: Option<u32>,
    pub y_axis_maximum_rate: Option<u32>,
    /// Work area length along X in machine units
    pub x_axis_maximum_travel: Option<u32>,
    /// Work area length along Y in machine units
    pub y_axis_maximum_travel: Option<u32>,
    /// Run the air assist fan while cutting
    pub fan: bool,

    // Tool parameters
    /// Z step-down between passes
    pub pass_depth: f64,
    /// Dwell in milliseconds around each travel move
    pub dwell_time: f64,
    /// Dwell after the travel move instead of before it
    pub dwell_before_cut: bool,
    /// Feed rate for cutting and travel moves
    pub movement_speed: Option<u32>,
    /// Cutting power as a fraction of the power range
    pub laser_power: f64,
    pub laser_mode: LaserMode,
    /// Spindle value for black pixels in raster images
    pub maximum_image_laser_power: Option<u32>,
    /// Feed rate for raster images
    pub image_movement_speed: Option<u32>,

    // Configuration
    pub unit: Unit,
    pub distance_mode: DistanceMode,
    /// Travel with G0 between chains; otherwise G1 with the laser at zero power
    pub rapid_move: bool,
    /// Raster scanline spacing in machine units
    pub pixel_size: f64,
    /// Log decoded raster images
    pub showimage: bool,

    /// Extra lines placed after the generated header
    pub custom_header: Vec<String>,
    /// Extra lines placed before the program end
    pub custom_footer: Vec<String>,
}

impl Default for LaserSettings {
    fn default() -> Self {
        Self {
            laser_mode_enable: None,
            minimum_laser_power: 0,
            maximum_laser_power: None,
            x_axis_maximum_rate: None,
            y_axis_maximum_rate: None,
            x_axis_maximum_travel: None,
            y_axis_maximum_travel: None,
            fan: false,
            pass_depth: 0.0,
            dwell_time: 0.0,
            dwell_before_cut: false,
            movement_speed: None,
            laser_power: 1.0,
            laser_mode: LaserMode::Dynamic,
            maximum_image_laser_power: None,
            image_movement_speed: None,
            unit: Unit::Mm,
            distance_mode: DistanceMode::Absolute,
            rapid_move: true,
            pixel_size: 0.1,
            showimage: false,
            custom_header: Vec::new(),
            custom_footer: Vec::new(),
        }
    }
}

impl LaserSettings {
    /// Defaults plus the two mandatory values.
    pub fn new(maximum_laser_power: u32, movement_speed: u32) -> Self {
        Self {
            maximum_laser_power: Some(maximum_laser_power),
            movement_speed: Some(movement_speed),
            ..Default::default()
        }
    }

    /// Check value ranges. Does not require the mandatory keys; see
    /// [`LaserSettings::validate_for_compile`].
    pub fn validate(&self) -> Result<()> {
        non_negative("pass_depth", self.pass_depth)?;
        non_negative("dwell_time", self.dwell_time)?;

        if !(0.0..=1.0).contains(&self.laser_power) {
            return Err(SettingsError::invalid(
                "laser_power",
                format!("{} is not in range [0..1]", self.laser_power),
            ));
        }

        if !self.pixel_size.is_finite() || self.pixel_size <= 0.0 {
            return Err(SettingsError::invalid(
                "pixel_size",
                format!("{} must be greater than 0", self.pixel_size),
            ));
        }

        if let Some(max) = self.maximum_laser_power {
            if max <= self.minimum_laser_power {
                return Err(SettingsError::invalid(
                    "maximum_laser_power",
                    format!(
                        "{} must be greater than minimum_laser_power ({})",
                        max, self.minimum_laser_power
                    ),
                ));
            }
        }

        if let (Some(image), Some(max)) = (self.maximum_image_laser_power, self.maximum_laser_power) {
            if image > max {
                return Err(SettingsError::invalid(
                    "maximum_image_laser_power",
                    format!("{} exceeds maximum_laser_power ({})", image, max),
                ));
            }
        }

        Ok(())
    }

    /// [`LaserSettings::validate`] plus the keys the compiler cannot do without.
    pub fn validate_for_compile(&self) -> Result<()> {
        self.validate()?;
        if self.maximum_laser_power.is_none() {
            return Err(SettingsError::invalid("maximum_laser_power", "is mandatory"));
        }
        match self.movement_speed {
            None => Err(SettingsError::invalid("movement_speed", "is mandatory")),
            Some(0) => Err(SettingsError::invalid("movement_speed", "must be greater than 0")),
            Some(_) => Ok(()),
        }
    }

    /// Feed rate for raster images, falling back to the cutting speed.
    pub fn raster_speed(&self) -> Option<u32> {
        self.image_movement_speed.or(self.movement_speed)
    }

    /// Fraction of the power range used for black raster pixels.
    pub fn raster_power_fraction(&self) -> f64 {
        match (self.maximum_image_laser_power, self.maximum_laser_power) {
            (Some(image), Some(max)) if max > self.minimum_laser_power => {
                let span = (max - self.minimum_laser_power) as f64;
                (image.saturating_sub(self.minimum_laser_power) as f64 / span).clamp(0.0, 1.0)
            }
            _ => 1.0,
        }
    }
}

fn non_negative(key: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(SettingsError::invalid(key, format!("{} must be >= 0", value)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = LaserSettings::default();
        assert_eq!(settings.minimum_laser_power, 0);
        assert_eq!(settings.laser_power, 1.0);
        assert_eq!(settings.laser_mode, LaserMode::Dynamic);
        assert_eq!(settings.unit, Unit::Mm);
        assert_eq!(settings.distance_mode, DistanceMode::Absolute);
        assert!(settings.rapid_move);
        assert!(!settings.fan);
        assert_eq!(settings.pixel_size, 0.1);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_mandatory_keys() {
        let err = LaserSettings::default().validate_for_compile().unwrap_err();
        assert!(matches!(err, SettingsError::InvalidSetting { ref key, .. } if key == "maximum_laser_power"));

        let settings = LaserSettings {
            maximum_laser_power: Some(255),
            ..Default::default()
        };
        let err = settings.validate_for_compile().unwrap_err();
        assert!(matches!(err, SettingsError::InvalidSetting { ref key, .. } if key == "movement_speed"));

        assert!(LaserSettings::new(255, 300).validate_for_compile().is_ok());
    }

    #[test]
    fn test_range_checks() {
        let mut settings = LaserSettings::new(255, 300);
        settings.laser_power = 1.5;
        assert!(settings.validate().is_err());

        let mut settings = LaserSettings::new(255, 300);
        settings.pass_depth = -1.0;
        assert!(settings.validate().is_err());

        let mut settings = LaserSettings::new(255, 300);
        settings.pixel_size = 0.0;
        assert!(settings.validate().is_err());

        let mut settings = LaserSettings::new(255, 300);
        settings.minimum_laser_power = 255;
        assert!(settings.validate().is_err());

        let mut settings = LaserSettings::new(255, 300);
        settings.maximum_image_laser_power = Some(300);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_raster_power_fraction() {
        let mut settings = LaserSettings::new(1000, 300);
        assert_eq!(settings.raster_power_fraction(), 1.0);
        settings.maximum_image_laser_power = Some(250);
        assert!((settings.raster_power_fraction() - 0.25).abs() < 1e-12);
        assert_eq!(settings.raster_speed(), Some(300));
        settings.image_movement_speed = Some(3000);
        assert_eq!(settings.raster_speed(), Some(3000));
    }

    #[test]
    fn test_json_partial_and_unknown_keys() {
        let settings: LaserSettings =
            serde_json::from_str(r#"{"maximum_laser_power": 1000, "movement_speed": 900, "laser_mode": "constant"}"#)
                .unwrap();
        assert_eq!(settings.maximum_laser_power, Some(1000));
        assert_eq!(settings.laser_mode, LaserMode::Constant);
        assert_eq!(settings.pixel_size, 0.1);

        let unknown = serde_json::from_str::<LaserSettings>(r#"{"laser_powr": 0.5}"#);
        assert!(unknown.is_err());

        let negative = serde_json::from_str::<LaserSettings>(r#"{"movement_speed": -5}"#);
        assert!(negative.is_err());
    }
}
