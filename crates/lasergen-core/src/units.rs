//! Machine units and motion modes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Length unit commanded to the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Millimeters (G21)
    #[default]
    #[serde(alias = "millimeter")]
    Mm,
    /// Inches (G20)
    #[serde(alias = "in")]
    Inch,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mm => write!(f, "mm"),
            Self::Inch => write!(f, "inch"),
        }
    }
}

impl FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mm" | "millimeter" | "millimeters" => Ok(Self::Mm),
            "inch" | "in" | "inches" => Ok(Self::Inch),
            _ => Err(format!("Unknown unit: {}", s)),
        }
    }
}

/// Whether coordinates are absolute or relative to the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMode {
    /// G90
    #[default]
    Absolute,
    /// G91
    Incremental,
}

impl fmt::Display for DistanceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absolute => write!(f, "absolute"),
            Self::Incremental => write!(f, "incremental"),
        }
    }
}

impl FromStr for DistanceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "absolute" => Ok(Self::Absolute),
            "incremental" | "relative" => Ok(Self::Incremental),
            _ => Err(format!("Unknown distance mode: {}", s)),
        }
    }
}

/// Laser power behaviour while moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaserMode {
    /// M3: power held constant regardless of motion
    Constant,
    /// M4: power scaled with actual speed, off while stationary
    #[default]
    Dynamic,
}

impl fmt::Display for LaserMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant => write!(f, "constant"),
            Self::Dynamic => write!(f, "dynamic"),
        }
    }
}

impl FromStr for LaserMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "constant" => Ok(Self::Constant),
            "dynamic" => Ok(Self::Dynamic),
            _ => Err(format!("Unknown laser mode: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_parse() {
        assert_eq!("mm".parse::<Unit>().unwrap(), Unit::Mm);
        assert_eq!("IN".parse::<Unit>().unwrap(), Unit::Inch);
        assert!("furlong".parse::<Unit>().is_err());
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Unit::default(), Unit::Mm);
        assert_eq!(DistanceMode::default(), DistanceMode::Absolute);
        assert_eq!(LaserMode::default(), LaserMode::Dynamic);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&LaserMode::Constant).unwrap();
        assert_eq!(json, "\"constant\"");
        let mode: DistanceMode = serde_json::from_str("\"incremental\"").unwrap();
        assert_eq!(mode, DistanceMode::Incremental);
    }
}
