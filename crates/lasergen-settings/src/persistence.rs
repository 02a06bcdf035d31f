//! Loading and saving settings files.
//!
//! The format follows the file extension: `.toml` or `.json`.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Result, SettingsError};
use crate::settings::LaserSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Json,
}

fn format_of(path: &Path) -> Result<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Format::Toml),
        Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Format::Json),
        _ => Err(SettingsError::UnsupportedFormat(format!(
            "{} (settings file must be .toml or .json)",
            path.display()
        ))),
    }
}

/// Default settings location: `<config dir>/lasergen/settings.toml`.
pub fn default_settings_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join("lasergen").join("settings.toml"))
        .ok_or_else(|| SettingsError::ConfigDirectory("no configuration directory on this platform".to_string()))
}

/// Load and validate settings.
pub fn load_from_file(path: &Path) -> Result<LaserSettings> {
    let format = format_of(path)?;
    let content = std::fs::read_to_string(path)?;

    let settings: LaserSettings = match format {
        Format::Toml => toml::from_str(&content)?,
        Format::Json => serde_json::from_str(&content)?,
    };

    settings.validate()?;
    info!("Loaded settings from {}", path.display());
    Ok(settings)
}

/// Validate and save settings, creating parent directories as needed.
pub fn save_to_file(settings: &LaserSettings, path: &Path) -> Result<()> {
    settings.validate()?;

    let content = match format_of(path)? {
        Format::Toml => toml::to_string_pretty(settings)?,
        Format::Json => serde_json::to_string_pretty(settings)?,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    debug!("Saved settings to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_by_extension() {
        assert_eq!(format_of(Path::new("a.toml")).unwrap(), Format::Toml);
        assert_eq!(format_of(Path::new("a.JSON")).unwrap(), Format::Json);
        assert!(matches!(
            format_of(Path::new("a.yaml")),
            Err(SettingsError::UnsupportedFormat(_))
        ));
        assert!(format_of(Path::new("settings")).is_err());
    }
}
