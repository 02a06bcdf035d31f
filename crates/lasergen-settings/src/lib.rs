//! # Lasergen Settings
//!
//! Machine parameters, tool parameters and output configuration consumed by
//! the G-code compiler. Settings are plain serde structs with per-field
//! defaults, validated before use and persisted as TOML or JSON.

pub mod error;
pub mod persistence;
pub mod settings;

pub use error::{Result, SettingsError};
pub use persistence::{default_settings_path, load_from_file, save_to_file};
pub use settings::LaserSettings;
