//! # Configuration Management
//!
//! This module handles loading and saving the tile configuration from a
//! `flippy-config.toml` file. Every field is optional: whatever the user sets is
//! merged over the documented defaults, and a missing or broken file falls back
//! to the defaults entirely.
//!
//! ```toml
//! location_name = "Kitchen"
//! use_12_hour = true
//! theme = "ocean"
//! weather_entity = "weather.home"
//! temperature_unit = "fahrenheit"
//! ```

use crate::weather::TemperatureUnit;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Default config file name, relative to the working directory.
pub const CONFIG_FILE: &str = "flippy-config.toml";

/// Errors writing the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("config serialize: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Color theme for the tile background.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Theme {
    #[default]
    Default,
    Dark,
    Light,
    Sunset,
    Ocean,
}

impl Theme {
    pub fn name(self) -> &'static str {
        match self {
            Theme::Default => "default",
            Theme::Dark => "dark",
            Theme::Light => "light",
            Theme::Sunset => "sunset",
            Theme::Ocean => "ocean",
        }
    }
}

impl From<String> for Theme {
    /// Unknown theme names fall back to the default theme.
    fn from(name: String) -> Self {
        match name.trim().to_lowercase().as_str() {
            "dark" => Theme::Dark,
            "light" => Theme::Light,
            "sunset" => Theme::Sunset,
            "ocean" => Theme::Ocean,
            _ => Theme::Default,
        }
    }
}

impl From<Theme> for String {
    fn from(theme: Theme) -> Self {
        theme.name().to_string()
    }
}

/// Tile configuration. Fields are independent toggles with their own defaults.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Label shown with the weather readout
    pub location_name: String,
    /// 12-hour clock with AM/PM indicator instead of 24-hour
    pub use_12_hour: bool,
    /// Condition-driven background animation
    pub animated_background: bool,
    pub theme: Theme,
    /// Host weather entity id, e.g. `weather.home`
    pub weather_entity: Option<String>,
    /// Scale temperatures are displayed in
    pub temperature_unit: TemperatureUnit,
    /// Redraw period
    pub tick_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            location_name: "Weather".to_string(),
            use_12_hour: false,
            animated_background: true,
            theme: Theme::Default,
            weather_entity: None,
            temperature_unit: TemperatureUnit::Celsius,
            tick_interval_ms: 1000,
        }
    }
}

impl Config {
    /// Example configuration offered to a new dashboard tile.
    pub fn stub() -> Self {
        Config {
            location_name: "Home Assistant Location".to_string(),
            weather_entity: Some("weather.home".to_string()),
            ..Self::default()
        }
    }

    /// Load configuration from flippy-config.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml(&contents) {
                Ok(config) => {
                    info!(path = %path.display(), location = %config.location_name, "loaded configuration");
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "invalid config file, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                info!(path = %path.display(), "no config file found, using defaults");
                Self::default()
            }
        }
    }

    /// Parse a TOML document, merging it over the defaults.
    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Save current configuration to flippy-config.toml
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to_path(CONFIG_FILE)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path.as_ref(), contents)?;
        info!(path = %path.as_ref().display(), "configuration saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.location_name, "Weather");
        assert!(!config.use_12_hour);
        assert!(config.animated_background);
        assert_eq!(config.theme, Theme::Default);
        assert_eq!(config.weather_entity, None);
        assert_eq!(config.temperature_unit, TemperatureUnit::Celsius);
        assert_eq!(config.tick_interval_ms, 1000);
    }

    #[test]
    fn test_partial_config_merges_over_defaults() {
        let config = Config::from_toml(
            r#"
            use_12_hour = true
            theme = "Ocean"
            weather_entity = "weather.home"
            "#,
        )
        .unwrap();
        assert!(config.use_12_hour);
        assert_eq!(config.theme, Theme::Ocean);
        assert_eq!(config.weather_entity.as_deref(), Some("weather.home"));
        assert_eq!(config.location_name, "Weather");
        assert!(config.animated_background);
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        let config = Config::from_toml(r#"theme = "neon""#).unwrap();
        assert_eq!(config.theme, Theme::Default);
    }

    #[test]
    fn test_config_roundtrip() {
        let temp_file = NamedTempFile::new().unwrap();
        let mut config = Config::stub();
        config.temperature_unit = TemperatureUnit::Fahrenheit;
        config.theme = Theme::Sunset;
        config.save_to_path(temp_file.path()).unwrap();

        let loaded = Config::load_from_path(temp_file.path());
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let config = Config::load_from_path("/nonexistent/path");
        // Should fallback to default
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_invalid_file() {
        let temp_file = NamedTempFile::new().unwrap();
        fs::write(temp_file.path(), "use_12_hour = \"maybe\"").unwrap();
        assert_eq!(Config::load_from_path(temp_file.path()), Config::default());
    }
}
