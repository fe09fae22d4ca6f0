//! # Weather Snapshots
//!
//! The tile never fetches weather itself. The host hands over a
//! [`WeatherSnapshot`] for the configured entity, at whatever cadence it
//! refreshes its own state, and the core only reads the condition label, the
//! temperature and the first few forecast entries.
//!
//! ## Missing Data
//! Nothing here is an error for the tile. Each gap degrades to a sentinel:
//! - **No entity configured**: condition `Unknown`, temperature `--`
//! - **Entity not found**: condition `Entity not found`, temperature `--`
//! - **No temperature**: [`Temperature::Unknown`], rendered as `--`
//!
//! ## Snapshot Files
//! [`JsonFileSource`] loads a JSON object keyed by entity id, which is what the
//! binary uses for `--weather`:
//! ```json
//! { "weather.home": { "temperature": 21.4, "condition": "partlycloudy",
//!                     "forecast": [ { "datetime": "2025-07-24T12:00:00+00:00",
//!                                     "temperature": 24, "condition": "sunny" } ] } }
//! ```

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::{fs, io};
use thiserror::Error;
use tracing::warn;

/// How many forecast entries the strip shows.
pub const FORECAST_LIMIT: usize = 4;

/// Condition label used when no weather entity is configured.
pub const UNKNOWN_CONDITION: &str = "Unknown";

/// Condition label used when the configured entity does not exist.
pub const NOT_FOUND_CONDITION: &str = "Entity not found";

/// Errors loading snapshot files.
#[derive(Error, Debug)]
pub enum WeatherError {
    /// Snapshot file could not be read
    #[error("weather file IO: {0}")]
    Io(#[from] io::Error),

    /// Snapshot file is not valid JSON for a snapshot map
    #[error("weather file parse: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Temperature scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    /// Convert `value` expressed in `self` into `target`.
    pub fn convert(self, value: f64, target: TemperatureUnit) -> f64 {
        match (self, target) {
            (TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit) => value * 9.0 / 5.0 + 32.0,
            (TemperatureUnit::Fahrenheit, TemperatureUnit::Celsius) => (value - 32.0) * 5.0 / 9.0,
            _ => value,
        }
    }
}

/// A temperature reading, or the `--` sentinel.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum Temperature {
    Known(f64),
    #[default]
    Unknown,
}

impl From<Option<f64>> for Temperature {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(v) if v.is_finite() => Temperature::Known(v),
            _ => Temperature::Unknown,
        }
    }
}

impl From<Temperature> for Option<f64> {
    fn from(value: Temperature) -> Self {
        match value {
            Temperature::Known(v) => Some(v),
            Temperature::Unknown => None,
        }
    }
}

impl Temperature {
    /// Whole-degree label with a degree sign, converted from `source` to `target`.
    ///
    /// Halves round up (`21.5` → `22`, `-2.5` → `-2`).
    pub fn label(self, source: TemperatureUnit, target: TemperatureUnit) -> String {
        match self {
            Temperature::Known(v) => {
                let rounded = (source.convert(v, target) + 0.5).floor();
                format!("{}°", rounded as i64)
            }
            Temperature::Unknown => "--°".to_string(),
        }
    }
}

/// One forecast period.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct ForecastEntry {
    #[serde(default)]
    pub datetime: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub templow: Option<f64>,
    #[serde(default)]
    pub condition: Option<String>,
}

impl ForecastEntry {
    /// High temperature, falling back to the low.
    pub fn display_temperature(&self) -> Temperature {
        Temperature::from(self.temperature.or(self.templow))
    }

    /// Short weekday name (`Mon`), or `N/A` without a timestamp.
    pub fn day_label(&self) -> String {
        self.datetime
            .map(|dt| dt.format("%a").to_string())
            .unwrap_or_else(|| "N/A".to_string())
    }
}

/// Current weather for one entity, as supplied by the host.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    #[serde(default)]
    pub temperature: Temperature,
    /// Scale of every temperature in this snapshot
    #[serde(default)]
    pub unit: TemperatureUnit,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub forecast: Vec<ForecastEntry>,
}

impl WeatherSnapshot {
    /// Sentinel for "no weather entity configured".
    pub fn unknown() -> Self {
        WeatherSnapshot {
            condition: Some(UNKNOWN_CONDITION.to_string()),
            ..Default::default()
        }
    }

    /// Sentinel for "configured entity does not exist".
    pub fn not_found() -> Self {
        WeatherSnapshot {
            condition: Some(NOT_FOUND_CONDITION.to_string()),
            ..Default::default()
        }
    }

    /// Condition text for display.
    pub fn condition_text(&self) -> &str {
        self.condition
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(UNKNOWN_CONDITION)
    }

    /// The forecast entries the strip shows.
    pub fn visible_forecast(&self) -> &[ForecastEntry] {
        &self.forecast[..self.forecast.len().min(FORECAST_LIMIT)]
    }
}

/// Host-side weather lookup by entity id.
pub trait WeatherSource {
    fn lookup(&self, entity_id: &str) -> Option<WeatherSnapshot>;
}

impl WeatherSource for HashMap<String, WeatherSnapshot> {
    fn lookup(&self, entity_id: &str) -> Option<WeatherSnapshot> {
        self.get(entity_id).cloned()
    }
}

/// Snapshot for the configured entity, degrading to sentinels when missing.
pub fn resolve_weather<S: WeatherSource + ?Sized>(
    source: &S,
    entity_id: Option<&str>,
) -> WeatherSnapshot {
    let Some(entity_id) = entity_id.filter(|id| !id.is_empty()) else {
        return WeatherSnapshot::unknown();
    };
    match source.lookup(entity_id) {
        Some(snapshot) => snapshot,
        None => {
            warn!(entity_id, "weather entity not found");
            WeatherSnapshot::not_found()
        }
    }
}

/// Snapshots loaded from a JSON file keyed by entity id.
#[derive(Debug, Default, Clone)]
pub struct JsonFileSource {
    entities: HashMap<String, WeatherSnapshot>,
}

impl JsonFileSource {
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, WeatherError> {
        let data = fs::read(path)?;
        Self::from_slice(&data)
    }

    pub fn from_slice(data: &[u8]) -> Result<Self, WeatherError> {
        let entities = serde_json::from_slice(data)?;
        Ok(JsonFileSource { entities })
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl WeatherSource for JsonFileSource {
    fn lookup(&self, entity_id: &str) -> Option<WeatherSnapshot> {
        self.entities.lookup(entity_id)
    }
}
