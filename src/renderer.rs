//! # Clock Tile View Model and Terminal Rendering
//!
//! [`ClockView`] is everything a rendering layer needs for one frame: the four
//! visible digit faces with their flipping flags, the AM/PM label, the weather
//! presentation and the forecast strip. Markup and styling stay with the host.
//!
//! [`render_ascii`] is the development-mode renderer used by `--stdout`, so the
//! tile can be checked in a terminal without a dashboard.

use crate::condition::Presentation;
use crate::config::Theme;
use crate::{DigitKey, Meridiem};
use serde::Serialize;

/// One digit cell as it should appear right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DigitFace {
    pub key: DigitKey,
    /// Character currently on the face (old value until the mid-flip swap)
    pub face: char,
    /// Whether the cell is in its "flipping" visual state
    pub flipping: bool,
}

/// One forecast-strip entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ForecastTile {
    pub day: String,
    pub icon: &'static str,
    pub temperature: String,
}

/// Render-ready snapshot of the whole tile.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClockView {
    pub digits: [DigitFace; 4],
    /// Present only in 12-hour mode
    pub meridiem: Option<Meridiem>,
    pub is_night: bool,
    pub presentation: Presentation,
    pub temperature: String,
    pub condition: String,
    pub forecast: Vec<ForecastTile>,
    pub location_name: String,
    pub theme: Theme,
    pub version: String,
}

impl ClockView {
    pub fn digit(&self, key: DigitKey) -> &DigitFace {
        &self.digits[key.index()]
    }

    /// Faces as `HH:MM`.
    pub fn time_text(&self) -> String {
        let [a, b, c, d] = self.digits.map(|f| f.face);
        format!("{a}{b}:{c}{d}")
    }
}

fn cell(digit: &DigitFace) -> String {
    if digit.flipping {
        format!("{{{}}}", digit.face)
    } else {
        format!("[{}]", digit.face)
    }
}

/// Render the view as plain text. Flipping cells are drawn with braces.
///
/// ```text
/// Weather · default
///  [1][0] : [1][5]        🌧️ 12°
///  Rainy  (rain-icon, weather-rain)
///  Thu ☀️ 24° | Fri 🌧️ 12°
///  FlippyWeather v3.0.0
/// ```
pub fn render_ascii(view: &ClockView) -> String {
    let mut lines = Vec::with_capacity(5);

    lines.push(format!("{} · {}", view.location_name, view.theme.name()));

    let meridiem = view.meridiem.map(|m| m.label()).unwrap_or("  ");
    lines.push(format!(
        " {}{} : {}{} {}     {} {}",
        cell(&view.digits[0]),
        cell(&view.digits[1]),
        cell(&view.digits[2]),
        cell(&view.digits[3]),
        meridiem,
        view.presentation.icon,
        view.temperature
    ));

    let class = if view.presentation.animation_class.is_empty() {
        "static".to_string()
    } else {
        view.presentation.animation_class.clone()
    };
    lines.push(format!(
        " {}  ({}, {})",
        view.condition, view.presentation.icon_shape, class
    ));

    if !view.forecast.is_empty() {
        let strip: Vec<String> = view
            .forecast
            .iter()
            .map(|tile| format!("{} {} {}", tile.day, tile.icon, tile.temperature))
            .collect();
        lines.push(format!(" {}", strip.join(" | ")));
    }

    lines.push(format!(" {}", view.version));
    lines.join("\n")
}

/// Print the view to stdout.
pub fn draw_ascii(view: &ClockView) {
    println!("{}\n", render_ascii(view));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::present_condition;

    fn test_view() -> ClockView {
        let faces = ['1', '0', '1', '5'];
        let digits = DigitKey::ALL.map(|key| DigitFace {
            key,
            face: faces[key.index()],
            flipping: key == DigitKey::MinuteOnes,
        });
        ClockView {
            digits,
            meridiem: Some(Meridiem::Pm),
            is_night: false,
            presentation: present_condition(Some("rainy"), false),
            temperature: "12°".to_string(),
            condition: "rainy".to_string(),
            forecast: vec![
                ForecastTile {
                    day: "Thu".to_string(),
                    icon: "☀️",
                    temperature: "24°".to_string(),
                },
                ForecastTile {
                    day: "Fri".to_string(),
                    icon: "🌧️",
                    temperature: "12°".to_string(),
                },
            ],
            location_name: "Weather".to_string(),
            theme: Theme::Default,
            version: "FlippyWeather v3.0.0".to_string(),
        }
    }

    #[test]
    fn test_time_text() {
        assert_eq!(test_view().time_text(), "10:15");
    }

    #[test]
    fn test_render_ascii_contents() {
        let text = render_ascii(&test_view());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Weather · default");
        assert!(lines[1].contains("[1][0] : [1]{5} PM"));
        assert!(lines[1].ends_with("🌧️ 12°"));
        assert_eq!(lines[2], " rainy  (rain-icon, weather-rain)");
        assert_eq!(lines[3], " Thu ☀️ 24° | Fri 🌧️ 12°");
        assert_eq!(lines[4], " FlippyWeather v3.0.0");
    }

    #[test]
    fn test_render_ascii_without_forecast_or_animation() {
        let mut view = test_view();
        view.forecast.clear();
        view.meridiem = None;
        view.presentation.animation_class.clear();
        let text = render_ascii(&view);
        assert_eq!(text.lines().count(), 4);
        assert!(text.contains("(rain-icon, static)"));
    }
}
