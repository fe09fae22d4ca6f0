//! # Weather Condition Presentation
//!
//! Maps a free-text condition label (whatever the host's weather source reports,
//! e.g. `"rainy"`, `"partlycloudy"`, `"Light Drizzle"`) to the glyph, background
//! animation class and icon shape the tile draws.
//!
//! ## Matching
//! The label is lower-cased and tested for substrings in a fixed priority order,
//! most severe first. First match wins, so `"partly cloudy and windy"` is cloudy:
//!
//! | Priority | Category | Substrings |
//! |----------|----------|------------|
//! | 1 | storm  | `lightning`, `thunder`, `storm` |
//! | 2 | snow   | `snow`, `blizzard` |
//! | 3 | rain   | `rain`, `drizzle`, `pouring` |
//! | 4 | fog    | `fog`, `mist` |
//! | 5 | cloudy | `cloudy`, `overcast` |
//! | 6 | windy  | `wind` |
//! | 7 | sunny  | `sunny`, `clear` |
//!
//! Anything else, including an absent or empty label, is the default category.
//!
//! ## Day and Night
//! Sunny becomes a moon by night and the default category swaps its glyph too.
//! Every other category keeps its glyph and gains a `-night` class suffix.

use serde::Serialize;

/// First hour (inclusive) of the night window.
pub const NIGHT_START_HOUR: u32 = 20;

/// First hour (inclusive) after the night window.
pub const NIGHT_END_HOUR: u32 = 6;

/// True for local hours in `[20:00, 06:00)`.
pub fn is_night(hour: u32) -> bool {
    hour >= NIGHT_START_HOUR || hour < NIGHT_END_HOUR
}

/// Condition category in matching priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Storm,
    Snow,
    Rain,
    Fog,
    Cloudy,
    Windy,
    Sunny,
    Default,
}

/// Substring table, checked top to bottom.
const PRIORITY: [(Category, &[&str]); 7] = [
    (Category::Storm, &["lightning", "thunder", "storm"]),
    (Category::Snow, &["snow", "blizzard"]),
    (Category::Rain, &["rain", "drizzle", "pouring"]),
    (Category::Fog, &["fog", "mist"]),
    (Category::Cloudy, &["cloudy", "overcast"]),
    (Category::Windy, &["wind"]),
    (Category::Sunny, &["sunny", "clear"]),
];

const MOON: &str = "🌙";

impl Category {
    /// Classify a condition label. Case-insensitive, never fails.
    pub fn classify(condition: Option<&str>) -> Category {
        let Some(condition) = condition.map(str::trim).filter(|c| !c.is_empty()) else {
            return Category::Default;
        };
        let lower = condition.to_lowercase();
        PRIORITY
            .iter()
            .find(|(_, needles)| needles.iter().any(|n| lower.contains(n)))
            .map(|(category, _)| *category)
            .unwrap_or(Category::Default)
    }

    /// Daytime glyph for the category.
    pub fn day_icon(self) -> &'static str {
        match self {
            Category::Storm => "⛈️",
            Category::Snow => "❄️",
            Category::Rain => "🌧️",
            Category::Fog => "🌫️",
            Category::Cloudy => "☁️",
            Category::Windy => "💨",
            Category::Sunny => "☀️",
            Category::Default => "🌤️",
        }
    }

    fn tag(self) -> &'static str {
        match self {
            Category::Storm => "storm",
            Category::Snow => "snow",
            Category::Rain => "rain",
            Category::Fog => "fog",
            Category::Cloudy => "cloudy",
            Category::Windy => "windy",
            Category::Sunny => "sunny",
            Category::Default => "default",
        }
    }

    fn shape(self) -> &'static str {
        match self {
            Category::Storm => "storm-icon",
            Category::Snow => "snow-icon",
            Category::Rain => "rain-icon",
            Category::Fog => "fog-icon",
            Category::Cloudy => "cloud-icon",
            Category::Windy => "wind-icon",
            Category::Sunny => "sun-icon",
            Category::Default => "default-icon",
        }
    }
}

/// What to draw for a condition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Presentation {
    pub category: Category,
    pub icon: &'static str,
    pub animation_class: String,
    pub icon_shape: &'static str,
}

/// Pure mapping from `(condition, is_night)` to a [`Presentation`].
///
/// # Example
/// ```
/// use flippy_clock_lib::condition::{present_condition, Category};
///
/// let p = present_condition(Some("RAINY"), false);
/// assert_eq!(p.category, Category::Rain);
/// assert_eq!(p.animation_class, "weather-rain");
///
/// let p = present_condition(None, true);
/// assert_eq!(p.icon, "🌙");
/// ```
pub fn present_condition(condition: Option<&str>, is_night: bool) -> Presentation {
    let category = Category::classify(condition);

    let (icon, animation_class, icon_shape) = match (category, is_night) {
        (Category::Sunny, true) => (MOON, "weather-clear-night".to_string(), "moon-icon"),
        (Category::Default, true) => (MOON, "weather-default-night".to_string(), "moon-icon"),
        (category, true) => (
            category.day_icon(),
            format!("weather-{}-night", category.tag()),
            category.shape(),
        ),
        (category, false) => (
            category.day_icon(),
            format!("weather-{}", category.tag()),
            category.shape(),
        ),
    };

    Presentation {
        category,
        icon,
        animation_class,
        icon_shape,
    }
}

/// Glyph for a forecast-strip entry.
///
/// Not night-modulated, and partly-cloudy labels get their own glyph.
pub fn forecast_icon(condition: Option<&str>) -> &'static str {
    let is_partly = condition.map(str::to_lowercase).is_some_and(|c| {
        ["partlycloudy", "partly-cloudy", "partly cloudy"]
            .iter()
            .any(|p| c.contains(p))
    });

    match Category::classify(condition) {
        Category::Cloudy if is_partly => "⛅",
        category => category.day_icon(),
    }
}

/// Memoizing presenter that also honours the `animated_background` toggle.
///
/// Results are cached against the last `(condition, is_night)` pair; the cache
/// only saves work, the output is identical either way.
#[derive(Debug, Clone)]
pub struct ConditionPresenter {
    animated_background: bool,
    last: Option<(Option<String>, bool, Presentation)>,
}

impl ConditionPresenter {
    pub fn new(animated_background: bool) -> Self {
        ConditionPresenter {
            animated_background,
            last: None,
        }
    }

    pub fn set_animated_background(&mut self, enabled: bool) {
        if self.animated_background != enabled {
            self.animated_background = enabled;
            self.last = None;
        }
    }

    /// Presentation for the condition. With animated backgrounds off the
    /// animation class is empty.
    pub fn present(&mut self, condition: Option<&str>, is_night: bool) -> Presentation {
        if let Some((cached_condition, cached_night, cached)) = &self.last {
            if cached_condition.as_deref() == condition && *cached_night == is_night {
                return cached.clone();
            }
        }

        let mut presentation = present_condition(condition, is_night);
        if !self.animated_background {
            presentation.animation_class.clear();
        }

        self.last = Some((
            condition.map(str::to_string),
            is_night,
            presentation.clone(),
        ));
        presentation
    }
}
