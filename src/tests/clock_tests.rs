//! # End-to-End Clock Tile Tests
//!
//! These tests drive the library the way the binary does: ticks from a time
//! source, flips against a virtual clock, weather from a snapshot file. They
//! run quickly and never sleep.

use std::fs;
use std::time::{Duration, Instant};
use tempfile::NamedTempFile;

use flippy_clock_lib::clock::VirtualClock;
use flippy_clock_lib::condition::{present_condition, Category};
use flippy_clock_lib::config::{Config, Theme};
use flippy_clock_lib::digits::TimeDigitTracker;
use flippy_clock_lib::flip::{FlipPhase, FLIP_DURATION};
use flippy_clock_lib::renderer::render_ascii;
use flippy_clock_lib::weather::{resolve_weather, JsonFileSource};
use flippy_clock_lib::widget::FlippyClock;
use flippy_clock_lib::{DigitKey, DisplayTime};

/// Walk a whole day minute by minute and check every event against the digits.
///
/// Each event must correspond to a position that really differs, and every
/// differing position must produce exactly one event.
#[test]
fn full_day_events_match_digit_differences() {
    for use_12_hour in [false, true] {
        let mut tracker = TimeDigitTracker::new(use_12_hour);
        let mut previous: Option<DisplayTime> = None;
        for minute_of_day in 0..(24 * 60) {
            let (hour, minute) = (minute_of_day / 60, minute_of_day % 60);
            let (time, events) = tracker.sample(hour, minute).unwrap();

            match previous {
                None => assert!(events.is_empty(), "first sample must not emit events"),
                Some(prev) => {
                    let expected: Vec<DigitKey> = DigitKey::ALL
                        .into_iter()
                        .filter(|&k| time.get(k) != prev.get(k))
                        .collect();
                    let actual: Vec<DigitKey> = events.iter().map(|e| e.key).collect();
                    assert_eq!(actual, expected, "mismatch at {:02}:{:02}", hour, minute);
                }
            }
            previous = Some(time);
        }
    }
}

/// Midnight in 12-hour mode rolls 11:59 over to 12:00.
///
/// The hour tens digit reads `1` on both sides, so it must not flip.
#[test]
fn midnight_rollover_in_12_hour_mode() {
    let mut tracker = TimeDigitTracker::new(true);
    tracker.sample(23, 59).unwrap();
    let (time, events) = tracker.sample(0, 0).unwrap();
    assert_eq!(time.to_string(), "12:00");
    let keys: Vec<DigitKey> = events.iter().map(|e| e.key).collect();
    assert_eq!(
        keys,
        vec![DigitKey::HourOnes, DigitKey::MinuteTens, DigitKey::MinuteOnes]
    );
}

/// A second change for a digit that is still flipping is dropped.
///
/// Uses a fast tick so two changes land inside one flip window.
#[test]
fn change_during_flip_is_dropped_by_widget() {
    let time = VirtualClock::new();
    let mut widget = FlippyClock::new(Config::default(), time.clone());
    widget.start();

    widget.tick(7, 10).unwrap();
    let first = widget.tick(7, 11).unwrap().unwrap();
    assert_eq!(first.started, vec![DigitKey::MinuteOnes]);

    time.advance(Duration::from_millis(100));
    let second = widget.tick(7, 12).unwrap().unwrap();
    assert_eq!(second.changes.len(), 1, "the change is still reported");
    assert!(second.started.is_empty(), "but no second flip starts");

    time.advance(Duration::from_millis(50));
    assert_eq!(
        widget.pump(),
        vec![FlipPhase::FaceSwapped {
            key: DigitKey::MinuteOnes,
            value: '1'
        }]
    );

    time.advance(FLIP_DURATION);
    assert_eq!(
        widget.pump(),
        vec![FlipPhase::Finished {
            key: DigitKey::MinuteOnes
        }]
    );

    // Once idle the face follows the latest digits again
    assert_eq!(widget.view().unwrap().time_text(), "07:12");
}

/// Weather file → resolved snapshot → rendered tile.
#[test]
fn weather_file_renders_into_tile() {
    let temp_file = NamedTempFile::new().expect("Should create temp file");
    fs::write(
        temp_file.path(),
        r#"{
            "weather.home": {
                "temperature": 3.2,
                "condition": "Heavy Snow",
                "forecast": [
                    { "datetime": "2025-01-06T09:00:00+01:00", "temperature": 1, "condition": "partlycloudy" },
                    { "datetime": "2025-01-07T09:00:00+01:00", "templow": -4, "condition": "snowy" }
                ]
            }
        }"#,
    )
    .expect("Should write weather file");

    let source =
        JsonFileSource::load_from_path(temp_file.path()).expect("Should parse weather file");
    let config = Config {
        weather_entity: Some("weather.home".to_string()),
        theme: Theme::Dark,
        ..Config::default()
    };
    let snapshot = resolve_weather(&source, config.weather_entity.as_deref());

    let mut widget = FlippyClock::new(config, VirtualClock::new());
    widget.start();
    widget.update_weather(snapshot);
    widget.tick(14, 30).unwrap();

    let view = widget.view().expect("Should have a view after a tick");
    assert_eq!(view.presentation.category, Category::Snow);
    assert_eq!(view.presentation.animation_class, "weather-snow");
    assert_eq!(view.temperature, "3°");
    assert_eq!(view.forecast.len(), 2);
    assert_eq!(view.forecast[0].day, "Mon");
    assert_eq!(view.forecast[0].icon, "⛅");
    assert_eq!(view.forecast[1].temperature, "-4°");

    let text = render_ascii(&view);
    assert!(text.starts_with("Weather · dark"));
    assert!(text.contains("[1][4] : [3][0]"));
    assert!(text.contains("Heavy Snow"));
}

/// Missing entity degrades to the "not found" sentinel instead of failing.
#[test]
fn missing_entity_degrades_gracefully() {
    let source = JsonFileSource::default();
    let snapshot = resolve_weather(&source, Some("weather.unknown"));

    let mut widget = FlippyClock::new(Config::default(), VirtualClock::new());
    widget.start();
    widget.update_weather(snapshot);
    widget.tick(2, 0).unwrap();

    let view = widget.view().unwrap();
    assert_eq!(view.condition, "Entity not found");
    assert_eq!(view.temperature, "--°");
    assert_eq!(
        view.presentation,
        present_condition(Some("Entity not found"), true)
    );
    assert_eq!(view.presentation.icon, "🌙");
}

#[cfg(test)]
mod performance_tests {
    use super::*;

    /// A day's worth of ticks is far cheaper than the tick period.
    #[test]
    fn ticks_are_cheap() {
        let mut widget = FlippyClock::new(Config::default(), VirtualClock::new());
        widget.start();

        let start = Instant::now();
        for minute_of_day in 0..(24 * 60) {
            widget.tick(minute_of_day / 60, minute_of_day % 60).unwrap();
            widget.pump();
        }
        let duration = start.elapsed();

        assert!(
            duration.as_millis() < 500,
            "1440 ticks took too long: {:?}",
            duration
        );
    }
}
