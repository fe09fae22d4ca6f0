//! # FlippyWeather Clock Core Library
//!
//! This library provides the display logic behind a flip-digit clock tile with a
//! weather readout. It owns no markup and no styling: the host supplies a periodic
//! tick, a configuration record and weather snapshots, and the library hands back
//! a render-ready view model plus the animation phases to apply.
//!
//! ## Design Philosophy
//!
//! ### Pure Where Possible
//! - **Condition mapping** is a total, deterministic function of the condition text
//!   and a day/night flag ([`condition::present_condition`])
//! - **Digit tracking** keeps exactly one piece of state: the previously shown digits
//!   ([`digits::TimeDigitTracker`])
//!
//! ### Injectable Time
//! The flip animation is the only part with state spanning several host callbacks.
//! Its delays are measured against a [`clock::Clock`], so tests drive it with a
//! [`clock::VirtualClock`] instead of sleeping.
//!
//! ### Data Flow
//! 1. **Tick** (nominally 1 Hz): sample wall-clock hour/minute → digit change events
//! 2. **Flip**: each change event starts a per-digit flip unless one is in flight
//! 3. **Weather**: a new snapshot is mapped to icon, animation class and shape tag
//! 4. **View**: everything is folded into a [`renderer::ClockView`]
//!
//! ## Core Types
//! - [`DigitKey`]: one of the four clock digit positions
//! - [`DisplayTime`]: the four characters currently on the clock face
//! - [`DigitChangeEvent`]: a single digit position changing value between samples

use serde::{Deserialize, Serialize};

// Module declarations
pub mod clock;
pub mod condition;
pub mod config;
pub mod digits;
pub mod flip;
pub mod renderer;
pub mod weather;
pub mod widget;

/// Version banner shown in the tile footer.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// One of the four clock-digit positions, left to right.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DigitKey {
    HourTens,
    HourOnes,
    MinuteTens,
    MinuteOnes,
}

impl DigitKey {
    /// All keys in display order.
    pub const ALL: [DigitKey; 4] = [
        DigitKey::HourTens,
        DigitKey::HourOnes,
        DigitKey::MinuteTens,
        DigitKey::MinuteOnes,
    ];

    /// Position of the key on the clock face (0 = leftmost).
    pub fn index(self) -> usize {
        match self {
            DigitKey::HourTens => 0,
            DigitKey::HourOnes => 1,
            DigitKey::MinuteTens => 2,
            DigitKey::MinuteOnes => 3,
        }
    }
}

/// The four single-character digits shown on the clock face.
///
/// Every field holds exactly one ASCII decimal digit. Hour digits already
/// reflect 12-hour wraparound when that mode is active, so midnight in
/// 12-hour mode is `1`,`2`.
///
/// # Example
/// ```
/// use flippy_clock_lib::{DigitKey, DisplayTime};
///
/// let time = DisplayTime::from_parts(9, 5);
/// assert_eq!(time.to_string(), "09:05");
/// assert_eq!(time.get(DigitKey::MinuteOnes), '5');
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayTime {
    pub hour_tens: char,
    pub hour_ones: char,
    pub minute_tens: char,
    pub minute_ones: char,
}

impl DisplayTime {
    /// Build from an already converted display hour (0-99) and a minute (0-59).
    ///
    /// Both values are zero-padded to two digits.
    pub fn from_parts(display_hour: u32, minute: u32) -> Self {
        let hour = format!("{:02}", display_hour % 100);
        let minute = format!("{:02}", minute % 100);
        let mut h = hour.chars();
        let mut m = minute.chars();
        DisplayTime {
            hour_tens: h.next().unwrap_or('0'),
            hour_ones: h.next().unwrap_or('0'),
            minute_tens: m.next().unwrap_or('0'),
            minute_ones: m.next().unwrap_or('0'),
        }
    }

    /// Digit at the given position.
    pub fn get(&self, key: DigitKey) -> char {
        match key {
            DigitKey::HourTens => self.hour_tens,
            DigitKey::HourOnes => self.hour_ones,
            DigitKey::MinuteTens => self.minute_tens,
            DigitKey::MinuteOnes => self.minute_ones,
        }
    }

    /// Digits in display order.
    pub fn digits(&self) -> [char; 4] {
        [
            self.hour_tens,
            self.hour_ones,
            self.minute_tens,
            self.minute_ones,
        ]
    }
}

impl std::fmt::Display for DisplayTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}:{}{}",
            self.hour_tens, self.hour_ones, self.minute_tens, self.minute_ones
        )
    }
}

/// A digit position whose value differs from the previous sample.
///
/// Never produced on the first sample, since there is nothing to compare against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigitChangeEvent {
    pub key: DigitKey,
    pub old_value: char,
    pub new_value: char,
}

/// AM/PM indicator for 12-hour display. Derived from the 24-hour value,
/// separately from [`DisplayTime`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Meridiem {
    Am,
    Pm,
}

impl Meridiem {
    pub fn label(self) -> &'static str {
        match self {
            Meridiem::Am => "AM",
            Meridiem::Pm => "PM",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts_zero_pads() {
        let t = DisplayTime::from_parts(7, 3);
        assert_eq!(t.digits(), ['0', '7', '0', '3']);
        assert_eq!(t.to_string(), "07:03");
    }

    #[test]
    fn test_key_order_matches_digits() {
        let t = DisplayTime::from_parts(12, 34);
        let by_key: Vec<char> = DigitKey::ALL.iter().map(|k| t.get(*k)).collect();
        assert_eq!(by_key, t.digits().to_vec());
        for (i, key) in DigitKey::ALL.iter().enumerate() {
            assert_eq!(key.index(), i);
        }
    }
}
