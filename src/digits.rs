//! # Clock Digit Tracking
//!
//! Converts wall-clock hour/minute into the four digits on the clock face and
//! reports which positions changed since the previous sample. The host calls
//! [`TimeDigitTracker::sample`] once per tick and starts a flip animation for
//! every [`DigitChangeEvent`] it gets back.
//!
//! ## Hour Formats
//! - **24-hour**: hour zero-padded as-is (`00`..`23`)
//! - **12-hour**: `hour mod 12`, with 0 shown as `12` (midnight and noon both read `12`)
//!
//! Minutes are always zero-padded and unaffected by the hour format.

use crate::{DigitChangeEvent, DigitKey, DisplayTime, Meridiem};
use chrono::Timelike;
use thiserror::Error;

/// Errors raised by digit tracking.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigitError {
    /// Hour outside 0-23 or minute outside 0-59
    #[error("invalid time input {hour}:{minute:02} (expected hour 0-23, minute 0-59)")]
    InvalidTimeInput { hour: u32, minute: u32 },
}

/// Stateful digit converter that remembers the previous sample for diffing.
///
/// # Example
/// ```
/// use flippy_clock_lib::digits::TimeDigitTracker;
/// use flippy_clock_lib::DigitKey;
///
/// let mut tracker = TimeDigitTracker::new(false);
/// let (_, events) = tracker.sample(10, 15).unwrap();
/// assert!(events.is_empty());
///
/// let (time, events) = tracker.sample(10, 16).unwrap();
/// assert_eq!(time.to_string(), "10:16");
/// assert_eq!(events.len(), 1);
/// assert_eq!(events[0].key, DigitKey::MinuteOnes);
/// ```
#[derive(Debug, Default, Clone)]
pub struct TimeDigitTracker {
    use_12_hour: bool,
    previous: Option<DisplayTime>,
}

impl TimeDigitTracker {
    pub fn new(use_12_hour: bool) -> Self {
        TimeDigitTracker {
            use_12_hour,
            previous: None,
        }
    }

    /// Set the hour format. The previous sample is kept, so the next sample
    /// diffs against whatever was last on the face.
    pub fn configure(&mut self, use_12_hour: bool) {
        self.use_12_hour = use_12_hour;
    }

    pub fn use_12_hour(&self) -> bool {
        self.use_12_hour
    }

    /// Digits from the last accepted sample, if any.
    pub fn previous(&self) -> Option<DisplayTime> {
        self.previous
    }

    /// Forget the previous sample; the next call emits no events.
    pub fn reset(&mut self) {
        self.previous = None;
    }

    /// Sample the clock and return the new digits plus one event per changed position.
    ///
    /// Out-of-range input is rejected with [`DigitError::InvalidTimeInput`] and
    /// leaves the retained previous sample untouched.
    pub fn sample(
        &mut self,
        hour: u32,
        minute: u32,
    ) -> Result<(DisplayTime, Vec<DigitChangeEvent>), DigitError> {
        if hour > 23 || minute > 59 {
            return Err(DigitError::InvalidTimeInput { hour, minute });
        }

        let current = self.display_time(hour, minute);
        let events = match self.previous {
            Some(prev) => diff(&prev, &current),
            None => Vec::new(),
        };

        self.previous = Some(current);
        Ok((current, events))
    }

    /// Convenience wrapper over [`sample`](Self::sample) for any chrono time value.
    pub fn sample_time<T: Timelike>(
        &mut self,
        time: &T,
    ) -> Result<(DisplayTime, Vec<DigitChangeEvent>), DigitError> {
        self.sample(time.hour(), time.minute())
    }

    /// Digits for the given time under the current hour format, without touching state.
    pub fn display_time(&self, hour: u32, minute: u32) -> DisplayTime {
        let display_hour = if self.use_12_hour {
            to_12_hour(hour)
        } else {
            hour
        };
        DisplayTime::from_parts(display_hour, minute)
    }
}

/// AM before noon, PM from 12:00 onward.
pub fn meridiem(hour: u32) -> Meridiem {
    if hour >= 12 {
        Meridiem::Pm
    } else {
        Meridiem::Am
    }
}

fn to_12_hour(hour: u32) -> u32 {
    match hour % 12 {
        0 => 12,
        h => h,
    }
}

fn diff(prev: &DisplayTime, current: &DisplayTime) -> Vec<DigitChangeEvent> {
    DigitKey::ALL
        .iter()
        .filter_map(|&key| {
            let (old_value, new_value) = (prev.get(key), current.get(key));
            (old_value != new_value).then_some(DigitChangeEvent {
                key,
                old_value,
                new_value,
            })
        })
        .collect()
}
