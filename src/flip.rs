//! # Flip Animation Scheduling
//!
//! Each digit position runs its own `Idle -> Flipping -> Idle` state machine.
//! A change event starts a flip only when that position is idle; a change that
//! lands mid-flip is dropped, not queued.
//!
//! ## Timeline (from trigger)
//! - **0 ms**: enter `Flipping` (the renderer applies its "flipping" state)
//! - **150 ms**: face content swapped to the new digit
//! - **300 ms**: back to `Idle`
//!
//! The animator never sleeps. The host calls [`FlipAnimator::poll`] with the
//! current [`Clock`](crate::clock::Clock) reading and applies the phases it returns.

use crate::{DigitChangeEvent, DigitKey};
use std::time::Duration;
use tracing::debug;

/// Delay from trigger to swapping the visible face.
pub const FACE_SWAP_DELAY: Duration = Duration::from_millis(150);

/// Delay from trigger to returning to idle.
pub const FLIP_DURATION: Duration = Duration::from_millis(300);

/// Per-digit animation state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FlipState {
    #[default]
    Idle,
    Flipping,
}

/// A timed phase that fired during [`FlipAnimator::poll`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlipPhase {
    /// Visible face now shows `value`.
    FaceSwapped { key: DigitKey, value: char },
    /// Flip complete, digit is idle again.
    Finished { key: DigitKey },
}

#[derive(Clone, Copy, Debug)]
struct InFlight {
    new_value: char,
    swap_at: Duration,
    finish_at: Duration,
    swapped: bool,
}

#[derive(Clone, Copy, Debug, Default)]
struct Slot {
    face: Option<char>,
    flight: Option<InFlight>,
}

/// Four independent flip state machines, one per [`DigitKey`].
#[derive(Debug, Default, Clone)]
pub struct FlipAnimator {
    slots: [Slot; 4],
}

impl FlipAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a flip for the event's digit at time `now`.
    ///
    /// Returns `false` (and changes nothing) when that digit is already flipping.
    pub fn trigger(&mut self, event: &DigitChangeEvent, now: Duration) -> bool {
        let slot = &mut self.slots[event.key.index()];
        if slot.flight.is_some() {
            debug!(key = ?event.key, value = %event.new_value, "flip already in flight, change dropped");
            return false;
        }

        // Face shows the old value until the swap fires
        slot.face = Some(event.old_value);
        slot.flight = Some(InFlight {
            new_value: event.new_value,
            swap_at: now + FACE_SWAP_DELAY,
            finish_at: now + FLIP_DURATION,
            swapped: false,
        });
        true
    }

    /// Fire every phase due at or before `now`, ordered by deadline.
    pub fn poll(&mut self, now: Duration) -> Vec<FlipPhase> {
        let mut fired: Vec<(Duration, usize, FlipPhase)> = Vec::new();

        for (index, slot) in self.slots.iter_mut().enumerate() {
            let key = DigitKey::ALL[index];
            let Some(mut flight) = slot.flight else {
                continue;
            };

            if !flight.swapped && flight.swap_at <= now {
                flight.swapped = true;
                slot.face = Some(flight.new_value);
                fired.push((
                    flight.swap_at,
                    index,
                    FlipPhase::FaceSwapped {
                        key,
                        value: flight.new_value,
                    },
                ));
            }

            if flight.finish_at <= now {
                slot.flight = None;
                fired.push((flight.finish_at, index, FlipPhase::Finished { key }));
            } else {
                slot.flight = Some(flight);
            }
        }

        fired.sort_by_key(|(at, index, _)| (*at, *index));
        fired.into_iter().map(|(_, _, phase)| phase).collect()
    }

    /// Abort every in-flight flip. Pending swaps never happen; faces keep
    /// whatever they last showed.
    pub fn cancel_all(&mut self) -> usize {
        let mut cancelled = 0;
        for slot in self.slots.iter_mut() {
            if slot.flight.take().is_some() {
                cancelled += 1;
            }
        }
        if cancelled > 0 {
            debug!(cancelled, "cancelled in-flight flips");
        }
        cancelled
    }

    pub fn state(&self, key: DigitKey) -> FlipState {
        if self.slots[key.index()].flight.is_some() {
            FlipState::Flipping
        } else {
            FlipState::Idle
        }
    }

    pub fn is_flipping(&self, key: DigitKey) -> bool {
        self.state(key) == FlipState::Flipping
    }

    /// Last face content set by a flip for this digit, if any flip has touched it.
    pub fn face(&self, key: DigitKey) -> Option<char> {
        self.slots[key.index()].face
    }

    /// Number of digits currently flipping.
    pub fn in_flight(&self) -> usize {
        self.slots.iter().filter(|s| s.flight.is_some()).count()
    }

    /// Earliest pending phase deadline, for hosts that schedule a wakeup.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.slots
            .iter()
            .filter_map(|s| s.flight)
            .map(|f| if f.swapped { f.finish_at } else { f.swap_at })
            .min()
    }
}
