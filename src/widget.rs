//! # Clock Tile Lifecycle
//!
//! [`FlippyClock`] wires the pieces together for a host:
//! - [`TimeDigitTracker`] turns each tick into digit change events
//! - [`FlipAnimator`] runs one flip per changed digit against the injected [`Clock`]
//! - [`ConditionPresenter`] maps the latest weather snapshot for display
//!
//! The host owns the timers. It calls [`FlippyClock::start`] when the tile is
//! attached, [`FlippyClock::tick`] once per redraw period, [`FlippyClock::pump`]
//! whenever it wants sub-tick animation phases, and [`FlippyClock::stop`] on
//! teardown. `stop` cancels every in-flight flip so nothing acts on a torn-down view.

use crate::clock::Clock;
use crate::condition::{forecast_icon, is_night, ConditionPresenter, Presentation};
use crate::config::Config;
use crate::digits::{meridiem, DigitError, TimeDigitTracker};
use crate::flip::{FlipAnimator, FlipPhase};
use crate::renderer::{ClockView, DigitFace, ForecastTile};
use crate::weather::WeatherSnapshot;
use crate::{DigitChangeEvent, DigitKey, DisplayTime, VERSION};
use chrono::Timelike;
use tracing::{debug, info};

/// What one tick produced.
#[derive(Clone, Debug, PartialEq)]
pub struct TickOutcome {
    pub time: DisplayTime,
    /// Every digit that changed since the previous tick
    pub changes: Vec<DigitChangeEvent>,
    /// Digits whose flip actually started (changes landing mid-flip are dropped)
    pub started: Vec<DigitKey>,
    /// Animation phases that came due during this tick
    pub phases: Vec<FlipPhase>,
}

/// Flip clock with weather readout, driven by host ticks.
#[derive(Debug)]
pub struct FlippyClock<C: Clock> {
    config: Config,
    clock: C,
    tracker: TimeDigitTracker,
    animator: FlipAnimator,
    presenter: ConditionPresenter,
    weather: WeatherSnapshot,
    presentation: Presentation,
    last_sample: Option<(u32, u32, DisplayTime)>,
    running: bool,
}

impl<C: Clock> FlippyClock<C> {
    pub fn new(config: Config, clock: C) -> Self {
        let mut presenter = ConditionPresenter::new(config.animated_background);
        let weather = WeatherSnapshot::unknown();
        let presentation = presenter.present(weather.condition.as_deref(), false);
        FlippyClock {
            tracker: TimeDigitTracker::new(config.use_12_hour),
            config,
            clock,
            animator: FlipAnimator::new(),
            presenter,
            weather,
            presentation,
            last_sample: None,
            running: false,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Swap in a new configuration. Hour format and animation toggle apply from
    /// the next tick.
    pub fn set_config(&mut self, config: Config) {
        self.tracker.configure(config.use_12_hour);
        self.presenter
            .set_animated_background(config.animated_background);
        self.config = config;
        self.refresh_presentation();
    }

    /// Begin accepting ticks. The first tick after a start never flips.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.tracker.reset();
        self.running = true;
        info!("clock started");
    }

    /// Stop ticking and cancel every in-flight flip. Returns how many were cancelled.
    pub fn stop(&mut self) -> usize {
        let cancelled = self.animator.cancel_all();
        if self.running {
            self.running = false;
            info!(cancelled, "clock stopped");
        }
        cancelled
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Sample the clock at `hour:minute`, start flips for changed digits and
    /// fire any due animation phases.
    ///
    /// Returns `Ok(None)` while stopped.
    pub fn tick(&mut self, hour: u32, minute: u32) -> Result<Option<TickOutcome>, DigitError> {
        if !self.running {
            return Ok(None);
        }

        let (time, changes) = self.tracker.sample(hour, minute)?;
        let now = self.clock.now();

        let started: Vec<DigitKey> = changes
            .iter()
            .filter(|event| self.animator.trigger(event, now))
            .map(|event| event.key)
            .collect();
        if !changes.is_empty() {
            debug!(time = %time, changed = changes.len(), started = started.len(), "digits changed");
        }

        let phases = self.animator.poll(now);
        self.last_sample = Some((hour, minute, time));
        self.refresh_presentation();

        Ok(Some(TickOutcome {
            time,
            changes,
            started,
            phases,
        }))
    }

    /// [`tick`](Self::tick) for any chrono time value.
    pub fn tick_at<T: Timelike>(&mut self, time: &T) -> Result<Option<TickOutcome>, DigitError> {
        self.tick(time.hour(), time.minute())
    }

    /// Fire animation phases due by now without sampling the time.
    pub fn pump(&mut self) -> Vec<FlipPhase> {
        let now = self.clock.now();
        self.animator.poll(now)
    }

    pub fn animator(&self) -> &FlipAnimator {
        &self.animator
    }

    /// Replace the current weather snapshot.
    pub fn update_weather(&mut self, snapshot: WeatherSnapshot) {
        if snapshot != self.weather {
            debug!(condition = snapshot.condition_text(), "weather updated");
        }
        self.weather = snapshot;
        self.refresh_presentation();
    }

    pub fn weather(&self) -> &WeatherSnapshot {
        &self.weather
    }

    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    fn night(&self) -> bool {
        self.last_sample
            .map(|(hour, _, _)| is_night(hour))
            .unwrap_or(false)
    }

    fn refresh_presentation(&mut self) {
        let night = self.night();
        self.presentation = self
            .presenter
            .present(self.weather.condition.as_deref(), night);
    }

    /// Everything needed to draw the tile, or `None` before the first tick.
    pub fn view(&self) -> Option<ClockView> {
        let (hour, _, time) = self.last_sample?;

        let digits = DigitKey::ALL.map(|key| {
            let flipping = self.animator.is_flipping(key);
            let face = if flipping {
                self.animator.face(key).unwrap_or_else(|| time.get(key))
            } else {
                time.get(key)
            };
            DigitFace {
                key,
                face,
                flipping,
            }
        });

        let unit = self.config.temperature_unit;
        let forecast = self
            .weather
            .visible_forecast()
            .iter()
            .map(|entry| ForecastTile {
                day: entry.day_label(),
                icon: forecast_icon(entry.condition.as_deref()),
                temperature: entry.display_temperature().label(self.weather.unit, unit),
            })
            .collect();

        Some(ClockView {
            digits,
            meridiem: self.config.use_12_hour.then(|| meridiem(hour)),
            is_night: is_night(hour),
            presentation: self.presentation.clone(),
            temperature: self.weather.temperature.label(self.weather.unit, unit),
            condition: self.weather.condition_text().to_string(),
            forecast,
            location_name: self.config.location_name.clone(),
            theme: self.config.theme,
            version: format!("FlippyWeather v{}", VERSION),
        })
    }
}
