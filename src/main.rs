//! # FlippyWeather Clock Entry Point
//!
//! This binary drives the clock core the way a dashboard host would: a 1 Hz
//! tick, a faster animation pump for flip phases, and weather snapshots read
//! from a JSON file. It supports a development mode (`--stdout`) that draws
//! the tile in the terminal, and otherwise just logs what changes.
//!
//! ```text
//! flippy-clock [--stdout] [--once] [--config PATH] [--weather PATH]
//! ```

// Test modules
#[cfg(test)]
mod tests;

use anyhow::{bail, Context};
use chrono::{Local, Timelike};
use flippy_clock_lib::clock::MonotonicClock;
use flippy_clock_lib::config::Config;
use flippy_clock_lib::renderer::draw_ascii;
use flippy_clock_lib::weather::{resolve_weather, JsonFileSource, WeatherSnapshot};
use flippy_clock_lib::widget::FlippyClock;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// How often in-flight flips are polled between ticks.
const ANIMATION_POLL: Duration = Duration::from_millis(50);

/// Ticks between re-reading the weather file.
const WEATHER_REFRESH_TICKS: u64 = 30;

/// Command line options.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Args {
    /// Draw the tile to stdout on every frame
    pub stdout: bool,
    /// Render one frame and exit
    pub once: bool,
    pub config: Option<PathBuf>,
    pub weather: Option<PathBuf>,
}

impl Args {
    pub fn parse<I: IntoIterator<Item = String>>(args: I) -> anyhow::Result<Self> {
        let mut parsed = Args::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--stdout" => parsed.stdout = true,
                "--once" => parsed.once = true,
                "--config" => {
                    let path = args.next().context("--config needs a path")?;
                    parsed.config = Some(PathBuf::from(path));
                }
                "--weather" => {
                    let path = args.next().context("--weather needs a path")?;
                    parsed.weather = Some(PathBuf::from(path));
                }
                other => bail!("unknown argument: {other}"),
            }
        }
        Ok(parsed)
    }
}

/// Current weather for the configured entity, re-reading the file if given.
fn load_weather(path: Option<&PathBuf>, config: &Config) -> Option<WeatherSnapshot> {
    let Some(path) = path else {
        return Some(resolve_weather(
            &JsonFileSource::default(),
            config.weather_entity.as_deref(),
        ));
    };
    match JsonFileSource::load_from_path(path) {
        Ok(source) => Some(resolve_weather(&source, config.weather_entity.as_deref())),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "weather file unreadable, keeping last snapshot");
            None
        }
    }
}

async fn run(args: Args, config: Config) -> anyhow::Result<()> {
    let tick_period = Duration::from_millis(config.tick_interval_ms.max(1));
    let mut widget = FlippyClock::new(config, MonotonicClock::new());

    if let Some(snapshot) = load_weather(args.weather.as_ref(), widget.config()) {
        widget.update_weather(snapshot);
    }

    widget.start();

    let mut ticker = tokio::time::interval(tick_period);
    let mut animation = tokio::time::interval(ANIMATION_POLL);
    let mut ticks: u64 = 0;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                ticks += 1;
                if ticks % WEATHER_REFRESH_TICKS == 0 {
                    if let Some(snapshot) = load_weather(args.weather.as_ref(), widget.config()) {
                        widget.update_weather(snapshot);
                    }
                }

                let now = Local::now();
                let Some(outcome) = widget.tick(now.hour(), now.minute())? else {
                    continue;
                };
                for change in &outcome.changes {
                    info!(key = ?change.key, from = %change.old_value, to = %change.new_value, "digit changed");
                }

                if let Some(view) = widget.view() {
                    if args.stdout {
                        draw_ascii(&view);
                    }
                    if args.once {
                        break;
                    }
                }
            }
            _ = animation.tick(), if widget.animator().in_flight() > 0 => {
                let phases = widget.pump();
                if args.stdout && !phases.is_empty() {
                    if let Some(view) = widget.view() {
                        draw_ascii(&view);
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupt received");
                break;
            }
        }
    }

    widget.stop();
    Ok(())
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse(env::args().skip(1))?;
    let config = match &args.config {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };
    info!(
        use_12_hour = config.use_12_hour,
        theme = config.theme.name(),
        weather_entity = config.weather_entity.as_deref().unwrap_or("-"),
        "flippy-clock starting"
    );

    // Create Tokio runtime for the tick loop
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run(args, config))
}
