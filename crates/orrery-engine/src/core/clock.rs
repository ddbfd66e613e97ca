//! Simulated date, play state and speed.
//!
//! The clock is driven by real frame time. `speed` is simulated seconds per
//! real second and may be negative (time runs backwards) or zero (playing,
//! but frozen). Pausing freezes the date regardless of speed.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use log::{debug, warn};

use crate::api::error::SimError;
use crate::api::sinks::DisplaySink;

pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const MILLIS_PER_SECOND: f64 = 1e3;

/// Clock state. Mutated only through [`TimeController`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationClock {
    pub current_date: DateTime<Utc>,
    pub speed: f64,
    pub is_playing: bool,
}

pub struct TimeController {
    clock: SimulationClock,
    default_speed: f64,
    /// Set while steps fall off the representable date range.
    stalled: bool,
}

impl TimeController {
    /// A playing clock at `start` running at `default_speed`.
    pub fn new(start: DateTime<Utc>, default_speed: f64) -> Self {
        Self {
            clock: SimulationClock {
                current_date: start,
                speed: default_speed,
                is_playing: true,
            },
            default_speed,
            stalled: false,
        }
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn current_date(&self) -> DateTime<Utc> {
        self.clock.current_date
    }

    pub fn speed(&self) -> f64 {
        self.clock.speed
    }

    pub fn is_playing(&self) -> bool {
        self.clock.is_playing
    }

    /// Advance by `real_dt * speed` simulated seconds (when playing) and
    /// republish the date.
    pub fn update(&mut self, real_dt: f64, display: &mut dyn DisplaySink) {
        if self.clock.is_playing {
            match self.advance(real_dt * self.clock.speed) {
                Ok(()) => self.stalled = false,
                Err(err) if !self.stalled => {
                    warn!("clock not advanced: {err}");
                    self.stalled = true;
                }
                Err(err) => debug!("clock not advanced: {err}"),
            }
        }
        self.publish(display);
    }

    fn advance(&mut self, sim_seconds: f64) -> Result<(), SimError> {
        if sim_seconds == 0.0 {
            return Ok(());
        }
        let step = step_duration(sim_seconds)?;
        let next = self
            .clock
            .current_date
            .checked_add_signed(step)
            .ok_or(SimError::DateOutOfRange)?;
        self.clock.current_date = next;
        Ok(())
    }

    fn publish(&self, display: &mut dyn DisplaySink) {
        let text = format_date(self.clock.current_date);
        display.show_date(self.clock.current_date, &text);
        display.show_clock(self.clock.speed, self.clock.is_playing);
    }

    /// Flip play state. Speed always returns to the default, so a paused
    /// fast-forward resumes at normal speed.
    pub fn toggle_play_pause(&mut self) {
        self.clock.is_playing = !self.clock.is_playing;
        self.clock.speed = self.default_speed;
        debug!("clock {} at speed {}", if self.clock.is_playing { "playing" } else { "paused" }, self.clock.speed);
    }

    /// Multiply the current speed. Repeated calls compound (x10 three times
    /// from 1 gives 1000). Starts playback if paused.
    pub fn set_speed(&mut self, multiplier: f64) {
        if !multiplier.is_finite() {
            warn!("ignoring non-finite speed multiplier {multiplier}");
            return;
        }
        self.clock.speed *= multiplier;
        self.clock.is_playing = true;
        debug!("clock speed x{multiplier} -> {}", self.clock.speed);
    }

    /// Set the speed outright (slider input). Zero is a valid playing state.
    pub fn set_rate(&mut self, speed: f64) {
        if !speed.is_finite() {
            warn!("ignoring non-finite speed {speed}");
            return;
        }
        self.clock.speed = speed;
    }

    /// Jump to `date`. The clock is paused while the date is swapped, forced
    /// through one update so the display sees it, and `recompute` runs
    /// against the new date before the previous play state is restored.
    pub fn set_current_date<F>(&mut self, date: DateTime<Utc>, display: &mut dyn DisplaySink, recompute: F)
    where
        F: FnOnce(&SimulationClock, &mut dyn DisplaySink),
    {
        let was_playing = self.clock.is_playing;
        self.clock.is_playing = false;
        self.clock.current_date = date;
        self.update(0.0, display);
        recompute(&self.clock, display);
        self.clock.is_playing = was_playing;
        debug!("date set to {}", format_date(date));
    }
}

/// Simulated step as a chrono duration. Millisecond resolution spans more
/// than chrono's whole date range, so any finite step that lands on a
/// representable date converts.
fn step_duration(sim_seconds: f64) -> Result<Duration, SimError> {
    let millis = (sim_seconds * MILLIS_PER_SECOND).round();
    if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
        return Err(SimError::DateOutOfRange);
    }
    Duration::try_milliseconds(millis as i64).ok_or(SimError::DateOutOfRange)
}

pub fn format_date(date: DateTime<Utc>) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse user-entered date text. Accepts RFC 3339 and the common
/// `YYYY-MM-DD[ HH:MM[:SS]]` forms (interpreted as UTC).
pub fn parse_date_input(text: &str) -> Result<DateTime<Utc>, SimError> {
    let text = text.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Ok(date.with_timezone(&Utc));
    }
    for format in [DATE_FORMAT, "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(day) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        if let Some(midnight) = day.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }
    Err(SimError::MalformedDateInput { input: text.to_string() })
}
