//! Narrow outbound interfaces to the presentational layer.
//!
//! The core never calls into UI code directly. It notifies these sinks and
//! expects nothing back; requests from the UI travel the other way through
//! the [`InputQueue`](crate::input::queue::InputQueue).

use chrono::{DateTime, Datelike, Timelike, Utc};

use crate::api::types::{BodyId, ClickKind, SimEvent};
use crate::components::body::CelestialBody;

/// Notified whenever the selected body changes (or is cleared).
pub trait SelectionSink {
    fn on_selection_changed(&mut self, body: Option<&CelestialBody>);
}

/// Receives the simulated date and per-frame readouts.
pub trait DisplaySink {
    fn show_date(&mut self, date: DateTime<Utc>, text: &str);

    fn show_clock(&mut self, _speed: f64, _playing: bool) {}

    fn show_distance(&mut self, _body: BodyId, _distance_km: f64) {}
}

/// Audio feedback. Implementations must swallow their own failures.
pub trait FeedbackSink {
    fn click(&mut self, kind: ClickKind);
}

/// Everything the simulation loop notifies.
pub trait CoreSinks: SelectionSink + DisplaySink + FeedbackSink {}

impl<T: SelectionSink + DisplaySink + FeedbackSink> CoreSinks for T {}

/// A buffered notification, kept until the next `clear_frame_data`.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    Date { date: DateTime<Utc>, text: String },
    Clock { speed: f64, playing: bool },
    Selection(Option<BodyId>),
    Distance { body: BodyId, distance_km: f64 },
}

/// Per-frame buffering sink, drained by the browser bridge after each tick.
#[derive(Debug, Default)]
pub struct Outbox {
    pub notifications: Vec<Notification>,
    pub clicks: Vec<ClickKind>,
    /// Last published date text. Survives `clear_frame_data`.
    pub date_text: String,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame transient data.
    pub fn clear_frame_data(&mut self) {
        self.notifications.clear();
        self.clicks.clear();
    }

    /// Most recent selection notification in this frame, if any.
    pub fn last_selection(&self) -> Option<Option<BodyId>> {
        self.notifications.iter().rev().find_map(|n| match n {
            Notification::Selection(sel) => Some(*sel),
            _ => None,
        })
    }

    /// Flatten the buffered notifications into wire events. A date becomes
    /// a `DATE` and a `TIME` record so the time of day survives the f32 wire.
    pub fn write_events(&self, out: &mut Vec<SimEvent>) {
        out.clear();
        for n in &self.notifications {
            match n {
                Notification::Date { date, .. } => {
                    out.push(SimEvent::new(
                        SimEvent::DATE,
                        date.year() as f32,
                        date.month() as f32,
                        date.day() as f32,
                    ));
                    out.push(SimEvent::new(
                        SimEvent::TIME,
                        date.hour() as f32,
                        date.minute() as f32,
                        date.second() as f32,
                    ));
                }
                Notification::Clock { speed, playing } => out.push(SimEvent::new(
                    SimEvent::CLOCK,
                    *speed as f32,
                    if *playing { 1.0 } else { 0.0 },
                    0.0,
                )),
                Notification::Selection(sel) => out.push(SimEvent::new(
                    SimEvent::SELECTION,
                    sel.map(|id| id.0 as f32).unwrap_or(-1.0),
                    0.0,
                    0.0,
                )),
                Notification::Distance { body, distance_km } => {
                    let (millions, rest) = split_km(*distance_km);
                    out.push(SimEvent::new(SimEvent::DISTANCE, body.0 as f32, millions, rest));
                }
            }
        }
    }
}

/// Whole kilometres as (millions, remainder). Both parts stay integral and
/// below 2^24, so f32 carries them exactly.
fn split_km(km: f64) -> (f32, f32) {
    let km = km.round();
    let millions = (km / 1e6).trunc();
    (millions as f32, (km - millions * 1e6) as f32)
}

impl SelectionSink for Outbox {
    fn on_selection_changed(&mut self, body: Option<&CelestialBody>) {
        self.notifications.push(Notification::Selection(body.map(|b| b.id)));
    }
}

impl DisplaySink for Outbox {
    fn show_date(&mut self, date: DateTime<Utc>, text: &str) {
        self.date_text.clear();
        self.date_text.push_str(text);
        self.notifications.push(Notification::Date {
            date,
            text: text.to_string(),
        });
    }

    fn show_clock(&mut self, speed: f64, playing: bool) {
        self.notifications.push(Notification::Clock { speed, playing });
    }

    fn show_distance(&mut self, body: BodyId, distance_km: f64) {
        self.notifications.push(Notification::Distance { body, distance_km });
    }
}

impl FeedbackSink for Outbox {
    fn click(&mut self, kind: ClickKind) {
        self.clicks.push(kind);
    }
}
