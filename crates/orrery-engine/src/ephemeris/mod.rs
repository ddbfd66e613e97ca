//! Body positions and spin as a function of date.
//!
//! Providers return vectors in astronomical units in the J2000 equatorial
//! frame. [`SceneFrame`] maps them into scene space.

pub mod kepler;

use chrono::{DateTime, Utc};
use glam::{DQuat, DVec3};

use crate::api::error::SimError;
use crate::assets::config::SimConfig;

pub use kepler::KeplerEphemeris;

pub const SECONDS_PER_DAY: f64 = 86_400.0;
pub const DAYS_PER_JULIAN_CENTURY: f64 = 36_525.0;

/// 2000-01-01T12:00:00Z as a unix timestamp.
const J2000_UNIX_SECONDS: i64 = 946_728_000;

/// Spin state of a body at a date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisSpin {
    /// Prime meridian angle, not normalised.
    pub spin_deg: f64,
}

/// Numeric oracle for body positions. Must be deterministic and pure in
/// `(body, date)`.
pub trait EphemerisProvider {
    /// Position relative to the central star (AU).
    fn heliocentric_vector(&self, body: &str, date: DateTime<Utc>) -> Result<DVec3, SimError>;

    /// Position of `body` relative to `reference` (AU).
    fn relative_vector(&self, body: &str, reference: &str, date: DateTime<Utc>) -> Result<DVec3, SimError>;

    fn rotation_axis_spin(&self, body: &str, date: DateTime<Utc>) -> Result<AxisSpin, SimError>;
}

/// Fractional days since the J2000 epoch.
pub fn days_since_j2000(date: DateTime<Utc>) -> f64 {
    let micros = date.timestamp_micros() - J2000_UNIX_SECONDS * 1_000_000;
    micros as f64 / (SECONDS_PER_DAY * 1e6)
}

/// AU to scene mapping: uniform scale followed by a fixed tilt about X.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneFrame {
    pub scale: f64,
    pub tilt: DQuat,
}

impl SceneFrame {
    pub fn new(scale: f64, tilt_deg: f64) -> Self {
        Self {
            scale,
            tilt: DQuat::from_rotation_x(tilt_deg.to_radians()),
        }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(config.world_scale, config.ecliptic_tilt_deg)
    }

    /// Ephemeris vector (AU) to scene units.
    #[inline]
    pub fn to_scene(&self, au: DVec3) -> DVec3 {
        self.tilt * (au * self.scale)
    }

    /// Scene units back to AU.
    pub fn to_au(&self, scene: DVec3) -> DVec3 {
        (self.tilt.inverse() * scene) / self.scale
    }
}
