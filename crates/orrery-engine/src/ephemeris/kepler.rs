//! Keplerian ephemeris: pure math over the body catalog.
//!
//! Planets follow J2000 elements with secular rates (Standish 1992 / JPL
//! approximate positions). Moons follow circular inclined orbits about their
//! host. Uses f64 throughout; centuries times degrees per century gets large.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use glam::DVec3;
use log::debug;
use serde::{Deserialize, Serialize};

use super::{days_since_j2000, AxisSpin, EphemerisProvider, DAYS_PER_JULIAN_CENTURY};
use crate::api::error::SimError;
use crate::assets::catalog::{BodyCatalog, BodyClass};

/// Mean obliquity of the ecliptic at J2000 (degrees).
pub const OBLIQUITY_J2000_DEG: f64 = 23.43928;

/// Keplerian orbital elements at J2000 with secular rates per Julian century.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeplerElements {
    /// Semi-major axis (AU).
    pub a0: f64,
    pub e0: f64,
    /// Inclination to the ecliptic (degrees).
    pub i0: f64,
    /// Mean longitude (degrees).
    pub l0: f64,
    /// Mean longitude rate (degrees per century).
    pub l_dot: f64,
    /// Longitude of perihelion (degrees).
    pub w0: f64,
    /// Longitude of perihelion rate (degrees per century).
    pub w_dot: f64,
    /// Longitude of the ascending node (degrees).
    pub node0: f64,
}

/// Circular orbit of a moon about its host, in the host's ecliptic frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoonOrbit {
    pub distance_au: f64,
    pub inclination_deg: f64,
    /// Orbital angle at J2000 (degrees).
    pub phase_deg: f64,
}

/// Solve Kepler's equation `E - e·sin(E) = M` by Newton-Raphson.
/// `mean_anomaly` in radians, returns the eccentric anomaly in radians.
pub fn solve_kepler(mean_anomaly: f64, eccentricity: f64) -> f64 {
    let mut ea = mean_anomaly;
    for _ in 0..15 {
        let delta = ea - eccentricity * ea.sin() - mean_anomaly;
        let derivative = 1.0 - eccentricity * ea.cos();
        ea -= delta / derivative;
        if delta.abs() < 1e-12 {
            break;
        }
    }
    ea
}

/// Heliocentric ecliptic position (AU) at `t_centuries` from J2000.
pub fn heliocentric_ecliptic(elements: &KeplerElements, t_centuries: f64) -> DVec3 {
    let a = elements.a0;
    let e = elements.e0;
    let i = elements.i0.to_radians();
    let node = elements.node0.to_radians();
    let l = (elements.l0 + elements.l_dot * t_centuries).to_radians();
    let w = (elements.w0 + elements.w_dot * t_centuries).to_radians();

    // Argument of perihelion and mean anomaly
    let arg_peri = w - node;
    let m = (l - w).rem_euclid(std::f64::consts::TAU);
    let ea = solve_kepler(m, e);

    // Orbital-plane coordinates, perihelion along +x
    let x_orb = a * (ea.cos() - e);
    let y_orb = a * (1.0 - e * e).sqrt() * ea.sin();

    let (sin_w, cos_w) = arg_peri.sin_cos();
    let (sin_om, cos_om) = node.sin_cos();
    let (sin_i, cos_i) = i.sin_cos();

    DVec3::new(
        (cos_om * cos_w - sin_om * sin_w * cos_i) * x_orb + (-cos_om * sin_w - sin_om * cos_w * cos_i) * y_orb,
        (sin_om * cos_w + cos_om * sin_w * cos_i) * x_orb + (-sin_om * sin_w + cos_om * cos_w * cos_i) * y_orb,
        (sin_w * sin_i) * x_orb + (cos_w * sin_i) * y_orb,
    )
}

/// Position on a circular orbit (AU, ecliptic), relative to the host.
pub fn circular_ecliptic(orbit: &MoonOrbit, period_days: f64, days: f64) -> DVec3 {
    let angle = (orbit.phase_deg + 360.0 * days / period_days).to_radians();
    let (s, c) = angle.sin_cos();
    let (sin_i, cos_i) = orbit.inclination_deg.to_radians().sin_cos();
    DVec3::new(c, s * cos_i, s * sin_i) * orbit.distance_au
}

/// Ecliptic to J2000 equatorial (rotation about X by the obliquity).
pub fn ecliptic_to_equatorial(v: DVec3) -> DVec3 {
    let (s, c) = OBLIQUITY_J2000_DEG.to_radians().sin_cos();
    DVec3::new(v.x, v.y * c - v.z * s, v.y * s + v.z * c)
}

#[derive(Debug, Clone)]
enum Motion {
    /// The central star.
    Fixed,
    Kepler(KeplerElements),
    Circular { parent: String, orbit: MoonOrbit, period_days: f64 },
    /// Known moon with no motion model.
    Unmodelled { parent: String },
}

#[derive(Debug, Clone)]
struct BodyModel {
    motion: Motion,
    rotation_period_hours: f64,
    spin_epoch_deg: f64,
}

/// [`EphemerisProvider`] backed by the body catalog.
#[derive(Debug, Clone, Default)]
pub struct KeplerEphemeris {
    models: HashMap<String, BodyModel>,
}

impl KeplerEphemeris {
    pub fn from_catalog(catalog: &BodyCatalog) -> Self {
        let mut models = HashMap::with_capacity(catalog.bodies.len());
        for desc in &catalog.bodies {
            let motion = match (desc.class, &desc.elements, &desc.moon_orbit, &desc.parent) {
                (BodyClass::Star, _, _, _) => Motion::Fixed,
                (_, Some(elements), _, _) => Motion::Kepler(*elements),
                (BodyClass::Moon, None, Some(orbit), Some(parent)) if desc.orbital_period_days != 0.0 => {
                    Motion::Circular {
                        parent: parent.clone(),
                        orbit: *orbit,
                        period_days: desc.orbital_period_days,
                    }
                }
                (BodyClass::Moon, None, _, Some(parent)) => Motion::Unmodelled { parent: parent.clone() },
                _ => {
                    debug!("{} has no orbital elements", desc.name);
                    continue;
                }
            };
            models.insert(
                desc.name.clone(),
                BodyModel {
                    motion,
                    rotation_period_hours: desc.rotation_period_hours,
                    spin_epoch_deg: desc.spin_epoch_deg,
                },
            );
        }
        Self { models }
    }

    fn model(&self, body: &str) -> Result<&BodyModel, SimError> {
        self.models
            .get(body)
            .ok_or_else(|| SimError::missing(body, "not in the ephemeris catalog"))
    }

    /// Position relative to the host planet, for moons.
    fn moon_offset(&self, body: &str, date: DateTime<Utc>) -> Result<(String, DVec3), SimError> {
        match &self.model(body)?.motion {
            Motion::Circular { parent, orbit, period_days } => {
                let rel = circular_ecliptic(orbit, *period_days, days_since_j2000(date));
                Ok((parent.clone(), ecliptic_to_equatorial(rel)))
            }
            Motion::Unmodelled { parent } => Err(SimError::missing(
                body,
                format!("no motion model for moons of {parent}"),
            )),
            _ => Err(SimError::missing(body, "not a moon")),
        }
    }
}

impl EphemerisProvider for KeplerEphemeris {
    fn heliocentric_vector(&self, body: &str, date: DateTime<Utc>) -> Result<DVec3, SimError> {
        match &self.model(body)?.motion {
            Motion::Fixed => Ok(DVec3::ZERO),
            Motion::Kepler(elements) => {
                let t = days_since_j2000(date) / DAYS_PER_JULIAN_CENTURY;
                Ok(ecliptic_to_equatorial(heliocentric_ecliptic(elements, t)))
            }
            Motion::Circular { .. } | Motion::Unmodelled { .. } => {
                let (parent, rel) = self.moon_offset(body, date)?;
                Ok(self.heliocentric_vector(&parent, date)? + rel)
            }
        }
    }

    fn relative_vector(&self, body: &str, reference: &str, date: DateTime<Utc>) -> Result<DVec3, SimError> {
        if let Ok(BodyModel { motion: Motion::Circular { parent, .. }, .. }) = self.model(body) {
            if parent == reference {
                return self.moon_offset(body, date).map(|(_, rel)| rel);
            }
        }
        Ok(self.heliocentric_vector(body, date)? - self.heliocentric_vector(reference, date)?)
    }

    fn rotation_axis_spin(&self, body: &str, date: DateTime<Utc>) -> Result<AxisSpin, SimError> {
        let model = self.model(body)?;
        let period_days = model.rotation_period_hours / 24.0;
        let turns = if period_days == 0.0 { 0.0 } else { days_since_j2000(date) / period_days };
        Ok(AxisSpin {
            spin_deg: model.spin_epoch_deg + 360.0 * turns,
        })
    }
}
