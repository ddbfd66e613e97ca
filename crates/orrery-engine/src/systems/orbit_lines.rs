//! Orbit-line generation.
//!
//! A line samples one full orbital period centred on the current date, so
//! the body sits at the midpoint of its own loop. Lines are rebuilt whole on
//! refresh events (selection, date jumps, toggles), never patched per frame.

use chrono::{DateTime, Duration, Utc};
use glam::DVec3;
use log::{debug, warn};

use crate::api::error::SimError;
use crate::api::types::BodyId;
use crate::components::body::{BodyKind, CelestialBody};
use crate::core::registry::BodyRegistry;
use crate::core::state::SimulationState;
use crate::ephemeris::{EphemerisProvider, SceneFrame, SECONDS_PER_DAY};

fn offset_date(date: DateTime<Utc>, days: f64) -> Result<DateTime<Utc>, SimError> {
    let micros = days * SECONDS_PER_DAY * 1e6;
    if !micros.is_finite() || micros.abs() >= i64::MAX as f64 {
        return Err(SimError::DateOutOfRange);
    }
    date.checked_add_signed(Duration::microseconds(micros.round() as i64))
        .ok_or(SimError::DateOutOfRange)
}

/// Sample a closed loop for `body`. Moon loops are drawn around
/// `parent_position`, the host's current scene position.
pub fn sample_orbit(
    body: &CelestialBody,
    parent: Option<(&str, DVec3)>,
    provider: &dyn EphemerisProvider,
    frame: &SceneFrame,
    date: DateTime<Utc>,
    segments: usize,
) -> Result<Vec<DVec3>, SimError> {
    let period = body.orbital_period_days.abs();
    if !(period > 0.0) {
        return Err(SimError::missing(&body.name, "no orbital period"));
    }
    let segments = segments.max(2);
    let step = period / segments as f64;
    let start = -period / 2.0;

    let mut points = Vec::with_capacity(segments + 1);
    for i in 0..segments {
        let when = offset_date(date, start + step * i as f64)?;
        let point = match (&body.kind, parent) {
            (BodyKind::Moon { .. }, Some((parent_name, parent_position))) => {
                frame.to_scene(provider.relative_vector(&body.name, parent_name, when)?) + parent_position
            }
            (BodyKind::Planet { .. }, _) => frame.to_scene(provider.heliocentric_vector(&body.name, when)?),
            _ => return Err(SimError::missing(&body.name, "body has no orbit")),
        };
        points.push(point);
    }
    // Close the loop on the exact first sample.
    points.push(points[0]);
    Ok(points)
}

/// Whether `body`'s line should exist given the toggles and camera.
pub fn wants_line(body: &CelestialBody, state: &SimulationState, camera_position: DVec3, max_moon_distance: f64) -> bool {
    let toggles = &state.toggles;
    match body.kind {
        BodyKind::Star => false,
        BodyKind::Planet { .. } => toggles.orbit_lines,
        BodyKind::Moon { .. } => {
            toggles.orbit_lines && toggles.moons && camera_position.distance(body.position) <= max_moon_distance
        }
    }
}

/// Rebuild or remove the line of one body.
#[allow(clippy::too_many_arguments)]
pub fn refresh_line(
    registry: &mut BodyRegistry,
    id: BodyId,
    provider: &dyn EphemerisProvider,
    frame: &SceneFrame,
    date: DateTime<Utc>,
    state: &SimulationState,
    camera_position: DVec3,
    max_moon_distance: f64,
) {
    let Some(body) = registry.get(id) else {
        return;
    };
    let Some(orbit) = body.orbit() else {
        return;
    };

    let mut failed = false;
    let rebuilt = if wants_line(body, state, camera_position, max_moon_distance) {
        let parent = body
            .parent()
            .and_then(|p| registry.get(p))
            .map(|p| (p.name.as_str(), p.position));
        match sample_orbit(body, parent, provider, frame, date, orbit.segments) {
            Ok(points) => Some(points),
            Err(err) => {
                // Bodies already flagged degraded have been reported once.
                if body.degraded {
                    debug!("{}: orbit line not built: {err}", body.name);
                } else {
                    warn!("{}: orbit line not built: {err}", body.name);
                }
                failed = true;
                None
            }
        }
    } else {
        None
    };

    let Some(body) = registry.get_mut(id) else {
        return;
    };
    if failed {
        body.degraded = true;
    }
    let Some(orbit) = body.orbit_mut() else {
        return;
    };
    match rebuilt {
        Some(points) => orbit.replace(points),
        None if orbit.is_built() => {
            orbit.remove();
            debug!("orbit line of {id:?} removed");
        }
        None => {}
    }
}

/// Refresh every orbit line. Returns how many lines are built afterwards.
pub fn refresh_orbit_lines(
    registry: &mut BodyRegistry,
    provider: &dyn EphemerisProvider,
    frame: &SceneFrame,
    date: DateTime<Utc>,
    state: &SimulationState,
    camera_position: DVec3,
    max_moon_distance: f64,
) -> usize {
    for index in 0..registry.len() {
        let id = BodyId(index as u32);
        refresh_line(registry, id, provider, frame, date, state, camera_position, max_moon_distance);
    }
    let built = registry
        .iter()
        .filter(|b| b.orbit().is_some_and(|o| o.is_built()))
        .count();
    debug!("orbit lines refreshed, {built} built");
    built
}
