//! Per-frame orbital and rotational update.
//!
//! Bodies are visited in registry order, so a host planet is always placed
//! before its moons. A failure on one body is logged and skipped; the rest
//! of the frame carries on.

use chrono::{DateTime, Utc};
use glam::DVec3;
use log::warn;

use crate::api::error::SimError;
use crate::api::sinks::DisplaySink;
use crate::api::types::BodyId;
use crate::components::body::{BodyKind, CelestialBody, AU_KM};
use crate::core::registry::BodyRegistry;
use crate::core::state::SimulationState;
use crate::ephemeris::{EphemerisProvider, SceneFrame};

/// Where a body is this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: DVec3,
    /// Vector from the parent (Sun or host planet) to the body, AU.
    pub from_parent_au: DVec3,
    /// The moon's relative vector could not be resolved and was zeroed.
    pub degraded: bool,
}

/// Compute a body's scene position for `date`.
pub fn place_body(
    body: &CelestialBody,
    parent_name: Option<&str>,
    provider: &dyn EphemerisProvider,
    frame: &SceneFrame,
    date: DateTime<Utc>,
) -> Result<Placement, SimError> {
    match &body.kind {
        BodyKind::Star => Ok(Placement {
            position: DVec3::ZERO,
            from_parent_au: DVec3::ZERO,
            degraded: false,
        }),
        BodyKind::Planet { .. } => {
            let helio = provider.heliocentric_vector(&body.name, date)?;
            Ok(Placement {
                position: frame.to_scene(helio),
                from_parent_au: helio,
                degraded: false,
            })
        }
        BodyKind::Moon { parent, .. } => {
            let parent_name = parent_name.ok_or_else(|| SimError::UnknownBody(format!("{parent:?}")))?;
            let parent_helio = provider.heliocentric_vector(parent_name, date)?;
            let (rel, degraded) = match provider.relative_vector(&body.name, parent_name, date) {
                Ok(rel) => (rel, false),
                Err(err) if err.is_missing_ephemeris() => (DVec3::ZERO, true),
                Err(err) => return Err(err),
            };
            Ok(Placement {
                position: frame.to_scene(parent_helio + rel),
                from_parent_au: rel,
                degraded,
            })
        }
    }
}

/// Spin angle mapped to a Y rotation in [0, 2π).
pub fn spin_to_rotation_y(spin_deg: f64) -> f64 {
    spin_deg.rem_euclid(360.0).to_radians()
}

fn parent_name(registry: &BodyRegistry, id: BodyId) -> Option<String> {
    let parent = registry.get(id)?.parent()?;
    registry.get(parent).map(|p| p.name.clone())
}

/// Move and spin every body for `date`. Returns the number of bodies whose
/// update failed this frame.
pub fn update_bodies(
    registry: &mut BodyRegistry,
    provider: &dyn EphemerisProvider,
    frame: &SceneFrame,
    date: DateTime<Utc>,
    state: &SimulationState,
    display: &mut dyn DisplaySink,
) -> usize {
    let mut failures = 0;

    for index in 0..registry.len() {
        let id = BodyId(index as u32);
        let parent = parent_name(registry, id);
        let Some(body) = registry.get(id) else {
            continue;
        };
        let placement = place_body(body, parent.as_deref(), provider, frame, date);
        let spin = provider.rotation_axis_spin(&body.name, date);

        let Some(body) = registry.get_mut(id) else {
            continue;
        };
        match placement {
            Ok(placement) => {
                body.position = placement.position;
                if placement.degraded && !body.degraded {
                    warn!("{}: no relative ephemeris, holding at host position", body.name);
                    body.degraded = true;
                }
                if state.is_selected(id) {
                    let km = (placement.from_parent_au.length() * AU_KM).round();
                    body.distance_to_parent_km = Some(km);
                    display.show_distance(id, km);
                } else {
                    body.distance_to_parent_km = None;
                }
            }
            Err(err) => {
                failures += 1;
                if !body.degraded {
                    warn!("{}: position update failed: {err}", body.name);
                    body.degraded = true;
                }
            }
        }
        match spin {
            Ok(spin) => body.rotation_y = spin_to_rotation_y(spin.spin_deg),
            Err(err) => {
                if !body.degraded {
                    warn!("{}: spin update failed: {err}", body.name);
                    body.degraded = true;
                }
            }
        }
    }

    failures
}
