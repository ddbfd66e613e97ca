use glam::DVec3;

use crate::api::types::BodyId;
use crate::assets::config::SimConfig;
use crate::camera::perspective::PerspectiveCamera;
use crate::core::registry::BodyRegistry;
use crate::core::state::SimulationState;

/// Label sizing and gating.
#[derive(Debug, Clone, Copy)]
pub struct LabelSettings {
    /// World-space label height per unit of camera distance.
    pub scale_per_distance: f64,
    /// Label height above the body centre, in body radii.
    pub offset_factor: f64,
    /// Moon labels hide beyond this camera distance.
    pub moon_max_distance: f64,
}

impl LabelSettings {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            scale_per_distance: config.label_scale,
            offset_factor: config.label_offset_factor,
            moon_max_distance: config.moon_label_max_distance,
        }
    }
}

/// Billboard every visible label toward `camera`.
///
/// Runs in two passes: non-moons first, then moons, whose visibility depends
/// on the already-decided visibility of their host's label.
pub fn update_labels(
    registry: &mut BodyRegistry,
    camera: &PerspectiveCamera,
    state: &SimulationState,
    settings: &LabelSettings,
) {
    let toggles = state.toggles;
    let orientation = camera.orientation();

    for body in registry.iter_mut().filter(|b| !b.is_moon()) {
        body.label.visible = toggles.labels;
    }

    for index in 0..registry.len() {
        let id = BodyId(index as u32);
        let Some(body) = registry.get(id) else {
            continue;
        };
        let visible = match body.parent() {
            Some(parent) => {
                let parent_label = registry.get(parent).is_some_and(|p| p.label.visible);
                toggles.labels
                    && toggles.moons
                    && parent_label
                    && camera.position.distance(body.position) < settings.moon_max_distance
            }
            None => continue,
        };
        if let Some(body) = registry.get_mut(id) {
            body.label.visible = visible;
        }
    }

    for body in registry.iter_mut().filter(|b| b.label.visible) {
        let distance = camera.position.distance(body.position);
        body.label.scale = distance * settings.scale_per_distance;
        body.label.rotation = orientation;
        body.label.position = body.position + DVec3::Y * body.radius * settings.offset_factor;
    }
}
