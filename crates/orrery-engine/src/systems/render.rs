use glam::DVec3;

use crate::camera::perspective::PerspectiveCamera;
use crate::components::body::BodyKind;
use crate::core::registry::BodyRegistry;
use crate::core::state::SimulationState;
use crate::renderer::instance::{BodyInstance, FrameBuffer, LabelInstance, LineRange, LineVertex};

/// Build the frame buffer from the registry.
/// All positions are rebased on the camera target so f32 keeps precision
/// around the focused body. Moons (and their lines) are skipped while the
/// moon toggle is off.
pub fn build_frame(registry: &BodyRegistry, camera: &PerspectiveCamera, state: &SimulationState, frame: &mut FrameBuffer) {
    frame.clear();

    let origin = camera.target;
    frame.origin = origin.to_array();
    frame.camera = camera.uniform(origin);
    let local = |p: DVec3| (p - origin).as_vec3();

    for body in registry.iter() {
        if body.is_moon() && !state.toggles.moons {
            continue;
        }
        let p = local(body.position);
        let kind = match body.kind {
            BodyKind::Star => 0.0,
            BodyKind::Planet { .. } => 1.0,
            BodyKind::Moon { .. } => 2.0,
        };
        frame.bodies.push(BodyInstance {
            x: p.x,
            y: p.y,
            z: p.z,
            radius: body.radius as f32,
            rotation_y: body.rotation_y as f32,
            body_index: body.id.0 as f32,
            selected: if body.is_selected { 1.0 } else { 0.0 },
            kind,
        });

        if body.label.visible {
            let lp = local(body.label.position);
            let q = body.label.rotation.as_quat();
            frame.labels.push(LabelInstance {
                x: lp.x,
                y: lp.y,
                z: lp.z,
                scale: body.label.scale as f32,
                rotation: q.to_array(),
                body_index: body.id.0 as f32,
                _pad: [0.0; 3],
            });
        }

        let Some(orbit) = body.orbit() else {
            continue;
        };
        if !orbit.visible || !orbit.is_built() {
            continue;
        }
        let first = frame.line_vertices.len() as u32;
        let highlight = if body.is_selected { 1.0 } else { 0.0 };
        frame.line_vertices.extend(orbit.points.iter().map(|&point| {
            let v = local(point);
            LineVertex { x: v.x, y: v.y, z: v.z, highlight }
        }));
        frame.line_ranges.push(LineRange {
            first,
            count: orbit.points.len() as u32,
            owner: body.id.0,
            _pad: 0,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::catalog::BodyCatalog;
    use crate::assets::config::SimConfig;

    fn setup() -> (BodyRegistry, PerspectiveCamera) {
        let config = SimConfig::default();
        let registry = BodyRegistry::from_catalog(&BodyCatalog::builtin(), &config).unwrap();
        (registry, PerspectiveCamera::from_config(&config))
    }

    #[test]
    fn every_body_emits_an_instance() {
        let (registry, camera) = setup();
        let mut frame = FrameBuffer::new();
        build_frame(&registry, &camera, &SimulationState::default(), &mut frame);
        assert_eq!(frame.body_count() as usize, registry.len());
        assert_eq!(frame.bodies[0].kind, 0.0);
        // no lines built yet
        assert_eq!(frame.line_range_count(), 0);
    }

    #[test]
    fn moons_skipped_when_hidden() {
        let (registry, camera) = setup();
        let mut state = SimulationState::default();
        state.toggles.moons = false;
        let mut frame = FrameBuffer::new();
        build_frame(&registry, &camera, &state, &mut frame);
        let moons = registry.iter().filter(|b| b.is_moon()).count();
        assert_eq!(frame.body_count() as usize, registry.len() - moons);
        assert!(frame.bodies.iter().all(|b| b.kind != 2.0));
    }

    #[test]
    fn positions_are_rebased_on_target() {
        let (mut registry, mut camera) = setup();
        let earth = registry.find_by_name("Earth").unwrap().id;
        registry.get_mut(earth).unwrap().position = DVec3::new(1000.25, 0.0, 0.0);
        camera.target = DVec3::new(1000.0, 0.0, 0.0);
        let mut frame = FrameBuffer::new();
        build_frame(&registry, &camera, &SimulationState::default(), &mut frame);
        let inst = frame.bodies[earth.index()];
        assert_eq!(inst.x, 0.25);
        assert_eq!(frame.origin, [1000.0, 0.0, 0.0]);
    }

    #[test]
    fn built_line_gets_a_range() {
        let (mut registry, camera) = setup();
        let earth = registry.find_by_name("Earth").unwrap().id;
        {
            let body = registry.get_mut(earth).unwrap();
            body.is_selected = true;
            let p = DVec3::X;
            body.orbit_mut().unwrap().replace(vec![p, DVec3::Z, DVec3::NEG_X, p]);
        }
        let mut frame = FrameBuffer::new();
        build_frame(&registry, &camera, &SimulationState::default(), &mut frame);
        assert_eq!(frame.line_ranges, vec![LineRange { first: 0, count: 4, owner: earth.0, _pad: 0 }]);
        assert!(frame.line_vertices.iter().all(|v| v.highlight == 1.0));
    }
}
