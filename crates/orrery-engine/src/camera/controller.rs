//! Free / tracking camera state machine with orbit-control gestures.
//!
//! In tracking mode the camera keeps a fixed offset from a moving body and
//! the orbit target follows the body, so relative gestures keep working.
//! A pointer drag overrides tracking until released; the offset is then
//! recomputed from wherever the user left the camera.

use glam::DVec3;
use log::debug;

use crate::api::error::SimError;
use crate::api::types::BodyId;
use crate::assets::config::SimConfig;
use crate::camera::perspective::{PerspectiveCamera, Ray};
use crate::camera::zoom::{ZoomAnimation, ZoomToken};
use crate::core::registry::BodyRegistry;
use crate::extensions::easing::Easing;

/// Keeps the orbit gesture off the poles.
const POLAR_EPSILON: f64 = 1e-6;
/// Pan speed per pixel, per unit of target distance.
const PAN_SPEED: f64 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraMode {
    Free,
    Tracking { body: BodyId, offset: DVec3 },
}

#[derive(Debug, Clone)]
struct ControllerSettings {
    min_distance_factor: f64,
    zoom_distance_factor: f64,
    zoom_steps: u32,
    zoom_step_seconds: f32,
    zoom_easing: Easing,
    rotate_speed: f64,
    zoom_speed: f64,
    free_min_distance: f64,
    max_distance: f64,
    home: DVec3,
}

pub struct CameraController {
    pub camera: PerspectiveCamera,
    mode: CameraMode,
    min_distance: f64,
    dragging: bool,
    zoom: Option<ZoomAnimation>,
    next_token: u32,
    settings: ControllerSettings,
}

impl CameraController {
    pub fn new(config: &SimConfig) -> Self {
        let settings = ControllerSettings {
            min_distance_factor: config.min_distance_factor,
            zoom_distance_factor: config.zoom_distance_factor,
            zoom_steps: config.zoom_steps,
            zoom_step_seconds: config.zoom_step_seconds,
            zoom_easing: config.zoom_easing,
            rotate_speed: config.rotate_speed,
            zoom_speed: config.zoom_speed,
            free_min_distance: config.near * 10.0,
            max_distance: config.max_distance,
            home: DVec3::from_array(config.initial_camera_position),
        };
        Self {
            camera: PerspectiveCamera::from_config(config),
            mode: CameraMode::Free,
            min_distance: settings.free_min_distance,
            dragging: false,
            zoom: None,
            next_token: 1,
            settings,
        }
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    /// Body currently tracked, if any.
    pub fn focused(&self) -> Option<BodyId> {
        match self.mode {
            CameraMode::Tracking { body, .. } => Some(body),
            CameraMode::Free => None,
        }
    }

    pub fn offset(&self) -> Option<DVec3> {
        match self.mode {
            CameraMode::Tracking { offset, .. } => Some(offset),
            CameraMode::Free => None,
        }
    }

    pub fn min_distance(&self) -> f64 {
        self.min_distance
    }

    pub fn max_distance(&self) -> f64 {
        self.settings.max_distance
    }

    pub fn zoom(&self) -> Option<&ZoomAnimation> {
        self.zoom.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn distance_to_target(&self) -> f64 {
        self.camera.distance_to_target()
    }

    // -- Transitions --

    /// Enter tracking mode on `id`, keeping the current distance to target.
    /// Unknown ids leave the camera untouched.
    pub fn center_on(&mut self, id: BodyId, registry: &BodyRegistry) -> Result<(), SimError> {
        let body = registry.get(id).ok_or(SimError::InvalidSelectionTarget(id))?;
        self.cancel_any_zoom();

        let min_distance = body.radius * self.settings.min_distance_factor;
        let previous = self.camera.distance_to_target();
        let distance = if previous > 0.0 { previous } else { min_distance };

        let direction = (self.camera.position - body.position)
            .try_normalize()
            .or_else(|| (self.camera.position - self.camera.target).try_normalize())
            .unwrap_or(DVec3::Z);

        self.camera.position = body.position + direction * distance;
        self.camera.target = body.position;
        let offset = self.camera.position - body.position;
        self.mode = CameraMode::Tracking { body: id, offset };
        self.min_distance = min_distance;
        debug!("tracking {} at distance {distance:.6}", body.name);
        Ok(())
    }

    /// Back to free mode. The camera stays where it is.
    pub fn release_focus(&mut self) {
        self.cancel_any_zoom();
        if let CameraMode::Tracking { body, .. } = self.mode {
            debug!("released focus on {body:?}");
        }
        self.mode = CameraMode::Free;
        self.min_distance = self.settings.free_min_distance;
    }

    /// Start an animated dolly toward `zoom_distance_factor` radii of `id`.
    /// Returns `None` (and leaves the camera alone) if already that close.
    pub fn zoom_to(&mut self, id: BodyId, registry: &BodyRegistry) -> Result<Option<ZoomToken>, SimError> {
        let body = registry.get(id).ok_or(SimError::InvalidSelectionTarget(id))?;
        let target_distance = body.radius * self.settings.zoom_distance_factor;
        if self.camera.position.distance(body.position) <= target_distance {
            return Ok(None);
        }
        if self.focused() != Some(id) {
            self.center_on(id, registry)?;
        }
        self.cancel_any_zoom();
        let current = self.camera.position.distance(body.position);

        let token = ZoomToken(self.next_token);
        self.next_token = self.next_token.wrapping_add(1);
        self.zoom = Some(ZoomAnimation::new(
            token,
            id,
            current,
            target_distance,
            self.settings.zoom_steps,
            self.settings.zoom_step_seconds,
            self.settings.zoom_easing,
        ));
        debug!("zoom {token:?} on {} from {current:.6} to {target_distance:.6}", body.name);
        Ok(Some(token))
    }

    /// Cancel the zoom owned by `token`. Stale tokens are ignored.
    pub fn cancel_zoom(&mut self, token: ZoomToken) -> bool {
        if self.zoom.as_ref().map(|z| z.token) != Some(token) {
            return false;
        }
        self.zoom = None;
        debug!("zoom {token:?} cancelled");
        true
    }

    fn cancel_any_zoom(&mut self) {
        if let Some(zoom) = self.zoom.take() {
            debug!("zoom {:?} cancelled by new transition", zoom.token);
        }
    }

    /// Recompute the tracking min distance after the focused body's display
    /// radius changed.
    pub fn refresh_min_distance(&mut self, registry: &BodyRegistry) {
        if let Some(body) = self.focused().and_then(|id| registry.get(id)) {
            self.min_distance = body.radius * self.settings.min_distance_factor;
        }
    }

    /// Free mode at the configured home pose.
    pub fn reset_view(&mut self) {
        self.release_focus();
        self.dragging = false;
        self.camera.position = self.settings.home;
        self.camera.target = DVec3::ZERO;
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.camera.resize(width, height);
    }

    // -- Per frame --

    /// Advance the zoom and re-apply the tracking offset.
    pub fn update(&mut self, real_dt: f32, registry: &BodyRegistry) {
        if let Some(zoom) = &mut self.zoom {
            if let Some(distance) = zoom.advance(real_dt) {
                if let CameraMode::Tracking { body, offset } = &mut self.mode {
                    if *body == zoom.body {
                        *offset = offset.try_normalize().unwrap_or(DVec3::Z) * distance;
                    }
                }
            }
            if zoom.is_finished() {
                debug!("zoom {:?} finished", zoom.token);
                self.zoom = None;
            }
        }

        let CameraMode::Tracking { body, offset } = self.mode else {
            return;
        };
        match registry.get(body) {
            Some(focus) => {
                if !self.dragging {
                    self.camera.position = focus.position + offset;
                }
                self.camera.target = focus.position;
            }
            None => self.release_focus(),
        }
    }

    // -- Gestures --

    pub fn begin_drag(&mut self) {
        self.dragging = true;
    }

    /// End an interactive override; tracking resumes from the new pose.
    pub fn end_drag(&mut self) {
        self.dragging = false;
        self.sync_offset();
    }

    fn sync_offset(&mut self) {
        if let CameraMode::Tracking { offset, .. } = &mut self.mode {
            *offset = self.camera.position - self.camera.target;
        }
    }

    /// Rotate around the target by a pointer delta in pixels.
    pub fn orbit(&mut self, dx: f64, dy: f64) {
        let rel = self.camera.position - self.camera.target;
        let radius = rel.length();
        if radius <= 0.0 {
            return;
        }
        let theta = rel.x.atan2(rel.z) - dx * self.settings.rotate_speed;
        let phi = ((rel.y / radius).clamp(-1.0, 1.0).acos() - dy * self.settings.rotate_speed)
            .clamp(POLAR_EPSILON, std::f64::consts::PI - POLAR_EPSILON);
        let (sin_phi, cos_phi) = phi.sin_cos();
        let (sin_theta, cos_theta) = theta.sin_cos();
        self.camera.position =
            self.camera.target + DVec3::new(sin_phi * sin_theta, cos_phi, sin_phi * cos_theta) * radius;
        if !self.dragging {
            self.sync_offset();
        }
    }

    /// Move toward (negative delta) or away from the target.
    /// Interrupts an in-flight zoom.
    pub fn dolly(&mut self, delta: f64) {
        self.cancel_any_zoom();
        let rel = self.camera.position - self.camera.target;
        let Some(dir) = rel.try_normalize() else {
            return;
        };
        let distance = (rel.length() * (1.0 + self.settings.zoom_speed).powf(delta))
            .clamp(self.min_distance, self.settings.max_distance.max(self.min_distance));
        self.camera.position = self.camera.target + dir * distance;
        if !self.dragging {
            self.sync_offset();
        }
    }

    /// Slide camera and target in the view plane. Free mode only: a tracked
    /// target is pinned to its body.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        if self.focused().is_some() {
            return;
        }
        let scale = self.camera.distance_to_target() * PAN_SPEED;
        let shift = (self.camera.right() * -dx + self.camera.camera_up() * dy) * scale;
        self.camera.position += shift;
        self.camera.target += shift;
    }

    pub fn pick_ray(&self, screen_x: f64, screen_y: f64) -> Ray {
        self.camera.pick_ray(screen_x, screen_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::catalog::BodyCatalog;

    fn setup() -> (CameraController, BodyRegistry, BodyId) {
        let config = SimConfig::default();
        let mut registry = BodyRegistry::from_catalog(&BodyCatalog::builtin(), &config).unwrap();
        let earth = registry.find_by_name("Earth").unwrap().id;
        registry.get_mut(earth).unwrap().position = DVec3::new(1000.0, 0.0, 0.0);
        (CameraController::new(&config), registry, earth)
    }

    fn approx(a: DVec3, b: DVec3) -> bool {
        (a - b).length() < 1e-9 * (1.0 + a.length().max(b.length()))
    }

    #[test]
    fn center_on_preserves_distance_to_target() {
        let (mut ctl, registry, earth) = setup();
        for start in [DVec3::new(0.0, 3000.0, 6000.0), DVec3::new(1000.5, 0.2, -3.0), DVec3::new(-40.0, 0.0, 0.0)] {
            ctl.reset_view();
            ctl.camera.position = start;
            let before = ctl.distance_to_target();
            ctl.center_on(earth, &registry).unwrap();
            let after = ctl.distance_to_target();
            assert!((after - before).abs() < 1e-9 * before, "{before} vs {after}");
            assert_eq!(ctl.camera.target, DVec3::new(1000.0, 0.0, 0.0));
        }
    }

    #[test]
    fn center_on_records_offset_and_min_distance() {
        let (mut ctl, registry, earth) = setup();
        // target at the origin, camera equidistant from origin and Earth
        ctl.camera.position = DVec3::new(500.0, 2000.0, 0.0);
        let before = ctl.camera.position;
        ctl.center_on(earth, &registry).unwrap();

        let body = registry.get(earth).unwrap();
        assert!(approx(ctl.offset().unwrap(), before - body.position));
        assert!((ctl.min_distance() - 1.1 * body.radius).abs() < 1e-15);
        assert_eq!(ctl.focused(), Some(earth));
    }

    #[test]
    fn invalid_target_leaves_camera_untouched() {
        let (mut ctl, registry, _) = setup();
        let before = ctl.camera.clone();
        let err = ctl.center_on(BodyId(999), &registry).unwrap_err();
        assert!(matches!(err, SimError::InvalidSelectionTarget(BodyId(999))));
        assert_eq!(ctl.camera, before);
        assert_eq!(ctl.mode(), CameraMode::Free);
    }

    #[test]
    fn tracking_follows_moving_body() {
        let (mut ctl, mut registry, earth) = setup();
        ctl.center_on(earth, &registry).unwrap();
        let offset = ctl.offset().unwrap();

        registry.get_mut(earth).unwrap().position = DVec3::new(990.0, 5.0, 140.0);
        ctl.update(1.0 / 60.0, &registry);
        let body = registry.get(earth).unwrap().position;
        assert!(approx(ctl.camera.position - body, offset));
        assert_eq!(ctl.camera.target, body);
    }

    #[test]
    fn drag_overrides_tracking_until_release() {
        let (mut ctl, mut registry, earth) = setup();
        ctl.center_on(earth, &registry).unwrap();

        ctl.begin_drag();
        ctl.orbit(120.0, -40.0);
        let dragged = ctl.camera.position;
        registry.get_mut(earth).unwrap().position += DVec3::new(1.0, 0.0, 0.0);
        ctl.update(1.0 / 60.0, &registry);
        assert_eq!(ctl.camera.position, dragged);

        ctl.end_drag();
        let offset = ctl.offset().unwrap();
        assert!(approx(offset, dragged - ctl.camera.target));
        ctl.update(1.0 / 60.0, &registry);
        let body = registry.get(earth).unwrap().position;
        assert!(approx(ctl.camera.position, body + offset));
    }

    #[test]
    fn release_keeps_camera_in_place() {
        let (mut ctl, mut registry, earth) = setup();
        ctl.center_on(earth, &registry).unwrap();
        let pos = ctl.camera.position;
        ctl.release_focus();
        registry.get_mut(earth).unwrap().position = DVec3::ZERO;
        ctl.update(0.1, &registry);
        assert_eq!(ctl.camera.position, pos);
        assert_eq!(ctl.mode(), CameraMode::Free);
    }

    #[test]
    fn zoom_is_noop_when_close() {
        let (mut ctl, registry, earth) = setup();
        let body = registry.get(earth).unwrap();
        ctl.camera.position = body.position + DVec3::new(0.0, 0.0, body.radius * 2.0);
        ctl.camera.target = body.position;
        ctl.center_on(earth, &registry).unwrap();
        let before = ctl.camera.position;
        assert_eq!(ctl.zoom_to(earth, &registry).unwrap(), None);
        ctl.update(1.0, &registry);
        assert!(approx(ctl.camera.position, before));
    }

    #[test]
    fn zoom_animates_to_three_radii() {
        let (mut ctl, registry, earth) = setup();
        ctl.center_on(earth, &registry).unwrap();
        let token = ctl.zoom_to(earth, &registry).unwrap().unwrap();
        assert_eq!(ctl.zoom().unwrap().token, token);

        let start = ctl.camera.position.distance(registry.get(earth).unwrap().position);
        ctl.update(1.0 / 60.0, &registry);
        let body = registry.get(earth).unwrap();
        let mid = ctl.camera.position.distance(body.position);
        assert!(mid < start && mid > 3.0 * body.radius);

        for _ in 0..60 {
            ctl.update(1.0 / 60.0, &registry);
        }
        assert!(ctl.zoom().is_none());
        let end = ctl.camera.position.distance(body.position);
        assert!((end - 3.0 * body.radius).abs() < 1e-9);
    }

    #[test]
    fn new_transition_cancels_zoom() {
        let (mut ctl, registry, earth) = setup();
        ctl.center_on(earth, &registry).unwrap();
        let token = ctl.zoom_to(earth, &registry).unwrap().unwrap();
        let mars = registry.find_by_name("Mars").unwrap().id;
        ctl.center_on(mars, &registry).unwrap();
        assert!(ctl.zoom().is_none());
        assert!(!ctl.cancel_zoom(token));
    }

    #[test]
    fn cancel_by_token() {
        let (mut ctl, registry, earth) = setup();
        ctl.center_on(earth, &registry).unwrap();
        let token = ctl.zoom_to(earth, &registry).unwrap().unwrap();
        assert!(!ctl.cancel_zoom(ZoomToken(token.0 + 100)));
        assert!(ctl.cancel_zoom(token));
        assert!(ctl.zoom().is_none());
    }

    #[test]
    fn dolly_respects_min_distance() {
        let (mut ctl, registry, earth) = setup();
        ctl.center_on(earth, &registry).unwrap();
        for _ in 0..500 {
            ctl.dolly(-1.0);
        }
        assert!((ctl.distance_to_target() - ctl.min_distance()).abs() < 1e-9);
        for _ in 0..500 {
            ctl.dolly(1.0);
        }
        assert!((ctl.distance_to_target() - ctl.max_distance()).abs() < 1e-6);
    }

    #[test]
    fn orbit_keeps_radius_and_avoids_poles() {
        let (mut ctl, _, _) = setup();
        let r = ctl.distance_to_target();
        ctl.orbit(0.0, 1e6);
        assert!((ctl.distance_to_target() - r).abs() < 1e-6);
        assert!(ctl.camera.orientation().is_finite());
    }

    #[test]
    fn pan_is_ignored_while_tracking() {
        let (mut ctl, registry, earth) = setup();
        ctl.pan(10.0, 10.0);
        assert_ne!(ctl.camera.target, DVec3::ZERO);
        ctl.center_on(earth, &registry).unwrap();
        let target = ctl.camera.target;
        ctl.pan(10.0, 10.0);
        assert_eq!(ctl.camera.target, target);
    }

    #[test]
    fn resize_does_not_touch_tracking() {
        let (mut ctl, registry, earth) = setup();
        ctl.center_on(earth, &registry).unwrap();
        let mode = ctl.mode();
        ctl.resize(800.0, 800.0);
        assert_eq!(ctl.mode(), mode);
        assert_eq!(ctl.camera.aspect, 1.0);
    }
}
