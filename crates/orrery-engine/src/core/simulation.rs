//! The scene loop.
//!
//! [`Simulation`] owns every piece of state and runs one frame per
//! [`tick`](Simulation::tick): queued input first, then the clock, body
//! motion, label billboarding and finally the camera. Labels therefore face
//! the camera pose of the previous frame.

use chrono::{DateTime, Utc};
use glam::DVec3;
use log::{debug, info, warn};

use crate::api::error::SimError;
use crate::api::sinks::{CoreSinks, Outbox};
use crate::api::types::{BodyId, ClickKind};
use crate::assets::catalog::BodyCatalog;
use crate::assets::config::SimConfig;
use crate::camera::controller::CameraController;
use crate::components::body::{CelestialBody, SizeMode};
use crate::core::clock::{parse_date_input, TimeController};
use crate::core::registry::BodyRegistry;
use crate::core::state::{SimulationState, VisibilityToggles};
use crate::ephemeris::{EphemerisProvider, KeplerEphemeris, SceneFrame};
use crate::input::queue::{Command, InputEvent, InputQueue};
use crate::renderer::instance::FrameBuffer;
use crate::systems::labels::{update_labels, LabelSettings};
use crate::systems::motion::update_bodies;
use crate::systems::orbit_lines::refresh_orbit_lines;
use crate::systems::render::build_frame;

/// Screen-space slack for clicking bodies smaller than a few pixels.
const PICK_TOLERANCE_PX: f64 = 6.0;

#[derive(Debug, Default)]
struct PointerState {
    down: Option<(f32, f32)>,
    last: (f32, f32),
    dragging: bool,
}

pub struct Simulation {
    config: SimConfig,
    registry: BodyRegistry,
    ephemeris: Box<dyn EphemerisProvider>,
    frame: SceneFrame,
    time: TimeController,
    camera: CameraController,
    state: SimulationState,
    labels: LabelSettings,
    pointer: PointerState,
}

impl Simulation {
    /// Build the scene from `catalog` with the built-in Keplerian ephemeris.
    pub fn new(config: SimConfig, catalog: &BodyCatalog) -> Result<Self, SimError> {
        let ephemeris = KeplerEphemeris::from_catalog(catalog);
        Self::with_ephemeris(config, catalog, Box::new(ephemeris))
    }

    /// Build the scene against any ephemeris provider.
    pub fn with_ephemeris(
        config: SimConfig,
        catalog: &BodyCatalog,
        ephemeris: Box<dyn EphemerisProvider>,
    ) -> Result<Self, SimError> {
        let registry = BodyRegistry::from_catalog(catalog, &config)?;
        let start = match config.start_date.as_deref() {
            Some(text) => parse_date_input(text)?,
            None => Utc::now(),
        };

        let mut sim = Self {
            frame: SceneFrame::from_config(&config),
            time: TimeController::new(start, config.default_speed),
            camera: CameraController::new(&config),
            state: SimulationState::new(&config),
            labels: LabelSettings::from_config(&config),
            pointer: PointerState::default(),
            registry,
            ephemeris,
            config,
        };

        // Startup placement. Readouts go nowhere until the first tick.
        let mut discard = Outbox::new();
        let failures = update_bodies(
            &mut sim.registry,
            sim.ephemeris.as_ref(),
            &sim.frame,
            start,
            &sim.state,
            &mut discard,
        );
        let lines = sim.refresh_lines();
        sim.relabel();
        info!(
            "simulation ready: {} bodies, {lines} orbit lines, {failures} degraded, starting {}",
            sim.registry.len(),
            start
        );
        Ok(sim)
    }

    // -- Accessors --

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn registry(&self) -> &BodyRegistry {
        &self.registry
    }

    pub fn time(&self) -> &TimeController {
        &self.time
    }

    pub fn current_date(&self) -> DateTime<Utc> {
        self.time.current_date()
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut CameraController {
        &mut self.camera
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn selection(&self) -> Option<BodyId> {
        self.state.selection
    }

    pub fn toggles(&self) -> VisibilityToggles {
        self.state.toggles
    }

    pub fn body(&self, id: BodyId) -> Option<&CelestialBody> {
        self.registry.get(id)
    }

    // -- Frame --

    /// Run one frame of `real_dt` seconds.
    pub fn tick<S: CoreSinks>(&mut self, real_dt: f32, input: &mut InputQueue, sinks: &mut S) {
        for event in input.drain() {
            self.handle_event(event, sinks);
        }

        self.time.update(real_dt as f64, sinks);
        update_bodies(
            &mut self.registry,
            self.ephemeris.as_ref(),
            &self.frame,
            self.time.current_date(),
            &self.state,
            sinks,
        );
        self.relabel();
        self.camera.update(real_dt, &self.registry);
    }

    /// Fill `out` with this frame's render data.
    pub fn render(&self, out: &mut FrameBuffer) {
        build_frame(&self.registry, &self.camera.camera, &self.state, out);
    }

    fn relabel(&mut self) {
        update_labels(&mut self.registry, &self.camera.camera, &self.state, &self.labels);
    }

    fn refresh_lines(&mut self) -> usize {
        refresh_orbit_lines(
            &mut self.registry,
            self.ephemeris.as_ref(),
            &self.frame,
            self.time.current_date(),
            &self.state,
            self.camera.camera.position,
            self.config.orbit_line_max_distance,
        )
    }

    // -- Input --

    fn handle_event<S: CoreSinks>(&mut self, event: InputEvent, sinks: &mut S) {
        match event {
            InputEvent::PointerDown { x, y } => {
                self.pointer = PointerState {
                    down: Some((x, y)),
                    last: (x, y),
                    dragging: false,
                };
            }
            InputEvent::PointerMove { x, y } => self.pointer_moved(x, y),
            InputEvent::PointerUp { x, y } => self.pointer_released(x, y, sinks),
            InputEvent::Wheel { delta } => self.camera.dolly(delta as f64),
            InputEvent::Resize { width, height } => self.camera.resize(width as f64, height as f64),
            InputEvent::Command(command) => self.apply_command(command, sinks),
        }
    }

    fn pointer_moved(&mut self, x: f32, y: f32) {
        let Some((down_x, down_y)) = self.pointer.down else {
            self.pointer.last = (x, y);
            return;
        };
        if !self.pointer.dragging {
            let moved = ((x - down_x).powi(2) + (y - down_y).powi(2)).sqrt();
            if moved <= self.config.drag_threshold_px {
                return;
            }
            self.pointer.dragging = true;
            self.camera.begin_drag();
        }
        let (last_x, last_y) = self.pointer.last;
        self.camera.orbit((x - last_x) as f64, (y - last_y) as f64);
        self.pointer.last = (x, y);
    }

    fn pointer_released<S: CoreSinks>(&mut self, x: f32, y: f32, sinks: &mut S) {
        let pointer = std::mem::take(&mut self.pointer);
        if pointer.dragging {
            self.camera.end_drag();
            return;
        }
        if pointer.down.is_none() {
            return;
        }
        // Clicking empty space keeps the current selection.
        if let Some(id) = self.pick(x as f64, y as f64) {
            if let Err(err) = self.select_object(Some(id), sinks) {
                warn!("click selection failed: {err}");
            }
        }
    }

    fn apply_command<S: CoreSinks>(&mut self, command: Command, sinks: &mut S) {
        let result = match command {
            Command::TogglePlayPause => {
                self.toggle_play_pause(sinks);
                Ok(())
            }
            Command::SetSpeed(multiplier) => {
                self.set_speed(multiplier, sinks);
                Ok(())
            }
            Command::SetRate(speed) => {
                self.set_rate(speed);
                Ok(())
            }
            Command::SetDateText(text) => self.set_current_date_text(&text, sinks),
            Command::Select(id) => self.select_object(id, sinks),
            Command::SelectByName(name) => self.select_by_name(&name, sinks),
            Command::SetMoonsVisible(on) => {
                self.set_moons_visible(on, sinks);
                Ok(())
            }
            Command::SetLabelsVisible(on) => {
                self.set_labels_visible(on, sinks);
                Ok(())
            }
            Command::SetOrbitLinesVisible(on) => {
                self.set_orbit_lines_visible(on, sinks);
                Ok(())
            }
            Command::SetRelativeSize(on) => {
                let mode = if on { SizeMode::Relative } else { SizeMode::Real };
                self.set_size_mode(mode, sinks);
                Ok(())
            }
            Command::ResetView => {
                self.reset_view(sinks);
                Ok(())
            }
        };
        if let Err(err) = result {
            warn!("command ignored: {err}");
        }
    }

    /// Body under viewport pixel (x, y). A true ray hit wins (nearest
    /// first); otherwise the body closest to the ray on screen, within a
    /// few pixels.
    pub fn pick(&self, screen_x: f64, screen_y: f64) -> Option<BodyId> {
        let camera = &self.camera.camera;
        let ray = camera.pick_ray(screen_x, screen_y);
        let mut hit: Option<(f64, BodyId)> = None;
        let mut near: Option<(f64, BodyId)> = None;

        for body in self.registry.iter() {
            if body.is_moon() && !self.state.toggles.moons {
                continue;
            }
            if let Some(t) = ray.intersect_sphere(body.position, body.radius) {
                if hit.map_or(true, |(best, _)| t < best) {
                    hit = Some((t, body.id));
                }
                continue;
            }
            let (t, miss) = ray.closest_approach(body.position);
            if t <= 0.0 {
                continue;
            }
            let pixels = miss / camera.world_per_pixel(t);
            if pixels <= PICK_TOLERANCE_PX && near.map_or(true, |(best, _)| pixels < best) {
                near = Some((pixels, body.id));
            }
        }
        hit.or(near).map(|(_, id)| id)
    }

    // -- Selection --

    /// Select `id`, or clear the selection with `None`.
    ///
    /// Selecting the already-selected body starts the animated zoom instead.
    /// A new body deselects the previous one, centres the camera on it and
    /// rebuilds the orbit lines.
    pub fn select_object<S: CoreSinks>(&mut self, id: Option<BodyId>, sinks: &mut S) -> Result<(), SimError> {
        let Some(id) = id else {
            self.clear_selection(sinks);
            return Ok(());
        };
        if self.registry.get(id).is_none() {
            return Err(SimError::InvalidSelectionTarget(id));
        }

        if self.state.selection == Some(id) {
            match self.camera.zoom_to(id, &self.registry)? {
                Some(token) => debug!("reselected {id:?}, zoom {token:?}"),
                None => debug!("reselected {id:?}, already close"),
            }
            sinks.click(ClickKind::Selection);
            return Ok(());
        }

        if let Some(old) = self.state.selection.take() {
            self.mark_selected(old, false);
        }
        self.mark_selected(id, true);
        self.state.selection = Some(id);
        self.camera.center_on(id, &self.registry)?;
        self.refresh_lines();

        let body = self.registry.get(id);
        if let Some(body) = body {
            info!("selected {}", body.name);
        }
        sinks.on_selection_changed(body);
        sinks.click(ClickKind::Selection);
        Ok(())
    }

    pub fn select_by_name<S: CoreSinks>(&mut self, name: &str, sinks: &mut S) -> Result<(), SimError> {
        let id = self
            .registry
            .find_by_name(name)
            .map(|b| b.id)
            .ok_or_else(|| SimError::UnknownBody(name.to_string()))?;
        self.select_object(Some(id), sinks)
    }

    fn clear_selection<S: CoreSinks>(&mut self, sinks: &mut S) {
        let Some(old) = self.state.selection.take() else {
            return;
        };
        self.mark_selected(old, false);
        self.camera.release_focus();
        debug!("selection cleared");
        sinks.on_selection_changed(None);
    }

    fn mark_selected(&mut self, id: BodyId, selected: bool) {
        if let Some(body) = self.registry.get_mut(id) {
            body.is_selected = selected;
            if !selected {
                body.distance_to_parent_km = None;
            }
        }
    }

    // -- Time --

    pub fn toggle_play_pause<S: CoreSinks>(&mut self, sinks: &mut S) {
        self.time.toggle_play_pause();
        sinks.click(ClickKind::Toggle);
    }

    pub fn set_speed<S: CoreSinks>(&mut self, multiplier: f64, sinks: &mut S) {
        self.time.set_speed(multiplier);
        sinks.click(ClickKind::Toggle);
    }

    pub fn set_rate(&mut self, speed: f64) {
        self.time.set_rate(speed);
    }

    /// Jump to `date`. Positions, orbit lines and the tracking camera
    /// reflect the new date before this returns.
    pub fn set_current_date<S: CoreSinks>(&mut self, date: DateTime<Utc>, sinks: &mut S) {
        let registry = &mut self.registry;
        let ephemeris = self.ephemeris.as_ref();
        let frame = &self.frame;
        let state = &self.state;
        self.time.set_current_date(date, sinks, |clock, display| {
            update_bodies(registry, ephemeris, frame, clock.current_date, state, display);
        });
        self.camera.update(0.0, &self.registry);
        self.refresh_lines();
        self.relabel();
    }

    /// Parse user-entered date text and jump to it. Malformed text leaves
    /// the clock untouched.
    pub fn set_current_date_text<S: CoreSinks>(&mut self, text: &str, sinks: &mut S) -> Result<(), SimError> {
        let date = parse_date_input(text)?;
        self.set_current_date(date, sinks);
        Ok(())
    }

    // -- Visibility --

    pub fn set_moons_visible<S: CoreSinks>(&mut self, visible: bool, sinks: &mut S) {
        self.state.toggles.moons = visible;
        self.refresh_lines();
        self.relabel();
        sinks.click(ClickKind::Settings);
    }

    pub fn set_labels_visible<S: CoreSinks>(&mut self, visible: bool, sinks: &mut S) {
        self.state.toggles.labels = visible;
        self.relabel();
        sinks.click(ClickKind::Settings);
    }

    pub fn set_orbit_lines_visible<S: CoreSinks>(&mut self, visible: bool, sinks: &mut S) {
        self.state.toggles.orbit_lines = visible;
        self.refresh_lines();
        sinks.click(ClickKind::Settings);
    }

    /// Switch between true and exaggerated radii. The tracking floor moves
    /// with the focused body's new radius.
    pub fn set_size_mode<S: CoreSinks>(&mut self, mode: SizeMode, sinks: &mut S) {
        self.state.toggles.size_mode = mode;
        for body in self.registry.iter_mut() {
            body.apply_size_mode(mode, &self.config);
        }
        self.camera.refresh_min_distance(&self.registry);
        self.relabel();
        sinks.click(ClickKind::Settings);
    }

    // -- View --

    /// Clear the selection and return the camera to its home pose.
    pub fn reset_view<S: CoreSinks>(&mut self, sinks: &mut S) {
        self.clear_selection(sinks);
        self.camera.reset_view();
        self.pointer = PointerState::default();
        self.refresh_lines();
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.camera.resize(width, height);
    }

    /// Scene position of `id`, if it exists.
    pub fn position_of(&self, id: BodyId) -> Option<DVec3> {
        self.registry.get(id).map(|b| b.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::sinks::Notification;
    use crate::camera::controller::CameraMode;
    use crate::systems::motion::place_body;
    use chrono::{Duration, TimeZone};

    fn config() -> SimConfig {
        SimConfig {
            start_date: Some("2024-03-20T00:00:00Z".to_string()),
            ..SimConfig::default()
        }
    }

    fn sim() -> Simulation {
        Simulation::new(config(), &BodyCatalog::builtin()).unwrap()
    }

    fn id(sim: &Simulation, name: &str) -> BodyId {
        sim.registry().find_by_name(name).unwrap().id
    }

    fn d0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 20, 0, 0, 0).unwrap()
    }

    #[test]
    fn starts_at_configured_date_with_bodies_placed() {
        let sim = sim();
        assert_eq!(sim.current_date(), d0());
        let earth = sim.body(id(&sim, "Earth")).unwrap();
        // ~1 AU at 1000 units per AU
        assert!((earth.position.length() - 996.0).abs() < 10.0);
        assert!(sim.registry().iter().filter(|b| !b.is_moon() && !b.is_star()).all(|b| {
            b.orbit().is_some_and(|o| o.is_built())
        }));
    }

    #[test]
    fn bad_start_date_is_rejected() {
        let config = SimConfig {
            start_date: Some("yesterday".to_string()),
            ..SimConfig::default()
        };
        let err = Simulation::new(config, &BodyCatalog::builtin()).err().unwrap();
        assert!(matches!(err, SimError::MalformedDateInput { .. }));
    }

    #[test]
    fn one_second_tick_advances_one_second() {
        let mut sim = sim();
        let mut out = Outbox::new();
        sim.tick(1.0, &mut InputQueue::new(), &mut out);
        assert_eq!(sim.current_date(), d0() + Duration::milliseconds(1000));
        assert_eq!(out.date_text, "2024-03-20 00:00:01");
    }

    #[test]
    fn speed_commands_compound() {
        let mut sim = sim();
        let mut input = InputQueue::new();
        let mut out = Outbox::new();
        for _ in 0..3 {
            input.command(Command::SetSpeed(10.0));
        }
        sim.tick(0.0, &mut input, &mut out);
        assert_eq!(sim.time().speed(), 1000.0);
        assert_eq!(out.clicks, vec![ClickKind::Toggle; 3]);

        input.command(Command::TogglePlayPause);
        sim.tick(0.0, &mut input, &mut out);
        assert_eq!(sim.time().speed(), 1.0);
        assert!(!sim.time().is_playing());
    }

    #[test]
    fn select_centres_camera_preserving_distance() {
        let mut sim = sim();
        let earth = id(&sim, "Earth");
        let a = sim.position_of(earth).unwrap();
        // equidistant from the origin target and from Earth
        let perp = a.cross(DVec3::Y).normalize();
        let p = a * 0.5 + perp * 3000.0;
        sim.camera_mut().camera.position = p;
        sim.camera_mut().camera.target = DVec3::ZERO;

        let mut out = Outbox::new();
        sim.select_object(Some(earth), &mut out).unwrap();

        let CameraMode::Tracking { body, offset } = sim.camera().mode() else {
            panic!("expected tracking");
        };
        assert_eq!(body, earth);
        assert!((offset - (p - a)).length() < 1e-6);
        let radius = sim.body(earth).unwrap().radius;
        assert!((sim.camera().min_distance() - 1.1 * radius).abs() < 1e-12);
        assert!(sim.body(earth).unwrap().is_selected);
        assert_eq!(out.last_selection(), Some(Some(earth)));
        assert_eq!(out.clicks, vec![ClickKind::Selection]);
    }

    #[test]
    fn selecting_another_body_moves_the_highlight() {
        let mut sim = sim();
        let mut out = Outbox::new();
        let earth = id(&sim, "Earth");
        let mars = id(&sim, "Mars");
        sim.select_object(Some(earth), &mut out).unwrap();
        sim.select_object(Some(mars), &mut out).unwrap();
        assert!(!sim.body(earth).unwrap().is_selected);
        assert!(sim.body(mars).unwrap().is_selected);
        assert_eq!(sim.camera().focused(), Some(mars));
        let selected = sim.registry().iter().filter(|b| b.is_selected).count();
        assert_eq!(selected, 1);
    }

    #[test]
    fn reselect_when_close_is_a_noop() {
        let mut sim = sim();
        let mut out = Outbox::new();
        let earth = id(&sim, "Earth");
        sim.select_object(Some(earth), &mut out).unwrap();
        let body = sim.body(earth).unwrap();
        let close = body.position + DVec3::Z * body.radius * 2.0;
        sim.camera_mut().camera.position = close;

        sim.select_object(Some(earth), &mut out).unwrap();
        assert!(sim.camera().zoom().is_none());
        assert_eq!(sim.camera().camera.position, close);
    }

    #[test]
    fn reselect_zooms_to_three_radii() {
        let mut sim = sim();
        let mut out = Outbox::new();
        let earth = id(&sim, "Earth");
        sim.select_object(Some(earth), &mut out).unwrap();
        sim.select_object(Some(earth), &mut out).unwrap();
        assert!(sim.camera().zoom().is_some());

        sim.tick(0.01, &mut InputQueue::new(), &mut out);
        let radius = sim.body(earth).unwrap().radius;
        let mid = sim.camera().distance_to_target();
        assert!(mid > 3.0 * radius);

        // a single long frame does not snap to the target
        sim.tick(5.0, &mut InputQueue::new(), &mut out);
        assert!(sim.camera().zoom().is_some());
        assert!(sim.camera().distance_to_target() > 3.0 * radius);

        for _ in 0..60 {
            sim.tick(1.0 / 60.0, &mut InputQueue::new(), &mut out);
        }
        assert!(sim.camera().zoom().is_none());
        let done = sim.camera().distance_to_target();
        assert!((done - 3.0 * radius).abs() < 1e-9 * radius.max(1.0));
    }

    #[test]
    fn selecting_elsewhere_cancels_zoom() {
        let mut sim = sim();
        let mut out = Outbox::new();
        let earth = id(&sim, "Earth");
        sim.select_object(Some(earth), &mut out).unwrap();
        sim.select_object(Some(earth), &mut out).unwrap();
        assert!(sim.camera().zoom().is_some());
        sim.select_object(Some(id(&sim, "Venus")), &mut out).unwrap();
        assert!(sim.camera().zoom().is_none());
    }

    #[test]
    fn invalid_selection_leaves_everything_alone() {
        let mut sim = sim();
        let mut out = Outbox::new();
        let before = sim.camera().camera.clone();
        let err = sim.select_object(Some(BodyId(999)), &mut out).unwrap_err();
        assert!(matches!(err, SimError::InvalidSelectionTarget(BodyId(999))));
        assert_eq!(sim.camera().camera, before);
        assert_eq!(sim.selection(), None);
        assert!(out.notifications.is_empty());
    }

    #[test]
    fn clearing_selection_releases_camera() {
        let mut sim = sim();
        let mut out = Outbox::new();
        let earth = id(&sim, "Earth");
        sim.select_object(Some(earth), &mut out).unwrap();
        let pose = sim.camera().camera.position;
        sim.select_object(None, &mut out).unwrap();
        assert_eq!(sim.camera().mode(), CameraMode::Free);
        assert_eq!(sim.camera().camera.position, pose);
        assert!(!sim.body(earth).unwrap().is_selected);
        assert_eq!(out.last_selection(), Some(None));
    }

    #[test]
    fn select_by_unknown_name() {
        let mut sim = sim();
        let err = sim.select_by_name("Vulcan", &mut Outbox::new()).unwrap_err();
        assert!(matches!(err, SimError::UnknownBody(name) if name == "Vulcan"));
    }

    #[test]
    fn set_date_recomputes_and_keeps_play_state() {
        let mut sim = sim();
        let mut out = Outbox::new();
        sim.toggle_play_pause(&mut out);
        let target = Utc.with_ymd_and_hms(2031, 7, 4, 6, 0, 0).unwrap();
        sim.set_current_date(target, &mut out);
        assert_eq!(sim.current_date(), target);
        assert!(!sim.time().is_playing());

        let earth = sim.body(id(&sim, "Earth")).unwrap();
        let expected = place_body(earth, None, &KeplerEphemeris::from_catalog(&BodyCatalog::builtin()), &sim.frame, target)
            .unwrap()
            .position;
        assert_eq!(earth.position, expected);
        assert_eq!(out.date_text, "2031-07-04 06:00:00");
    }

    #[test]
    fn set_date_moves_tracking_camera_with_body() {
        let mut sim = sim();
        let mut out = Outbox::new();
        let mars = id(&sim, "Mars");
        sim.select_object(Some(mars), &mut out).unwrap();
        let offset = sim.camera().offset().unwrap();
        sim.set_current_date(d0() + Duration::days(200), &mut out);
        let body = sim.position_of(mars).unwrap();
        assert_eq!(sim.camera().camera.target, body);
        assert!((sim.camera().camera.position - (body + offset)).length() < 1e-9);
    }

    #[test]
    fn malformed_date_text_is_ignored() {
        let mut sim = sim();
        let mut input = InputQueue::new();
        let mut out = Outbox::new();
        input.command(Command::SetDateText("not a date".to_string()));
        sim.tick(0.0, &mut input, &mut out);
        assert_eq!(sim.current_date(), d0());

        input.command(Command::SetDateText("2025-01-01".to_string()));
        sim.tick(0.0, &mut input, &mut out);
        assert_eq!(sim.current_date(), Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn hiding_moons_drops_their_lines_and_labels() {
        let mut sim = sim();
        let mut out = Outbox::new();
        let moon = id(&sim, "Moon");
        // park the camera next to the Moon so its line and label exist
        sim.select_object(Some(id(&sim, "Earth")), &mut out).unwrap();
        let near = sim.position_of(moon).unwrap() + DVec3::Y * 20.0;
        sim.camera_mut().camera.position = near;
        sim.set_orbit_lines_visible(true, &mut out);
        assert!(sim.body(moon).unwrap().orbit().unwrap().is_built());

        sim.set_moons_visible(false, &mut out);
        let body = sim.body(moon).unwrap();
        assert!(!body.orbit().unwrap().is_built());
        assert!(!body.label.visible);
        assert!(out.clicks.ends_with(&[ClickKind::Settings, ClickKind::Settings]));
    }

    #[test]
    fn labels_toggle_applies_immediately() {
        let mut sim = sim();
        let mut out = Outbox::new();
        let sun = sim.registry().star().unwrap().id;
        assert!(sim.body(sun).unwrap().label.visible);
        sim.set_labels_visible(false, &mut out);
        assert!(sim.registry().iter().all(|b| !b.label.visible));
    }

    #[test]
    fn relative_size_moves_min_distance() {
        let mut sim = sim();
        let mut out = Outbox::new();
        let earth = id(&sim, "Earth");
        sim.select_object(Some(earth), &mut out).unwrap();
        let real = sim.body(earth).unwrap().radius;
        sim.set_size_mode(SizeMode::Relative, &mut out);
        let relative = sim.body(earth).unwrap().radius;
        assert!(relative > real);
        assert!((sim.camera().min_distance() - 1.1 * relative).abs() < 1e-12);
        assert_eq!(sim.toggles().size_mode, SizeMode::Relative);
    }

    #[test]
    fn click_on_body_selects_it() {
        let mut sim = sim();
        let mut out = Outbox::new();
        let jupiter = id(&sim, "Jupiter");
        // look straight at Jupiter, then let go of it
        sim.select_object(Some(jupiter), &mut out).unwrap();
        sim.select_object(None, &mut out).unwrap();
        let (w, h) = (sim.camera().camera.viewport_width, sim.camera().camera.viewport_height);
        assert_eq!(sim.pick(w / 2.0, h / 2.0), Some(jupiter));

        let (x, y) = ((w / 2.0) as f32, (h / 2.0) as f32);
        let mut input = InputQueue::new();
        input.push(InputEvent::PointerDown { x, y });
        input.push(InputEvent::PointerUp { x, y });
        sim.tick(0.0, &mut input, &mut out);
        assert_eq!(sim.selection(), Some(jupiter));
    }

    #[test]
    fn click_on_empty_space_keeps_selection() {
        let mut sim = sim();
        let mut out = Outbox::new();
        let earth = id(&sim, "Earth");
        sim.select_object(Some(earth), &mut out).unwrap();
        // straight up, away from the ecliptic
        sim.camera_mut().camera.position = sim.position_of(earth).unwrap() + DVec3::new(0.0, 0.0, 50.0);
        let mut input = InputQueue::new();
        input.push(InputEvent::PointerDown { x: 1.0, y: 1.0 });
        input.push(InputEvent::PointerUp { x: 1.0, y: 1.0 });
        sim.tick(0.0, &mut input, &mut out);
        assert_eq!(sim.selection(), Some(earth));
    }

    #[test]
    fn drag_orbits_without_selecting() {
        let mut sim = sim();
        let mut out = Outbox::new();
        let mut input = InputQueue::new();
        let start = sim.camera().camera.position;
        input.push(InputEvent::PointerDown { x: 100.0, y: 100.0 });
        input.push(InputEvent::PointerMove { x: 102.0, y: 100.0 });
        input.push(InputEvent::PointerMove { x: 160.0, y: 120.0 });
        input.push(InputEvent::PointerUp { x: 160.0, y: 120.0 });
        sim.tick(0.0, &mut input, &mut out);
        assert_ne!(sim.camera().camera.position, start);
        assert!((sim.camera().distance_to_target() - start.length()).abs() < 1e-6);
        assert_eq!(sim.selection(), None);
        assert!(!sim.camera().is_dragging());
    }

    #[test]
    fn reset_view_goes_home_and_clears_selection() {
        let mut sim = sim();
        let mut out = Outbox::new();
        sim.select_object(Some(id(&sim, "Saturn")), &mut out).unwrap();
        sim.reset_view(&mut out);
        assert_eq!(sim.selection(), None);
        assert_eq!(sim.camera().camera.position, DVec3::from_array(config().initial_camera_position));
        assert_eq!(sim.camera().camera.target, DVec3::ZERO);
    }

    #[test]
    fn selected_body_reports_distance_each_frame() {
        let mut sim = sim();
        let mut out = Outbox::new();
        let earth = id(&sim, "Earth");
        sim.select_object(Some(earth), &mut out).unwrap();
        out.clear_frame_data();
        sim.tick(0.016, &mut InputQueue::new(), &mut out);
        let reported = out.notifications.iter().find_map(|n| match n {
            Notification::Distance { body, distance_km } if *body == earth => Some(*distance_km),
            _ => None,
        });
        let km = reported.unwrap();
        assert!((km - 149_000_000.0).abs() < 2_000_000.0);
        assert_eq!(km, km.round());
    }

    #[test]
    fn render_emits_one_instance_per_visible_body() {
        let mut sim = sim();
        let mut frame = FrameBuffer::new();
        sim.render(&mut frame);
        assert_eq!(frame.body_count() as usize, sim.registry().len());
        sim.set_moons_visible(false, &mut Outbox::new());
        sim.render(&mut frame);
        let moons = sim.registry().iter().filter(|b| b.is_moon()).count();
        assert_eq!(frame.body_count() as usize, sim.registry().len() - moons);
    }
}
