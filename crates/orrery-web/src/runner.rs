use orrery_engine::{
    BodyCatalog, Command, FrameBuffer, InputEvent, InputQueue, Outbox, SimConfig, SimError, SimEvent, Simulation,
};

/// Owns the simulation plus everything the browser reads back each frame.
///
/// The bridge keeps one runner in a `thread_local!` and exposes free
/// functions via `#[wasm_bindgen]`. JS reads the flat buffers through the
/// pointer accessors after each `tick`.
pub struct SimulationRunner {
    sim: Simulation,
    input: InputQueue,
    outbox: Outbox,
    frame: FrameBuffer,
    /// Flattened notifications from the last tick.
    events: Vec<SimEvent>,
    /// Click kinds from the last tick, one byte each.
    clicks: Vec<u8>,
    resource_failures: u32,
}

impl SimulationRunner {
    pub fn new(config: SimConfig, catalog: &BodyCatalog) -> Result<Self, SimError> {
        let sim = Simulation::new(config, catalog)?;
        let mut runner = Self {
            sim,
            input: InputQueue::new(),
            outbox: Outbox::new(),
            frame: FrameBuffer::new(),
            events: Vec::with_capacity(16),
            clicks: Vec::with_capacity(4),
            resource_failures: 0,
        };
        runner.sim.render(&mut runner.frame);
        Ok(runner)
    }

    /// Parse JSON config, falling back to defaults field by field.
    pub fn from_json(config_json: &str) -> Result<Self, SimError> {
        let config = SimConfig::from_json(config_json)?;
        Self::new(config, &BodyCatalog::builtin())
    }

    /// Like [`from_json`](Self::from_json), with a custom body catalog.
    pub fn from_json_with_catalog(config_json: &str, catalog_json: &str) -> Result<Self, SimError> {
        let config = SimConfig::from_json(config_json)?;
        let catalog = BodyCatalog::from_json(catalog_json)?;
        Self::new(config, &catalog)
    }

    /// A presentation-side asset (texture, font) failed to load. Counted and
    /// handed back for the page to report; the simulation keeps running
    /// without it.
    pub fn resource_failed(&mut self, resource: &str, reason: &str) -> SimError {
        self.resource_failures += 1;
        log::debug!("resource failure #{}: {resource}", self.resource_failures);
        SimError::ResourceUnavailable {
            resource: resource.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn resource_failures(&self) -> u32 {
        self.resource_failures
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    pub fn command(&mut self, command: Command) {
        self.input.command(command);
    }

    /// Run one frame: drain input, advance, rebuild buffers.
    pub fn tick(&mut self, dt: f32) {
        // Clear per-frame transient data
        self.outbox.clear_frame_data();

        self.sim.tick(dt, &mut self.input, &mut self.outbox);
        self.sim.render(&mut self.frame);

        self.outbox.write_events(&mut self.events);
        self.clicks.clear();
        self.clicks.extend(self.outbox.clicks.iter().map(|&kind| kind as u8));
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn date_text(&self) -> &str {
        &self.outbox.date_text
    }

    pub fn body_names(&self) -> Vec<String> {
        self.sim.registry().iter().map(|b| b.name.clone()).collect()
    }

    pub fn selected_index(&self) -> i32 {
        self.sim.selection().map(|id| id.0 as i32).unwrap_or(-1)
    }

    pub fn speed(&self) -> f64 {
        self.sim.time().speed()
    }

    pub fn is_playing(&self) -> bool {
        self.sim.time().is_playing()
    }

    // ---- Pointer accessors for buffer reads ----

    pub fn bodies_ptr(&self) -> *const f32 {
        self.frame.bodies_ptr()
    }

    pub fn body_count(&self) -> u32 {
        self.frame.body_count()
    }

    pub fn labels_ptr(&self) -> *const f32 {
        self.frame.labels_ptr()
    }

    pub fn label_count(&self) -> u32 {
        self.frame.label_count()
    }

    pub fn line_vertices_ptr(&self) -> *const f32 {
        self.frame.line_vertices_ptr()
    }

    pub fn line_vertex_count(&self) -> u32 {
        self.frame.line_vertex_count()
    }

    pub fn line_ranges_ptr(&self) -> *const u32 {
        self.frame.line_ranges_ptr()
    }

    pub fn line_range_count(&self) -> u32 {
        self.frame.line_range_count()
    }

    pub fn camera_ptr(&self) -> *const f32 {
        self.frame.camera_ptr()
    }

    /// Scene-space origin the frame's positions are relative to.
    pub fn frame_origin(&self) -> [f64; 3] {
        self.frame.origin
    }

    pub fn events_ptr(&self) -> *const f32 {
        self.events.as_ptr() as *const f32
    }

    pub fn events_len(&self) -> u32 {
        self.events.len() as u32
    }

    pub fn clicks_ptr(&self) -> *const u8 {
        self.clicks.as_ptr()
    }

    pub fn clicks_len(&self) -> u32 {
        self.clicks.len() as u32
    }
}
