pub mod runner;

pub use runner::SimulationRunner;

use std::cell::RefCell;

use orrery_engine::{BodyCatalog, BodyId, Command, InputEvent, SimConfig};
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<SimulationRunner>> = const { RefCell::new(None) };
}

/// Run `f` against the live runner. Calls made before `sim_init` are
/// logged and answered with `R::default()`.
fn with_runner<R: Default>(f: impl FnOnce(&mut SimulationRunner) -> R) -> R {
    RUNNER.with(|cell| match cell.borrow_mut().as_mut() {
        Some(runner) => f(runner),
        None => {
            log::warn!("simulation not initialized, call sim_init() first");
            R::default()
        }
    })
}

fn install(runner: SimulationRunner) {
    RUNNER.with(|cell| *cell.borrow_mut() = Some(runner));
}

fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Start with default settings and the built-in catalog.
#[wasm_bindgen]
pub fn sim_init() -> Result<(), JsValue> {
    init_logging();
    let runner = SimulationRunner::new(SimConfig::default(), &BodyCatalog::builtin())
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    install(runner);
    log::info!("orrery: initialized");
    Ok(())
}

/// Start with a JSON config. A config that does not parse is logged and
/// replaced by the defaults.
#[wasm_bindgen]
pub fn sim_init_with_config(config_json: &str) -> Result<(), JsValue> {
    init_logging();
    let runner = match SimulationRunner::from_json(config_json) {
        Ok(runner) => runner,
        Err(err) => {
            log::error!("config rejected ({err}), using defaults");
            SimulationRunner::new(SimConfig::default(), &BodyCatalog::builtin())
                .map_err(|e| JsValue::from_str(&e.to_string()))?
        }
    };
    install(runner);
    log::info!("orrery: initialized with config");
    Ok(())
}

/// Start with a JSON config and a JSON body catalog. Either failing to
/// parse is an error; nothing is installed.
#[wasm_bindgen]
pub fn sim_init_with_catalog(config_json: &str, catalog_json: &str) -> Result<(), JsValue> {
    init_logging();
    let runner = SimulationRunner::from_json_with_catalog(config_json, catalog_json).map_err(|e| {
        log::error!("catalog rejected: {e}");
        JsValue::from_str(&e.to_string())
    })?;
    install(runner);
    log::info!("orrery: initialized with custom catalog");
    Ok(())
}

#[wasm_bindgen]
pub fn sim_tick(dt: f32) {
    with_runner(|r| r.tick(dt));
}

// ---- Pointer and viewport ----

#[wasm_bindgen]
pub fn sim_pointer_down(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerDown { x, y }));
}

#[wasm_bindgen]
pub fn sim_pointer_up(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerUp { x, y }));
}

#[wasm_bindgen]
pub fn sim_pointer_move(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerMove { x, y }));
}

#[wasm_bindgen]
pub fn sim_wheel(delta: f32) {
    with_runner(|r| r.push_input(InputEvent::Wheel { delta }));
}

#[wasm_bindgen]
pub fn sim_resize(width: f32, height: f32) {
    with_runner(|r| r.push_input(InputEvent::Resize { width, height }));
}

// ---- UI commands ----

#[wasm_bindgen]
pub fn sim_toggle_play_pause() {
    with_runner(|r| r.command(Command::TogglePlayPause));
}

#[wasm_bindgen]
pub fn sim_set_speed(multiplier: f64) {
    with_runner(|r| r.command(Command::SetSpeed(multiplier)));
}

#[wasm_bindgen]
pub fn sim_set_rate(speed: f64) {
    with_runner(|r| r.command(Command::SetRate(speed)));
}

#[wasm_bindgen]
pub fn sim_set_date(text: &str) {
    with_runner(|r| r.command(Command::SetDateText(text.to_string())));
}

/// Select by body index; a negative index clears the selection.
#[wasm_bindgen]
pub fn sim_select(index: i32) {
    let id = u32::try_from(index).ok().map(BodyId);
    with_runner(|r| r.command(Command::Select(id)));
}

#[wasm_bindgen]
pub fn sim_select_by_name(name: &str) {
    with_runner(|r| r.command(Command::SelectByName(name.to_string())));
}

#[wasm_bindgen]
pub fn sim_set_moons_visible(on: bool) {
    with_runner(|r| r.command(Command::SetMoonsVisible(on)));
}

#[wasm_bindgen]
pub fn sim_set_labels_visible(on: bool) {
    with_runner(|r| r.command(Command::SetLabelsVisible(on)));
}

#[wasm_bindgen]
pub fn sim_set_orbit_lines_visible(on: bool) {
    with_runner(|r| r.command(Command::SetOrbitLinesVisible(on)));
}

#[wasm_bindgen]
pub fn sim_set_relative_size(on: bool) {
    with_runner(|r| r.command(Command::SetRelativeSize(on)));
}

#[wasm_bindgen]
pub fn sim_reset_view() {
    with_runner(|r| r.command(Command::ResetView));
}

/// Report a texture or font that failed to load on the JS side. The
/// failure goes to the browser console; the simulation is not touched.
#[wasm_bindgen]
pub fn sim_resource_failed(resource: &str, reason: &str) {
    let reported = with_runner(|r| Some(r.resource_failed(resource, reason)));
    if let Some(err) = reported {
        web_sys::console::warn_2(&JsValue::from_str("orrery:"), &JsValue::from_str(&err.to_string()));
    }
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_bodies_ptr() -> *const f32 {
    with_runner(|r| Some(r.bodies_ptr())).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_body_count() -> u32 {
    with_runner(|r| r.body_count())
}

#[wasm_bindgen]
pub fn get_labels_ptr() -> *const f32 {
    with_runner(|r| Some(r.labels_ptr())).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_label_count() -> u32 {
    with_runner(|r| r.label_count())
}

#[wasm_bindgen]
pub fn get_line_vertices_ptr() -> *const f32 {
    with_runner(|r| Some(r.line_vertices_ptr())).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_line_vertex_count() -> u32 {
    with_runner(|r| r.line_vertex_count())
}

#[wasm_bindgen]
pub fn get_line_ranges_ptr() -> *const u32 {
    with_runner(|r| Some(r.line_ranges_ptr())).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_line_range_count() -> u32 {
    with_runner(|r| r.line_range_count())
}

#[wasm_bindgen]
pub fn get_camera_ptr() -> *const f32 {
    with_runner(|r| Some(r.camera_ptr())).unwrap_or(std::ptr::null())
}

/// Scene origin of the current frame as `[x, y, z]`.
#[wasm_bindgen]
pub fn get_frame_origin() -> Vec<f64> {
    with_runner(|r| r.frame_origin().to_vec())
}

#[wasm_bindgen]
pub fn get_events_ptr() -> *const f32 {
    with_runner(|r| Some(r.events_ptr())).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_events_len() -> u32 {
    with_runner(|r| r.events_len())
}

#[wasm_bindgen]
pub fn get_clicks_ptr() -> *const u8 {
    with_runner(|r| Some(r.clicks_ptr())).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_clicks_len() -> u32 {
    with_runner(|r| r.clicks_len())
}

#[wasm_bindgen]
pub fn get_date_text() -> String {
    with_runner(|r| r.date_text().to_string())
}

#[wasm_bindgen]
pub fn get_selected_index() -> i32 {
    with_runner(|r| Some(r.selected_index())).unwrap_or(-1)
}

#[wasm_bindgen]
pub fn get_speed() -> f64 {
    with_runner(|r| r.speed())
}

#[wasm_bindgen]
pub fn get_is_playing() -> bool {
    with_runner(|r| r.is_playing())
}

/// Body names in index order, for the selection list.
#[wasm_bindgen]
pub fn get_body_names() -> js_sys::Array {
    let names = with_runner(|r| r.body_names());
    names.into_iter().map(|n| JsValue::from_str(&n)).collect()
}
