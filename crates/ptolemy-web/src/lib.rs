pub mod runner;

pub use runner::SimulationRunner;

use std::cell::RefCell;

use ptolemy_engine::{Controls, PlanetType, PlanetaryParameters, SimulationConfig};
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<SimulationRunner>> = const { RefCell::new(None) };
}

/// Run `f` against the live runner. `None` (and a warning) before `sim_init`.
fn with_runner<R>(f: impl FnOnce(&mut SimulationRunner) -> R) -> Option<R> {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        match borrow.as_mut() {
            Some(runner) => Some(f(runner)),
            None => {
                log::warn!("simulation not initialized; call sim_init() first");
                None
            }
        }
    })
}

/// Build the simulation from a JSON config. An empty string uses the defaults.
/// Returns false (and keeps any previous simulation) if the config is rejected.
#[wasm_bindgen]
pub fn sim_init(config_json: &str) -> bool {
    console_error_panic_hook::set_once();

    let config = if config_json.trim().is_empty() {
        Ok(SimulationConfig::default())
    } else {
        SimulationConfig::from_json(config_json)
    };
    let config = match config {
        Ok(config) => config,
        Err(err) => {
            let _ = console_log::init_with_level(log::Level::Info);
            log::error!("invalid simulation config: {}", err);
            return false;
        }
    };

    // Validated above, so the level always parses.
    if let Some(level) = config.level_filter().ok().and_then(|f| f.to_level()) {
        let _ = console_log::init_with_level(level);
    }

    match SimulationRunner::new(&config) {
        Ok(runner) => {
            RUNNER.with(|cell| *cell.borrow_mut() = Some(runner));
            log::info!("ptolemy: initialized");
            true
        }
        Err(err) => {
            log::error!("simulation init failed: {}", err);
            false
        }
    }
}

/// Advance from a `requestAnimationFrame` timestamp.
#[wasm_bindgen]
pub fn sim_frame(timestamp_ms: f64) -> bool {
    with_runner(|r| r.frame(timestamp_ms)).unwrap_or(false)
}

/// Advance using the wall clock.
#[wasm_bindgen]
pub fn sim_frame_now() -> bool {
    sim_frame(js_sys::Date::now())
}

#[wasm_bindgen]
pub fn sim_tick(delta_ms: f64) -> bool {
    with_runner(|r| r.tick(delta_ms)).unwrap_or(false)
}

/// `planet_type`: 0 = superior, 1 = inferior.
#[wasm_bindgen]
pub fn sim_set_parameters(
    epicycle_size: f64,
    eccentricity: f64,
    motion_rate: f64,
    apogee_angle: f64,
    planet_type: u32,
) -> bool {
    let Some(planet_type) = PlanetType::from_code(planet_type) else {
        log::warn!("unknown planet type code {}", planet_type);
        return false;
    };
    let parameters = PlanetaryParameters {
        epicycle_size,
        eccentricity,
        motion_rate,
        apogee_angle,
        planet_type,
    };
    with_runner(|r| r.set_parameters(parameters)).unwrap_or(false)
}

#[wasm_bindgen]
pub fn sim_set_controls(
    is_animation_enabled: bool,
    animation_rate: f64,
    path_visible_fraction: f64,
) -> bool {
    let controls = Controls {
        is_animation_enabled,
        animation_rate,
        path_visible_fraction,
    };
    with_runner(|r| r.set_controls(controls)).unwrap_or(false)
}

#[wasm_bindgen]
pub fn sim_apply_preset(name: &str) -> bool {
    with_runner(|r| r.apply_preset(name)).unwrap_or(false)
}

#[wasm_bindgen]
pub fn sim_load_presets(json: &str) -> bool {
    with_runner(|r| r.load_presets(json)).unwrap_or(false)
}

#[wasm_bindgen]
pub fn sim_preset_names() -> js_sys::Array {
    with_runner(|r| r.preset_names())
        .unwrap_or_default()
        .into_iter()
        .map(JsValue::from)
        .collect()
}

#[wasm_bindgen]
pub fn sim_set_animation_enabled(enabled: bool) {
    with_runner(|r| r.set_animation_enabled(enabled));
}

/// Returns the new enabled state.
#[wasm_bindgen]
pub fn sim_toggle_animation() -> bool {
    with_runner(|r| r.toggle_animation()).unwrap_or(false)
}

#[wasm_bindgen]
pub fn sim_reset() -> bool {
    with_runner(|r| r.reset()).unwrap_or(false)
}

#[wasm_bindgen]
pub fn sim_snapshot_json() -> String {
    with_runner(|r| r.snapshot_json()).unwrap_or_default()
}

// ---- Frame buffer accessors ----

#[wasm_bindgen]
pub fn get_frame_ptr() -> *const f32 {
    with_runner(|r| r.frame_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_trail_ptr() -> *const f32 {
    with_runner(|r| r.trail_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_buffer_total_floats() -> u32 {
    with_runner(|r| r.buffer_total_floats()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_trail_offset() -> u32 {
    with_runner(|r| r.trail_offset()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_sample_count() -> u32 {
    with_runner(|r| r.sample_count()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_visible_count() -> u32 {
    with_runner(|r| r.visible_count()).unwrap_or(0)
}

// ---- Scalar accessors ----

#[wasm_bindgen]
pub fn get_current_time() -> f64 {
    with_runner(|r| r.current_time()).unwrap_or(0.0)
}

#[wasm_bindgen]
pub fn get_sun_longitude() -> f64 {
    with_runner(|r| r.sun_longitude()).unwrap_or(0.0)
}

#[wasm_bindgen]
pub fn get_ecliptic_longitude() -> f64 {
    with_runner(|r| r.ecliptic_longitude()).unwrap_or(0.0)
}

#[wasm_bindgen]
pub fn get_elapsed_years() -> f64 {
    with_runner(|r| r.elapsed_years() as f64).unwrap_or(0.0)
}

#[wasm_bindgen]
pub fn get_elapsed_days() -> f64 {
    with_runner(|r| r.elapsed_days() as f64).unwrap_or(0.0)
}

#[wasm_bindgen]
pub fn get_animation_enabled() -> bool {
    with_runner(|r| r.is_animation_enabled()).unwrap_or(false)
}
