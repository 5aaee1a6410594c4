use ptolemy_engine::{
    Controls, FrameBuffer, PlanetaryParameters, PresetTable, SimResult, Simulation, SimulationConfig,
};

/// Owns one simulation and the frame buffer the renderer reads.
///
/// The crate root keeps a single runner in a `thread_local!` and exports free
/// functions via `#[wasm_bindgen]` that borrow it for the duration of a call.
pub struct SimulationRunner {
    sim: Simulation,
    frame: FrameBuffer,
}

impl SimulationRunner {
    pub fn new(config: &SimulationConfig) -> SimResult<Self> {
        let sim = Simulation::new(config)?;
        let mut frame = FrameBuffer::for_simulation(&sim);
        frame.write(&sim);
        Ok(Self { sim, frame })
    }

    /// Advance from an animation-frame timestamp. Returns false if the tick
    /// was rejected; the previous frame stays in the buffer.
    pub fn frame(&mut self, timestamp_ms: f64) -> bool {
        let ok = self.sim.frame(timestamp_ms).is_ok();
        self.commit(ok)
    }

    /// Advance by a measured delta in milliseconds.
    pub fn tick(&mut self, delta_ms: f64) -> bool {
        let ok = self.sim.tick(delta_ms).is_ok();
        self.commit(ok)
    }

    fn commit(&mut self, ok: bool) -> bool {
        if ok {
            self.frame.write(&self.sim);
        }
        ok
    }

    pub fn reset(&mut self) -> bool {
        match self.sim.reset() {
            Ok(()) => {
                self.frame.write(&self.sim);
                true
            }
            Err(err) => {
                log::error!("reset failed: {}", err);
                false
            }
        }
    }

    pub fn set_parameters(&mut self, parameters: PlanetaryParameters) -> bool {
        let ok = self.sim.set_parameters(parameters).is_ok();
        // Epicycle radius lives in the header.
        self.commit(ok)
    }

    pub fn set_controls(&mut self, controls: Controls) -> bool {
        let ok = self.sim.set_controls(controls).is_ok();
        // Visible count lives in the header.
        self.commit(ok)
    }

    pub fn set_animation_enabled(&mut self, enabled: bool) {
        self.sim.set_animation_enabled(enabled);
        self.frame.write(&self.sim);
    }

    pub fn toggle_animation(&mut self) -> bool {
        let enabled = self.sim.toggle_animation();
        self.frame.write(&self.sim);
        enabled
    }

    pub fn apply_preset(&mut self, name: &str) -> bool {
        match self.sim.apply_preset(name) {
            Ok(()) => self.commit(true),
            Err(err) => {
                log::warn!("preset {:?} not applied: {}", name, err);
                false
            }
        }
    }

    pub fn load_presets(&mut self, json: &str) -> bool {
        match PresetTable::from_json(json) {
            Ok(table) => {
                log::info!("loaded {} presets", table.presets.len());
                self.sim.set_presets(table);
                true
            }
            Err(err) => {
                log::warn!("preset table rejected: {}", err);
                false
            }
        }
    }

    pub fn preset_names(&self) -> Vec<String> {
        self.sim.presets().names().map(str::to_string).collect()
    }

    pub fn snapshot_json(&self) -> String {
        match self.sim.snapshot().to_json() {
            Ok(json) => json,
            Err(err) => {
                log::error!("snapshot failed: {}", err);
                String::new()
            }
        }
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    // ---- Pointer accessors for direct memory reads ----

    pub fn frame_ptr(&self) -> *const f32 {
        self.frame.ptr()
    }

    pub fn trail_ptr(&self) -> *const f32 {
        self.frame.trail_ptr()
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.frame.layout().buffer_total_floats as u32
    }

    pub fn trail_offset(&self) -> u32 {
        self.frame.layout().trail_data_offset as u32
    }

    pub fn sample_count(&self) -> u32 {
        self.frame.layout().sample_count as u32
    }

    pub fn visible_count(&self) -> u32 {
        self.sim.tracer().visible_count() as u32
    }

    // ---- Scalar accessors ----

    pub fn current_time(&self) -> f64 {
        self.sim.current_time()
    }

    pub fn sun_longitude(&self) -> f64 {
        self.sim.positions().sun_longitude
    }

    pub fn ecliptic_longitude(&self) -> f64 {
        self.sim.positions().ecliptic_longitude
    }

    pub fn elapsed_years(&self) -> i64 {
        self.sim.elapsed().years
    }

    pub fn elapsed_days(&self) -> i64 {
        self.sim.elapsed().days
    }

    pub fn is_animation_enabled(&self) -> bool {
        self.sim.controls().is_animation_enabled
    }
}
