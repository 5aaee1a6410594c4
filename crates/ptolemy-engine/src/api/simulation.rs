use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::api::params::{Controls, PlanetaryParameters};
use crate::api::types::{ElapsedTime, PositionSet};
use crate::assets::presets::{self, PresetTable};
use crate::core::coords::{CoordinateMapper, DEFAULT_VIEW_HALF_WIDTH};
use crate::core::kinematics::{sanitize_delta, KinematicState, KinematicsEngine};
use crate::core::time::AnimationClock;
use crate::error::{ConfigError, SimResult};
use crate::systems::path_tracer::{PathTracer, DEFAULT_HISTORY_SIZE, DEFAULT_INTERPOLATION_FACTOR};

/// Configuration for one simulation instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Planet positions retained for the trail (default: 5000).
    pub history_size: usize,
    /// Interpolated trail points per history entry (default: 5).
    pub interpolation_factor: usize,
    /// Side of the square display area in display units (default: 600).
    pub canvas_side: f64,
    /// Half-width of the model window mapped onto the display (default: 4).
    pub view_half_width: f64,
    /// Longest delta `frame` derives from two timestamps, in ms (default: none).
    pub max_frame_delta_ms: Option<f64>,
    /// Starting planet parameters (default: Mars).
    pub parameters: PlanetaryParameters,
    /// Built-in preset name; when set, it replaces `parameters`.
    pub preset: Option<String>,
    /// Starting controls.
    pub controls: Controls,
    /// Log level for the browser console (default: "info").
    pub log_level: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            history_size: DEFAULT_HISTORY_SIZE,
            interpolation_factor: DEFAULT_INTERPOLATION_FACTOR,
            canvas_side: 600.0,
            view_half_width: DEFAULT_VIEW_HALF_WIDTH,
            max_frame_delta_ms: None,
            parameters: PlanetaryParameters::default(),
            preset: None,
            controls: Controls::default(),
            log_level: "info".to_string(),
        }
    }
}

impl SimulationConfig {
    /// Parse a config from a JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> SimResult<Self> {
        let config: SimulationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Number of interpolated trail points.
    pub fn sample_count(&self) -> usize {
        self.history_size.saturating_mul(self.interpolation_factor)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interpolation_factor == 0 {
            return Err(ConfigError::InterpolationFactor(0));
        }
        if self.history_size < 2 || self.sample_count() < 2 {
            return Err(ConfigError::TracerCapacity {
                history: self.history_size,
                samples: self.sample_count(),
            });
        }
        CoordinateMapper::new(self.canvas_side, self.view_half_width)?;
        self.starting_parameters()?.validate()?;
        self.controls.validate()?;
        self.level_filter()?;
        Ok(())
    }

    /// Parameters the simulation starts with.
    pub fn starting_parameters(&self) -> Result<PlanetaryParameters, ConfigError> {
        match &self.preset {
            Some(name) => presets::preset(name).ok_or_else(|| ConfigError::UnknownPreset(name.clone())),
            None => Ok(self.parameters),
        }
    }

    pub fn level_filter(&self) -> Result<log::LevelFilter, ConfigError> {
        self.log_level
            .parse()
            .map_err(|_| ConfigError::LogLevel(self.log_level.clone()))
    }
}

/// Serializable picture of the whole simulation after a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub parameters: PlanetaryParameters,
    pub controls: Controls,
    pub state: KinematicState,
    pub positions: PositionSet,
    pub elapsed: ElapsedTime,
    pub visible_count: usize,
    pub frame: u64,
}

impl Snapshot {
    pub fn to_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// One Ptolemaic model with its own integrator, trail, and clock.
/// Nothing is shared between instances.
pub struct Simulation {
    engine: KinematicsEngine,
    tracer: PathTracer,
    mapper: CoordinateMapper,
    clock: AnimationClock,
    presets: PresetTable,
    parameters: PlanetaryParameters,
    controls: Controls,
    positions: PositionSet,
    frame: u64,
}

impl Simulation {
    pub fn new(config: &SimulationConfig) -> SimResult<Self> {
        config.validate()?;
        let mapper = CoordinateMapper::new(config.canvas_side, config.view_half_width)?;
        let tracer = PathTracer::new(config.history_size, config.sample_count())?;

        let mut sim = Self {
            engine: KinematicsEngine::new(),
            tracer,
            mapper,
            clock: AnimationClock::new(config.max_frame_delta_ms),
            presets: PresetTable::default(),
            parameters: config.starting_parameters()?,
            controls: config.controls,
            positions: PositionSet::default(),
            frame: 0,
        };
        sim.tracer.set_visible_fraction(sim.controls.path_visible_fraction);
        sim.reset()?;
        log::info!(
            "simulation ready: history {}, trail samples {}, canvas {}",
            config.history_size,
            config.sample_count(),
            config.canvas_side
        );
        Ok(sim)
    }

    /// Advance by an already measured frame delta, in milliseconds.
    /// Negative or non-finite deltas count as zero; nothing is capped.
    pub fn tick(&mut self, delta_ms: f64) -> SimResult<&PositionSet> {
        self.step(sanitize_delta(delta_ms))
    }

    /// Advance from an animation-frame timestamp, in milliseconds.
    pub fn frame(&mut self, timestamp_ms: f64) -> SimResult<&PositionSet> {
        let delta = self.clock.frame(timestamp_ms);
        self.step(delta)
    }

    fn step(&mut self, delta_ms: f64) -> SimResult<&PositionSet> {
        // Paused ticks still run: positions follow parameter edits and the
        // trail keeps shrinking toward the planet.
        let positions = self.engine.physics_update(delta_ms, &self.parameters, &self.controls)?;
        self.positions = positions;
        let display = self.mapper.to_display(positions.planet);
        self.tracer.add_location(display.x, display.y);
        self.frame += 1;
        Ok(&self.positions)
    }

    /// Zero the integrators and collapse the trail onto the planet.
    pub fn reset(&mut self) -> SimResult<()> {
        self.engine.reset();
        self.positions = self.engine.positions(&self.parameters)?;
        let display = self.mapper.to_display(self.positions.planet);
        self.tracer.initialize(display.x, display.y);
        log::info!("simulation reset");
        Ok(())
    }

    /// Replace the planet parameters. Invalid input is rejected and the
    /// previous parameters stay in effect.
    pub fn set_parameters(&mut self, parameters: PlanetaryParameters) -> Result<(), ConfigError> {
        if let Err(err) = parameters.validate() {
            log::warn!("rejected parameter change: {}", err);
            return Err(err);
        }
        self.parameters = parameters;
        Ok(())
    }

    /// Replace the controls. Invalid input is rejected and the previous
    /// controls stay in effect.
    pub fn set_controls(&mut self, controls: Controls) -> Result<(), ConfigError> {
        if let Err(err) = controls.validate() {
            log::warn!("rejected control change: {}", err);
            return Err(err);
        }
        self.controls = controls;
        self.tracer.set_visible_fraction(controls.path_visible_fraction);
        Ok(())
    }

    pub fn set_animation_enabled(&mut self, enabled: bool) {
        self.controls.is_animation_enabled = enabled;
    }

    pub fn toggle_animation(&mut self) -> bool {
        self.controls.is_animation_enabled = !self.controls.is_animation_enabled;
        self.controls.is_animation_enabled
    }

    /// Load a named preset. Keeps the integrator state, so the planet
    /// continues from where it was.
    pub fn apply_preset(&mut self, name: &str) -> Result<(), ConfigError> {
        let parameters = self.presets.require(name)?;
        self.set_parameters(parameters)?;
        log::info!("preset {} applied", name);
        Ok(())
    }

    /// Swap in a custom preset table (see `PresetTable::from_json`).
    pub fn set_presets(&mut self, presets: PresetTable) {
        self.presets = presets;
    }

    pub fn presets(&self) -> &PresetTable {
        &self.presets
    }

    pub fn parameters(&self) -> &PlanetaryParameters {
        &self.parameters
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    pub fn state(&self) -> &KinematicState {
        self.engine.state()
    }

    /// Positions from the last completed tick (or reset).
    pub fn positions(&self) -> &PositionSet {
        &self.positions
    }

    pub fn current_time(&self) -> f64 {
        self.engine.state().current_time
    }

    pub fn elapsed(&self) -> ElapsedTime {
        ElapsedTime::from_years(self.current_time())
    }

    pub fn tracer(&self) -> &PathTracer {
        &self.tracer
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    /// Trail points to draw this frame, newest first, in display units.
    pub fn visible_trail(&self) -> &[DVec2] {
        self.tracer.visible_points()
    }

    /// Completed ticks since construction.
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            parameters: self.parameters,
            controls: self.controls,
            state: *self.engine.state(),
            positions: self.positions,
            elapsed: self.elapsed(),
            visible_count: self.tracer.visible_count(),
            frame: self.frame,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::params::PlanetType;
    use std::f64::consts::TAU;

    fn small_config() -> SimulationConfig {
        SimulationConfig {
            history_size: 16,
            interpolation_factor: 5,
            max_frame_delta_ms: None,
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn default_config_is_valid() {
        assert_eq!(SimulationConfig::default().validate(), Ok(()));
        assert_eq!(SimulationConfig::default().sample_count(), 25_000);
    }

    #[test]
    fn config_from_partial_json() {
        let config = SimulationConfig::from_json(r#"{ "history_size": 100, "canvas_side": 800.0 }"#).unwrap();
        assert_eq!(config.history_size, 100);
        assert_eq!(config.canvas_side, 800.0);
        assert_eq!(config.interpolation_factor, DEFAULT_INTERPOLATION_FACTOR);
        assert_eq!(config.parameters, presets::MARS);
    }

    #[test]
    fn config_preset_selects_starting_parameters() {
        let config = SimulationConfig::from_json(r#"{ "preset": "Jupiter" }"#).unwrap();
        assert_eq!(config.starting_parameters(), Ok(presets::JUPITER));
        let sim = Simulation::new(&config).unwrap();
        assert_eq!(*sim.parameters(), presets::JUPITER);

        assert!(matches!(
            SimulationConfig::from_json(r#"{ "preset": "Pluto" }"#),
            Err(crate::error::SimulationError::Config(ConfigError::UnknownPreset(_)))
        ));
    }

    #[test]
    fn config_rejects_bad_values() {
        assert!(SimulationConfig::from_json(r#"{ "history_size": 1 }"#).is_err());
        assert!(SimulationConfig::from_json(r#"{ "interpolation_factor": 0 }"#).is_err());
        assert!(SimulationConfig::from_json(r#"{ "canvas_side": -5.0 }"#).is_err());
        assert!(SimulationConfig::from_json(r#"{ "log_level": "loud" }"#).is_err());
        let json = r#"{ "parameters": { "epicycle_size": 0.5, "eccentricity": 0.6,
                        "motion_rate": 1.0, "apogee_angle": 0.0 } }"#;
        assert!(SimulationConfig::from_json(json).is_err());
    }

    #[test]
    fn golden_scenario_through_simulation() {
        let mut sim = Simulation::new(&small_config()).unwrap();
        sim.tick(1000.0).unwrap();
        let s = sim.state();
        assert!((s.current_time - 0.2).abs() < 1e-12);
        assert!((s.deferent_angle - TAU * 0.52 * 0.2).abs() < 1e-12);
        assert!((s.epicycle_angle - TAU * 0.2).abs() < 1e-12);
        assert_eq!(sim.frame_count(), 1);
    }

    #[test]
    fn trail_starts_collapsed_on_planet() {
        let sim = Simulation::new(&small_config()).unwrap();
        let planet = sim.mapper().to_display(sim.positions().planet);
        assert!(sim.tracer().points().iter().all(|p| *p == planet));
        assert!(sim.tracer().history().all(|p| p == planet));
    }

    #[test]
    fn newest_trail_point_follows_planet() {
        let mut sim = Simulation::new(&small_config()).unwrap();
        for _ in 0..10 {
            sim.tick(16.0).unwrap();
            let planet = sim.mapper().to_display(sim.positions().planet);
            assert_eq!(sim.tracer().newest(), planet);
            assert_eq!(sim.visible_trail()[0], planet);
        }
    }

    #[test]
    fn paused_ticks_freeze_state_but_update_trail() {
        let mut sim = Simulation::new(&small_config()).unwrap();
        sim.tick(500.0).unwrap();
        sim.set_animation_enabled(false);
        let before = *sim.state();
        for _ in 0..40 {
            sim.tick(16.0).unwrap();
        }
        assert_eq!(*sim.state(), before);
        // After more paused ticks than the history holds, the trail has
        // collapsed onto the stationary planet.
        let planet = sim.mapper().to_display(sim.positions().planet);
        assert!(sim.tracer().history().all(|p| p == planet));
    }

    #[test]
    fn reset_zeroes_state_and_trail() {
        let mut sim = Simulation::new(&small_config()).unwrap();
        for _ in 0..20 {
            sim.tick(100.0).unwrap();
        }
        sim.reset().unwrap();
        assert_eq!(*sim.state(), KinematicState::default());
        let planet = sim.mapper().to_display(sim.positions().planet);
        assert!(sim.tracer().points().iter().all(|p| *p == planet));
        // Idempotent.
        sim.reset().unwrap();
        assert_eq!(*sim.state(), KinematicState::default());
    }

    #[test]
    fn invalid_parameters_keep_previous() {
        let mut sim = Simulation::new(&small_config()).unwrap();
        let bad = PlanetaryParameters { eccentricity: 0.75, ..presets::MARS };
        assert!(sim.set_parameters(bad).is_err());
        assert_eq!(*sim.parameters(), presets::MARS);
        sim.tick(16.0).unwrap();
    }

    #[test]
    fn invalid_controls_keep_previous() {
        let mut sim = Simulation::new(&small_config()).unwrap();
        let before = *sim.controls();
        let bad = Controls { animation_rate: 2.0, ..before };
        assert!(sim.set_controls(bad).is_err());
        assert_eq!(*sim.controls(), before);
    }

    #[test]
    fn controls_drive_visible_count() {
        let mut sim = Simulation::new(&small_config()).unwrap();
        let c = Controls { path_visible_fraction: 0.0, ..*sim.controls() };
        sim.set_controls(c).unwrap();
        assert_eq!(sim.visible_trail().len(), 1);
        let c = Controls { path_visible_fraction: 1.0, ..c };
        sim.set_controls(c).unwrap();
        assert_eq!(sim.visible_trail().len(), 80);
    }

    #[test]
    fn presets_switch_parameters_without_jump_in_angles() {
        let mut sim = Simulation::new(&small_config()).unwrap();
        sim.tick(700.0).unwrap();
        let before = *sim.state();
        sim.apply_preset("venus").unwrap();
        assert_eq!(sim.parameters().planet_type, PlanetType::Inferior);
        assert_eq!(*sim.state(), before);
        assert!(sim.apply_preset("Vulcan").is_err());
        assert_eq!(*sim.parameters(), presets::VENUS);
    }

    #[test]
    fn frame_timestamps_drive_the_clock() {
        let mut sim = Simulation::new(&small_config()).unwrap();
        sim.frame(10_000.0).unwrap();
        assert_eq!(sim.current_time(), 0.0);
        sim.frame(11_000.0).unwrap();
        assert!((sim.current_time() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn stall_cap_only_limits_frame_timestamps() {
        let config = SimulationConfig { max_frame_delta_ms: Some(100.0), ..small_config() };
        let mut sim = Simulation::new(&config).unwrap();
        sim.tick(5000.0).unwrap();
        assert!((sim.current_time() - 1.0).abs() < 1e-12);
        sim.frame(0.0).unwrap();
        sim.frame(5000.0).unwrap();
        assert!((sim.current_time() - 1.02).abs() < 1e-12);
    }

    #[test]
    fn golden_scenario_with_default_config() {
        let mut sim = Simulation::new(&SimulationConfig::default()).unwrap();
        sim.tick(1000.0).unwrap();
        let s = sim.state();
        assert!((s.current_time - 0.2).abs() < 1e-12, "t = {}", s.current_time);
        assert!((s.deferent_angle - TAU * 0.52 * 0.2).abs() < 1e-12);
        assert!((s.epicycle_angle - TAU * 0.2).abs() < 1e-12);
    }

    #[test]
    fn long_ticks_stay_proportional() {
        let mut sim = Simulation::new(&small_config()).unwrap();
        sim.tick(10_000.0).unwrap();
        assert!((sim.current_time() - 2.0).abs() < 1e-12);
        assert!((sim.state().deferent_angle - TAU * 0.52 * 2.0).abs() < 1e-12);
    }

    #[test]
    fn toggle_is_reversible() {
        let mut sim = Simulation::new(&small_config()).unwrap();
        assert!(sim.controls().is_animation_enabled);
        assert!(!sim.toggle_animation());
        assert!(sim.toggle_animation());
    }

    #[test]
    fn independent_instances_do_not_share_trails() {
        let mut a = Simulation::new(&small_config()).unwrap();
        let b = Simulation::new(&small_config()).unwrap();
        for _ in 0..10 {
            a.tick(50.0).unwrap();
        }
        assert_ne!(a.tracer().newest(), b.tracer().newest());
        assert!(b.tracer().history().all(|p| p == b.tracer().newest()));
    }

    #[test]
    fn snapshot_serializes() {
        let mut sim = Simulation::new(&small_config()).unwrap();
        sim.tick(1000.0).unwrap();
        let snap = sim.snapshot();
        assert_eq!(snap.frame, 1);
        let json = snap.to_json().unwrap();
        assert!(json.contains("deferent_angle"));
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert!((back.state.current_time - snap.state.current_time).abs() < 1e-12);
        assert_eq!(back.elapsed, snap.elapsed);
        assert_eq!(back.visible_count, snap.visible_count);
    }
}
