pub mod error;
pub mod api;
pub mod core;
pub mod systems;
pub mod bridge;
pub mod assets;
pub mod extensions;

// Re-export key types at crate root for convenience
pub use error::{ConfigError, SimResult, SimulationError};
pub use api::params::{Controls, PlanetType, PlanetaryParameters};
pub use api::simulation::{Simulation, SimulationConfig, Snapshot};
pub use api::types::{longitude_degrees, ElapsedTime, PositionSet, DAYS_PER_YEAR};
pub use core::coords::CoordinateMapper;
pub use core::kinematics::{KinematicState, KinematicsEngine};
pub use core::time::AnimationClock;
pub use systems::path_tracer::PathTracer;
pub use assets::presets::{Preset, PresetTable};
pub use bridge::protocol::{FrameBuffer, FrameLayout, TrailVertex};

pub use extensions::{hermite, hermite_basis, hermite_sample};
