//! Error types for the simulator.

use thiserror::Error;

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimulationError>;

/// A value rejected at the configuration boundary.
/// Nothing that produces one of these ever reaches the physics step.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("{field} = {value} is outside {range}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        range: &'static str,
    },

    #[error("path tracer needs history > 1 and samples > 1, got history {history}, samples {samples}")]
    TracerCapacity { history: usize, samples: usize },

    #[error("interpolation factor must be at least 1, got {0}")]
    InterpolationFactor(usize),

    #[error("unknown preset: {0}")]
    UnknownPreset(String),

    #[error("unknown log level: {0}")]
    LogLevel(String),
}

/// Errors surfaced by a running simulation.
#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The equant-distance quadratic has no real root. Validated parameters
    /// never get here; seeing this means a domain check is missing upstream.
    #[error("equant distance has no real solution (discriminant {discriminant}, eccentricity {eccentricity})")]
    NegativeDiscriminant { discriminant: f64, eccentricity: f64 },
}
