//! Planet presets: classical parameter sets for the Ptolemaic model.
//!
//! Values are the textbook fits used in introductory astronomy labs, not
//! modern ephemerides. Custom tables can be loaded from JSON.

use serde::{Deserialize, Serialize};

use crate::api::params::{PlanetType, PlanetaryParameters};
use crate::error::{ConfigError, SimResult};

pub const VENUS: PlanetaryParameters = PlanetaryParameters {
    epicycle_size: 0.72,
    eccentricity: 0.02,
    motion_rate: 1.60,
    apogee_angle: 46.2,
    planet_type: PlanetType::Inferior,
};

pub const MARS: PlanetaryParameters = PlanetaryParameters {
    epicycle_size: 0.66,
    eccentricity: 0.10,
    motion_rate: 0.52,
    apogee_angle: 106.7,
    planet_type: PlanetType::Superior,
};

pub const JUPITER: PlanetaryParameters = PlanetaryParameters {
    epicycle_size: 0.19,
    eccentricity: 0.05,
    motion_rate: 0.08,
    apogee_angle: 152.2,
    planet_type: PlanetType::Superior,
};

pub const SATURN: PlanetaryParameters = PlanetaryParameters {
    epicycle_size: 0.11,
    eccentricity: 0.06,
    motion_rate: 0.03,
    apogee_angle: 224.2,
    planet_type: PlanetType::Superior,
};

/// Built-in presets, in menu order.
pub const BUILTIN: [(&str, PlanetaryParameters); 4] = [
    ("Venus", VENUS),
    ("Mars", MARS),
    ("Jupiter", JUPITER),
    ("Saturn", SATURN),
];

/// Look up a built-in preset by name, ignoring case.
pub fn preset(name: &str) -> Option<PlanetaryParameters> {
    BUILTIN
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name.trim()))
        .map(|(_, p)| *p)
}

/// One named entry of a preset table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    #[serde(flatten)]
    pub parameters: PlanetaryParameters,
}

/// A list of presets, either the built-ins or loaded from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetTable {
    pub presets: Vec<Preset>,
}

impl Default for PresetTable {
    fn default() -> Self {
        Self {
            presets: BUILTIN
                .iter()
                .map(|(name, parameters)| Preset {
                    name: (*name).to_string(),
                    parameters: *parameters,
                })
                .collect(),
        }
    }
}

impl PresetTable {
    /// Parse a table from a JSON string. Every entry must pass validation.
    pub fn from_json(json: &str) -> SimResult<Self> {
        let table: PresetTable = serde_json::from_str(json)?;
        for preset in &table.presets {
            preset.parameters.validate()?;
        }
        Ok(table)
    }

    pub fn get(&self, name: &str) -> Option<&PlanetaryParameters> {
        self.presets
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name.trim()))
            .map(|p| &p.parameters)
    }

    /// Like `get`, but an unknown name is an error.
    pub fn require(&self, name: &str) -> Result<PlanetaryParameters, ConfigError> {
        self.get(name)
            .copied()
            .ok_or_else(|| ConfigError::UnknownPreset(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.iter().map(|p| p.name.as_str())
    }
}
