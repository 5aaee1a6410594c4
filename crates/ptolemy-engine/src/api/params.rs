use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Upper bound (exclusive) on eccentricity, in units of the deferent radius.
/// Keeps the equant-distance quadratic solvable and every body inside the view window.
pub const MAX_ECCENTRICITY: f64 = 0.5;
/// Upper bound (inclusive) on the motion rate multiplier.
pub const MAX_MOTION_RATE: f64 = 4.5;
/// Upper bound (inclusive) on epicycle radius relative to the deferent.
pub const MAX_EPICYCLE_SIZE: f64 = 1.0;

/// Whether the planet orbits outside or inside the sun's orbit.
/// Decides which circle the motion rate drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanetType {
    /// Mars, Jupiter, Saturn: the motion rate drives the deferent.
    #[default]
    Superior,
    /// Mercury, Venus: the motion rate drives the epicycle.
    Inferior,
}

impl PlanetType {
    /// `(deferent_rate, epicycle_rate)` in revolutions per simulated year.
    pub fn rates(self, motion_rate: f64) -> (f64, f64) {
        match self {
            PlanetType::Superior => (motion_rate, 1.0),
            PlanetType::Inferior => (1.0, motion_rate),
        }
    }

    /// Decode the numeric form used by the JS bridge (0 = superior, 1 = inferior).
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(PlanetType::Superior),
            1 => Some(PlanetType::Inferior),
            _ => None,
        }
    }
}

/// Geometry of one planet's model. Read-only during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanetaryParameters {
    /// Epicycle radius relative to the unit deferent, in [0, 1].
    pub epicycle_size: f64,
    /// Earth-to-eccentric distance, in [0, 0.5).
    pub eccentricity: f64,
    /// Rate multiplier, in (0, 4.5].
    pub motion_rate: f64,
    /// Direction of the apogee in degrees, in [0, 360).
    pub apogee_angle: f64,
    #[serde(default)]
    pub planet_type: PlanetType,
}

impl Default for PlanetaryParameters {
    fn default() -> Self {
        crate::assets::presets::MARS
    }
}

impl PlanetaryParameters {
    /// Reject anything outside the documented domain. No clamping.
    pub fn validate(&self) -> Result<(), ConfigError> {
        finite("epicycle_size", self.epicycle_size)?;
        finite("eccentricity", self.eccentricity)?;
        finite("motion_rate", self.motion_rate)?;
        finite("apogee_angle", self.apogee_angle)?;

        if !(0.0..=MAX_EPICYCLE_SIZE).contains(&self.epicycle_size) {
            return Err(out_of_range("epicycle_size", self.epicycle_size, "[0, 1]"));
        }
        if !(0.0..MAX_ECCENTRICITY).contains(&self.eccentricity) {
            return Err(out_of_range("eccentricity", self.eccentricity, "[0, 0.5)"));
        }
        if !(self.motion_rate > 0.0 && self.motion_rate <= MAX_MOTION_RATE) {
            return Err(out_of_range("motion_rate", self.motion_rate, "(0, 4.5]"));
        }
        if !(0.0..360.0).contains(&self.apogee_angle) {
            return Err(out_of_range("apogee_angle", self.apogee_angle, "[0, 360)"));
        }
        Ok(())
    }

    /// `(deferent_rate, epicycle_rate)` after the superior/inferior role assignment.
    pub fn rates(&self) -> (f64, f64) {
        self.planet_type.rates(self.motion_rate)
    }

    /// Apogee direction in radians.
    pub fn apogee_radians(&self) -> f64 {
        self.apogee_angle.to_radians()
    }
}

/// Animation controls supplied by the UI each tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Controls {
    pub is_animation_enabled: bool,
    /// Simulated years per real second, in [0, 1].
    pub animation_rate: f64,
    /// Fraction of the trail to expose, in [0, 1].
    pub path_visible_fraction: f64,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            is_animation_enabled: true,
            animation_rate: 0.2,
            path_visible_fraction: 0.2,
        }
    }
}

impl Controls {
    pub fn validate(&self) -> Result<(), ConfigError> {
        finite("animation_rate", self.animation_rate)?;
        finite("path_visible_fraction", self.path_visible_fraction)?;
        if !(0.0..=1.0).contains(&self.animation_rate) {
            return Err(out_of_range("animation_rate", self.animation_rate, "[0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.path_visible_fraction) {
            return Err(out_of_range(
                "path_visible_fraction",
                self.path_visible_fraction,
                "[0, 1]",
            ));
        }
        Ok(())
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field, value })
    }
}

fn out_of_range(field: &'static str, value: f64, range: &'static str) -> ConfigError {
    ConfigError::OutOfRange { field, value, range }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mars() -> PlanetaryParameters {
        PlanetaryParameters {
            epicycle_size: 0.66,
            eccentricity: 0.10,
            motion_rate: 0.52,
            apogee_angle: 106.7,
            planet_type: PlanetType::Superior,
        }
    }

    #[test]
    fn mars_is_valid() {
        assert_eq!(mars().validate(), Ok(()));
    }

    #[test]
    fn eccentricity_at_bound_rejected() {
        let params = PlanetaryParameters { eccentricity: MAX_ECCENTRICITY, ..mars() };
        assert!(matches!(
            params.validate(),
            Err(ConfigError::OutOfRange { field: "eccentricity", .. })
        ));
    }

    #[test]
    fn eccentricity_of_one_rejected() {
        let params = PlanetaryParameters { eccentricity: 1.0, ..mars() };
        assert!(params.validate().is_err());
    }

    #[test]
    fn zero_motion_rate_rejected() {
        let params = PlanetaryParameters { motion_rate: 0.0, ..mars() };
        assert!(matches!(
            params.validate(),
            Err(ConfigError::OutOfRange { field: "motion_rate", .. })
        ));
    }

    #[test]
    fn full_turn_apogee_rejected() {
        let params = PlanetaryParameters { apogee_angle: 360.0, ..mars() };
        assert!(params.validate().is_err());
        let params = PlanetaryParameters { apogee_angle: 359.9, ..mars() };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn nan_rejected_as_non_finite() {
        let params = PlanetaryParameters { epicycle_size: f64::NAN, ..mars() };
        assert!(matches!(
            params.validate(),
            Err(ConfigError::NonFinite { field: "epicycle_size", .. })
        ));
    }

    #[test]
    fn rates_swap_with_planet_type() {
        assert_eq!(PlanetType::Superior.rates(0.52), (0.52, 1.0));
        assert_eq!(PlanetType::Inferior.rates(0.52), (1.0, 0.52));
    }

    #[test]
    fn planet_type_codes() {
        assert_eq!(PlanetType::from_code(0), Some(PlanetType::Superior));
        assert_eq!(PlanetType::from_code(1), Some(PlanetType::Inferior));
        assert_eq!(PlanetType::from_code(7), None);
    }

    #[test]
    fn controls_bounds() {
        assert!(Controls::default().validate().is_ok());
        let c = Controls { animation_rate: 1.5, ..Controls::default() };
        assert!(c.validate().is_err());
        let c = Controls { path_visible_fraction: -0.1, ..Controls::default() };
        assert!(c.validate().is_err());
        let c = Controls { animation_rate: f64::INFINITY, ..Controls::default() };
        assert!(matches!(c.validate(), Err(ConfigError::NonFinite { .. })));
    }

    #[test]
    fn planet_type_deserializes_lowercase() {
        let json = r#"{ "epicycle_size": 0.72, "eccentricity": 0.02, "motion_rate": 1.6,
                        "apogee_angle": 46.2, "planet_type": "inferior" }"#;
        let params: PlanetaryParameters = serde_json::from_str(json).unwrap();
        assert_eq!(params.planet_type, PlanetType::Inferior);
    }
}
