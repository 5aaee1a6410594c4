//! Ptolemaic kinematics. Pure math, no rendering dependencies.
//!
//! Model units throughout: the deferent has radius 1, Earth sits at the origin,
//! the eccentric center is offset by `e` toward the apogee and the equant by `2e`.
//! The epicycle center moves at a uniform angular rate as seen from the equant,
//! so its distance from the equant comes out of a quadratic each tick.

use std::f64::consts::{PI, TAU};

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::api::params::{Controls, PlanetaryParameters};
use crate::api::types::{longitude_degrees, PositionSet};
use crate::error::{SimResult, SimulationError};

/// Deferent radius in model units.
pub const DEFERENT_RADIUS: f64 = 1.0;
/// Radius of the sun's circle around Earth, in model units.
pub const SUN_ORBIT_RADIUS: f64 = 3.0;

/// Integrator state. Only `KinematicsEngine` mutates it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct KinematicState {
    /// Simulated years since the last reset.
    pub current_time: f64,
    /// Radians, accumulated without wrapping.
    pub deferent_angle: f64,
    /// Radians, accumulated without wrapping.
    pub epicycle_angle: f64,
}

impl KinematicState {
    /// State after integrating `delta_ms` of real time. Angles are advanced
    /// incrementally so a rate change mid-run never makes the planet jump.
    pub fn advanced(&self, delta_ms: f64, params: &PlanetaryParameters, controls: &Controls) -> Self {
        if !controls.is_animation_enabled {
            return *self;
        }
        let years = sanitize_delta(delta_ms) * controls.animation_rate / 1000.0;
        let (deferent_rate, epicycle_rate) = params.rates();
        Self {
            current_time: self.current_time + years,
            deferent_angle: self.deferent_angle + TAU * deferent_rate * years,
            epicycle_angle: self.epicycle_angle + TAU * epicycle_rate * years,
        }
    }
}

/// Treat negative or non-finite frame deltas as no elapsed time.
pub fn sanitize_delta(delta_ms: f64) -> f64 {
    if delta_ms.is_finite() && delta_ms > 0.0 {
        delta_ms
    } else {
        0.0
    }
}

/// Distance from the equant to the epicycle center.
///
/// Positive root of `x² - 2e·cos(π - apogee + θ)·x + (e² - R²) = 0`, i.e. the
/// law of cosines in the triangle equant / eccentric center / epicycle center.
pub fn equant_distance(eccentricity: f64, apogee_rad: f64, deferent_angle: f64) -> SimResult<f64> {
    let a = 1.0;
    let b = -2.0 * eccentricity * (PI - apogee_rad + deferent_angle).cos();
    let c = eccentricity * eccentricity - DEFERENT_RADIUS * DEFERENT_RADIUS;
    let discriminant = b * b - 4.0 * a * c;
    // Negated so NaN fails too.
    if !(discriminant >= 0.0) {
        return Err(SimulationError::NegativeDiscriminant {
            discriminant,
            eccentricity,
        });
    }
    Ok((-b + discriminant.sqrt()) / (2.0 * a))
}

/// Unit vector at `angle` radians.
#[inline]
fn polar(angle: f64) -> DVec2 {
    DVec2::new(angle.cos(), angle.sin())
}

/// Every body position for a given state. No integration happens here.
pub fn derive_positions(state: &KinematicState, params: &PlanetaryParameters) -> SimResult<PositionSet> {
    let e = params.eccentricity;
    let apogee = params.apogee_radians();
    let r_ee = equant_distance(e, apogee, state.deferent_angle)?;

    let equant = 2.0 * e * polar(apogee);
    let eccentric_center = e * polar(apogee);
    let deferent_point = r_ee * polar(state.deferent_angle);
    let epicycle_point = params.epicycle_size * polar(state.epicycle_angle);
    let planet = equant + deferent_point + epicycle_point;

    let sun = SUN_ORBIT_RADIUS * polar(TAU * state.current_time);

    Ok(PositionSet {
        equant,
        eccentric_center,
        deferent_point,
        epicycle_point,
        planet,
        sun,
        sun_longitude: longitude_degrees(sun),
        ecliptic_longitude: longitude_degrees(planet),
    })
}

/// Owns the integrator state and advances it once per tick.
#[derive(Debug, Clone, Default)]
pub struct KinematicsEngine {
    state: KinematicState,
}

impl KinematicsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &KinematicState {
        &self.state
    }

    /// Integrate `delta_ms` of real time and derive positions.
    /// The state is committed only if the positions could be derived.
    pub fn physics_update(
        &mut self,
        delta_ms: f64,
        params: &PlanetaryParameters,
        controls: &Controls,
    ) -> SimResult<PositionSet> {
        let next = self.state.advanced(delta_ms, params, controls);
        match derive_positions(&next, params) {
            Ok(positions) => {
                self.state = next;
                Ok(positions)
            }
            Err(err) => {
                log::error!("physics step failed at t={:.4}: {}", next.current_time, err);
                Err(err)
            }
        }
    }

    /// Positions for the current state without advancing it.
    pub fn positions(&self, params: &PlanetaryParameters) -> SimResult<PositionSet> {
        derive_positions(&self.state, params)
    }

    /// Zero time and both angles.
    pub fn reset(&mut self) {
        self.state = KinematicState::default();
    }
}
