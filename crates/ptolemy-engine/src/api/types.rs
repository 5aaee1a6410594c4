use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Mean tropical year, for the elapsed-time readout.
pub const DAYS_PER_YEAR: f64 = 365.2422;

/// Every body position for one tick, in model units with Earth at the origin.
/// `deferent_point` is relative to the equant and `epicycle_point` is relative
/// to the epicycle center, so the planet is the sum of the three.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PositionSet {
    pub equant: DVec2,
    pub eccentric_center: DVec2,
    pub deferent_point: DVec2,
    pub epicycle_point: DVec2,
    pub planet: DVec2,
    pub sun: DVec2,
    /// Degrees, in (-180, 180].
    pub sun_longitude: f64,
    /// Degrees, in (-180, 180].
    pub ecliptic_longitude: f64,
}

impl PositionSet {
    /// Absolute position of the epicycle center (equant + deferent offset).
    pub fn epicycle_center(&self) -> DVec2 {
        self.equant + self.deferent_point
    }
}

/// Angle of `p` as seen from the origin, in degrees within (-180, 180].
pub fn longitude_degrees(p: DVec2) -> f64 {
    let deg = p.y.atan2(p.x) * 180.0 / std::f64::consts::PI;
    // atan2 returns -pi for (-x, -0.0)
    if deg <= -180.0 {
        deg + 360.0
    } else {
        deg
    }
}

/// Simulated time broken into whole years and leftover days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ElapsedTime {
    pub years: i64,
    pub days: i64,
}

impl ElapsedTime {
    pub fn from_years(t: f64) -> Self {
        if !t.is_finite() {
            return Self::default();
        }
        let sign = if t < 0.0 { -1 } else { 1 };
        let abs = t.abs();
        let years = abs.floor() as i64;
        let days = ((abs * DAYS_PER_YEAR).floor() as i64) % 365;
        Self {
            years: sign * years,
            days: sign * days,
        }
    }
}
