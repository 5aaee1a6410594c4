use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default half-width of the model window. Holds every reachable position:
/// the planet stays within 3e + 2 < 3.5 and the sun circles at 3.
pub const DEFAULT_VIEW_HALF_WIDTH: f64 = 4.0;

/// Affine map between model units (y up, origin at Earth) and a square
/// display area `[0, canvas_side]` (y down, origin top-left).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateMapper {
    canvas_side: f64,
    half_width: f64,
}

impl CoordinateMapper {
    pub fn new(canvas_side: f64, half_width: f64) -> Result<Self, ConfigError> {
        for (field, value) in [("canvas_side", canvas_side), ("view_half_width", half_width)] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field, value });
            }
            if value <= 0.0 {
                return Err(ConfigError::OutOfRange { field, value, range: "(0, inf)" });
            }
        }
        Ok(Self { canvas_side, half_width })
    }

    pub fn canvas_side(&self) -> f64 {
        self.canvas_side
    }

    pub fn half_width(&self) -> f64 {
        self.half_width
    }

    /// Display units per model unit.
    pub fn scale(&self) -> f64 {
        self.canvas_side / (2.0 * self.half_width)
    }

    pub fn to_display_x(&self, u: f64) -> f64 {
        (u + self.half_width) * self.scale()
    }

    pub fn to_display_y(&self, u: f64) -> f64 {
        (self.half_width - u) * self.scale()
    }

    pub fn to_model_x(&self, px: f64) -> f64 {
        px / self.scale() - self.half_width
    }

    pub fn to_model_y(&self, py: f64) -> f64 {
        self.half_width - py / self.scale()
    }

    pub fn to_display(&self, p: DVec2) -> DVec2 {
        DVec2::new(self.to_display_x(p.x), self.to_display_y(p.y))
    }

    pub fn to_model(&self, p: DVec2) -> DVec2 {
        DVec2::new(self.to_model_x(p.x), self.to_model_y(p.y))
    }

    /// Length in model units expressed in display units (circle radii etc).
    pub fn to_display_length(&self, len: f64) -> f64 {
        len * self.scale()
    }
}
