//! Planet motion trail.
//!
//! Keeps the last `H` planet display positions in a ring buffer and expands
//! them into `N` cubic-interpolated points every tick. The renderer draws the
//! first `visible_count` points (newest first), fading toward the tail.
//! Interpolation matters at high motion rates, where consecutive samples are
//! far enough apart that straight segments show corners.

use glam::DVec2;

use crate::error::ConfigError;
use crate::extensions::hermite;

/// Default number of retained planet positions.
pub const DEFAULT_HISTORY_SIZE: usize = 5000;
/// Default ratio of interpolated points to history entries.
pub const DEFAULT_INTERPOLATION_FACTOR: usize = 5;

#[derive(Debug, Clone)]
pub struct PathTracer {
    /// Ring storage. Slot `head` is the newest entry, `head + 1` the one before, etc.
    history: Vec<DVec2>,
    head: usize,
    /// Interpolated trail, newest first. Always `sample_count` long.
    points: Vec<DVec2>,
    visible_count: usize,
}

impl PathTracer {
    /// Create a tracer with `history_size` retained positions and
    /// `sample_count` interpolated points, all at the origin.
    pub fn new(history_size: usize, sample_count: usize) -> Result<Self, ConfigError> {
        if history_size < 2 || sample_count < 2 {
            return Err(ConfigError::TracerCapacity {
                history: history_size,
                samples: sample_count,
            });
        }
        Ok(Self {
            history: vec![DVec2::ZERO; history_size],
            head: 0,
            points: vec![DVec2::ZERO; sample_count],
            visible_count: sample_count,
        })
    }

    /// Collapse the whole trail onto one point. Call before the first render
    /// so no segment is drawn from the origin to the planet.
    pub fn initialize(&mut self, x: f64, y: f64) {
        let p = DVec2::new(x, y);
        self.history.fill(p);
        self.points.fill(p);
        self.head = 0;
    }

    /// Push the planet's newest position, evicting the oldest, and rebuild
    /// the interpolated trail. Non-finite input is dropped.
    pub fn add_location(&mut self, x: f64, y: f64) {
        if !(x.is_finite() && y.is_finite()) {
            log::debug!("path tracer: ignoring non-finite location ({x}, {y})");
            return;
        }
        let len = self.history.len();
        self.head = (self.head + len - 1) % len;
        self.history[self.head] = DVec2::new(x, y);
        self.recompute();
    }

    /// Expose `floor((N - 1) * f) + 1` points. Only affects what is drawn.
    pub fn set_visible_fraction(&mut self, fraction: f64) {
        if fraction.is_nan() {
            return;
        }
        let f = fraction.clamp(0.0, 1.0);
        let n = self.points.len();
        self.visible_count = ((n - 1) as f64 * f).floor() as usize + 1;
    }

    /// Rebuild every interpolated point from the current history.
    fn recompute(&mut self) {
        let h = self.history.len();
        let n = self.points.len();
        let history = &self.history;
        let head = self.head;
        let value_at = |i: usize| history[(head + i) % h];

        for (i, point) in self.points.iter_mut().enumerate() {
            let t = i as f64 / n as f64 * h as f64;
            *point = hermite::sample(&value_at, h, t);
        }
    }

    /// Entry `age` steps back from the newest (0 = newest). `None` past the capacity.
    pub fn history_at(&self, age: usize) -> Option<DVec2> {
        let h = self.history.len();
        (age < h).then(|| self.history[(self.head + age) % h])
    }

    /// All retained positions, newest first.
    pub fn history(&self) -> impl Iterator<Item = DVec2> + '_ {
        let h = self.history.len();
        (0..h).map(move |age| self.history[(self.head + age) % h])
    }

    pub fn newest(&self) -> DVec2 {
        self.history[self.head]
    }

    /// Every interpolated point, newest first.
    pub fn points(&self) -> &[DVec2] {
        &self.points
    }

    /// The prefix of the trail the renderer should draw.
    pub fn visible_points(&self) -> &[DVec2] {
        &self.points[..self.visible_count]
    }

    pub fn visible_count(&self) -> usize {
        self.visible_count
    }

    pub fn history_size(&self) -> usize {
        self.history.len()
    }

    pub fn sample_count(&self) -> usize {
        self.points.len()
    }
}
