use crate::core::kinematics::sanitize_delta;

/// Frame clock.
/// Turns animation-frame timestamps into elapsed-time deltas for the physics step.
pub struct AnimationClock {
    /// Timestamp of the previous frame, if any.
    last_timestamp: Option<f64>,
    /// Cap on a single delta so a stalled tab does not teleport the planet.
    max_delta_ms: Option<f64>,
}

impl AnimationClock {
    pub fn new(max_delta_ms: Option<f64>) -> Self {
        Self {
            last_timestamp: None,
            max_delta_ms: max_delta_ms.filter(|cap| cap.is_finite() && *cap > 0.0),
        }
    }

    /// Record a frame callback. Returns milliseconds since the previous one.
    /// The first frame, a clock going backwards, or a non-finite timestamp yield 0.
    pub fn frame(&mut self, timestamp_ms: f64) -> f64 {
        if !timestamp_ms.is_finite() {
            return 0.0;
        }
        let delta = match self.last_timestamp {
            Some(prev) => timestamp_ms - prev,
            None => 0.0,
        };
        self.last_timestamp = Some(timestamp_ms);
        self.limit(delta)
    }

    /// Clamp an externally measured delta the same way `frame` does.
    pub fn limit(&self, delta_ms: f64) -> f64 {
        let delta = sanitize_delta(delta_ms);
        match self.max_delta_ms {
            Some(cap) => delta.min(cap),
            None => delta,
        }
    }

    /// Forget the previous timestamp; the next frame starts from zero.
    pub fn reset(&mut self) {
        self.last_timestamp = None;
    }

    pub fn max_delta_ms(&self) -> Option<f64> {
        self.max_delta_ms
    }
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self::new(None)
    }
}
