/// Fixed-step accumulator for real-time driven tasks.
/// Converts variable frame deltas into a whole number of fixed steps, so a
/// step-sliced animation advances at the same rate on any display.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    /// Real seconds per step.
    dt: f32,
    /// Leftover real time not yet consumed by a step.
    accumulator: f32,
    /// Upper bound on steps released by a single frame.
    max_steps: u32,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self {
            dt: dt.max(f32::EPSILON),
            accumulator: 0.0,
            max_steps: 10,
        }
    }

    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        if !frame_dt.is_finite() || frame_dt <= 0.0 {
            return 0;
        }
        self.accumulator += frame_dt;
        // A long stall (tab in background) must not release a burst of steps.
        self.accumulator = self.accumulator.min(self.dt * self.max_steps as f32);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }
}
