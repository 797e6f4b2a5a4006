//! Fixed-timestep bookkeeping for the simulation loop.

/// Default simulation rate (Hz).
pub const DEFAULT_FIXED_HZ: f32 = 60.0;
/// Longest frame delta the clock will accept, in seconds. Anything above
/// this (debugger pause, OS stall) is clamped so the simulation never
/// tries to catch up across a multi-second gap.
pub const MAX_FRAME_DELTA: f32 = 0.1;
/// Upper bound on physics sub-steps per tick.
pub const MAX_SUBSTEPS: u32 = 3;

/// Drives the fixed-step physics cadence from a variable frame delta.
///
/// The host hands in wall-clock deltas; the clock clamps them, accumulates
/// time, and reports how many fixed sub-steps the physics world should run
/// this tick. Leftover time beyond the sub-step cap is discarded rather
/// than carried, which trades a little simulated time for a bounded tick.
#[derive(Debug, Clone)]
pub struct SimClock {
    fixed_dt: f32,
    accumulator: f32,
    elapsed: f32,
    tick_count: u64,
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(1.0 / DEFAULT_FIXED_HZ)
    }
}

impl SimClock {
    pub fn new(fixed_dt: f32) -> Self {
        Self {
            fixed_dt,
            accumulator: 0.0,
            elapsed: 0.0,
            tick_count: 0,
        }
    }

    /// Feed one frame's delta. Returns the clamped delta that gameplay
    /// timers should consume this tick.
    pub fn advance(&mut self, dt: f32) -> f32 {
        let dt = dt.clamp(0.0, MAX_FRAME_DELTA);
        self.accumulator += dt;
        self.elapsed += dt;
        self.tick_count += 1;
        dt
    }

    /// Number of fixed sub-steps to run for the time accumulated so far.
    /// Consumes the accumulator and drops any backlog beyond the cap.
    pub fn take_substeps(&mut self) -> u32 {
        let mut steps = 0;
        while self.accumulator >= self.fixed_dt && steps < MAX_SUBSTEPS {
            self.accumulator -= self.fixed_dt;
            steps += 1;
        }
        if self.accumulator >= self.fixed_dt {
            // Still behind after the cap; drop the backlog.
            self.accumulator = self.accumulator % self.fixed_dt;
        }
        steps
    }

    pub fn fixed_dt(&self) -> f32 {
        self.fixed_dt
    }

    /// Total simulated wall time in seconds.
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}
