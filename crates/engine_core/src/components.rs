//! Small state types shared by the gameplay crates.

/// Clamped health pool.
#[derive(Debug, Clone, Copy)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    /// Subtract damage, clamping at zero. Returns the health remaining.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        self.current = (self.current - amount).max(0.0);
        self.current
    }

    pub fn heal(&mut self, amount: f32) {
        self.current = (self.current + amount).min(self.max);
    }

    /// Restore to full, e.g. on round reset.
    pub fn restore(&mut self) {
        self.current = self.max;
    }

    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }

    pub fn fraction(&self) -> f32 {
        self.current / self.max
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

/// One-shot countdown timer.
///
/// Every gameplay delay in the simulation (fire cooldowns, reload, grenade
/// fuses, the buy window, round-end delays) is one of these, decremented by
/// tick time. Resetting the owning struct cancels the timer; there is no
/// out-of-band scheduling to chase down.
#[derive(Debug, Clone, Copy, Default)]
pub struct Countdown {
    pub remaining: f32,
}

impl Countdown {
    pub fn new(seconds: f32) -> Self {
        Self { remaining: seconds }
    }

    /// An already-expired timer.
    pub fn ready() -> Self {
        Self { remaining: 0.0 }
    }

    pub fn reset(&mut self, seconds: f32) {
        self.remaining = seconds;
    }

    /// Advance by `dt`. Returns true on the tick the timer crosses zero;
    /// false before that and on every tick after.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.remaining <= 0.0 {
            return false;
        }
        self.remaining = (self.remaining - dt).max(0.0);
        self.remaining == 0.0
    }

    pub fn is_running(&self) -> bool {
        self.remaining > 0.0
    }

    pub fn is_finished(&self) -> bool {
        self.remaining <= 0.0
    }
}
