use bevy_ecs::prelude::Resource;

/// Simulation clock advanced once per tick. Real frame deltas are scaled by
/// the user-adjustable speed multiplier before touching simulated time, so
/// entity movement, ride ages and the stuck-ride timeout all live in
/// simulated seconds.
#[derive(Debug, Resource)]
pub struct TickClock {
    now_secs: f64,
    delta_secs: f64,
    ticks: u64,
    speed_multiplier: f64,
}

impl Default for TickClock {
    fn default() -> Self {
        Self {
            now_secs: 0.0,
            delta_secs: 0.0,
            ticks: 0,
            speed_multiplier: 1.0,
        }
    }
}

impl TickClock {
    /// Elapsed simulated time in seconds.
    pub fn now_secs(&self) -> f64 {
        self.now_secs
    }

    /// Simulated seconds covered by the current tick.
    pub fn delta_secs(&self) -> f64 {
        self.delta_secs
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn speed_multiplier(&self) -> f64 {
        self.speed_multiplier
    }

    pub fn set_speed_multiplier(&mut self, multiplier: f64) {
        debug_assert!(
            multiplier.is_finite() && multiplier >= 0.0,
            "speed multiplier must be finite and non-negative"
        );
        self.speed_multiplier = multiplier.max(0.0);
    }

    /// Advance by one tick of `real_dt_secs` wall-clock time. Returns the
    /// scaled simulated delta.
    pub fn advance(&mut self, real_dt_secs: f64) -> f64 {
        let dt = real_dt_secs.max(0.0) * self.speed_multiplier;
        self.now_secs += dt;
        self.delta_secs = dt;
        self.ticks += 1;
        dt
    }

    pub fn reset(&mut self) {
        let multiplier = self.speed_multiplier;
        *self = Self::default();
        self.speed_multiplier = multiplier;
    }
}
