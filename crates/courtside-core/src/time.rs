use serde::{Deserialize, Serialize};

/// A tick index on the simulation clock.
pub type Tick = u64;

/// Monotonic fixed-rate tick clock.
///
/// Cooldowns and swing windows are timestamp comparisons against this
/// clock, so nothing ever needs cancelling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickClock {
    now: Tick,
    tick_rate_hz: f32,
}

impl TickClock {
    pub fn new(tick_rate_hz: f32) -> Self {
        let tick_rate_hz = if tick_rate_hz.is_finite() && tick_rate_hz > 0.0 {
            tick_rate_hz
        } else {
            60.0
        };
        Self {
            now: 0,
            tick_rate_hz,
        }
    }

    pub fn now(&self) -> Tick {
        self.now
    }

    pub fn tick_rate_hz(&self) -> f32 {
        self.tick_rate_hz
    }

    /// Advance one tick and return the new tick index.
    pub fn advance(&mut self) -> Tick {
        self.now += 1;
        self.now
    }

    /// Milliseconds elapsed since `then`. Zero if `then` is in the future.
    pub fn ms_since(&self, then: Tick) -> f32 {
        self.now.saturating_sub(then) as f32 * 1000.0 / self.tick_rate_hz
    }

    /// Whether at least `ms` have passed since `then`.
    pub fn elapsed(&self, then: Tick, ms: f32) -> bool {
        self.ms_since(then) >= ms
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new(60.0)
    }
}
