//! Simulation time: the game clock, frame step clamping and repeating timers.

// =============================================================================
// GAME CLOCK
// =============================================================================

/// Global game time clock (in seconds)
#[derive(Debug, Clone, Default)]
pub struct GameClock {
    /// Current game time in seconds (simulation time, not real time)
    pub time: f32,
}

impl GameClock {
    pub fn new() -> Self {
        Self { time: 0.0 }
    }

    pub fn advance(&mut self, dt: f32) {
        debug_assert!(dt >= 0.0, "Cannot go backwards in time: {dt}");
        self.time += dt;
    }
}

/// Clamp a host frame delta into a safe simulation step.
/// Negative and non-finite deltas become zero.
pub fn clamp_dt(dt: f32, max_dt: f32) -> f32 {
    if !dt.is_finite() || dt <= 0.0 {
        return 0.0;
    }
    dt.min(max_dt)
}

// =============================================================================
// INTERVAL TIMER
// =============================================================================

/// Fires once every `interval` seconds of accumulated time
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    pub interval: f32,
    elapsed: f32,
}

impl IntervalTimer {
    pub fn new(interval: f32) -> Self {
        Self { interval, elapsed: 0.0 }
    }

    /// Advance and report whether the interval elapsed this step
    pub fn tick(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        if self.elapsed >= self.interval {
            // Long stalls fire once, not once per missed interval
            self.elapsed = (self.elapsed - self.interval) % self.interval;
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_dt() {
        assert_eq!(clamp_dt(0.5, 1.0 / 30.0), 1.0 / 30.0);
        assert_eq!(clamp_dt(0.01, 1.0 / 30.0), 0.01);
        assert_eq!(clamp_dt(-1.0, 1.0 / 30.0), 0.0);
        assert_eq!(clamp_dt(f32::NAN, 1.0 / 30.0), 0.0);
    }

    #[test]
    fn test_interval_timer_fires() {
        let mut timer = IntervalTimer::new(1.0);
        assert!(!timer.tick(0.5));
        assert!(timer.tick(0.5));
        assert!(!timer.tick(0.25));
        timer.reset();
        assert!(!timer.tick(0.75));
        assert!(timer.tick(0.25));
    }

    #[test]
    fn test_clock_advances() {
        let mut clock = GameClock::new();
        clock.advance(0.25);
        clock.advance(0.25);
        assert_eq!(clock.time, 0.5);
    }
}
