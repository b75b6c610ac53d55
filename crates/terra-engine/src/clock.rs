//! Frame clock

use std::time::Instant;

/// Tracks elapsed time across terrain updates. The terrain runs one
/// update per rendered frame, so there is no fixed-step accumulator;
/// delta time only feeds the diagnostics.
pub struct FrameClock {
    /// Total elapsed time in seconds
    pub total_time: f64,
    /// Time since the last update in seconds
    pub delta_time: f64,
    last_instant: Instant,
    first_tick: bool,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            total_time: 0.0,
            delta_time: 0.0,
            last_instant: Instant::now(),
            first_tick: true,
        }
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock. Call once per frame; the first tick reports a
    /// zero delta.
    pub fn tick(&mut self) -> f64 {
        let now = Instant::now();

        if self.first_tick {
            self.first_tick = false;
            self.last_instant = now;
            self.delta_time = 0.0;
            return 0.0;
        }

        self.delta_time = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.total_time += self.delta_time;
        self.delta_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_has_zero_delta() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(), 0.0);
    }

    #[test]
    fn time_accumulates() {
        let mut clock = FrameClock::new();
        clock.tick();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let delta = clock.tick();
        assert!(delta > 0.0);
        assert!(clock.total_time >= delta);
    }
}
