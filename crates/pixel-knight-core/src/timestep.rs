//! Fixed-rate tick scheduling

use crate::TICK_RATE;

/// Converts frame times into a whole number of simulation ticks.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    tick_length: f32,
    accumulator: f32,
    max_ticks_per_frame: u32,
    total_ticks: u64,
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(TICK_RATE)
    }
}

impl FixedTimestep {
    /// Cap on ticks run for a single frame
    pub const MAX_TICKS_PER_FRAME: u32 = 5;

    pub fn new(tick_rate: u32) -> Self {
        Self {
            tick_length: 1.0 / tick_rate.max(1) as f32,
            accumulator: 0.0,
            max_ticks_per_frame: Self::MAX_TICKS_PER_FRAME,
            total_ticks: 0,
        }
    }

    pub fn tick_length(&self) -> f32 {
        self.tick_length
    }

    /// Ticks run since creation
    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    /// Add `dt` seconds and return how many ticks to run now
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.max(0.0);

        // Cap steps so a long stall slows the game instead of fast-forwarding it
        let mut ticks = 0;
        while self.accumulator >= self.tick_length && ticks < self.max_ticks_per_frame {
            self.accumulator -= self.tick_length;
            ticks += 1;
        }

        // Clamp accumulator to prevent runaway
        if self.accumulator > self.tick_length * 2.0 {
            self.accumulator = self.tick_length;
        }

        self.total_ticks += ticks as u64;
        ticks
    }

    /// Fraction of the next tick already accumulated
    pub fn alpha(&self) -> f32 {
        (self.accumulator / self.tick_length).clamp(0.0, 1.0)
    }
}
