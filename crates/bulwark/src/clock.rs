//! # Tick Loop
//!
//! Fixed-timestep clock for the client simulation.
//!
//! Wall time is banked into an accumulator and paid out one fixed step at
//! a time. After a long stall only `max_catch_up` steps are paid out and
//! the rest of the debt is written off, so a hitch never turns into a
//! burst of hundreds of ticks.
//!
//! ```rust,ignore
//! let mut clock = TickLoop::new(60);
//! loop {
//!     while clock.should_tick() {
//!         let start = clock.begin_tick();
//!         simulation.advance(&clock, &input);
//!         clock.end_tick(start);
//!     }
//!     clock.wait_for_next_tick();
//! }
//! ```

use std::time::{Duration, Instant};

use crate::integration::Clock;
use bulwark_shared::TICK_RATE;

/// Steps paid out after a stall before the backlog is dropped.
pub const DEFAULT_MAX_CATCH_UP: u32 = 5;

/// Tick timing statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Ticks run.
    pub total_ticks: u64,
    /// Ticks whose work took longer than one step.
    pub late_ticks: u64,
    /// Steps written off after stalls.
    pub dropped_ticks: u64,
    /// Longest tick, in microseconds.
    pub max_tick_us: u64,
    /// Rolling average tick, in microseconds.
    pub avg_tick_us: u64,
}

/// Fixed-timestep clock.
#[derive(Debug)]
pub struct TickLoop {
    step: Duration,
    max_catch_up: u32,
    last_poll: Instant,
    owed: Duration,
    last_tick_start: Option<Instant>,
    /// Wall time between the two latest tick starts, capped at the catch-up
    /// window.
    frame_delta: Duration,
    stats: TickStats,
}

impl TickLoop {
    /// Creates a clock running `tick_rate` steps per second.
    #[must_use]
    pub fn new(tick_rate: u32) -> Self {
        let step = Duration::from_micros(1_000_000 / u64::from(tick_rate.max(1)));
        Self {
            step,
            max_catch_up: DEFAULT_MAX_CATCH_UP,
            last_poll: Instant::now(),
            owed: Duration::ZERO,
            last_tick_start: None,
            frame_delta: step,
            stats: TickStats {
                avg_tick_us: step.as_micros() as u64,
                ..TickStats::default()
            },
        }
    }

    /// Sets how many steps a stall may owe before the excess is dropped.
    #[must_use]
    pub fn with_max_catch_up(mut self, steps: u32) -> Self {
        self.max_catch_up = steps.max(1);
        self
    }

    fn catch_up_window(&self) -> Duration {
        self.step * self.max_catch_up
    }

    /// Returns true while a step is owed. Call in a loop until false.
    #[must_use]
    pub fn should_tick(&mut self) -> bool {
        let now = Instant::now();
        self.owed += now.duration_since(self.last_poll);
        self.last_poll = now;

        let window = self.catch_up_window();
        if self.owed > window {
            let dropped = ((self.owed - window).as_micros() / self.step.as_micros().max(1)) as u64;
            self.stats.dropped_ticks += dropped;
            tracing::debug!(dropped, "clock stalled, dropping backlog");
            self.owed = window;
        }

        self.owed >= self.step
    }

    /// Pays out one step. Returns the start time for [`Self::end_tick`].
    #[must_use]
    pub fn begin_tick(&mut self) -> Instant {
        self.owed = self.owed.saturating_sub(self.step);

        let now = Instant::now();
        if let Some(previous) = self.last_tick_start.replace(now) {
            self.frame_delta = now.duration_since(previous).min(self.catch_up_window());
        }
        now
    }

    /// Records how long the tick started at `start` took.
    pub fn end_tick(&mut self, start: Instant) {
        let took = start.elapsed();
        let took_us = took.as_micros() as u64;

        self.stats.total_ticks += 1;
        self.stats.max_tick_us = self.stats.max_tick_us.max(took_us);
        self.stats.avg_tick_us = (self.stats.avg_tick_us * 15 + took_us) / 16;

        if took > self.step {
            self.stats.late_ticks += 1;
            tracing::warn!(took_us, tick = self.stats.total_ticks, "late tick");
        }
    }

    /// Sleeps until the next step is due.
    pub fn wait_for_next_tick(&self) {
        let banked = self.last_poll.elapsed() + self.owed;
        if banked < self.step {
            std::thread::sleep(self.step - banked);
        }
    }

    /// Steps paid out so far.
    #[must_use]
    pub const fn tick_count(&self) -> u64 {
        self.stats.total_ticks
    }

    /// Timing statistics.
    #[must_use]
    pub const fn stats(&self) -> &TickStats {
        &self.stats
    }
}

impl Default for TickLoop {
    fn default() -> Self {
        Self::new(TICK_RATE)
    }
}

impl Clock for TickLoop {
    fn delta_time(&self) -> f32 {
        self.frame_delta.as_secs_f32()
    }

    fn fixed_delta_time(&self) -> f32 {
        self.step.as_secs_f32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_runs_at_sixty() {
        let clock = TickLoop::default();
        assert_eq!(clock.tick_count(), 0);
        assert!((clock.fixed_delta_time() - 1.0 / 60.0).abs() < 1e-4);
        // Before any tick the frame time is the nominal step
        assert!((clock.delta_time() - clock.fixed_delta_time()).abs() < f32::EPSILON);
    }

    #[test]
    fn test_tick_records_stats() {
        let mut clock = TickLoop::new(1000);
        std::thread::sleep(Duration::from_millis(2));
        assert!(clock.should_tick());

        let start = clock.begin_tick();
        clock.end_tick(start);
        assert_eq!(clock.tick_count(), 1);
        assert_eq!(clock.stats().total_ticks, 1);
    }

    #[test]
    fn test_stall_is_capped_at_catch_up_window() {
        let mut clock = TickLoop::new(1000).with_max_catch_up(3);
        std::thread::sleep(Duration::from_millis(20));

        let mut paid = 0;
        while clock.should_tick() {
            let start = clock.begin_tick();
            clock.end_tick(start);
            paid += 1;
        }
        // The window holds three steps; a slow machine may bank a few more
        // while the loop runs
        assert!((3..=6).contains(&paid), "paid {paid}");
        assert!(clock.stats().dropped_ticks >= 10);
    }

    #[test]
    fn test_frame_delta_measured_and_capped() {
        let mut clock = TickLoop::new(1000).with_max_catch_up(4);
        let _ = clock.begin_tick();
        std::thread::sleep(Duration::from_millis(2));
        let _ = clock.begin_tick();
        assert!(clock.delta_time() >= 0.002);

        std::thread::sleep(Duration::from_millis(30));
        let _ = clock.begin_tick();
        assert!((clock.delta_time() - 0.004).abs() < 1e-6);
    }
}
