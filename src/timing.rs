//! Fixed-cadence frame pacing without blocking sleeps.
//!
//! [`FrameClock`] accumulates wall-clock time separately for renders and for
//! logic updates and reports, on each poll, whether a render is due and how
//! many fixed-length updates have elapsed. [`FpsCounter`] turns the resulting
//! stream of renders and updates into per-second rates.
//!
//! Both take the current [`Instant`] from the caller, so a driver can feed
//! them a real clock and tests a synthetic one.

use std::time::{Duration, Instant};

/// Upper bound on updates reported by one poll. Time beyond it is dropped so
/// a long stall cannot trigger an unbounded catch-up burst.
pub const MAX_UPDATES_PER_TICK: u32 = 8;

/// What a single [`FrameClock::tick`] asks the driver to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub render: bool,
    pub updates: u32,
    /// Length of one update step.
    pub update_step: Duration,
}

#[derive(Debug, Clone)]
pub struct FrameClock {
    frame_period: Duration,
    update_period: Duration,
    frame_accumulator: Duration,
    update_accumulator: Duration,
    last: Option<Instant>,
}

impl FrameClock {
    /// Rates of zero are treated as one per second.
    pub fn new(frames_per_second: u32, updates_per_second: u32) -> Self {
        Self {
            frame_period: period(frames_per_second),
            update_period: period(updates_per_second),
            frame_accumulator: Duration::ZERO,
            update_accumulator: Duration::ZERO,
            last: None,
        }
    }

    pub fn frame_period(&self) -> Duration {
        self.frame_period
    }

    pub fn update_period(&self) -> Duration {
        self.update_period
    }

    /// Adds the time since the previous tick to both accumulators and drains
    /// whatever is due. The first tick only starts the clock.
    pub fn tick(&mut self, now: Instant) -> Tick {
        let elapsed = match self.last {
            Some(last) => now.saturating_duration_since(last),
            None => Duration::ZERO,
        };
        self.last = Some(now);
        self.frame_accumulator += elapsed;
        self.update_accumulator += elapsed;

        let mut updates = 0;
        while self.update_accumulator >= self.update_period {
            self.update_accumulator -= self.update_period;
            updates += 1;
            if updates == MAX_UPDATES_PER_TICK {
                self.update_accumulator = Duration::ZERO;
                break;
            }
        }

        // At most one render per tick; missed frames are skipped, not queued.
        let render = self.frame_accumulator >= self.frame_period;
        if render {
            let nanos = self.frame_accumulator.as_nanos() % self.frame_period.as_nanos();
            self.frame_accumulator = Duration::from_nanos(nanos as u64);
        }

        Tick {
            render,
            updates,
            update_step: self.update_period,
        }
    }
}

fn period(per_second: u32) -> Duration {
    Duration::from_secs(1) / per_second.max(1)
}

/// Renders and updates counted over one window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FpsReport {
    pub frames: u32,
    pub updates: u32,
}

/// Counts renders and updates and reports them once per elapsed second.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    window_start: Option<Instant>,
    frames: u32,
    updates: u32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl FpsCounter {
    pub fn new() -> Self {
        Self {
            window_start: None,
            frames: 0,
            updates: 0,
        }
    }

    /// Records one tick's work. Returns the totals when a full second has
    /// passed since the window opened, then starts a new window.
    pub fn record(&mut self, now: Instant, tick: &Tick) -> Option<FpsReport> {
        let start = *self.window_start.get_or_insert(now);
        self.frames += u32::from(tick.render);
        self.updates += tick.updates;

        if now.saturating_duration_since(start) < Duration::from_secs(1) {
            return None;
        }

        let report = FpsReport {
            frames: self.frames,
            updates: self.updates,
        };
        self.window_start = Some(start + Duration::from_secs(1));
        self.frames = 0;
        self.updates = 0;
        Some(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn first_tick_does_nothing() {
        let mut clock = FrameClock::new(60, 60);
        let tick = clock.tick(Instant::now());
        assert!(!tick.render);
        assert_eq!(tick.updates, 0);
    }

    #[test]
    fn renders_once_period_has_elapsed() {
        let mut clock = FrameClock::new(50, 50);
        let t0 = Instant::now();
        clock.tick(t0);
        assert!(!clock.tick(t0 + ms(10)).render);
        let tick = clock.tick(t0 + ms(20));
        assert!(tick.render);
        assert_eq!(tick.updates, 1);
        assert_eq!(tick.update_step, ms(20));
    }

    #[test]
    fn cadences_are_independent() {
        let mut clock = FrameClock::new(10, 100);
        let t0 = Instant::now();
        clock.tick(t0);
        let tick = clock.tick(t0 + ms(50));
        assert!(!tick.render);
        assert_eq!(tick.updates, 5);
    }

    #[test]
    fn long_stall_is_capped() {
        let mut clock = FrameClock::new(60, 100);
        let t0 = Instant::now();
        clock.tick(t0);
        let tick = clock.tick(t0 + Duration::from_secs(5));
        assert!(tick.render);
        assert_eq!(tick.updates, MAX_UPDATES_PER_TICK);
        // Nothing is carried over into the next poll.
        assert_eq!(clock.tick(t0 + Duration::from_secs(5) + ms(1)).updates, 0);
    }

    #[test]
    fn steady_polling_hits_target_rates() {
        let mut clock = FrameClock::new(60, 60);
        let mut counter = FpsCounter::new();
        let t0 = Instant::now();
        let mut report = None;
        // Poll every millisecond for a little over one second.
        for i in 0..=1000u64 {
            let now = t0 + ms(i);
            let tick = clock.tick(now);
            if let Some(r) = counter.record(now, &tick) {
                report = Some(r);
            }
        }
        let report = report.unwrap();
        assert!((59..=60).contains(&report.frames), "{report:?}");
        assert!((59..=60).contains(&report.updates), "{report:?}");
    }
}
