//! Simulated clock with fixed steps and optional wall-clock pacing.

use std::time::{Duration, Instant};

use tracing::trace;
use vigil_core::config::ScenarioConfig;
use vigil_core::constants::CLOCK_END_TOLERANCE;
use vigil_core::types::ClockInfo;

/// Fixed-step simulated clock.
///
/// Time is always `start + tick * dt`. The first [`Clock::advance`] after
/// construction or [`Clock::reset`] is a zero-length initialisation tick
/// reporting `(start, 0)`.
#[derive(Debug)]
pub struct Clock {
    start: f64,
    end: Option<f64>,
    dt: f64,
    tick: u64,
    started: bool,
    pacer: Option<Pacer>,
}

impl Clock {
    pub fn new(config: &ScenarioConfig) -> Self {
        Self {
            start: config.start,
            end: config.end,
            dt: config.dt,
            tick: 0,
            started: false,
            pacer: config.realtime.then(|| Pacer::new(config.dt)),
        }
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> Option<f64> {
        self.end
    }

    /// Configured step, independent of the zero tick.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn now(&self) -> f64 {
        self.start + self.tick as f64 * self.dt
    }

    /// Current time and effective step. The step is zero until the clock
    /// has moved past `start`.
    pub fn info(&self) -> ClockInfo {
        ClockInfo {
            now: self.now(),
            dt: if self.tick == 0 { 0.0 } else { self.dt },
        }
    }

    pub fn is_finished(&self) -> bool {
        match self.end {
            Some(end) => self.started && self.now() > end + self.dt * CLOCK_END_TOLERANCE,
            None => false,
        }
    }

    /// Move to the next tick. Returns `None` once past `end`; the clock
    /// then stays put until [`Clock::reset`].
    pub fn advance(&mut self) -> Option<ClockInfo> {
        if self.is_finished() {
            return None;
        }
        if let Some(pacer) = self.pacer.as_mut() {
            pacer.wait();
        }
        if self.started {
            self.tick += 1;
        } else {
            self.started = true;
        }
        if self.is_finished() {
            trace!(now = self.now(), "clock finished");
            return None;
        }
        Some(self.info())
    }

    pub fn reset(&mut self) -> ClockInfo {
        self.tick = 0;
        self.started = false;
        if let Some(pacer) = self.pacer.as_mut() {
            pacer.restart();
        }
        self.info()
    }
}

/// Sleeps so consecutive ticks are at least one step of wall time apart.
#[derive(Debug)]
struct Pacer {
    step: Duration,
    next: Option<Instant>,
}

impl Pacer {
    fn new(dt: f64) -> Self {
        Self {
            step: Duration::from_secs_f64(dt),
            next: None,
        }
    }

    fn restart(&mut self) {
        self.next = None;
    }

    fn wait(&mut self) {
        let now = Instant::now();
        let Some(next) = self.next else {
            self.next = Some(now + self.step);
            return;
        };
        if next > now {
            std::thread::sleep(next - now);
        } else if now - next > self.step * 2 {
            // Too far behind; drop the backlog instead of racing to catch up.
            self.next = Some(now + self.step);
            return;
        }
        self.next = Some(next + self.step);
    }
}
