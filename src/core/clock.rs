//! Injected time sources and the frame-rate limiter.
//!
//! All timers in the pipeline take milliseconds from a [`Clock`] so tests can
//! advance time deterministically.

use instant::Instant;
use std::cell::Cell;

pub trait Clock {
    /// Monotonic milliseconds since an arbitrary origin.
    fn now_ms(&self) -> f64;
}

/// Wall clock backed by `instant` (performance.now() in the browser).
pub struct InstantClock {
    origin: Instant,
}

impl InstantClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for InstantClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for InstantClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Manually advanced clock for deterministic stepping.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// Enforces a minimum interval between processed ticks.
///
/// Callbacks arriving sooner than the interval are deferred to a later
/// callback instead of being processed twice.
#[derive(Debug, Clone)]
pub struct FrameLimiter {
    interval_ms: f64,
    last_ms: Option<f64>,
}

impl FrameLimiter {
    pub fn new(frame_rate: f64) -> Self {
        Self {
            interval_ms: 1000.0 / frame_rate.max(f64::EPSILON),
            last_ms: None,
        }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Elapsed milliseconds since the last accepted tick, or `None` when the
    /// callback came too early. The first call is measured from time zero.
    pub fn poll(&self, now_ms: f64) -> Option<f64> {
        let elapsed = now_ms - self.last_ms.unwrap_or(0.0);
        (elapsed >= self.interval_ms).then_some(elapsed)
    }

    /// Mark a tick as processed at `now_ms`.
    pub fn commit(&mut self, now_ms: f64) {
        self.last_ms = Some(now_ms);
    }

    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}
