//! Pointer-driven timeline scrubbing with frame-rate independent easing.

use crate::core::constants::{EASE_REFERENCE_MS, TARGET_END_EPSILON_SEC};

/// Target and eased playback positions, both in `[0, duration)`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TimelineCursor {
    pub target_time: f64,
    pub current_time: f64,
}

/// Result of one integration step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrubStep {
    pub current_time: f64,
    /// `target - current` before easing was applied.
    pub delta: f64,
    /// False while the media source is mid-seek; the caller must not push
    /// `current_time` to the source this tick.
    pub apply_to_source: bool,
}

#[derive(Clone, Debug)]
pub struct ScrubController {
    cursor: TimelineCursor,
    duration: f64,
    smoothing: f64,
}

impl ScrubController {
    /// `smoothing` is the per-reference-frame retention factor `k` in (0, 1).
    pub fn new(smoothing: f64) -> Self {
        Self {
            cursor: TimelineCursor::default(),
            duration: 0.0,
            smoothing,
        }
    }

    pub fn cursor(&self) -> TimelineCursor {
        self.cursor
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn smoothing(&self) -> f64 {
        self.smoothing
    }

    /// Fix the timeline length once source metadata is known; resets the cursor.
    pub fn set_duration(&mut self, duration: f64) {
        self.duration = if duration.is_finite() {
            duration.max(0.0)
        } else {
            0.0
        };
        self.cursor = TimelineCursor::default();
    }

    fn max_time(&self) -> f64 {
        (self.duration - TARGET_END_EPSILON_SEC).max(0.0)
    }

    /// Map a normalized horizontal pointer position to a target time.
    pub fn set_target(&mut self, px: f64) {
        if !px.is_finite() {
            return;
        }
        self.cursor.target_time = (px * self.duration).clamp(0.0, self.max_time());
    }

    /// Advance `current_time` toward `target_time` by `elapsed_ms` of wall time.
    pub fn tick(&mut self, elapsed_ms: f64, source_busy: bool) -> ScrubStep {
        let delta = self.cursor.target_time - self.cursor.current_time;
        let ease = ease_factor(self.smoothing, elapsed_ms);
        self.cursor.current_time += delta * ease;
        ScrubStep {
            current_time: self.cursor.current_time,
            delta,
            apply_to_source: !source_busy,
        }
    }
}

/// `1 - k^(dt / 16.67)`, clamped to `[0, 1]`. Zero or invalid `dt` yields 0.
pub fn ease_factor(smoothing: f64, elapsed_ms: f64) -> f64 {
    if !(elapsed_ms > 0.0) || !elapsed_ms.is_finite() {
        return 0.0;
    }
    let ease = 1.0 - smoothing.powf(elapsed_ms / EASE_REFERENCE_MS);
    if ease.is_nan() {
        0.0
    } else {
        ease.clamp(0.0, 1.0)
    }
}
