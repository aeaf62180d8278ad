use serde::{Deserialize, Serialize};

/// Fixed-step clock that stamps each frame the loop produces.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameClock {
    interval_ms: f64,
    origin_ms: f64,
    now_ms: f64,
    frame_index: u64,
}

impl FrameClock {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms: interval_ms.max(0.0),
            origin_ms: 0.0,
            now_ms: 0.0,
            frame_index: 0,
        }
    }

    pub fn starting_at(interval_ms: f64, now_ms: f64) -> Self {
        Self {
            origin_ms: now_ms,
            now_ms,
            ..Self::new(interval_ms)
        }
    }

    pub fn reset(&mut self) {
        self.now_ms = self.origin_ms;
        self.frame_index = 0;
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Returns the timestamp of the current frame and moves to the next one.
    /// Stamps are computed from the frame index so they never drift.
    pub fn tick(&mut self) -> f64 {
        let stamp = self.now_ms;
        self.frame_index += 1;
        self.now_ms = self.origin_ms + self.frame_index as f64 * self.interval_ms;
        stamp
    }
}

/// Edge-triggered rate limiter: fires at most once per `period_ms`.
///
/// The token remembers when it last fired instead of tracking a boolean, so a
/// condition that stays true for several periods fires once per period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cooldown {
    period_ms: f64,
    last_fired: Option<f64>,
}

impl Cooldown {
    pub fn new(period_ms: f64) -> Self {
        Self {
            period_ms,
            last_fired: None,
        }
    }

    pub fn period_ms(&self) -> f64 {
        self.period_ms
    }

    pub fn last_fired(&self) -> Option<f64> {
        self.last_fired
    }

    pub fn is_ready(&self, now_ms: f64) -> bool {
        self.last_fired
            .map(|last| now_ms - last >= self.period_ms)
            .unwrap_or(true)
    }

    /// Fires and records `now_ms` if the period has elapsed.
    pub fn try_fire(&mut self, now_ms: f64) -> bool {
        if self.is_ready(now_ms) {
            self.last_fired = Some(now_ms);
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.last_fired = None;
    }
}
