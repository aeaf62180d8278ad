//! Adaptive low-pass for the fingertip cursor (One Euro).
//!
//! Heavy smoothing while the hand is still, little lag once it moves fast.
//! Works on the whole point so the cutoff follows the cursor's speed rather
//! than each axis on its own.

use std::f32::consts::TAU;

use crate::geometry::Vec2;

/// Cutoff used to smooth the velocity estimate itself.
const VELOCITY_CUTOFF_HZ: f32 = 1.0;

fn blend(from: Vec2, to: Vec2, alpha: f32) -> Vec2 {
    Vec2::new(from.x + (to.x - from.x) * alpha, from.y + (to.y - from.y) * alpha)
}

fn alpha(elapsed_s: f32, cutoff_hz: f32) -> f32 {
    let r = TAU * cutoff_hz * elapsed_s;
    r / (r + 1.0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Sample {
    at_ms: f64,
    position: Vec2,
    /// Units per second.
    velocity: Vec2,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CursorSmoother {
    min_cutoff_hz: f32,
    beta: f32,
    last: Option<Sample>,
}

impl CursorSmoother {
    pub fn new(min_cutoff_hz: f32, beta: f32) -> Self {
        Self {
            min_cutoff_hz,
            beta,
            last: None,
        }
    }

    /// Smooths `point` observed at `now_ms`. The first point after a reset
    /// passes through; repeated or older stamps return the last output.
    pub fn smooth(&mut self, now_ms: f64, point: Vec2) -> Vec2 {
        let Some(last) = self.last else {
            self.last = Some(Sample {
                at_ms: now_ms,
                position: point,
                velocity: Vec2::ZERO,
            });
            return point;
        };

        let elapsed_s = ((now_ms - last.at_ms) / 1000.0) as f32;
        if elapsed_s <= 0.0 {
            return last.position;
        }

        let raw_velocity = Vec2::new(
            (point.x - last.position.x) / elapsed_s,
            (point.y - last.position.y) / elapsed_s,
        );
        let velocity = blend(
            last.velocity,
            raw_velocity,
            alpha(elapsed_s, VELOCITY_CUTOFF_HZ),
        );
        let cutoff = self.min_cutoff_hz + self.beta * velocity.length();
        let position = blend(last.position, point, alpha(elapsed_s, cutoff));

        self.last = Some(Sample {
            at_ms: now_ms,
            position,
            velocity,
        });
        position
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}
