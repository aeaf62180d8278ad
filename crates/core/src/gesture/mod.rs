//! Hand gesture classification.
//!
//! Turns one hand landmark set per frame into a [`GestureVector`]: a
//! mirrored cursor, finger extension flags, pinch and open-palm state, and
//! edge-triggered swipes.

mod smoothing;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    config::GestureConfig,
    geometry::{Vec2, Viewport},
    landmarks::{hand, HandLandmarks},
    timeline::Cooldown,
};

pub use smoothing::CursorSmoother;

/// Tip and knuckle indices for the four vertical fingers.
const VERTICAL_FINGERS: [(usize, usize); 4] = [
    (hand::INDEX_TIP, hand::INDEX_PIP),
    (hand::MIDDLE_TIP, hand::MIDDLE_PIP),
    (hand::RING_TIP, hand::RING_PIP),
    (hand::PINKY_TIP, hand::PINKY_PIP),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwipeDirection {
    Left,
    Right,
}

impl SwipeDirection {
    /// Catalog step used when a swipe cycles through assets.
    pub fn step(self) -> isize {
        match self {
            SwipeDirection::Left => -1,
            SwipeDirection::Right => 1,
        }
    }
}

/// A recognised swipe, carrying the finger count captured when it fired.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwipeEvent {
    pub direction: SwipeDirection,
    pub finger_count: u8,
    /// Single-frame movement in normalised units, screen direction.
    pub velocity: f32,
    pub timestamp_ms: f64,
}

/// What a swipe asks the mirror to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwipeAction {
    ClearStickers,
    CycleFace(SwipeDirection),
}

impl SwipeEvent {
    /// Three fingers clear everything; an open hand cycles the face asset.
    /// Other finger counts do nothing.
    pub fn action(&self) -> Option<SwipeAction> {
        match self.finger_count {
            3 => Some(SwipeAction::ClearStickers),
            5 => Some(SwipeAction::CycleFace(self.direction)),
            _ => None,
        }
    }
}

/// Per-frame hand summary consumed by the interaction machine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureVector {
    /// Index fingertip in mirrored screen pixels.
    pub cursor: Vec2,
    /// Thumb, index, middle, ring, pinky.
    pub fingers: [bool; 5],
    pub finger_count: u8,
    pub pinching: bool,
    /// Thumb-tip to index-tip distance, normalised units.
    pub pinch_distance: f32,
    pub open_palm: bool,
    /// Middle-knuckle movement since the previous frame, screen direction.
    pub swipe_delta: f32,
    pub swipe: Option<SwipeEvent>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GestureClassifier {
    config: GestureConfig,
    viewport: Viewport,
    previous_reference_x: Option<f32>,
    swipe_cooldown: Cooldown,
    smoother: Option<CursorSmoother>,
}

impl GestureClassifier {
    pub fn new(config: GestureConfig, viewport: Viewport) -> Self {
        let smoother = config
            .cursor_smoothing
            .then(|| CursorSmoother::new(config.smoothing_min_cutoff, config.smoothing_beta));
        Self {
            swipe_cooldown: Cooldown::new(config.swipe_cooldown_ms),
            config,
            viewport,
            previous_reference_x: None,
            smoother,
        }
    }

    /// Classifies the current hand. No hand yields no vector and forgets the
    /// swipe reference so a reappearing hand cannot swipe by teleporting.
    pub fn classify(&mut self, hand: Option<&HandLandmarks>, now_ms: f64) -> Option<GestureVector> {
        let Some(hand) = hand else {
            self.previous_reference_x = None;
            if let Some(smoother) = self.smoother.as_mut() {
                smoother.reset();
            }
            return None;
        };

        let fingers = self.extended_fingers(hand);
        let finger_count = fingers.iter().filter(|extended| **extended).count() as u8;
        let pinch_distance = hand
            .point(hand::THUMB_TIP)
            .distance(hand.point(hand::INDEX_TIP));

        let mut tip = hand.point(hand::INDEX_TIP);
        if let Some(smoother) = self.smoother.as_mut() {
            tip = smoother.smooth(now_ms, tip);
        }

        let reference_x = hand.point(hand::MIDDLE_MCP).x;
        let swipe_delta = self
            .previous_reference_x
            .map(|previous| -(reference_x - previous))
            .unwrap_or(0.0);
        self.previous_reference_x = Some(reference_x);

        let swipe = if swipe_delta.abs() > self.config.swipe_velocity
            && self.swipe_cooldown.try_fire(now_ms)
        {
            let direction = if swipe_delta > 0.0 {
                SwipeDirection::Right
            } else {
                SwipeDirection::Left
            };
            debug!(?direction, finger_count, delta = swipe_delta, "swipe recognised");
            Some(SwipeEvent {
                direction,
                finger_count,
                velocity: swipe_delta,
                timestamp_ms: now_ms,
            })
        } else {
            None
        };

        Some(GestureVector {
            cursor: self.viewport.to_screen(tip),
            fingers,
            finger_count,
            pinching: pinch_distance < self.config.pinch_threshold,
            pinch_distance,
            open_palm: finger_count == 5,
            swipe_delta,
            swipe,
        })
    }

    fn extended_fingers(&self, hand: &HandLandmarks) -> [bool; 5] {
        let mut fingers = [false; 5];
        let thumb_spread =
            (hand.point(hand::THUMB_TIP).x - hand.point(hand::INDEX_MCP).x).abs();
        fingers[0] = thumb_spread > self.config.thumb_extension;
        for (slot, (tip, knuckle)) in VERTICAL_FINGERS.iter().enumerate() {
            // Y grows downward: an extended tip sits above its knuckle.
            fingers[slot + 1] = hand.point(*tip).y < hand.point(*knuckle).y;
        }
        fingers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::HandPose;

    fn classifier() -> GestureClassifier {
        GestureClassifier::new(GestureConfig::default(), Viewport::new(1000.0, 500.0))
    }

    #[test]
    fn pointing_hand_mirrors_the_cursor() {
        let mut classifier = classifier();
        let hand = HandPose::Point.landmarks(Vec2::new(0.25, 0.4));
        let gesture = classifier.classify(Some(&hand), 0.0).unwrap();

        assert_eq!(gesture.cursor, Vec2::new(750.0, 200.0));
        assert_eq!(gesture.fingers, [false, true, false, false, false]);
        assert_eq!(gesture.finger_count, 1);
        assert!(!gesture.pinching);
        assert!(!gesture.open_palm);
        assert!(gesture.swipe.is_none());
    }

    #[test]
    fn counts_open_palm_and_three_fingers() {
        let mut classifier = classifier();
        let palm = HandPose::OpenPalm.landmarks(Vec2::new(0.5, 0.4));
        let gesture = classifier.classify(Some(&palm), 0.0).unwrap();
        assert_eq!(gesture.finger_count, 5);
        assert!(gesture.open_palm);

        let three = HandPose::ThreeFingers.landmarks(Vec2::new(0.5, 0.4));
        let gesture = classifier.classify(Some(&three), 16.0).unwrap();
        assert_eq!(gesture.finger_count, 3);
        assert!(!gesture.open_palm);
    }

    #[test]
    fn detects_pinch_below_threshold() {
        let mut classifier = classifier();
        let hand = HandPose::Pinch.landmarks(Vec2::new(0.5, 0.4));
        let gesture = classifier.classify(Some(&hand), 0.0).unwrap();
        assert!(gesture.pinching);
        assert!(gesture.pinch_distance < 0.05);
    }

    #[test]
    fn swipe_fires_once_per_cooldown_window() {
        let mut classifier = classifier();
        let mut fired = Vec::new();

        // 2400 ms of continuous fast motion at 20 ms frames.
        for frame in 0..=120 {
            let now = frame as f64 * 20.0;
            let hand = HandPose::ThreeFingers.landmarks(Vec2::new(0.9 - 0.05 * frame as f32, 0.4));
            if let Some(swipe) = classifier.classify(Some(&hand), now).unwrap().swipe {
                fired.push(swipe);
            }
        }

        assert_eq!(fired.len(), 3);
        let times: Vec<f64> = fired.iter().map(|swipe| swipe.timestamp_ms).collect();
        assert_eq!(times, vec![20.0, 820.0, 1620.0]);
        assert!(fired.iter().all(|swipe| swipe.direction == SwipeDirection::Right));
        assert!(fired.iter().all(|swipe| swipe.action() == Some(SwipeAction::ClearStickers)));
    }

    #[test]
    fn slow_motion_never_swipes() {
        let mut classifier = classifier();
        for frame in 0..100 {
            let hand = HandPose::OpenPalm.landmarks(Vec2::new(0.5 + 0.01 * frame as f32, 0.4));
            let gesture = classifier.classify(Some(&hand), frame as f64 * 20.0).unwrap();
            assert!(gesture.swipe.is_none());
        }
    }

    #[test]
    fn losing_the_hand_forgets_the_reference() {
        let mut classifier = classifier();
        let left = HandPose::Point.landmarks(Vec2::new(0.1, 0.4));
        let right = HandPose::Point.landmarks(Vec2::new(0.9, 0.4));

        classifier.classify(Some(&left), 0.0);
        assert!(classifier.classify(None, 20.0).is_none());
        let gesture = classifier.classify(Some(&right), 40.0).unwrap();
        assert_eq!(gesture.swipe_delta, 0.0);
        assert!(gesture.swipe.is_none());
    }

    #[test]
    fn palm_swipe_cycles_in_its_direction() {
        let mut classifier = classifier();
        classifier.classify(Some(&HandPose::OpenPalm.landmarks(Vec2::new(0.3, 0.4))), 0.0);
        let gesture = classifier
            .classify(Some(&HandPose::OpenPalm.landmarks(Vec2::new(0.4, 0.4))), 20.0)
            .unwrap();
        let swipe = gesture.swipe.unwrap();
        assert_eq!(swipe.direction, SwipeDirection::Left);
        assert_eq!(swipe.action(), Some(SwipeAction::CycleFace(SwipeDirection::Left)));
    }

    #[test]
    fn smoothing_lags_behind_a_jump() {
        let config = GestureConfig {
            cursor_smoothing: true,
            ..GestureConfig::default()
        };
        let mut classifier = GestureClassifier::new(config, Viewport::new(1000.0, 500.0));
        classifier.classify(Some(&HandPose::Point.landmarks(Vec2::new(0.5, 0.5))), 0.0);
        let gesture = classifier
            .classify(Some(&HandPose::Point.landmarks(Vec2::new(0.52, 0.5))), 16.0)
            .unwrap();
        // Raw cursor would be at x = 480.
        assert!(gesture.cursor.x > 480.0 && gesture.cursor.x < 500.0);
    }
}
