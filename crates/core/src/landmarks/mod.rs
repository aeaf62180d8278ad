//! Landmark data as delivered by the external detection models, and the
//! contract a detection backend has to satisfy.
//!
//! Face sets follow the 468-point face mesh convention, hand sets the
//! 21-point hand convention. Both are normalised camera coordinates.

mod script;

use serde::{Deserialize, Serialize};

use crate::{geometry::Vec2, MirrorError, Result};

pub use script::{face_at, HandPose, RecordedFrame, ScriptedSource};

pub const FACE_LANDMARK_COUNT: usize = 468;
pub const HAND_LANDMARK_COUNT: usize = 21;

/// Face mesh indices used by the anchor resolver.
pub mod face {
    pub const NOSE_TIP: usize = 1;
    pub const HAIRLINE: usize = 10;
    pub const LEFT_EYE_INNER: usize = 133;
    pub const CHIN: usize = 152;
    pub const LEFT_CHEEK: usize = 234;
    pub const RIGHT_EYE_INNER: usize = 362;
    pub const RIGHT_CHEEK: usize = 454;
}

/// Hand landmark indices.
pub mod hand {
    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_MCP: usize = 5;
    pub const INDEX_PIP: usize = 6;
    pub const INDEX_DIP: usize = 7;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_MCP: usize = 9;
    pub const MIDDLE_PIP: usize = 10;
    pub const MIDDLE_DIP: usize = 11;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_MCP: usize = 13;
    pub const RING_PIP: usize = 14;
    pub const RING_DIP: usize = 15;
    pub const RING_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec2>", into = "Vec<Vec2>")]
pub struct FaceLandmarks {
    points: Vec<Vec2>,
}

impl FaceLandmarks {
    pub fn new(points: Vec<Vec2>) -> Result<Self> {
        if points.len() < FACE_LANDMARK_COUNT {
            return Err(MirrorError::InvalidLandmarks {
                kind: "face",
                expected: FACE_LANDMARK_COUNT,
                actual: points.len(),
            });
        }
        Ok(Self { points })
    }

    pub fn point(&self, index: usize) -> Vec2 {
        self.points[index]
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn nose_tip(&self) -> Vec2 {
        self.point(face::NOSE_TIP)
    }
}

impl TryFrom<Vec<Vec2>> for FaceLandmarks {
    type Error = MirrorError;

    fn try_from(points: Vec<Vec2>) -> Result<Self> {
        Self::new(points)
    }
}

impl From<FaceLandmarks> for Vec<Vec2> {
    fn from(value: FaceLandmarks) -> Self {
        value.points
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandLandmarks {
    points: [Vec2; HAND_LANDMARK_COUNT],
}

impl HandLandmarks {
    pub fn new(points: [Vec2; HAND_LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    pub fn from_slice(points: &[Vec2]) -> Result<Self> {
        let points: [Vec2; HAND_LANDMARK_COUNT] =
            points
                .try_into()
                .map_err(|_| MirrorError::InvalidLandmarks {
                    kind: "hand",
                    expected: HAND_LANDMARK_COUNT,
                    actual: points.len(),
                })?;
        Ok(Self { points })
    }

    pub fn point(&self, index: usize) -> Vec2 {
        self.points[index]
    }

    pub fn points(&self) -> &[Vec2; HAND_LANDMARK_COUNT] {
        &self.points
    }
}

/// Handle on the video sample the detectors run against. Pixel data stays
/// with the camera backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VideoFrame {
    pub index: u64,
    pub width: u32,
    pub height: u32,
}

/// Detection backend contract.
///
/// Both detect calls must receive non-decreasing timestamps. A backend may
/// return several sets per call; the pipeline only tracks the first.
pub trait LandmarkSource {
    /// One-time model and camera setup. Failures are terminal.
    fn initialize(&mut self) -> Result<()> {
        Ok(())
    }

    fn detect_face(
        &mut self,
        frame: &VideoFrame,
        timestamp_ms: f64,
    ) -> Result<Option<Vec<FaceLandmarks>>>;

    fn detect_hands(
        &mut self,
        frame: &VideoFrame,
        timestamp_ms: f64,
    ) -> Result<Option<Vec<HandLandmarks>>>;

    /// True once the source has nothing more to deliver.
    fn is_exhausted(&self, _timestamp_ms: f64) -> bool {
        false
    }

    /// Releases the camera. Called once when the frame loop stops.
    fn release(&mut self) {}
}
