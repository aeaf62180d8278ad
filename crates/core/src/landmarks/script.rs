//! Replayable landmark streams.
//!
//! [`ScriptedSource`] stands in for the live detectors: it answers detect
//! calls from a recorded list of frames, either loaded from JSON or built
//! from synthetic poses.

use serde::{Deserialize, Serialize};

use super::{
    face, hand, FaceLandmarks, HandLandmarks, LandmarkSource, VideoFrame, FACE_LANDMARK_COUNT,
    HAND_LANDMARK_COUNT,
};
use crate::{
    assets::{AssetCatalog, Category},
    config::MirrorConfig,
    geometry::{Vec2, Viewport},
    interaction::UiLayout,
    MirrorError, Result,
};

/// One recorded detector sample, as stored in replay files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    pub timestamp_ms: f64,
    #[serde(default)]
    pub face: Option<Vec<[f32; 2]>>,
    #[serde(default)]
    pub hand: Option<Vec<[f32; 2]>>,
}

#[derive(Debug, Clone)]
struct ParsedFrame {
    timestamp_ms: f64,
    face: Option<FaceLandmarks>,
    hand: Option<HandLandmarks>,
}

/// Landmark source that replays recorded frames.
///
/// A query answers with the latest frame recorded at or before the query
/// time. Queries must not go backwards, matching the live detector contract.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    frames: Vec<ParsedFrame>,
    last_face_query: Option<f64>,
    last_hand_query: Option<f64>,
}

impl ScriptedSource {
    pub fn from_frames(recorded: Vec<RecordedFrame>) -> Result<Self> {
        let mut frames = Vec::with_capacity(recorded.len());
        let mut previous: Option<f64> = None;

        for frame in recorded {
            if let Some(previous) = previous {
                if frame.timestamp_ms < previous {
                    return Err(MirrorError::NonMonotonicTimestamp {
                        previous,
                        next: frame.timestamp_ms,
                    });
                }
            }
            previous = Some(frame.timestamp_ms);

            let face = frame
                .face
                .map(|points| FaceLandmarks::new(points.into_iter().map(Vec2::from).collect()))
                .transpose()?;
            let hand = frame
                .hand
                .map(|points| {
                    let points: Vec<Vec2> = points.into_iter().map(Vec2::from).collect();
                    HandLandmarks::from_slice(&points)
                })
                .transpose()?;

            frames.push(ParsedFrame {
                timestamp_ms: frame.timestamp_ms,
                face,
                hand,
            });
        }

        Ok(Self {
            frames,
            last_face_query: None,
            last_hand_query: None,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let recorded: Vec<RecordedFrame> = serde_json::from_str(json)?;
        Self::from_frames(recorded)
    }

    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Timestamp of the last recorded frame.
    pub fn end_ms(&self) -> Option<f64> {
        self.frames.last().map(|frame| frame.timestamp_ms)
    }

    fn frame_at(&self, timestamp_ms: f64) -> Option<&ParsedFrame> {
        let after = self
            .frames
            .partition_point(|frame| frame.timestamp_ms <= timestamp_ms);
        after.checked_sub(1).map(|index| &self.frames[index])
    }

    /// Builds the built-in demonstration session. With a face centred on
    /// screen, the hand picks the "faces" category, places the first face
    /// asset, lets the drag settle on the face, then opens its palm to spawn
    /// effects before leaving the frame.
    pub fn demo(config: &MirrorConfig, catalog: &AssetCatalog) -> Result<Self> {
        let viewport = config.viewport;
        let interval = config.frame.interval_ms;
        let layout = UiLayout::for_category(catalog, Category::Faces, viewport);

        let category_target = layout
            .category_button(Category::Faces)
            .map(|button| button.rect.center())
            .unwrap_or(Vec2::new(48.0, 428.0));
        let asset_target = layout
            .asset_buttons()
            .first()
            .map(|button| button.rect.center())
            .unwrap_or(Vec2::new(156.0, 668.0));

        let nose = Vec2::new(0.5, 0.45);
        let face_points = to_pairs(face_at(nose, 0.18, 0.0).points());
        let face_screen = viewport.to_screen(nose);

        let phases: [(f64, Option<(HandPose, Vec2)>); 6] = [
            (300.0, None),
            (2_100.0, Some((HandPose::Point, category_target))),
            (4_000.0, Some((HandPose::Point, asset_target))),
            (5_800.0, Some((HandPose::Point, face_screen + Vec2::new(0.0, 6.0)))),
            (7_300.0, Some((HandPose::OpenPalm, face_screen - Vec2::new(0.0, 80.0)))),
            (8_000.0, None),
        ];

        let mut frames = Vec::new();
        let mut index = 0u64;
        for (end_ms, hand_pose) in phases {
            loop {
                let timestamp_ms = index as f64 * interval;
                if timestamp_ms >= end_ms {
                    break;
                }
                let hand = hand_pose.map(|(pose, screen)| {
                    let tip = to_normalized(viewport, screen);
                    to_pairs(pose.landmarks(tip).points())
                });
                frames.push(RecordedFrame {
                    timestamp_ms,
                    face: Some(face_points.clone()),
                    hand,
                });
                index += 1;
            }
        }

        Self::from_frames(frames)
    }
}

impl LandmarkSource for ScriptedSource {
    fn detect_face(
        &mut self,
        _frame: &VideoFrame,
        timestamp_ms: f64,
    ) -> Result<Option<Vec<FaceLandmarks>>> {
        check_monotonic(&mut self.last_face_query, timestamp_ms)?;
        Ok(self
            .frame_at(timestamp_ms)
            .and_then(|frame| frame.face.clone())
            .map(|face| vec![face]))
    }

    fn detect_hands(
        &mut self,
        _frame: &VideoFrame,
        timestamp_ms: f64,
    ) -> Result<Option<Vec<HandLandmarks>>> {
        check_monotonic(&mut self.last_hand_query, timestamp_ms)?;
        Ok(self
            .frame_at(timestamp_ms)
            .and_then(|frame| frame.hand)
            .map(|hand| vec![hand]))
    }

    fn is_exhausted(&self, timestamp_ms: f64) -> bool {
        self.end_ms().map(|end| timestamp_ms > end).unwrap_or(true)
    }
}

fn check_monotonic(last: &mut Option<f64>, next: f64) -> Result<()> {
    if let Some(previous) = *last {
        if next < previous {
            return Err(MirrorError::NonMonotonicTimestamp { previous, next });
        }
    }
    *last = Some(next);
    Ok(())
}

fn to_normalized(viewport: Viewport, screen: Vec2) -> Vec2 {
    Vec2::new(1.0 - screen.x / viewport.width, screen.y / viewport.height)
}

fn to_pairs(points: &[Vec2]) -> Vec<[f32; 2]> {
    points.iter().map(|point| [point.x, point.y]).collect()
}

/// Synthetic face mesh: every point sits on the nose except the handful the
/// anchor resolver reads. `width` is the normalised cheek-to-cheek distance
/// and `roll_deg` tilts the layout around the nose.
pub fn face_at(nose: Vec2, width: f32, roll_deg: f32) -> FaceLandmarks {
    let (sin, cos) = roll_deg.to_radians().sin_cos();
    let place = |offset: Vec2| {
        nose + Vec2::new(
            offset.x * cos - offset.y * sin,
            offset.x * sin + offset.y * cos,
        )
    };

    let mut points = vec![nose; FACE_LANDMARK_COUNT];
    points[face::LEFT_CHEEK] = place(Vec2::new(-width * 0.5, -0.02));
    points[face::RIGHT_CHEEK] = place(Vec2::new(width * 0.5, -0.02));
    points[face::LEFT_EYE_INNER] = place(Vec2::new(-0.03, -0.07));
    points[face::RIGHT_EYE_INNER] = place(Vec2::new(0.03, -0.07));
    points[face::HAIRLINE] = place(Vec2::new(0.0, -0.22));
    points[face::CHIN] = place(Vec2::new(0.0, 0.14));

    FaceLandmarks { points }
}

/// Canonical hand shapes used to synthesise landmark streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandPose {
    /// Index finger up, everything else folded.
    Point,
    /// Pointing with the thumb tip touching the index tip.
    Pinch,
    /// Index, middle and ring fingers up.
    ThreeFingers,
    /// All five fingers spread.
    OpenPalm,
}

impl HandPose {
    /// Lays the pose out so the index fingertip lands on `index_tip`
    /// (normalised camera space).
    pub fn landmarks(self, index_tip: Vec2) -> HandLandmarks {
        let (middle, ring, pinky, thumb) = match self {
            HandPose::Point => (false, false, false, Thumb::Tucked),
            HandPose::Pinch => (false, false, false, Thumb::Pinching),
            HandPose::ThreeFingers => (true, true, false, Thumb::Tucked),
            HandPose::OpenPalm => (true, true, true, Thumb::Spread),
        };

        let mut offsets = [Vec2::ZERO; HAND_LANDMARK_COUNT];
        offsets[hand::WRIST] = Vec2::new(0.0, 0.25);
        finger(&mut offsets, hand::INDEX_MCP, 0.0, true);
        finger(&mut offsets, hand::MIDDLE_MCP, 0.03, middle);
        finger(&mut offsets, hand::RING_MCP, 0.06, ring);
        finger(&mut offsets, hand::PINKY_MCP, 0.09, pinky);

        let thumb_chain = match thumb {
            Thumb::Tucked => [(-0.02, 0.21), (-0.02, 0.17), (-0.01, 0.15), (0.01, 0.14)],
            Thumb::Pinching => [(-0.02, 0.21), (-0.03, 0.15), (-0.02, 0.08), (0.01, 0.02)],
            Thumb::Spread => [(-0.03, 0.21), (-0.06, 0.18), (-0.09, 0.15), (-0.12, 0.13)],
        };
        for (joint, (x, y)) in thumb_chain.into_iter().enumerate() {
            offsets[hand::THUMB_CMC + joint] = Vec2::new(x, y);
        }

        HandLandmarks::new(offsets.map(|offset| index_tip + offset))
    }
}

#[derive(Clone, Copy)]
enum Thumb {
    Tucked,
    Pinching,
    Spread,
}

fn finger(offsets: &mut [Vec2; HAND_LANDMARK_COUNT], mcp: usize, column: f32, extended: bool) {
    let rows = if extended {
        [0.12, 0.08, 0.04, 0.0]
    } else {
        [0.12, 0.09, 0.11, 0.13]
    };
    for (joint, row) in rows.into_iter().enumerate() {
        offsets[mcp + joint] = Vec2::new(column, row);
    }
}
