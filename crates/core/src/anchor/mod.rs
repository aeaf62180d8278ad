//! Face anchors: semantic attachment points derived from the face mesh.
//!
//! A resolved [`AnchorSample`] lives in normalised camera space. Stickers are
//! positioned from its [`ScreenAnchor`] projection, and every conversion
//! between anchor scale and sticker scale goes through
//! [`ScreenAnchor::sticker_unit`].

use serde::{Deserialize, Serialize};

use crate::{
    geometry::{Vec2, Viewport},
    landmarks::{face, FaceLandmarks},
};

/// Pixel size a sticker with scale 1.0 is authored at. A face exactly this
/// wide on screen leaves sticker scales untouched.
pub const REFERENCE_STICKER_PX: f32 = 128.0;

/// The body anchor sits on the chin but spans the torso.
pub const BODY_SCALE_FACTOR: f32 = 2.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorType {
    Head,
    Eyes,
    Face,
    Body,
    None,
}

impl AnchorType {
    /// Every type that follows the face.
    pub const TRACKED: [AnchorType; 4] = [
        AnchorType::Head,
        AnchorType::Eyes,
        AnchorType::Face,
        AnchorType::Body,
    ];

    /// Parses a string selector. Unknown selectors yield `None`.
    pub fn parse(selector: &str) -> Option<AnchorType> {
        match selector.trim().to_ascii_lowercase().as_str() {
            "head" => Some(AnchorType::Head),
            "eyes" => Some(AnchorType::Eyes),
            "face" => Some(AnchorType::Face),
            "body" => Some(AnchorType::Body),
            "none" => Some(AnchorType::None),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AnchorType::Head => "head",
            AnchorType::Eyes => "eyes",
            AnchorType::Face => "face",
            AnchorType::Body => "body",
            AnchorType::None => "none",
        }
    }

    /// Position resolver for this anchor. Unbound stickers have none.
    pub fn resolver(self) -> Option<fn(&FaceLandmarks) -> Vec2> {
        match self {
            AnchorType::Head => Some(head_position),
            AnchorType::Eyes => Some(eyes_position),
            AnchorType::Face => Some(face_position),
            AnchorType::Body => Some(body_position),
            AnchorType::None => None,
        }
    }

    /// Extra multiplier the consuming sticker applies on top of face width.
    pub fn scale_factor(self) -> f32 {
        match self {
            AnchorType::Body => BODY_SCALE_FACTOR,
            _ => 1.0,
        }
    }
}

fn head_position(face: &FaceLandmarks) -> Vec2 {
    face.point(face::HAIRLINE)
}

fn eyes_position(face: &FaceLandmarks) -> Vec2 {
    face.point(face::LEFT_EYE_INNER)
        .midpoint(face.point(face::RIGHT_EYE_INNER))
}

fn face_position(face: &FaceLandmarks) -> Vec2 {
    face.point(face::NOSE_TIP)
}

fn body_position(face: &FaceLandmarks) -> Vec2 {
    face.point(face::CHIN)
}

/// Anchor resolved from one face sample, in normalised camera space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchorSample {
    pub anchor: AnchorType,
    pub position: Vec2,
    /// Cheek-to-cheek distance.
    pub scale: f32,
    /// Camera-space roll across the inner eye corners, in degrees.
    pub rotation: f32,
}

impl AnchorSample {
    pub fn to_screen(&self, viewport: Viewport) -> ScreenAnchor {
        ScreenAnchor {
            anchor: self.anchor,
            position: viewport.to_screen(self.position),
            scale_px: self.scale * viewport.width,
            rotation: self.rotation,
        }
    }
}

/// An [`AnchorSample`] projected into mirrored screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenAnchor {
    pub anchor: AnchorType,
    pub position: Vec2,
    pub scale_px: f32,
    pub rotation: f32,
}

impl ScreenAnchor {
    /// Anchor scale normalised to [`REFERENCE_STICKER_PX`], including the
    /// per-anchor factor.
    pub fn sticker_unit(&self) -> f32 {
        self.scale_px / REFERENCE_STICKER_PX * self.anchor.scale_factor()
    }
}

pub fn face_width(face: &FaceLandmarks) -> f32 {
    face.point(face::LEFT_CHEEK)
        .distance(face.point(face::RIGHT_CHEEK))
}

pub fn roll_degrees(face: &FaceLandmarks) -> f32 {
    let delta = face.point(face::RIGHT_EYE_INNER) - face.point(face::LEFT_EYE_INNER);
    delta.y.atan2(delta.x).to_degrees()
}

/// Resolves one anchor. `AnchorType::None` resolves to nothing.
pub fn resolve(face: &FaceLandmarks, anchor: AnchorType) -> Option<AnchorSample> {
    let resolver = anchor.resolver()?;
    Some(AnchorSample {
        anchor,
        position: resolver(face),
        scale: face_width(face),
        rotation: roll_degrees(face),
    })
}

/// Resolves from a string selector; unknown selectors yield nothing.
pub fn resolve_named(face: &FaceLandmarks, selector: &str) -> Option<AnchorSample> {
    AnchorType::parse(selector).and_then(|anchor| resolve(face, anchor))
}

/// All four tracked anchors for one face sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchorFrame {
    pub head: AnchorSample,
    pub eyes: AnchorSample,
    pub face: AnchorSample,
    pub body: AnchorSample,
}

impl AnchorFrame {
    pub fn resolve(landmarks: &FaceLandmarks) -> Self {
        let scale = face_width(landmarks);
        let rotation = roll_degrees(landmarks);
        let sample = |anchor: AnchorType, position: fn(&FaceLandmarks) -> Vec2| AnchorSample {
            anchor,
            position: position(landmarks),
            scale,
            rotation,
        };

        Self {
            head: sample(AnchorType::Head, head_position),
            eyes: sample(AnchorType::Eyes, eyes_position),
            face: sample(AnchorType::Face, face_position),
            body: sample(AnchorType::Body, body_position),
        }
    }

    pub fn get(&self, anchor: AnchorType) -> Option<&AnchorSample> {
        match anchor {
            AnchorType::Head => Some(&self.head),
            AnchorType::Eyes => Some(&self.eyes),
            AnchorType::Face => Some(&self.face),
            AnchorType::Body => Some(&self.body),
            AnchorType::None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::face_at;

    #[test]
    fn resolves_each_anchor_from_its_landmark() {
        let face = face_at(Vec2::new(0.5, 0.5), 0.2, 0.0);

        let eyes = resolve(&face, AnchorType::Eyes).unwrap();
        assert!((eyes.position.x - 0.5).abs() < 1e-6);
        assert!((eyes.position.y - 0.43).abs() < 1e-6);

        assert_eq!(resolve(&face, AnchorType::Face).unwrap().position, Vec2::new(0.5, 0.5));
        assert_eq!(
            resolve(&face, AnchorType::Head).unwrap().position,
            face.point(face::HAIRLINE)
        );
        assert_eq!(
            resolve(&face, AnchorType::Body).unwrap().position,
            face.point(face::CHIN)
        );
    }

    #[test]
    fn scale_is_cheek_distance_and_rotation_is_eye_roll() {
        let face = face_at(Vec2::new(0.4, 0.6), 0.25, 20.0);
        let sample = resolve(&face, AnchorType::Face).unwrap();

        assert!((sample.scale - 0.25).abs() < 1e-5);
        assert!((sample.rotation - 20.0).abs() < 1e-3);
    }

    #[test]
    fn unbound_and_unknown_selectors_yield_nothing() {
        let face = face_at(Vec2::new(0.5, 0.5), 0.2, 0.0);
        assert!(resolve(&face, AnchorType::None).is_none());
        assert!(resolve_named(&face, "shoulders").is_none());
        assert!(resolve_named(&face, " Eyes ").is_some());
    }

    #[test]
    fn frame_matches_single_resolution() {
        let face = face_at(Vec2::new(0.3, 0.4), 0.15, -12.0);
        let frame = AnchorFrame::resolve(&face);
        for anchor in AnchorType::TRACKED {
            assert_eq!(frame.get(anchor).copied(), resolve(&face, anchor));
        }
        assert!(frame.get(AnchorType::None).is_none());
    }

    #[test]
    fn body_unit_is_scaled_up() {
        let face = face_at(Vec2::new(0.5, 0.5), 0.1, 0.0);
        let viewport = Viewport::new(1280.0, 720.0);
        let frame = AnchorFrame::resolve(&face);

        let face_unit = frame.face.to_screen(viewport).sticker_unit();
        let body_unit = frame.body.to_screen(viewport).sticker_unit();
        assert!((face_unit - 1.0).abs() < 1e-4);
        assert!((body_unit - face_unit * BODY_SCALE_FACTOR).abs() < 1e-4);
    }
}
