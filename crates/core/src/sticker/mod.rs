//! The sticker collection and its per-frame lifecycle.
//!
//! [`StickerStore`] owns the authoritative list. Every mutation builds a new
//! vector and swaps it in, so a snapshot handed to the renderer never changes
//! underneath it.

mod effects;

use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    anchor::{AnchorFrame, AnchorType, ScreenAnchor},
    assets::{Asset, Category, Glyph},
    geometry::{Vec2, Viewport},
    MirrorError, Result,
};

pub use effects::EffectSpawner;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StickerId(pub u64);

impl fmt::Display for StickerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Live on-screen transform, in mirrored pixels and degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec2,
    pub scale: f32,
    pub rotation: f32,
    #[serde(default)]
    pub opacity: Option<f32>,
}

impl Transform {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            scale: 1.0,
            rotation: 0.0,
            opacity: None,
        }
    }
}

/// How a sticker follows the face.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchorBinding {
    pub anchor: AnchorType,
    /// Pixel offset from the anchor point, unscaled.
    pub offset: Vec2,
    pub base_scale: f32,
    pub base_rotation: f32,
}

impl AnchorBinding {
    pub fn unbound() -> Self {
        Self {
            anchor: AnchorType::None,
            offset: Vec2::ZERO,
            base_scale: 1.0,
            base_rotation: 0.0,
        }
    }

    /// Layers the stored offset, scale and rotation over a live anchor.
    /// Mirroring flips the camera roll, hence the subtraction.
    pub fn apply(&self, anchor: &ScreenAnchor, transform: &Transform) -> Transform {
        Transform {
            position: anchor.position + self.offset,
            scale: self.base_scale * anchor.sticker_unit(),
            rotation: self.base_rotation - anchor.rotation,
            opacity: transform.opacity,
        }
    }

    /// Inverse of [`AnchorBinding::apply`]: captures the free-floating
    /// transform relative to `anchor` so the sticker keeps its dropped pose.
    pub fn capture(anchor: &ScreenAnchor, transform: &Transform) -> Self {
        let unit = anchor.sticker_unit();
        Self {
            anchor: anchor.anchor,
            offset: transform.position - anchor.position,
            base_scale: if unit > f32::EPSILON {
                transform.scale / unit
            } else {
                transform.scale
            },
            base_rotation: transform.rotation + anchor.rotation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lifespan {
    pub created_ms: f64,
    pub duration_ms: f64,
}

impl Lifespan {
    pub fn remaining_ms(&self, now_ms: f64) -> f64 {
        self.duration_ms - (now_ms - self.created_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sticker {
    pub id: StickerId,
    pub asset_id: String,
    pub glyph: Glyph,
    pub category: Category,
    pub transform: Transform,
    pub binding: AnchorBinding,
    #[serde(default)]
    pub lifespan: Option<Lifespan>,
    #[serde(default)]
    pub selected: bool,
}

impl Sticker {
    /// A sticker for `asset` at `position`, bound with the asset's defaults.
    /// The id is assigned by the store on insertion.
    pub fn from_asset(asset: &Asset, position: Vec2) -> Self {
        Self {
            id: StickerId(0),
            asset_id: asset.id.clone(),
            glyph: asset.glyph.clone(),
            category: asset.category,
            transform: Transform {
                scale: asset.scale,
                ..Transform::at(position)
            },
            binding: AnchorBinding {
                anchor: asset.anchor,
                offset: Vec2::new(0.0, asset.offset_y.unwrap_or(0.0)),
                base_scale: asset.scale,
                base_rotation: 0.0,
            },
            lifespan: None,
            selected: false,
        }
    }

    /// A free-floating, short-lived effect glyph.
    pub fn effect(glyph: &str, position: Vec2, created_ms: f64, duration_ms: f64) -> Self {
        Self {
            id: StickerId(0),
            asset_id: EFFECT_ASSET_ID.to_string(),
            glyph: Glyph::emoji(glyph),
            category: Category::Accessories,
            transform: Transform::at(position),
            binding: AnchorBinding::unbound(),
            lifespan: Some(Lifespan {
                created_ms,
                duration_ms,
            }),
            selected: false,
        }
    }

    pub fn is_anchored(&self) -> bool {
        self.binding.anchor != AnchorType::None
    }

    /// Converts the current pixel pose back into an anchor binding. With no
    /// face sample the sticker is detached where it lies; unbound stickers
    /// are left alone.
    pub fn commit_drop(&mut self, anchors: Option<&AnchorFrame>, viewport: Viewport) {
        if !self.is_anchored() {
            return;
        }
        match anchors.and_then(|frame| frame.get(self.binding.anchor)) {
            Some(sample) => {
                let screen = sample.to_screen(viewport);
                self.binding = AnchorBinding::capture(&screen, &self.transform);
            }
            None => self.binding = AnchorBinding::unbound(),
        }
    }
}

pub const EFFECT_ASSET_ID: &str = "effect";

#[derive(Debug, Clone)]
pub struct StickerStore {
    stickers: Arc<Vec<Sticker>>,
    next_id: u64,
}

impl Default for StickerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StickerStore {
    pub fn new() -> Self {
        Self {
            stickers: Arc::new(Vec::new()),
            next_id: 1,
        }
    }

    /// Immutable view for the renderer. Later mutations never touch it.
    pub fn snapshot(&self) -> Arc<Vec<Sticker>> {
        Arc::clone(&self.stickers)
    }

    pub fn stickers(&self) -> &[Sticker] {
        &self.stickers
    }

    pub fn len(&self) -> usize {
        self.stickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stickers.is_empty()
    }

    /// Id the next inserted sticker will receive.
    pub fn next_id(&self) -> StickerId {
        StickerId(self.next_id)
    }

    pub fn get(&self, id: StickerId) -> Option<&Sticker> {
        self.stickers.iter().find(|sticker| sticker.id == id)
    }

    pub fn contains(&self, id: StickerId) -> bool {
        self.get(id).is_some()
    }

    pub fn face_sticker(&self) -> Option<&Sticker> {
        self.stickers
            .iter()
            .find(|sticker| sticker.category == Category::Faces)
    }

    fn replace(&mut self, edit: impl FnOnce(&mut Vec<Sticker>)) {
        let mut next = self.stickers.as_ref().clone();
        edit(&mut next);
        self.stickers = Arc::new(next);
    }

    /// Inserts `sticker` under a fresh id. A face sticker replaces the
    /// current one in the same swap.
    pub fn add(&mut self, mut sticker: Sticker) -> StickerId {
        let id = self.next_id();
        self.next_id += 1;
        sticker.id = id;

        let is_face = sticker.category == Category::Faces;
        self.replace(|stickers| {
            if is_face {
                stickers.retain(|existing| existing.category != Category::Faces);
            }
            stickers.push(sticker);
        });
        id
    }

    pub fn place_asset(&mut self, asset: &Asset, position: Vec2) -> StickerId {
        let id = self.add(Sticker::from_asset(asset, position));
        info!(sticker = %id, asset = %asset.id, category = %asset.category, "sticker placed");
        id
    }

    pub fn update(&mut self, id: StickerId, edit: impl FnOnce(&mut Sticker)) -> Result<()> {
        let index = self
            .stickers
            .iter()
            .position(|sticker| sticker.id == id)
            .ok_or(MirrorError::UnknownSticker(id))?;
        self.replace(|stickers| edit(&mut stickers[index]));
        Ok(())
    }

    pub fn delete(&mut self, id: StickerId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.replace(|stickers| stickers.retain(|sticker| sticker.id != id));
        true
    }

    /// Marks `id` as the only selected sticker.
    pub fn select(&mut self, id: StickerId) -> Result<()> {
        if !self.contains(id) {
            return Err(MirrorError::UnknownSticker(id));
        }
        self.replace(|stickers| {
            for sticker in stickers.iter_mut() {
                sticker.selected = sticker.id == id;
            }
        });
        Ok(())
    }

    pub fn clear(&mut self) {
        self.replace(Vec::clear);
    }

    /// Keeps only the face sticker, if any.
    pub fn retain_faces(&mut self) {
        self.replace(|stickers| stickers.retain(|sticker| sticker.category == Category::Faces));
    }

    /// Drops expired transient stickers and fades the ones inside the fade
    /// window. Returns how many were removed.
    pub fn expire(&mut self, now_ms: f64, fade_window_ms: f64) -> usize {
        let has_transient = self.stickers.iter().any(|sticker| sticker.lifespan.is_some());
        if !has_transient {
            return 0;
        }

        let before = self.len();
        self.replace(|stickers| {
            stickers.retain(|sticker| {
                sticker
                    .lifespan
                    .map(|lifespan| lifespan.remaining_ms(now_ms) > 0.0)
                    .unwrap_or(true)
            });
            for sticker in stickers.iter_mut() {
                if let Some(lifespan) = sticker.lifespan {
                    let remaining = lifespan.remaining_ms(now_ms);
                    if fade_window_ms > 0.0 && remaining < fade_window_ms {
                        sticker.transform.opacity = Some((remaining / fade_window_ms) as f32);
                    }
                }
            }
        });
        before - self.len()
    }

    /// Re-positions every anchored sticker not listed in `held` from the
    /// current anchor frame.
    pub fn apply_anchors(&mut self, anchors: &AnchorFrame, viewport: Viewport, held: &[StickerId]) {
        let follows = |sticker: &Sticker| sticker.is_anchored() && !held.contains(&sticker.id);
        if !self.stickers.iter().any(follows) {
            return;
        }

        self.replace(|stickers| {
            for sticker in stickers.iter_mut().filter(|sticker| follows(sticker)) {
                if let Some(sample) = anchors.get(sticker.binding.anchor) {
                    let screen = sample.to_screen(viewport);
                    sticker.transform = sticker.binding.apply(&screen, &sticker.transform);
                }
            }
        });
    }
}
