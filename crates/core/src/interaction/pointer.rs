use serde::{Deserialize, Serialize};

use crate::{
    anchor::AnchorFrame,
    config::InteractionConfig,
    geometry::{Vec2, Viewport},
    sticker::{Sticker, StickerId},
};

/// Which control of a selected sticker the pointer grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handle {
    Move,
    Rotate,
    Scale,
}

/// Touch or mouse input, already in mirrored screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PointerEvent {
    Down {
        sticker: StickerId,
        handle: Handle,
        at: Vec2,
    },
    Move {
        at: Vec2,
    },
    Up {
        at: Vec2,
    },
}

/// Direct manipulation of one sticker, bypassing dwell timing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSession {
    sticker: StickerId,
    handle: Handle,
    grab_offset: Vec2,
    reference_px: f32,
    min_scale: f32,
    max_scale: f32,
}

impl PointerSession {
    pub fn begin(sticker: &Sticker, handle: Handle, at: Vec2) -> Self {
        let defaults = InteractionConfig::default();
        Self {
            sticker: sticker.id,
            handle,
            grab_offset: sticker.transform.position - at,
            reference_px: defaults.pointer_scale_reference_px,
            min_scale: defaults.min_scale,
            max_scale: defaults.max_scale,
        }
    }

    pub fn with_config(mut self, config: &InteractionConfig) -> Self {
        self.reference_px = config.pointer_scale_reference_px;
        self.min_scale = config.min_scale;
        self.max_scale = config.max_scale;
        self
    }

    pub fn sticker(&self) -> StickerId {
        self.sticker
    }

    pub fn handle(&self) -> Handle {
        self.handle
    }

    pub fn update(&self, at: Vec2, sticker: &mut Sticker) {
        let center = sticker.transform.position;
        match self.handle {
            Handle::Move => sticker.transform.position = at + self.grab_offset,
            Handle::Rotate => sticker.transform.rotation = (at - center).angle_deg(),
            Handle::Scale => {
                let scale = at.distance(center) / self.reference_px;
                sticker.transform.scale = scale.clamp(self.min_scale, self.max_scale);
            }
        }
    }

    /// Applies the final position and re-binds the sticker to its anchor.
    pub fn end(self, at: Vec2, sticker: &mut Sticker, anchors: Option<&AnchorFrame>, viewport: Viewport) {
        self.update(at, sticker);
        sticker.commit_drop(anchors, viewport);
    }
}
