use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{geometry::Viewport, Result};

/// Top-level configuration structure for the application.
///
/// Every section falls back to its defaults when missing, so a config file
/// only needs to mention the values it changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    pub viewport: Viewport,
    pub gesture: GestureConfig,
    pub interaction: InteractionConfig,
    pub stickers: StickerConfig,
    pub game: GameConfig,
    pub frame: FrameConfig,
}

impl MirrorConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}

/// Thresholds used by the hand gesture classifier. Distances are in
/// normalised camera units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Thumb-tip to index-tip distance below which a pinch is active.
    pub pinch_threshold: f32,
    /// Horizontal thumb-tip to index-knuckle distance above which the thumb
    /// counts as extended.
    pub thumb_extension: f32,
    /// Minimum single-frame movement of the middle knuckle for a swipe.
    pub swipe_velocity: f32,
    pub swipe_cooldown_ms: f64,
    pub cursor_smoothing: bool,
    pub smoothing_min_cutoff: f32,
    pub smoothing_beta: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            pinch_threshold: 0.05,
            thumb_extension: 0.05,
            swipe_velocity: 0.04,
            swipe_cooldown_ms: 800.0,
            cursor_smoothing: false,
            smoothing_min_cutoff: 1.0,
            smoothing_beta: 0.15,
        }
    }
}

/// Dwell and drag timings for the gesture interaction state machine, plus
/// the pointer manipulation limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub interaction_radius_px: f32,
    pub sticker_dwell_ms: f64,
    pub button_dwell_ms: f64,
    pub drop_after_ms: f64,
    pub min_scale: f32,
    pub max_scale: f32,
    /// Pointer distance that maps to a scale of 1.0 on the scale handle.
    pub pointer_scale_reference_px: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            interaction_radius_px: 60.0,
            sticker_dwell_ms: 2500.0,
            button_dwell_ms: 1500.0,
            drop_after_ms: 1500.0,
            min_scale: 0.2,
            max_scale: 10.0,
            pointer_scale_reference_px: 100.0,
        }
    }
}

/// Sticker lifecycle and magic-palm effect settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StickerConfig {
    pub fade_window_ms: f64,
    pub effect_interval_ms: f64,
    pub effect_lifespan_ms: f64,
    pub effect_jitter_px: f32,
}

impl Default for StickerConfig {
    fn default() -> Self {
        Self {
            fade_window_ms: 1000.0,
            effect_interval_ms: 150.0,
            effect_lifespan_ms: 2500.0,
            effect_jitter_px: 40.0,
        }
    }
}

/// Coin game tuning. Speeds are in pixels per frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub win_score: u32,
    pub spawn_interval_ms: f64,
    pub base_speed: f32,
    pub fast_speed: f32,
    pub speed_up_score: u32,
    pub coin_value: u32,
    pub coin_radius: f32,
    pub avatar_radius: f32,
    pub spawn_y: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            win_score: 400,
            spawn_interval_ms: 800.0,
            base_speed: 5.0,
            fast_speed: 8.0,
            speed_up_score: 150,
            coin_value: 10,
            coin_radius: 30.0,
            avatar_radius: 90.0,
            spawn_y: -50.0,
        }
    }
}

impl GameConfig {
    pub fn collision_radius(&self) -> f32 {
        self.coin_radius + self.avatar_radius
    }
}

/// Frame loop pacing and the seed for the session's random generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    pub interval_ms: f64,
    pub seed: u64,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1000.0 / 60.0,
            seed: 0x5eed_cafe,
        }
    }
}
