use tracing::debug;

use super::{Sticker, StickerId, StickerStore};
use crate::{
    assets::AssetCatalog, config::StickerConfig, geometry::Vec2, rng::Rng, timeline::Cooldown,
};

/// Emits short-lived effect glyphs around an open palm while a face sticker
/// with effects is worn.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectSpawner {
    cooldown: Cooldown,
    lifespan_ms: f64,
    jitter_px: f32,
}

impl EffectSpawner {
    pub fn new(config: &StickerConfig) -> Self {
        Self {
            cooldown: Cooldown::new(config.effect_interval_ms),
            lifespan_ms: config.effect_lifespan_ms,
            jitter_px: config.effect_jitter_px,
        }
    }

    /// Spawns at most one effect per interval near `palm`.
    pub fn maybe_spawn(
        &mut self,
        store: &mut StickerStore,
        catalog: &AssetCatalog,
        palm: Vec2,
        now_ms: f64,
        rng: &mut Rng,
    ) -> Option<StickerId> {
        let face = store.face_sticker()?;
        let asset = catalog.get(&face.asset_id)?;
        if asset.effects.is_empty() || !self.cooldown.try_fire(now_ms) {
            return None;
        }

        let glyph = &asset.effects[rng.index(asset.effects.len())];
        let jitter = Vec2::new(
            rng.range(-self.jitter_px, self.jitter_px),
            rng.range(-self.jitter_px, self.jitter_px),
        );
        let sticker = Sticker::effect(glyph, palm + jitter, now_ms, self.lifespan_ms);
        let id = store.add(sticker);
        debug!(sticker = %id, glyph = %glyph, face = %asset.id, "effect spawned");
        Some(id)
    }
}
