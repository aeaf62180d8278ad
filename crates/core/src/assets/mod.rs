use serde::{Deserialize, Serialize};

use crate::{anchor::AnchorType, MirrorError, Result};

/// Sticker categories in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Hats,
    Glasses,
    Tops,
    Hair,
    Accessories,
    Faces,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Hats,
        Category::Glasses,
        Category::Tops,
        Category::Hair,
        Category::Accessories,
        Category::Faces,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Hats => "hats",
            Category::Glasses => "glasses",
            Category::Tops => "tops",
            Category::Hair => "hair",
            Category::Accessories => "accessories",
            Category::Faces => "faces",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the renderer draws for a sticker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "data")]
pub enum Glyph {
    Emoji(String),
    /// Inline vector markup.
    Svg(String),
}

impl Glyph {
    pub fn emoji(glyph: impl Into<String>) -> Self {
        Self::Emoji(glyph.into())
    }
}

/// A placeable catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub name: String,
    pub glyph: Glyph,
    pub category: Category,
    pub anchor: AnchorType,
    #[serde(default = "default_scale")]
    pub scale: f32,
    /// Vertical pixel offset from the anchor, applied at placement.
    #[serde(default)]
    pub offset_y: Option<f32>,
    /// Glyphs the magic-palm effect emits. Only face assets carry any.
    #[serde(default)]
    pub effects: Vec<String>,
}

fn default_scale() -> f32 {
    1.0
}

impl Asset {
    fn new(id: &str, name: &str, glyph: Glyph, category: Category, anchor: AnchorType) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            glyph,
            category,
            anchor,
            scale: 1.0,
            offset_y: None,
            effects: Vec::new(),
        }
    }

    fn scaled(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    fn offset(mut self, offset_y: f32) -> Self {
        self.offset_y = Some(offset_y);
        self
    }

    fn with_effects(mut self, effects: &[&str]) -> Self {
        self.effects = effects.iter().map(|glyph| glyph.to_string()).collect();
        self
    }
}

/// Ordered registry of everything the user can place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetCatalog {
    assets: Vec<Asset>,
}

impl AssetCatalog {
    pub fn new() -> Self {
        Self { assets: Vec::new() }
    }

    /// The stock catalog shipped with the mirror.
    pub fn builtin() -> Self {
        use AnchorType::{Body, Eyes, Face, Head};
        use Category::{Accessories, Faces, Glasses, Hair, Hats, Tops};

        let emoji = |glyph: &str| Glyph::emoji(glyph);
        let mut catalog = Self::new();
        for asset in [
            Asset::new("top-hat", "Top Hat", emoji("🎩"), Hats, Head).scaled(1.2).offset(-40.0),
            Asset::new("crown", "Crown", emoji("👑"), Hats, Head).offset(-30.0),
            Asset::new("party-hat", "Party Hat", emoji("🥳"), Hats, Head).scaled(0.9).offset(-50.0),
            Asset::new("shades", "Shades", emoji("🕶️"), Glasses, Eyes).scaled(1.1),
            Asset::new("specs", "Reading Glasses", emoji("👓"), Glasses, Eyes),
            Asset::new(
                "star-glasses",
                "Star Glasses",
                Glyph::Svg(STAR_GLASSES_SVG.to_string()),
                Glasses,
                Eyes,
            ),
            Asset::new("tee", "T-Shirt", emoji("👕"), Tops, Body).offset(60.0),
            Asset::new("tie", "Necktie", emoji("👔"), Tops, Body).scaled(0.8).offset(50.0),
            Asset::new("curls", "Curly Wig", emoji("🦱"), Hair, Head).scaled(1.4).offset(-10.0),
            Asset::new("bow", "Hair Bow", emoji("🎀"), Hair, Head).scaled(0.6).offset(-20.0),
            Asset::new("moustache", "Moustache", emoji("🥸"), Accessories, Face).scaled(0.7).offset(20.0),
            Asset::new("earrings", "Earrings", emoji("💎"), Accessories, Face).scaled(0.4),
            Asset::new("dog", "Puppy", emoji("🐶"), Faces, Face)
                .scaled(1.3)
                .with_effects(&["🦴", "🐾", "💕"]),
            Asset::new("cat", "Kitty", emoji("🐱"), Faces, Face)
                .scaled(1.3)
                .with_effects(&["🐟", "🧶", "😻"]),
            Asset::new("fox", "Fox", emoji("🦊"), Faces, Face)
                .scaled(1.3)
                .with_effects(&["🍂", "✨", "🔥"]),
            Asset::new("frog", "Frog", emoji("🐸"), Faces, Face)
                .scaled(1.3)
                .with_effects(&["🪰", "💧", "🌿", "👑"]),
        ] {
            catalog.register(asset);
        }
        catalog
    }

    /// Adds an asset, replacing any previous entry with the same id in place.
    pub fn register(&mut self, asset: Asset) {
        match self.assets.iter_mut().find(|existing| existing.id == asset.id) {
            Some(existing) => *existing = asset,
            None => self.assets.push(asset),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Asset> {
        self.assets.iter().find(|asset| asset.id == id)
    }

    pub fn require(&self, id: &str) -> Result<&Asset> {
        self.get(id)
            .ok_or_else(|| MirrorError::UnknownAsset(id.to_string()))
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &Asset> + '_ {
        self.assets
            .iter()
            .filter(move |asset| asset.category == category)
    }

    /// The face asset `step` places away from `current` in catalog order,
    /// wrapping around. Unknown ids start from the first face.
    pub fn cycle_face(&self, current: &str, step: isize) -> Option<&Asset> {
        let faces: Vec<&Asset> = self.by_category(Category::Faces).collect();
        if faces.is_empty() {
            return None;
        }

        let len = faces.len() as isize;
        let index = match faces.iter().position(|asset| asset.id == current) {
            Some(position) => (position as isize + step).rem_euclid(len),
            None => 0,
        };
        Some(faces[index as usize])
    }
}

const STAR_GLASSES_SVG: &str = r##"<svg viewBox="0 0 128 48" xmlns="http://www.w3.org/2000/svg"><path fill="#ffd400" d="M32 2l8 16 18 3-13 12 3 18-16-9-16 9 3-18L6 21l18-3z"/><path fill="#ffd400" d="M96 2l8 16 18 3-13 12 3 18-16-9-16 9 3-18-13-12 18-3z"/><rect x="56" y="18" width="16" height="4" fill="#333"/></svg>"##;
