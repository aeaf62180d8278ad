use serde::{Deserialize, Serialize};

use crate::{
    assets::{AssetCatalog, Category},
    geometry::{Rect, Vec2, Viewport},
};

const CATEGORY_BUTTON_PX: f32 = 64.0;
const CATEGORY_STRIDE_PX: f32 = 76.0;
const ASSET_BUTTON_PX: f32 = 72.0;
const ASSET_STRIDE_PX: f32 = 84.0;
const ASSET_ROW_X: f32 = 120.0;
const MARGIN_PX: f32 = 16.0;
const TRASH_PX: f32 = 120.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonKind {
    Category(Category),
    Asset(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Button {
    pub rect: Rect,
    pub kind: ButtonKind,
}

/// Screen-space hit regions of the gesture menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiLayout {
    category: Category,
    categories: Vec<Button>,
    assets: Vec<Button>,
    trash: Rect,
}

impl UiLayout {
    /// Category column down the left edge, the active category's assets
    /// along the bottom, trash in the top-right corner.
    pub fn for_category(catalog: &AssetCatalog, category: Category, viewport: Viewport) -> Self {
        let categories = Category::ALL
            .iter()
            .enumerate()
            .map(|(slot, category)| Button {
                rect: Rect::new(
                    MARGIN_PX,
                    MARGIN_PX + slot as f32 * CATEGORY_STRIDE_PX,
                    CATEGORY_BUTTON_PX,
                    CATEGORY_BUTTON_PX,
                ),
                kind: ButtonKind::Category(*category),
            })
            .collect();

        let row_y = viewport.height - ASSET_BUTTON_PX - MARGIN_PX;
        let assets = catalog
            .by_category(category)
            .enumerate()
            .map(|(slot, asset)| Button {
                rect: Rect::new(
                    ASSET_ROW_X + slot as f32 * ASSET_STRIDE_PX,
                    row_y,
                    ASSET_BUTTON_PX,
                    ASSET_BUTTON_PX,
                ),
                kind: ButtonKind::Asset(asset.id.clone()),
            })
            .collect();

        Self {
            category,
            categories,
            assets,
            trash: Rect::new(
                viewport.width - TRASH_PX - MARGIN_PX,
                MARGIN_PX,
                TRASH_PX,
                TRASH_PX,
            ),
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn category_buttons(&self) -> &[Button] {
        &self.categories
    }

    pub fn asset_buttons(&self) -> &[Button] {
        &self.assets
    }

    pub fn category_button(&self, category: Category) -> Option<&Button> {
        self.categories
            .iter()
            .find(|button| button.kind == ButtonKind::Category(category))
    }

    pub fn trash(&self) -> Rect {
        self.trash
    }

    pub fn asset_at(&self, point: Vec2) -> Option<&str> {
        self.assets.iter().find_map(|button| match &button.kind {
            ButtonKind::Asset(id) if button.rect.contains(point) => Some(id.as_str()),
            _ => None,
        })
    }

    pub fn category_at(&self, point: Vec2) -> Option<Category> {
        self.categories.iter().find_map(|button| match button.kind {
            ButtonKind::Category(category) if button.rect.contains(point) => Some(category),
            _ => None,
        })
    }

    pub fn in_trash(&self, point: Vec2) -> bool {
        self.trash.contains(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(category: Category) -> UiLayout {
        UiLayout::for_category(&AssetCatalog::builtin(), category, Viewport::default())
    }

    #[test]
    fn places_controls_on_the_edges() {
        let layout = layout(Category::Faces);

        let faces = layout.category_button(Category::Faces).unwrap();
        assert_eq!(faces.rect.center(), Vec2::new(48.0, 428.0));
        assert_eq!(layout.asset_buttons()[0].rect.center(), Vec2::new(156.0, 668.0));
        assert_eq!(layout.trash(), Rect::new(1144.0, 16.0, 120.0, 120.0));
    }

    #[test]
    fn asset_row_follows_the_active_category() {
        let glasses = layout(Category::Glasses);
        assert_eq!(glasses.category(), Category::Glasses);
        assert_eq!(glasses.asset_buttons().len(), 3);
        assert_eq!(glasses.asset_at(Vec2::new(156.0, 668.0)), Some("shades"));
        assert_eq!(glasses.asset_at(Vec2::new(640.0, 360.0)), None);
    }

    #[test]
    fn hit_tests_categories_and_trash() {
        let layout = layout(Category::Hats);
        assert_eq!(layout.category_at(Vec2::new(48.0, 48.0)), Some(Category::Hats));
        assert_eq!(layout.category_at(Vec2::new(48.0, 86.0)), None);
        assert!(layout.in_trash(Vec2::new(1200.0, 60.0)));
        assert!(!layout.in_trash(Vec2::new(640.0, 60.0)));
    }
}
