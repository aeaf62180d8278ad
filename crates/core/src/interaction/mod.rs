//! Dwell-driven gesture interaction.
//!
//! [`InteractionState::step`] is a pure transition: it reads the gesture
//! vector, the sticker snapshot and the UI layout, and returns the next state
//! together with the effects the frame pipeline must apply, in order.

mod layout;
mod pointer;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    assets::Category,
    config::InteractionConfig,
    geometry::Vec2,
    gesture::GestureVector,
    sticker::{Sticker, StickerId},
};

pub use layout::{Button, ButtonKind, UiLayout};
pub use pointer::{Handle, PointerEvent, PointerSession};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetKind {
    Sticker,
    CategoryButton,
    AssetButton,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    Sticker(StickerId),
    Category(Category),
    Asset(String),
}

impl Target {
    pub fn kind(&self) -> TargetKind {
        match self {
            Target::Sticker(_) => TargetKind::Sticker,
            Target::Category(_) => TargetKind::CategoryButton,
            Target::Asset(_) => TargetKind::AssetButton,
        }
    }

    fn dwell_ms(&self, config: &InteractionConfig) -> f64 {
        match self.kind() {
            TargetKind::Sticker => config.sticker_dwell_ms,
            TargetKind::CategoryButton | TargetKind::AssetButton => config.button_dwell_ms,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum InteractionState {
    #[default]
    Idle,
    Hovering {
        target: Target,
        started_ms: f64,
        progress: f32,
    },
    Dragging {
        sticker: StickerId,
        since_ms: f64,
        /// Drop timer progress.
        progress: f32,
    },
    Resizing {
        sticker: StickerId,
        since_ms: f64,
        start_distance: f32,
        start_scale: f32,
    },
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InteractionEffect {
    Select(StickerId),
    /// Create `sticker` from `asset_id` centred on `at`.
    Place {
        sticker: StickerId,
        asset_id: String,
        at: Vec2,
    },
    Move {
        sticker: StickerId,
        to: Vec2,
    },
    Resize {
        sticker: StickerId,
        scale: f32,
    },
    /// Re-bind the sticker to its anchor at its current pose.
    Drop(StickerId),
    Delete(StickerId),
    SetCategory(Category),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: InteractionState,
    pub effects: Vec<InteractionEffect>,
}

impl Transition {
    fn to(state: InteractionState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }

    fn with(state: InteractionState, effects: Vec<InteractionEffect>) -> Self {
        Self { state, effects }
    }
}

/// Everything one step reads.
#[derive(Debug, Clone, Copy)]
pub struct InteractionContext<'a> {
    pub gesture: Option<&'a GestureVector>,
    pub stickers: &'a [Sticker],
    pub layout: &'a UiLayout,
    pub config: &'a InteractionConfig,
    pub now_ms: f64,
    /// Id a sticker placed by this step will receive.
    pub next_sticker_id: StickerId,
}

impl InteractionContext<'_> {
    fn sticker(&self, id: StickerId) -> Option<&Sticker> {
        self.stickers.iter().find(|sticker| sticker.id == id)
    }

    /// Nearest persistent sticker within the interaction radius.
    fn sticker_near(&self, cursor: Vec2) -> Option<StickerId> {
        self.stickers
            .iter()
            .filter(|sticker| sticker.lifespan.is_none())
            .map(|sticker| (sticker.id, sticker.transform.position.distance(cursor)))
            .filter(|(_, distance)| *distance <= self.config.interaction_radius_px)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    fn target_at(&self, cursor: Vec2) -> Option<Target> {
        if let Some(asset_id) = self.layout.asset_at(cursor) {
            return Some(Target::Asset(asset_id.to_string()));
        }
        if let Some(category) = self.layout.category_at(cursor) {
            return Some(Target::Category(category));
        }
        self.sticker_near(cursor).map(Target::Sticker)
    }
}

impl InteractionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionState::Idle)
    }

    /// The sticker currently held by a drag or resize.
    pub fn held_sticker(&self) -> Option<StickerId> {
        match self {
            InteractionState::Dragging { sticker, .. } | InteractionState::Resizing { sticker, .. } => {
                Some(*sticker)
            }
            _ => None,
        }
    }

    pub fn progress(&self) -> f32 {
        match self {
            InteractionState::Hovering { progress, .. } | InteractionState::Dragging { progress, .. } => {
                *progress
            }
            _ => 0.0,
        }
    }

    fn references_missing_sticker(&self, ctx: &InteractionContext<'_>) -> bool {
        let referenced = match self {
            InteractionState::Hovering {
                target: Target::Sticker(id),
                ..
            } => Some(*id),
            other => other.held_sticker(),
        };
        referenced.is_some_and(|id| ctx.sticker(id).is_none())
    }

    pub fn step(self, ctx: &InteractionContext<'_>) -> Transition {
        let state = if self.references_missing_sticker(ctx) {
            debug!(state = ?self, "interaction target vanished");
            InteractionState::Idle
        } else {
            self
        };

        let Some(gesture) = ctx.gesture else {
            return match state.held_sticker() {
                Some(sticker) => {
                    let at = ctx
                        .sticker(sticker)
                        .map(|held| held.transform.position)
                        .unwrap_or_default();
                    Transition::with(InteractionState::Idle, vec![release(ctx, sticker, at)])
                }
                None => Transition::to(InteractionState::Idle),
            };
        };

        match state {
            InteractionState::Idle | InteractionState::Hovering { .. } => hover(state, gesture, ctx),
            InteractionState::Dragging {
                sticker, since_ms, ..
            } => drag(sticker, since_ms, gesture, ctx),
            InteractionState::Resizing {
                sticker,
                since_ms,
                start_distance,
                start_scale,
            } => resize(sticker, since_ms, start_distance, start_scale, gesture, ctx),
        }
    }
}

/// Drop, or delete when released over the trash zone.
fn release(ctx: &InteractionContext<'_>, sticker: StickerId, at: Vec2) -> InteractionEffect {
    if ctx.layout.in_trash(at) {
        debug!(sticker = %sticker, "sticker released over trash");
        InteractionEffect::Delete(sticker)
    } else {
        InteractionEffect::Drop(sticker)
    }
}

fn drop_progress(since_ms: f64, ctx: &InteractionContext<'_>) -> (f32, bool) {
    let elapsed = ctx.now_ms - since_ms;
    let limit = ctx.config.drop_after_ms;
    let progress = if limit > 0.0 {
        (elapsed / limit).clamp(0.0, 1.0) as f32
    } else {
        1.0
    };
    (progress, elapsed >= limit)
}

fn hover(state: InteractionState, gesture: &GestureVector, ctx: &InteractionContext<'_>) -> Transition {
    let Some(target) = ctx.target_at(gesture.cursor) else {
        return Transition::to(InteractionState::Idle);
    };

    let started_ms = match state {
        InteractionState::Hovering {
            target: current,
            started_ms,
            ..
        } if current == target => started_ms,
        _ => ctx.now_ms,
    };

    let dwell = target.dwell_ms(ctx.config);
    let progress = if dwell > 0.0 {
        ((ctx.now_ms - started_ms) / dwell).clamp(0.0, 1.0) as f32
    } else {
        1.0
    };

    if progress < 1.0 {
        return Transition::to(InteractionState::Hovering {
            target,
            started_ms,
            progress,
        });
    }

    let grab = |sticker| InteractionState::Dragging {
        sticker,
        since_ms: ctx.now_ms,
        progress: 0.0,
    };
    match target {
        Target::Sticker(sticker) => {
            debug!(sticker = %sticker, "dwell complete, picking up sticker");
            Transition::with(grab(sticker), vec![InteractionEffect::Select(sticker)])
        }
        Target::Asset(asset_id) => {
            let sticker = ctx.next_sticker_id;
            debug!(sticker = %sticker, asset = %asset_id, "dwell complete, placing asset");
            Transition::with(
                grab(sticker),
                vec![
                    InteractionEffect::Place {
                        sticker,
                        asset_id,
                        at: gesture.cursor,
                    },
                    InteractionEffect::Select(sticker),
                ],
            )
        }
        Target::Category(category) => {
            debug!(category = %category, "dwell complete, switching category");
            Transition::with(
                InteractionState::Idle,
                vec![InteractionEffect::SetCategory(category)],
            )
        }
    }
}

fn drag(
    sticker: StickerId,
    since_ms: f64,
    gesture: &GestureVector,
    ctx: &InteractionContext<'_>,
) -> Transition {
    let (progress, expired) = drop_progress(since_ms, ctx);

    if gesture.pinching && gesture.pinch_distance > f32::EPSILON {
        let held = ctx.sticker(sticker);
        let position = held.map(|held| held.transform.position).unwrap_or(gesture.cursor);
        if expired {
            return Transition::with(InteractionState::Idle, vec![release(ctx, sticker, position)]);
        }
        let start_scale = held.map(|held| held.transform.scale).unwrap_or(1.0);
        return Transition::to(InteractionState::Resizing {
            sticker,
            since_ms,
            start_distance: gesture.pinch_distance,
            start_scale,
        });
    }

    let mut effects = vec![InteractionEffect::Move {
        sticker,
        to: gesture.cursor,
    }];
    if expired {
        effects.push(release(ctx, sticker, gesture.cursor));
        return Transition::with(InteractionState::Idle, effects);
    }
    Transition::with(
        InteractionState::Dragging {
            sticker,
            since_ms,
            progress,
        },
        effects,
    )
}

fn resize(
    sticker: StickerId,
    since_ms: f64,
    start_distance: f32,
    start_scale: f32,
    gesture: &GestureVector,
    ctx: &InteractionContext<'_>,
) -> Transition {
    if !gesture.pinching {
        return drag(sticker, since_ms, gesture, ctx);
    }

    let config = ctx.config;
    let scale =
        (start_scale * gesture.pinch_distance / start_distance).clamp(config.min_scale, config.max_scale);
    let mut effects = vec![InteractionEffect::Resize { sticker, scale }];

    let (_, expired) = drop_progress(since_ms, ctx);
    if expired {
        let position = ctx
            .sticker(sticker)
            .map(|held| held.transform.position)
            .unwrap_or(gesture.cursor);
        effects.push(release(ctx, sticker, position));
        return Transition::with(InteractionState::Idle, effects);
    }
    Transition::with(
        InteractionState::Resizing {
            sticker,
            since_ms,
            start_distance,
            start_scale,
        },
        effects,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        assets::AssetCatalog,
        geometry::Viewport,
        sticker::StickerStore,
    };

    struct Harness {
        catalog: AssetCatalog,
        layout: UiLayout,
        config: InteractionConfig,
        store: StickerStore,
        state: InteractionState,
    }

    impl Harness {
        fn new() -> Self {
            let catalog = AssetCatalog::builtin();
            let layout = UiLayout::for_category(&catalog, Category::Hats, Viewport::default());
            Self {
                catalog,
                layout,
                config: InteractionConfig::default(),
                store: StickerStore::new(),
                state: InteractionState::Idle,
            }
        }

        fn place(&mut self, asset_id: &str, at: Vec2) -> StickerId {
            let asset = self.catalog.get(asset_id).unwrap().clone();
            self.store.place_asset(&asset, at)
        }

        fn step(&mut self, now_ms: f64, gesture: Option<GestureVector>) -> Vec<InteractionEffect> {
            let stickers = self.store.snapshot();
            let ctx = InteractionContext {
                gesture: gesture.as_ref(),
                stickers: &stickers,
                layout: &self.layout,
                config: &self.config,
                now_ms,
                next_sticker_id: self.store.next_id(),
            };
            let transition = std::mem::take(&mut self.state).step(&ctx);
            self.state = transition.state;
            transition.effects
        }
    }

    fn pointing(cursor: Vec2) -> GestureVector {
        GestureVector {
            cursor,
            fingers: [false, true, false, false, false],
            finger_count: 1,
            pinching: false,
            pinch_distance: 0.2,
            open_palm: false,
            swipe_delta: 0.0,
            swipe: None,
        }
    }

    fn pinching(cursor: Vec2, distance: f32) -> GestureVector {
        GestureVector {
            pinching: true,
            pinch_distance: distance,
            ..pointing(cursor)
        }
    }

    #[test]
    fn moving_away_before_dwell_completes_returns_to_idle() {
        let mut h = Harness::new();
        let sticker = h.place("crown", Vec2::new(640.0, 300.0));

        for frame in 0..=120 {
            let effects = h.step(frame as f64 * 20.0, Some(pointing(Vec2::new(645.0, 300.0))));
            assert!(effects.is_empty());
        }
        assert!(matches!(
            h.state,
            InteractionState::Hovering { target: Target::Sticker(id), .. } if id == sticker
        ));

        h.step(2_420.0, Some(pointing(Vec2::new(900.0, 300.0))));
        assert_eq!(h.state, InteractionState::Idle);
    }

    #[test]
    fn dwell_progress_is_monotonic_until_selection() {
        let mut h = Harness::new();
        let sticker = h.place("crown", Vec2::new(640.0, 300.0));

        let mut last = 0.0;
        let mut frame = 0;
        loop {
            let effects = h.step(frame as f64 * 20.0, Some(pointing(Vec2::new(640.0, 320.0))));
            if !effects.is_empty() {
                assert_eq!(effects, vec![InteractionEffect::Select(sticker)]);
                break;
            }
            let progress = h.state.progress();
            assert!(progress >= last && progress < 1.0);
            last = progress;
            frame += 1;
        }
        assert_eq!(frame, 125);
        assert_eq!(h.state.held_sticker(), Some(sticker));
    }

    #[test]
    fn switching_targets_restarts_the_dwell() {
        let mut h = Harness::new();
        let a = h.place("crown", Vec2::new(400.0, 300.0));
        let b = h.place("bow", Vec2::new(800.0, 300.0));

        let mut now = 0.0;
        while now < 2_000.0 {
            assert!(h.step(now, Some(pointing(Vec2::new(400.0, 300.0)))).is_empty());
            now += 20.0;
        }
        assert!(h.state.progress() > 0.7);

        assert!(h.step(now, Some(pointing(Vec2::new(800.0, 300.0)))).is_empty());
        assert!(matches!(
            h.state,
            InteractionState::Hovering { target: Target::Sticker(id), .. } if id == b
        ));
        assert_eq!(h.state.progress(), 0.0);

        let selected_at = loop {
            now += 20.0;
            let effects = h.step(now, Some(pointing(Vec2::new(800.0, 300.0))));
            if !effects.is_empty() {
                assert_eq!(effects, vec![InteractionEffect::Select(b)]);
                break now;
            }
        };
        assert_eq!(selected_at, 4_500.0);
        assert_ne!(h.state.held_sticker(), Some(a));
    }

    #[test]
    fn nearest_sticker_wins() {
        let mut h = Harness::new();
        h.place("crown", Vec2::new(600.0, 300.0));
        let near = h.place("bow", Vec2::new(640.0, 300.0));

        h.step(0.0, Some(pointing(Vec2::new(630.0, 300.0))));
        assert!(matches!(
            h.state,
            InteractionState::Hovering { target: Target::Sticker(id), .. } if id == near
        ));
    }

    #[test]
    fn asset_button_dwell_places_and_grabs() {
        let mut h = Harness::new();
        let button = h.layout.asset_buttons()[1].rect.center();
        let expected = h.store.next_id();

        assert!(h.step(0.0, Some(pointing(button))).is_empty());
        assert!(h.step(1_499.0, Some(pointing(button))).is_empty());
        let effects = h.step(1_500.0, Some(pointing(button)));

        assert_eq!(
            effects,
            vec![
                InteractionEffect::Place {
                    sticker: expected,
                    asset_id: "crown".into(),
                    at: button,
                },
                InteractionEffect::Select(expected),
            ]
        );
        assert_eq!(h.state.held_sticker(), Some(expected));
    }

    #[test]
    fn category_button_dwell_switches_category() {
        let mut h = Harness::new();
        let button = h.layout.category_button(Category::Glasses).unwrap().rect.center();

        h.step(0.0, Some(pointing(button)));
        let effects = h.step(1_500.0, Some(pointing(button)));
        assert_eq!(effects, vec![InteractionEffect::SetCategory(Category::Glasses)]);
        assert!(h.state.is_idle());
    }

    #[test]
    fn dragging_tracks_the_cursor_then_drops() {
        let mut h = Harness::new();
        let sticker = h.place("crown", Vec2::new(640.0, 300.0));
        h.state = InteractionState::Dragging {
            sticker,
            since_ms: 0.0,
            progress: 0.0,
        };

        let effects = h.step(700.0, Some(pointing(Vec2::new(500.0, 250.0))));
        assert_eq!(
            effects,
            vec![InteractionEffect::Move {
                sticker,
                to: Vec2::new(500.0, 250.0)
            }]
        );
        assert!((h.state.progress() - 700.0 / 1500.0).abs() < 1e-6);

        let effects = h.step(1_500.0, Some(pointing(Vec2::new(510.0, 250.0))));
        assert_eq!(effects.last(), Some(&InteractionEffect::Drop(sticker)));
        assert!(h.state.is_idle());
    }

    #[test]
    fn pinch_resizes_instead_of_moving() {
        let mut h = Harness::new();
        let sticker = h.place("crown", Vec2::new(640.0, 300.0));
        h.store
            .update(sticker, |s| s.transform.scale = 2.0)
            .unwrap();
        h.state = InteractionState::Dragging {
            sticker,
            since_ms: 0.0,
            progress: 0.0,
        };

        assert!(h.step(100.0, Some(pinching(Vec2::new(700.0, 300.0), 0.04))).is_empty());
        assert!(matches!(h.state, InteractionState::Resizing { .. }));

        let effects = h.step(200.0, Some(pinching(Vec2::new(800.0, 300.0), 0.02)));
        assert_eq!(effects, vec![InteractionEffect::Resize { sticker, scale: 1.0 }]);

        // Releasing the pinch resumes cursor tracking.
        let effects = h.step(300.0, Some(pointing(Vec2::new(650.0, 310.0))));
        assert!(matches!(effects[0], InteractionEffect::Move { .. }));
        assert!(matches!(h.state, InteractionState::Dragging { .. }));
    }

    #[test]
    fn resize_drop_fires_when_the_timer_expires() {
        let mut h = Harness::new();
        let sticker = h.place("crown", Vec2::new(640.0, 300.0));
        h.state = InteractionState::Resizing {
            sticker,
            since_ms: 0.0,
            start_distance: 0.04,
            start_scale: 1.0,
        };

        let effects = h.step(1_500.0, Some(pinching(Vec2::new(640.0, 300.0), 0.001)));
        assert_eq!(
            effects,
            vec![
                InteractionEffect::Resize { sticker, scale: 0.2 },
                InteractionEffect::Drop(sticker),
            ]
        );
        assert!(h.state.is_idle());
    }

    #[test]
    fn release_over_trash_deletes() {
        let mut h = Harness::new();
        let sticker = h.place("crown", Vec2::new(640.0, 300.0));
        h.state = InteractionState::Dragging {
            sticker,
            since_ms: 0.0,
            progress: 0.0,
        };

        let trash = h.layout.trash().center();
        let effects = h.step(1_600.0, Some(pointing(trash)));
        assert_eq!(effects.last(), Some(&InteractionEffect::Delete(sticker)));
    }

    #[test]
    fn losing_the_hand_mid_drag_drops() {
        let mut h = Harness::new();
        let sticker = h.place("crown", Vec2::new(640.0, 300.0));
        h.state = InteractionState::Dragging {
            sticker,
            since_ms: 0.0,
            progress: 0.0,
        };

        assert_eq!(h.step(400.0, None), vec![InteractionEffect::Drop(sticker)]);
        assert!(h.state.is_idle());
    }

    #[test]
    fn vanished_targets_reset_to_idle() {
        let mut h = Harness::new();
        let sticker = h.place("crown", Vec2::new(640.0, 300.0));
        h.state = InteractionState::Dragging {
            sticker,
            since_ms: 0.0,
            progress: 0.0,
        };
        h.store.clear();

        let effects = h.step(100.0, Some(pointing(Vec2::new(100.0, 300.0))));
        assert!(effects.is_empty());
        assert!(h.state.is_idle());
    }
}
