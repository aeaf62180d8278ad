//! Core library for the Magic Mirror application.
//!
//! Stickers follow a tracked face, a hand drives a dwell-based menu, and a
//! small coin game runs on top. Every frame flows through
//! [`MirrorState::advance`]; detection backends plug in through
//! [`LandmarkSource`] and style critique through [`StyleRater`].

pub mod anchor;
pub mod assets;
pub mod config;
pub mod error;
pub mod game;
pub mod geometry;
pub mod gesture;
pub mod interaction;
pub mod landmarks;
pub mod mirror;
pub mod rating;
pub mod rng;
pub mod runtime;
pub mod sticker;
pub mod timeline;

pub use anchor::{AnchorFrame, AnchorSample, AnchorType, ScreenAnchor};
pub use assets::{Asset, AssetCatalog, Category, Glyph};
pub use config::MirrorConfig;
pub use error::{MirrorError, Result};
pub use game::{Coin, Game, GameEvent};
pub use geometry::{Rect, Vec2, Viewport};
pub use gesture::{GestureClassifier, GestureVector, SwipeAction, SwipeDirection, SwipeEvent};
pub use interaction::{InteractionEffect, InteractionState, PointerEvent, UiLayout};
pub use landmarks::{FaceLandmarks, HandLandmarks, LandmarkSource, ScriptedSource, VideoFrame};
pub use mirror::{Command, FrameEvent, FrameInput, MirrorContext, MirrorState};
pub use rating::{CannedRater, StyleAdvisor, StyleRater, FALLBACK_CRITIQUE};
pub use runtime::{CancelToken, FrameLoop, LoopOutcome, StopReason};
pub use sticker::{Sticker, StickerId, StickerStore};
pub use timeline::{Cooldown, FrameClock};
